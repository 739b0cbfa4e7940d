use eframe::egui::{self, Context, Key, RichText};

use crate::ledger::{LedgerDataset, Lens};

use super::super::HostState;

fn lens_label(lens: Option<Lens>) -> &'static str {
    lens.map_or("All services", Lens::label)
}

impl HostState {
    pub(in crate::app) fn step_year(&mut self, delta: i32, dataset: Option<&LedgerDataset>) {
        let next = self.year.saturating_add(delta);
        self.year = match dataset.and_then(LedgerDataset::year_span) {
            Some((first, last)) => next.clamp(first, last),
            None => next,
        };
    }

    pub(in crate::app) fn handle_keyboard(
        &mut self,
        ctx: &Context,
        dataset: Option<&LedgerDataset>,
    ) {
        if ctx.wants_keyboard_input() {
            return;
        }

        let (previous, next, toggle, clear) = ctx.input(|input| {
            (
                input.key_pressed(Key::ArrowLeft),
                input.key_pressed(Key::ArrowRight),
                input.key_pressed(Key::R),
                input.key_pressed(Key::Escape),
            )
        });

        if previous {
            self.step_year(-1, dataset);
        }
        if next {
            self.step_year(1, dataset);
        }
        if toggle {
            self.receipts = !self.receipts;
        }
        if clear {
            self.selected = None;
        }
    }

    pub(in crate::app) fn draw_controls(&mut self, ctx: &Context, dataset: Option<&LedgerDataset>) {
        egui::TopBottomPanel::top("ledger_controls").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("<").on_hover_text("Previous year").clicked() {
                    self.step_year(-1, dataset);
                }
                ui.label(RichText::new(self.year.to_string()).heading().strong());
                if ui.button(">").on_hover_text("Next year").clicked() {
                    self.step_year(1, dataset);
                }

                if let Some(resolved) = self.resolved
                    && resolved.substituted()
                {
                    ui.weak(format!("(showing {} data)", resolved.resolved));
                }

                ui.separator();
                egui::ComboBox::from_id_salt("ledger_lens")
                    .selected_text(lens_label(self.lens))
                    .show_ui(ui, |ui| {
                        ui.selectable_value(&mut self.lens, None, lens_label(None));
                        for lens in Lens::ALL {
                            ui.selectable_value(&mut self.lens, Some(lens), lens.label());
                        }
                    });

                ui.checkbox(&mut self.receipts, "Receipts")
                    .on_hover_text("Labels, stronger colors and click-to-inspect");

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    match dataset {
                        Some(dataset) => {
                            ui.weak(format!("{} entities", dataset.entities.len()));
                        }
                        None => {
                            ui.weak("No ledger data loaded");
                        }
                    }
                });
            });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::YearTotals;

    fn host(year: i32) -> HostState {
        HostState {
            year,
            lens: None,
            receipts: false,
            max_entities: 500,
            selected: None,
            resolved: None,
        }
    }

    fn dataset(years: &[i32]) -> LedgerDataset {
        LedgerDataset {
            entities: Vec::new(),
            totals: years
                .iter()
                .map(|&year| YearTotals {
                    year,
                    public: 1.0,
                    ..YearTotals::default()
                })
                .collect(),
        }
    }

    #[test]
    fn year_steps_stay_inside_the_data_span() {
        let dataset = dataset(&[2016, 2017, 2018]);
        let mut host = host(2018);

        host.step_year(1, Some(&dataset));
        assert_eq!(host.year, 2018);

        host.step_year(-1, Some(&dataset));
        host.step_year(-1, Some(&dataset));
        host.step_year(-1, Some(&dataset));
        assert_eq!(host.year, 2016);
    }

    #[test]
    fn out_of_span_year_steps_back_into_range() {
        let dataset = dataset(&[2020, 2021, 2022, 2023, 2024]);
        let mut host = host(2030);
        host.step_year(-1, Some(&dataset));
        assert_eq!(host.year, 2024);
    }

    #[test]
    fn without_data_years_move_freely() {
        let mut host = host(2018);
        host.step_year(3, None);
        assert_eq!(host.year, 2021);
    }
}
