use eframe::egui::{self, Align2, Context, RichText, Sense, vec2};

use crate::ledger::{EntityKind, LedgerDataset};
use crate::util::format_amount;

use super::super::HostState;
use super::super::render_utils::kind_color;

impl HostState {
    fn legend_year(&self) -> i32 {
        self.resolved.map_or(self.year, |resolved| resolved.resolved)
    }

    pub(in crate::app) fn draw_legend(&self, ctx: &Context, dataset: &LedgerDataset) {
        let year = self.legend_year();
        let Some(totals) = dataset.totals_for(year) else {
            return;
        };

        egui::Area::new(egui::Id::new("composition_legend"))
            .anchor(Align2::LEFT_BOTTOM, vec2(12.0, -12.0))
            .interactable(false)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.label(RichText::new(format!("System composition {year}")).strong());
                    ui.label(format!("Total {}", format_amount(totals.total())));
                    ui.add_space(4.0);

                    for kind in EntityKind::ALL {
                        ui.horizontal(|ui| {
                            let (swatch, _) = ui.allocate_exact_size(vec2(10.0, 10.0), Sense::hover());
                            ui.painter()
                                .circle_filled(swatch.center(), 5.0, kind_color(kind));
                            ui.label(format!(
                                "{}  {}  ({:.1}%)",
                                kind.label(),
                                format_amount(totals.for_kind(kind)),
                                totals.share(kind)
                            ));
                        });
                    }
                });
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::YearResolution;

    #[test]
    fn legend_follows_the_resolved_year() {
        let mut host = HostState {
            year: 2025,
            lens: None,
            receipts: false,
            max_entities: 500,
            selected: None,
            resolved: None,
        };
        assert_eq!(host.legend_year(), 2025);

        host.resolved = Some(YearResolution {
            requested: 2025,
            resolved: 2024,
        });
        assert_eq!(host.legend_year(), 2024);
    }
}
