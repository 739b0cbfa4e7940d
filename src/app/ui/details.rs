use eframe::egui::{self, Context, RichText};

use crate::ledger::{Entity, LedgerDataset};
use crate::util::format_amount;

use super::super::HostState;

fn paid_years(entity: &Entity) -> impl Iterator<Item = (i32, f64)> + '_ {
    entity
        .yearly
        .iter()
        .filter(|(_, amount)| **amount > 0.0)
        .map(|(year, amount)| (*year, *amount))
}

impl HostState {
    pub(in crate::app) fn draw_details(&mut self, ctx: &Context, dataset: &LedgerDataset) {
        let Some(selected_id) = self.selected.clone() else {
            return;
        };
        let highlight_year = self.resolved.map(|resolved| resolved.resolved);

        egui::SidePanel::right("ledger_details")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("Receipt");
                    if ui.small_button("Clear").clicked() {
                        self.selected = None;
                    }
                });
                ui.add_space(6.0);

                let Some(entity) = dataset.entity(&selected_id) else {
                    ui.label("Selected entity is not part of the loaded data.");
                    return;
                };

                ui.label(RichText::new(&entity.name).strong());
                ui.small(entity.id.as_str());
                ui.add_space(6.0);
                ui.label(format!("Category: {}", entity.kind.label()));
                if let Some(service) = entity.service {
                    ui.label(format!("Service: {}", service.label()));
                }
                let lifetime = paid_years(entity).map(|(_, amount)| amount).sum::<f64>();
                ui.label(format!("Lifetime payments: {}", format_amount(lifetime)));

                ui.separator();
                ui.label(RichText::new("Payments by year").strong());
                egui::ScrollArea::vertical()
                    .id_salt("ledger_details_years")
                    .auto_shrink([false, true])
                    .show(ui, |ui| {
                        egui::Grid::new("ledger_details_grid")
                            .num_columns(2)
                            .striped(true)
                            .show(ui, |ui| {
                                for (year, amount) in paid_years(entity) {
                                    let mut year_text = RichText::new(year.to_string());
                                    let mut amount_text = RichText::new(format_amount(amount));
                                    if highlight_year == Some(year) {
                                        year_text = year_text.strong();
                                        amount_text = amount_text.strong();
                                    }
                                    ui.label(year_text);
                                    ui.label(amount_text);
                                    ui.end_row();
                                }
                            });
                    });
            });
    }
}
