mod interaction;
mod paint;
mod stage;
mod transition;

use eframe::egui::{self, Align2, Color32, FontId, Sense, Ui};

use crate::ledger::{LedgerDataset, Lens, resolve_frame};

use super::render_utils::{draw_placeholder, draw_surface};
use super::{CanvasProps, LayoutConfig, LedgerObserver};
use interaction::{RenderedCircle, hit_test};
use paint::paint_node;
use stage::{Scene, Stage};

// Any change restarts the layout; the interactive flag is not part of it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct FrameKey {
    loaded: bool,
    year: i32,
    lens: Option<Lens>,
    max_entities: usize,
}

pub(super) struct LedgerCanvas {
    stage: Stage,
    last_key: Option<FrameKey>,
    rendered: Vec<RenderedCircle>,
}

impl LedgerCanvas {
    pub(super) fn new(config: LayoutConfig) -> Self {
        Self {
            stage: Stage::new(config),
            last_key: None,
            rendered: Vec::new(),
        }
    }

    pub(super) fn show(
        &mut self,
        ui: &mut Ui,
        dataset: Option<&LedgerDataset>,
        props: CanvasProps,
        observer: &mut dyn LedgerObserver,
    ) {
        let sense = if props.interactive {
            Sense::click()
        } else {
            Sense::hover()
        };
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), sense);
        let painter = ui.painter_at(rect);
        let minimized = ui
            .ctx()
            .input(|input| input.viewport().minimized.unwrap_or(false));

        self.stage.resize(rect.size());
        self.stage.set_visible(!minimized);

        let key = FrameKey {
            loaded: dataset.is_some(),
            year: props.year,
            lens: props.lens,
            max_entities: props.max_entities,
        };
        if self.last_key != Some(key) {
            self.last_key = Some(key);
            match dataset {
                Some(dataset) => self.stage.restart(resolve_frame(
                    &dataset.entities,
                    &dataset.totals,
                    props.year,
                    props.lens,
                    props.max_entities,
                )),
                None => self.stage.clear(),
            }
            observer.year_resolved(self.stage.year());
        }

        let animating = self.stage.advance();

        self.rendered.clear();
        match self.stage.scene() {
            Scene::Active(_) => {
                draw_surface(&painter, rect);
                for node in self.stage.nodes() {
                    self.rendered
                        .push(paint_node(&painter, rect.min, node, props.interactive));
                }
            }
            Scene::Empty(year) => {
                draw_placeholder(&painter, rect);
                painter.text(
                    rect.center(),
                    Align2::CENTER_CENTER,
                    format!("No data for {}", year.resolved),
                    FontId::proportional(14.0),
                    Color32::from_rgb(0x64, 0x74, 0x8b),
                );
            }
            Scene::Idle | Scene::NoData => draw_placeholder(&painter, rect),
        }

        let density = ui.ctx().pixels_per_point();
        if let Some(pointer) = response.hover_pos()
            && hit_test(&self.rendered, pointer - rect.min, density, props.interactive).is_some()
        {
            ui.output_mut(|output| output.cursor_icon = egui::CursorIcon::PointingHand);
        }
        if response.clicked()
            && let Some(pointer) = response.interact_pointer_pos()
            && let Some(hit) =
                hit_test(&self.rendered, pointer - rect.min, density, props.interactive)
        {
            observer.entity_selected(&hit.id);
        }

        if animating {
            ui.ctx().request_repaint();
        }
    }
}
