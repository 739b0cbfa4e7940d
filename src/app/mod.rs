use std::time::{Duration, Instant};

use eframe::egui::{self, Context, Vec2};
use tracing::{info, warn};

use crate::ledger::{EntityKind, LedgerDataset, LoadHandle, LoadRequest, Lens, YearResolution};

mod canvas;
mod physics;
mod render_utils;
mod ui;

use canvas::LedgerCanvas;

pub struct ViewSettings {
    pub load: LoadRequest,
    pub year: i32,
    pub lens: Option<Lens>,
    pub receipts: bool,
    pub max_entities: usize,
}

pub struct LedgerApp {
    state: AppState,
    fetch_timeout: Duration,
    canvas: LedgerCanvas,
    host: HostState,
}

enum AppState {
    Loading { handle: LoadHandle, started: Instant },
    Ready(Box<LedgerDataset>),
    Placeholder,
}

struct HostState {
    year: i32,
    lens: Option<Lens>,
    receipts: bool,
    max_entities: usize,
    selected: Option<String>,
    resolved: Option<YearResolution>,
}

trait LedgerObserver {
    fn year_resolved(&mut self, year: Option<YearResolution>);
    fn entity_selected(&mut self, id: &str);
}

impl LedgerObserver for HostState {
    fn year_resolved(&mut self, year: Option<YearResolution>) {
        if let Some(year) = year
            && year.substituted()
        {
            info!(
                requested = year.requested,
                resolved = year.resolved,
                "no totals for requested year; showing nearest year"
            );
        }
        self.resolved = year;
    }

    fn entity_selected(&mut self, id: &str) {
        self.selected = Some(id.to_string());
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct CanvasProps {
    year: i32,
    lens: Option<Lens>,
    interactive: bool,
    max_entities: usize,
}

#[derive(Clone, Debug)]
struct LayoutNode {
    id: String,
    name: String,
    kind: EntityKind,
    pos: Vec2,
    velocity: Vec2,
    radius: f32,
    charge: f32,
    opacity: f32,
}

#[derive(Clone, Copy, Debug)]
struct LayoutConfig {
    min_radius: f32,
    max_radius: f32,
    collision_margin: f32,
    charge_unit: f64,
    charge_scale: f64,
    center_strength: f32,
    alpha_target: f32,
    alpha_decay: f32,
    alpha_min: f32,
    velocity_decay: f32,
    theta: f32,
    spawn_spread: f32,
    carry_damping: f32,
    fade_step: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            min_radius: 2.0,
            max_radius: 40.0,
            collision_margin: 2.0,
            charge_unit: 1_000_000.0,
            charge_scale: 2.0,
            center_strength: 0.1,
            alpha_target: 0.0,
            alpha_decay: 0.01,
            alpha_min: 0.001,
            velocity_decay: 0.4,
            theta: 0.9,
            spawn_spread: 200.0,
            carry_damping: 0.5,
            fade_step: 0.05,
        }
    }
}

impl LedgerApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, settings: ViewSettings) -> Self {
        let fetch_timeout = settings.load.timeout;
        let state = AppState::Loading {
            handle: LoadHandle::spawn(settings.load),
            started: Instant::now(),
        };

        Self {
            state,
            fetch_timeout,
            canvas: LedgerCanvas::new(LayoutConfig::default()),
            host: HostState {
                year: settings.year,
                lens: settings.lens,
                receipts: settings.receipts,
                max_entities: settings.max_entities.max(1),
                selected: None,
                resolved: None,
            },
        }
    }

    fn poll_load(&mut self, ctx: &Context) {
        let AppState::Loading { handle, started } = &self.state else {
            return;
        };

        let next = if let Some(outcome) = handle.poll() {
            Some(match outcome.into_dataset() {
                Some(dataset) => AppState::Ready(Box::new(dataset)),
                None => AppState::Placeholder,
            })
        } else if started.elapsed() >= self.fetch_timeout {
            warn!(
                timeout_secs = self.fetch_timeout.as_secs_f32(),
                "ledger data did not arrive in time; using placeholder"
            );
            Some(AppState::Placeholder)
        } else {
            ctx.request_repaint_after(Duration::from_millis(100));
            None
        };

        if let Some(next) = next {
            self.state = next;
        }
    }
}

impl eframe::App for LedgerApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        render_utils::apply_surface_density(ctx);
        self.poll_load(ctx);

        let dataset = match &self.state {
            AppState::Ready(dataset) => Some(dataset.as_ref()),
            AppState::Loading { .. } | AppState::Placeholder => None,
        };

        self.host.handle_keyboard(ctx, dataset);
        self.host.draw_controls(ctx, dataset);
        if let Some(dataset) = dataset {
            self.host.draw_legend(ctx, dataset);
            self.host.draw_details(ctx, dataset);
        }

        let props = CanvasProps {
            year: self.host.year,
            lens: self.host.lens,
            interactive: self.host.receipts,
            max_entities: self.host.max_entities,
        };
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                self.canvas.show(ui, dataset, props, &mut self.host);
            });
    }
}
