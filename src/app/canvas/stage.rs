use eframe::egui::Vec2;
use tracing::debug;

use crate::ledger::{FrameResolution, YearResolution};

use super::super::physics::{Simulation, TickOutcome};
use super::super::{LayoutConfig, LayoutNode};
use super::transition::{carry_over, fade_in};

/// The solver together with the only node array it may touch. A session is
/// consumed by [`LayoutSession::stop`] before its successor exists, so two
/// solvers can never share nodes.
pub(super) struct LayoutSession {
    generation: u64,
    year: YearResolution,
    simulation: Simulation,
    nodes: Vec<LayoutNode>,
    settled_logged: bool,
}

impl LayoutSession {
    fn stop(self) -> Vec<LayoutNode> {
        debug!(
            generation = self.generation,
            ticks = self.simulation.ticks(),
            "layout session stopped"
        );
        self.nodes
    }
}

pub(super) enum Scene {
    Idle,
    NoData,
    Empty(YearResolution),
    Active(LayoutSession),
}

pub(super) struct Stage {
    config: LayoutConfig,
    surface: Vec2,
    visible: bool,
    generation: u64,
    scene: Scene,
}

impl Stage {
    pub(super) fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            surface: Vec2::ZERO,
            visible: true,
            generation: 0,
            scene: Scene::Idle,
        }
    }

    pub(super) fn scene(&self) -> &Scene {
        &self.scene
    }

    pub(super) fn nodes(&self) -> &[LayoutNode] {
        match &self.scene {
            Scene::Active(session) => &session.nodes,
            Scene::Idle | Scene::NoData | Scene::Empty(_) => &[],
        }
    }

    pub(super) fn year(&self) -> Option<YearResolution> {
        match &self.scene {
            Scene::Active(session) => Some(session.year),
            Scene::Empty(year) => Some(*year),
            Scene::Idle | Scene::NoData => None,
        }
    }

    pub(super) fn center(&self) -> Vec2 {
        self.surface * 0.5
    }

    /// Takes the running session down, then brings the next one up from its
    /// nodes. Matching is finished before the new solver's first tick.
    pub(super) fn restart(&mut self, resolution: FrameResolution<'_>) {
        let previous = match std::mem::replace(&mut self.scene, Scene::Idle) {
            Scene::Active(session) => session.stop(),
            Scene::Idle | Scene::NoData | Scene::Empty(_) => Vec::new(),
        };
        self.generation = self.generation.wrapping_add(1);

        self.scene = match resolution {
            FrameResolution::Frame(frame) => {
                let (nodes, stats) = carry_over(
                    previous,
                    &frame,
                    &self.config,
                    self.center(),
                    self.generation,
                );
                debug!(
                    generation = self.generation,
                    year = frame.year.resolved,
                    lens = ?frame.lens,
                    nodes = nodes.len(),
                    total = frame.total_amount(),
                    carried = stats.carried,
                    fresh = stats.fresh,
                    dropped = stats.dropped,
                    "layout session started"
                );
                Scene::Active(LayoutSession {
                    generation: self.generation,
                    year: frame.year,
                    simulation: Simulation::new(self.config),
                    nodes,
                    settled_logged: false,
                })
            }
            FrameResolution::Empty(year) => Scene::Empty(year),
            FrameResolution::NoData => Scene::NoData,
        };
    }

    pub(super) fn clear(&mut self) {
        if let Scene::Active(session) = std::mem::replace(&mut self.scene, Scene::Idle) {
            session.stop();
        }
    }

    pub(super) fn resize(&mut self, surface: Vec2) {
        let shift = (surface - self.surface) * 0.5;
        self.surface = surface;
        if shift != Vec2::ZERO
            && let Scene::Active(session) = &mut self.scene
        {
            for node in &mut session.nodes {
                node.pos += shift;
            }
        }
    }

    pub(super) fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    // false once settled and fully opaque, or while hidden
    pub(super) fn advance(&mut self) -> bool {
        if !self.visible {
            return false;
        }
        let center = self.center();
        let fade_step = self.config.fade_step;
        let Scene::Active(session) = &mut self.scene else {
            return false;
        };

        let outcome = session.simulation.tick(&mut session.nodes, center);
        if outcome == TickOutcome::Settled && !session.settled_logged {
            session.settled_logged = true;
            debug!(
                generation = session.generation,
                ticks = session.simulation.ticks(),
                alpha = session.simulation.alpha(),
                pair_checks = session.simulation.pair_checks(),
                "layout settled"
            );
        }
        let fading = fade_in(&mut session.nodes, fade_step);
        outcome == TickOutcome::Moved || fading
    }
}
