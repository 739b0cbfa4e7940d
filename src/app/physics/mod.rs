mod forces;
mod quadtree;

use eframe::egui::Vec2;

use super::{LayoutConfig, LayoutNode};
use forces::{ChargeParams, accumulate_charge, accumulate_collisions};
use quadtree::QuadCell;

pub(in crate::app) fn node_radius(amount: f64, max_amount: f64, config: &LayoutConfig) -> f32 {
    if !(amount > 0.0 && max_amount > 0.0) {
        return config.min_radius;
    }
    let scaled = (amount / max_amount).sqrt() as f32 * config.max_radius;
    scaled.clamp(config.min_radius, config.max_radius)
}

pub(in crate::app) fn node_charge(amount: f64, config: &LayoutConfig) -> f32 {
    ((amount.max(0.0) / config.charge_unit).sqrt() * config.charge_scale) as f32
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::app) enum TickOutcome {
    Moved,
    Settled,
}

#[derive(Default)]
struct Scratch {
    positions: Vec<Vec2>,
    predicted: Vec<Vec2>,
    charges: Vec<f32>,
    radii: Vec<f32>,
    delta_v: Vec<Vec2>,
}

pub(in crate::app) struct Simulation {
    config: LayoutConfig,
    alpha: f32,
    ticks: u64,
    pair_checks: u64,
    scratch: Scratch,
}

impl Simulation {
    pub(in crate::app) fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            alpha: 1.0,
            ticks: 0,
            pair_checks: 0,
            scratch: Scratch::default(),
        }
    }

    pub(in crate::app) fn alpha(&self) -> f32 {
        self.alpha
    }

    pub(in crate::app) fn ticks(&self) -> u64 {
        self.ticks
    }

    pub(in crate::app) fn pair_checks(&self) -> u64 {
        self.pair_checks
    }

    pub(in crate::app) fn is_settled(&self) -> bool {
        self.alpha < self.config.alpha_min
    }

    pub(in crate::app) fn tick(&mut self, nodes: &mut [LayoutNode], center: Vec2) -> TickOutcome {
        if self.is_settled() {
            return TickOutcome::Settled;
        }

        match &mut *nodes {
            [] => {
                self.alpha = 0.0;
                return TickOutcome::Settled;
            }
            [only] => {
                only.pos = center;
                only.velocity = Vec2::ZERO;
                self.alpha = 0.0;
                self.ticks += 1;
                return TickOutcome::Settled;
            }
            _ => {}
        }

        self.alpha += (self.config.alpha_target - self.alpha) * self.config.alpha_decay;
        self.ticks += 1;

        self.apply_charge(nodes);
        self.apply_positioning(nodes, center);
        self.apply_collisions(nodes);

        let retain = 1.0 - self.config.velocity_decay;
        for node in nodes.iter_mut() {
            node.velocity *= retain;
            node.pos += node.velocity;
        }
        recenter(nodes, center);

        if self.is_settled() {
            TickOutcome::Settled
        } else {
            TickOutcome::Moved
        }
    }

    fn apply_charge(&mut self, nodes: &mut [LayoutNode]) {
        let scratch = &mut self.scratch;
        scratch.positions.clear();
        scratch.charges.clear();
        scratch.radii.clear();
        for node in nodes.iter() {
            scratch.positions.push(node.pos);
            scratch.charges.push(node.charge);
            scratch.radii.push(node.radius);
        }

        let Some(tree) = QuadCell::build(&scratch.positions, &scratch.charges, &scratch.radii)
        else {
            return;
        };
        let params = ChargeParams {
            alpha: self.alpha,
            theta: self.config.theta,
        };
        for (index, node) in nodes.iter_mut().enumerate() {
            let mut delta_v = Vec2::ZERO;
            accumulate_charge(
                &tree,
                index,
                &scratch.positions,
                &scratch.charges,
                params,
                &mut delta_v,
            );
            node.velocity += delta_v;
        }
    }

    fn apply_positioning(&self, nodes: &mut [LayoutNode], center: Vec2) {
        let pull = self.config.center_strength * self.alpha;
        for node in nodes.iter_mut() {
            node.velocity += (center - node.pos) * pull;
        }
    }

    fn apply_collisions(&mut self, nodes: &mut [LayoutNode]) {
        let scratch = &mut self.scratch;
        scratch.predicted.clear();
        scratch.radii.clear();
        for node in nodes.iter() {
            scratch.predicted.push(node.pos + node.velocity);
            scratch.radii.push(node.radius + self.config.collision_margin);
        }
        scratch.charges.clear();
        scratch.charges.resize(nodes.len(), 0.0);
        scratch.delta_v.clear();
        scratch.delta_v.resize(nodes.len(), Vec2::ZERO);

        let Some(tree) = QuadCell::build(&scratch.predicted, &scratch.charges, &scratch.radii)
        else {
            return;
        };
        accumulate_collisions(
            &tree,
            &tree,
            true,
            &scratch.predicted,
            &scratch.radii,
            &mut scratch.delta_v,
            &mut self.pair_checks,
        );
        for (node, delta_v) in nodes.iter_mut().zip(&scratch.delta_v) {
            node.velocity += *delta_v;
        }
    }
}

fn recenter(nodes: &mut [LayoutNode], center: Vec2) {
    let centroid =
        nodes.iter().fold(Vec2::ZERO, |sum, node| sum + node.pos) / nodes.len() as f32;
    let shift = center - centroid;
    if shift.length_sq() > 1e-6 {
        for node in nodes.iter_mut() {
            node.pos += shift;
        }
    }
}
