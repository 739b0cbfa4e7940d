use std::collections::HashMap;

use eframe::egui::{Vec2, vec2};

use crate::ledger::ActiveFrame;
use crate::util::stable_pair;

use super::super::physics::{node_charge, node_radius};
use super::super::{LayoutConfig, LayoutNode};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(super) struct CarryStats {
    pub(super) carried: usize,
    pub(super) fresh: usize,
    pub(super) dropped: usize,
}

// Matched by id: survivors keep their place, newcomers spawn transparent.
pub(super) fn carry_over(
    previous: Vec<LayoutNode>,
    frame: &ActiveFrame<'_>,
    config: &LayoutConfig,
    center: Vec2,
    salt: u64,
) -> (Vec<LayoutNode>, CarryStats) {
    let mut prior = previous
        .into_iter()
        .map(|node| (node.id.clone(), node))
        .collect::<HashMap<_, _>>();
    let max_amount = frame.max_amount();
    let mut stats = CarryStats::default();

    let nodes = frame
        .entries
        .iter()
        .map(|entry| {
            let entity = entry.entity;
            let radius = node_radius(entry.amount, max_amount, config);
            let charge = node_charge(entry.amount, config);

            match prior.remove(&entity.id) {
                Some(mut node) => {
                    stats.carried += 1;
                    node.name.clone_from(&entity.name);
                    node.kind = entity.kind;
                    node.radius = radius;
                    node.charge = charge;
                    node.velocity *= config.carry_damping;
                    node
                }
                None => {
                    stats.fresh += 1;
                    let (jx, jy) = stable_pair(&entity.id, salt);
                    let half_spread = config.spawn_spread * 0.5;
                    LayoutNode {
                        id: entity.id.clone(),
                        name: entity.name.clone(),
                        kind: entity.kind,
                        pos: center + vec2(jx, jy) * half_spread,
                        velocity: Vec2::ZERO,
                        radius,
                        charge,
                        opacity: 0.0,
                    }
                }
            }
        })
        .collect::<Vec<_>>();

    stats.dropped = prior.len();
    (nodes, stats)
}

pub(super) fn fade_in(nodes: &mut [LayoutNode], step: f32) -> bool {
    let mut fading = false;
    for node in nodes.iter_mut().filter(|node| node.opacity < 1.0) {
        node.opacity = (node.opacity + step).min(1.0);
        fading |= node.opacity < 1.0;
    }
    fading
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::ledger::{Entity, EntityKind, FrameResolution, YearTotals, resolve_frame};

    fn entities() -> Vec<Entity> {
        let entity = |id: &str, payments: &[(i32, f64)]| Entity {
            id: id.to_string(),
            name: id.to_uppercase(),
            kind: EntityKind::NonProfit,
            service: None,
            yearly: payments.iter().copied().collect::<BTreeMap<_, _>>(),
        };
        vec![
            entity("a", &[(2018, 100.0), (2019, 100.0)]),
            entity("b", &[(2019, 50.0)]),
        ]
    }

    fn totals() -> Vec<YearTotals> {
        [2018, 2019]
            .into_iter()
            .map(|year| YearTotals {
                year,
                non_profit: 150.0,
                ..YearTotals::default()
            })
            .collect()
    }

    fn frame<'a>(entities: &'a [Entity], totals: &[YearTotals], year: i32) -> ActiveFrame<'a> {
        match resolve_frame(entities, totals, year, None, 500) {
            FrameResolution::Frame(frame) => frame,
            other => panic!("expected a frame, got {other:?}"),
        }
    }

    #[test]
    fn survivor_keeps_position_and_half_its_velocity() {
        let config = LayoutConfig::default();
        let entities = entities();
        let totals = totals();
        let center = vec2(300.0, 200.0);

        let (mut first, stats) = carry_over(Vec::new(), &frame(&entities, &totals, 2018), &config, center, 1);
        assert_eq!(stats, CarryStats { carried: 0, fresh: 1, dropped: 0 });
        first[0].pos = vec2(123.0, 45.0);
        first[0].velocity = vec2(4.0, -2.0);
        first[0].opacity = 1.0;

        let (second, stats) = carry_over(first, &frame(&entities, &totals, 2019), &config, center, 2);
        assert_eq!(stats, CarryStats { carried: 1, fresh: 1, dropped: 0 });

        let a = second.iter().find(|node| node.id == "a").unwrap();
        assert_eq!(a.pos, vec2(123.0, 45.0));
        assert_eq!(a.velocity, vec2(2.0, -1.0));
        assert_eq!(a.opacity, 1.0);

        let b = second.iter().find(|node| node.id == "b").unwrap();
        assert_eq!(b.opacity, 0.0);
        assert!((b.pos - center).x.abs() <= config.spawn_spread * 0.5);
        assert!((b.pos - center).y.abs() <= config.spawn_spread * 0.5);
        assert!(b.radius < a.radius);
    }

    #[test]
    fn vanished_entities_are_dropped() {
        let config = LayoutConfig::default();
        let entities = entities();
        let totals = totals();
        let center = vec2(0.0, 0.0);

        let (nodes, _) = carry_over(Vec::new(), &frame(&entities, &totals, 2019), &config, center, 1);
        let (nodes, stats) = carry_over(nodes, &frame(&entities, &totals, 2018), &config, center, 2);

        assert_eq!(stats.dropped, 1);
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].id, "a");
    }

    #[test]
    fn fade_in_rises_in_fixed_steps_and_stops_at_one() {
        let config = LayoutConfig::default();
        let entities = entities();
        let totals = totals();
        let (mut nodes, _) =
            carry_over(Vec::new(), &frame(&entities, &totals, 2019), &config, Vec2::ZERO, 1);

        assert!(fade_in(&mut nodes, config.fade_step));
        assert!(nodes.iter().all(|node| (node.opacity - 0.05).abs() < 1e-6));

        let mut frames = 1;
        while fade_in(&mut nodes, config.fade_step) {
            frames += 1;
            assert!(frames < 100);
        }
        assert!(nodes.iter().all(|node| node.opacity == 1.0));
        assert!(!fade_in(&mut nodes, config.fade_step));
    }
}
