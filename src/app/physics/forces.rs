use eframe::egui::{Vec2, vec2};

use super::quadtree::QuadCell;

/// Direction used when two points coincide exactly; spread by index so stacked
/// nodes separate instead of all moving the same way.
fn separation_hint(a: usize, b: usize) -> Vec2 {
    let angle = ((a as f32) * 0.618_034 + (b as f32) * 0.414_214) * std::f32::consts::TAU;
    vec2(angle.cos(), angle.sin()) * 1e-3
}

#[derive(Clone, Copy)]
pub(super) struct ChargeParams {
    pub(super) alpha: f32,
    pub(super) theta: f32,
}

/// Velocity change on `index` from every other node's charge. Far cells are
/// folded into their centroid once they look small enough from `index`.
pub(super) fn accumulate_charge(
    cell: &QuadCell,
    index: usize,
    positions: &[Vec2],
    charges: &[f32],
    params: ChargeParams,
    delta_v: &mut Vec2,
) {
    if cell.charge <= 0.0 {
        return;
    }

    let point = positions[index];

    if cell.is_leaf() {
        for &other in &cell.members {
            if other == index {
                continue;
            }
            let mut offset = positions[other] - point;
            if offset.length_sq() == 0.0 {
                offset = separation_hint(index, other);
            }
            *delta_v -= offset * (charges[other] * params.alpha / soften(offset.length_sq()));
        }
        return;
    }

    let offset = cell.centroid - point;
    let distance_sq = offset.length_sq();
    let far_enough = !cell.bounds.contains(point)
        && cell.bounds.side() * cell.bounds.side() < params.theta * params.theta * distance_sq;
    if far_enough {
        *delta_v -= offset * (cell.charge * params.alpha / soften(distance_sq));
        return;
    }

    for child in cell.children() {
        accumulate_charge(child, index, positions, charges, params, delta_v);
    }
}

fn soften(distance_sq: f32) -> f32 {
    if distance_sq < 1.0 {
        distance_sq.sqrt().max(1e-3)
    } else {
        distance_sq
    }
}

/// Pushes apart every pair of predicted circles that overlap. Each side moves by
/// the share of the overlap the other circle's area claims.
pub(super) fn accumulate_collisions(
    cell_a: &QuadCell,
    cell_b: &QuadCell,
    same_cell: bool,
    predicted: &[Vec2],
    radii: &[f32],
    delta_v: &mut [Vec2],
    pair_checks: &mut u64,
) {
    if !same_cell && cell_a.bounds.gap_to(cell_b.bounds) > cell_a.max_radius + cell_b.max_radius {
        return;
    }

    if cell_a.is_leaf() && cell_b.is_leaf() {
        if same_cell {
            for (offset, &from) in cell_a.members.iter().enumerate() {
                for &to in &cell_a.members[offset + 1..] {
                    separate(from, to, predicted, radii, delta_v);
                    *pair_checks += 1;
                }
            }
        } else {
            for &from in &cell_a.members {
                for &to in &cell_b.members {
                    separate(from, to, predicted, radii, delta_v);
                    *pair_checks += 1;
                }
            }
        }
        return;
    }

    if same_cell {
        let children = cell_a.children().collect::<Vec<_>>();
        for (first, child_a) in children.iter().enumerate() {
            accumulate_collisions(child_a, child_a, true, predicted, radii, delta_v, pair_checks);
            for child_b in &children[first + 1..] {
                accumulate_collisions(
                    child_a,
                    child_b,
                    false,
                    predicted,
                    radii,
                    delta_v,
                    pair_checks,
                );
            }
        }
        return;
    }

    let split_a = !cell_a.is_leaf()
        && (cell_b.is_leaf() || cell_a.bounds.half_extent >= cell_b.bounds.half_extent);
    if split_a {
        for child in cell_a.children() {
            accumulate_collisions(child, cell_b, false, predicted, radii, delta_v, pair_checks);
        }
    } else {
        for child in cell_b.children() {
            accumulate_collisions(cell_a, child, false, predicted, radii, delta_v, pair_checks);
        }
    }
}

fn separate(from: usize, to: usize, predicted: &[Vec2], radii: &[f32], delta_v: &mut [Vec2]) {
    let reach = radii[from] + radii[to];
    let mut offset = predicted[from] - predicted[to];
    let distance_sq = offset.length_sq();
    if distance_sq >= reach * reach {
        return;
    }
    if distance_sq == 0.0 {
        offset = separation_hint(from, to);
    }

    let distance = offset.length();
    let push = offset * ((reach - distance) / distance);
    let area_from = radii[from] * radii[from];
    let area_to = radii[to] * radii[to];
    let share_from = area_to / (area_from + area_to).max(f32::EPSILON);

    delta_v[from] += push * share_from;
    delta_v[to] -= push * (1.0 - share_from);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlapping_pair_is_pushed_apart_by_area_share() {
        let predicted = vec![vec2(0.0, 0.0), vec2(6.0, 0.0)];
        let radii = vec![10.0, 5.0];
        let charges = vec![0.0, 0.0];
        let tree = QuadCell::build(&predicted, &charges, &radii).unwrap();

        let mut delta_v = vec![Vec2::ZERO; 2];
        let mut pair_checks = 0;
        accumulate_collisions(&tree, &tree, true, &predicted, &radii, &mut delta_v, &mut pair_checks);

        assert_eq!(pair_checks, 1);
        assert!(delta_v[0].x < 0.0);
        assert!(delta_v[1].x > 0.0);
        // The larger circle gives way less.
        assert!(delta_v[0].x.abs() < delta_v[1].x.abs());
        let closed = delta_v[1].x - delta_v[0].x;
        assert!((closed - 9.0).abs() < 1e-4);
    }

    #[test]
    fn charge_pushes_nodes_away_from_each_other() {
        let positions = vec![vec2(0.0, 0.0), vec2(10.0, 0.0)];
        let charges = vec![4.0, 4.0];
        let radii = vec![1.0, 1.0];
        let tree = QuadCell::build(&positions, &charges, &radii).unwrap();
        let params = ChargeParams {
            alpha: 1.0,
            theta: 0.9,
        };

        let mut left = Vec2::ZERO;
        let mut right = Vec2::ZERO;
        accumulate_charge(&tree, 0, &positions, &charges, params, &mut left);
        accumulate_charge(&tree, 1, &positions, &charges, params, &mut right);

        assert!(left.x < 0.0);
        assert!(right.x > 0.0);
        assert!((left.x + right.x).abs() < 1e-6);
    }
}
