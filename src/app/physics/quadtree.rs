use eframe::egui::{Vec2, vec2};

const LEAF_CAPACITY: usize = 8;
const MAX_DEPTH: usize = 12;

#[derive(Clone, Copy)]
pub(super) struct Square {
    pub(super) center: Vec2,
    pub(super) half_extent: f32,
}

impl Square {
    fn enclosing(points: &[Vec2]) -> Option<Self> {
        let mut min = vec2(f32::INFINITY, f32::INFINITY);
        let mut max = vec2(f32::NEG_INFINITY, f32::NEG_INFINITY);
        for point in points {
            min = min.min(*point);
            max = max.max(*point);
        }

        if !(min.x.is_finite() && min.y.is_finite() && max.x.is_finite() && max.y.is_finite()) {
            return None;
        }

        let span = (max - min).max_elem().max(1.0);
        Some(Self {
            center: (min + max) * 0.5,
            half_extent: span * 0.5 + 1.0,
        })
    }

    pub(super) fn contains(self, point: Vec2) -> bool {
        (point.x - self.center.x).abs() <= self.half_extent
            && (point.y - self.center.y).abs() <= self.half_extent
    }

    pub(super) fn side(self) -> f32 {
        self.half_extent * 2.0
    }

    pub(super) fn gap_to(self, other: Self) -> f32 {
        let reach = self.half_extent + other.half_extent;
        let dx = ((self.center.x - other.center.x).abs() - reach).max(0.0);
        let dy = ((self.center.y - other.center.y).abs() - reach).max(0.0);
        dx.hypot(dy)
    }

    fn quadrant(self, point: Vec2) -> usize {
        usize::from(point.x >= self.center.x) | (usize::from(point.y >= self.center.y) << 1)
    }

    fn child(self, quadrant: usize) -> Self {
        let quarter = self.half_extent * 0.5;
        let sign_x = if quadrant & 1 == 1 { 1.0 } else { -1.0 };
        let sign_y = if quadrant & 2 == 2 { 1.0 } else { -1.0 };
        Self {
            center: self.center + vec2(sign_x * quarter, sign_y * quarter),
            half_extent: quarter,
        }
    }
}

/// Spatial index over the layout nodes of one tick. Each cell keeps the summed
/// charge of its subtree, the charge-weighted centroid, and the largest radius
/// so collision checks can skip cells that are too far apart to touch.
pub(super) struct QuadCell {
    pub(super) bounds: Square,
    pub(super) centroid: Vec2,
    pub(super) charge: f32,
    pub(super) max_radius: f32,
    pub(super) members: Vec<usize>,
    pub(super) children: [Option<Box<QuadCell>>; 4],
}

impl QuadCell {
    pub(super) fn build(positions: &[Vec2], charges: &[f32], radii: &[f32]) -> Option<Self> {
        let bounds = Square::enclosing(positions)?;
        let members = (0..positions.len()).collect::<Vec<_>>();
        Some(Self::build_cell(bounds, members, positions, charges, radii, 0))
    }

    fn build_cell(
        bounds: Square,
        members: Vec<usize>,
        positions: &[Vec2],
        charges: &[f32],
        radii: &[f32],
        depth: usize,
    ) -> Self {
        let mut charge = 0.0;
        let mut weighted = Vec2::ZERO;
        let mut plain = Vec2::ZERO;
        let mut max_radius = 0.0_f32;
        for &index in &members {
            let weight = charges[index].abs();
            charge += weight;
            weighted += positions[index] * weight;
            plain += positions[index];
            max_radius = max_radius.max(radii[index]);
        }

        let centroid = if charge > f32::EPSILON {
            weighted / charge
        } else if members.is_empty() {
            bounds.center
        } else {
            plain / members.len() as f32
        };

        let mut cell = Self {
            bounds,
            centroid,
            charge,
            max_radius,
            members,
            children: std::array::from_fn(|_| None),
        };

        if depth >= MAX_DEPTH || cell.members.len() <= LEAF_CAPACITY {
            return cell;
        }

        let mut buckets: [Vec<usize>; 4] = std::array::from_fn(|_| Vec::new());
        for &index in &cell.members {
            buckets[bounds.quadrant(positions[index])].push(index);
        }
        if buckets.iter().filter(|bucket| !bucket.is_empty()).count() <= 1 {
            return cell;
        }

        for (quadrant, bucket) in buckets.into_iter().enumerate() {
            if !bucket.is_empty() {
                cell.children[quadrant] = Some(Box::new(Self::build_cell(
                    bounds.child(quadrant),
                    bucket,
                    positions,
                    charges,
                    radii,
                    depth + 1,
                )));
            }
        }
        cell.members.clear();
        cell
    }

    pub(super) fn is_leaf(&self) -> bool {
        self.children.iter().all(Option::is_none)
    }

    pub(super) fn children(&self) -> impl Iterator<Item = &QuadCell> {
        self.children.iter().filter_map(|child| child.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subdivides_and_aggregates_charge() {
        let positions = (0..40)
            .map(|index| vec2((index % 8) as f32 * 30.0, (index / 8) as f32 * 30.0))
            .collect::<Vec<_>>();
        let charges = vec![2.0; positions.len()];
        let radii = (0..positions.len()).map(|index| index as f32).collect::<Vec<_>>();

        let root = QuadCell::build(&positions, &charges, &radii).unwrap();
        assert!(!root.is_leaf());
        assert_eq!(root.charge, 80.0);
        assert_eq!(root.max_radius, 39.0);

        fn count(cell: &QuadCell) -> usize {
            cell.members.len() + cell.children().map(count).sum::<usize>()
        }
        assert_eq!(count(&root), positions.len());
    }

    #[test]
    fn empty_input_has_no_tree() {
        assert!(QuadCell::build(&[], &[], &[]).is_none());
    }

    #[test]
    fn square_gap_is_zero_when_touching() {
        let a = Square {
            center: vec2(0.0, 0.0),
            half_extent: 5.0,
        };
        let b = Square {
            center: vec2(10.0, 0.0),
            half_extent: 5.0,
        };
        let c = Square {
            center: vec2(20.0, 0.0),
            half_extent: 2.0,
        };
        assert_eq!(a.gap_to(b), 0.0);
        assert_eq!(a.gap_to(c), 13.0);
        assert!(a.contains(vec2(5.0, -5.0)));
    }
}
