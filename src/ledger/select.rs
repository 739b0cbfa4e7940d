use super::model::{Entity, Lens, YearTotals};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct YearResolution {
    pub requested: i32,
    pub resolved: i32,
}

impl YearResolution {
    pub fn substituted(self) -> bool {
        self.requested != self.resolved
    }
}

#[derive(Clone, Debug)]
pub struct FrameEntry<'a> {
    pub entity: &'a Entity,
    pub amount: f64,
}

#[derive(Clone, Debug)]
pub struct ActiveFrame<'a> {
    pub year: YearResolution,
    pub lens: Option<Lens>,
    pub entries: Vec<FrameEntry<'a>>,
}

impl ActiveFrame<'_> {
    pub fn max_amount(&self) -> f64 {
        self.entries.first().map_or(0.0, |entry| entry.amount)
    }

    pub fn total_amount(&self) -> f64 {
        self.entries.iter().map(|entry| entry.amount).sum()
    }
}

#[derive(Clone, Debug)]
pub enum FrameResolution<'a> {
    Frame(ActiveFrame<'a>),
    Empty(YearResolution),
    NoData,
}

/// Picks the data year for `requested`: the year itself when it has a non-zero
/// aggregate total, otherwise the closest such year (earlier year wins a tie).
pub fn resolve_year(totals: &[YearTotals], requested: i32) -> Option<YearResolution> {
    let resolved = totals
        .iter()
        .filter(|totals| totals.total() > 0.0)
        .map(|totals| totals.year)
        .min_by_key(|year| ((i64::from(*year) - i64::from(requested)).abs(), *year))?;

    Some(YearResolution {
        requested,
        resolved,
    })
}

pub fn resolve_frame<'a>(
    entities: &'a [Entity],
    totals: &[YearTotals],
    requested: i32,
    lens: Option<Lens>,
    cap: usize,
) -> FrameResolution<'a> {
    let Some(year) = resolve_year(totals, requested) else {
        return FrameResolution::NoData;
    };

    let mut entries = entities
        .iter()
        .filter(|entity| lens.is_none_or(|lens| lens.matches(entity.service)))
        .filter_map(|entity| {
            let amount = entity.amount(year.resolved);
            (amount > 0.0).then_some(FrameEntry { entity, amount })
        })
        .collect::<Vec<_>>();

    entries.sort_by(|a, b| {
        b.amount
            .total_cmp(&a.amount)
            .then_with(|| a.entity.id.cmp(&b.entity.id))
    });
    entries.truncate(cap);

    if entries.is_empty() {
        return FrameResolution::Empty(year);
    }

    FrameResolution::Frame(ActiveFrame {
        year,
        lens,
        entries,
    })
}
