use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Public,
    NonProfit,
    ForProfit,
    Unknown,
}

impl EntityKind {
    pub const ALL: [Self; 4] = [Self::Public, Self::NonProfit, Self::ForProfit, Self::Unknown];

    pub fn from_raw(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "public" => Self::Public,
            "non_profit" | "nonprofit" => Self::NonProfit,
            "for_profit" | "forprofit" => Self::ForProfit,
            _ => Self::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Public => "Public",
            Self::NonProfit => "Non-Profit",
            Self::ForProfit => "For-Profit",
            Self::Unknown => "Unclassified",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ServiceCategory {
    Staffing,
    Consulting,
    HealthcareDelivery,
    It,
    Facilities,
    Other,
}

impl ServiceCategory {
    pub fn from_raw(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" => None,
            "staffing" => Some(Self::Staffing),
            "consulting" => Some(Self::Consulting),
            "healthcare_delivery" => Some(Self::HealthcareDelivery),
            "it" => Some(Self::It),
            "facilities" => Some(Self::Facilities),
            _ => Some(Self::Other),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Staffing => "staffing",
            Self::Consulting => "consulting",
            Self::HealthcareDelivery => "healthcare delivery",
            Self::It => "IT",
            Self::Facilities => "facilities",
            Self::Other => "other",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Lens {
    Staffing,
    Consulting,
    Healthcare,
}

impl Lens {
    pub const ALL: [Self; 3] = [Self::Staffing, Self::Consulting, Self::Healthcare];

    pub fn matches(self, category: Option<ServiceCategory>) -> bool {
        matches!(
            (self, category),
            (Self::Staffing, Some(ServiceCategory::Staffing))
                | (Self::Consulting, Some(ServiceCategory::Consulting))
                | (Self::Healthcare, Some(ServiceCategory::HealthcareDelivery))
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Staffing => "Staffing",
            Self::Consulting => "Consulting",
            Self::Healthcare => "Healthcare",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "staffing" => Some(Self::Staffing),
            "consulting" => Some(Self::Consulting),
            "healthcare" | "healthcare_delivery" => Some(Self::Healthcare),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Entity {
    pub id: String,
    pub name: String,
    pub kind: EntityKind,
    pub service: Option<ServiceCategory>,
    pub yearly: BTreeMap<i32, f64>,
}

impl Entity {
    pub fn amount(&self, year: i32) -> f64 {
        self.yearly.get(&year).copied().unwrap_or(0.0)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct YearTotals {
    pub year: i32,
    pub public: f64,
    pub non_profit: f64,
    pub for_profit: f64,
    pub unknown: f64,
}

impl YearTotals {
    pub fn total(&self) -> f64 {
        self.public + self.non_profit + self.for_profit + self.unknown
    }

    pub fn for_kind(&self, kind: EntityKind) -> f64 {
        match kind {
            EntityKind::Public => self.public,
            EntityKind::NonProfit => self.non_profit,
            EntityKind::ForProfit => self.for_profit,
            EntityKind::Unknown => self.unknown,
        }
    }

    pub fn share(&self, kind: EntityKind) -> f64 {
        let total = self.total();
        if total > 0.0 {
            self.for_kind(kind) / total * 100.0
        } else {
            0.0
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct LedgerDataset {
    pub entities: Vec<Entity>,
    pub totals: Vec<YearTotals>,
}

impl LedgerDataset {
    pub fn totals_for(&self, year: i32) -> Option<&YearTotals> {
        self.totals.iter().find(|totals| totals.year == year)
    }

    pub fn entity(&self, id: &str) -> Option<&Entity> {
        self.entities.iter().find(|entity| entity.id == id)
    }

    pub fn year_span(&self) -> Option<(i32, i32)> {
        let mut years = self
            .totals
            .iter()
            .filter(|totals| totals.total() > 0.0)
            .map(|totals| totals.year);
        let first = years.next()?;
        Some(years.fold((first, first), |(low, high), year| {
            (low.min(year), high.max(year))
        }))
    }
}
