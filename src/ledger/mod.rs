mod fetch;
mod load;
mod model;
mod parse;
mod select;

pub use fetch::DataSource;
pub use load::{LoadHandle, LoadOutcome, LoadRequest};
pub use model::{Entity, EntityKind, LedgerDataset, Lens, ServiceCategory, YearTotals};
pub use select::{ActiveFrame, FrameEntry, FrameResolution, YearResolution, resolve_frame};
