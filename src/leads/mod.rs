//! Lead records and the transforms that apply to a single lead.

pub mod columns;
pub mod normalize;
pub mod record;

pub use columns::{ColumnPartition, KnownColumns, REQUIRED_COLUMNS, hoist, missing_required};
pub use normalize::{EMAIL_SLOTS, normalize};
pub use record::{LeadRecord, LeadTable, NormalizedRecord, TaggedRecord};
