//! Wire model and remote contract for the session analytics backend.

pub mod backend;
pub mod error;
pub mod memory;
pub mod model;
pub mod range;

pub use backend::{decode_day_detail, decode_range, ApiConfig, HttpBackend, SessionBackend};
pub use error::{ApiError, RangeError};
pub use memory::{MemoryBackend, RecordedCall};
pub use model::{DailyRecord, DayDetail, GroupAttribution, RangeSummary, SessionDetail};
pub use range::DateRange;
