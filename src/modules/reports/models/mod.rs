pub mod summary;

pub use summary::{DailyTotal, DashboardSummary, GroupTotal};
