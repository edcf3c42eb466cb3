use chrono::{DateTime, Utc};
use std::time::Instant;

/// Monotonic time for scheduling plus wall time for naming saved files.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
    fn wall_time(&self) -> DateTime<Utc>;
}
