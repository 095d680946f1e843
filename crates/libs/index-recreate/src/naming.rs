use chrono::{DateTime, Utc};

/// Second precision, unique for a given logical name unless two indexes are
/// created within the same second.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// `{logical}_{YYYY-MM-DD_HH-mm-ss}`
pub fn unique_index_name(logical: &str, at: DateTime<Utc>) -> String {
    format!("{logical}_{}", at.format(TIMESTAMP_FORMAT))
}
