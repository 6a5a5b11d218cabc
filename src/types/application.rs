// src/types/application.rs
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::utils::deserialize_null_string;

/// Link record: a candidate applied to a requirement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub candidate_id: u64,
    pub requirement_id: u64,
    #[serde(default, deserialize_with = "deserialize_null_string")]
    pub applied_date: String,
    #[serde(default, deserialize_with = "deserialize_null_string")]
    pub status: String,
}

impl Application {
    /// Calendar date of the application. Accepts RFC 3339 timestamps and
    /// plain `YYYY-MM-DD` dates.
    pub fn applied_on(&self) -> Option<NaiveDate> {
        let raw = self.applied_date.trim();
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.date_naive())
            .ok()
            .or_else(|| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok())
            .or_else(|| {
                raw.get(..10)
                    .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
            })
    }
}
