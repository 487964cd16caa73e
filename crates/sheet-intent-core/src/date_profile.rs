//! Per-column date classification returned by the date-detection service.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// How consistently a column's dates can be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DateColumnType {
    /// Every value parses with one day/month order
    #[serde(rename = "CONSISTENT")]
    Consistent,
    /// Values disagree on day/month order
    #[serde(rename = "INCONSISTENT")]
    Inconsistent,
    /// Every value reads both ways (day-first unknown)
    #[serde(rename = "ALL_AMBIGUOUS", alias = "AMBIGUOUS")]
    Ambiguous,
}

/// A date bound keyed by the day-first reading it assumes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateBound {
    /// Bound when reading month-first
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_first_false: Option<String>,
    /// Bound when reading day-first
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_first_true: Option<String>,
}

impl DateBound {
    /// Bound for the given reading.
    pub fn for_reading(&self, day_first: bool) -> Option<&str> {
        if day_first {
            self.day_first_true.as_deref()
        } else {
            self.day_first_false.as_deref()
        }
    }
}

/// Classification of one date column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateColumnInfo {
    /// Column classification
    #[serde(rename = "type")]
    pub column_type: DateColumnType,
    /// Day-first reading; null unless the column is consistent
    #[serde(default)]
    pub day_first: Option<bool>,
    /// Earliest date per reading
    #[serde(default)]
    pub min_date: DateBound,
    /// Latest date per reading
    #[serde(default)]
    pub max_date: DateBound,
}

impl DateColumnInfo {
    /// Earliest date under the column's own reading (month-first if unknown).
    pub fn min_date(&self) -> Option<&str> {
        self.min_date.for_reading(self.day_first.unwrap_or(false))
    }

    /// Latest date under the column's own reading (month-first if unknown).
    pub fn max_date(&self) -> Option<&str> {
        self.max_date.for_reading(self.day_first.unwrap_or(false))
    }
}

/// Mapping from column name to its date classification.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateColumnProfile(BTreeMap<String, DateColumnInfo>);

impl DateColumnProfile {
    /// Profile with no date columns.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Add or replace a column.
    pub fn insert(&mut self, column: impl Into<String>, info: DateColumnInfo) {
        self.0.insert(column.into(), info);
    }

    /// Look up a column.
    pub fn get(&self, column: &str) -> Option<&DateColumnInfo> {
        self.0.get(column)
    }

    /// Check if a column was classified as a date column.
    pub fn contains(&self, column: &str) -> bool {
        self.0.contains_key(column)
    }

    /// Names of all date columns.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Number of date columns.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if no date columns were found.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
