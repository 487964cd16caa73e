//! Document-scoped property store and the keys the add-on persists.

use std::collections::HashMap;

/// Property keys.
pub mod keys {
    /// Sheet holding the selected table
    pub const INPUT_SHEET: &str = "inputSheet";
    /// Selected range (A1)
    pub const RANGE: &str = "rangeA1Notation";
    /// Header row number
    pub const HEADER_ROW: &str = "headerRow";
    /// Header range (A1)
    pub const HEADER_RANGE: &str = "headerRange";
    /// Entire detected table (A1)
    pub const ENTIRE_TABLE_RANGE: &str = "entireTableRange";
    /// Cached date column profile (JSON)
    pub const DATE_COLUMNS: &str = "dateColumnsList";
    /// Selection the cached profile was computed for
    pub const DATE_COLUMNS_SELECTION: &str = "dateColumnsSelection";
}

/// String key-value store scoped to one document.
pub trait PropertyStore {
    /// Read a property.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a property.
    fn set(&mut self, key: &str, value: String);

    /// Remove every property.
    fn delete_all(&mut self);
}

/// `HashMap`-backed property store.
#[derive(Debug, Clone, Default)]
pub struct MemoryPropertyStore {
    properties: HashMap<String, String>,
}

impl MemoryPropertyStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored properties.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

impl PropertyStore for MemoryPropertyStore {
    fn get(&self, key: &str) -> Option<String> {
        self.properties.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.properties.insert(key.to_string(), value);
    }

    fn delete_all(&mut self) {
        self.properties.clear();
    }
}
