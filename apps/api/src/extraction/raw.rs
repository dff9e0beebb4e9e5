use serde_json::{Map, Value};

use crate::models::platform::Platform;

/// Loosely-typed statistics exactly as an adapter extracted them.
///
/// Only the normalizer reads `fields`; nothing past it sees this type.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub platform: Platform,
    pub fields: Map<String, Value>,
}

impl RawRecord {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            fields: Map::new(),
        }
    }

    pub fn with_fields(platform: Platform, fields: Map<String, Value>) -> Self {
        Self { platform, fields }
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.fields.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }
}
