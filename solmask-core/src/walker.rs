//! walker.rs - Masks nested JSON-like values while preserving their shape.
//!
//! License: MIT OR APACHE 2.0

use serde_json::{Map, Value};

use crate::config::{MaskingPolicy, REDACTION_MARKER};
use crate::partial::mask_field;

/// Recursive masker for [`serde_json::Value`] trees.
///
/// Field names decide the treatment of object entries; every other string
/// leaf goes through `mask_leaf` (normally the text pipeline with fallback).
pub struct StructuralWalker<'a> {
    policy: &'a MaskingPolicy,
    mask_leaf: &'a dyn Fn(&str) -> String,
}

impl<'a> StructuralWalker<'a> {
    pub fn new(policy: &'a MaskingPolicy, mask_leaf: &'a dyn Fn(&str) -> String) -> Self {
        Self { policy, mask_leaf }
    }

    /// Returns a masked copy of `value`. Keys, key order, nesting and array
    /// lengths are unchanged.
    pub fn mask_value(&self, value: &Value) -> Value {
        match value {
            Value::Object(map) => Value::Object(self.mask_object(map)),
            Value::Array(items) => Value::Array(items.iter().map(|v| self.mask_value(v)).collect()),
            Value::String(s) => Value::String((self.mask_leaf)(s)),
            Value::Number(_) | Value::Bool(_) | Value::Null => value.clone(),
        }
    }

    /// Masks the value stored under `key` in an object.
    pub fn mask_field(&self, key: &str, value: &Value) -> Value {
        if self.policy.is_sensitive(key) {
            return Value::String(REDACTION_MARKER.to_string());
        }
        match (self.policy.pii_kind(key), value) {
            (Some(kind), Value::String(s)) => Value::String(mask_field(kind, s)),
            _ => self.mask_value(value),
        }
    }

    fn mask_object(&self, map: &Map<String, Value>) -> Map<String, Value> {
        map.iter()
            .map(|(key, value)| (key.clone(), self.mask_field(key, value)))
            .collect()
    }
}
