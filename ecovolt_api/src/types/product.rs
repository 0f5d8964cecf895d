//! Product records as returned by the catalog backend.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Backend identifier of a product (a Mongo-style object id in practice).
pub type ProductID = String;

/// A single product. The backend owns the shape, so the record is kept as an
/// untyped JSON object and the display fields are read through accessors.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(transparent)]
pub struct Product(Map<String, Value>);

impl Product {
    /// Wraps an already-parsed JSON object.
    pub fn from_map(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Product identifier, read from `_id` or `id`.
    pub fn id(&self) -> Option<String> {
        ["_id", "id"].iter().find_map(|key| match self.0.get(*key) {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        })
    }

    pub fn name(&self) -> Option<&str> {
        self.str_field(&["name", "title"])
    }

    /// Price as a number. Numeric strings such as `"12 500"` are accepted.
    pub fn price(&self) -> Option<f64> {
        match self.0.get("price")? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect::<String>()
                .replace(',', ".")
                .parse()
                .ok(),
            _ => None,
        }
    }

    pub fn image_url(&self) -> Option<&str> {
        self.str_field(&["image", "imageUrl", "img"])
    }

    pub fn brand(&self) -> Option<&str> {
        self.str_field(&["brand", "manufacturer"])
    }

    pub fn category(&self) -> Option<&str> {
        self.str_field(&["category"])
    }

    /// Raw access to any other field.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    fn str_field(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|key| self.0.get(*key).and_then(Value::as_str))
    }
}
