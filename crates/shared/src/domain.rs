use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One line entry in the cart.
///
/// `price` stays a decimal string end to end and is parsed to a float only
/// when a total is computed, so repeated persist/restore cycles never
/// accumulate rounding drift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: String,
    pub name: String,
    pub price: String,
    pub quantity: u32,
    #[serde(default)]
    pub options: BTreeMap<String, String>,
}

impl CartItem {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        price: impl Into<String>,
        quantity: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price: price.into(),
            quantity,
            options: BTreeMap::new(),
        }
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Two entries are the same cart line iff the id matches and the option
    /// sets are equal, key for key and value for value. `BTreeMap` equality
    /// is order-independent, which is exactly the identity rule.
    pub fn same_line(&self, id: &str, options: &BTreeMap<String, String>) -> bool {
        self.id == id && &self.options == options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_ignores_option_insertion_order() {
        let a = CartItem::new("dish", "Plat", "9.00", 1)
            .with_option("size", "L")
            .with_option("cuisson", "medium");
        let b = CartItem::new("dish", "Plat", "9.00", 1)
            .with_option("cuisson", "medium")
            .with_option("size", "L");

        assert!(a.same_line(&b.id, &b.options));
    }

    #[test]
    fn identity_requires_equal_option_cardinality() {
        let bare = CartItem::new("dish", "Plat", "9.00", 1);
        let sized = CartItem::new("dish", "Plat", "9.00", 1).with_option("size", "L");

        assert!(!bare.same_line(&sized.id, &sized.options));
        assert!(!sized.same_line(&bare.id, &bare.options));
    }

    #[test]
    fn missing_options_field_deserializes_as_empty() {
        let item: CartItem = serde_json::from_str(
            r#"{"id":"a","name":"Plat","price":"9.00","quantity":2}"#,
        )
        .expect("item");
        assert!(item.options.is_empty());
    }
}
