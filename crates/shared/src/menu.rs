use serde::{Deserialize, Serialize};

use crate::domain::CartItem;

/// Records returned by the menu endpoint. Field names follow the endpoint's
/// camelCase JSON; this crate does not validate them beyond deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dish {
    pub id: String,
    pub name: String,
    pub price: String,
    #[serde(default)]
    pub categories: Vec<Category>,
}

impl Dish {
    /// An "add to cart" event for a dish carries no variant options.
    pub fn cart_item(&self, quantity: u32) -> CartItem {
        CartItem::new(&self.id, &self.name, &self.price, quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrinkSize {
    /// Variant key, e.g. "small" / "large".
    pub key: String,
    /// Human-readable suffix shown next to the drink name.
    pub label: String,
    pub price: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Drink {
    pub id: String,
    pub name: String,
    pub available_sizes: Vec<DrinkSize>,
    #[serde(default)]
    pub categories: Vec<Category>,
}

impl Drink {
    /// Composes the per-variant line id as `<baseId>-<variantKey>` so two
    /// sizes of the same drink never collide in the cart, and records the
    /// chosen size as an option so the identity rule keeps them distinct.
    pub fn cart_item(&self, size: &DrinkSize, quantity: u32) -> CartItem {
        CartItem::new(
            format!("{}-{}", self.id, size.key),
            format!("{} ({})", self.name, size.label),
            &size.price,
            quantity,
        )
        .with_option("size", &size.key)
    }
}
