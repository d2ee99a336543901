use std::{collections::BTreeMap, sync::Arc};

use shared::domain::CartItem;
use storage::KeyValueStore;
use tracing::{debug, warn};
use url::Url;

use crate::config::Settings;

/// Extracts the table identifier from a page URL's `table` query parameter.
/// The caller feeds the result into [`CartStore::open`], where it takes
/// precedence over any persisted table.
pub fn table_query_param(page_url: &str) -> Option<String> {
    let url = Url::parse(page_url).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == "table")
        .map(|(_, value)| value.into_owned())
}

/// In-memory cart for one table, mirrored into the durable store on every
/// mutation. Single writer per instance; nothing here is shared across
/// sessions.
pub struct CartStore {
    store: Arc<dyn KeyValueStore>,
    cart_key: String,
    table_key: String,
    default_table: String,
    items: Vec<CartItem>,
    table: Option<String>,
}

impl CartStore {
    /// Hydrates the cart from the durable store. Missing, unreadable, or
    /// malformed persisted state falls back soft to an empty cart; the user
    /// never sees a parse error over a stale cart record.
    ///
    /// Table precedence: `query_table` (persisted immediately when present)
    /// over the stored value over the configured default.
    pub fn open(
        store: Arc<dyn KeyValueStore>,
        settings: &Settings,
        query_table: Option<&str>,
    ) -> Self {
        let mut sanitized = false;
        let items = match store.get(&settings.cart_store_key) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<CartItem>>(&raw) {
                Ok(mut items) => {
                    // Zero-quantity lines must not exist; drop any that a
                    // stale or hand-edited record smuggled in.
                    let before = items.len();
                    items.retain(|item| item.quantity > 0);
                    sanitized = items.len() < before;
                    items
                }
                Err(err) => {
                    warn!(%err, "discarding malformed persisted cart");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!(%err, "failed to read persisted cart, starting empty");
                Vec::new()
            }
        };

        let mut cart = Self {
            store,
            cart_key: settings.cart_store_key.clone(),
            table_key: settings.table_store_key.clone(),
            default_table: settings.default_table.clone(),
            items,
            table: None,
        };

        if sanitized {
            // The durable record held invariant-violating lines; rewrite it
            // now instead of waiting for the next mutation.
            cart.persist();
        }

        if let Some(table) = query_table {
            cart.set_table(table);
        } else {
            cart.table = match cart.store.get(&cart.table_key) {
                Ok(value) => value,
                Err(err) => {
                    warn!(%err, "failed to read persisted table");
                    None
                }
            };
        }

        cart
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// The resolved table id, or the default sentinel when unknown.
    pub fn table(&self) -> &str {
        self.table.as_deref().unwrap_or(&self.default_table)
    }

    pub fn set_table(&mut self, table: &str) {
        self.table = Some(table.to_string());
        if let Err(err) = self.store.set(&self.table_key, table) {
            warn!(%err, "failed to persist table, keeping in-memory value");
        }
    }

    /// Merges by identity (same id and same option set) or appends. A
    /// matching line absorbs the incoming quantity; nothing else about the
    /// existing line changes.
    pub fn add_item(&mut self, item: CartItem) {
        if item.quantity == 0 {
            debug!(id = %item.id, "ignoring zero-quantity add");
            return;
        }

        match self
            .items
            .iter_mut()
            .find(|existing| existing.same_line(&item.id, &item.options))
        {
            Some(existing) => existing.quantity += item.quantity,
            None => self.items.push(item),
        }
        self.persist();
    }

    /// Removes the line with exactly this identity. Removal takes the full
    /// (id, options) tuple so deleting one drink size never takes the other
    /// sizes with it.
    pub fn remove_item(&mut self, id: &str, options: &BTreeMap<String, String>) {
        self.items.retain(|item| !item.same_line(id, options));
        self.persist();
    }

    /// Replaces the quantity of the matching line. A quantity of zero or
    /// below removes the line entirely.
    pub fn update_quantity(
        &mut self,
        id: &str,
        options: &BTreeMap<String, String>,
        new_quantity: i64,
    ) {
        if new_quantity <= 0 {
            self.remove_item(id, options);
            return;
        }

        let new_quantity = u32::try_from(new_quantity).unwrap_or(u32::MAX);
        if let Some(item) = self
            .items
            .iter_mut()
            .find(|item| item.same_line(id, options))
        {
            item.quantity = new_quantity;
        }
        self.persist();
    }

    /// Empties the cart and deletes the persisted record. Idempotent; the
    /// persisted table survives a cart clear.
    pub fn clear(&mut self) {
        self.items.clear();
        if let Err(err) = self.store.remove(&self.cart_key) {
            warn!(%err, "failed to remove persisted cart record");
        }
    }

    pub fn total_items(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Sum of price × quantity across all lines, formatted to two decimals.
    /// Each price is parsed independently; a line with an unparsable price
    /// contributes nothing and is logged.
    pub fn total_price(&self) -> String {
        let total: f64 = self
            .items
            .iter()
            .map(|item| match item.price.parse::<f64>() {
                Ok(price) => price * f64::from(item.quantity),
                Err(_) => {
                    warn!(id = %item.id, price = %item.price, "unparsable price in cart");
                    0.0
                }
            })
            .sum();
        // An empty sum yields -0.0 on current toolchains; normalize so the
        // formatted total never reads "-0.00".
        format!("{:.2}", total + 0.0)
    }

    /// Writes the full collection before returning. A write failure leaves
    /// the in-memory cart authoritative for this session.
    fn persist(&self) {
        let raw = match serde_json::to_string(&self.items) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(%err, "failed to serialize cart, skipping persist");
                return;
            }
        };
        if let Err(err) = self.store.set(&self.cart_key, &raw) {
            warn!(%err, "failed to persist cart, keeping in-memory state");
        }
    }
}

#[cfg(test)]
#[path = "tests/cart_tests.rs"]
mod tests;
