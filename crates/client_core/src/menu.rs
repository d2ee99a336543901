use std::collections::BTreeMap;

use anyhow::{Context, Result};
use reqwest::Client;
use shared::menu::{Dish, Drink};
use url::Url;

/// Thin client for the menu endpoint. The core never validates menu data;
/// whatever the endpoint serves is what gets rendered.
pub struct MenuClient {
    http: Client,
    base_url: Url,
}

impl MenuClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("invalid menu base url '{base_url}'"))?;
        Ok(Self {
            http: Client::new(),
            base_url,
        })
    }

    pub async fn fetch_dishes(&self) -> Result<Vec<Dish>> {
        let url = self.base_url.join("api/dishes")?;
        let dishes = self
            .http
            .get(url)
            .send()
            .await
            .context("menu request failed")?
            .error_for_status()?
            .json()
            .await
            .context("malformed dishes response")?;
        Ok(dishes)
    }

    pub async fn fetch_drinks(&self) -> Result<Vec<Drink>> {
        let url = self.base_url.join("api/drinks")?;
        let drinks = self
            .http
            .get(url)
            .send()
            .await
            .context("menu request failed")?
            .error_for_status()?
            .json()
            .await
            .context("malformed drinks response")?;
        Ok(drinks)
    }
}

/// Groups dishes by category name for display. A dish with no categories
/// lands under "Autres".
pub fn group_by_category(dishes: &[Dish]) -> BTreeMap<String, Vec<&Dish>> {
    let mut grouped: BTreeMap<String, Vec<&Dish>> = BTreeMap::new();
    for dish in dishes {
        if dish.categories.is_empty() {
            grouped.entry("Autres".to_string()).or_default().push(dish);
        } else {
            for category in &dish.categories {
                grouped.entry(category.name.clone()).or_default().push(dish);
            }
        }
    }
    grouped
}

#[cfg(test)]
#[path = "tests/menu_tests.rs"]
mod tests;
