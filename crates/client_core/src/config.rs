use std::{collections::HashMap, fs};

use serde::Deserialize;

/// Every tunable the ordering client reads, collapsed into one place. The
/// web front end this replaces had these scattered across provider variants
/// with inconsistent defaults; here there is a single source of truth.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Sentinel used when neither the page URL nor the durable store names
    /// a table.
    pub default_table: String,
    /// Account credited by the call-waiter transfer.
    pub recipient_account: String,
    /// Fixed call-fee amount, kept as a string and parsed only at encode
    /// time so a bad deployment value surfaces as an encode error instead
    /// of a silent default.
    pub nominal_amount: String,
    /// Currency-unit suffix appended to the formatted amount.
    pub currency_unit: String,
    /// URI prefix the external wallet registers for signed operations.
    pub wallet_uri_scheme: String,
    /// Memo prefix used when the caller supplies no template; the table id
    /// is appended after it.
    pub call_memo_template: String,
    /// How long to wait after opening the deep link before concluding the
    /// wallet app never took over.
    pub fallback_delay_ms: u64,
    pub cart_store_key: String,
    pub table_store_key: String,
    pub android_store_url: String,
    pub ios_store_url: String,
    pub menu_base_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_table: "203".into(),
            recipient_account: "indies.cafe".into(),
            nominal_amount: "0.100".into(),
            currency_unit: "HBD".into(),
            wallet_uri_scheme: "hive://sign/op/".into(),
            call_memo_template: "CALL WAITER".into(),
            fallback_delay_ms: 1000,
            cart_store_key: "cart".into(),
            table_store_key: "table".into(),
            android_store_url:
                "https://play.google.com/store/apps/details?id=com.mobilekeychain".into(),
            ios_store_url: "https://apps.apple.com/app/hive-keychain/id1552190010".into(),
            menu_base_url: "http://localhost:3000".into(),
        }
    }
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("indiesmenu.toml") {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(&raw) {
            apply(&mut settings, |key| file_cfg.get(key).cloned());
        }
    }

    apply(&mut settings, |key| {
        std::env::var(format!("INDIES__{}", key.to_ascii_uppercase())).ok()
    });

    settings
}

fn apply(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("default_table") {
        settings.default_table = v;
    }
    if let Some(v) = lookup("recipient_account") {
        settings.recipient_account = v;
    }
    if let Some(v) = lookup("nominal_amount") {
        settings.nominal_amount = v;
    }
    if let Some(v) = lookup("currency_unit") {
        settings.currency_unit = v;
    }
    if let Some(v) = lookup("wallet_uri_scheme") {
        settings.wallet_uri_scheme = v;
    }
    if let Some(v) = lookup("call_memo_template") {
        settings.call_memo_template = v;
    }
    if let Some(v) = lookup("fallback_delay_ms") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.fallback_delay_ms = parsed;
        }
    }
    if let Some(v) = lookup("cart_store_key") {
        settings.cart_store_key = v;
    }
    if let Some(v) = lookup("table_store_key") {
        settings.table_store_key = v;
    }
    if let Some(v) = lookup("android_store_url") {
        settings.android_store_url = v;
    }
    if let Some(v) = lookup("ios_store_url") {
        settings.ios_store_url = v;
    }
    if let Some(v) = lookup("menu_base_url") {
        settings.menu_base_url = v;
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
