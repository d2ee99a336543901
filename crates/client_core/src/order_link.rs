use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Serialize;
use shared::error::EncodeError;
use uuid::Uuid;

use crate::config::Settings;

const MEMO_TABLE_MARKER: &str = "TABLE ";

/// The canonical transfer request handed to the wallet, before encoding.
/// Field order matters: the serialized payload is `{"to":..,"amount":..,
/// "memo":..}` and the wallet's signer displays it verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferIntent {
    pub to: String,
    pub amount: String,
    pub memo: String,
}

/// Builds the call-waiter transfer for a table. The amount is the configured
/// fixed call fee, deliberately independent of the cart subtotal: this
/// action summons a waiter, it does not settle the bill.
pub fn build_order_intent(
    settings: &Settings,
    table: &str,
    memo_template: Option<&str>,
) -> Result<TransferIntent, EncodeError> {
    let template = memo_template.unwrap_or(&settings.call_memo_template);
    let memo = format!("{template} {MEMO_TABLE_MARKER}{table}");

    let amount: f64 = settings
        .nominal_amount
        .trim()
        .parse()
        .map_err(|_| EncodeError::InvalidAmount {
            raw: settings.nominal_amount.clone(),
        })?;
    if !amount.is_finite() || amount < 0.0 {
        return Err(EncodeError::InvalidAmount {
            raw: settings.nominal_amount.clone(),
        });
    }

    Ok(TransferIntent {
        to: settings.recipient_account.clone(),
        amount: format!("{amount:.3} {}", settings.currency_unit),
        memo,
    })
}

/// Serializes `["transfer", intent]`, base64-encodes the JSON bytes, and
/// prepends the wallet's URI scheme. Deterministic for fixed inputs.
pub fn encode_transfer(settings: &Settings, intent: &TransferIntent) -> Result<String, EncodeError> {
    let payload = serde_json::to_string(&("transfer", intent))?;
    Ok(format!(
        "{}{}",
        settings.wallet_uri_scheme,
        STANDARD.encode(payload.as_bytes())
    ))
}

pub fn build_order_link(
    settings: &Settings,
    table: &str,
    memo_template: Option<&str>,
) -> Result<String, EncodeError> {
    let intent = build_order_intent(settings, table, memo_template)?;
    encode_transfer(settings, &intent)
}

/// Variant of [`build_order_link`] that appends a random idempotence tag to
/// the memo, so two taps in quick succession stay distinguishable on-chain.
pub fn build_distriated_order_link(
    settings: &Settings,
    table: &str,
    memo_template: Option<&str>,
) -> Result<String, EncodeError> {
    let mut intent = build_order_intent(settings, table, memo_template)?;
    intent.memo = format!("{} {}", intent.memo, distriate(None));
    encode_transfer(settings, &intent)
}

/// Random short suffix in the form `<tag>-inno-xxxx-xxxx`.
pub fn distriate(tag: Option<&str>) -> String {
    let tag = tag.unwrap_or("kcs");
    let hex = Uuid::new_v4().simple().to_string();
    format!("{tag}-inno-{}-{}", &hex[..4], &hex[4..8])
}

/// Recovers the table id from a memo produced by [`build_order_intent`]:
/// the digits after the last `TABLE ` marker, terminated by a space or the
/// end of the memo.
pub fn table_from_memo(memo: &str) -> Option<&str> {
    let idx = memo.rfind(MEMO_TABLE_MARKER)?;
    let rest = &memo[idx + MEMO_TABLE_MARKER.len()..];
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if digits_end == 0 {
        return None;
    }
    match rest[digits_end..].chars().next() {
        None | Some(' ') => Some(&rest[..digits_end]),
        Some(_) => None,
    }
}

#[cfg(test)]
#[path = "tests/order_link_tests.rs"]
mod tests;
