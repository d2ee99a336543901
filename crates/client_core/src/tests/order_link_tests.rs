use base64::{engine::general_purpose::STANDARD, Engine as _};
use shared::error::EncodeError;

use super::*;

fn settings() -> Settings {
    Settings {
        recipient_account: "indies.cafe".into(),
        nominal_amount: "0.100".into(),
        ..Settings::default()
    }
}

fn decode_payload(link: &str) -> serde_json::Value {
    let encoded = link
        .strip_prefix("hive://sign/op/")
        .expect("scheme prefix");
    let bytes = STANDARD.decode(encoded).expect("valid base64");
    serde_json::from_slice(&bytes).expect("valid json payload")
}

#[test]
fn builds_the_documented_payload_shape() {
    let link = build_order_link(&settings(), "203", None).expect("link");
    let payload = decode_payload(&link);

    assert_eq!(payload[0], "transfer");
    assert_eq!(payload[1]["to"], "indies.cafe");
    assert_eq!(payload[1]["amount"], "0.100 HBD");
    assert_eq!(payload[1]["memo"], "CALL WAITER TABLE 203");
}

#[test]
fn serialized_payload_keeps_to_amount_memo_order() {
    let link = build_order_link(&settings(), "203", None).expect("link");
    let encoded = link.strip_prefix("hive://sign/op/").expect("prefix");
    let json = String::from_utf8(STANDARD.decode(encoded).expect("base64")).expect("utf8");

    let to = json.find("\"to\"").expect("to key");
    let amount = json.find("\"amount\"").expect("amount key");
    let memo = json.find("\"memo\"").expect("memo key");
    assert!(to < amount && amount < memo, "unexpected key order: {json}");
}

#[test]
fn link_is_deterministic_for_fixed_inputs() {
    let settings = settings();
    let first = build_order_link(&settings, "203", None).expect("link");
    let second = build_order_link(&settings, "203", None).expect("link");
    assert_eq!(first, second);

    let other_table = build_order_link(&settings, "12", None).expect("link");
    assert_ne!(first, other_table);
}

#[test]
fn amount_is_formatted_to_three_decimals() {
    let mut cfg = settings();
    cfg.nominal_amount = "1.5".into();
    let intent = build_order_intent(&cfg, "203", None).expect("intent");
    assert_eq!(intent.amount, "1.500 HBD");

    cfg.nominal_amount = " 2 ".into();
    let intent = build_order_intent(&cfg, "203", None).expect("intent");
    assert_eq!(intent.amount, "2.000 HBD");
}

#[test]
fn caller_supplied_memo_template_is_used() {
    let intent = build_order_intent(&settings(), "7", Some("ADDITION SVP")).expect("intent");
    assert_eq!(intent.memo, "ADDITION SVP TABLE 7");
}

#[test]
fn unparsable_nominal_amount_fails_the_encode() {
    let mut cfg = settings();
    cfg.nominal_amount = "not-a-number".into();
    match build_order_link(&cfg, "203", None) {
        Err(EncodeError::InvalidAmount { raw }) => assert_eq!(raw, "not-a-number"),
        other => panic!("expected InvalidAmount, got {other:?}"),
    }
}

#[test]
fn non_finite_or_negative_amount_fails_the_encode() {
    let mut cfg = settings();
    for bad in ["NaN", "inf", "-0.5"] {
        cfg.nominal_amount = bad.into();
        assert!(
            build_order_link(&cfg, "203", None).is_err(),
            "amount {bad:?} should be rejected"
        );
    }
}

#[test]
fn distriated_link_varies_while_base_stays_fixed() {
    let settings = settings();
    let first = build_distriated_order_link(&settings, "203", None).expect("link");
    let second = build_distriated_order_link(&settings, "203", None).expect("link");
    assert_ne!(first, second);

    let payload = decode_payload(&first);
    let memo = payload[1]["memo"].as_str().expect("memo string");
    assert!(memo.starts_with("CALL WAITER TABLE 203 kcs-inno-"), "memo: {memo}");
}

#[test]
fn distriate_uses_the_supplied_tag() {
    let suffix = distriate(Some("bar"));
    assert!(suffix.starts_with("bar-inno-"), "suffix: {suffix}");
    assert_eq!(suffix.split('-').count(), 4);
}

#[test]
fn recovers_the_table_from_a_memo() {
    assert_eq!(table_from_memo("CALL WAITER TABLE 203 kcs-inno-ab12-cd34"), Some("203"));
    assert_eq!(table_from_memo("CALL WAITER TABLE 203"), Some("203"));
    // The last marker wins.
    assert_eq!(table_from_memo("TABLE 1 then TABLE 2 "), Some("2"));
    assert_eq!(table_from_memo("no marker here"), None);
    assert_eq!(table_from_memo("TABLE "), None);
    // Digits must stand alone.
    assert_eq!(table_from_memo("TABLE 12b"), None);
}
