#![allow(clippy::float_cmp)]

use super::*;

#[test]
fn parse_name_reads_lowercase_enums() {
    let kind: ElementKind = parse_name("element kind", "sticky").unwrap();
    assert_eq!(kind, ElementKind::Sticky);
    let slot: TextSlot = parse_name("text slot", "description").unwrap();
    assert_eq!(slot, TextSlot::Description);
}

#[test]
fn parse_name_rejects_unknown() {
    let err = parse_name::<ElementKind>("element kind", "video").unwrap_err();
    assert!(err.to_string().starts_with("invalid element kind:"));
}

#[test]
fn parse_json_reads_selection_targets() {
    let t: SelectionTarget = parse_json("selection target", r#"{"kind":"headline"}"#).unwrap();
    assert_eq!(t, SelectionTarget::Headline);
    let t: SelectionTarget = parse_json(
        "selection target",
        r#"{"kind":"element","id":"67e55044-10b1-426f-9247-bb680e5fe0c8"}"#,
    )
    .unwrap();
    assert_eq!(t.element_id().unwrap().to_string(), "67e55044-10b1-426f-9247-bb680e5fe0c8");
}

#[test]
fn parse_json_reads_sparse_fields() {
    let f: PartialElement = parse_json("element fields", r#"{"x":12,"locked":true}"#).unwrap();
    assert_eq!(f.x, Some(12.0));
    assert_eq!(f.locked, Some(true));
    assert!(f.y.is_none());
}

#[test]
fn parse_id_trims_and_validates() {
    assert!(parse_id(" 67e55044-10b1-426f-9247-bb680e5fe0c8 ").is_ok());
    assert!(matches!(parse_id("nope"), Err(HostError::Id(s)) if s == "nope"));
}

#[test]
fn suggestion_errors_convert() {
    let err: HostError = suggest::parse_suggestion("").unwrap_err().into();
    assert_eq!(err.to_string(), "empty suggestion");
}

#[test]
fn prevented_keys() {
    assert!(should_prevent_default_key("Delete"));
    assert!(should_prevent_default_key("Backspace"));
    assert!(should_prevent_default_key("Escape"));
    assert!(!should_prevent_default_key("a"));
}

#[test]
fn catalog_lists_pickers() {
    let v: serde_json::Value = serde_json::from_str(&catalog()).unwrap();
    assert_eq!(v["formats"][0]["key"], "instagram-square");
    assert_eq!(v["formats"].as_array().unwrap().len(), format::FORMATS.len());
    assert_eq!(v["filters"][0]["value"], "none");
    assert!(v["backgrounds"].as_array().unwrap().len() >= 4);
}
