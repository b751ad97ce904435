//! Tests for OData wire types

use super::*;
use crate::error::{Error, ErrorKind};
use pretty_assertions::assert_eq;
use serde_json::json;
use test_case::test_case;

// ============================================================================
// Select Tests
// ============================================================================

#[test]
fn test_select_raw_passes_through() {
    let select = Select::from("ID,Perioden");
    assert_eq!(select.encode(), "ID,Perioden");
}

#[test]
fn test_select_columns_joined() {
    let select = Select::from(vec!["ID", "RegioS", "Perioden"]);
    assert_eq!(select.encode(), "ID, RegioS, Perioden");
}

#[test]
fn test_select_string_and_list_encode_identically() {
    let raw = Select::from("ID, RegioS, Perioden");
    let list = Select::columns(["ID", "RegioS", "Perioden"]);
    assert_eq!(raw.encode(), list.encode());
    assert_eq!(raw, list);
}

#[test]
fn test_select_equality_follows_wire_value() {
    let list = Select::from(vec!["ID", "Perioden"]);
    assert_eq!(Select::from("ID, Perioden"), list);

    let compact = Select::from("ID,Perioden");
    assert_ne!(compact.encode(), list.encode());
    assert_ne!(compact, list);
    assert_ne!(Select::from("Perioden, ID"), list);
}

#[test]
fn test_select_equal_selections_send_same_params() {
    let raw = QueryOptions::new().select("ID, Perioden");
    let list = QueryOptions::new().select(vec!["ID", "Perioden"]);
    assert_eq!(raw, list);
    assert_eq!(raw.to_params().unwrap(), list.to_params().unwrap());
}

#[test]
fn test_select_column_names() {
    let select = Select::from(" ID , Perioden ");
    assert_eq!(select.column_names(), vec!["ID", "Perioden"]);
}

#[test_case(Select::from(""); "empty raw")]
#[test_case(Select::from("ID,,Perioden"); "blank raw column")]
#[test_case(Select::Columns(vec![]); "empty list")]
#[test_case(Select::from(vec!["ID", " "]); "blank list column")]
fn test_select_validate_rejects(select: Select) {
    let err = select.validate().unwrap_err();
    assert!(matches!(err, Error::InvalidSelect { .. }));
    assert_eq!(err.kind(), ErrorKind::Usage);
}

#[test]
fn test_select_display() {
    assert_eq!(Select::from(vec!["A", "B"]).to_string(), "A, B");
}

// ============================================================================
// QueryOptions Tests
// ============================================================================

#[test]
fn test_query_options_params_order() {
    let query = QueryOptions::new()
        .filter("Perioden eq '2016JJ00'")
        .select(vec!["ID", "Perioden"]);

    let params = query.to_params().unwrap();
    assert_eq!(
        params,
        vec![
            ("$select".to_string(), "ID, Perioden".to_string()),
            ("$filter".to_string(), "Perioden eq '2016JJ00'".to_string()),
        ]
    );
}

#[test]
fn test_query_options_empty() {
    let query = QueryOptions::new();
    assert!(query.is_empty());
    assert!(query.to_params().unwrap().is_empty());
}

#[test]
fn test_query_options_invalid_select() {
    let query = QueryOptions::new().select(Vec::<String>::new());
    assert!(query.to_params().is_err());
}

#[test]
fn test_query_options_parse_default_selection() {
    let query = QueryOptions::parse(
        "$filter=((Perioden eq '2016JJ00'))&$select=ID, Geslacht, Perioden, TotaleBevolking_1",
    );

    assert_eq!(
        query.filter.as_deref(),
        Some("((Perioden eq '2016JJ00'))")
    );
    let select = query.select.unwrap();
    assert_eq!(
        select.encode(),
        "ID, Geslacht, Perioden, TotaleBevolking_1"
    );
    assert_eq!(select.column_names().len(), 4);
}

#[test]
fn test_query_options_parse_ignores_other_parts() {
    let query = QueryOptions::parse("$top=10&$select=ID");
    assert_eq!(query.select, Some(Select::from("ID")));
    assert!(query.filter.is_none());
}

#[test]
fn test_query_options_parse_empty() {
    assert!(QueryOptions::parse("").is_empty());
    assert!(QueryOptions::parse("$select=&$filter=").is_empty());
}

// ============================================================================
// Page Tests
// ============================================================================

#[test]
fn test_page_with_next_link() {
    let page = Page::from_value(json!({
        "odata.metadata": "https://opendata.cbs.nl/ODataApi/odata/82010NED/$metadata#Cbs.OData.WebAPI.UntypedDataSet",
        "value": [{"ID": 0}, {"ID": 1}],
        "odata.nextLink": "https://opendata.cbs.nl/ODataApi/odata/82010NED/UntypedDataSet?$skip=2"
    }))
    .unwrap();

    assert_eq!(page.len(), 2);
    assert!(page.has_next());
    assert_eq!(
        page.next_link.as_deref(),
        Some("https://opendata.cbs.nl/ODataApi/odata/82010NED/UntypedDataSet?$skip=2")
    );
}

#[test]
fn test_page_with_v4_next_link() {
    let page = Page::from_value(json!({
        "value": [],
        "@odata.nextLink": "next"
    }))
    .unwrap();
    assert!(page.is_empty());
    assert_eq!(page.next_link.as_deref(), Some("next"));
}

#[test]
fn test_page_last_page() {
    let page = Page::from_value(json!({"value": [{"ID": 0}]})).unwrap();
    assert!(!page.has_next());
}

#[test]
fn test_page_empty_next_link_is_last() {
    let page = Page::from_value(json!({"value": [], "odata.nextLink": ""})).unwrap();
    assert!(!page.has_next());
}

#[test]
fn test_page_keeps_column_order() {
    let page = Page::parse(r#"{"value": [{"Perioden": "2016JJ00", "ID": 0, "Aantal": "12"}]}"#)
        .unwrap();
    let keys: Vec<&str> = page.records[0].keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["Perioden", "ID", "Aantal"]);
}

#[test_case(json!([1, 2]); "array body")]
#[test_case(json!({"values": []}); "missing value")]
#[test_case(json!({"value": {"ID": 1}}); "value not array")]
#[test_case(json!({"value": [1]}); "row not object")]
fn test_page_rejects(body: serde_json::Value) {
    let err = Page::from_value(body).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DataContract);
}

#[test]
fn test_page_parse_invalid_json() {
    let err = Page::parse("{not json").unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
}

// ============================================================================
// Resource Tests
// ============================================================================

#[test]
fn test_resource_link_from_record() {
    let record = json!({"name": "TableInfos", "url": "https://opendata.cbs.nl/ODataApi/odata/82010NED/TableInfos"});
    let link = ResourceLink::from_record(record.as_object().unwrap()).unwrap();
    assert_eq!(link.name, "TableInfos");
}

#[test]
fn test_resource_link_missing_name() {
    let record = json!({"url": "x"});
    let err = ResourceLink::from_record(record.as_object().unwrap()).unwrap_err();
    assert!(matches!(err, Error::MissingKey { ref key, .. } if key == "name"));
}

#[test]
fn test_dataset_kind() {
    assert_eq!(DatasetKind::default(), DatasetKind::Untyped);
    assert_eq!(DatasetKind::Untyped.resource(), "UntypedDataSet");
    assert_eq!(DatasetKind::Untyped.other(), "TypedDataSet");
    assert_eq!(DatasetKind::Typed.resource(), "TypedDataSet");
}
