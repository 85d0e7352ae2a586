//! Integration tests for PDM schema extraction.

use std::path::PathBuf;

use pdm_ingest::{ExtractOptions, IngestError, load_pdm_file, load_pdm_reader, load_pdm_str};
use pdm_model::JavaType;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

fn document(tables: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<Model xmlns:a="attribute" xmlns:c="collection" xmlns:o="object">
<o:RootObject Id="o1"><c:Children><o:Model Id="o2">
<c:Tables>{tables}</c:Tables>
</o:Model></c:Children></o:RootObject>
</Model>"#
    )
}

fn order_document() -> String {
    document(
        r#"
<o:Table Id="o10">
  <a:Code>t_order</a:Code>
  <a:Comment>Orders</a:Comment>
  <a:Creator>shiloh</a:Creator>
  <a:CreationDate>1690971243</a:CreationDate>
  <c:Columns>
    <o:Column Id="o11">
      <a:Code>id</a:Code>
      <a:DataType>int</a:DataType>
      <a:Column.Mandatory>1</a:Column.Mandatory>
    </o:Column>
    <o:Column Id="o12">
      <a:Code>amount</a:Code>
      <a:DataType>decimal(10,2)</a:DataType>
      <a:Length>10</a:Length>
      <a:Column.Mandatory>1</a:Column.Mandatory>
    </o:Column>
  </c:Columns>
  <c:Keys>
    <o:Key Id="o13"><c:Key.Columns><o:Column Ref="o11"/></c:Key.Columns></o:Key>
  </c:Keys>
  <c:PrimaryKey><o:Key Ref="o13"/></c:PrimaryKey>
</o:Table>"#,
    )
}

#[test]
fn minimal_order_document() {
    let options = ExtractOptions::with_table_prefix("t_");
    let entities = load_pdm_str(&order_document(), &options).expect("extract order");

    assert_eq!(entities.len(), 1);
    let order = &entities[0];
    assert_eq!(order.table_name, "t_order");
    assert_eq!(order.name, "Order");
    assert_eq!(order.table_id, "o10");
    assert_eq!(order.comment.as_deref(), Some("Orders"));
    assert_eq!(order.creator.as_deref(), Some("shiloh"));
    assert_eq!(order.primary_key_col_id.as_deref(), Some("o11"));
    assert_eq!(order.fields.len(), 2);

    let id = &order.fields[0];
    assert_eq!(id.name, "id");
    assert!(id.is_primary_key);
    assert_eq!(id.java_type, JavaType::Integer);
    assert_eq!(id.type_qualified_name, None);

    let amount = &order.fields[1];
    assert_eq!(amount.name, "amount");
    assert!(!amount.is_primary_key);
    assert!(amount.mandatory);
    assert_eq!(amount.col_type, "decimal(10,2)");
    assert_eq!(amount.col_length, Some(10));
    assert_eq!(amount.java_type, JavaType::BigDecimal);
    assert_eq!(
        amount.type_qualified_name.as_deref(),
        Some("java.math.BigDecimal")
    );

    assert_eq!(order.dependencies.len(), 1);
    assert!(order.dependencies.contains("java.math.BigDecimal"));
}

#[test]
fn fields_point_back_to_the_raw_table_code() {
    let entities =
        load_pdm_str(&order_document(), &ExtractOptions::default()).expect("extract order");
    let order = &entities[0];
    assert_eq!(order.name, "TOrder");
    assert!(order.fields.iter().all(|field| field.entity_name == "t_order"));
}

#[test]
fn shop_fixture_preserves_document_order() {
    let entities = load_pdm_file(&fixture("shop.pdm"), &ExtractOptions::default())
        .expect("extract shop fixture");

    let names: Vec<_> = entities.iter().map(|entity| entity.name.as_str()).collect();
    assert_eq!(names, vec!["UserAccount", "AuditLog", "OrderLine"]);

    let user = &entities[0];
    let field_names: Vec<_> = user.fields.iter().map(|field| field.name.as_str()).collect();
    assert_eq!(
        field_names,
        vec!["id", "userName", "balance", "createdAt", "___"]
    );
    assert_eq!(
        user.create_date.map(|date| date.timestamp()),
        Some(1_690_971_243)
    );
    assert_eq!(user.mandatory_count(), 2);
    assert_eq!(user.primary_key().map(|field| field.col_id.as_str()), Some("o11"));
    assert_eq!(
        user.dependencies.iter().map(String::as_str).collect::<Vec<_>>(),
        vec!["java.math.BigDecimal", "java.util.Date"]
    );
}

#[test]
fn table_without_primary_key_has_no_key_fields() {
    let entities = load_pdm_file(&fixture("shop.pdm"), &ExtractOptions::default())
        .expect("extract shop fixture");
    let audit = &entities[1];

    assert_eq!(audit.primary_key_col_id, None);
    assert!(audit.fields.iter().all(|field| !field.is_primary_key));
    assert_eq!(audit.comment, None);
    assert!(audit.dependencies.is_empty());
    assert_eq!(
        audit.fields[0].comment.as_deref(),
        Some("Free text & details")
    );
}

#[test]
fn composite_key_marks_only_its_first_column() {
    let entities = load_pdm_file(&fixture("shop.pdm"), &ExtractOptions::default())
        .expect("extract shop fixture");
    let line = &entities[2];

    let keys: Vec<_> = line
        .fields
        .iter()
        .filter(|field| field.is_primary_key)
        .map(|field| field.name.as_str())
        .collect();
    assert_eq!(keys, vec!["lineNo"]);
    assert_eq!(line.create_date, None);
}

#[test]
fn every_keyed_table_has_exactly_one_key_field() {
    let entities = load_pdm_file(&fixture("shop.pdm"), &ExtractOptions::default())
        .expect("extract shop fixture");
    for entity in entities.iter().filter(|e| e.primary_key_col_id.is_some()) {
        let keyed: Vec<_> = entity.fields.iter().filter(|f| f.is_primary_key).collect();
        assert_eq!(keyed.len(), 1, "{}", entity.name);
        assert_eq!(
            Some(keyed[0].col_id.as_str()),
            entity.primary_key_col_id.as_deref()
        );
    }
}

#[test]
fn reader_input_matches_file_input() {
    let path = fixture("shop.pdm");
    let file = std::fs::File::open(&path).expect("open fixture");
    let from_reader =
        load_pdm_reader(file, &ExtractOptions::default()).expect("extract from reader");
    let from_path = load_pdm_file(&path, &ExtractOptions::default()).expect("extract from path");
    assert_eq!(from_reader, from_path);
}

#[test]
fn unmappable_type_aborts_extraction() {
    let xml = document(
        r#"
<o:Table Id="o10"><a:Code>t_ok</a:Code><c:Columns>
  <o:Column Id="o11"><a:Code>id</a:Code><a:DataType>int</a:DataType></o:Column>
</c:Columns></o:Table>
<o:Table Id="o20"><a:Code>t_place</a:Code><c:Columns>
  <o:Column Id="o21"><a:Code>shape</a:Code><a:DataType>geometry</a:DataType></o:Column>
</c:Columns></o:Table>"#,
    );
    let err = load_pdm_str(&xml, &ExtractOptions::default()).unwrap_err();
    match err {
        IngestError::UnmappableType { col_type, table } => {
            assert_eq!(col_type, "geometry");
            assert_eq!(table, "t_place");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_tables_container_is_fatal() {
    let xml = r#"<Model xmlns:o="object"><o:RootObject Id="o1"/></Model>"#;
    let err = load_pdm_str(xml, &ExtractOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        IngestError::MissingElement {
            element: "Tables",
            table: None
        }
    ));
}

#[test]
fn missing_columns_container_names_the_table() {
    let xml = document(r#"<o:Table Id="o10"><a:Code>t_empty</a:Code></o:Table>"#);
    let err = load_pdm_str(&xml, &ExtractOptions::default()).unwrap_err();
    assert_eq!(err.to_string(), "missing <Columns> element in table t_empty");
}

#[test]
fn invalid_length_is_fatal() {
    let xml = document(
        r#"<o:Table Id="o10"><a:Code>t_bad</a:Code><c:Columns>
<o:Column Id="o11"><a:Code>name</a:Code><a:DataType>varchar(x)</a:DataType><a:Length>x</a:Length></o:Column>
</c:Columns></o:Table>"#,
    );
    let err = load_pdm_str(&xml, &ExtractOptions::default()).unwrap_err();
    assert!(matches!(err, IngestError::InvalidValue { field: "Length", .. }));
}

#[test]
fn empty_tables_container_yields_no_entities() {
    let entities =
        load_pdm_str(&document(""), &ExtractOptions::default()).expect("extract empty");
    assert!(entities.is_empty());
}

#[test]
fn malformed_xml_is_fatal() {
    let err = load_pdm_str("<Model><c:Tables></Model>", &ExtractOptions::default()).unwrap_err();
    assert!(matches!(err, IngestError::Xml { .. }));
}

#[test]
fn unreadable_file_reports_its_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("missing.pdm");
    let err = load_pdm_file(&missing, &ExtractOptions::default()).unwrap_err();
    match err {
        IngestError::FileRead { path, .. } => assert_eq!(path, missing),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn truncated_document_is_malformed() {
    let err = load_pdm_str(
        r#"<Model xmlns:c="collection" xmlns:o="object"><c:Tables><o:Table Id="o1">"#,
        &ExtractOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, IngestError::Xml { .. }), "{err}");
}
