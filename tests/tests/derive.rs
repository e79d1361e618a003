//! Metadata produced by the derive macros. No database involved.

use quarry::{registry, Fields, Model, ModelMetadata, RawScanner, Rows, Value};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Fields)]
struct Audit {
    created_by: String,
    #[orm("column:rev")]
    revision: i64,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize, quarry::JsonField)]
struct Preferences {
    theme: String,
}

#[derive(Debug, Default, Clone, PartialEq, Model)]
struct OrderItem {
    #[orm("pk;auto")]
    id: i64,
    #[orm("column:sku_code;unique")]
    sku: String,
    #[orm("-")]
    cached_total: HashMap<String, String>,
    #[orm(embed)]
    audit: Audit,
    preferences: Preferences,
    history: Vec<Preferences>,
    r#type: String,
}

#[derive(Debug, Default, Model)]
#[model(table = "billing.invoices", update_columns("total"))]
struct Invoice {
    number: String,
    total: i64,
}

#[test]
fn derived_fields_flatten_embedded_structs() {
    let meta = ModelMetadata::build::<OrderItem>();

    assert_eq!(
        meta.column_names(),
        ["id", "sku_code", "created_by", "rev", "preferences", "history", "type"]
    );
    assert_eq!(meta.table, "order_items");
    assert_eq!(meta.pk_columns, ["id"]);
    assert!(meta.has_auto_primary_key());

    let sku = meta.field("sku_code").unwrap();
    assert_eq!(sku.name, "sku");
    assert!(sku.unique);
    assert!(sku.explicit_column);

    assert_eq!(
        meta.templates.insert,
        "INSERT INTO order_items (sku_code,created_by,rev,preferences,history,type) VALUES ($1,$2,$3,$4,$5,$6)"
    );
}

#[test]
fn derived_accessors_read_and_write_fields() {
    let meta = ModelMetadata::build::<OrderItem>();

    let mut item = OrderItem {
        sku: "A-1".to_string(),
        audit: Audit {
            created_by: "ops".to_string(),
            revision: 3,
        },
        ..Default::default()
    };

    assert_eq!(meta.extract_column(&item, "rev").unwrap(), Value::I64(3));
    assert_eq!(
        meta.extract_column(&item, "preferences").unwrap(),
        Value::Json(r#"{"theme":""}"#.to_string())
    );

    meta.set_column(&mut item, "created_by", Value::from("billing"))
        .unwrap();
    meta.set_pk(&mut item, vec![Value::I64(42)]).unwrap();

    assert_eq!(item.audit.created_by, "billing");
    assert_eq!(item.id, 42);
}

#[test]
fn model_attributes() {
    assert_eq!(Invoice::table_name(), Some("billing.invoices"));
    assert_eq!(Invoice::update_columns(), Some(&["total"][..]));

    let meta = ModelMetadata::build::<Invoice>();
    assert_eq!(meta.schema, "billing");
    assert_eq!(meta.templates.table_name, "billing.invoices");
    assert!(!meta.has_primary_key());
    assert!(meta.templates.update.is_none());
}

#[test]
fn registration_is_idempotent() {
    #[derive(Debug, Default, Model)]
    struct Ticket {
        id: i64,
        title: String,
    }

    let first = registry::register::<Ticket>();
    let second = registry::register::<Ticket>();

    assert!(std::sync::Arc::ptr_eq(&first, &second));
    assert!(registry::is_registered::<Ticket>());
    assert_eq!(first.pk_columns, ["id"]);
}

#[test]
fn derived_fields_scan_raw_rows() {
    #[derive(Debug, Default, PartialEq, Deserialize, Fields)]
    struct Summary {
        #[serde(rename = "orderCount")]
        orders: i64,
        #[orm(embed)]
        audit: Audit,
    }

    let mut rows = Rows::new(vec![
        "ORDERCOUNT".to_string(),
        "created_by".to_string(),
        "rev".to_string(),
        "ignored".to_string(),
    ]);
    rows.push(vec![
        Value::I64(12),
        Value::from("ops"),
        Value::I64(2),
        Value::from("x"),
    ]);

    let summary: Summary = RawScanner::scan_struct(rows).unwrap();
    assert_eq!(
        summary,
        Summary {
            orders: 12,
            audit: Audit {
                created_by: "ops".to_string(),
                revision: 2,
            },
        }
    );
}
