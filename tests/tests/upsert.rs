use chrono::{DateTime, TimeZone, Utc};
use quarry::{args, Crud, Model};
use tests::*;

#[derive(Debug, Default, Clone, PartialEq, Model)]
#[model(table = "settings")]
struct Setting {
    #[orm("pk;auto")]
    id: i64,
    name: String,
    value: String,
    created_at: DateTime<Utc>,
}

/// Keeps the first write.
#[derive(Debug, Default, Clone, PartialEq, Model)]
#[model(table = "settings", update_columns())]
struct FrozenSetting {
    #[orm("pk;auto")]
    id: i64,
    name: String,
    value: String,
    created_at: DateTime<Utc>,
}

/// Only `value` follows later writes.
#[derive(Debug, Default, Clone, PartialEq, Model)]
#[model(table = "counters", update_columns("value"))]
struct Counter {
    #[orm("pk;auto")]
    id: i64,
    name: String,
    value: i64,
    label: String,
}

const SETTINGS: &str = "CREATE TABLE settings (
    id {serial},
    name TEXT NOT NULL UNIQUE,
    value TEXT NOT NULL,
    created_at {timestamp} NOT NULL
)";

const COUNTERS: &str = "CREATE TABLE counters (
    id {serial},
    name TEXT NOT NULL UNIQUE,
    value BIGINT NOT NULL,
    label TEXT NOT NULL
)";

fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, hour, 0, 0).unwrap()
}

async fn upsert_overwrites_existing_row(s: &impl Setup) {
    let db = s.setup(models!(Setting), &[SETTINGS]).await;
    let crud = Crud::<Setting>::new().unwrap();
    let mut query = db.query().await.unwrap();

    let mut first = Setting {
        name: "theme".to_string(),
        value: "light".to_string(),
        created_at: at(8),
        ..Default::default()
    };
    crud.upsert(&mut query, &mut first, &["name"]).await.unwrap();
    assert!(first.id > 0);

    let mut second = Setting {
        name: "theme".to_string(),
        value: "dark".to_string(),
        created_at: at(9),
        ..Default::default()
    };
    crud.upsert(&mut query, &mut second, &["name"]).await.unwrap();

    // The stored row is loaded back, keeping its key and creation time
    assert_eq!(second.id, first.id);
    assert_eq!(second.value, "dark");
    assert_eq!(second.created_at, at(8));

    let rows = crud.find_all(&mut query).await.unwrap();
    assert_eq!(rows, [second]);
}

async fn upsert_with_no_update_columns_keeps_row(s: &impl Setup) {
    let db = s.setup(models!(FrozenSetting), &[SETTINGS]).await;
    let crud = Crud::<FrozenSetting>::new().unwrap();
    let mut query = db.query().await.unwrap();

    let mut first = FrozenSetting {
        name: "locale".to_string(),
        value: "en".to_string(),
        created_at: at(8),
        ..Default::default()
    };
    crud.upsert(&mut query, &mut first, &["name"]).await.unwrap();

    let mut second = FrozenSetting {
        value: "fr".to_string(),
        created_at: at(10),
        ..first.clone()
    };
    second.id = 0;
    crud.upsert(&mut query, &mut second, &["name"]).await.unwrap();

    assert_eq!(second, first);
    assert_eq!(
        query
            .count("SELECT COUNT(*) FROM settings WHERE name = $1", &args!["locale"])
            .await
            .unwrap(),
        1
    );
}

async fn upsert_limited_to_update_columns(s: &impl Setup) {
    let db = s.setup(models!(Counter), &[COUNTERS]).await;
    let crud = Crud::<Counter>::new().unwrap();
    let mut query = db.query().await.unwrap();

    let mut counter = Counter {
        name: "visits".to_string(),
        value: 1,
        label: "original".to_string(),
        ..Default::default()
    };
    crud.upsert(&mut query, &mut counter, &["name"]).await.unwrap();

    let mut again = Counter {
        name: "visits".to_string(),
        value: 2,
        label: "ignored".to_string(),
        ..Default::default()
    };
    crud.upsert(&mut query, &mut again, &["name"]).await.unwrap();

    assert_eq!(again.id, counter.id);
    assert_eq!(again.value, 2);
    assert_eq!(again.label, "original");
}

async fn upsert_without_conflict_columns_inserts(s: &impl Setup) {
    let db = s.setup(models!(Counter), &[COUNTERS]).await;
    let crud = Crud::<Counter>::new().unwrap();
    let mut query = db.query().await.unwrap();

    let mut counter = Counter {
        name: "clicks".to_string(),
        ..Default::default()
    };
    crud.upsert(&mut query, &mut counter, &[]).await.unwrap();
    assert!(counter.id > 0);

    // A second plain insert violates the unique constraint
    let mut duplicate = Counter {
        name: "clicks".to_string(),
        ..Default::default()
    };
    assert_err!(crud.upsert(&mut query, &mut duplicate, &[]).await => is_driver_operation_failed);
}

tests!(
    upsert_overwrites_existing_row,
    upsert_with_no_update_columns_keeps_row,
    upsert_limited_to_update_columns,
    upsert_without_conflict_columns_inserts,
);
