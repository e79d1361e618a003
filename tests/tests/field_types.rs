use chrono::{DateTime, TimeZone, Utc};
use quarry::{args, Crud, Fields, JsonField, Model, RawJson};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tests::*;
use uuid::Uuid;

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize, JsonField)]
struct Settings {
    theme: String,
    notifications: bool,
}

#[derive(Debug, Default, Clone, PartialEq, Model)]
#[model(table = "profiles")]
struct Profile {
    #[orm("pk")]
    id: Uuid,
    name: String,
    tags: Vec<String>,
    metadata: HashMap<String, serde_json::Value>,
    settings: Option<Settings>,
    raw_data: RawJson,
}

const PROFILES: &str = "CREATE TABLE profiles (
    id {uuid} PRIMARY KEY,
    name TEXT NOT NULL,
    tags {json},
    metadata {json},
    settings {json},
    raw_data {json}
)";

#[derive(Debug, Default, Clone, PartialEq, Fields)]
struct Dimensions {
    width: i32,
    height: i32,
}

#[derive(Debug, Default, Clone, PartialEq, Model)]
#[model(table = "samples")]
struct Sample {
    #[orm("pk;auto")]
    id: i64,
    quantity: i32,
    ratio: f64,
    priority: Option<i16>,
    active: bool,
    recorded_at: DateTime<Utc>,
    archived_at: Option<DateTime<Utc>>,
    payload: Vec<u8>,
    #[orm(embed)]
    size: Dimensions,
}

const SAMPLES: &str = "CREATE TABLE samples (
    id {serial},
    quantity INTEGER NOT NULL,
    ratio {float} NOT NULL,
    priority SMALLINT,
    active BOOLEAN NOT NULL,
    recorded_at {timestamp} NOT NULL,
    archived_at {timestamp},
    payload {bytes} NOT NULL,
    width INTEGER NOT NULL,
    height INTEGER NOT NULL
)";

async fn json_columns_round_trip(s: &impl Setup) {
    let db = s.setup(models!(Profile), &[PROFILES]).await;
    let crud = Crud::<Profile>::new().unwrap();
    let mut query = db.query().await.unwrap();

    let mut full = Profile {
        id: Uuid::new_v4(),
        name: "Ada".to_string(),
        tags: vec!["admin".to_string(), "beta".to_string()],
        metadata: HashMap::from([
            ("age".to_string(), serde_json::json!(36)),
            ("langs".to_string(), serde_json::json!(["en", "fr"])),
        ]),
        settings: Some(Settings {
            theme: "dark".to_string(),
            notifications: true,
        }),
        raw_data: RawJson::from_string(r#"{"source":"import"}"#),
    };
    crud.create(&mut query, &mut full).await.unwrap();

    let found = crud.find_by_pk(&mut query, full.id).await.unwrap();
    assert_eq!(found, full);
}

async fn empty_json_values(s: &impl Setup) {
    let db = s.setup(models!(Profile), &[PROFILES]).await;
    let crud = Crud::<Profile>::new().unwrap();
    let mut query = db.query().await.unwrap();

    let mut empty = Profile {
        id: Uuid::new_v4(),
        name: "Grace".to_string(),
        ..Default::default()
    };
    crud.create(&mut query, &mut empty).await.unwrap();

    // Empty collections are stored as documents, absent values as NULL
    let nulls = query
        .count(
            "SELECT COUNT(*) FROM profiles WHERE tags IS NOT NULL AND metadata IS NOT NULL \
             AND settings IS NULL AND raw_data IS NULL",
            &[],
        )
        .await
        .unwrap();
    assert_eq!(nulls, 1);

    let found = crud.find_by_pk(&mut query, empty.id).await.unwrap();
    assert!(found.tags.is_empty());
    assert!(found.metadata.is_empty());
    assert_none!(found.settings);
    assert!(found.raw_data.is_null());
}

async fn null_json_columns_scan_as_empty(s: &impl Setup) {
    let db = s.setup(models!(Profile), &[PROFILES]).await;
    let crud = Crud::<Profile>::new().unwrap();
    let mut query = db.query().await.unwrap();

    let id = Uuid::new_v4();
    query
        .exec(
            "INSERT INTO profiles (id, name) VALUES ($1, $2)",
            &args![id, "Linus"],
        )
        .await
        .unwrap();

    let found = crud.find_by_pk(&mut query, id).await.unwrap();
    assert_eq!(found.name, "Linus");
    assert_eq!(found.tags, Vec::<String>::new());
    assert!(found.metadata.is_empty());
    assert_none!(found.settings);
    assert!(found.raw_data.is_null());
}

async fn scalar_columns_round_trip(s: &impl Setup) {
    let db = s.setup(models!(Sample), &[SAMPLES]).await;
    let crud = Crud::<Sample>::new().unwrap();
    let mut query = db.query().await.unwrap();

    let mut sample = Sample {
        quantity: -42,
        ratio: 0.25,
        priority: Some(7),
        active: true,
        recorded_at: Utc.with_ymd_and_hms(2024, 2, 29, 13, 45, 10).unwrap(),
        archived_at: None,
        payload: vec![0, 159, 146, 150, 255],
        size: Dimensions {
            width: 640,
            height: 480,
        },
        ..Default::default()
    };
    crud.create(&mut query, &mut sample).await.unwrap();

    let found = crud.find_by_pk(&mut query, sample.id).await.unwrap();
    assert_eq!(found, sample);

    sample.priority = None;
    sample.active = false;
    sample.archived_at = Some(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
    sample.size.width = 1024;
    crud.update(&mut query, &sample).await.unwrap();

    let found = crud.find_by_pk(&mut query, sample.id).await.unwrap();
    assert_eq!(found, sample);
}

tests!(
    json_columns_round_trip,
    empty_json_values,
    null_json_columns_scan_as_empty,
    scalar_columns_round_trip,
);
