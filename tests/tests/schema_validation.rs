use quarry::{registry, Crud, Model, ValidationIssue};
use tests::*;

#[derive(Debug, Default, Model)]
#[model(table = "accounts")]
struct Account {
    #[orm("pk;auto")]
    id: i64,
    email: String,
    nickname: Option<String>,
}

const ACCOUNTS: &str = "CREATE TABLE accounts (
    id {serial},
    email TEXT NOT NULL,
    nickname TEXT
)";

/// Disagrees with its table in every way the validator looks for.
#[derive(Debug, Default, Model)]
#[model(table = "drifted")]
struct Drifted {
    #[orm("pk")]
    id: i64,
    label: String,
    age: i64,
    missing: String,
}

const DRIFTED: &str = "CREATE TABLE drifted (
    id {serial},
    label TEXT,
    age TEXT NOT NULL
)";

/// Declares no key and relies on the database's.
#[derive(Debug, Default, Clone, PartialEq, Model)]
#[model(table = "legacy_entries")]
struct LegacyEntry {
    code: String,
    title: String,
}

const LEGACY_ENTRIES: &str = "CREATE TABLE legacy_entries (
    code TEXT PRIMARY KEY,
    title TEXT NOT NULL
)";

async fn matching_model_is_clean(s: &impl Setup) {
    let db = s.setup(models!(Account), &[ACCOUNTS]).await;

    let report = db.validate_schema::<Account>().await.unwrap();
    assert_eq!(report.table, "accounts");
    assert!(report.is_clean(), "{:?}", report.issues);
    assert!(report.adopted.is_none());
}

async fn mismatches_are_reported(s: &impl Setup) {
    let db = s.setup(models!(Drifted), &[DRIFTED]).await;

    let report = db.validate_schema::<Drifted>().await.unwrap();
    let issues = &report.issues;

    assert!(issues.contains(&ValidationIssue::MissingColumn {
        column: "missing".to_string()
    }));
    assert!(issues.contains(&ValidationIssue::NullableColumn {
        column: "label".to_string()
    }));
    assert!(issues.contains(&ValidationIssue::UndeclaredAutoIncrement {
        column: "id".to_string()
    }));
    assert!(issues.iter().any(|issue| matches!(
        issue,
        ValidationIssue::TypeMismatch { column, db_type, .. }
            if column == "age" && db_type == "text"
    )));
    assert_eq!(issues.len(), 4, "{issues:?}");
}

async fn missing_table_fails(s: &impl Setup) {
    // Registered, but its table is never created
    let db = s.setup(models!(Account), &[]).await;

    let err = assert_err!(db.validate_schema::<Account>().await => is_invalid_schema);
    assert!(err.to_string().contains("accounts"), "{err}");
}

async fn database_primary_key_is_adopted(s: &impl Setup) {
    let db = s.setup(models!(LegacyEntry), &[LEGACY_ENTRIES]).await;

    let report = db.validate_schema::<LegacyEntry>().await.unwrap();
    assert!(report.is_clean(), "{:?}", report.issues);

    // The registry keeps the adopted key, so later runs see a matching model
    if let Some(adopted) = &report.adopted {
        assert_eq!(adopted.pk_columns, ["code"]);
    }
    let metadata = registry::metadata::<LegacyEntry>().unwrap();
    assert_eq!(metadata.pk_columns, ["code"]);

    let crud = Crud::<LegacyEntry>::new().unwrap();
    let mut query = db.query().await.unwrap();

    let mut entry = LegacyEntry {
        code: "A-1".to_string(),
        title: "first".to_string(),
    };
    crud.create(&mut query, &mut entry).await.unwrap();

    entry.title = "renamed".to_string();
    assert_eq!(crud.update(&mut query, &entry).await.unwrap(), 1);

    let found = crud.find_by_pk(&mut query, "A-1").await.unwrap();
    assert_eq!(found, entry);
}

async fn validation_on_connect(s: &impl Setup) {
    let mut builder = models!(Account);
    builder.validate_schema(true);

    // A fresh database has none of the registered tables
    assert_err!(s.connect(&mut builder).await => is_invalid_schema);
}

tests!(
    matching_model_is_clean,
    mismatches_are_reported,
    missing_table_fails,
    database_primary_key_is_adopted,
    validation_on_connect,
);
