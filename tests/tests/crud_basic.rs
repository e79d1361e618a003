use quarry::{args, Crud, Model};
use tests::*;

#[derive(Debug, Default, Clone, PartialEq, Model)]
#[model(table = "todos")]
struct Todo {
    #[orm("pk;auto")]
    id: i64,
    title: String,
    done: bool,
    #[orm("column:note")]
    notes: Option<String>,
}

const TODOS: &str = "CREATE TABLE todos (
    id {serial},
    title TEXT NOT NULL,
    done BOOLEAN NOT NULL,
    note TEXT
)";

fn todo(title: &str) -> Todo {
    Todo {
        title: title.to_string(),
        ..Default::default()
    }
}

async fn create_assigns_key(s: &impl Setup) {
    let db = s.setup(models!(Todo), &[TODOS]).await;
    let crud = Crud::<Todo>::new().unwrap();
    let mut query = db.query().await.unwrap();

    let mut first = todo("write docs");
    crud.create(&mut query, &mut first).await.unwrap();

    let mut second = todo("review");
    second.notes = Some("after lunch".to_string());
    crud.create(&mut query, &mut second).await.unwrap();

    assert!(first.id > 0);
    assert!(second.id > first.id);

    let found = crud.find_by_pk(&mut query, second.id).await.unwrap();
    assert_eq!(found, second);
}

async fn update_by_key(s: &impl Setup) {
    let db = s.setup(models!(Todo), &[TODOS]).await;
    let crud = Crud::<Todo>::new().unwrap();
    let mut query = db.query().await.unwrap();

    let mut item = todo("ship it");
    crud.create(&mut query, &mut item).await.unwrap();

    item.done = true;
    item.notes = Some("shipped".to_string());
    assert_eq!(crud.update(&mut query, &item).await.unwrap(), 1);

    let found = crud.find_by_pk(&mut query, item.id).await.unwrap();
    assert!(found.done);
    assert_eq!(found.notes.as_deref(), Some("shipped"));

    // No row has this key
    let ghost = Todo {
        id: item.id + 100,
        ..todo("ghost")
    };
    assert_eq!(crud.update(&mut query, &ghost).await.unwrap(), 0);
}

async fn delete_by_key(s: &impl Setup) {
    let db = s.setup(models!(Todo), &[TODOS]).await;
    let crud = Crud::<Todo>::new().unwrap();
    let mut query = db.query().await.unwrap();

    let mut item = todo("temporary");
    crud.create(&mut query, &mut item).await.unwrap();

    assert_eq!(crud.delete(&mut query, &item).await.unwrap(), 1);

    assert_err!(crud.find_by_pk(&mut query, item.id).await => is_record_not_found);
    assert_eq!(crud.delete(&mut query, &item).await.unwrap(), 0);
}

async fn find_all_and_by_query(s: &impl Setup) {
    let db = s.setup(models!(Todo), &[TODOS]).await;
    let crud = Crud::<Todo>::new().unwrap();
    let mut query = db.query().await.unwrap();

    assert!(crud.find_all(&mut query).await.unwrap().is_empty());

    for title in ["a", "b", "c"] {
        let mut item = todo(title);
        item.done = title != "b";
        crud.create(&mut query, &mut item).await.unwrap();
    }

    let all = crud.find_all(&mut query).await.unwrap();
    assert_eq!(all.len(), 3);

    let done = crud
        .find_by_query(
            &mut query,
            "SELECT id, title, done, note FROM todos WHERE done = $1 ORDER BY title",
            &args![true],
        )
        .await
        .unwrap();
    let titles: Vec<_> = done.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, ["a", "c"]);
}

async fn missing_row(s: &impl Setup) {
    let db = s.setup(models!(Todo), &[TODOS]).await;
    let crud = Crud::<Todo>::new().unwrap();
    let mut query = db.query().await.unwrap();

    let err = assert_err!(crud.find_by_pk(&mut query, 404).await => is_record_not_found);
    assert!(err.to_string().contains("todos"), "{err}");
}

async fn model_without_key(s: &impl Setup) {
    #[derive(Debug, Default, Model)]
    #[model(table = "events")]
    struct Event {
        name: String,
        payload: String,
    }

    let db = s
        .setup(
            models!(Event),
            &["CREATE TABLE events (name TEXT NOT NULL, payload TEXT NOT NULL)"],
        )
        .await;
    let crud = Crud::<Event>::new().unwrap();
    let mut query = db.query().await.unwrap();

    let mut event = Event {
        name: "signup".to_string(),
        payload: "{}".to_string(),
    };
    crud.create(&mut query, &mut event).await.unwrap();
    assert_eq!(
        query.count("SELECT COUNT(*) FROM events", &[]).await.unwrap(),
        1
    );

    assert_err!(crud.update(&mut query, &event).await => is_missing_primary_key);
    assert_err!(crud.delete(&mut query, &event).await => is_missing_primary_key);
    assert_err!(crud.find_by_pk(&mut query, 1).await => is_missing_primary_key);
}

async fn unregistered_model(_s: &impl Setup) {
    #[derive(Debug, Default, Model)]
    struct Orphan {
        id: i64,
    }

    assert_err!(Crud::<Orphan>::new() => is_model_not_registered);
}

tests!(
    create_assigns_key,
    update_by_key,
    delete_by_key,
    find_all_and_by_query,
    missing_row,
    model_without_key,
    unregistered_model,
);
