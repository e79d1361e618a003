use quarry::{args, Crud, Model};
use tests::*;

#[derive(Debug, Default, Clone, PartialEq, Model)]
#[model(table = "tasks")]
struct Task {
    #[orm("pk;auto")]
    id: i64,
    title: String,
    priority: i32,
}

const TASKS: &str = "CREATE TABLE tasks (
    id {serial},
    title TEXT NOT NULL,
    priority INTEGER NOT NULL
)";

fn tasks(titles: &[&str]) -> Vec<Task> {
    titles
        .iter()
        .enumerate()
        .map(|(i, title)| Task {
            title: title.to_string(),
            priority: i as i32,
            ..Default::default()
        })
        .collect()
}

async fn create_multiple_assigns_keys_in_order(s: &impl Setup) {
    let db = s.setup(models!(Task), &[TASKS]).await;
    let crud = Crud::<Task>::new().unwrap();
    let mut query = db.query().await.unwrap();

    let mut batch = tasks(&["first", "second", "third"]);
    crud.create_multiple(&mut query, &mut batch).await.unwrap();

    assert!(batch.iter().all(|task| task.id > 0));
    assert!(batch[0].id < batch[1].id && batch[1].id < batch[2].id);

    for task in &batch {
        let stored = crud.find_by_pk(&mut query, task.id).await.unwrap();
        assert_eq!(&stored, task);
    }
}

async fn create_multiple_empty(s: &impl Setup) {
    let db = s.setup(models!(Task), &[TASKS]).await;
    let crud = Crud::<Task>::new().unwrap();
    let mut query = db.query().await.unwrap();

    crud.create_multiple(&mut query, &mut []).await.unwrap();
    assert_eq!(
        query.count("SELECT COUNT(*) FROM tasks", &[]).await.unwrap(),
        0
    );
}

async fn update_multiple_counts_rows(s: &impl Setup) {
    let db = s.setup(models!(Task), &[TASKS]).await;
    let crud = Crud::<Task>::new().unwrap();
    let mut query = db.query().await.unwrap();

    let mut batch = tasks(&["a", "b"]);
    crud.create_multiple(&mut query, &mut batch).await.unwrap();

    for task in &mut batch {
        task.priority += 10;
    }
    assert_eq!(crud.update_multiple(&mut query, &batch).await.unwrap(), 2);

    let total: i64 = query
        .query_value("SELECT SUM(priority) FROM tasks", &[])
        .await
        .unwrap();
    assert_eq!(total, 21);
}

async fn delete_multiple_then_count(s: &impl Setup) {
    let db = s.setup(models!(Task), &[TASKS]).await;
    let crud = Crud::<Task>::new().unwrap();
    let mut query = db.query().await.unwrap();

    let mut batch = tasks(&["keep", "drop 1", "drop 2"]);
    crud.create_multiple(&mut query, &mut batch).await.unwrap();

    let deleted = crud
        .delete_multiple(&mut query, &batch[1..])
        .await
        .unwrap();
    assert_eq!(deleted, 2);

    let remaining = query
        .count(
            "SELECT COUNT(*) FROM tasks WHERE id IN ($1, $2)",
            &args![batch[1].id, batch[2].id],
        )
        .await
        .unwrap();
    assert_eq!(remaining, 0);

    assert_eq!(crud.find_all(&mut query).await.unwrap(), [batch[0].clone()]);
    assert_eq!(crud.delete_multiple(&mut query, &[]).await.unwrap(), 0);
}

tests!(
    create_multiple_assigns_keys_in_order,
    create_multiple_empty,
    update_multiple_counts_rows,
    delete_multiple_then_count,
);
