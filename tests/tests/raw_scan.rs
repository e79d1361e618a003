use quarry::{args, Crud, Fields, Model, Value};
use tests::*;

#[derive(Debug, Default, Clone, PartialEq, Model)]
#[model(table = "books")]
struct Book {
    #[orm("pk;auto")]
    id: i64,
    title: String,
    author: String,
    pages: i32,
}

const BOOKS: &str = "CREATE TABLE books (
    id {serial},
    title TEXT NOT NULL,
    author TEXT NOT NULL,
    pages INTEGER NOT NULL
)";

#[derive(Debug, Default, PartialEq, Fields)]
struct BookSummary {
    title: String,
    #[orm("column:page_count")]
    pages: i64,
}

async fn seed(query: &mut quarry::Query) -> Vec<Book> {
    let crud = Crud::<Book>::new().unwrap();
    let mut books = vec![
        Book {
            title: "Dune".to_string(),
            author: "Herbert".to_string(),
            pages: 412,
            ..Default::default()
        },
        Book {
            title: "Emma".to_string(),
            author: "Austen".to_string(),
            pages: 474,
            ..Default::default()
        },
        Book {
            title: "Ubik".to_string(),
            author: "Dick".to_string(),
            pages: 202,
            ..Default::default()
        },
    ];
    crud.create_multiple(query, &mut books).await.unwrap();
    books
}

async fn count_and_exists(s: &impl Setup) {
    let db = s.setup(models!(Book), &[BOOKS]).await;
    let mut query = db.query().await.unwrap();
    seed(&mut query).await;

    let long = query
        .count("SELECT COUNT(*) FROM books WHERE pages > $1", &args![400])
        .await
        .unwrap();
    assert_eq!(long, 2);

    assert!(query
        .exists("SELECT 1 FROM books WHERE author = $1", &args!["Dick"])
        .await
        .unwrap());
    assert!(!query
        .exists("SELECT 1 FROM books WHERE author = $1", &args!["Tolkien"])
        .await
        .unwrap());
}

async fn single_values(s: &impl Setup) {
    let db = s.setup(models!(Book), &[BOOKS]).await;
    let mut query = db.query().await.unwrap();
    seed(&mut query).await;

    let title: String = query
        .query_value("SELECT title FROM books WHERE pages = $1", &args![202])
        .await
        .unwrap();
    assert_eq!(title, "Ubik");

    let author: Option<String> = query
        .query_value("SELECT author FROM books WHERE title = $1", &args!["Emma"])
        .await
        .unwrap();
    assert_eq!(author.as_deref(), Some("Austen"));

    assert_err!(
        query
            .query_value::<String>("SELECT title FROM books WHERE pages = $1", &args![1])
            .await
            => is_record_not_found
    );
}

async fn rows_into_plain_structs(s: &impl Setup) {
    let db = s.setup(models!(Book), &[BOOKS]).await;
    let mut query = db.query().await.unwrap();
    seed(&mut query).await;

    // `author` matches no field and is ignored
    let summaries: Vec<BookSummary> = query
        .query_rows(
            "SELECT title, pages AS page_count, author FROM books ORDER BY title",
            &[],
        )
        .await
        .unwrap();
    assert_eq!(
        summaries,
        [
            BookSummary {
                title: "Dune".to_string(),
                pages: 412
            },
            BookSummary {
                title: "Emma".to_string(),
                pages: 474
            },
            BookSummary {
                title: "Ubik".to_string(),
                pages: 202
            },
        ]
    );

    let first: BookSummary = query
        .query_row(
            "SELECT title FROM books ORDER BY pages DESC",
            &[],
        )
        .await
        .unwrap();
    assert_eq!(first.title, "Emma");
    assert_eq!(first.pages, 0);

    let none: Vec<BookSummary> = query
        .query_rows("SELECT title FROM books WHERE pages < 0", &[])
        .await
        .unwrap();
    assert!(none.is_empty());

    assert_err!(
        query
            .query_row::<BookSummary>("SELECT title FROM books WHERE pages < 0", &[])
            .await
            => is_record_not_found
    );
}

async fn first_row_as_map(s: &impl Setup) {
    let db = s.setup(models!(Book), &[BOOKS]).await;
    let mut query = db.query().await.unwrap();
    let books = seed(&mut query).await;

    let row = query
        .query_map(
            "SELECT id, title, author FROM books ORDER BY id",
            &[],
        )
        .await
        .unwrap();

    let columns: Vec<_> = row.keys().map(String::as_str).collect();
    assert_eq!(columns, ["id", "title", "author"]);
    assert_eq!(row["id"], Value::I64(books[0].id));
    assert_eq!(row["title"], Value::String("Dune".to_string()));
}

async fn model_scans_are_strict(s: &impl Setup) {
    let db = s.setup(models!(Book), &[BOOKS]).await;
    let crud = Crud::<Book>::new().unwrap();
    let mut query = db.query().await.unwrap();
    seed(&mut query).await;

    assert_err!(
        crud.find_by_query(&mut query, "SELECT id, title FROM books", &[])
            .await
            => is_missing_column
    );

    // Extra columns are fine
    let books = crud
        .find_by_query(
            &mut query,
            "SELECT id, title, author, pages, 1 AS extra FROM books ORDER BY pages",
            &[],
        )
        .await
        .unwrap();
    let titles: Vec<_> = books.iter().map(|book| book.title.as_str()).collect();
    assert_eq!(titles, ["Ubik", "Dune", "Emma"]);
}

tests!(
    count_and_exists,
    single_values,
    rows_into_plain_structs,
    first_row_as_map,
    model_scans_are_strict,
);
