use quarry::{Crud, Model};
use tests::*;

#[derive(Debug, Default, Clone, PartialEq, Model)]
#[model(table = "transfers")]
struct Transfer {
    #[orm("pk;auto")]
    id: i64,
    amount: i64,
}

const TRANSFERS: &str = "CREATE TABLE transfers (
    id {serial},
    amount BIGINT NOT NULL
)";

const COUNT: &str = "SELECT COUNT(*) FROM transfers";

async fn rollback_discards_writes(s: &impl Setup) {
    let db = s.setup(models!(Transfer), &[TRANSFERS]).await;
    let crud = Crud::<Transfer>::new().unwrap();

    let mut tx = db.begin().await.unwrap();
    assert!(tx.is_transaction());

    let mut transfer = Transfer {
        amount: 100,
        ..Default::default()
    };
    crud.create(&mut tx, &mut transfer).await.unwrap();
    assert_eq!(tx.count(COUNT, &[]).await.unwrap(), 1);
    tx.rollback().await.unwrap();

    let mut query = db.query().await.unwrap();
    assert_eq!(query.count(COUNT, &[]).await.unwrap(), 0);
}

async fn commit_keeps_writes(s: &impl Setup) {
    let db = s.setup(models!(Transfer), &[TRANSFERS]).await;
    let crud = Crud::<Transfer>::new().unwrap();

    let mut tx = db.begin().await.unwrap();
    let mut transfers = vec![
        Transfer {
            amount: 5,
            ..Default::default()
        },
        Transfer {
            amount: -5,
            ..Default::default()
        },
    ];
    crud.create_multiple(&mut tx, &mut transfers).await.unwrap();
    tx.commit().await.unwrap();

    let mut query = db.query().await.unwrap();
    assert_eq!(query.count(COUNT, &[]).await.unwrap(), 2);
    assert_eq!(crud.find_all(&mut query).await.unwrap(), transfers);
}

async fn dropped_transaction_rolls_back(s: &impl Setup) {
    let db = s.setup(models!(Transfer), &[TRANSFERS]).await;
    let crud = Crud::<Transfer>::new().unwrap();

    {
        let mut tx = db.begin().await.unwrap();
        let mut transfer = Transfer {
            amount: 1,
            ..Default::default()
        };
        crud.create(&mut tx, &mut transfer).await.unwrap();
    }

    let mut query = db.query().await.unwrap();
    assert_eq!(query.count(COUNT, &[]).await.unwrap(), 0);
    drop(query);

    // The recycled connection can start a new transaction
    let tx = db.begin().await.unwrap();
    tx.commit().await.unwrap();
}

async fn autocommit_handle_has_no_transaction(s: &impl Setup) {
    let db = s.setup(models!(Transfer), &[TRANSFERS]).await;

    let query = db.query().await.unwrap();
    assert!(!query.is_transaction());
    assert_err!(query.commit().await => is_no_active_transaction);

    let query = db.query().await.unwrap();
    assert_err!(query.rollback().await => is_no_active_transaction);
}

tests!(
    rollback_discards_writes,
    commit_keeps_writes,
    dropped_transaction_rolls_back,
    autocommit_handle_has_no_transaction,
);
