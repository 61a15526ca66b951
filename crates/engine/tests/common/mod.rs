#![allow(dead_code)]

use chrono::NaiveDate;
use sea_orm::{Database, DatabaseConnection};

use engine::{Engine, NewTransactionCmd, NewUserCmd, Transaction, TransactionType, User};
use migration::MigratorTrait;

pub async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .password_cost(4)
        .build()
        .await
        .unwrap();
    (engine, db)
}

pub async fn user(engine: &Engine, email: &str) -> User {
    engine
        .register(NewUserCmd::new("Test User", email, "secret1"))
        .await
        .unwrap()
}

pub fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}

pub async fn add(
    engine: &Engine,
    owner: &User,
    kind: TransactionType,
    cents: i64,
    category: &str,
    day: &str,
) -> Transaction {
    engine
        .create_transaction(NewTransactionCmd::new(
            owner.id,
            kind,
            cents,
            format!("{category} entry"),
            category,
            date(day),
        ))
        .await
        .unwrap()
}
