mod common;

use engine::{
    EngineError, MoneyCents, NewTransactionCmd, PageRequest, TransactionPatch, TransactionQuery,
    TransactionType, summary::DashboardPeriod,
};
use uuid::Uuid;

use common::{add, date, engine_with_db, user};

#[tokio::test]
async fn create_normalizes_fields() {
    let (engine, _db) = engine_with_db().await;
    let alice = user(&engine, "alice@example.com").await;

    let tx = engine
        .create_transaction(
            NewTransactionCmd::new(
                alice.id,
                TransactionType::Expense,
                12_50,
                "  Lunch ",
                " Food ",
                date("2024-01-10"),
            )
            .tags(vec!["team".to_string(), "  ".to_string()]),
        )
        .await
        .unwrap();

    assert_eq!(tx.description, "Lunch");
    assert_eq!(tx.category, "Food");
    assert_eq!(tx.notes, "");
    assert_eq!(tx.tags, vec!["team".to_string()]);

    let stored = engine.transaction(alice.id, &tx.id.to_string()).await.unwrap();
    assert_eq!(stored, tx);
}

#[tokio::test]
async fn create_rejects_invalid_input() {
    let (engine, _db) = engine_with_db().await;
    let alice = user(&engine, "alice@example.com").await;

    let negative = engine
        .create_transaction(NewTransactionCmd::new(
            alice.id,
            TransactionType::Income,
            -1,
            "x",
            "y",
            date("2024-01-01"),
        ))
        .await;
    assert!(matches!(negative, Err(EngineError::Validation(_))));

    let blank = engine
        .create_transaction(NewTransactionCmd::new(
            alice.id,
            TransactionType::Income,
            1,
            "   ",
            "y",
            date("2024-01-01"),
        ))
        .await;
    assert!(matches!(blank, Err(EngineError::Validation(_))));

    let ghost = engine
        .create_transaction(NewTransactionCmd::new(
            Uuid::new_v4(),
            TransactionType::Income,
            1,
            "x",
            "y",
            date("2024-01-01"),
        ))
        .await;
    assert_eq!(
        ghost.unwrap_err(),
        EngineError::NotFound("User not found".to_string())
    );
}

#[tokio::test]
async fn amounts_are_bounded_so_totals_cannot_overflow() {
    let (engine, _db) = engine_with_db().await;
    let alice = user(&engine, "alice@example.com").await;
    let limit = MoneyCents::MAX_TRANSACTION.cents();

    for cents in [limit + 1, i64::MAX] {
        let over = engine
            .create_transaction(NewTransactionCmd::new(
                alice.id,
                TransactionType::Income,
                cents,
                "x",
                "y",
                date("2024-01-01"),
            ))
            .await;
        assert_eq!(
            over.unwrap_err(),
            EngineError::Validation("Amount must not exceed 10000000000000".to_string())
        );
    }

    let a = add(&engine, &alice, TransactionType::Income, limit, "Big", "2024-01-02").await;
    add(&engine, &alice, TransactionType::Income, limit, "Big", "2024-01-03").await;

    let patch = TransactionPatch {
        amount_minor: Some(i64::MAX),
        ..TransactionPatch::default()
    };
    assert!(matches!(
        engine
            .update_transaction(alice.id, &a.id.to_string(), patch)
            .await,
        Err(EngineError::Validation(_))
    ));

    let overview = engine
        .dashboard_overview(alice.id, DashboardPeriod::Yearly, date("2024-01-31"))
        .await
        .unwrap();
    assert_eq!(overview.summary.total_revenue, MoneyCents::new(2 * limit));
}

#[tokio::test]
async fn owner_isolation_holds_for_every_operation() {
    let (engine, _db) = engine_with_db().await;
    let alice = user(&engine, "alice@example.com").await;
    let bob = user(&engine, "bob@example.com").await;

    let a = add(&engine, &alice, TransactionType::Income, 100, "Sales", "2024-01-05").await;
    add(&engine, &bob, TransactionType::Income, 200, "Sales", "2024-01-05").await;

    for query in [
        TransactionQuery::new(alice.id),
        TransactionQuery::new(alice.id).category(Some("sal")),
        TransactionQuery::new(alice.id).search(Some("entry")),
        TransactionQuery::new(alice.id).kind(TransactionType::Income),
    ] {
        let page = engine
            .list_transactions(&query, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.meta.total_items, 1);
        assert!(page.items.iter().all(|tx| tx.user_id == alice.id));
    }

    let not_found = EngineError::NotFound("Transaction not found".to_string());
    let id = a.id.to_string();
    assert_eq!(engine.transaction(bob.id, &id).await.unwrap_err(), not_found);
    assert_eq!(
        engine
            .update_transaction(bob.id, &id, TransactionPatch::default())
            .await
            .unwrap_err(),
        not_found
    );
    assert_eq!(engine.delete_transaction(bob.id, &id).await.unwrap_err(), not_found);
    assert_eq!(
        engine.delete_transaction(alice.id, "not-a-uuid").await.unwrap_err(),
        not_found
    );
}

#[tokio::test]
async fn repeated_update_is_idempotent() {
    let (engine, _db) = engine_with_db().await;
    let alice = user(&engine, "alice@example.com").await;
    let tx = add(&engine, &alice, TransactionType::Expense, 40_00, "Rent", "2024-01-10").await;
    let id = tx.id.to_string();

    let patch = TransactionPatch {
        amount_minor: Some(45_00),
        notes: Some("raised".to_string()),
        ..TransactionPatch::default()
    };
    let first = engine
        .update_transaction(alice.id, &id, patch.clone())
        .await
        .unwrap();
    assert_eq!(first.amount, MoneyCents::new(45_00));
    assert_eq!(first.notes, "raised");
    assert_eq!(first.category, "Rent");
    assert_eq!(first.kind, TransactionType::Expense);

    let second = engine.update_transaction(alice.id, &id, patch).await.unwrap();
    assert_eq!(second, first);
    assert_eq!(engine.transaction(alice.id, &id).await.unwrap(), first);
}

#[tokio::test]
async fn update_can_clear_notes_and_tags() {
    let (engine, _db) = engine_with_db().await;
    let alice = user(&engine, "alice@example.com").await;
    let tx = engine
        .create_transaction(
            NewTransactionCmd::new(
                alice.id,
                TransactionType::Income,
                1,
                "x",
                "y",
                date("2024-01-01"),
            )
            .notes("note")
            .tags(vec!["a".to_string()]),
        )
        .await
        .unwrap();

    let cleared = engine
        .update_transaction(
            alice.id,
            &tx.id.to_string(),
            TransactionPatch {
                notes: Some(String::new()),
                tags: Some(Vec::new()),
                ..TransactionPatch::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(cleared.notes, "");
    assert!(cleared.tags.is_empty());
}

#[tokio::test]
async fn delete_removes_only_the_target() {
    let (engine, _db) = engine_with_db().await;
    let alice = user(&engine, "alice@example.com").await;
    let a = add(&engine, &alice, TransactionType::Income, 1, "A", "2024-01-01").await;
    add(&engine, &alice, TransactionType::Income, 2, "B", "2024-01-02").await;

    engine.delete_transaction(alice.id, &a.id.to_string()).await.unwrap();
    let remaining = engine
        .query_transactions(&TransactionQuery::new(alice.id))
        .await
        .unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].category, "B");
}

#[tokio::test]
async fn list_filters_sorts_and_paginates() {
    let (engine, _db) = engine_with_db().await;
    let alice = user(&engine, "alice@example.com").await;
    for day in 1..=25 {
        let kind = if day % 2 == 0 {
            TransactionType::Expense
        } else {
            TransactionType::Income
        };
        add(&engine, &alice, kind, day * 100, "Misc", &format!("2024-01-{day:02}")).await;
    }

    let query = TransactionQuery::new(alice.id);
    let page = engine
        .list_transactions(&query, PageRequest::new(3, 10))
        .await
        .unwrap();
    assert_eq!(page.meta.total_items, 25);
    assert_eq!(page.meta.total_pages, 3);
    assert_eq!(page.meta.current_page, 3);
    assert_eq!(page.items.len(), 5);
    // Newest first by default.
    assert_eq!(page.items[0].date, date("2024-01-05"));

    let asc = TransactionQuery::new(alice.id).sort_params(Some("amount"), Some("asc"));
    let first = engine
        .list_transactions(&asc, PageRequest::new(1, 3))
        .await
        .unwrap();
    let amounts: Vec<i64> = first.items.iter().map(|tx| tx.amount.cents()).collect();
    assert_eq!(amounts, vec![100, 200, 300]);

    let ranged = TransactionQuery::new(alice.id)
        .kind_param(Some("expense"))
        .start_date(Some(date("2024-01-10")))
        .end_date(Some(date("2024-01-20")));
    let page = engine
        .list_transactions(&ranged, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.meta.total_items, 6);
    assert!(page.items.iter().all(|tx| tx.kind == TransactionType::Expense));

    let ignored = TransactionQuery::new(alice.id).kind_param(Some("refund"));
    let page = engine
        .list_transactions(&ignored, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.meta.total_items, 25);
}

#[tokio::test]
async fn page_far_past_the_end_is_empty() {
    let (engine, _db) = engine_with_db().await;
    let alice = user(&engine, "alice@example.com").await;
    add(&engine, &alice, TransactionType::Income, 100, "Misc", "2024-01-01").await;

    let query = TransactionQuery::new(alice.id);
    for raw in ["18446744073709551615", "1000000000000000000"] {
        let page = engine
            .list_transactions(&query, PageRequest::parse(Some(raw), Some("10")))
            .await
            .unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.meta.current_page, raw.parse::<u64>().unwrap());
        assert_eq!(page.meta.total_items, 1);
        assert_eq!(page.meta.total_pages, 1);
    }

    let bob = user(&engine, "bob@example.com").await;
    let empty = engine
        .list_transactions(&TransactionQuery::new(bob.id), PageRequest::default())
        .await
        .unwrap();
    assert!(empty.items.is_empty());
    assert_eq!(empty.meta.total_pages, 0);
}

#[tokio::test]
async fn store_and_memory_queries_agree() {
    let (engine, _db) = engine_with_db().await;
    let alice = user(&engine, "alice@example.com").await;
    add(&engine, &alice, TransactionType::Income, 500, "Salary", "2024-02-01").await;
    add(&engine, &alice, TransactionType::Expense, 500, "Office 100%", "2024-02-01").await;
    add(&engine, &alice, TransactionType::Expense, 70, "Travel", "2024-02-03").await;
    add(&engine, &alice, TransactionType::Income, 70, "salary_bonus", "2024-03-03").await;

    let all = engine
        .query_transactions(&TransactionQuery::new(alice.id))
        .await
        .unwrap();

    for query in [
        TransactionQuery::new(alice.id).search(Some("SALARY")),
        TransactionQuery::new(alice.id).category(Some("100%")),
        TransactionQuery::new(alice.id).category(Some("_")),
        TransactionQuery::new(alice.id).sort_params(Some("amount"), Some("desc")),
        TransactionQuery::new(alice.id).sort_params(Some("category"), Some("asc")),
        TransactionQuery::new(alice.id).start_date(Some(date("2024-02-02"))),
    ] {
        let from_store = engine.query_transactions(&query).await.unwrap();
        assert_eq!(from_store, query.apply(all.clone()));
    }
}

#[tokio::test]
async fn stats_group_by_type_and_category() {
    let (engine, _db) = engine_with_db().await;
    let alice = user(&engine, "alice@example.com").await;
    add(&engine, &alice, TransactionType::Income, 100_00, "Sales", "2024-01-05").await;
    add(&engine, &alice, TransactionType::Income, 50_00, "Sales", "2024-02-01").await;
    add(&engine, &alice, TransactionType::Expense, 40_00, "Rent", "2024-01-10").await;

    let stats = engine
        .transaction_stats(&TransactionQuery::new(alice.id).end_date(Some(date("2024-01-31"))))
        .await
        .unwrap();
    assert_eq!(stats.types.len(), 2);
    assert_eq!(stats.types[0].total, MoneyCents::new(100_00));
    assert_eq!(stats.types[0].count, 1);
    assert_eq!(stats.categories[1].1[0].name, "Rent");
}
