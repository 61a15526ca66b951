//! Built-in demo data served without authentication.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{MoneyCents, Transaction, TransactionType};

/// Owner of every sample transaction.
pub const SAMPLE_OWNER_ID: Uuid = Uuid::from_u128(1);

const SAMPLE_ROWS: [(u128, TransactionType, i64, &str, &str, (i32, u32, u32)); 5] = [
    (1, TransactionType::Income, 5000_00, "Monthly Salary", "Salary", (2024, 1, 1)),
    (2, TransactionType::Expense, 1200_00, "Office Rent", "Rent", (2024, 1, 2)),
    (3, TransactionType::Income, 2500_00, "Freelance Project", "Freelance", (2024, 1, 5)),
    (4, TransactionType::Expense, 800_00, "Marketing Campaign", "Marketing", (2024, 1, 8)),
    (5, TransactionType::Expense, 450_00, "Office Supplies", "Supplies", (2024, 1, 10)),
];

/// The demo set; record timestamps are the record date at 09:00 UTC.
pub fn sample_transactions() -> Vec<Transaction> {
    SAMPLE_ROWS
        .iter()
        .filter_map(|&(id, kind, cents, description, category, (y, m, d))| {
            let date = NaiveDate::from_ymd_opt(y, m, d)?;
            let stamp = date.and_hms_opt(9, 0, 0)?.and_utc();
            Some(Transaction {
                id: Uuid::from_u128(0x5a00 + id),
                user_id: SAMPLE_OWNER_ID,
                kind,
                amount: MoneyCents::new(cents),
                description: description.to_string(),
                category: category.to_string(),
                date,
                notes: String::new(),
                tags: Vec::new(),
                created_at: stamp,
                updated_at: stamp,
            })
        })
        .collect()
}
