use chrono::{SubsecRound, Utc};
use uuid::Uuid;

use sea_orm::{PaginatorTrait, QueryFilter, QuerySelect, TransactionTrait, prelude::*};

use crate::{
    EngineError, MoneyCents, NewTransactionCmd, ResultEngine, Transaction, TransactionPatch,
    TransactionQuery, aggregation::{self, TransactionStats},
    pagination::{Page, PageMeta, PageRequest},
    transactions, users,
    util::{normalize_optional_text, normalize_required_text, parse_uuid},
};

use super::{Engine, with_tx};

fn validate_amount(amount_minor: i64) -> ResultEngine<MoneyCents> {
    if amount_minor < 0 {
        return Err(EngineError::Validation(
            "Amount must be a non-negative number".to_string(),
        ));
    }
    let amount = MoneyCents::new(amount_minor);
    if amount > MoneyCents::MAX_TRANSACTION {
        return Err(EngineError::Validation(format!(
            "Amount must not exceed {}",
            MoneyCents::MAX_TRANSACTION
        )));
    }
    Ok(amount)
}

fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter()
        .filter_map(|tag| normalize_optional_text(Some(&tag)))
        .collect()
}

fn not_found() -> EngineError {
    EngineError::NotFound("Transaction not found".to_string())
}

impl Engine {
    /// Record a new transaction for `cmd.user_id`.
    pub async fn create_transaction(&self, cmd: NewTransactionCmd) -> ResultEngine<Transaction> {
        let amount = validate_amount(cmd.amount_minor)?;
        let description = normalize_required_text(&cmd.description, "Description")?;
        let category = normalize_required_text(&cmd.category, "Category")?;
        let now = Utc::now().trunc_subsecs(0);

        let tx = Transaction {
            id: Uuid::new_v4(),
            user_id: cmd.user_id,
            kind: cmd.kind,
            amount,
            description,
            category,
            date: cmd.date,
            notes: normalize_optional_text(cmd.notes.as_deref()).unwrap_or_default(),
            tags: normalize_tags(cmd.tags),
            created_at: now,
            updated_at: now,
        };

        with_tx!(self, |db_tx| {
            users::Entity::find_by_id(cmd.user_id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::NotFound("User not found".to_string()))?;

            let model: transactions::ActiveModel = (&tx).into();
            model.insert(&db_tx).await?;
            tracing::debug!(transaction = %tx.id, user = %tx.user_id, "transaction created");
            Ok(tx)
        })
    }

    /// Fetch one transaction owned by `user_id`.
    pub async fn transaction(&self, user_id: Uuid, transaction_id: &str) -> ResultEngine<Transaction> {
        let id = parse_uuid(transaction_id, "Transaction")?;
        let model = transactions::Entity::find_by_id(id.to_string())
            .filter(transactions::Column::UserId.eq(user_id.to_string()))
            .one(&self.database)
            .await?
            .ok_or_else(not_found)?;
        Transaction::try_from(model)
    }

    /// Apply `patch` to a transaction owned by `user_id`.
    ///
    /// `updated_at` only moves when a field actually changes, so replaying the
    /// same patch leaves the record untouched.
    pub async fn update_transaction(
        &self,
        user_id: Uuid,
        transaction_id: &str,
        patch: TransactionPatch,
    ) -> ResultEngine<Transaction> {
        let id = parse_uuid(transaction_id, "Transaction")?;
        let amount = patch.amount_minor.map(validate_amount).transpose()?;
        let description = patch
            .description
            .as_deref()
            .map(|d| normalize_required_text(d, "Description"))
            .transpose()?;
        let category = patch
            .category
            .as_deref()
            .map(|c| normalize_required_text(c, "Category"))
            .transpose()?;

        with_tx!(self, |db_tx| {
            let model = transactions::Entity::find_by_id(id.to_string())
                .filter(transactions::Column::UserId.eq(user_id.to_string()))
                .one(&db_tx)
                .await?
                .ok_or_else(not_found)?;
            let current = Transaction::try_from(model)?;

            let mut next = current.clone();
            if let Some(kind) = patch.kind {
                next.kind = kind;
            }
            if let Some(amount) = amount {
                next.amount = amount;
            }
            if let Some(description) = description {
                next.description = description;
            }
            if let Some(category) = category {
                next.category = category;
            }
            if let Some(date) = patch.date {
                next.date = date;
            }
            if let Some(notes) = patch.notes.as_deref() {
                next.notes = notes.trim().to_string();
            }
            if let Some(tags) = patch.tags {
                next.tags = normalize_tags(tags);
            }

            if next == current {
                return Ok(current);
            }
            next.updated_at = Utc::now().trunc_subsecs(0);

            let active: transactions::ActiveModel = (&next).into();
            active.update(&db_tx).await?;
            Ok(next)
        })
    }

    /// Delete a transaction owned by `user_id`.
    pub async fn delete_transaction(&self, user_id: Uuid, transaction_id: &str) -> ResultEngine<()> {
        let id = parse_uuid(transaction_id, "Transaction")?;
        let result = transactions::Entity::delete_many()
            .filter(transactions::Column::Id.eq(id.to_string()))
            .filter(transactions::Column::UserId.eq(user_id.to_string()))
            .exec(&self.database)
            .await?;
        if result.rows_affected == 0 {
            return Err(not_found());
        }
        Ok(())
    }

    /// One page of `query`, plus the total number of matches.
    pub async fn list_transactions(
        &self,
        query: &TransactionQuery,
        page: PageRequest,
    ) -> ResultEngine<Page<Transaction>> {
        let select = transactions::Entity::find().filter(query.condition());
        let total = select.clone().count(&self.database).await?;
        if page.is_past_end(total) {
            return Ok(Page::empty(page, total));
        }
        let models = query
            .apply_order(select)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.database)
            .await?;
        let items = models
            .into_iter()
            .map(Transaction::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;
        Ok(Page {
            items,
            meta: PageMeta::new(page, total),
        })
    }

    /// Every match of `query`, in its sort order.
    pub async fn query_transactions(&self, query: &TransactionQuery) -> ResultEngine<Vec<Transaction>> {
        let models = query
            .apply_order(transactions::Entity::find().filter(query.condition()))
            .all(&self.database)
            .await?;
        models.into_iter().map(Transaction::try_from).collect()
    }

    /// Totals per type and category rankings over `query`.
    pub async fn transaction_stats(&self, query: &TransactionQuery) -> ResultEngine<TransactionStats> {
        let txs = self.query_transactions(query).await?;
        Ok(aggregation::transaction_stats(&txs))
    }
}
