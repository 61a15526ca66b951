//! Query Builder: turns list/report filter parameters into one
//! [`TransactionQuery`] that can run against the store (as a sea-orm
//! `Condition` plus ordering) or in memory (as a predicate plus comparator).
//!
//! Both renderings are derived from the same fields so the sample data path
//! and the store path agree on what a filter means.

use std::cmp::Ordering;

use chrono::NaiveDate;
use sea_orm::{
    ColumnTrait, Condition, Order, QueryOrder,
    sea_query::{Expr, Func, LikeExpr, SimpleExpr},
};
use uuid::Uuid;

use crate::{
    Transaction, TransactionType, transactions,
    util::{escape_like, normalize_optional_text},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Date,
    Amount,
    Description,
    Category,
    Type,
    CreatedAt,
}

impl SortKey {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "date" => Some(Self::Date),
            "amount" => Some(Self::Amount),
            "description" => Some(Self::Description),
            "category" => Some(Self::Category),
            "type" => Some(Self::Type),
            "createdAt" => Some(Self::CreatedAt),
            _ => None,
        }
    }

    fn column(self) -> transactions::Column {
        match self {
            Self::Date => transactions::Column::Date,
            Self::Amount => transactions::Column::AmountMinor,
            Self::Description => transactions::Column::Description,
            Self::Category => transactions::Column::Category,
            Self::Type => transactions::Column::Kind,
            Self::CreatedAt => transactions::Column::CreatedAt,
        }
    }

    fn compare(self, a: &Transaction, b: &Transaction) -> Ordering {
        match self {
            Self::Date => a.date.cmp(&b.date),
            Self::Amount => a.amount.cmp(&b.amount),
            Self::Description => a.description.cmp(&b.description),
            Self::Category => a.category.cmp(&b.category),
            Self::Type => a.kind.as_str().cmp(b.kind.as_str()),
            Self::CreatedAt => a.created_at.cmp(&b.created_at),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// `desc` (any case) is descending; any other supplied value is ascending.
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("desc") {
            Self::Desc
        } else {
            Self::Asc
        }
    }

    fn order(self) -> Order {
        match self {
            Self::Asc => Order::Asc,
            Self::Desc => Order::Desc,
        }
    }
}

/// Owner-scoped transaction filter and sort order.
///
/// The owner is fixed at construction and has no setter: every query built
/// from user input is scoped to the acting user.
#[derive(Clone, Debug, PartialEq)]
pub struct TransactionQuery {
    owner_id: Uuid,
    /// Allow-list of types; an empty list matches nothing.
    kinds: Option<Vec<TransactionType>>,
    /// Lower-cased substring matched against the category.
    category: Option<String>,
    /// Lower-cased substring matched against description, notes or category.
    search: Option<String>,
    /// Exact category names to keep.
    categories_in: Option<Vec<String>>,
    /// Exact category names to drop.
    categories_not_in: Vec<String>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    sort_key: SortKey,
    sort_order: SortOrder,
}

impl TransactionQuery {
    #[must_use]
    pub fn new(owner_id: Uuid) -> Self {
        Self {
            owner_id,
            kinds: None,
            category: None,
            search: None,
            categories_in: None,
            categories_not_in: Vec::new(),
            start_date: None,
            end_date: None,
            sort_key: SortKey::default(),
            sort_order: SortOrder::default(),
        }
    }

    pub fn owner_id(&self) -> Uuid {
        self.owner_id
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    #[must_use]
    pub fn kind(mut self, kind: TransactionType) -> Self {
        self.kinds = Some(vec![kind]);
        self
    }

    /// Apply a raw `type` parameter. Values other than `income`/`expense`
    /// are ignored.
    #[must_use]
    pub fn kind_param(self, raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return self;
        };
        match TransactionType::try_from(raw) {
            Ok(kind) => self.kind(kind),
            Err(_) => {
                tracing::debug!("ignoring unknown type filter {raw:?}");
                self
            }
        }
    }

    #[must_use]
    pub fn kinds(mut self, kinds: Vec<TransactionType>) -> Self {
        self.kinds = Some(kinds);
        self
    }

    #[must_use]
    pub fn category(mut self, category: Option<&str>) -> Self {
        self.category = normalize_optional_text(category).map(|s| s.to_lowercase());
        self
    }

    #[must_use]
    pub fn search(mut self, search: Option<&str>) -> Self {
        self.search = normalize_optional_text(search).map(|s| s.to_lowercase());
        self
    }

    #[must_use]
    pub fn categories_in(mut self, categories: Vec<String>) -> Self {
        self.categories_in = (!categories.is_empty()).then_some(categories);
        self
    }

    #[must_use]
    pub fn categories_not_in(mut self, categories: Vec<String>) -> Self {
        self.categories_not_in = categories;
        self
    }

    #[must_use]
    pub fn start_date(mut self, date: Option<NaiveDate>) -> Self {
        self.start_date = date;
        self
    }

    #[must_use]
    pub fn end_date(mut self, date: Option<NaiveDate>) -> Self {
        self.end_date = date;
        self
    }

    #[must_use]
    pub fn sort(mut self, key: SortKey, order: SortOrder) -> Self {
        self.sort_key = key;
        self.sort_order = order;
        self
    }

    /// Apply raw `sortBy`/`sortOrder` parameters; unknown keys fall back to
    /// `date`, absent order to descending.
    #[must_use]
    pub fn sort_params(self, sort_by: Option<&str>, sort_order: Option<&str>) -> Self {
        let key = match sort_by.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => SortKey::parse(raw).unwrap_or_else(|| {
                tracing::debug!("unknown sort key {raw:?}, sorting by date");
                SortKey::Date
            }),
            None => SortKey::Date,
        };
        let order = sort_order
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(SortOrder::parse)
            .unwrap_or_default();
        self.sort(key, order)
    }

    /// In-memory predicate, equivalent to [`Self::condition`].
    pub fn matches(&self, tx: &Transaction) -> bool {
        if tx.user_id != self.owner_id {
            return false;
        }
        if let Some(kinds) = &self.kinds
            && !kinds.contains(&tx.kind)
        {
            return false;
        }
        if let Some(needle) = &self.category
            && !contains_ci(&tx.category, needle)
        {
            return false;
        }
        if let Some(needle) = &self.search
            && !(contains_ci(&tx.description, needle)
                || contains_ci(&tx.notes, needle)
                || contains_ci(&tx.category, needle))
        {
            return false;
        }
        if let Some(allowed) = &self.categories_in
            && !allowed.contains(&tx.category)
        {
            return false;
        }
        if self.categories_not_in.contains(&tx.category) {
            return false;
        }
        if self.start_date.is_some_and(|start| tx.date < start) {
            return false;
        }
        if self.end_date.is_some_and(|end| tx.date > end) {
            return false;
        }
        true
    }

    /// In-memory comparator, equivalent to [`Self::apply_order`]. Ties on the
    /// sort key are broken by id in the same direction.
    pub fn compare(&self, a: &Transaction, b: &Transaction) -> Ordering {
        let ordering = self
            .sort_key
            .compare(a, b)
            .then_with(|| a.id.to_string().cmp(&b.id.to_string()));
        match self.sort_order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }

    /// Filter and sort an in-memory set.
    pub fn apply(&self, items: impl IntoIterator<Item = Transaction>) -> Vec<Transaction> {
        let mut out: Vec<Transaction> = items.into_iter().filter(|tx| self.matches(tx)).collect();
        out.sort_by(|a, b| self.compare(a, b));
        out
    }

    /// Store-side filter.
    pub(crate) fn condition(&self) -> Condition {
        let mut cond =
            Condition::all().add(transactions::Column::UserId.eq(self.owner_id.to_string()));

        if let Some(kinds) = &self.kinds {
            cond = cond.add(transactions::Column::Kind.is_in(kinds.iter().map(|k| k.as_str())));
        }
        if let Some(needle) = &self.category {
            cond = cond.add(like_ci(transactions::Column::Category, needle));
        }
        if let Some(needle) = &self.search {
            cond = cond.add(
                Condition::any()
                    .add(like_ci(transactions::Column::Description, needle))
                    .add(like_ci(transactions::Column::Notes, needle))
                    .add(like_ci(transactions::Column::Category, needle)),
            );
        }
        if let Some(allowed) = &self.categories_in {
            cond = cond.add(transactions::Column::Category.is_in(allowed.clone()));
        }
        if !self.categories_not_in.is_empty() {
            cond = cond.add(transactions::Column::Category.is_not_in(self.categories_not_in.clone()));
        }
        if let Some(start) = self.start_date {
            cond = cond.add(transactions::Column::Date.gte(start));
        }
        if let Some(end) = self.end_date {
            cond = cond.add(transactions::Column::Date.lte(end));
        }
        cond
    }

    /// Store-side ordering.
    pub(crate) fn apply_order<Q: QueryOrder>(&self, query: Q) -> Q {
        let order = self.sort_order.order();
        query
            .order_by(self.sort_key.column(), order.clone())
            .order_by(transactions::Column::Id, order)
    }
}

fn contains_ci(haystack: &str, lowered_needle: &str) -> bool {
    haystack.to_lowercase().contains(lowered_needle)
}

/// Case-insensitive substring match; `lowered_needle` must already be
/// lower-cased.
pub(crate) fn like_ci<C: ColumnTrait>(column: C, lowered_needle: &str) -> SimpleExpr {
    let pattern = format!("%{}%", escape_like(lowered_needle));
    Expr::expr(Func::lower(Expr::col(column))).like(LikeExpr::new(pattern).escape('\\'))
}
