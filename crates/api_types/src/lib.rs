//! Wire types for the Ledgerboard HTTP API.
//!
//! Field names follow the camelCase convention the dashboard client expects.
//! Monetary values travel as integer minor units (`amount_minor`, cents).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

/// Pagination metadata returned next to every paged list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u64,
    pub total_pages: u64,
    pub total_items: u64,
    pub items_per_page: u64,
}

/// Generic error body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Generic message body.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

pub mod auth {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Login {
        pub email: Option<String>,
        pub password: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Register {
        pub name: Option<String>,
        pub email: Option<String>,
        pub password: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AuthResponse {
        pub token: String,
        pub user: super::user::UserView,
    }
}

pub mod user {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct UserView {
        pub id: String,
        pub name: String,
        pub email: String,
        pub role: Role,
        pub avatar: Option<String>,
        pub created_at: DateTime<Utc>,
    }

    /// Partial profile update.
    ///
    /// `avatar` distinguishes "absent" (keep) from `null` (clear).
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ProfileUpdate {
        pub name: Option<String>,
        pub email: Option<String>,
        #[serde(default, with = "double_option")]
        pub avatar: Option<Option<String>>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct UserListQuery {
        pub page: Option<String>,
        pub limit: Option<String>,
        pub search: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserListResponse {
        pub users: Vec<UserView>,
        pub pagination: Pagination,
    }

    mod double_option {
        use serde::{Deserialize, Deserializer, Serialize, Serializer};

        pub fn serialize<S>(value: &Option<Option<String>>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match value {
                Some(inner) => inner.serialize(serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
        where
            D: Deserializer<'de>,
        {
            Option::<String>::deserialize(deserializer).map(Some)
        }
    }
}

pub mod transaction {
    use super::*;

    /// Query string accepted by `GET /transactions` and `GET /transactions/sample`.
    ///
    /// Everything is optional and kept as raw strings: invalid values are
    /// coerced or ignored rather than rejected.
    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionListQuery {
        pub page: Option<String>,
        pub limit: Option<String>,
        #[serde(rename = "type")]
        pub kind: Option<String>,
        pub category: Option<String>,
        pub search: Option<String>,
        pub start_date: Option<String>,
        pub end_date: Option<String>,
        pub sort_by: Option<String>,
        pub sort_order: Option<String>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionView {
        pub id: String,
        pub user_id: String,
        #[serde(rename = "type")]
        pub kind: TransactionType,
        pub amount_minor: i64,
        pub description: String,
        pub category: String,
        pub date: NaiveDate,
        pub notes: String,
        pub tags: Vec<String>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionListResponse {
        pub transactions: Vec<TransactionView>,
        pub pagination: Pagination,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionNew {
        #[serde(rename = "type")]
        pub kind: Option<String>,
        pub amount_minor: Option<i64>,
        pub description: Option<String>,
        pub category: Option<String>,
        pub date: Option<String>,
        pub tags: Option<Vec<String>>,
        pub notes: Option<String>,
    }

    /// Partial update; only present fields change.
    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionUpdate {
        #[serde(rename = "type")]
        pub kind: Option<String>,
        pub amount_minor: Option<i64>,
        pub description: Option<String>,
        pub category: Option<String>,
        pub date: Option<String>,
        pub tags: Option<Vec<String>>,
        pub notes: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct DateRangeQuery {
        pub start_date: Option<String>,
        pub end_date: Option<String>,
    }
}

pub mod stats {
    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TypeStat {
        #[serde(rename = "type")]
        pub kind: TransactionType,
        pub total: i64,
        pub count: u64,
        pub avg_amount: f64,
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    pub struct CategoryStat {
        pub name: String,
        pub total: i64,
        pub count: u64,
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    pub struct TypeCategoryStats {
        #[serde(rename = "type")]
        pub kind: TransactionType,
        pub categories: Vec<CategoryStat>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct StatsResponse {
        pub stats: Vec<TypeStat>,
        pub category_stats: Vec<TypeCategoryStats>,
    }
}

pub mod dashboard {
    use super::*;

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct PeriodQuery {
        pub period: Option<String>,
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Overview {
        pub total_revenue: i64,
        pub total_expenses: i64,
        pub net_profit: i64,
        pub profit_margin: f64,
        pub revenue_growth: f64,
        pub expense_growth: f64,
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    pub struct PeriodRow {
        pub period: String,
        pub label: String,
        pub revenue: i64,
        pub expenses: i64,
        pub profit: i64,
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    pub struct CategorySlice {
        pub name: String,
        pub value: i64,
        pub color: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct OverviewResponse {
        pub overview: Overview,
        pub monthly_data: Vec<PeriodRow>,
        pub category_breakdown: Vec<CategorySlice>,
        pub expense_categories: Vec<CategorySlice>,
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    pub struct RevenuePoint {
        pub period: String,
        pub label: String,
        pub revenue: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RevenueResponse {
        pub data: Vec<RevenuePoint>,
        pub period: String,
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    pub struct CategoryTotal {
        pub name: String,
        pub total: i64,
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    pub struct ExpensePoint {
        pub period: String,
        pub label: String,
        pub expenses: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpensesResponse {
        pub categories: Vec<CategoryTotal>,
        pub monthly: Vec<ExpensePoint>,
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProfitLossSummary {
        pub total_revenue: i64,
        pub total_expenses: i64,
        pub net_profit: i64,
        pub profit_margin: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProfitLossResponse {
        pub monthly: Vec<PeriodRow>,
        pub summary: ProfitLossSummary,
    }
}

pub mod export {
    use super::*;

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ExportQuery {
        #[serde(rename = "type")]
        pub kind: Option<String>,
        pub category: Option<String>,
        pub search: Option<String>,
        pub start_date: Option<String>,
        pub end_date: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ReportRequest {
        pub start_date: Option<String>,
        pub end_date: Option<String>,
        pub format: Option<String>,
        pub include_categories: Option<Vec<String>>,
        pub exclude_categories: Option<Vec<String>>,
        pub types: Option<Vec<String>>,
    }
}
