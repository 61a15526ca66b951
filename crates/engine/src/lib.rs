//! Domain engine of the finance tracker.
//!
//! Pure building blocks ([`query`], [`pagination`], [`aggregation`],
//! [`summary`], [`export`]) operate on [`Transaction`] values; [`Engine`]
//! runs them against the store with every query scoped to one owner.

pub use commands::{NewTransactionCmd, NewUserCmd, ProfilePatch, ReportSpec, TransactionPatch};
pub use error::EngineError;
pub use money::MoneyCents;
pub use ops::{DEMO_USERS, DashboardOverview, DemoUser, Engine, EngineBuilder, ExpenseReport, ProfitLoss};
pub use pagination::{Page, PageMeta, PageRequest};
pub use query::{SortKey, SortOrder, TransactionQuery};
pub use transactions::{Transaction, TransactionType};
pub use users::{Role, User};
pub use util::{is_valid_email, parse_date, parse_optional_date};

pub mod aggregation;
mod commands;
mod error;
pub mod export;
mod money;
mod ops;
pub mod pagination;
pub mod query;
pub mod sample;
pub mod summary;
pub mod transactions;
pub mod users;
mod util;

pub type ResultEngine<T> = Result<T, EngineError>;
