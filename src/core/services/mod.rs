pub mod aggregation_service;
pub mod budget_service;
pub mod insight_service;
pub mod transaction_service;

pub use aggregation_service::{AggregationService, PeriodTotals};
pub use budget_service::{BudgetService, BudgetStanding, BudgetStatus};
pub use insight_service::InsightService;
pub use transaction_service::TransactionService;

use crate::errors::TrackerError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Tracker(#[from] TrackerError),
    #[error("{0}")]
    Invalid(String),
}
