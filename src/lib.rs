#![doc(test(attr(deny(warnings))))]

//! fintrack_core offers the period bucketing, aggregation, budget
//! resolution, and insight generation primitives that power a personal
//! finance tracker. The analytics surface is a pure-function library over
//! caller-supplied snapshots; persistence lives behind
//! [`storage::StorageBackend`].

pub mod core;
pub mod domain;
pub mod errors;
pub mod period;
pub mod storage;
pub mod time;
pub mod tracker;
pub mod utils;

use std::sync::Once;

pub use crate::core::services::{
    AggregationService, BudgetService, BudgetStanding, BudgetStatus, InsightService, PeriodTotals,
    ServiceError, ServiceResult, TransactionService,
};
pub use crate::domain::{Budget, Insight, InsightKind, Transaction, TransactionKind};
pub use crate::errors::TrackerError;
pub use crate::period::PeriodKind;
pub use crate::storage::{JsonStorage, StorageBackend};
pub use crate::time::{Clock, SystemClock};
pub use crate::tracker::Tracker;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("fintrack_core tracing initialized.");
    });
}
