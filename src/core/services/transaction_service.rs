//! Business logic helpers for managing transactions.

use uuid::Uuid;

use crate::core::services::{ServiceError, ServiceResult};
use crate::domain::{Transaction, TransactionKind};
use crate::tracker::Tracker;

/// Provides validated CRUD helpers for tracker transactions.
pub struct TransactionService;

impl TransactionService {
    /// Adds a new transaction and returns its identifier.
    pub fn add(tracker: &mut Tracker, transaction: Transaction) -> ServiceResult<Uuid> {
        Self::validate(&transaction)?;
        Ok(tracker.add_transaction(transaction))
    }

    /// Updates the transaction identified by `id` via the provided mutator.
    /// The mutated transaction is validated before it replaces the stored
    /// one.
    pub fn update<F>(tracker: &mut Tracker, id: Uuid, mutator: F) -> ServiceResult<()>
    where
        F: FnOnce(&mut Transaction),
    {
        let mut updated = tracker
            .transaction(id)
            .cloned()
            .ok_or_else(|| ServiceError::Invalid("Transaction not found".into()))?;
        mutator(&mut updated);
        Self::validate(&updated)?;
        if let Some(slot) = tracker.transaction_mut(id) {
            *slot = updated;
        }
        tracker.touch();
        Ok(())
    }

    /// Removes the transaction identified by `id`, returning the removed
    /// instance.
    pub fn remove(tracker: &mut Tracker, id: Uuid) -> ServiceResult<Transaction> {
        tracker
            .remove_transaction(id)
            .ok_or_else(|| ServiceError::Invalid("Transaction not found".into()))
    }

    /// Returns a snapshot of the tracker's transactions.
    pub fn list(tracker: &Tracker) -> Vec<&Transaction> {
        tracker.transactions.iter().collect()
    }

    fn validate(transaction: &Transaction) -> ServiceResult<()> {
        if !transaction.amount.is_finite() || transaction.amount <= 0.0 {
            return Err(ServiceError::Invalid(
                "Transaction amount must be positive".into(),
            ));
        }
        if transaction.kind == TransactionKind::Expense
            && transaction
                .category
                .as_deref()
                .map_or(true, |category| category.trim().is_empty())
        {
            return Err(ServiceError::Invalid(
                "Expense transactions require a category".into(),
            ));
        }
        Ok(())
    }
}
