//! The `Tracker` aggregate: one named snapshot of transactions and budgets.
//!
//! Analytics services take immutable slices of these collections, so every
//! computation runs over a consistent snapshot with persistence handled
//! entirely by the storage layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Budget, Insight, Transaction};
use crate::time::Clock;

const CURRENT_SCHEMA_VERSION: u8 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tracker {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub budgets: Vec<Budget>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "Tracker::schema_version_default")]
    pub schema_version: u8,
}

impl Tracker {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            transactions: Vec::new(),
            budgets: Vec::new(),
            created_at: now,
            updated_at: now,
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    pub fn add_transaction(&mut self, transaction: Transaction) -> Uuid {
        let id = transaction.id;
        self.transactions.push(transaction);
        self.touch();
        id
    }

    pub fn transaction(&self, id: Uuid) -> Option<&Transaction> {
        self.transactions.iter().find(|txn| txn.id == id)
    }

    pub fn transaction_mut(&mut self, id: Uuid) -> Option<&mut Transaction> {
        self.transactions.iter_mut().find(|txn| txn.id == id)
    }

    pub fn remove_transaction(&mut self, id: Uuid) -> Option<Transaction> {
        let index = self.transactions.iter().position(|txn| txn.id == id)?;
        let removed = self.transactions.remove(index);
        self.touch();
        Some(removed)
    }

    pub fn add_budget(&mut self, budget: Budget) -> Uuid {
        let id = budget.id;
        self.budgets.push(budget);
        self.touch();
        id
    }

    pub fn budget(&self, id: Uuid) -> Option<&Budget> {
        self.budgets.iter().find(|budget| budget.id == id)
    }

    pub fn budget_mut(&mut self, id: Uuid) -> Option<&mut Budget> {
        self.budgets.iter_mut().find(|budget| budget.id == id)
    }

    pub fn remove_budget(&mut self, id: Uuid) -> Option<Budget> {
        let index = self.budgets.iter().position(|budget| budget.id == id)?;
        let removed = self.budgets.remove(index);
        self.touch();
        Some(removed)
    }

    /// Sum of all income amounts.
    pub fn total_income(&self) -> f64 {
        self.transactions
            .iter()
            .filter(|txn| txn.is_income())
            .map(|txn| txn.amount)
            .sum()
    }

    /// Sum of all expense amounts.
    pub fn total_expenses(&self) -> f64 {
        self.transactions
            .iter()
            .filter(|txn| txn.is_expense())
            .map(|txn| txn.amount)
            .sum()
    }

    /// Income minus expenses over the whole history.
    pub fn net(&self) -> f64 {
        self.total_income() - self.total_expenses()
    }

    /// Regenerates the insight feed anchored at the clock's current date.
    pub fn insights_with(&self, clock: &dyn Clock) -> Vec<Insight> {
        crate::core::services::InsightService::generate(
            &self.transactions,
            &self.budgets,
            clock.today(),
        )
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }
}
