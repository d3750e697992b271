//! Budget resolution, budget-vs-actual math, and validated budget CRUD.

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::core::services::{ServiceError, ServiceResult};
use crate::domain::category::OVERALL_CATEGORY;
use crate::domain::{Budget, Transaction, RECURRING_PERIOD_KEY};
use crate::period::{self, PeriodKind};
use crate::tracker::Tracker;

use super::AggregationService;

/// Resolves which budgets bind a category/period combination and how much
/// of each has been consumed.
pub struct BudgetService;

impl BudgetService {
    /// Adds a validated budget and returns its identifier. Recurring
    /// budgets are normalized to the sentinel period key.
    pub fn add(tracker: &mut Tracker, mut budget: Budget) -> ServiceResult<Uuid> {
        if budget.is_recurring {
            budget.period_key = RECURRING_PERIOD_KEY.to_string();
        }
        Self::validate(&budget)?;
        Ok(tracker.add_budget(budget))
    }

    /// Updates the budget identified by `id` via the provided mutator. The
    /// mutated budget is validated before it replaces the stored one.
    pub fn update<F>(tracker: &mut Tracker, id: Uuid, mutator: F) -> ServiceResult<()>
    where
        F: FnOnce(&mut Budget),
    {
        let mut updated = tracker
            .budget(id)
            .cloned()
            .ok_or_else(|| ServiceError::Invalid("Budget not found".into()))?;
        mutator(&mut updated);
        if updated.is_recurring {
            updated.period_key = RECURRING_PERIOD_KEY.to_string();
        }
        Self::validate(&updated)?;
        if let Some(slot) = tracker.budget_mut(id) {
            *slot = updated;
        }
        tracker.touch();
        Ok(())
    }

    /// Removes the budget identified by `id`, returning the removed instance.
    pub fn remove(tracker: &mut Tracker, id: Uuid) -> ServiceResult<Budget> {
        tracker
            .remove_budget(id)
            .ok_or_else(|| ServiceError::Invalid("Budget not found".into()))
    }

    /// Returns a snapshot of the tracker's budgets.
    pub fn list(tracker: &Tracker) -> Vec<&Budget> {
        tracker.budgets.iter().collect()
    }

    /// Finds the budget binding `(category, period, period_key)`.
    ///
    /// An exact non-recurring match wins unconditionally; otherwise a
    /// recurring budget for the same category and granularity acts as the
    /// fallback template.
    pub fn resolve<'a>(
        budgets: &'a [Budget],
        category: &str,
        period: PeriodKind,
        period_key: &str,
    ) -> Option<&'a Budget> {
        budgets
            .iter()
            .find(|budget| {
                !budget.is_recurring
                    && budget.category == category
                    && budget.period == period
                    && budget.period_key == period_key
            })
            .or_else(|| {
                budgets.iter().find(|budget| {
                    budget.is_recurring && budget.category == category && budget.period == period
                })
            })
    }

    /// Every budget constraint in force for one period instance:
    /// non-recurring budgets pinned to it, plus recurring budgets of the
    /// same granularity for categories not already covered. Recurring
    /// entries are returned with the queried key materialized.
    pub fn resolve_active(budgets: &[Budget], period: PeriodKind, period_key: &str) -> Vec<Budget> {
        let mut active: Vec<Budget> = budgets
            .iter()
            .filter(|budget| {
                !budget.is_recurring
                    && budget.period == period
                    && budget.period_key == period_key
            })
            .cloned()
            .collect();
        for recurring in budgets
            .iter()
            .filter(|budget| budget.is_recurring && budget.period == period)
        {
            if active.iter().any(|budget| budget.category == recurring.category) {
                continue;
            }
            let mut materialized = recurring.clone();
            materialized.period_key = period_key.to_string();
            active.push(materialized);
        }
        active
    }

    /// All recurring budget templates.
    pub fn recurring(budgets: &[Budget]) -> Vec<&Budget> {
        budgets.iter().filter(|budget| budget.is_recurring).collect()
    }

    /// The concrete period key a budget binds to on the given day:
    /// recurring budgets bind to the current period of their granularity.
    pub fn effective_period_key(budget: &Budget, today: NaiveDate) -> String {
        if budget.is_recurring {
            period::key_for(budget.period, today)
        } else {
            budget.period_key.clone()
        }
    }

    /// Spending attributable to a budget category within one period.
    ///
    /// The `Overall` sentinel sums every category's expenses; any other
    /// category reads its bucket from the category totals, so uncategorized
    /// spending counts under `Other`.
    pub fn spending(
        transactions: &[Transaction],
        category: &str,
        period: PeriodKind,
        period_key: &str,
    ) -> f64 {
        let in_period = AggregationService::filter_by_period(transactions, period, period_key);
        if category == OVERALL_CATEGORY {
            AggregationService::total_spending(in_period)
        } else {
            AggregationService::category_totals(in_period)
                .get(category)
                .copied()
                .unwrap_or(0.0)
        }
    }

    /// Percentage of a budget consumed. Zero when the budget amount is not
    /// positive, never infinite or NaN.
    pub fn percent_used(spending: f64, amount: f64) -> f64 {
        if amount > 0.0 {
            spending / amount * 100.0
        } else {
            0.0
        }
    }

    /// Budget-vs-actual view for every stored budget, anchored at `today`
    /// for recurring templates.
    pub fn with_spending(
        budgets: &[Budget],
        transactions: &[Transaction],
        today: NaiveDate,
    ) -> Vec<BudgetStanding> {
        budgets
            .iter()
            .map(|budget| {
                let key = Self::effective_period_key(budget, today);
                let spending =
                    Self::spending(transactions, &budget.category, budget.period, &key);
                let percent_used = Self::percent_used(spending, budget.amount);
                BudgetStanding {
                    budget: budget.clone(),
                    period_key: key,
                    spending,
                    percent_used,
                    status: BudgetStatus::from_percent(percent_used),
                }
            })
            .collect()
    }

    fn validate(budget: &Budget) -> ServiceResult<()> {
        if !budget.amount.is_finite() || budget.amount <= 0.0 {
            return Err(ServiceError::Invalid(
                "Budget amount must be positive".into(),
            ));
        }
        if budget.category.trim().is_empty() {
            return Err(ServiceError::Invalid("Budget category is required".into()));
        }
        if !budget.is_recurring {
            period::range_for(budget.period, &budget.period_key)?;
        }
        Ok(())
    }
}

/// One budget with its consumption for a concrete period instance.
#[derive(Debug, Clone, Serialize)]
pub struct BudgetStanding {
    pub budget: Budget,
    /// Concrete key the standing was computed against (materialized for
    /// recurring budgets).
    pub period_key: String,
    pub spending: f64,
    pub percent_used: f64,
    pub status: BudgetStatus,
}

/// Severity ladder for budget consumption. Boundary values belong to the
/// higher bucket.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum BudgetStatus {
    Nominal,
    Notice,
    Alert,
    Warning,
    Exceeded,
}

impl BudgetStatus {
    pub fn from_percent(percent: f64) -> Self {
        if percent >= 100.0 {
            BudgetStatus::Exceeded
        } else if percent >= 95.0 {
            BudgetStatus::Warning
        } else if percent >= 90.0 {
            BudgetStatus::Alert
        } else if percent >= 75.0 {
            BudgetStatus::Notice
        } else {
            BudgetStatus::Nominal
        }
    }
}
