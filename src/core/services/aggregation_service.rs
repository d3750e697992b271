//! Grouping and totaling over transaction snapshots.
//!
//! All bucketing flows through [`crate::period`]; no function here derives
//! keys independently, so filters and groupings can never disagree about
//! which bucket a transaction belongs to.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::Transaction;
use crate::period::{self, PeriodKind};

/// Income/expense totals for one period bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PeriodTotals {
    pub income: f64,
    pub expenses: f64,
}

impl PeriodTotals {
    pub fn net(&self) -> f64 {
        self.income - self.expenses
    }
}

/// Pure grouping and totaling functions over transaction slices.
pub struct AggregationService;

impl AggregationService {
    /// Groups transactions into period buckets, summing income and expenses
    /// separately. Sums are not rounded; rounding happens at display time.
    pub fn group_by_period(
        transactions: &[Transaction],
        kind: PeriodKind,
    ) -> BTreeMap<String, PeriodTotals> {
        let mut grouped: BTreeMap<String, PeriodTotals> = BTreeMap::new();
        for txn in transactions {
            let key = period::key_for(kind, txn.civil_date());
            let totals = grouped.entry(key).or_default();
            if txn.is_income() {
                totals.income += sanitized(txn.amount);
            } else {
                totals.expenses += sanitized(txn.amount);
            }
        }
        grouped
    }

    /// Groups transactions into period buckets, keeping the member lists.
    /// The list form feeds per-period category breakdowns.
    pub fn bucket_by_period<'a>(
        transactions: &'a [Transaction],
        kind: PeriodKind,
    ) -> BTreeMap<String, Vec<&'a Transaction>> {
        let mut buckets: BTreeMap<String, Vec<&Transaction>> = BTreeMap::new();
        for txn in transactions {
            let key = period::key_for(kind, txn.civil_date());
            buckets.entry(key).or_default().push(txn);
        }
        buckets
    }

    /// Expense totals per category. Income is excluded; transactions without
    /// a category count under `Other`.
    pub fn category_totals<'a, I>(transactions: I) -> BTreeMap<String, f64>
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let mut totals: BTreeMap<String, f64> = BTreeMap::new();
        for txn in transactions {
            if !txn.is_expense() {
                continue;
            }
            *totals.entry(txn.bucket().to_string()).or_default() += sanitized(txn.amount);
        }
        totals
    }

    /// Sum of all expense amounts in the given transactions.
    pub fn total_spending<'a, I>(transactions: I) -> f64
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        transactions
            .into_iter()
            .filter(|txn| txn.is_expense())
            .map(|txn| sanitized(txn.amount))
            .sum()
    }

    /// Transactions whose derived key of the given granularity equals `key`.
    pub fn filter_by_period<'a>(
        transactions: &'a [Transaction],
        kind: PeriodKind,
        key: &str,
    ) -> Vec<&'a Transaction> {
        transactions
            .iter()
            .filter(|txn| period::key_for(kind, txn.civil_date()) == key)
            .collect()
    }

    /// Expense categories ranked by descending amount. Equal amounts keep
    /// ascending category-name order so rankings are reproducible.
    pub fn ranked_categories(transactions: &[Transaction]) -> Vec<(String, f64)> {
        let mut ranked: Vec<(String, f64)> =
            Self::category_totals(transactions).into_iter().collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked
    }
}

/// Amounts must be positive and finite; anything else contributes zero so a
/// bad record cannot poison an aggregate.
fn sanitized(amount: f64) -> f64 {
    if amount.is_finite() && amount > 0.0 {
        amount
    } else {
        tracing::debug!(amount, "ignoring non-positive or non-finite amount");
        0.0
    }
}
