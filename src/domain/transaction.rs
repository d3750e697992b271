use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::category::effective_category;
use crate::domain::common::{Displayable, Identifiable};

/// A single recorded income or expense.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub kind: TransactionKind,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub date: DateTime<Utc>,
}

impl Transaction {
    pub fn new(
        kind: TransactionKind,
        amount: f64,
        category: Option<String>,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            amount,
            category,
            place: None,
            description: None,
            date,
        }
    }

    pub fn income(amount: f64, category: impl Into<String>, date: DateTime<Utc>) -> Self {
        Self::new(TransactionKind::Income, amount, Some(category.into()), date)
    }

    pub fn expense(amount: f64, category: impl Into<String>, date: DateTime<Utc>) -> Self {
        Self::new(TransactionKind::Expense, amount, Some(category.into()), date)
    }

    pub fn with_place(mut self, place: impl Into<String>) -> Self {
        self.place = Some(place.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn is_expense(&self) -> bool {
        matches!(self.kind, TransactionKind::Expense)
    }

    pub fn is_income(&self) -> bool {
        matches!(self.kind, TransactionKind::Income)
    }

    /// Category bucket this transaction aggregates under.
    pub fn bucket(&self) -> &str {
        effective_category(self.category.as_deref())
    }

    /// Civil date used for all period bucketing.
    pub fn civil_date(&self) -> NaiveDate {
        self.date.date_naive()
    }
}

impl Identifiable for Transaction {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for Transaction {
    fn display_label(&self) -> String {
        format!("{} ${:.2} [{}]", self.kind, self.amount, self.bucket())
    }
}

/// Direction of a transaction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn expense_without_category_buckets_under_other() {
        let date = Utc.with_ymd_and_hms(2024, 1, 8, 12, 0, 0).unwrap();
        let txn = Transaction::new(TransactionKind::Expense, 12.5, None, date);
        assert_eq!(txn.bucket(), "Other");
        assert_eq!(txn.civil_date(), date.date_naive());
    }

    #[test]
    fn kind_serializes_lowercase() {
        let date = Utc.with_ymd_and_hms(2024, 1, 8, 12, 0, 0).unwrap();
        let json = serde_json::to_string(&Transaction::expense(20.0, "Groceries", date)).unwrap();
        assert!(json.contains("\"kind\":\"expense\""));
    }
}
