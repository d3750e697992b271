use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::{Displayable, Identifiable};
use crate::period::PeriodKind;

/// Sentinel stored in `period_key` for recurring budgets. Recurring budgets
/// match any period instance of their granularity, so the stored key is
/// ignored during resolution.
pub const RECURRING_PERIOD_KEY: &str = "recurring";

/// A spending cap for one category (or `Overall`) over one period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub id: Uuid,
    pub category: String,
    pub amount: f64,
    pub period: PeriodKind,
    pub period_key: String,
    pub is_recurring: bool,
}

impl Budget {
    /// Budget pinned to one concrete period instance.
    pub fn for_period(
        category: impl Into<String>,
        amount: f64,
        period: PeriodKind,
        period_key: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            category: category.into(),
            amount,
            period,
            period_key: period_key.into(),
            is_recurring: false,
        }
    }

    /// Budget template applying to every period of the given granularity.
    pub fn recurring(category: impl Into<String>, amount: f64, period: PeriodKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            category: category.into(),
            amount,
            period,
            period_key: RECURRING_PERIOD_KEY.to_string(),
            is_recurring: true,
        }
    }
}

impl Identifiable for Budget {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for Budget {
    fn display_label(&self) -> String {
        if self.is_recurring {
            format!("{} ${:.2} (recurring {})", self.category, self.amount, self.period)
        } else {
            format!("{} ${:.2} ({})", self.category, self.amount, self.period_key)
        }
    }
}
