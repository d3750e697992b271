//! Rule-based comparative analysis over the transaction history.
//!
//! Each step compares the current week/month against the immediately
//! preceding one (or a short rolling budget history) and appends zero or
//! more natural-language observations. Steps are independent: a step whose
//! precondition fails logs at debug level and skips, never unwinding into
//! later steps.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use crate::domain::category::OVERALL_CATEGORY;
use crate::domain::{Budget, Insight, InsightKind, Transaction};
use crate::period::{self, PeriodKind};

use super::AggregationService;

const WEEKLY_CHANGE_FLOOR: f64 = 5.0;
const WEEKLY_PERCENT_FLOOR: f64 = 10.0;
const MONTHLY_CHANGE_FLOOR: f64 = 10.0;
const MONTHLY_PERCENT_FLOOR: f64 = 15.0;
const UNDER_BUDGET_RATIO: f64 = 0.5;
const BUDGET_HISTORY_MONTHS: usize = 3;

type Buckets<'a> = BTreeMap<String, Vec<&'a Transaction>>;

/// Generates the insight feed from a snapshot of transactions and budgets.
pub struct InsightService;

impl InsightService {
    /// Pure function of `(transactions, budgets, today)`. Empty inputs
    /// yield an empty list, never an error.
    pub fn generate(
        transactions: &[Transaction],
        budgets: &[Budget],
        today: NaiveDate,
    ) -> Vec<Insight> {
        let mut insights = Vec::new();
        if !transactions.iter().any(Transaction::is_expense) {
            return insights;
        }

        let weekly = AggregationService::bucket_by_period(transactions, PeriodKind::Week);
        let monthly = AggregationService::bucket_by_period(transactions, PeriodKind::Month);

        let current_week = period::week_key(today);
        let current_month = period::month_key(today);
        let previous_week = match period::previous_week_key(&current_week) {
            Ok(key) => Some(key),
            Err(err) => {
                tracing::debug!(error = %err, "skipping week-over-week comparisons");
                None
            }
        };
        let previous_month = match period::previous_month_key(&current_month) {
            Ok(key) => Some(key),
            Err(err) => {
                tracing::debug!(error = %err, "skipping month-over-month comparisons");
                None
            }
        };

        period_comparisons(
            &mut insights,
            &weekly,
            &current_week,
            previous_week.as_deref(),
            PeriodScope::Week,
        );
        period_comparisons(
            &mut insights,
            &monthly,
            &current_month,
            previous_month.as_deref(),
            PeriodScope::Month,
        );
        category_trends(
            &mut insights,
            transactions,
            &weekly,
            &monthly,
            &current_week,
            previous_week.as_deref(),
            &current_month,
            previous_month.as_deref(),
        );
        budget_insights(&mut insights, budgets, &monthly, &current_month);

        insights
    }
}

/// Wording and thresholds that differ between the weekly and monthly
/// comparison passes.
#[derive(Clone, Copy)]
enum PeriodScope {
    Week,
    Month,
}

impl PeriodScope {
    fn kind(self) -> InsightKind {
        match self {
            PeriodScope::Week => InsightKind::Weekly,
            PeriodScope::Month => InsightKind::Monthly,
        }
    }

    fn noun(self) -> &'static str {
        match self {
            PeriodScope::Week => "week",
            PeriodScope::Month => "month",
        }
    }

    fn change_floor(self) -> f64 {
        match self {
            PeriodScope::Week => WEEKLY_CHANGE_FLOOR,
            PeriodScope::Month => MONTHLY_CHANGE_FLOOR,
        }
    }

    fn percent_floor(self) -> f64 {
        match self {
            PeriodScope::Week => WEEKLY_PERCENT_FLOOR,
            PeriodScope::Month => MONTHLY_PERCENT_FLOOR,
        }
    }

    fn title(self, stem: &str) -> String {
        match self {
            PeriodScope::Week => format!("{} This Week", stem),
            PeriodScope::Month => format!("{} This Month", stem),
        }
    }
}

/// Steps 1-3 (weekly) and their monthly mirror: overall delta, biggest
/// category, and the single largest mover in each direction.
fn period_comparisons(
    insights: &mut Vec<Insight>,
    buckets: &Buckets<'_>,
    current_key: &str,
    previous_key: Option<&str>,
    scope: PeriodScope,
) {
    let current_spending = spending_of(buckets, current_key);
    let previous_spending = previous_key
        .map(|key| spending_of(buckets, key))
        .unwrap_or(0.0);
    let noun = scope.noun();

    // A side with zero spend is excluded: comparing against nothing would
    // produce a meaningless ratio.
    if previous_spending > 0.0 && current_spending > 0.0 {
        let change = (current_spending - previous_spending) / previous_spending * 100.0;
        let direction = if change >= 0.0 { "more" } else { "less" };
        insights.push(Insight::new(
            scope.kind(),
            match scope {
                PeriodScope::Week => "Weekly Spending Comparison",
                PeriodScope::Month => "Monthly Spending Comparison",
            },
            format!(
                "You spent {:.0}% {} this {} compared to last {} (${:.2} vs ${:.2}).",
                change.abs(),
                direction,
                noun,
                noun,
                current_spending,
                previous_spending
            ),
        ));
    }

    if current_spending > 0.0 {
        let totals = category_totals_of(buckets, current_key);
        if let Some((name, amount)) = biggest_category(&totals) {
            insights.push(Insight::new(
                scope.kind(),
                scope.title("Biggest Category"),
                format!(
                    "Your biggest category this {} was {} with ${:.2} spent.",
                    noun, name, amount
                ),
            ));
        }
    }

    if previous_spending > 0.0 && current_spending > 0.0 {
        if let Some(previous_key) = previous_key {
            let movers = category_movers(
                &category_totals_of(buckets, current_key),
                &category_totals_of(buckets, previous_key),
                scope.change_floor(),
                scope.percent_floor(),
            );
            if let Some(up) = movers.largest_increase {
                let message = match scope {
                    PeriodScope::Week => format!(
                        "Your {} spending increased by ${:.2} this week compared to last week.",
                        up.category, up.change
                    ),
                    PeriodScope::Month => format!(
                        "Your {} spending increased by ${:.2} ({:.0}%) this month compared to last month.",
                        up.category,
                        up.change,
                        up.percent_change.abs()
                    ),
                };
                insights.push(Insight::new(scope.kind(), scope.title("Category Increase"), message));
            }
            if let Some(down) = movers.largest_decrease {
                let message = match scope {
                    PeriodScope::Week => format!(
                        "Your {} spending decreased by ${:.2} this week compared to last week.",
                        down.category,
                        down.change.abs()
                    ),
                    PeriodScope::Month => format!(
                        "Your {} spending decreased by ${:.2} ({:.0}%) this month compared to last month.",
                        down.category,
                        down.change.abs(),
                        down.percent_change.abs()
                    ),
                };
                insights.push(Insight::new(scope.kind(), scope.title("Category Decrease"), message));
            }
        }
    }
}

/// Step 7: independent week-over-week and month-over-month trend checks for
/// every category seen on an expense.
#[allow(clippy::too_many_arguments)]
fn category_trends(
    insights: &mut Vec<Insight>,
    transactions: &[Transaction],
    weekly: &Buckets<'_>,
    monthly: &Buckets<'_>,
    current_week: &str,
    previous_week: Option<&str>,
    current_month: &str,
    previous_month: Option<&str>,
) {
    let mut categories: BTreeSet<&str> = BTreeSet::new();
    for txn in transactions.iter().filter(|txn| txn.is_expense()) {
        if let Some(category) = txn.category.as_deref() {
            if !category.is_empty() {
                categories.insert(category);
            }
        }
    }

    let current_week_totals = category_totals_of(weekly, current_week);
    let previous_week_totals = previous_week
        .map(|key| category_totals_of(weekly, key))
        .unwrap_or_default();
    let current_month_totals = category_totals_of(monthly, current_month);
    let previous_month_totals = previous_month
        .map(|key| category_totals_of(monthly, key))
        .unwrap_or_default();

    for category in categories {
        single_category_trend(
            insights,
            category,
            total_for(&current_week_totals, category),
            total_for(&previous_week_totals, category),
            PeriodScope::Week,
        );
        single_category_trend(
            insights,
            category,
            total_for(&current_month_totals, category),
            total_for(&previous_month_totals, category),
            PeriodScope::Month,
        );
    }
}

fn single_category_trend(
    insights: &mut Vec<Insight>,
    category: &str,
    current: f64,
    previous: f64,
    scope: PeriodScope,
) {
    let noun = scope.noun();
    let title = match scope {
        PeriodScope::Week => format!("{} Weekly Trend", category),
        PeriodScope::Month => format!("{} Monthly Trend", category),
    };
    if previous > 0.0 && current > 0.0 {
        let change = current - previous;
        let percent = change / previous * 100.0;
        if percent.abs() > scope.percent_floor() {
            let direction = if change > 0.0 { "more" } else { "less" };
            insights.push(Insight::new(
                InsightKind::Category,
                title,
                format!(
                    "You spent {:.0}% {} on {} this {} compared to last {} (${:.2} vs ${:.2}).",
                    percent.abs(),
                    direction,
                    category,
                    noun,
                    noun,
                    current,
                    previous
                ),
            ));
        }
    } else if current > 0.0 && previous == 0.0 {
        insights.push(Insight::new(
            InsightKind::Category,
            title,
            format!(
                "You spent ${:.2} on {} this {}, but nothing last {}.",
                current, category, noun, noun
            ),
        ));
    }
}

/// Step 8: evaluates every recurring or month-granularity budget against
/// the current month and the two preceding months.
fn budget_insights(
    insights: &mut Vec<Insight>,
    budgets: &[Budget],
    monthly: &Buckets<'_>,
    current_month: &str,
) {
    if budgets.is_empty() {
        return;
    }

    let mut months = vec![current_month.to_string()];
    while months.len() < BUDGET_HISTORY_MONTHS {
        match period::previous_month_key(months[months.len() - 1].as_str()) {
            Ok(key) => months.push(key),
            Err(err) => {
                tracing::debug!(error = %err, "stopping budget history walk");
                break;
            }
        }
    }

    for budget in budgets {
        if !budget.is_recurring && budget.period != PeriodKind::Month {
            continue;
        }

        let monthly_spending: Vec<f64> = months
            .iter()
            .map(|key| budget_month_spending(monthly, key, &budget.category))
            .collect();

        let over_budget_months = monthly_spending
            .iter()
            .filter(|spending| **spending > budget.amount)
            .count();
        if over_budget_months >= 2 {
            insights.push(Insight::new(
                InsightKind::Budget,
                "Budget Alert",
                format!(
                    "You've gone over your {} budget {} months in a row.",
                    budget.category, over_budget_months
                ),
            ));
        }

        let current_spending = monthly_spending.first().copied().unwrap_or(0.0);
        if current_spending > 0.0 && current_spending < budget.amount * UNDER_BUDGET_RATIO {
            insights.push(Insight::new(
                InsightKind::Budget,
                "Budget Opportunity",
                format!(
                    "Your {} spending is well under budget this month (${:.2} of ${:.2}).",
                    budget.category, current_spending, budget.amount
                ),
            ));
        }

        // Index 0 is the current month, so a strictly descending window
        // means the most recent month is the largest.
        if monthly_spending.len() == BUDGET_HISTORY_MONTHS
            && monthly_spending.iter().all(|spending| *spending > 0.0)
        {
            if monthly_spending[0] > monthly_spending[1]
                && monthly_spending[1] > monthly_spending[2]
            {
                insights.push(Insight::new(
                    InsightKind::Budget,
                    "Spending Trend",
                    format!(
                        "{} spending has increased for 3 straight months.",
                        budget.category
                    ),
                ));
            }
            if monthly_spending[0] < monthly_spending[1]
                && monthly_spending[1] < monthly_spending[2]
            {
                insights.push(Insight::new(
                    InsightKind::Budget,
                    "Spending Trend",
                    format!(
                        "{} spending has decreased for 3 straight months.",
                        budget.category
                    ),
                ));
            }
        }
    }
}

fn budget_month_spending(monthly: &Buckets<'_>, key: &str, category: &str) -> f64 {
    let Some(list) = monthly.get(key) else {
        return 0.0;
    };
    if category == OVERALL_CATEGORY {
        AggregationService::total_spending(list.iter().copied())
    } else {
        AggregationService::category_totals(list.iter().copied())
            .get(category)
            .copied()
            .unwrap_or(0.0)
    }
}

fn spending_of(buckets: &Buckets<'_>, key: &str) -> f64 {
    buckets
        .get(key)
        .map(|list| AggregationService::total_spending(list.iter().copied()))
        .unwrap_or(0.0)
}

fn category_totals_of(buckets: &Buckets<'_>, key: &str) -> BTreeMap<String, f64> {
    buckets
        .get(key)
        .map(|list| AggregationService::category_totals(list.iter().copied()))
        .unwrap_or_default()
}

fn total_for(totals: &BTreeMap<String, f64>, category: &str) -> f64 {
    totals.get(category).copied().unwrap_or(0.0)
}

/// Largest total wins; ties go to the alphabetically first category (the
/// map iterates in ascending name order and replacement requires a strictly
/// greater total).
fn biggest_category(totals: &BTreeMap<String, f64>) -> Option<(&str, f64)> {
    let mut best: Option<(&str, f64)> = None;
    for (name, amount) in totals {
        match best {
            Some((_, top)) if *amount <= top => {}
            _ => best = Some((name.as_str(), *amount)),
        }
    }
    best
}

struct Mover {
    category: String,
    change: f64,
    percent_change: f64,
}

struct Movers {
    largest_increase: Option<Mover>,
    largest_decrease: Option<Mover>,
}

/// Categories whose spend moved materially between two periods, reduced to
/// the single largest increase and the single largest decrease.
fn category_movers(
    current: &BTreeMap<String, f64>,
    previous: &BTreeMap<String, f64>,
    change_floor: f64,
    percent_floor: f64,
) -> Movers {
    let categories: BTreeSet<&String> = current.keys().chain(previous.keys()).collect();
    let mut largest_increase: Option<Mover> = None;
    let mut largest_decrease: Option<Mover> = None;

    for category in categories {
        let cur = total_for(current, category);
        let prev = total_for(previous, category);
        if cur == 0.0 && prev == 0.0 {
            continue;
        }
        let change = cur - prev;
        let percent_change = if prev > 0.0 { change / prev * 100.0 } else { 0.0 };
        if change.abs() <= change_floor && percent_change.abs() <= percent_floor {
            continue;
        }
        if change > 0.0 {
            if largest_increase
                .as_ref()
                .map_or(true, |best| change > best.change)
            {
                largest_increase = Some(Mover {
                    category: category.clone(),
                    change,
                    percent_change,
                });
            }
        } else if change < 0.0
            && largest_decrease
                .as_ref()
                .map_or(true, |best| change < best.change)
        {
            largest_decrease = Some(Mover {
                category: category.clone(),
                change,
                percent_change,
            });
        }
    }

    Movers {
        largest_increase,
        largest_decrease,
    }
}
