mod common;

use chrono::NaiveDate;
use common::expense_on;
use fintrack_core::{
    Budget, BudgetService, BudgetStatus, PeriodKind, ServiceError, Tracker, TransactionService,
};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn exact_period_budget_beats_recurring_fallback() {
    let budgets = vec![
        Budget::recurring("Groceries", 120.0, PeriodKind::Month),
        Budget::for_period("Groceries", 400.0, PeriodKind::Month, "2024-01"),
    ];

    let pinned = BudgetService::resolve(&budgets, "Groceries", PeriodKind::Month, "2024-01")
        .expect("exact match");
    assert_eq!(pinned.amount, 400.0);
    assert!(!pinned.is_recurring);

    // Any other month falls back to the recurring template.
    let fallback = BudgetService::resolve(&budgets, "Groceries", PeriodKind::Month, "2024-02")
        .expect("recurring fallback");
    assert_eq!(fallback.amount, 120.0);
    assert!(fallback.is_recurring);

    assert!(BudgetService::resolve(&budgets, "Travel", PeriodKind::Month, "2024-01").is_none());
}

#[test]
fn active_set_prefers_pinned_budgets_and_materializes_recurring_keys() {
    let budgets = vec![
        Budget::for_period("Groceries", 400.0, PeriodKind::Month, "2024-01"),
        Budget::recurring("Groceries", 120.0, PeriodKind::Month),
        Budget::recurring("Overall", 900.0, PeriodKind::Month),
        Budget::for_period("Travel", 60.0, PeriodKind::Month, "2024-02"),
    ];

    let active = BudgetService::resolve_active(&budgets, PeriodKind::Month, "2024-01");
    assert_eq!(active.len(), 2);
    assert_eq!(active[0].category, "Groceries");
    assert_eq!(active[0].amount, 400.0);
    assert_eq!(active[1].category, "Overall");
    assert_eq!(active[1].period_key, "2024-01");
    assert!(active[1].is_recurring);

    let recurring = BudgetService::recurring(&budgets);
    assert_eq!(recurring.len(), 2);
    assert!(recurring.iter().all(|budget| budget.is_recurring));
}

#[test]
fn overall_budget_consumes_the_whole_period_spend() {
    // $150 of January spending against a $200 Overall budget sits exactly
    // on the 75% boundary, which belongs to Notice.
    let transactions = vec![
        expense_on(100.0, "Groceries", 2024, 1, 8),
        expense_on(50.0, "Groceries", 2024, 1, 15),
    ];
    let budgets = vec![Budget::for_period(
        "Overall",
        200.0,
        PeriodKind::Month,
        "2024-01",
    )];

    let active = BudgetService::resolve_active(&budgets, PeriodKind::Month, "2024-01");
    assert_eq!(active.len(), 1);

    let standings = BudgetService::with_spending(&budgets, &transactions, day(2024, 1, 20));
    assert_eq!(standings.len(), 1);
    let standing = &standings[0];
    assert_eq!(standing.spending, 150.0);
    assert_eq!(standing.percent_used, 75.0);
    assert_eq!(standing.status, BudgetStatus::Notice);
}

#[test]
fn category_budget_only_sees_its_own_bucket() {
    let transactions = vec![
        expense_on(100.0, "Groceries", 2024, 1, 8),
        expense_on(500.0, "Rent", 2024, 1, 9),
    ];
    let spent = BudgetService::spending(&transactions, "Groceries", PeriodKind::Month, "2024-01");
    assert_eq!(spent, 100.0);
    let overall = BudgetService::spending(&transactions, "Overall", PeriodKind::Month, "2024-01");
    assert_eq!(overall, 600.0);
}

#[test]
fn recurring_budgets_track_the_anchoring_date() {
    let budgets = vec![Budget::recurring("Groceries", 100.0, PeriodKind::Week)];
    let transactions = vec![expense_on(96.0, "Groceries", 2024, 1, 10)];

    // Anchored inside the spending week the budget is nearly exhausted.
    let standings = BudgetService::with_spending(&budgets, &transactions, day(2024, 1, 10));
    assert_eq!(standings[0].period_key, "2024-W02");
    assert_eq!(standings[0].status, BudgetStatus::Warning);

    // A week later the same template starts from zero.
    let standings = BudgetService::with_spending(&budgets, &transactions, day(2024, 1, 17));
    assert_eq!(standings[0].period_key, "2024-W03");
    assert_eq!(standings[0].spending, 0.0);
    assert_eq!(standings[0].status, BudgetStatus::Nominal);
}

#[test]
fn percent_used_is_defined_for_degenerate_amounts() {
    assert_eq!(BudgetService::percent_used(50.0, 0.0), 0.0);
    assert_eq!(BudgetService::percent_used(0.0, 100.0), 0.0);
    assert_eq!(BudgetService::percent_used(150.0, 100.0), 150.0);
}

#[test]
fn service_crud_validates_budgets_against_their_granularity() {
    let mut tracker = Tracker::new("Budgets");
    TransactionService::add(&mut tracker, expense_on(10.0, "Groceries", 2024, 1, 8)).unwrap();

    let id = BudgetService::add(
        &mut tracker,
        Budget::for_period("Groceries", 100.0, PeriodKind::Week, "2024-W02"),
    )
    .expect("valid week budget");

    // Swapping the granularity without fixing the key must be rejected and
    // leave the stored budget untouched.
    let err = BudgetService::update(&mut tracker, id, |budget| {
        budget.period = PeriodKind::Month;
    })
    .expect_err("stale week key under month granularity");
    assert!(matches!(err, ServiceError::Tracker(_)));
    assert_eq!(tracker.budget(id).unwrap().period, PeriodKind::Week);

    let removed = BudgetService::remove(&mut tracker, id).expect("budget exists");
    assert_eq!(removed.category, "Groceries");
    assert!(BudgetService::list(&tracker).is_empty());
}
