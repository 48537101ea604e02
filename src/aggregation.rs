//! In-memory aggregation and filtering over a profile's transactions.
//!
//! Everything here is a pure, single-pass computation recomputed on every
//! call. There is no incremental maintenance or caching: the input is one
//! profile's transaction list as fetched from the server, which stays
//! small enough that a full fold per render is cheap.

use std::collections::HashMap;

use time::Date;

use crate::models::{Transaction, TransactionKind};

/// Income, expense, and balance totals over a transaction list.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Totals {
    /// Sum of the amounts of all income transactions.
    pub income: f64,
    /// Sum of the amounts of all expense transactions.
    pub expenses: f64,
    /// `income - expenses`, exactly.
    pub balance: f64,
}

/// Sum the income and expense amounts of `transactions`.
pub fn aggregate_totals(transactions: &[Transaction]) -> Totals {
    let mut income = 0.0;
    let mut expenses = 0.0;

    for transaction in transactions {
        match transaction.kind {
            TransactionKind::Income => income += transaction.amount,
            TransactionKind::Expense => expenses += transaction.amount,
        }
    }

    Totals {
        income,
        expenses,
        balance: income - expenses,
    }
}

/// Per-category income and expense sums.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CategoryTotals {
    /// Sum of income amounts in this category.
    pub income: f64,
    /// Sum of expense amounts in this category.
    pub expense: f64,
}

/// Group transactions by their category display string.
///
/// Buckets appear in first-seen order. Grouping keys on the denormalized
/// `category` string recorded when each transaction was created, not on
/// `category_id`: transactions recorded before a category rename keep
/// their old name and land in a separate bucket from transactions
/// recorded after it. This mirrors the server's data model, which
/// preserves the category name at time of transaction.
pub fn category_breakdown(transactions: &[Transaction]) -> Vec<(String, CategoryTotals)> {
    let mut buckets: Vec<(String, CategoryTotals)> = Vec::new();
    let mut index_by_category: HashMap<String, usize> = HashMap::new();

    for transaction in transactions {
        let index = match index_by_category.get(&transaction.category) {
            Some(&index) => index,
            None => {
                buckets.push((transaction.category.clone(), CategoryTotals::default()));
                index_by_category.insert(transaction.category.clone(), buckets.len() - 1);
                buckets.len() - 1
            }
        };

        let totals = &mut buckets[index].1;
        match transaction.kind {
            TransactionKind::Income => totals.income += transaction.amount,
            TransactionKind::Expense => totals.expense += transaction.amount,
        }
    }

    buckets
}

/// Independently composable predicates for the transaction list view.
///
/// Every populated field must match for a transaction to pass; empty
/// fields match everything. The filter is recomputed from scratch whenever
/// an input changes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    /// Case-insensitive substring matched against the category string or
    /// the description.
    pub search: Option<String>,
    /// Exact transaction kind.
    pub kind: Option<TransactionKind>,
    /// Exact category display string.
    pub category: Option<String>,
    /// Earliest date to include, inclusive.
    pub from: Option<Date>,
    /// Latest date to include, inclusive.
    pub to: Option<Date>,
}

impl TransactionFilter {
    /// Whether `transaction` passes every populated predicate.
    pub fn matches(&self, transaction: &Transaction) -> bool {
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let in_category = transaction.category.to_lowercase().contains(&needle);
            let in_description = transaction
                .description
                .as_ref()
                .is_some_and(|description| description.to_lowercase().contains(&needle));

            if !in_category && !in_description {
                return false;
            }
        }

        if let Some(kind) = self.kind
            && transaction.kind != kind
        {
            return false;
        }

        if let Some(category) = &self.category
            && transaction.category != *category
        {
            return false;
        }

        if let Some(from) = self.from
            && transaction.date < from
        {
            return false;
        }

        if let Some(to) = self.to
            && transaction.date > to
        {
            return false;
        }

        true
    }

    /// Filter `transactions` and sort the result by date descending.
    ///
    /// Equal dates are ordered by ID descending so the newest entry of a
    /// day sorts first and the order is stable across refetches.
    pub fn apply(&self, transactions: &[Transaction]) -> Vec<Transaction> {
        let mut filtered: Vec<Transaction> = transactions
            .iter()
            .filter(|transaction| self.matches(transaction))
            .cloned()
            .collect();

        filtered.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        filtered
    }
}

/// Counts and totals over an already-filtered list, for the list footer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FilterSummary {
    /// Number of transactions in the list.
    pub total: usize,
    /// Number of income transactions.
    pub income_count: usize,
    /// Number of expense transactions.
    pub expense_count: usize,
    /// Sum of income amounts.
    pub total_income: f64,
    /// Sum of expense amounts.
    pub total_expense: f64,
}

/// Summarize a filtered transaction list.
pub fn filtered_summary(transactions: &[Transaction]) -> FilterSummary {
    let totals = aggregate_totals(transactions);
    let income_count = transactions
        .iter()
        .filter(|transaction| transaction.kind == TransactionKind::Income)
        .count();

    FilterSummary {
        total: transactions.len(),
        income_count,
        expense_count: transactions.len() - income_count,
        total_income: totals.income,
        total_expense: totals.expenses,
    }
}

#[cfg(test)]
mod tests {
    use time::{Date, macros::date};

    use crate::models::{Transaction, TransactionKind};

    use super::{
        TransactionFilter, aggregate_totals, category_breakdown, filtered_summary,
    };

    fn transaction(
        id: i64,
        kind: TransactionKind,
        amount: f64,
        category: &str,
        date: Date,
    ) -> Transaction {
        Transaction {
            id,
            profile_id: 1,
            kind,
            amount,
            category: category.to_owned(),
            category_id: None,
            account_id: None,
            tag_ids: Vec::new(),
            description: None,
            date,
            created_at: None,
            documents: Vec::new(),
        }
    }

    fn sample_transactions() -> Vec<Transaction> {
        vec![
            transaction(
                1,
                TransactionKind::Income,
                1000.0,
                "Salary",
                date!(2024 - 01 - 01),
            ),
            transaction(
                2,
                TransactionKind::Expense,
                250.5,
                "Food",
                date!(2024 - 01 - 05),
            ),
            transaction(
                3,
                TransactionKind::Expense,
                800.0,
                "Rent",
                date!(2024 - 01 - 03),
            ),
            transaction(
                4,
                TransactionKind::Expense,
                49.5,
                "Food",
                date!(2024 - 01 - 10),
            ),
        ]
    }

    #[test]
    fn totals_sum_income_and_expenses_separately() {
        let totals = aggregate_totals(&sample_transactions());

        assert_eq!(totals.income, 1000.0);
        assert_eq!(totals.expenses, 1100.0);
    }

    #[test]
    fn balance_is_exactly_income_minus_expenses() {
        let totals = aggregate_totals(&sample_transactions());

        assert_eq!(totals.balance, totals.income - totals.expenses);
    }

    #[test]
    fn totals_of_empty_list_are_zero() {
        let totals = aggregate_totals(&[]);

        assert_eq!(totals.income, 0.0);
        assert_eq!(totals.expenses, 0.0);
        assert_eq!(totals.balance, 0.0);
    }

    #[test]
    fn breakdown_groups_by_category_in_first_seen_order() {
        let breakdown = category_breakdown(&sample_transactions());

        let names: Vec<&str> = breakdown.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["Salary", "Food", "Rent"]);

        let food = &breakdown[1].1;
        assert_eq!(food.income, 0.0);
        assert_eq!(food.expense, 300.0);
    }

    #[test]
    fn breakdown_conserves_the_total_amount() {
        let transactions = sample_transactions();

        let bucket_sum: f64 = category_breakdown(&transactions)
            .iter()
            .map(|(_, totals)| totals.income + totals.expense)
            .sum();
        let amount_sum: f64 = transactions.iter().map(|t| t.amount).sum();

        assert_eq!(bucket_sum, amount_sum);
    }

    #[test]
    fn renamed_category_does_not_merge_with_historical_transactions() {
        // The transaction recorded before the category was renamed keeps
        // the old display string, so it lands in its own bucket.
        let transactions = vec![
            transaction(
                1,
                TransactionKind::Expense,
                10.0,
                "Groceries",
                date!(2024 - 01 - 01),
            ),
            transaction(
                2,
                TransactionKind::Expense,
                20.0,
                "Food",
                date!(2024 - 02 - 01),
            ),
        ];

        let breakdown = category_breakdown(&transactions);

        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown[0].0, "Groceries");
        assert_eq!(breakdown[1].0, "Food");
    }

    #[test]
    fn transactions_sharing_a_display_string_merge_across_category_ids() {
        // The flip side of grouping by string: two different saved
        // categories with the same display name share a bucket.
        let mut first = transaction(
            1,
            TransactionKind::Expense,
            10.0,
            "Food",
            date!(2024 - 01 - 01),
        );
        first.category_id = Some(1);
        let mut second = transaction(
            2,
            TransactionKind::Expense,
            20.0,
            "Food",
            date!(2024 - 02 - 01),
        );
        second.category_id = Some(2);

        let breakdown = category_breakdown(&[first, second]);

        assert_eq!(breakdown.len(), 1);
        assert_eq!(breakdown[0].1.expense, 30.0);
    }

    #[test]
    fn empty_filter_returns_everything_sorted_by_date_descending() {
        let filtered = TransactionFilter::default().apply(&sample_transactions());

        let ids: Vec<i64> = filtered.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![4, 2, 3, 1]);
    }

    #[test]
    fn category_filter_returns_exact_matches_sorted_descending() {
        let filter = TransactionFilter {
            category: Some("Food".to_owned()),
            ..Default::default()
        };

        let filtered = filter.apply(&sample_transactions());

        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|t| t.category == "Food"));
        assert!(filtered[0].date >= filtered[1].date);
    }

    #[test]
    fn search_matches_category_case_insensitively() {
        let filter = TransactionFilter {
            search: Some("food".to_owned()),
            ..Default::default()
        };

        let filtered = filter.apply(&sample_transactions());

        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn search_matches_description_too() {
        let mut transactions = sample_transactions();
        transactions[2].description = Some("Monthly food budget top-up".to_owned());

        let filter = TransactionFilter {
            search: Some("FOOD".to_owned()),
            ..Default::default()
        };

        let filtered = filter.apply(&transactions);

        // Two category matches plus the description match on the rent
        // transaction.
        assert_eq!(filtered.len(), 3);
    }

    #[test]
    fn date_bounds_are_inclusive() {
        let filter = TransactionFilter {
            from: Some(date!(2024 - 01 - 03)),
            to: Some(date!(2024 - 01 - 05)),
            ..Default::default()
        };

        let filtered = filter.apply(&sample_transactions());

        let ids: Vec<i64> = filtered.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn active_predicates_combine_with_and() {
        let filter = TransactionFilter {
            kind: Some(TransactionKind::Expense),
            from: Some(date!(2024 - 01 - 04)),
            ..Default::default()
        };

        let filtered = filter.apply(&sample_transactions());

        let ids: Vec<i64> = filtered.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![4, 2]);
    }

    #[test]
    fn equal_dates_order_by_id_descending() {
        let transactions = vec![
            transaction(
                1,
                TransactionKind::Expense,
                5.0,
                "Food",
                date!(2024 - 01 - 01),
            ),
            transaction(
                2,
                TransactionKind::Expense,
                6.0,
                "Food",
                date!(2024 - 01 - 01),
            ),
        ];

        let filtered = TransactionFilter::default().apply(&transactions);

        let ids: Vec<i64> = filtered.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn summary_counts_and_totals_match_the_list() {
        let summary = filtered_summary(&sample_transactions());

        assert_eq!(summary.total, 4);
        assert_eq!(summary.income_count, 1);
        assert_eq!(summary.expense_count, 3);
        assert_eq!(summary.total_income, 1000.0);
        assert_eq!(summary.total_expense, 1100.0);
    }
}
