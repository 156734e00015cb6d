//! Consistency check across the three documents.
//!
//! Only the ledger total is repaired automatically, since it can be recomputed from the
//! transaction log. Everything else is reported for an admin to act on.

use crate::commands::catalog;
use crate::commands::directory::UserMap;
use crate::error::Result;
use crate::model::{BookId, ProfitLedger};
use crate::password;
use crate::store::{Collection, RecordStore};
use std::collections::{BTreeSet, HashSet};
use tracing::warn;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct DoctorReport {
    /// `(stored, recomputed)` when the ledger total had drifted and was rewritten.
    pub fixed_profit_total: Option<(f64, f64)>,
    pub duplicate_ids: Vec<BookId>,
    /// Books whose seller no longer has an account.
    pub orphaned_books: Vec<BookId>,
    /// Users whose password is still stored in plain text.
    pub unhashed_users: Vec<String>,
}

impl DoctorReport {
    pub fn is_clean(&self) -> bool {
        self.fixed_profit_total.is_none()
            && self.duplicate_ids.is_empty()
            && self.orphaned_books.is_empty()
            && self.unhashed_users.is_empty()
    }
}

pub fn run<S: RecordStore>(store: &S) -> Result<DoctorReport> {
    let mut report = DoctorReport::default();

    report.fixed_profit_total = store.update(
        Collection::Profit,
        ProfitLedger::default(),
        |profit| {
            if profit.is_consistent() {
                return Ok(None);
            }
            let stored = profit.total_profit;
            profit.total_profit = profit.transactions_total();
            Ok(Some((stored, profit.total_profit)))
        },
    )?;
    if let Some((stored, recomputed)) = report.fixed_profit_total {
        warn!(stored, recomputed, "ledger total did not match transactions, rewritten");
    }

    let users: UserMap = store.load(Collection::Users, UserMap::new())?;
    let books = catalog::list(store)?;

    let mut seen = HashSet::new();
    let mut duplicates = BTreeSet::new();
    for book in &books {
        if !seen.insert(book.id) {
            duplicates.insert(book.id);
        }
        if !users.contains_key(&book.seller) {
            report.orphaned_books.push(book.id);
        }
    }
    report.duplicate_ids = duplicates.into_iter().collect();

    report.unhashed_users = users
        .iter()
        .filter(|(_, record)| !password::is_hashed(&record.password))
        .map(|(username, _)| username.clone())
        .collect();

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{directory, ledger};
    use crate::model::{Book, BookDetails, Role};
    use crate::store::memory::InMemoryStore;

    #[test]
    fn clean_store_reports_nothing() {
        let store = InMemoryStore::new();
        directory::register(&store, "sam", "pw", Role::Seller).unwrap();
        let book = catalog::add(&store, "sam", BookDetails::new("Dune", "Herbert", 100.0)).unwrap();
        crate::commands::purchase::run(&store, book.id, 0.10).unwrap();

        let report = run(&store).unwrap();
        assert!(report.is_clean(), "{:?}", report);
    }

    #[test]
    fn repairs_drifted_total() {
        let store = InMemoryStore::new();
        store.seed(
            Collection::Profit,
            r#"{"total_profit": 99.0, "transactions": [
                {"book": "Dune", "seller": "sam", "commission": 10.0},
                {"book": "Emma", "seller": "nia", "commission": 2.5}
            ]}"#,
        );

        let report = run(&store).unwrap();
        assert_eq!(report.fixed_profit_total, Some((99.0, 12.5)));
        assert_eq!(ledger::load(&store).unwrap().total_profit, 12.5);
        assert!(run(&store).unwrap().fixed_profit_total.is_none());
    }

    #[test]
    fn reports_duplicates_orphans_and_plain_passwords() {
        let store = InMemoryStore::new();
        let details = || BookDetails::new("Dune", "Herbert", 100.0);
        let books = vec![
            Book::new(BookId(1), "sam", details()),
            Book::new(BookId(1), "sam", details()),
            Book::new(BookId(2), "ghost", details()),
        ];
        store.save(Collection::Books, &books).unwrap();
        store.seed(
            Collection::Users,
            r#"{"sam": {"password": "plain", "role": "seller"}}"#,
        );

        let report = run(&store).unwrap();
        assert_eq!(report.duplicate_ids, vec![BookId(1)]);
        assert_eq!(report.orphaned_books, vec![BookId(2)]);
        assert_eq!(report.unhashed_users, vec!["sam".to_string()]);
        assert!(report.fixed_profit_total.is_none());
    }
}
