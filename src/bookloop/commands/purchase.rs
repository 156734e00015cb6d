use crate::commands::{catalog, ledger};
use crate::error::{BookloopError, Result};
use crate::model::{Book, BookId};
use crate::store::RecordStore;

#[derive(Debug, Clone, PartialEq)]
pub struct Sale {
    pub book: Book,
    pub commission: f64,
}

/// Mark a book sold and credit the platform's commission.
///
/// The books and profit documents are written one after the other; a failure between
/// the two leaves the book sold without a ledger entry.
pub fn run<S: RecordStore>(store: &S, id: BookId, rate: f64) -> Result<Sale> {
    let book = catalog::mark_sold(store, id)?.ok_or(BookloopError::BookNotFound(id))?;
    let commission = ledger::add_commission(store, book.price, &book.title, &book.seller, rate)?;
    Ok(Sale { book, commission })
}
