//! Book listings: add, edit, delete, search and the listing views built on them.

use crate::error::{BookloopError, Result};
use crate::ids;
use crate::model::{Book, BookDetails, BookId};
use crate::store::{Collection, RecordStore};
use tracing::info;

/// Filters for [`search`]. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookQuery {
    /// Matched against title or author.
    pub keyword: String,
    pub category: String,
    pub district: String,
}

impl BookQuery {
    pub fn keyword(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            ..Self::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_district(mut self, district: impl Into<String>) -> Self {
        self.district = district.into();
        self
    }

    /// Does an unsold book satisfy every filter?
    pub fn matches(&self, book: &Book) -> bool {
        let keyword = self.keyword.to_lowercase();
        let keyword_hit = book.title.to_lowercase().contains(&keyword)
            || book.author.to_lowercase().contains(&keyword);
        keyword_hit
            && filter_matches(&self.category, &book.category)
            && filter_matches(&self.district, &book.district)
    }
}

fn filter_matches(filter: &str, value: &str) -> bool {
    filter.is_empty() || value.to_lowercase().contains(&filter.to_lowercase())
}

fn load_books<S: RecordStore>(store: &S) -> Result<Vec<Book>> {
    store.load(Collection::Books, Vec::new())
}

/// List a new book for `seller`. Performs no validation.
pub fn add<S: RecordStore>(store: &S, seller: &str, details: BookDetails) -> Result<Book> {
    let book = store.update(Collection::Books, Vec::<Book>::new(), |books| {
        let floor = books.iter().map(|b| b.id).max();
        let book = Book::new(ids::next_id(floor), seller, details);
        books.push(book.clone());
        Ok(book)
    })?;
    info!(id = %book.id, seller, title = %book.title, "book listed");
    Ok(book)
}

/// Overwrite the editable fields of a listing.
///
/// Returns `None` without touching the store if no book has that id. Sold books cannot be
/// edited.
pub fn edit<S: RecordStore>(store: &S, id: BookId, details: BookDetails) -> Result<Option<Book>> {
    let edited = store.update(Collection::Books, Vec::<Book>::new(), |books| {
        let Some(book) = books.iter_mut().find(|b| b.id == id) else {
            return Ok(None);
        };
        if book.sold {
            return Err(BookloopError::BookSold(id));
        }
        book.apply(details);
        Ok(Some(book.clone()))
    })?;
    if edited.is_some() {
        info!(%id, "book edited");
    }
    Ok(edited)
}

/// Remove every listing with `id`, sold or not. Returns the removed book, if any.
pub fn delete<S: RecordStore>(store: &S, id: BookId) -> Result<Option<Book>> {
    let removed = store.update(Collection::Books, Vec::<Book>::new(), |books| {
        let removed = books.iter().find(|b| b.id == id).cloned();
        books.retain(|b| b.id != id);
        Ok(removed)
    })?;
    if removed.is_some() {
        info!(%id, "book deleted");
    }
    Ok(removed)
}

/// Unsold books matching `query`, in listing order.
pub fn search<S: RecordStore>(store: &S, query: &BookQuery) -> Result<Vec<Book>> {
    Ok(load_books(store)?
        .into_iter()
        .filter(|b| !b.sold && query.matches(b))
        .collect())
}

/// Every book in the store, sold or not.
pub fn list<S: RecordStore>(store: &S) -> Result<Vec<Book>> {
    load_books(store)
}

/// Every book listed by `seller`, sold or not.
pub fn list_by_seller<S: RecordStore>(store: &S, seller: &str) -> Result<Vec<Book>> {
    Ok(load_books(store)?
        .into_iter()
        .filter(|b| b.seller == seller)
        .collect())
}

pub fn get<S: RecordStore>(store: &S, id: BookId) -> Result<Option<Book>> {
    Ok(load_books(store)?.into_iter().find(|b| b.id == id))
}

/// Flag a book as sold. A book can only be sold once.
pub fn mark_sold<S: RecordStore>(store: &S, id: BookId) -> Result<Option<Book>> {
    store.update(Collection::Books, Vec::<Book>::new(), |books| {
        let Some(book) = books.iter_mut().find(|b| b.id == id) else {
            return Ok(None);
        };
        if book.sold {
            return Err(BookloopError::BookSold(id));
        }
        book.sold = true;
        Ok(Some(book.clone()))
    })
}
