//! Book id generation.
//!
//! Ids are the creation time in milliseconds, bumped past the last issued id whenever two
//! books are created within the same millisecond (or the clock steps backwards). Ids are
//! therefore unique and strictly increasing for the lifetime of the process.

use crate::model::BookId;
use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};

static LAST_ID: AtomicI64 = AtomicI64::new(0);

/// Issue a fresh id that is also greater than `floor`.
///
/// Callers pass the largest id already persisted so ids stay unique against records
/// written by earlier processes.
pub fn next_id(floor: Option<BookId>) -> BookId {
    let now = Utc::now().timestamp_millis();
    let floor = floor.map(|id| id.0).unwrap_or(i64::MIN);
    let previous = LAST_ID
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
            Some(candidate(now, last, floor))
        })
        .unwrap_or_else(|last| last);
    BookId(candidate(now, previous, floor))
}

fn candidate(now: i64, last: i64, floor: i64) -> i64 {
    now.max(last.saturating_add(1)).max(floor.saturating_add(1))
}
