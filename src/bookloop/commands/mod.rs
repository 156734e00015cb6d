//! # Command Layer
//!
//! Business logic for the three collections, one module per concern. Functions take a
//! [`RecordStore`](crate::store::RecordStore) and plain Rust values, and return plain Rust
//! values; they know nothing about who is asking. Role rules and user-facing messages
//! live in [`api`](crate::api).

use crate::model::{Book, ProfitLedger, User};

pub mod catalog;
pub mod directory;
pub mod doctor;
pub mod ledger;
pub mod purchase;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }
}

/// Everything an operation hands back to a UI for rendering.
#[derive(Debug, Default)]
pub struct CmdResult {
    pub books: Vec<Book>,
    pub users: Vec<User>,
    pub user: Option<User>,
    pub ledger: Option<ProfitLedger>,
    pub commission: Option<f64>,
    pub report: Option<doctor::DoctorReport>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_message(mut self, message: CmdMessage) -> Self {
        self.messages.push(message);
        self
    }

    pub fn with_books(mut self, books: Vec<Book>) -> Self {
        self.books = books;
        self
    }

    pub fn with_users(mut self, users: Vec<User>) -> Self {
        self.users = users;
        self
    }

    pub fn with_user(mut self, user: User) -> Self {
        self.user = Some(user);
        self
    }

    pub fn with_ledger(mut self, ledger: ProfitLedger) -> Self {
        self.ledger = Some(ledger);
        self
    }

    pub fn with_commission(mut self, commission: f64) -> Self {
        self.commission = Some(commission);
        self
    }

    pub fn with_report(mut self, report: doctor::DoctorReport) -> Self {
        self.report = Some(report);
        self
    }

    pub fn has_warnings(&self) -> bool {
        self.messages
            .iter()
            .any(|m| m.level == MessageLevel::Warning)
    }
}
