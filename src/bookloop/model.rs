use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Currency prices and commissions are quoted in.
pub const CURRENCY: &str = "LKR";

/// Identifier of a listing. Derived from the creation time in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(pub i64);

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BookId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(BookId)
    }
}

/// The fields a seller provides when listing or editing a book.
#[derive(Debug, Clone, PartialEq)]
pub struct BookDetails {
    pub title: String,
    pub author: String,
    pub price: f64,
    pub category: String,
    pub district: String,
}

impl BookDetails {
    pub fn new(title: impl Into<String>, author: impl Into<String>, price: f64) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            price,
            category: String::new(),
            district: String::new(),
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
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub price: f64,
    pub category: String,
    pub district: String,
    pub seller: String,
    // Older listings were written without the flag
    #[serde(default)]
    pub sold: bool,
}

impl Book {
    pub fn new(id: BookId, seller: impl Into<String>, details: BookDetails) -> Self {
        Self {
            id,
            title: details.title,
            author: details.author,
            price: details.price,
            category: details.category,
            district: details.district,
            seller: seller.into(),
            sold: false,
        }
    }

    /// Overwrites the seller-editable fields. Seller and sold flag are left alone.
    pub fn apply(&mut self, details: BookDetails) {
        self.title = details.title;
        self.author = details.author;
        self.price = details.price;
        self.category = details.category;
        self.district = details.district;
    }

    pub fn status(&self) -> &'static str {
        if self.sold {
            "SOLD"
        } else {
            "AVAILABLE"
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Seller,
    Buyer,
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Seller => "seller",
            Role::Buyer => "buyer",
            Role::Admin => "admin",
        };
        f.write_str(name)
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "seller" => Ok(Role::Seller),
            "buyer" => Ok(Role::Buyer),
            "admin" => Ok(Role::Admin),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// A user entry as it sits in the users document, keyed by username.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// PHC-formatted password hash (plain text for entries written before hashing).
    pub password: String,
    pub role: Role,
}

/// A user as seen outside the directory. Never carries credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub username: String,
    pub role: Role,
}

impl User {
    pub fn new(username: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            role,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Commission {
    /// Title of the book at the time of sale.
    pub book: String,
    pub seller: String,
    pub commission: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitLedger {
    pub total_profit: f64,
    pub transactions: Vec<Commission>,
}

impl Default for ProfitLedger {
    fn default() -> Self {
        Self {
            total_profit: 0.0,
            transactions: Vec::new(),
        }
    }
}

impl ProfitLedger {
    /// Sum of all recorded commissions, rounded to cents.
    pub fn transactions_total(&self) -> f64 {
        round_currency(self.transactions.iter().map(|t| t.commission).sum())
    }

    pub fn is_consistent(&self) -> bool {
        round_currency(self.total_profit) == self.transactions_total()
    }
}

/// Rounds an amount to two decimal places, ties to even.
pub fn round_currency(amount: f64) -> f64 {
    (amount * 100.0).round_ties_even() / 100.0
}
