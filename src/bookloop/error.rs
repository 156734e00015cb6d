use crate::model::BookId;
use crate::store::Collection;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookloopError {
    #[error("Book not found: {0}")]
    BookNotFound(BookId),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Book {0} is already sold")]
    BookSold(BookId),

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Not allowed: {0}")]
    Forbidden(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not decode {collection} document: {source}")]
    Decode {
        collection: Collection,
        #[source]
        source: serde_json::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error("Store error: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, BookloopError>;
