//! # API Facade
//!
//! The single entry point for every marketplace operation, whatever the UI. The facade:
//!
//! - **Authenticates** the acting user from [`Credentials`] on every call (there are no
//!   sessions; each request stands alone, just like each re-render did in the web UI)
//! - **Enforces roles**: sellers manage their own listings, buyers browse and buy, admins
//!   manage users, all books and the profit ledger
//! - **Validates input** before it reaches the command layer
//! - **Returns structured results** ([`CmdResult`]) with records plus user-facing messages
//!
//! Business logic stays in [`crate::commands`]; nothing here writes to a terminal.
//!
//! ## Missing records
//!
//! Editing or deleting something that does not exist is not an error. The command layer
//! treats it as a no-op and the facade reports it as a warning message.

use crate::commands::catalog::{self, BookQuery};
use crate::commands::{directory, doctor, ledger, purchase};
use crate::config::BookloopConfig;
use crate::error::{BookloopError, Result};
use crate::model::{BookDetails, BookId, Role, User, CURRENCY};
use crate::store::RecordStore;
use tracing::debug;

pub use crate::commands::{CmdMessage, CmdResult, MessageLevel};

/// Username and password presented with each request.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// The main API facade, generic over the storage backend.
pub struct MarketApi<S: RecordStore> {
    store: S,
    config: BookloopConfig,
}

impl<S: RecordStore> MarketApi<S> {
    pub fn new(store: S, config: BookloopConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &BookloopConfig {
        &self.config
    }

    // --- Accounts ---

    /// Buyers and sellers may always register. An admin account can only be created while
    /// there is none.
    pub fn register(&self, username: &str, password: &str, role: Role) -> Result<CmdResult> {
        if username.trim().is_empty() {
            return Err(BookloopError::Validation(
                "Username cannot be empty".to_string(),
            ));
        }
        if username.trim() != username {
            return Err(BookloopError::Validation(
                "Username cannot start or end with whitespace".to_string(),
            ));
        }
        if password.chars().count() < self.config.min_password_length {
            return Err(BookloopError::Validation(format!(
                "Password must be at least {} characters long",
                self.config.min_password_length
            )));
        }
        let result = if directory::register(&self.store, username, password, role)? {
            CmdResult::default()
                .with_user(User::new(username, role))
                .with_message(CmdMessage::success("Registration successful!"))
        } else {
            CmdResult::default().with_message(CmdMessage::warning("Username already exists."))
        };
        Ok(result)
    }

    pub fn login(&self, credentials: &Credentials) -> Result<CmdResult> {
        let user = self.authenticate(credentials)?;
        let message = CmdMessage::success(format!(
            "Logged in as {} ({})",
            user.username, user.role
        ));
        Ok(CmdResult::default().with_user(user).with_message(message))
    }

    // --- Seller ---

    pub fn add_book(&self, credentials: &Credentials, details: BookDetails) -> Result<CmdResult> {
        let seller = self.authorize(credentials, &[Role::Seller])?;
        validate_details(&details)?;

        let book = catalog::add(&self.store, &seller.username, details)?;
        let message = CmdMessage::success(format!("Book added successfully! ({})", book.id));
        Ok(CmdResult::default()
            .with_books(vec![book])
            .with_message(message))
    }

    /// Edit one of the seller's own unsold listings.
    pub fn edit_book(
        &self,
        credentials: &Credentials,
        id: BookId,
        details: BookDetails,
    ) -> Result<CmdResult> {
        let seller = self.authorize(credentials, &[Role::Seller])?;
        validate_details(&details)?;

        let Some(book) = catalog::get(&self.store, id)? else {
            return Ok(not_found(id));
        };
        if book.seller != seller.username {
            return Err(BookloopError::Forbidden(format!(
                "book {} belongs to another seller",
                id
            )));
        }

        match catalog::edit(&self.store, id, details)? {
            Some(book) => Ok(CmdResult::default()
                .with_books(vec![book])
                .with_message(CmdMessage::success("Book updated successfully!"))),
            None => Ok(not_found(id)),
        }
    }

    pub fn my_books(&self, credentials: &Credentials) -> Result<CmdResult> {
        let seller = self.authorize(credentials, &[Role::Seller])?;
        let books = catalog::list_by_seller(&self.store, &seller.username)?;
        Ok(CmdResult::default().with_books(books))
    }

    /// Sellers may delete their own listings, admins any listing.
    pub fn delete_book(&self, credentials: &Credentials, id: BookId) -> Result<CmdResult> {
        let user = self.authorize(credentials, &[Role::Seller, Role::Admin])?;

        let Some(book) = catalog::get(&self.store, id)? else {
            return Ok(not_found(id));
        };
        if user.role == Role::Seller && book.seller != user.username {
            return Err(BookloopError::Forbidden(format!(
                "book {} belongs to another seller",
                id
            )));
        }

        match catalog::delete(&self.store, id)? {
            Some(book) => Ok(CmdResult::default()
                .with_books(vec![book])
                .with_message(CmdMessage::success("Book deleted!"))),
            None => Ok(not_found(id)),
        }
    }

    // --- Buyer ---

    pub fn search_books(&self, credentials: &Credentials, query: &BookQuery) -> Result<CmdResult> {
        self.authorize(credentials, &[Role::Buyer])?;
        let books = catalog::search(&self.store, query)?;
        let mut result = CmdResult::default();
        if books.is_empty() {
            result.add_message(CmdMessage::info("No books found."));
        }
        Ok(result.with_books(books))
    }

    pub fn purchase(&self, credentials: &Credentials, id: BookId) -> Result<CmdResult> {
        let buyer = self.authorize(credentials, &[Role::Buyer])?;
        let sale = purchase::run(&self.store, id, self.config.commission_rate)?;
        debug!(buyer = %buyer.username, %id, "purchase completed");

        let message = CmdMessage::success(format!(
            "Book purchased! Admin earned {} {:.2} commission.",
            CURRENCY, sale.commission
        ));
        Ok(CmdResult::default()
            .with_books(vec![sale.book])
            .with_commission(sale.commission)
            .with_message(message))
    }

    // --- Admin ---

    pub fn all_books(&self, credentials: &Credentials) -> Result<CmdResult> {
        self.authorize(credentials, &[Role::Admin])?;
        Ok(CmdResult::default().with_books(catalog::list(&self.store)?))
    }

    pub fn list_users(&self, credentials: &Credentials) -> Result<CmdResult> {
        self.authorize(credentials, &[Role::Admin])?;
        Ok(CmdResult::default().with_users(directory::list(&self.store)?))
    }

    pub fn delete_user(&self, credentials: &Credentials, username: &str) -> Result<CmdResult> {
        let admin = self.authorize(credentials, &[Role::Admin])?;
        if admin.username == username {
            return Err(BookloopError::Forbidden(
                "admins cannot delete their own account".to_string(),
            ));
        }

        let result = match directory::delete(&self.store, username)? {
            Some(user) => CmdResult::default()
                .with_users(vec![user])
                .with_message(CmdMessage::warning(format!("User '{}' deleted!", username))),
            None => CmdResult::default()
                .with_message(CmdMessage::warning(format!("User '{}' not found.", username))),
        };
        Ok(result)
    }

    pub fn profit(&self, credentials: &Credentials) -> Result<CmdResult> {
        self.authorize(credentials, &[Role::Admin])?;
        Ok(CmdResult::default().with_ledger(ledger::load(&self.store)?))
    }

    pub fn doctor(&self, credentials: &Credentials) -> Result<CmdResult> {
        self.authorize(credentials, &[Role::Admin])?;
        let report = doctor::run(&self.store)?;
        let mut result = CmdResult::default();

        if let Some((stored, recomputed)) = report.fixed_profit_total {
            result.add_message(CmdMessage::warning(format!(
                "Profit total was {:.2}, recomputed to {:.2} from transactions.",
                stored, recomputed
            )));
        }
        for id in &report.duplicate_ids {
            result.add_message(CmdMessage::warning(format!("Duplicate book id {}.", id)));
        }
        for id in &report.orphaned_books {
            result.add_message(CmdMessage::warning(format!(
                "Book {} belongs to a seller without an account.",
                id
            )));
        }
        for username in &report.unhashed_users {
            result.add_message(CmdMessage::warning(format!(
                "User '{}' still has a plain-text password; it is hashed on their next login.",
                username
            )));
        }
        if report.is_clean() {
            result.add_message(CmdMessage::success("No problems found."));
        }
        Ok(result.with_report(report))
    }

    // --- Helpers ---

    fn authenticate(&self, credentials: &Credentials) -> Result<User> {
        directory::login(&self.store, &credentials.username, &credentials.password)?
            .ok_or(BookloopError::InvalidCredentials)
    }

    fn authorize(&self, credentials: &Credentials, allowed: &[Role]) -> Result<User> {
        let user = self.authenticate(credentials)?;
        if !allowed.contains(&user.role) {
            return Err(BookloopError::Forbidden(format!(
                "{} accounts cannot do that",
                user.role
            )));
        }
        Ok(user)
    }
}

fn validate_details(details: &BookDetails) -> Result<()> {
    if details.title.trim().is_empty() || details.author.trim().is_empty() {
        return Err(BookloopError::Validation(
            "Please fill in at least Title and Author.".to_string(),
        ));
    }
    if !details.price.is_finite() || details.price < 0.0 {
        return Err(BookloopError::Validation(format!(
            "Price must be a non-negative number, got {}",
            details.price
        )));
    }
    Ok(())
}

fn not_found(id: BookId) -> CmdResult {
    CmdResult::default().with_message(CmdMessage::warning(format!("Book {} not found.", id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryStore;

    fn api() -> MarketApi<InMemoryStore> {
        let api = MarketApi::new(InMemoryStore::new(), BookloopConfig::default());
        api.register("sam", "sellerpw", Role::Seller).unwrap();
        api.register("nia", "sellerpw", Role::Seller).unwrap();
        api.register("bob", "buyerpw", Role::Buyer).unwrap();
        api.register("root", "adminpw", Role::Admin).unwrap();
        api
    }

    fn sam() -> Credentials {
        Credentials::new("sam", "sellerpw")
    }

    fn nia() -> Credentials {
        Credentials::new("nia", "sellerpw")
    }

    fn bob() -> Credentials {
        Credentials::new("bob", "buyerpw")
    }

    fn root() -> Credentials {
        Credentials::new("root", "adminpw")
    }

    fn list_dune(api: &MarketApi<InMemoryStore>) -> BookId {
        api.add_book(&sam(), BookDetails::new("Dune", "Herbert", 500.0))
            .unwrap()
            .books[0]
            .id
    }

    #[test]
    fn register_duplicate_is_a_warning() {
        let api = api();
        let result = api.register("sam", "otherpw", Role::Buyer).unwrap();
        assert!(result.user.is_none());
        assert_eq!(result.messages[0].level, MessageLevel::Warning);
        assert_eq!(result.messages[0].content, "Username already exists.");
    }

    #[test]
    fn register_validates_input() {
        let api = api();
        assert!(matches!(
            api.register("  ", "longenough", Role::Buyer),
            Err(BookloopError::Validation(_))
        ));
        assert!(matches!(
            api.register("kim", "abc", Role::Buyer),
            Err(BookloopError::Validation(_))
        ));
    }

    #[test]
    fn register_rejects_padded_usernames() {
        let api = api();
        assert!(matches!(
            api.register("alice ", "longenough", Role::Buyer),
            Err(BookloopError::Validation(_))
        ));
        assert!(matches!(
            api.register(" alice", "longenough", Role::Buyer),
            Err(BookloopError::Validation(_))
        ));
        assert!(matches!(
            api.login(&Credentials::new("alice", "longenough")),
            Err(BookloopError::InvalidCredentials)
        ));

        api.register("alice", "longenough", Role::Buyer).unwrap();
        assert!(api.login(&Credentials::new("alice", "longenough")).is_ok());
    }

    #[test]
    fn only_one_admin_can_bootstrap() {
        let api = api();
        assert!(matches!(
            api.register("root2", "adminpw", Role::Admin),
            Err(BookloopError::Forbidden(_))
        ));
    }

    #[test]
    fn login_reports_role_or_rejects() {
        let api = api();
        let result = api.login(&sam()).unwrap();
        assert_eq!(result.user.unwrap().role, Role::Seller);
        assert!(matches!(
            api.login(&Credentials::new("sam", "wrong")),
            Err(BookloopError::InvalidCredentials)
        ));
        assert!(matches!(
            api.login(&Credentials::new("ghost", "sellerpw")),
            Err(BookloopError::InvalidCredentials)
        ));
    }

    #[test]
    fn roles_are_enforced() {
        let api = api();
        let id = list_dune(&api);

        let details = BookDetails::new("Emma", "Austen", 10.0);
        assert!(matches!(
            api.add_book(&bob(), details.clone()),
            Err(BookloopError::Forbidden(_))
        ));
        assert!(matches!(
            api.purchase(&sam(), id),
            Err(BookloopError::Forbidden(_))
        ));
        assert!(matches!(
            api.list_users(&bob()),
            Err(BookloopError::Forbidden(_))
        ));
        assert!(matches!(
            api.search_books(&root(), &BookQuery::default()),
            Err(BookloopError::Forbidden(_))
        ));
        assert!(matches!(
            api.profit(&Credentials::new("root", "bad")),
            Err(BookloopError::InvalidCredentials)
        ));
    }

    #[test]
    fn add_book_requires_title_author_and_valid_price() {
        let api = api();
        assert!(matches!(
            api.add_book(&sam(), BookDetails::new("", "Herbert", 10.0)),
            Err(BookloopError::Validation(_))
        ));
        assert!(matches!(
            api.add_book(&sam(), BookDetails::new("Dune", "Herbert", -1.0)),
            Err(BookloopError::Validation(_))
        ));
        assert!(matches!(
            api.add_book(&sam(), BookDetails::new("Dune", "Herbert", f64::NAN)),
            Err(BookloopError::Validation(_))
        ));
        assert!(api.all_books(&root()).unwrap().books.is_empty());
    }

    #[test]
    fn sellers_only_touch_their_own_books() {
        let api = api();
        let id = list_dune(&api);

        let details = BookDetails::new("Dune Messiah", "Herbert", 450.0);
        assert!(matches!(
            api.edit_book(&nia(), id, details.clone()),
            Err(BookloopError::Forbidden(_))
        ));
        assert!(matches!(
            api.delete_book(&nia(), id),
            Err(BookloopError::Forbidden(_))
        ));

        let edited = api.edit_book(&sam(), id, details).unwrap();
        assert_eq!(edited.books[0].title, "Dune Messiah");
        assert!(api.my_books(&nia()).unwrap().books.is_empty());
        assert_eq!(api.my_books(&sam()).unwrap().books.len(), 1);
    }

    #[test]
    fn missing_book_is_a_warning() {
        let api = api();
        let result = api
            .edit_book(&sam(), BookId(1), BookDetails::new("X", "Y", 1.0))
            .unwrap();
        assert_eq!(result.messages[0].level, MessageLevel::Warning);
        assert!(result.books.is_empty());

        let result = api.delete_book(&root(), BookId(1)).unwrap();
        assert!(result.has_warnings());
    }

    #[test]
    fn purchase_flow_credits_commission() {
        let api = api();
        let id = list_dune(&api);

        let found = api.search_books(&bob(), &BookQuery::default()).unwrap();
        assert_eq!(found.books.len(), 1);

        let result = api.purchase(&bob(), id).unwrap();
        assert_eq!(result.commission, Some(50.0));
        assert_eq!(
            result.messages[0].content,
            "Book purchased! Admin earned LKR 50.00 commission."
        );

        let after = api.search_books(&bob(), &BookQuery::default()).unwrap();
        assert!(after.books.is_empty());
        assert_eq!(after.messages[0].content, "No books found.");

        assert!(matches!(
            api.edit_book(&sam(), id, BookDetails::new("X", "Y", 1.0)),
            Err(BookloopError::BookSold(_))
        ));

        let ledger = api.profit(&root()).unwrap().ledger.unwrap();
        assert_eq!(ledger.total_profit, 50.0);
        assert_eq!(ledger.transactions.len(), 1);
    }

    #[test]
    fn configured_rate_is_used() {
        let config = BookloopConfig {
            commission_rate: 0.2,
            ..BookloopConfig::default()
        };
        let api = MarketApi::new(InMemoryStore::new(), config);
        api.register("sam", "sellerpw", Role::Seller).unwrap();
        api.register("bob", "buyerpw", Role::Buyer).unwrap();
        let id = list_dune(&api);
        assert_eq!(api.purchase(&bob(), id).unwrap().commission, Some(100.0));
    }

    #[test]
    fn admin_manages_users_and_books() {
        let api = api();
        let id = list_dune(&api);

        assert!(matches!(
            api.delete_user(&root(), "root"),
            Err(BookloopError::Forbidden(_))
        ));
        let result = api.delete_user(&root(), "nia").unwrap();
        assert_eq!(result.users[0].username, "nia");
        let names: Vec<_> = api
            .list_users(&root())
            .unwrap()
            .users
            .into_iter()
            .map(|u| u.username)
            .collect();
        assert_eq!(names, vec!["bob", "root", "sam"]);

        let result = api.delete_user(&root(), "nia").unwrap();
        assert_eq!(result.messages[0].content, "User 'nia' not found.");

        assert_eq!(api.delete_book(&root(), id).unwrap().books[0].id, id);
        assert!(api.all_books(&root()).unwrap().books.is_empty());
    }

    #[test]
    fn doctor_reports_orphans() {
        let api = api();
        list_dune(&api);
        assert!(api.doctor(&root()).unwrap().report.unwrap().is_clean());

        api.delete_user(&root(), "sam").unwrap();
        let result = api.doctor(&root()).unwrap();
        assert_eq!(result.report.as_ref().unwrap().orphaned_books.len(), 1);
        assert!(result.has_warnings());
    }
}
