use super::print::{print_books, print_ledger, print_messages, print_users};
use super::setup::{BookArgs, Cli};
use bookloop::api::{CmdMessage, Credentials, MarketApi};
use bookloop::commands::catalog::BookQuery;
use bookloop::config::BookloopConfig;
use bookloop::error::{BookloopError, Result};
use bookloop::model::{BookDetails, BookId, Role};
use bookloop::store::fs::FileStore;
use directories::ProjectDirs;
use std::path::PathBuf;
use tracing::debug;

pub struct AppContext {
    pub api: MarketApi<FileStore>,
    pub data_dir: PathBuf,
}

impl AppContext {
    pub fn init(cli: &Cli) -> Result<Self> {
        let data_dir = match &cli.data_dir {
            Some(dir) => dir.clone(),
            None => ProjectDirs::from("com", "bookloop", "bookloop")
                .map(|dirs| dirs.data_dir().to_path_buf())
                .ok_or_else(|| {
                    BookloopError::Store("Could not determine a data directory".to_string())
                })?,
        };
        debug!(data_dir = %data_dir.display(), "using data directory");

        let config = BookloopConfig::load(&data_dir)?;
        let store = FileStore::new(&data_dir).with_config(&config);
        Ok(Self {
            api: MarketApi::new(store, config),
            data_dir,
        })
    }
}

pub fn credentials(user: Option<String>, password: Option<String>) -> Result<Credentials> {
    match (user, password) {
        (Some(user), Some(password)) => Ok(Credentials::new(user, password)),
        _ => Err(BookloopError::Validation(
            "--user and --password are required for this command".to_string(),
        )),
    }
}

fn details(book: BookArgs) -> BookDetails {
    BookDetails::new(book.title, book.author, book.price)
        .with_category(book.category)
        .with_district(book.district)
}

pub fn register(ctx: &AppContext, username: &str, password: &str, role: Role) -> Result<()> {
    let result = ctx.api.register(username, password, role)?;
    print_messages(&result.messages);
    Ok(())
}

pub fn login(ctx: &AppContext, credentials: &Credentials) -> Result<()> {
    let result = ctx.api.login(credentials)?;
    print_messages(&result.messages);
    Ok(())
}

pub fn sell(ctx: &AppContext, credentials: &Credentials, book: BookArgs) -> Result<()> {
    let result = ctx.api.add_book(credentials, details(book))?;
    print_messages(&result.messages);
    Ok(())
}

pub fn edit(ctx: &AppContext, credentials: &Credentials, id: BookId, book: BookArgs) -> Result<()> {
    let result = ctx.api.edit_book(credentials, id, details(book))?;
    print_messages(&result.messages);
    Ok(())
}

pub fn remove(ctx: &AppContext, credentials: &Credentials, id: BookId) -> Result<()> {
    let result = ctx.api.delete_book(credentials, id)?;
    print_messages(&result.messages);
    Ok(())
}

pub fn mine(ctx: &AppContext, credentials: &Credentials) -> Result<()> {
    let result = ctx.api.my_books(credentials)?;
    print_books(&result.books, false);
    Ok(())
}

pub fn search(
    ctx: &AppContext,
    credentials: &Credentials,
    keyword: String,
    category: String,
    district: String,
) -> Result<()> {
    let query = BookQuery::keyword(keyword)
        .with_category(category)
        .with_district(district);
    let result = ctx.api.search_books(credentials, &query)?;
    if !result.books.is_empty() {
        print_books(&result.books, true);
    }
    print_messages(&result.messages);
    Ok(())
}

pub fn buy(ctx: &AppContext, credentials: &Credentials, id: BookId) -> Result<()> {
    let result = ctx.api.purchase(credentials, id)?;
    print_messages(&result.messages);
    Ok(())
}

pub fn books(ctx: &AppContext, credentials: &Credentials) -> Result<()> {
    let result = ctx.api.all_books(credentials)?;
    print_books(&result.books, true);
    Ok(())
}

pub fn users(ctx: &AppContext, credentials: &Credentials) -> Result<()> {
    let result = ctx.api.list_users(credentials)?;
    print_users(&result.users);
    Ok(())
}

pub fn remove_user(ctx: &AppContext, credentials: &Credentials, username: &str) -> Result<()> {
    let result = ctx.api.delete_user(credentials, username)?;
    print_messages(&result.messages);
    Ok(())
}

pub fn profit(ctx: &AppContext, credentials: &Credentials) -> Result<()> {
    let result = ctx.api.profit(credentials)?;
    if let Some(ledger) = &result.ledger {
        print_ledger(ledger);
    }
    Ok(())
}

pub fn doctor(ctx: &AppContext, credentials: &Credentials) -> Result<()> {
    let result = ctx.api.doctor(credentials)?;
    print_messages(&result.messages);
    Ok(())
}

pub fn config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let mut config = ctx.api.config().clone();

    match (key, value) {
        (None, _) => {
            for key in BookloopConfig::KEYS {
                if let Some(value) = config.get(key) {
                    println!("{} = {}", key, value);
                }
            }
        }
        (Some(key), None) => match config.get(&key) {
            Some(value) => println!("{}", value),
            None => {
                return Err(BookloopError::Validation(format!(
                    "Unknown config key: {}",
                    key
                )))
            }
        },
        (Some(key), Some(value)) => {
            config.set(&key, &value)?;
            config.save(&ctx.data_dir)?;
            print_messages(&[CmdMessage::success(format!("{} set to {}", key, value))]);
        }
    }
    Ok(())
}
