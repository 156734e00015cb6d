use bookloop::model::{BookId, Role};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Returns the version string, including the git hash for non-release builds.
/// Format: "0.3.2" for releases, "0.3.2@abc1234" for dev builds
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{}", VERSION, GIT_HASH)
        }
    })
}

#[derive(Parser, Debug)]
#[command(name = "bookloop", bin_name = "bookloop", version = get_version())]
#[command(about = "Buy and sell used books", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding books.json, users.json and admin_profit.json
    #[arg(long, env = "BOOKLOOP_HOME", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Username to act as
    #[arg(short, long, env = "BOOKLOOP_USER", global = true)]
    pub user: Option<String>,

    /// Password for --user
    #[arg(
        short,
        long,
        env = "BOOKLOOP_PASSWORD",
        global = true,
        hide_env_values = true
    )]
    pub password: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Args, Debug, Clone)]
pub struct BookArgs {
    /// Book title
    pub title: String,

    /// Author
    pub author: String,

    /// Price (LKR)
    pub price: f64,

    /// Category (e.g. Science, Business, IT, Fantasy)
    #[arg(short, long, default_value = "")]
    pub category: String,

    /// District
    #[arg(short, long, default_value = "")]
    pub district: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an account (password from --password)
    Register {
        username: String,

        /// buyer, seller, or admin (admin only while none exists)
        #[arg(short, long, default_value = "buyer")]
        role: Role,
    },

    /// Check credentials and show the account's role
    Login,

    /// List a book for sale (seller)
    #[command(alias = "add")]
    Sell(BookArgs),

    /// Change one of your unsold listings (seller)
    Edit {
        id: BookId,

        #[command(flatten)]
        book: BookArgs,
    },

    /// Delete a listing (seller: own books, admin: any)
    #[command(alias = "rm")]
    Remove { id: BookId },

    /// Show your listings, sold or not (seller)
    Mine,

    /// Search unsold books by title or author (buyer)
    Search {
        /// Matches title or author; empty matches everything
        #[arg(default_value = "")]
        keyword: String,

        #[arg(short, long, default_value = "")]
        category: String,

        #[arg(short, long, default_value = "")]
        district: String,
    },

    /// Buy a book (buyer)
    Buy { id: BookId },

    /// Show every book (admin)
    Books,

    /// Show every account (admin)
    Users,

    /// Delete an account (admin)
    RemoveUser { username: String },

    /// Show platform profit and commission history (admin)
    Profit,

    /// Check the data files for inconsistencies (admin)
    Doctor,

    /// Get or set configuration
    Config {
        /// Configuration key (e.g., commission-rate)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sell_with_filters() {
        let cli = Cli::try_parse_from([
            "bookloop", "-u", "sam", "-p", "pw", "sell", "Dune", "Herbert", "500", "-c",
            "Fantasy",
        ])
        .unwrap();
        match cli.command {
            Commands::Sell(book) => {
                assert_eq!(book.title, "Dune");
                assert_eq!(book.price, 500.0);
                assert_eq!(book.category, "Fantasy");
                assert_eq!(book.district, "");
            }
            other => panic!("unexpected command {:?}", other),
        }
        assert_eq!(cli.user.as_deref(), Some("sam"));
    }

    #[test]
    fn parses_typed_ids_and_roles() {
        let cli = Cli::try_parse_from(["bookloop", "buy", "1700000000000"]).unwrap();
        assert!(matches!(cli.command, Commands::Buy { id } if id == BookId(1_700_000_000_000)));

        let cli = Cli::try_parse_from(["bookloop", "register", "kim", "-r", "Seller"]).unwrap();
        assert!(matches!(cli.command, Commands::Register { role: Role::Seller, .. }));

        assert!(Cli::try_parse_from(["bookloop", "buy", "abc"]).is_err());
        assert!(Cli::try_parse_from(["bookloop", "register", "kim", "-r", "owner"]).is_err());
    }

    #[test]
    fn search_keyword_is_optional() {
        let cli = Cli::try_parse_from(["bookloop", "search", "--district", "Kandy"]).unwrap();
        match cli.command {
            Commands::Search {
                keyword, district, ..
            } => {
                assert_eq!(keyword, "");
                assert_eq!(district, "Kandy");
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
