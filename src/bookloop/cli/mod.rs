//! Terminal client. Parses arguments, calls the API, prints what comes back.

mod handlers;
mod logging;
mod print;
mod setup;

use bookloop::error::{BookloopError, Result};
use clap::Parser;
use colored::Colorize;
use setup::{Cli, Commands};

pub fn run() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = dispatch(cli) {
        eprintln!("{} {}", "Error:".red(), e);
        std::process::exit(1);
    }
}

fn dispatch(cli: Cli) -> Result<()> {
    let ctx = handlers::AppContext::init(&cli)?;
    let credentials = || handlers::credentials(cli.user.clone(), cli.password.clone());

    match cli.command {
        Commands::Register { ref username, role } => {
            let password = cli.password.as_deref().ok_or_else(|| missing("--password"))?;
            handlers::register(&ctx, username, password, role)
        }
        Commands::Config { key, value } => handlers::config(&ctx, key, value),
        Commands::Login => handlers::login(&ctx, &credentials()?),
        Commands::Sell(book) => handlers::sell(&ctx, &credentials()?, book),
        Commands::Edit { id, book } => handlers::edit(&ctx, &credentials()?, id, book),
        Commands::Remove { id } => handlers::remove(&ctx, &credentials()?, id),
        Commands::Mine => handlers::mine(&ctx, &credentials()?),
        Commands::Search {
            keyword,
            category,
            district,
        } => handlers::search(&ctx, &credentials()?, keyword, category, district),
        Commands::Buy { id } => handlers::buy(&ctx, &credentials()?, id),
        Commands::Books => handlers::books(&ctx, &credentials()?),
        Commands::Users => handlers::users(&ctx, &credentials()?),
        Commands::RemoveUser { username } => {
            handlers::remove_user(&ctx, &credentials()?, &username)
        }
        Commands::Profit => handlers::profit(&ctx, &credentials()?),
        Commands::Doctor => handlers::doctor(&ctx, &credentials()?),
    }
}

fn missing(flag: &str) -> BookloopError {
    BookloopError::Validation(format!("{} is required for this command", flag))
}
