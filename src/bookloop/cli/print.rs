use bookloop::api::{CmdMessage, MessageLevel};
use bookloop::model::{Book, ProfitLedger, User, CURRENCY};
use colored::Colorize;
use unicode_width::UnicodeWidthStr;

const TITLE_WIDTH: usize = 32;

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
        }
    }
}

/// One line per book. `with_seller` adds the seller column for buyer and admin views.
pub(super) fn print_books(books: &[Book], with_seller: bool) {
    if books.is_empty() {
        println!("No books found.");
        return;
    }

    for book in books {
        let status = if book.sold {
            book.status().red()
        } else {
            book.status().green()
        };
        let mut line = format!(
            "{}  {} by {} | {} {:.2} | {} | {}",
            book.id.to_string().yellow(),
            pad_to_width(&book.title, TITLE_WIDTH).bold(),
            book.author,
            CURRENCY,
            book.price,
            book.category,
            book.district,
        );
        if with_seller {
            line.push_str(&format!(" | Seller: {}", book.seller));
        }
        println!("{} | {}", line, status);
    }
}

pub(super) fn print_users(users: &[User]) {
    if users.is_empty() {
        println!("No users found.");
        return;
    }
    for user in users {
        println!("{} ({})", user.username.bold(), user.role);
    }
}

pub(super) fn print_ledger(ledger: &ProfitLedger) {
    println!(
        "Total Profit ({}): {}",
        CURRENCY,
        format!("{:.2}", ledger.total_profit).green().bold()
    );
    for t in &ledger.transactions {
        println!(
            "  {} - Seller: {} - Commission: {} {:.2}",
            t.book, t.seller, CURRENCY, t.commission
        );
    }
}

/// Pad (or truncate with an ellipsis) to a display width.
fn pad_to_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        return format!("{}{}", text, " ".repeat(width - text.width()));
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    used += 1;
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}
