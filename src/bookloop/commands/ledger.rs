use crate::error::Result;
use crate::model::{round_currency, Commission, ProfitLedger};
use crate::store::{Collection, RecordStore};
use tracing::info;

pub use crate::config::DEFAULT_COMMISSION_RATE;

pub fn load<S: RecordStore>(store: &S) -> Result<ProfitLedger> {
    store.load(Collection::Profit, ProfitLedger::default())
}

/// Record the platform's cut of a sale and return it.
///
/// The commission is `price * rate` rounded to cents. It is appended to the transaction
/// log and added to the running total in the same write, which keeps the total equal to
/// the sum of the log.
pub fn add_commission<S: RecordStore>(
    store: &S,
    price: f64,
    book_title: &str,
    seller: &str,
    rate: f64,
) -> Result<f64> {
    let commission = round_currency(price * rate);
    store.update(Collection::Profit, ProfitLedger::default(), |ledger| {
        ledger.total_profit = round_currency(ledger.total_profit + commission);
        ledger.transactions.push(Commission {
            book: book_title.to_string(),
            seller: seller.to_string(),
            commission,
        });
        Ok(())
    })?;
    info!(book = book_title, seller, commission, "commission recorded");
    Ok(commission)
}
