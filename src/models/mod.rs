pub mod category;
pub mod legacy;
pub mod transaction;

pub use category::Category;
pub use legacy::{LegacyExpense, StoredCollection};
pub use transaction::{
    parse_amount, Transaction, TransactionId, TransactionInput, TransactionType, MAX_AMOUNT,
    MAX_NOTE_CHARS,
};
