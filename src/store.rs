use std::collections::HashSet;

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::error::Result;
use crate::models::transaction::check_amount;
use crate::models::{
    Category, Transaction, TransactionId, TransactionInput, TransactionType, MAX_NOTE_CHARS,
};

/// Totals shown on the balance card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceSummary {
    pub total_incomes: Decimal,
    pub total_expenses: Decimal,
    pub balance: Decimal,
}

/// In-memory collection of transactions, most recent first
///
/// The store is the single source of truth. Totals are recomputed from the
/// list on every query, never cached.
#[derive(Debug, Clone)]
pub struct TransactionStore {
    /// Transactions in display order (newest insertion first)
    transactions: Vec<Transaction>,
    /// Maximum note length accepted by `add`/`update`
    max_note_chars: usize,
}

impl TransactionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            transactions: Vec::new(),
            max_note_chars: MAX_NOTE_CHARS,
        }
    }

    /// Override the note length limit
    pub fn with_max_note_chars(mut self, max_note_chars: usize) -> Self {
        self.max_note_chars = max_note_chars;
        self
    }

    /// Hydrate a store from previously persisted transactions
    ///
    /// Order is kept as given. Stored data gets the same checks as new
    /// input, repaired where possible:
    ///
    /// - an amount that is not positive or exceeds `MAX_AMOUNT` cannot be
    ///   repaired, the record is dropped
    /// - a category outside its type's set is filed under `Other`
    /// - a repeated id is replaced with a fresh one
    ///
    /// Every repair is logged at `warn` level.
    pub fn from_transactions(transactions: Vec<Transaction>) -> Self {
        let mut seen = HashSet::with_capacity(transactions.len());
        let mut hydrated = Vec::with_capacity(transactions.len());

        for mut tx in transactions {
            if let Err(e) = check_amount(tx.amount) {
                warn!("Dropping stored transaction {}: {}", tx.id, e);
                continue;
            }

            if !tx.category.is_valid_for(tx.tx_type) {
                warn!(
                    "Stored transaction {} has category '{}' not valid for {}, filing under '{}'",
                    tx.id,
                    tx.category,
                    tx.tx_type,
                    Category::Other
                );
                tx.category = Category::Other;
            }

            if !seen.insert(tx.id.clone()) {
                let fresh = Self::fresh_id(&seen);
                warn!(
                    "Duplicate transaction id {} in stored data, reassigned to {}",
                    tx.id, fresh
                );
                seen.insert(fresh.clone());
                tx.id = fresh;
            }
            hydrated.push(tx);
        }

        Self {
            transactions: hydrated,
            max_note_chars: MAX_NOTE_CHARS,
        }
    }

    fn fresh_id(taken: &HashSet<TransactionId>) -> TransactionId {
        loop {
            let id = TransactionId::generate();
            if !taken.contains(&id) {
                return id;
            }
        }
    }

    fn contains_id(&self, id: &TransactionId) -> bool {
        self.transactions.iter().any(|t| &t.id == id)
    }

    /// Validate `input` and insert it at the front of the collection
    ///
    /// # Arguments
    ///
    /// * `input` - Every field of the new transaction except its id
    ///
    /// # Returns
    ///
    /// The generated id, or the validation error. A rejected input leaves
    /// the collection untouched.
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::DateTime;
    /// use finance_tracker::models::{Category, TransactionInput};
    /// use finance_tracker::store::TransactionStore;
    /// use rust_decimal_macros::dec;
    ///
    /// let mut store = TransactionStore::new();
    /// let date = DateTime::parse_from_rfc3339("2024-01-15T10:00:00+01:00").unwrap();
    ///
    /// let id = store
    ///     .add(TransactionInput::income(dec!(900), Category::Salary, date))
    ///     .unwrap();
    ///
    /// assert_eq!(store.get(&id).unwrap().amount, dec!(900));
    /// assert!(store
    ///     .add(TransactionInput::income(dec!(0), Category::Salary, date))
    ///     .is_err());
    /// ```
    pub fn add(&mut self, input: TransactionInput) -> Result<TransactionId> {
        if let Err(e) = input.validate(self.max_note_chars) {
            warn!("Rejecting new transaction: {}", e);
            return Err(e);
        }

        let id = loop {
            let candidate = TransactionId::generate();
            if !self.contains_id(&candidate) {
                break candidate;
            }
        };

        debug!(
            "Adding {} transaction {} of {} ({})",
            input.tx_type, id, input.amount, input.category
        );
        self.transactions
            .insert(0, Transaction::from_input(id.clone(), input));

        Ok(id)
    }

    /// Replace every field except the id of the transaction matching `id`
    ///
    /// # Arguments
    ///
    /// * `id` - Transaction to replace
    /// * `input` - New field values, validated like `add`
    ///
    /// # Returns
    ///
    /// `Ok(true)` when the transaction was replaced in place, `Ok(false)`
    /// without touching the collection when no transaction has that id
    pub fn update(&mut self, id: &TransactionId, input: TransactionInput) -> Result<bool> {
        if let Err(e) = input.validate(self.max_note_chars) {
            warn!("Rejecting update of transaction {}: {}", id, e);
            return Err(e);
        }

        let tx = match self.transactions.iter_mut().find(|t| &t.id == id) {
            Some(t) => t,
            None => {
                debug!("Ignoring update of unknown transaction {}", id);
                return Ok(false);
            }
        };

        *tx = Transaction::from_input(id.clone(), input);
        debug!("Updated transaction {}", id);
        Ok(true)
    }

    /// Remove the transaction matching `id`
    ///
    /// Returns false when nothing matched; the collection is then unchanged.
    pub fn delete(&mut self, id: &TransactionId) -> bool {
        let before = self.transactions.len();
        self.transactions.retain(|t| &t.id != id);

        let removed = self.transactions.len() != before;
        if removed {
            debug!("Deleted transaction {}", id);
        } else {
            debug!("Ignoring delete of unknown transaction {}", id);
        }
        removed
    }

    /// Look up a transaction by id
    pub fn get(&self, id: &TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|t| &t.id == id)
    }

    /// All transactions in store order
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Number of transactions held
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    fn total_of(&self, tx_type: TransactionType) -> Decimal {
        self.transactions
            .iter()
            .filter(|t| t.tx_type == tx_type)
            .fold(Decimal::ZERO, |acc, t| acc.saturating_add(t.amount))
    }

    /// Sum of all expense amounts
    pub fn total_expenses(&self) -> Decimal {
        self.total_of(TransactionType::Expense)
    }

    /// Sum of all income amounts
    pub fn total_incomes(&self) -> Decimal {
        self.total_of(TransactionType::Income)
    }

    /// Incomes minus expenses, may be negative
    pub fn balance(&self) -> Decimal {
        self.total_incomes().saturating_sub(self.total_expenses())
    }

    /// Both totals and the balance, as shown on the balance card
    ///
    /// Equivalent to calling `total_incomes`, `total_expenses` and
    /// `balance` in turn.
    pub fn summary(&self) -> BalanceSummary {
        let total_incomes = self.total_incomes();
        let total_expenses = self.total_expenses();
        BalanceSummary {
            total_incomes,
            total_expenses,
            balance: total_incomes.saturating_sub(total_expenses),
        }
    }

    /// Transactions of one type, in store order
    pub fn by_type(&self, tx_type: TransactionType) -> Vec<&Transaction> {
        self.transactions
            .iter()
            .filter(|t| t.tx_type == tx_type)
            .collect()
    }

    /// Consume the store and return its transactions in store order
    pub fn into_transactions(self) -> Vec<Transaction> {
        self.transactions
    }
}

impl Default for TransactionStore {
    fn default() -> Self {
        Self::new()
    }
}
