use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use super::transaction::TransactionType;

/// Transaction category
///
/// Serialized with the identifiers the mobile app persisted, so existing
/// snapshots load unchanged. `Other` is shared by both transaction types.
/// Unrecognized identifiers deserialize to `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    #[serde(rename = "Comida")]
    Food,
    #[serde(rename = "Transporte")]
    Transport,
    #[serde(rename = "Ocio")]
    Leisure,
    #[serde(rename = "Salud")]
    Health,
    #[serde(rename = "Hogar")]
    Home,
    #[serde(rename = "Salario")]
    Salary,
    #[serde(rename = "Freelance")]
    Freelance,
    #[serde(rename = "Inversiones")]
    Investments,
    #[serde(rename = "Regalos")]
    Gifts,
    #[serde(rename = "Otros")]
    Other,
}

const ALL_CATEGORIES: [Category; 10] = [
    Category::Food,
    Category::Transport,
    Category::Leisure,
    Category::Health,
    Category::Home,
    Category::Salary,
    Category::Freelance,
    Category::Investments,
    Category::Gifts,
    Category::Other,
];

const EXPENSE_CATEGORIES: [Category; 6] = [
    Category::Food,
    Category::Transport,
    Category::Leisure,
    Category::Health,
    Category::Home,
    Category::Other,
];

const INCOME_CATEGORIES: [Category; 5] = [
    Category::Salary,
    Category::Freelance,
    Category::Investments,
    Category::Gifts,
    Category::Other,
];

impl Category {
    /// Categories selectable for a transaction type, in display order
    pub fn for_type(tx_type: TransactionType) -> &'static [Category] {
        match tx_type {
            TransactionType::Expense => &EXPENSE_CATEGORIES,
            TransactionType::Income => &INCOME_CATEGORIES,
        }
    }

    /// Whether this category belongs to the enumeration of `tx_type`
    pub fn is_valid_for(&self, tx_type: TransactionType) -> bool {
        Self::for_type(tx_type).contains(self)
    }

    /// Category with the given persisted identifier, if it is a known one
    pub fn from_identifier(identifier: &str) -> Option<Category> {
        ALL_CATEGORIES
            .iter()
            .copied()
            .find(|c| c.as_str() == identifier)
    }

    /// Identifier as persisted and shown in chart legends
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "Comida",
            Category::Transport => "Transporte",
            Category::Leisure => "Ocio",
            Category::Health => "Salud",
            Category::Home => "Hogar",
            Category::Salary => "Salario",
            Category::Freelance => "Freelance",
            Category::Investments => "Inversiones",
            Category::Gifts => "Regalos",
            Category::Other => "Otros",
        }
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let identifier = String::deserialize(deserializer)?;
        Ok(Category::from_identifier(&identifier).unwrap_or_else(|| {
            warn!(
                "Unknown category '{}', filing under '{}'",
                identifier,
                Category::Other
            );
            Category::Other
        }))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
