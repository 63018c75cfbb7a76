//! Error types for the inventory tracker

use std::fmt;

/// Unified error type for inventory operations
#[derive(Debug)]
pub enum InventoryError {
    /// File I/O error
    Io(std::io::Error),
    /// CSV read or write failed
    Csv(csv::Error),
    /// Database operation failed
    Database(rusqlite::Error),
    /// Price string could not be parsed into cents
    InvalidPrice(String),
    /// Quantity string was not a non-negative integer
    InvalidQuantity(String),
    /// Date string did not match the expected format
    InvalidDate(String),
}

impl fmt::Display for InventoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InventoryError::Io(e) => write!(f, "I/O error: {}", e),
            InventoryError::Csv(e) => write!(f, "CSV error: {}", e),
            InventoryError::Database(e) => write!(f, "Database error: {}", e),
            InventoryError::InvalidPrice(value) => write!(f, "Invalid price: '{}'", value),
            InventoryError::InvalidQuantity(value) => write!(f, "Invalid quantity: '{}'", value),
            InventoryError::InvalidDate(value) => write!(f, "Invalid date: '{}'", value),
        }
    }
}

impl std::error::Error for InventoryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InventoryError::Io(e) => Some(e),
            InventoryError::Csv(e) => Some(e),
            InventoryError::Database(e) => Some(e),
            InventoryError::InvalidPrice(_) => None,
            InventoryError::InvalidQuantity(_) => None,
            InventoryError::InvalidDate(_) => None,
        }
    }
}

impl From<std::io::Error> for InventoryError {
    fn from(err: std::io::Error) -> Self {
        InventoryError::Io(err)
    }
}

impl From<csv::Error> for InventoryError {
    fn from(err: csv::Error) -> Self {
        InventoryError::Csv(err)
    }
}

impl From<rusqlite::Error> for InventoryError {
    fn from(err: rusqlite::Error) -> Self {
        InventoryError::Database(err)
    }
}

/// Result alias for inventory operations
pub type Result<T> = std::result::Result<T, InventoryError>;
