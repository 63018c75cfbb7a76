//! Inventory Tracker - Product Inventory over SQLite
//!
//! Imports product records from a CSV file into a local SQLite database,
//! offers an interactive console menu (view / add / back up), and exports
//! the inventory back to CSV. Duplicate product names merge with
//! latest-timestamp-wins semantics.

pub mod csv_io;
pub mod database;
pub mod error;
pub mod menu;
pub mod models;

pub use database::{ImportStats, UpsertOutcome};
pub use error::{InventoryError, Result};
pub use models::{NewProduct, Product};
