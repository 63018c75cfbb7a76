//! Product model and field-level parsing.
//!
//! Prices are stored as integer cents and timestamps as ISO text
//! (`YYYY-MM-DD HH:MM:SS`). ISO text compares lexicographically in
//! chronological order, so plain string comparison is the timestamp
//! comparison everywhere in the crate.

use crate::error::{InventoryError, Result};
use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::Deserialize;

/// Timestamp format used at rest and in the view handler.
pub const STORE_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Date format used by the import and backup CSV files (month/day/year).
pub const CSV_DATE_FORMAT: &str = "%m/%d/%Y";

/// A product row as stored in the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub product_id: i64,
    pub name: String,
    pub quantity: i64,
    pub price_cents: i64,
    /// ISO timestamp (`YYYY-MM-DD HH:MM:SS`)
    pub date_updated: String,
}

/// An incoming product record, before it has a database id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub quantity: i64,
    pub price_cents: i64,
    /// ISO timestamp (`YYYY-MM-DD HH:MM:SS`)
    pub date_updated: String,
}

/// Raw CSV row; field names match the file headers.
#[derive(Debug, Deserialize)]
pub struct ProductCsvRow {
    pub product_name: String,
    pub product_price: String,
    pub product_quantity: String,
    pub date_updated: String,
}

impl ProductCsvRow {
    /// Normalizes the raw row into a [`NewProduct`] (cents + ISO date).
    pub fn normalize(&self) -> Result<NewProduct> {
        let quantity = parse_quantity(&self.product_quantity)?;
        let price_cents = parse_price_cents(&self.product_price)?;
        let date_updated = parse_csv_date(&self.date_updated)?;
        Ok(NewProduct {
            name: self.product_name.clone(),
            quantity,
            price_cents,
            date_updated,
        })
    }
}

/// Parses a quantity string into a non-negative integer.
pub fn parse_quantity(quantity_str: &str) -> Result<i64> {
    match quantity_str.trim().parse::<i64>() {
        Ok(quantity) if quantity >= 0 => Ok(quantity),
        _ => {
            log::warn!("Failed to parse quantity '{quantity_str}'");
            Err(InventoryError::InvalidQuantity(quantity_str.to_string()))
        }
    }
}

/// Parses a price string with an optional leading `$` into integer cents.
///
/// Accepts "5", "5.99" and "$5.99"; the amount is rounded to whole cents.
/// Negative and non-finite amounts are rejected.
pub fn parse_price_cents(price_str: &str) -> Result<i64> {
    let clean = price_str.trim().trim_start_matches('$').trim();
    let amount = clean
        .parse::<f64>()
        .map_err(|_| InventoryError::InvalidPrice(price_str.to_string()))?;
    if !amount.is_finite() || amount < 0.0 {
        log::warn!("Rejected price '{price_str}'");
        return Err(InventoryError::InvalidPrice(price_str.to_string()));
    }
    Ok((amount * 100.0).round() as i64)
}

/// Formats integer cents as a decimal amount (599 -> "5.99").
pub fn format_price(cents: i64) -> String {
    format!("{}.{:02}", cents / 100, cents % 100)
}

/// Parses a CSV date (`%m/%d/%Y`) into the ISO storage form at midnight.
pub fn parse_csv_date(date_str: &str) -> Result<String> {
    let date = NaiveDate::parse_from_str(date_str.trim(), CSV_DATE_FORMAT)
        .map_err(|_| InventoryError::InvalidDate(date_str.to_string()))?;
    Ok(format!("{} 00:00:00", date.format("%Y-%m-%d")))
}

/// Formats a stored ISO timestamp back to the CSV date form.
///
/// A timestamp that does not parse is passed through unchanged.
pub fn format_csv_date(timestamp: &str) -> String {
    match NaiveDateTime::parse_from_str(timestamp, STORE_DATE_FORMAT) {
        Ok(dt) => dt.format(CSV_DATE_FORMAT).to_string(),
        Err(_) => timestamp.to_string(),
    }
}

/// Returns the current local time in the ISO storage form.
pub fn now_timestamp() -> String {
    Local::now().format(STORE_DATE_FORMAT).to_string()
}
