//! CSV import and backup for the inventory store.
//!
//! The import and backup files share one shape: `product_name`,
//! `product_price` (decimal amount, optional leading `$` on import),
//! `product_quantity`, `date_updated` (month/day/year).

use crate::database::{self, ImportStats};
use crate::error::Result;
use crate::models::{format_csv_date, format_price, NewProduct, ProductCsvRow};
use rusqlite::Connection;
use std::path::Path;

/// Column headers shared by the import and backup formats.
const CSV_HEADERS: [&str; 4] = [
    "product_name",
    "product_price",
    "product_quantity",
    "date_updated",
];

/// Reads an inventory CSV into normalized product records.
///
/// Rows are trimmed and parsed through the field parsers in `models`;
/// a malformed row fails the whole read.
pub fn read_products_csv(path: &Path) -> Result<Vec<NewProduct>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut products = Vec::new();
    for result in rdr.deserialize() {
        let row: ProductCsvRow = result?;
        products.push(row.normalize()?);
    }

    log::debug!("Read {} product rows from {}", products.len(), path.display());
    Ok(products)
}

/// Imports an inventory CSV with latest-timestamp-wins merging.
pub fn import_csv(conn: &mut Connection, path: &Path) -> Result<ImportStats> {
    log::info!("Importing inventory from {}", path.display());
    let products = read_products_csv(path)?;
    let stats = database::import_products(conn, &products)?;
    Ok(stats)
}

/// Writes every product to `path` as CSV, truncating any existing file.
///
/// Prices are rendered as decimal amounts (cents / 100) and dates as
/// month/day/year, so a backup can be re-imported as-is.
pub fn backup_csv(conn: &Connection, path: &Path) -> Result<usize> {
    let products = database::all_products(conn)?;

    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(CSV_HEADERS)?;
    for product in &products {
        let price = format_price(product.price_cents);
        let quantity = product.quantity.to_string();
        let date = format_csv_date(&product.date_updated);
        wtr.write_record([product.name.as_str(), price.as_str(), quantity.as_str(), date.as_str()])?;
    }
    wtr.flush()?;

    log::info!("Backed up {} products to {}", products.len(), path.display());
    Ok(products.len())
}
