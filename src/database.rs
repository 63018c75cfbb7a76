//! Database operations for the inventory store.
//!
//! Uses parameterized queries exclusively. Batch writes are transactional.
//! Name conflicts resolve by timestamp: the record with the later
//! `date_updated` wins, and an incoming record also wins an exact tie.
//! Timestamps are ISO text, so string comparison is the timestamp
//! comparison.

use crate::models::{NewProduct, Product};
use rusqlite::{params, Connection, Transaction};

/// Result type for database operations
pub type DbResult<T> = rusqlite::Result<T>;

/// Outcome of a single upsert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// A new row was created with this product id
    Inserted(i64),
    /// An existing row with the same name was overwritten
    Updated,
    /// The stored record was newer; the incoming one was discarded
    SkippedOlder,
}

/// Statistics from a batch import
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ImportStats {
    /// Rows that created a new product
    pub inserted: usize,
    /// Rows that overwrote an existing product with newer data
    pub updated: usize,
    /// Rows discarded because the stored record was newer
    pub skipped: usize,
}

/// Initialize the database schema
///
/// Creates the `products` table if it does not exist. Product names are
/// unique; the upsert resolves conflicts instead of the constraint firing.
pub fn init_schema(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS products (
            product_id       INTEGER PRIMARY KEY AUTOINCREMENT,
            product_name     TEXT NOT NULL UNIQUE,
            product_quantity INTEGER NOT NULL,
            product_price    INTEGER NOT NULL,
            date_updated     TEXT NOT NULL
        );",
    )?;
    log::info!("Database schema initialized");
    Ok(())
}

/// Upsert a single product with latest-timestamp-wins semantics.
pub fn upsert_product(conn: &mut Connection, product: &NewProduct) -> DbResult<UpsertOutcome> {
    let tx = conn.transaction()?;
    let outcome = upsert_product_tx(&tx, product)?;
    tx.commit()?;
    Ok(outcome)
}

fn upsert_product_tx(tx: &Transaction<'_>, product: &NewProduct) -> DbResult<UpsertOutcome> {
    let existing: Option<(i64, String)> = {
        let mut stmt = tx.prepare_cached(
            "SELECT product_id, date_updated FROM products WHERE product_name = ?1",
        )?;
        let mut rows = stmt.query(params![product.name])?;
        match rows.next()? {
            Some(row) => Some((row.get(0)?, row.get(1)?)),
            None => None,
        }
    };

    match existing {
        None => {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO products (product_name, product_quantity, product_price, date_updated)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            stmt.execute(params![
                product.name,
                product.quantity,
                product.price_cents,
                product.date_updated,
            ])?;
            Ok(UpsertOutcome::Inserted(tx.last_insert_rowid()))
        }
        Some((_, stored_date)) if product.date_updated >= stored_date => {
            let mut stmt = tx.prepare_cached(
                "UPDATE products
                 SET product_quantity = ?1, product_price = ?2, date_updated = ?3
                 WHERE product_name = ?4",
            )?;
            stmt.execute(params![
                product.quantity,
                product.price_cents,
                product.date_updated,
                product.name,
            ])?;
            Ok(UpsertOutcome::Updated)
        }
        Some(_) => {
            log::debug!("Keeping stored record for '{}' (incoming is older)", product.name);
            Ok(UpsertOutcome::SkippedOlder)
        }
    }
}

/// Upsert a batch of products inside one transaction.
///
/// Returns counts of inserted / updated / skipped rows.
pub fn import_products(conn: &mut Connection, products: &[NewProduct]) -> DbResult<ImportStats> {
    let tx = conn.transaction()?;
    let mut stats = ImportStats::default();

    for product in products {
        match upsert_product_tx(&tx, product)? {
            UpsertOutcome::Inserted(_) => stats.inserted += 1,
            UpsertOutcome::Updated => stats.updated += 1,
            UpsertOutcome::SkippedOlder => stats.skipped += 1,
        }
    }

    tx.commit()?;
    log::info!(
        "Imported {} products: {} inserted, {} updated, {} skipped",
        products.len(),
        stats.inserted,
        stats.updated,
        stats.skipped
    );
    Ok(stats)
}

fn map_product(row: &rusqlite::Row<'_>) -> rusqlite::Result<Product> {
    Ok(Product {
        product_id: row.get(0)?,
        name: row.get(1)?,
        quantity: row.get(2)?,
        price_cents: row.get(3)?,
        date_updated: row.get(4)?,
    })
}

/// Get a product by its id
pub fn product_by_id(conn: &Connection, product_id: i64) -> DbResult<Option<Product>> {
    let mut stmt = conn.prepare(
        "SELECT product_id, product_name, product_quantity, product_price, date_updated
         FROM products
         WHERE product_id = ?1",
    )?;
    let mut rows = stmt.query(params![product_id])?;
    match rows.next()? {
        Some(row) => Ok(Some(map_product(row)?)),
        None => Ok(None),
    }
}

/// Get the smallest and largest product id, or `None` when empty
pub fn id_range(conn: &Connection) -> DbResult<Option<(i64, i64)>> {
    conn.query_row(
        "SELECT MIN(product_id), MAX(product_id) FROM products",
        [],
        |row| {
            let min: Option<i64> = row.get(0)?;
            let max: Option<i64> = row.get(1)?;
            Ok(min.zip(max))
        },
    )
}

/// Get all products ordered by id
pub fn all_products(conn: &Connection) -> DbResult<Vec<Product>> {
    let mut stmt = conn.prepare(
        "SELECT product_id, product_name, product_quantity, product_price, date_updated
         FROM products
         ORDER BY product_id ASC",
    )?;
    let products: DbResult<Vec<Product>> = stmt.query_map([], map_product)?.collect();
    products
}

/// Get total count of products in the database
pub fn product_count(conn: &Connection) -> DbResult<i64> {
    conn.query_row("SELECT COUNT(*) FROM products", [], |row| row.get(0))
}
