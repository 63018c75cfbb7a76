//! Interactive console menu.
//!
//! Single-threaded, line-oriented loop over stdin:
//! - `v`: view a product by id
//! - `a`: add or update a product
//! - `b`: back up the inventory to CSV
//! - `q`: quit
//!
//! All handlers re-prompt until the input is valid. End of input (EOF)
//! ends the current prompt and the loop, like `q`. Handler errors are
//! reported and the loop continues.

use crate::csv_io;
use crate::database::{self, UpsertOutcome};
use crate::error::Result;
use crate::models::{now_timestamp, parse_price_cents, NewProduct};
use rusqlite::Connection;
use std::io::{self, BufRead, Write};
use std::path::Path;

const INVALID_SELECTION: &str = "That selection is invalid. Please select 'a' to add a product; \
'b' to back up the inventory; 'v' to view a product; or 'q' to quit: ";

/// Runs the menu loop against stdin/stdout until the user quits.
pub fn run_menu(conn: &mut Connection, backup_path: &Path) -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    run_menu_loop(conn, &mut stdin.lock(), &mut stdout.lock(), backup_path)
}

/// Inner loop that accepts explicit input/output streams; used in tests.
fn run_menu_loop<R: BufRead, W: Write>(
    conn: &mut Connection,
    input: &mut R,
    output: &mut W,
    backup_path: &Path,
) -> Result<()> {
    loop {
        write_menu(output)?;
        let Some(line) = read_line(input)? else { break };
        let mut choice = line.to_lowercase();

        // Re-prompt on unrecognized commands without reprinting the menu
        while !matches!(choice.as_str(), "v" | "a" | "b" | "q") {
            let Some(line) = prompt(input, output, INVALID_SELECTION)? else {
                return Ok(());
            };
            choice = line.to_lowercase();
        }

        let result = match choice.as_str() {
            "v" => view_product(conn, input, output),
            "a" => add_product(conn, input, output),
            "b" => backup_inventory(conn, output, backup_path),
            _ => break,
        };
        if let Err(e) = result {
            log::error!("Menu action '{}' failed: {}", choice, e);
            writeln!(output, "Error: {e}")?;
        }
    }
    log::info!("Leaving menu loop");
    Ok(())
}

fn write_menu<W: Write>(output: &mut W) -> io::Result<()> {
    writeln!(output, "\nType 'q' to exit.")?;
    writeln!(output, "v) View a product")?;
    writeln!(output, "a) Add or update a product")?;
    writeln!(output, "b) Back up the inventory")?;
    write!(output, "Action: ")?;
    output.flush()
}

/// Reads one trimmed line, returning `None` on end of input.
fn read_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Writes `text` as a prompt and reads the reply.
fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    text: &str,
) -> io::Result<Option<String>> {
    write!(output, "{text}")?;
    output.flush()?;
    read_line(input)
}

/// Reports the id range, then prompts until an existing product id is
/// chosen and prints that product.
fn view_product<R: BufRead, W: Write>(
    conn: &Connection,
    input: &mut R,
    output: &mut W,
) -> Result<()> {
    let Some((min_id, max_id)) = database::id_range(conn)? else {
        writeln!(output, "The inventory is empty.")?;
        return Ok(());
    };
    writeln!(output, "\nPlease choose a product id between {min_id} and {max_id}")?;

    loop {
        let Some(line) = prompt(input, output, "Choose product id: ")? else {
            return Ok(());
        };
        let Ok(id) = line.parse::<i64>() else {
            writeln!(
                output,
                "Your selection must be an integer between {min_id} and {max_id}"
            )?;
            continue;
        };
        if id < min_id || id > max_id {
            writeln!(output, "Your selection must be between {min_id} and {max_id}")?;
            continue;
        }
        match database::product_by_id(conn, id)? {
            Some(product) => {
                writeln!(output)?;
                writeln!(output, "- Product: {}", product.name)?;
                writeln!(output, "- Quantity: {}", product.quantity)?;
                writeln!(output, "- Price: {} cents", product.price_cents)?;
                writeln!(output, "- Date updated: {}", product.date_updated)?;
                return Ok(());
            }
            // Ids inside the range can still be unused after merges
            None => writeln!(output, "There is no product with id {id}, try another")?,
        }
    }
}

/// Prompts for name, quantity and price, then upserts with the current
/// local time as the timestamp.
fn add_product<R: BufRead, W: Write>(
    conn: &mut Connection,
    input: &mut R,
    output: &mut W,
) -> Result<()> {
    let name = loop {
        let Some(line) = prompt(input, output, "\nEnter the name of the product: ")? else {
            return Ok(());
        };
        if !line.is_empty() {
            break line;
        }
        writeln!(output, "The product name cannot be empty.")?;
    };

    let quantity = loop {
        let Some(line) = prompt(input, output, "Enter the quantity: ")? else {
            return Ok(());
        };
        match line.parse::<i64>() {
            Ok(quantity) if quantity >= 0 => break quantity,
            _ => writeln!(output, "Please enter a valid number.")?,
        }
    };

    let price_cents = loop {
        let Some(line) = prompt(input, output, "Enter the price (in dollars): ")? else {
            return Ok(());
        };
        match parse_price_cents(&line) {
            Ok(cents) => break cents,
            Err(_) => writeln!(output, "Please enter a valid price.")?,
        }
    };

    let product = NewProduct {
        name,
        quantity,
        price_cents,
        date_updated: now_timestamp(),
    };
    match database::upsert_product(conn, &product)? {
        UpsertOutcome::Inserted(id) => {
            log::info!("Added product '{}' as id {}", product.name, id);
            writeln!(output, "{} has been added as item {id}.", product.name)?;
        }
        UpsertOutcome::Updated => {
            log::info!("Updated product '{}'", product.name);
            writeln!(output, "Updated {}.", product.name)?;
        }
        UpsertOutcome::SkippedOlder => {
            // Only reachable when the stored timestamp is in the future
            writeln!(output, "A newer record for {} already exists.", product.name)?;
        }
    }
    Ok(())
}

/// Exports the whole inventory to the backup CSV.
fn backup_inventory<W: Write>(conn: &Connection, output: &mut W, path: &Path) -> Result<()> {
    let count = csv_io::backup_csv(conn, path)?;
    writeln!(output, "Backed up {count} products to {}.", path.display())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{init_schema, product_by_id, product_count, upsert_product};
    use std::io::Cursor;
    use tempfile::TempDir;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        conn
    }

    /// Runs a scripted menu session and returns everything it printed.
    fn run_session(conn: &mut Connection, script: &str, backup_path: &Path) -> String {
        let mut input = Cursor::new(script.as_bytes().to_vec());
        let mut output = Vec::new();
        run_menu_loop(conn, &mut input, &mut output, backup_path).unwrap();
        String::from_utf8(output).unwrap()
    }

    fn seed(conn: &mut Connection, name: &str, quantity: i64, price_cents: i64, date: &str) {
        upsert_product(
            conn,
            &NewProduct {
                name: name.to_string(),
                quantity,
                price_cents,
                date_updated: date.to_string(),
            },
        )
        .unwrap();
    }

    fn backup_file(dir: &TempDir) -> std::path::PathBuf {
        dir.path().join("inventory_backup.csv")
    }

    #[test]
    fn quit_leaves_loop() {
        let dir = TempDir::new().unwrap();
        let mut conn = test_conn();
        let output = run_session(&mut conn, "q\n", &backup_file(&dir));
        assert!(output.contains("Type 'q' to exit."));
        assert!(output.contains("Action: "));
    }

    #[test]
    fn eof_leaves_loop() {
        let dir = TempDir::new().unwrap();
        let mut conn = test_conn();
        let output = run_session(&mut conn, "", &backup_file(&dir));
        assert!(output.contains("Action: "));
    }

    #[test]
    fn unknown_command_reprompts_until_valid() {
        let dir = TempDir::new().unwrap();
        let mut conn = test_conn();
        let output = run_session(&mut conn, "x\nzz\nq\n", &backup_file(&dir));
        assert_eq!(output.matches("That selection is invalid").count(), 2);
        // Menu is not reprinted while re-prompting
        assert_eq!(output.matches("Type 'q' to exit.").count(), 1);
    }

    #[test]
    fn commands_are_case_insensitive() {
        let dir = TempDir::new().unwrap();
        let mut conn = test_conn();
        let output = run_session(&mut conn, "V\nQ\n", &backup_file(&dir));
        assert!(output.contains("The inventory is empty."));
    }

    #[test]
    fn view_on_empty_inventory() {
        let dir = TempDir::new().unwrap();
        let mut conn = test_conn();
        let output = run_session(&mut conn, "v\nq\n", &backup_file(&dir));
        assert!(output.contains("The inventory is empty."));
    }

    #[test]
    fn view_rejects_out_of_range_and_non_numeric_ids() {
        let dir = TempDir::new().unwrap();
        let mut conn = test_conn();
        seed(&mut conn, "apples", 10, 150, "2018-01-01 00:00:00");
        seed(&mut conn, "pears", 20, 250, "2018-01-02 00:00:00");

        let output = run_session(&mut conn, "v\n99\nfoo\n2\nq\n", &backup_file(&dir));
        assert!(output.contains("Please choose a product id between 1 and 2"));
        assert!(output.contains("Your selection must be between 1 and 2"));
        assert!(output.contains("Your selection must be an integer between 1 and 2"));
        assert!(output.contains("- Product: pears"));
        assert!(output.contains("- Quantity: 20"));
        assert!(output.contains("- Price: 250 cents"));
        assert!(output.contains("- Date updated: 2018-01-02 00:00:00"));
    }

    #[test]
    fn add_inserts_new_product() {
        let dir = TempDir::new().unwrap();
        let mut conn = test_conn();
        let output = run_session(&mut conn, "a\nWidget\n5\n$1.99\nq\n", &backup_file(&dir));

        assert!(output.contains("Widget has been added as item 1."));
        let stored = product_by_id(&conn, 1).unwrap().unwrap();
        assert_eq!(stored.name, "Widget");
        assert_eq!(stored.quantity, 5);
        assert_eq!(stored.price_cents, 199);
    }

    #[test]
    fn add_existing_name_updates_in_place() {
        let dir = TempDir::new().unwrap();
        let mut conn = test_conn();
        seed(&mut conn, "Widget", 5, 199, "2018-01-01 00:00:00");

        let output = run_session(&mut conn, "a\nWidget\n8\n2.50\nq\n", &backup_file(&dir));
        assert!(output.contains("Updated Widget."));
        assert_eq!(product_count(&conn).unwrap(), 1);

        let stored = product_by_id(&conn, 1).unwrap().unwrap();
        assert_eq!(stored.quantity, 8);
        assert_eq!(stored.price_cents, 250);
    }

    #[test]
    fn add_reprompts_on_blank_name() {
        let dir = TempDir::new().unwrap();
        let mut conn = test_conn();
        let output = run_session(&mut conn, "a\n\nWidget\n1\n1.00\nq\n", &backup_file(&dir));
        assert!(output.contains("The product name cannot be empty."));
        assert_eq!(product_count(&conn).unwrap(), 1);
    }

    #[test]
    fn add_reprompts_on_bad_quantity() {
        let dir = TempDir::new().unwrap();
        let mut conn = test_conn();
        let output = run_session(&mut conn, "a\nWidget\nfour\n-2\n4\n1.00\nq\n", &backup_file(&dir));
        assert_eq!(output.matches("Please enter a valid number.").count(), 2);
        let stored = product_by_id(&conn, 1).unwrap().unwrap();
        assert_eq!(stored.quantity, 4);
    }

    #[test]
    fn add_reprompts_on_bad_price() {
        let dir = TempDir::new().unwrap();
        let mut conn = test_conn();
        let output = run_session(&mut conn, "a\nWidget\n1\nfree\n$2.99\nq\n", &backup_file(&dir));
        assert!(output.contains("Please enter a valid price."));
        let stored = product_by_id(&conn, 1).unwrap().unwrap();
        assert_eq!(stored.price_cents, 299);
    }

    #[test]
    fn add_stamps_current_time() {
        let dir = TempDir::new().unwrap();
        let mut conn = test_conn();
        seed(&mut conn, "Widget", 5, 199, "2018-01-01 00:00:00");

        run_session(&mut conn, "a\nWidget\n8\n2.50\nq\n", &backup_file(&dir));
        let stored = product_by_id(&conn, 1).unwrap().unwrap();
        // A fresh add always outranks a historical import timestamp
        assert!(stored.date_updated.as_str() > "2018-01-01 00:00:00");
    }

    #[test]
    fn backup_writes_csv_file() {
        let dir = TempDir::new().unwrap();
        let path = backup_file(&dir);
        let mut conn = test_conn();
        seed(&mut conn, "apples", 10, 150, "2018-01-01 00:00:00");

        let output = run_session(&mut conn, "b\nq\n", &path);
        assert!(output.contains("Backed up 1 products to"));

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("product_name,product_price,product_quantity,date_updated"));
        assert!(content.contains("apples,1.50,10,01/01/2018"));
    }

    #[test]
    fn eof_mid_handler_ends_session() {
        let dir = TempDir::new().unwrap();
        let mut conn = test_conn();
        // Input ends while the add handler is prompting for quantity
        let output = run_session(&mut conn, "a\nWidget\n", &backup_file(&dir));
        assert!(output.contains("Enter the quantity: "));
        assert_eq!(product_count(&conn).unwrap(), 0);
    }
}
