use std::error::Error;
use std::path::Path;
use std::process::exit;
use std::sync::{Arc, Mutex};

use clap::Parser;
use rusqlite::Connection;
use time::{Date, Month, OffsetDateTime};

use cashbook::{
    CategoryName, Money, NewTransaction, SqliteTransactionStore, TransactionStore,
    TransactionType, initialize_db,
};

/// A utility for creating a test database for the cashbook web server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// (category, description, amount in pence, type, day of month)
const MONTHLY_TRANSACTIONS: [(&str, &str, i64, TransactionType, u8); 6] = [
    ("Salary", "Monthly pay", 285_000, TransactionType::Income, 25),
    ("Rent", "Rent", 120_000, TransactionType::Expense, 1),
    ("Groceries", "Weekly shop", 8_473, TransactionType::Expense, 6),
    ("Groceries", "Weekly shop", 6_912, TransactionType::Expense, 20),
    ("Utilities", "Electricity and gas", 11_250, TransactionType::Expense, 12),
    ("Eating Out", "Dinner with friends", 4_560, TransactionType::Expense, 17),
];

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    let store = SqliteTransactionStore::new(Arc::new(Mutex::new(conn)));

    println!("Creating categories...");
    let mut categories = Vec::new();
    for name in ["Salary", "Rent", "Groceries", "Utilities", "Eating Out"] {
        categories.push(store.create_category(CategoryName::new(name)?)?);
    }

    println!("Creating transactions...");
    let this_year = OffsetDateTime::now_utc().year();
    let mut count = 0;

    for year in [this_year - 1, this_year] {
        for month_number in 1..=12u8 {
            let month = Month::try_from(month_number)?;

            for (category_name, description, pence, transaction_type, day) in MONTHLY_TRANSACTIONS
            {
                let Some(category) = categories
                    .iter()
                    .find(|category| category.name.as_ref() == category_name)
                else {
                    continue;
                };

                // Vary amounts a little from month to month.
                let amount = pence + i64::from(month_number) * 37 % 500;

                store.create_transaction(NewTransaction {
                    amount: Money::from_minor_units(amount),
                    date: Date::from_calendar_date(year, month, day)?,
                    description: description.to_owned(),
                    category_id: category.id,
                    transaction_type,
                })?;
                count += 1;
            }
        }
    }

    println!("Created {count} transactions.");
    println!("Success!");

    Ok(())
}
