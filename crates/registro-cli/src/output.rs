use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use rust_decimal::Decimal;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Format {
    Table,
    Json,
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_table<T: Tabled>(items: Vec<T>) {
    let table = Table::new(items).with(Style::rounded()).to_string();
    println!("{}", table);
}

pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

pub fn print_item<T: Serialize + Tabled>(item: T, format: Format) -> Result<()> {
    match format {
        Format::Json => print_json(&item)?,
        Format::Table => print_table(vec![item]),
    }
    Ok(())
}

pub fn print_items<T: Serialize + Tabled>(items: Vec<T>, format: Format) -> Result<()> {
    match format {
        Format::Json => print_json(&items)?,
        Format::Table => {
            if items.is_empty() {
                println!("No results");
            } else {
                print_table(items);
            }
        }
    }
    Ok(())
}

pub fn display_option(o: &Option<String>) -> String {
    o.clone().unwrap_or_else(|| "-".into())
}

/// Prices travel as integer cents.
pub fn display_cents(cents: &i64) -> String {
    format!("$ {}", Decimal::new(*cents, 2))
}
