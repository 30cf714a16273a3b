//! # Seed Data Generator
//!
//! Provisions the back-office user accounts and a handful of demo
//! records for development.
//!
//! ## Usage
//! ```bash
//! # Seed users only (default)
//! cargo run -p ured-db --bin seed
//!
//! # Seed users plus demo clients/invoices
//! cargo run -p ured-db --bin seed -- --demo
//!
//! # Specify database path
//! cargo run -p ured-db --bin seed -- --db ./data/ured.db
//! ```
//!
//! Seeding is idempotent: if the users table already has rows, nothing
//! is written.

use std::env;

use ured_db::repository::invoice::NewInvoice;
use ured_db::repository::user::NewUser;
use ured_db::{ClientInput, Database, DbConfig};

/// The three office accounts the company runs on.
const USERS: &[(&str, &str, &str)] = &[
    ("samir", "pass123", "direktor"),
    ("selma", "selma123", "komercijala"),
    ("izvodjac1", "izvo123", "izvodjac"),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./ured_dev.db");
    let mut demo = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--demo" => {
                demo = true;
            }
            "--help" | "-h" => {
                println!("Ured Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./ured_dev.db)");
                println!("      --demo         Also create demo clients and invoices");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Ured Seed Data Generator");
    println!("===========================");
    println!("Database: {}", db_path);
    println!();

    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let users = db.users();
    if users.find_by_username(USERS[0].0).await?.is_some() {
        println!("⚠ Users already provisioned, skipping seed.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Provisioning users...");
    for (username, password, role) in USERS {
        users
            .create(NewUser {
                username: username.to_string(),
                password: password.to_string(),
                role: role.to_string(),
            })
            .await?;
        println!("✓ {} ({})", username, role);
    }

    if demo {
        println!();
        println!("Creating demo data...");

        let client = db
            .clients()
            .create(ClientInput {
                name: "Pekara Centar d.o.o.".to_string(),
                email: "pekara@example.ba".to_string(),
                phone: "+387 33 123 456".to_string(),
                address: "Titova 1, Sarajevo".to_string(),
                postal_code: Some("71000".to_string()),
                company_id: Some("4201234560001".to_string()),
                pib: Some("201234560001".to_string()),
                contract_number: Some("12/2025".to_string()),
                payment_term: Some("15 dana".to_string()),
                amount_in_words: None,
            })
            .await?;
        println!("✓ Demo client: {}", client.name);

        let invoice = db
            .invoices()
            .create(NewInvoice {
                client_id: client.id.clone(),
                date: chrono::Utc::now().date_naive(),
                description: Some("deratizacija i dezinfekcija objekta".to_string()),
                quantity: Some(1),
                price: Some(100.0),
                unit: Some("kom".to_string()),
                total_no_vat: Some(100.0),
                vat: Some(17.0),
                total: Some(117.0),
                amount_in_words: Some("stotinusedamnaest KM".to_string()),
                contract_number: client.contract_number.clone(),
                payment_term: client.payment_term.clone(),
                payment_date: None,
                payment_order_number: None,
            })
            .await?;
        println!("✓ Demo invoice: {}", invoice.number);
    }

    println!();
    println!("Done.");
    Ok(())
}
