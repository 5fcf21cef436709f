//! # Register Session Demo
//!
//! Runs a full register session against the in-memory backend: seeds the
//! catalog, sells a cart, records a withdrawal, and prints the closing
//! summary.
//!
//! ## Usage
//! ```bash
//! cargo run -p kiosco-engine --bin demo
//!
//! # With engine logs
//! RUST_LOG=debug cargo run -p kiosco-engine --bin demo
//! ```

use std::sync::Arc;

use chrono::Utc;
use tracing_subscriber::EnvFilter;

use kiosco_core::{Money, Product};
use kiosco_engine::{
    DailyClosing, InventoryStore, Ledger, MemoryStorage, SaleTransaction, Storage,
};

/// Starter catalog: sku, name, category, price in cents, stock, minimum.
const CATALOG: &[(&str, &str, &str, i64, i64, i64)] = &[
    ("BEB001", "Coca-Cola 600ml", "Bebidas", 2500, 50, 10),
    ("BEB002", "Sprite 600ml", "Bebidas", 2500, 40, 8),
    ("BEB003", "Agua 500ml", "Bebidas", 1500, 100, 20),
    ("SNA001", "Lays 60g", "Snacks", 2000, 75, 15),
    ("SNA002", "Doritos 70g", "Snacks", 2000, 80, 15),
    ("GOL001", "Chocolate 50g", "Golosinas", 3000, 100, 20),
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("Kiosco POS — register session demo");
    println!("==================================");

    let storage = Arc::new(MemoryStorage::new());
    let inventory = InventoryStore::open(Arc::clone(&storage) as Arc<dyn Storage>)?;
    let ledger = Ledger::open(storage)?;

    // Seed the catalog
    for (sku, name, category, price, stock, minimum) in CATALOG {
        let mut product = Product::new(*sku, *name, *price, *stock, *minimum);
        product.category = Some((*category).to_string());
        inventory.register(product)?;
    }
    println!("✓ Seeded {} products", inventory.len());

    // Sell a cart: 2 colas + 1 bag of chips
    let cola = lookup(&inventory, "BEB001");
    let chips = lookup(&inventory, "SNA001");

    let mut sale = SaleTransaction::new(&inventory, &ledger);
    sale.add_line(&cola.id, 2)?;
    sale.add_line(&chips.id, 1)?;
    sale.validate()?;

    let total = sale.total();
    let tendered = Money::from_cents(10_000);
    let receipt = sale.commit(tendered)?;

    println!();
    println!("✓ Sale committed — receipt {}", receipt.receipt_number);
    for line in &receipt.lines {
        println!(
            "    {:<4}x {:<20} {:>8}",
            line.quantity,
            line.name,
            Money::from_cents(line.line_total_cents).to_string()
        );
    }
    println!("    total {}  tendered {}  change {}", total, tendered, receipt.change());

    // Take some cash out of the drawer
    ledger.record_withdrawal(Money::from_cents(2_000), "pago proveedor")?;
    println!("✓ Withdrawal recorded: $20.00 (pago proveedor)");

    // Close the day
    let summary = DailyClosing::new(&ledger, &inventory).summarize(Utc::now().date_naive())?;
    println!();
    println!("Closing {}", summary.day);
    println!("  sales:       {}", summary.sale_count);
    println!("  income:      {}", Money::from_cents(summary.total_income_cents));
    println!("  withdrawals: {}", Money::from_cents(summary.total_withdrawals_cents));
    println!("  net cash:    {}", summary.net_cash_flow());
    println!("  stock alerts: {}", summary.low_stock.len());
    for alert in &summary.low_stock {
        println!(
            "    [{}] {} — {} on hand (min {})",
            alert.state, alert.sku, alert.quantity, alert.min_stock
        );
    }

    Ok(())
}

fn lookup(inventory: &InventoryStore, sku: &str) -> Product {
    inventory
        .list_active()
        .into_iter()
        .find(|p| p.sku == sku)
        .expect("seeded product")
}
