//! Command-line utilities for the shiptrack record store.
//!
//! `init` creates the database schema; `seed` fills a database with
//! randomized sample shipments for demos and local frontends. Neither
//! command is part of the production request path, but both write through
//! `shiptrack-lib`, so seeded data passes the same validation as API writes.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Days, NaiveTime, Utc};
use clap::{Parser, Subcommand};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use shiptrack_lib::{NewShipment, ShipmentStatus, ShipmentStore};

const CARRIERS: &[&str] = &["Maersk", "DHL", "FedEx", "UPS", "DB Schenker", "Kuehne+Nagel"];
const CITIES: &[&str] = &[
    "Shanghai",
    "Rotterdam",
    "Hamburg",
    "Singapore",
    "Los Angeles",
    "Dubai",
    "Antwerp",
    "Shenzhen",
    "Busan",
    "Felixstowe",
];
const SHIPPERS: &[&str] = &[
    "Northgate Depot",
    "Harborview Fulfillment",
    "Crestline Logistics",
    "Eastport Supply",
];
const CONSIGNEES: &[&str] = &[
    "Acme Retail",
    "Borealis Foods",
    "Cascade Electronics",
    "Dunmore Hardware",
    "Evergreen Textiles",
];

#[derive(Parser, Debug)]
#[command(author, version, about = "Shiptrack record store utilities")]
struct Cli {
    /// Path to the SQLite database file.
    #[arg(long, default_value = "shiptrack.db")]
    db: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the database file and schema.
    Init,
    /// Insert randomized sample shipments.
    Seed {
        /// Number of shipments to create.
        #[arg(long, default_value_t = 100)]
        count: usize,
        /// Remove all existing shipments first.
        #[arg(long)]
        reset: bool,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Init => handle_init(&cli.db),
        Command::Seed { count, reset } => handle_seed(&cli.db, count, reset),
    }
}

fn handle_init(db: &Path) -> Result<()> {
    ShipmentStore::open(db)
        .with_context(|| format!("failed to create shipment store at {}", db.display()))?;
    println!("Store ready at {}", db.display());
    Ok(())
}

fn handle_seed(db: &Path, count: usize, reset: bool) -> Result<()> {
    let store = ShipmentStore::open(db)
        .with_context(|| format!("failed to open shipment store at {}", db.display()))?;

    if reset {
        let removed = store.clear().context("failed to clear existing shipments")?;
        println!("Removed {removed} existing shipments.");
    }

    // Continue tracking numbers after the existing records so a second seed
    // run does not collide with the first.
    let start = store.count().context("failed to count existing shipments")? as usize;

    let mut rng = rand::thread_rng();
    for i in 0..count {
        let shipment = build_shipment(&mut rng, start + i);
        store
            .insert(&shipment)
            .with_context(|| format!("failed to insert '{}'", shipment.tracking_number))?;
    }

    println!("Inserted {count} shipments into {}.", db.display());
    Ok(())
}

fn build_shipment(rng: &mut impl Rng, idx: usize) -> NewShipment {
    let today = Utc::now().date_naive();
    let pickup = today - Days::new(rng.gen_range(0..=10));
    let expected = pickup + Days::new(rng.gen_range(1..=6));

    // Weighted status pick: most sample shipments are somewhere on the road.
    let status = match rng.gen_range(0..10) {
        0..=1 => ShipmentStatus::Created,
        2..=5 => ShipmentStatus::InTransit,
        6..=8 => ShipmentStatus::Delivered,
        _ => ShipmentStatus::Canceled,
    };

    let delivered_at = (status == ShipmentStatus::Delivered).then(|| {
        let hour = rng.gen_range(9..=18);
        let time = NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or(NaiveTime::MIN);
        expected.and_time(time).and_utc()
    });

    let weight_kg = round2(rng.gen_range(1.0..80.0));
    let cost = round2(weight_kg * rng.gen_range(3.5..6.5));

    NewShipment {
        tracking_number: format!("TMS-{:05}", 1000 + idx),
        shipper: pick(rng, SHIPPERS),
        consignee: pick(rng, CONSIGNEES),
        origin: pick(rng, CITIES),
        destination: pick(rng, CITIES),
        carrier: Some(pick(rng, CARRIERS)),
        status,
        pieces: rng.gen_range(1..=6),
        weight_kg,
        cost,
        pickup_date: Some(pickup),
        expected_delivery: Some(expected),
        delivered_at,
        notes: None,
    }
}

fn pick(rng: &mut impl Rng, pool: &[&str]) -> String {
    pool.choose(rng).copied().unwrap_or_default().to_string()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
