use clap::{Parser, ValueEnum};
use miette::{IntoDiagnostic, Result};
use rust_decimal::Decimal;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;
use unideliver::application::engine::LifecycleEngine;
use unideliver::domain::money::FeeSchedule;
use unideliver::domain::otp::RandomCodeGenerator;
use unideliver::domain::ports::{LockerStoreBox, PackageStoreBox};
use unideliver::infrastructure::in_memory::{InMemoryLockerStore, InMemoryPackageStore};
use unideliver::infrastructure::seed;
use unideliver::interfaces::csv::action_reader::ActionReader;
use unideliver::interfaces::csv::writer::{LockerWriter, PackageWriter};
use unideliver::interfaces::replay::Replayer;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Output {
    /// Final package records as CSV
    Packages,
    /// Lockers with their derived status as CSV
    Lockers,
    /// Admin revenue and utilization report as JSON
    Report,
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input actions CSV file
    input: PathBuf,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Flat fee charged per package
    #[arg(long, default_value = "2.50")]
    service_fee: Decimal,

    /// Platform share of each fee, between 0 and 1
    #[arg(long, default_value = "0.15")]
    commission_rate: Decimal,

    /// What to print once all actions are applied
    #[arg(long, value_enum, default_value_t = Output::Packages)]
    output: Output,

    /// Skip the demo packages; the locker inventory is always installed
    #[arg(long)]
    no_seed: bool,
}

fn in_memory_stores() -> (PackageStoreBox, LockerStoreBox) {
    let package_store: PackageStoreBox = Box::new(InMemoryPackageStore::new());
    let locker_store: LockerStoreBox = Box::new(InMemoryLockerStore::new());
    (package_store, locker_store)
}

#[cfg(feature = "storage-rocksdb")]
fn open_stores(db_path: Option<PathBuf>) -> Result<(PackageStoreBox, LockerStoreBox)> {
    use unideliver::infrastructure::rocksdb::RocksDBStore;

    match db_path {
        Some(db_path) => {
            // Use persistent storage (RocksDB)
            let store = RocksDBStore::open(db_path).into_diagnostic()?;
            let package_store: PackageStoreBox = Box::new(store.clone());
            let locker_store: LockerStoreBox = Box::new(store);
            info!("using RocksDB storage");
            Ok((package_store, locker_store))
        }
        None => Ok(in_memory_stores()),
    }
}

#[cfg(not(feature = "storage-rocksdb"))]
fn open_stores(db_path: Option<PathBuf>) -> Result<(PackageStoreBox, LockerStoreBox)> {
    if db_path.is_some() {
        eprintln!(
            "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
        );
    }
    Ok(in_memory_stores())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();
    let fees = FeeSchedule::new(cli.service_fee, cli.commission_rate).into_diagnostic()?;
    let (package_store, locker_store) = open_stores(cli.db_path)?;

    seed::populate_lockers(&*locker_store)
        .await
        .into_diagnostic()?;
    if !cli.no_seed {
        let seeded = seed::populate_packages(&*package_store, &RandomCodeGenerator)
            .await
            .into_diagnostic()?;
        info!(seeded, "demo packages checked");
    }

    let engine = LifecycleEngine::new(
        package_store,
        locker_store,
        Box::new(RandomCodeGenerator),
        seed::riders(),
        fees,
    );

    // Replay actions
    let file = File::open(cli.input).into_diagnostic()?;
    let reader = ActionReader::new(file);
    let mut replayer = Replayer::new();
    for row_result in reader.actions() {
        match row_result {
            Ok(row) => {
                let label = format!("{} by {}", row.action, row.actor);
                if let Err(e) = replayer.apply(&engine, row).await {
                    eprintln!("Rejected action {}: {}", label, e);
                }
            }
            Err(e) => {
                eprintln!("Error reading action: {}", e);
            }
        }
    }

    // Output final state
    let stdout = io::stdout();
    match cli.output {
        Output::Packages => {
            let packages = engine.list_packages().await.into_diagnostic()?;
            PackageWriter::new(stdout.lock())
                .write_packages(packages)
                .into_diagnostic()?;
        }
        Output::Lockers => {
            let lockers = engine.list_lockers().await.into_diagnostic()?;
            LockerWriter::new(stdout.lock())
                .write_lockers(lockers)
                .into_diagnostic()?;
        }
        Output::Report => {
            let report = engine.report().await.into_diagnostic()?;
            let mut out = stdout.lock();
            serde_json::to_writer_pretty(&mut out, &report).into_diagnostic()?;
            writeln!(out).into_diagnostic()?;
        }
    }

    Ok(())
}
