use std::io::{Error, Write};
use tempfile::NamedTempFile;
use unideliver::application::engine::LifecycleEngine;
use unideliver::domain::money::FeeSchedule;
use unideliver::domain::otp::SequentialCodeGenerator;
use unideliver::infrastructure::in_memory::{InMemoryLockerStore, InMemoryPackageStore};
use unideliver::infrastructure::seed;

pub const HEADER: &str = "role, actor, action, package, locker, rider, code";

/// An engine over the demo lockers and packages with predictable codes.
pub async fn seeded_engine() -> LifecycleEngine {
    let package_store = InMemoryPackageStore::new();
    let locker_store = InMemoryLockerStore::new();
    let codes = SequentialCodeGenerator::new();
    seed::populate(&package_store, &locker_store, &codes)
        .await
        .unwrap();

    LifecycleEngine::new(
        Box::new(package_store),
        Box::new(locker_store),
        Box::new(SequentialCodeGenerator::starting_at(100)),
        seed::riders(),
        FeeSchedule::default(),
    )
}

/// Writes an actions script with the standard header.
pub fn write_actions(rows: &[&str]) -> Result<NamedTempFile, Error> {
    let mut file = NamedTempFile::new()?;
    writeln!(file, "{HEADER}")?;
    for row in rows {
        writeln!(file, "{row}")?;
    }
    file.flush()?;
    Ok(file)
}
