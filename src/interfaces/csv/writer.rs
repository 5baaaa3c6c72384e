use crate::domain::locker::LockerView;
use crate::domain::package::{Package, PackageRecord};
use crate::error::Result;
use std::io::Write;

/// Writes packages as flat CSV records, one row per package.
pub struct PackageWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> PackageWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_packages(&mut self, packages: impl IntoIterator<Item = Package>) -> Result<()> {
        for package in packages {
            self.writer.serialize(PackageRecord::from(package))?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

/// Writes lockers with their derived status.
pub struct LockerWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> LockerWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_lockers(&mut self, lockers: impl IntoIterator<Item = LockerView>) -> Result<()> {
        for locker in lockers {
            self.writer.serialize(locker)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
