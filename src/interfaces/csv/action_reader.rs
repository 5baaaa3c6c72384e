use crate::domain::locker::LockerId;
use crate::domain::rider::RiderId;
use crate::error::{DeliveryError, Result};
use serde::Deserialize;
use std::fmt;
use std::io::Read;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Customer,
    Rider,
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Role::Customer => "customer",
            Role::Rider => "rider",
            Role::Admin => "admin",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Book,
    Pay,
    RequestLocker,
    ConfirmReceipt,
    Accept,
    Store,
    Deliver,
    Fail,
    SetLocker,
}

impl ActionKind {
    /// The only role allowed to perform this action.
    pub fn role(self) -> Role {
        match self {
            ActionKind::Book
            | ActionKind::Pay
            | ActionKind::RequestLocker
            | ActionKind::ConfirmReceipt => Role::Customer,
            ActionKind::Accept | ActionKind::Store | ActionKind::Deliver | ActionKind::Fail => {
                Role::Rider
            }
            ActionKind::SetLocker => Role::Admin,
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ActionKind::Book => "book",
            ActionKind::Pay => "pay",
            ActionKind::RequestLocker => "request_locker",
            ActionKind::ConfirmReceipt => "confirm_receipt",
            ActionKind::Accept => "accept",
            ActionKind::Store => "store",
            ActionKind::Deliver => "deliver",
            ActionKind::Fail => "fail",
            ActionKind::SetLocker => "set_locker",
        };
        f.write_str(label)
    }
}

/// One scripted step: who acts, what they do and on what.
///
/// Columns that an action does not use may be left empty or dropped from the
/// end of the row.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ActionRow {
    pub role: Role,
    pub actor: String,
    pub action: ActionKind,
    #[serde(default)]
    pub package: Option<String>,
    #[serde(default)]
    pub locker: Option<LockerId>,
    #[serde(default)]
    pub rider: Option<RiderId>,
    #[serde(default)]
    pub code: Option<String>,
}

/// Reads action rows from a CSV source.
///
/// This reader wraps `csv::Reader` and provides an iterator over `Result<ActionRow>`.
/// It handles whitespace trimming and flexible record lengths automatically.
pub struct ActionReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> ActionReader<R> {
    /// Creates a new `ActionReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes rows.
    pub fn actions(self) -> impl Iterator<Item = Result<ActionRow>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(DeliveryError::from))
    }
}
