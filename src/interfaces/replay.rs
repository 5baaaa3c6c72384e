use crate::application::engine::{BookingRequest, LifecycleEngine};
use crate::application::notice::Notice;
use crate::domain::package::PackageId;
use crate::domain::rider::RiderId;
use crate::error::{DeliveryError, Result};
use crate::interfaces::csv::action_reader::{ActionKind, ActionRow};
use std::collections::HashMap;
use tracing::{debug, warn};

const ALIAS_PREFIX: char = '@';

/// Applies scripted action rows to a [`LifecycleEngine`].
///
/// Package ids are generated at booking time, so a `book` row can name the
/// new package with an `@alias` that later rows use in place of the id.
#[derive(Debug, Default)]
pub struct Replayer {
    aliases: HashMap<String, PackageId>,
}

impl Replayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The id an alias was bound to, if any.
    pub fn resolve_alias(&self, alias: &str) -> Option<&PackageId> {
        self.aliases.get(alias)
    }

    pub async fn apply(&mut self, engine: &LifecycleEngine, row: ActionRow) -> Result<Notice> {
        let expected = row.action.role();
        if row.role != expected {
            return Err(DeliveryError::ValidationError(format!(
                "Action '{}' is for a {expected}, not a {}",
                row.action, row.role
            )));
        }

        let result = self.dispatch(engine, &row).await;
        match &result {
            Ok(notice) => debug!(action = %row.action, actor = %row.actor, %notice, "action applied"),
            Err(e) => warn!(action = %row.action, actor = %row.actor, error = %e, "action rejected"),
        }
        result
    }

    async fn dispatch(&mut self, engine: &LifecycleEngine, row: &ActionRow) -> Result<Notice> {
        let rider = || RiderId::new(row.actor.as_str());

        let outcome = match row.action {
            ActionKind::Book => return self.book(engine, row).await,
            ActionKind::Pay => engine.pay(&row.actor, &self.package(row)?).await?,
            ActionKind::RequestLocker => {
                engine.request_locker(&row.actor, &self.package(row)?).await?
            }
            ActionKind::ConfirmReceipt => {
                let otp = row.code.as_deref().unwrap_or_default();
                engine
                    .confirm_receipt(&row.actor, &self.package(row)?, otp)
                    .await?
            }
            ActionKind::Accept => engine.accept_job(&rider(), &self.package(row)?).await?,
            ActionKind::Store => {
                engine
                    .mark_stored(&rider(), &self.package(row)?, row.locker.clone())
                    .await?
            }
            ActionKind::Deliver => engine.mark_delivered(&rider(), &self.package(row)?).await?,
            ActionKind::Fail => engine.mark_failed(&rider(), &self.package(row)?).await?,
            ActionKind::SetLocker => {
                let locker = row.locker.clone().ok_or(DeliveryError::MissingLocker)?;
                let status = row.code.as_deref().unwrap_or_default().parse()?;
                return engine.set_locker_status(&locker, status).await;
            }
        };
        Ok(outcome.notice)
    }

    async fn book(&mut self, engine: &LifecycleEngine, row: &ActionRow) -> Result<Notice> {
        let alias = match row.package.as_deref() {
            None | Some("") => None,
            Some(name) if name.starts_with(ALIAS_PREFIX) => Some(name.to_string()),
            Some(name) => {
                return Err(DeliveryError::ValidationError(format!(
                    "Package ids are assigned on booking; name the package with an alias like @{name}"
                )));
            }
        };

        let outcome = engine
            .book_locker(BookingRequest {
                customer: row.actor.clone(),
                locker: row.locker.clone(),
                rider: row.rider.clone(),
                ..Default::default()
            })
            .await?;

        if let Some(alias) = alias {
            self.aliases.insert(alias, outcome.package.id.clone());
        }
        Ok(outcome.notice)
    }

    fn package(&self, row: &ActionRow) -> Result<PackageId> {
        match row.package.as_deref() {
            None | Some("") => Err(DeliveryError::ValidationError(
                "Please select a package".to_string(),
            )),
            Some(alias) if alias.starts_with(ALIAS_PREFIX) => self
                .aliases
                .get(alias)
                .cloned()
                .ok_or_else(|| DeliveryError::ValidationError(format!("Unknown alias {alias}"))),
            Some(id) => Ok(PackageId::new(id)),
        }
    }
}
