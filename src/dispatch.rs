//! Command surface for external UI layers.
//!
//! Each external request is one case of a tagged [`Command`]; [`Sweeper`]
//! dispatches it to exactly one store or engine operation and returns a
//! typed [`Response`]. Transport (extension messaging, IPC, CLI) stays
//! outside the crate: callers decode into `Command`, await, encode the
//! `Response`. Required parameters are validated before any host call.

use crate::base::error::SweepError;
use crate::cookies::host::CookieHost;
use crate::cookies::record::CookieRecord;
use crate::domain::ParentDomain;
use crate::engine::{
    DeletionOutcome, DomainSummary, ReconcileReport, RetentionEngine, SiteStatus,
};
use crate::whitelist::storage::Storage;
use crate::whitelist::store::{ToggleOutcome, WhitelistStore};
use std::sync::Arc;

/// One external request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    GetWhitelist,
    ReplaceWhitelist { entries: Vec<String> },
    ToggleDomain { domain: String },
    GetNonWhitelistedDomains,
    SimulateDeletion,
    DeleteNonWhitelisted,
    DeleteForOrigin { origin: String },
    DeleteOne { origin: String, name: String },
    SiteStatus { url: String },
    SiteCookies { url: String },
    GetDeleteOnStartup,
    SetDeleteOnStartup { enabled: bool },
}

/// The typed result of one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Whitelist(Vec<ParentDomain>),
    Toggled(ToggleOutcome),
    Summaries(Vec<DomainSummary>),
    Reconciled(ReconcileReport),
    Deletion(DeletionOutcome),
    Site(SiteStatus),
    Cookies(Vec<CookieRecord>),
    DeleteOnStartup(bool),
}

/// The façade external layers talk to.
pub struct Sweeper {
    whitelist: Arc<WhitelistStore>,
    engine: RetentionEngine,
}

impl Sweeper {
    pub fn new(storage: Arc<dyn Storage>, host: Arc<dyn CookieHost>) -> Self {
        let whitelist = Arc::new(WhitelistStore::new(storage));
        let engine = RetentionEngine::new(Arc::clone(&whitelist), host);
        Self { whitelist, engine }
    }

    /// Direct access to the whitelist store.
    pub fn whitelist(&self) -> &WhitelistStore {
        &self.whitelist
    }

    /// Direct access to the retention engine.
    pub fn engine(&self) -> &RetentionEngine {
        &self.engine
    }

    /// Handle one command.
    pub async fn dispatch(&self, command: Command) -> Result<Response, SweepError> {
        match command {
            Command::GetWhitelist => Ok(Response::Whitelist(self.whitelist.get().await?)),
            Command::ReplaceWhitelist { entries } => {
                Ok(Response::Whitelist(self.whitelist.replace(&entries).await?))
            }
            Command::ToggleDomain { domain } => {
                let domain = required(&domain, "domain")?;
                let outcome = self
                    .whitelist
                    .toggle(&ParentDomain::derive(domain))
                    .await?;
                Ok(Response::Toggled(outcome))
            }
            Command::GetNonWhitelistedDomains => {
                Ok(Response::Summaries(self.engine.classify().await?))
            }
            Command::SimulateDeletion => {
                let report = self.engine.reconcile(false).await?;
                Ok(Response::Summaries(report.summary))
            }
            Command::DeleteNonWhitelisted => {
                Ok(Response::Reconciled(self.engine.reconcile(true).await?))
            }
            Command::DeleteForOrigin { origin } => {
                let origin = required(&origin, "origin")?;
                Ok(Response::Deletion(
                    self.engine.delete_for_origin(origin).await?,
                ))
            }
            Command::DeleteOne { origin, name } => {
                let origin = required(&origin, "origin")?;
                let name = required(&name, "name")?;
                Ok(Response::Deletion(self.engine.delete_one(origin, name).await?))
            }
            Command::SiteStatus { url } => {
                let url = required(&url, "url")?;
                Ok(Response::Site(self.engine.site_status(url).await?))
            }
            Command::SiteCookies { url } => {
                let url = required(&url, "url")?;
                Ok(Response::Cookies(self.engine.cookies_for_site(url).await?))
            }
            Command::GetDeleteOnStartup => Ok(Response::DeleteOnStartup(
                self.whitelist.delete_on_startup().await?,
            )),
            Command::SetDeleteOnStartup { enabled } => Ok(Response::DeleteOnStartup(
                self.whitelist.set_delete_on_startup(enabled).await?,
            )),
        }
    }

    /// Run the once-per-launch sweep if the preference asks for one.
    ///
    /// Returns `None` when the preference is off; otherwise the report of
    /// the executed reconcile (which still honors the empty-whitelist
    /// guard).
    pub async fn startup_sweep(&self) -> Result<Option<ReconcileReport>, SweepError> {
        if !self.whitelist.delete_on_startup().await? {
            tracing::debug!("startup sweep disabled");
            return Ok(None);
        }
        tracing::info!("running startup sweep");
        Ok(Some(self.engine.reconcile(true).await?))
    }
}

fn required<'a>(value: &'a str, what: &str) -> Result<&'a str, SweepError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(SweepError::invalid_request(format!("{what} is required")));
    }
    Ok(trimmed)
}
