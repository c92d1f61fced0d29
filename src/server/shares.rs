//! Read-only snapshots of finished wizard runs, reachable by link.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::cache::TtlStore;
use crate::models::Analysis;
use crate::wizard::{Enhancement, WizardSession};

/// What a share link shows.
#[derive(Debug, Clone, Serialize)]
pub struct SharedReport {
    pub doc_title: String,
    pub file_name: String,
    pub analysis: Analysis,
    pub enhancement: Enhancement,
    pub shared_at: DateTime<Utc>,
}

impl SharedReport {
    /// Snapshot a session, if it has reached the share step.
    pub fn from_session(session: &WizardSession) -> Option<Self> {
        let doc_type = session.knowledge_type()?;
        let file = session.file.as_ref()?;
        Some(Self {
            doc_title: doc_type.title.to_string(),
            file_name: file.info.name.clone(),
            analysis: session.analysis.clone()?,
            enhancement: session.enhancement.clone()?,
            shared_at: Utc::now(),
        })
    }
}

/// Share links with a fixed lifetime from creation.
pub struct ShareStore {
    reports: TtlStore<SharedReport>,
}

impl ShareStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            reports: TtlStore::new(ttl),
        }
    }

    /// Store a report and return its id.
    pub fn publish(&self, report: SharedReport) -> String {
        let id = uuid::Uuid::new_v4().simple().to_string();
        self.reports.insert(id.clone(), report);
        id
    }

    pub fn get(&self, id: &str) -> Option<SharedReport> {
        self.reports.get(id)
    }

    pub fn ttl(&self) -> Duration {
        self.reports.ttl()
    }

    /// Human-readable lifetime, e.g. "24 hours".
    pub fn expiry_label(&self) -> String {
        let secs = self.ttl().as_secs();
        match secs {
            s if s >= 3600 && s % 3600 == 0 => plural(s / 3600, "hour"),
            s if s >= 60 && s % 60 == 0 => plural(s / 60, "minute"),
            s => plural(s, "second"),
        }
    }

    pub fn purge_expired(&self) -> usize {
        self.reports.purge_expired().len()
    }
}

fn plural(n: u64, unit: &str) -> String {
    if n == 1 {
        format!("1 {}", unit)
    } else {
        format!("{} {}s", n, unit)
    }
}
