//! Diagnosis lifecycle coordination.
//!
//! `DiagnosisEvent` names the status each step of the flow writes. Intake
//! (`Analyzed`) and expert responses (`Responded`) store their status in the
//! same UPDATE as their payload, using `target_status()`; status-only writes
//! (overrides and reservation effects) go through `apply_event`. The happy
//! path is RECEIPT → WAITING → ANSWERED → VISIT | REJECTED, but writes are
//! unconditional: the prior status is reported, never checked.
//! Reservation events reach a diagnosis only through the two
//! `on_reservation_*` hooks, which skip diagnoses that no longer exist.

use std::str::FromStr;

use rusqlite::Connection;
use serde::Serialize;

use crate::db::{self, DatabaseError};
use crate::models::enums::DiagnosisStatus;

/// Something that happened to a diagnosis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosisEvent {
    /// Risk analysis finished after intake.
    Analyzed,
    /// An expert posted a comment and estimate.
    Responded,
    /// A visit reservation referencing the diagnosis was created.
    VisitRequested,
    /// That reservation was canceled.
    VisitCanceled,
    /// Caller-supplied status, stored verbatim.
    Overridden(String),
}

impl DiagnosisEvent {
    pub fn target_status(&self) -> &str {
        match self {
            Self::Analyzed => DiagnosisStatus::Waiting.as_str(),
            Self::Responded => DiagnosisStatus::Answered.as_str(),
            Self::VisitRequested => DiagnosisStatus::Visit.as_str(),
            Self::VisitCanceled => DiagnosisStatus::Rejected.as_str(),
            Self::Overridden(status) => status,
        }
    }
}

/// Before/after record of one status write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusChange {
    pub diagnosis_id: i64,
    pub from: String,
    pub to: String,
}

impl StatusChange {
    /// Whether the write followed one of the documented arrows.
    pub fn follows_happy_path(&self) -> bool {
        use DiagnosisStatus::*;
        let from = DiagnosisStatus::from_str(&self.from).ok();
        let to = DiagnosisStatus::from_str(&self.to).ok();
        matches!(
            (from, to),
            (Some(Receipt), Some(Waiting))
                | (Some(Waiting), Some(Answered))
                | (Some(Answered), Some(Visit))
                | (Some(Answered), Some(Rejected))
                | (Some(Visit), Some(Rejected))
        )
    }
}

/// Write the event's target status onto a diagnosis, whatever its current status.
pub fn apply_event(
    conn: &Connection,
    diagnosis_id: i64,
    event: &DiagnosisEvent,
) -> Result<StatusChange, DatabaseError> {
    let current = db::get_diagnosis(conn, diagnosis_id)?
        .ok_or_else(|| DatabaseError::not_found("diagnosis", diagnosis_id))?;

    let target = event.target_status();
    db::update_diagnosis_status(conn, diagnosis_id, target)?;

    let change = StatusChange {
        diagnosis_id,
        from: current.status,
        to: target.to_string(),
    };
    if !change.follows_happy_path() {
        tracing::debug!(
            diagnosis_id,
            from = %change.from,
            to = %change.to,
            "Diagnosis status moved off the usual path"
        );
    }
    Ok(change)
}

/// Mark the referenced diagnosis as VISIT. Missing diagnoses are skipped.
pub fn on_reservation_created(
    conn: &Connection,
    diagnosis_id: Option<i64>,
) -> Result<Option<StatusChange>, DatabaseError> {
    propagate(conn, diagnosis_id, DiagnosisEvent::VisitRequested)
}

/// Mark the referenced diagnosis as REJECTED. Missing diagnoses are skipped.
pub fn on_reservation_canceled(
    conn: &Connection,
    diagnosis_id: Option<i64>,
) -> Result<Option<StatusChange>, DatabaseError> {
    propagate(conn, diagnosis_id, DiagnosisEvent::VisitCanceled)
}

fn propagate(
    conn: &Connection,
    diagnosis_id: Option<i64>,
    event: DiagnosisEvent,
) -> Result<Option<StatusChange>, DatabaseError> {
    let Some(id) = diagnosis_id else {
        return Ok(None);
    };
    match apply_event(conn, id, &event) {
        Ok(change) => {
            tracing::info!(diagnosis_id = id, from = %change.from, to = %change.to, "Reservation updated diagnosis status");
            Ok(Some(change))
        }
        Err(DatabaseError::NotFound { .. }) => {
            tracing::warn!(diagnosis_id = id, "Reservation references unknown diagnosis");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
