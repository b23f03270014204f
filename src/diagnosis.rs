//! Diagnosis store: intake, expert response, and status overrides.
//!
//! Intake is two writes: the row is saved as RECEIPT, analysed, then
//! saved again as WAITING. There is no transaction around the pair; if
//! the second write fails the row stays at RECEIPT.

use rusqlite::Connection;

use crate::analysis::RiskAnalyzer;
use crate::db::{self, DatabaseError};
use crate::lifecycle::{self, DiagnosisEvent};
use crate::models::enums::DiagnosisStatus;
use crate::models::{Diagnosis, NewDiagnosis};

/// Persist a submission, run the risk analysis, and return the WAITING record.
pub fn create(
    conn: &Connection,
    analyzer: &dyn RiskAnalyzer,
    input: &NewDiagnosis,
) -> Result<Diagnosis, DatabaseError> {
    let id = db::insert_diagnosis(
        conn,
        input,
        DiagnosisStatus::Receipt.as_str(),
        &db::now_timestamp(),
    )?;
    tracing::info!(diagnosis_id = id, images = input.image_urls.len(), "Diagnosis received");

    let assessment = analyzer.analyze(input);
    db::update_diagnosis_analysis(
        conn,
        id,
        &assessment.summary,
        assessment.score,
        DiagnosisEvent::Analyzed.target_status(),
    )?;
    tracing::info!(diagnosis_id = id, risk_score = assessment.score, "Diagnosis analysed");

    find_one(conn, id)?.ok_or_else(|| DatabaseError::not_found("diagnosis", id))
}

pub fn find_all(conn: &Connection) -> Result<Vec<Diagnosis>, DatabaseError> {
    db::get_all_diagnoses(conn)
}

/// Tracking lookup: everything whose contact has the same digits, newest first.
pub fn find_by_contact(conn: &Connection, contact: &str) -> Result<Vec<Diagnosis>, DatabaseError> {
    db::get_diagnoses_by_contact(conn, contact)
}

pub fn find_one(conn: &Connection, id: i64) -> Result<Option<Diagnosis>, DatabaseError> {
    db::get_diagnosis(conn, id)
}

/// Record an expert's comment and estimate; status becomes ANSWERED.
pub fn add_response(
    conn: &Connection,
    id: i64,
    expert_comment: &str,
    estimated_cost: i64,
) -> Result<Diagnosis, DatabaseError> {
    db::update_diagnosis_response(
        conn,
        id,
        expert_comment,
        estimated_cost,
        DiagnosisEvent::Responded.target_status(),
    )?;
    tracing::info!(diagnosis_id = id, estimated_cost, "Expert response recorded");
    find_one(conn, id)?.ok_or_else(|| DatabaseError::not_found("diagnosis", id))
}

/// Overwrite the status with any string. Unknown values are stored as-is.
pub fn update_status(conn: &Connection, id: i64, status: &str) -> Result<Diagnosis, DatabaseError> {
    if status.parse::<DiagnosisStatus>().is_err() {
        tracing::warn!(diagnosis_id = id, status, "Storing unrecognised diagnosis status");
    }
    lifecycle::apply_event(conn, id, &DiagnosisEvent::Overridden(status.to_string()))?;
    find_one(conn, id)?.ok_or_else(|| DatabaseError::not_found("diagnosis", id))
}
