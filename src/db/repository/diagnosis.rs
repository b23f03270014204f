use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::DatabaseError;
use crate::models::*;

const DIAGNOSIS_COLUMNS: &str = "id, name, contact, image_urls, symptoms, description, ai_analysis,
     risk_score, status, expert_comment, estimated_cost, created_at";

/// Insert a submission with the given initial status. Returns the new row id.
pub fn insert_diagnosis(
    conn: &Connection,
    diag: &NewDiagnosis,
    status: &str,
    created_at: &str,
) -> Result<i64, DatabaseError> {
    let image_urls = serde_json::to_string(&diag.image_urls)
        .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?;
    conn.execute(
        "INSERT INTO diagnoses (name, contact, contact_key, image_urls, symptoms, description, status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            diag.name,
            diag.contact,
            contact_key(&diag.contact),
            image_urls,
            diag.symptoms,
            diag.description,
            status,
            created_at,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_diagnosis(conn: &Connection, id: i64) -> Result<Option<Diagnosis>, DatabaseError> {
    let sql = format!("SELECT {DIAGNOSIS_COLUMNS} FROM diagnoses WHERE id = ?1");
    let diag = conn
        .query_row(&sql, params![id], diagnosis_from_row)
        .optional()?;
    Ok(diag)
}

/// All diagnoses in insertion order.
pub fn get_all_diagnoses(conn: &Connection) -> Result<Vec<Diagnosis>, DatabaseError> {
    let sql = format!("SELECT {DIAGNOSIS_COLUMNS} FROM diagnoses ORDER BY id");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], diagnosis_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

/// Diagnoses whose contact shares the query's lookup key, newest first.
pub fn get_diagnoses_by_contact(
    conn: &Connection,
    contact: &str,
) -> Result<Vec<Diagnosis>, DatabaseError> {
    let sql = format!(
        "SELECT {DIAGNOSIS_COLUMNS} FROM diagnoses WHERE contact_key = ?1
         ORDER BY created_at DESC, id DESC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![contact_key(contact)], diagnosis_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn update_diagnosis_analysis(
    conn: &Connection,
    id: i64,
    summary: &str,
    risk_score: i32,
    status: &str,
) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE diagnoses SET ai_analysis = ?1, risk_score = ?2, status = ?3 WHERE id = ?4",
        params![summary, risk_score, status, id],
    )?;
    expect_one_row(changed, id)
}

pub fn update_diagnosis_response(
    conn: &Connection,
    id: i64,
    expert_comment: &str,
    estimated_cost: i64,
    status: &str,
) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE diagnoses SET expert_comment = ?1, estimated_cost = ?2, status = ?3 WHERE id = ?4",
        params![expert_comment, estimated_cost, status, id],
    )?;
    expect_one_row(changed, id)
}

pub fn update_diagnosis_status(conn: &Connection, id: i64, status: &str) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE diagnoses SET status = ?1 WHERE id = ?2",
        params![status, id],
    )?;
    expect_one_row(changed, id)
}

fn expect_one_row(changed: usize, id: i64) -> Result<(), DatabaseError> {
    if changed == 0 {
        return Err(DatabaseError::not_found("diagnosis", id));
    }
    Ok(())
}

fn diagnosis_from_row(row: &Row<'_>) -> rusqlite::Result<Diagnosis> {
    let image_urls: String = row.get(3)?;
    let image_urls = serde_json::from_str(&image_urls)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?;
    Ok(Diagnosis {
        id: row.get(0)?,
        name: row.get(1)?,
        contact: row.get(2)?,
        image_urls,
        symptoms: row.get(4)?,
        description: row.get(5)?,
        ai_analysis: row.get(6)?,
        risk_score: row.get(7)?,
        status: row.get(8)?,
        expert_comment: row.get(9)?,
        estimated_cost: row.get(10)?,
        created_at: row.get(11)?,
    })
}
