use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::DatabaseError;
use crate::models::*;

pub fn insert_expert(
    conn: &Connection,
    expert: &NewExpert,
    created_at: &str,
) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO experts (name, specialty, region, rating, review_count, is_certified, image_url, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            expert.name,
            expert.specialty,
            expert.region,
            expert.rating,
            expert.review_count,
            expert.is_certified,
            expert.image_url,
            created_at,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_expert(conn: &Connection, id: i64) -> Result<Option<Expert>, DatabaseError> {
    let expert = conn
        .query_row(
            "SELECT id, name, specialty, region, rating, review_count, is_certified, image_url, created_at
             FROM experts WHERE id = ?1",
            params![id],
            expert_from_row,
        )
        .optional()?;
    Ok(expert)
}

pub fn get_all_experts(conn: &Connection) -> Result<Vec<Expert>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, specialty, region, rating, review_count, is_certified, image_url, created_at
         FROM experts ORDER BY id",
    )?;
    let rows = stmt.query_map([], expert_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn count_experts(conn: &Connection) -> Result<i64, DatabaseError> {
    let count = conn.query_row("SELECT COUNT(*) FROM experts", [], |row| row.get(0))?;
    Ok(count)
}

fn expert_from_row(row: &Row<'_>) -> rusqlite::Result<Expert> {
    Ok(Expert {
        id: row.get(0)?,
        name: row.get(1)?,
        specialty: row.get(2)?,
        region: row.get(3)?,
        rating: row.get(4)?,
        review_count: row.get(5)?,
        is_certified: row.get(6)?,
        image_url: row.get(7)?,
        created_at: row.get(8)?,
    })
}
