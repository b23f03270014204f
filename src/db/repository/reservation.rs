use std::str::FromStr;

use rusqlite::{params, Connection, OptionalExtension};

use crate::db::DatabaseError;
use crate::models::enums::ReservationStatus;
use crate::models::*;

const RESERVATION_COLUMNS: &str = "id, expert_id, user_id, reservation_date, description, diagnosis_id,
     status, confirmed_date, estimated_cost, expert_note, created_at";

pub fn insert_reservation(
    conn: &Connection,
    res: &NewReservation,
    status: ReservationStatus,
    created_at: &str,
) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO reservations (expert_id, user_id, reservation_date, description, diagnosis_id, status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            res.expert_id,
            res.user_id,
            res.reservation_date,
            res.description,
            res.diagnosis_id,
            status.as_str(),
            created_at,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_reservation(conn: &Connection, id: i64) -> Result<Option<Reservation>, DatabaseError> {
    let sql = format!("SELECT {RESERVATION_COLUMNS} FROM reservations WHERE id = ?1");
    let row = conn
        .query_row(&sql, params![id], read_reservation_row)
        .optional()?;
    row.map(reservation_from_row).transpose()
}

/// All reservations, most recently created first.
pub fn get_all_reservations(conn: &Connection) -> Result<Vec<Reservation>, DatabaseError> {
    let sql = format!(
        "SELECT {RESERVATION_COLUMNS} FROM reservations ORDER BY created_at DESC, id DESC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], read_reservation_row)?;

    let mut reservations = Vec::new();
    for row in rows {
        reservations.push(reservation_from_row(row?)?);
    }
    Ok(reservations)
}

pub fn update_reservation_confirmation(
    conn: &Connection,
    id: i64,
    confirmation: &ReservationConfirmation,
) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE reservations
         SET status = ?1, estimated_cost = ?2, expert_note = ?3, confirmed_date = ?4
         WHERE id = ?5",
        params![
            ReservationStatus::Confirmed.as_str(),
            confirmation.estimated_cost,
            confirmation.expert_note,
            confirmation.confirmed_date,
            id,
        ],
    )?;
    if changed == 0 {
        return Err(DatabaseError::not_found("reservation", id));
    }
    Ok(())
}

pub fn update_reservation_status(
    conn: &Connection,
    id: i64,
    status: ReservationStatus,
) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE reservations SET status = ?1 WHERE id = ?2",
        params![status.as_str(), id],
    )?;
    if changed == 0 {
        return Err(DatabaseError::not_found("reservation", id));
    }
    Ok(())
}

/// Hard delete. Returns whether a row was removed.
pub fn delete_reservation(conn: &Connection, id: i64) -> Result<bool, DatabaseError> {
    let changed = conn.execute("DELETE FROM reservations WHERE id = ?1", params![id])?;
    Ok(changed > 0)
}

type ReservationRow = (
    i64,
    i64,
    Option<i64>,
    String,
    String,
    Option<i64>,
    String,
    Option<String>,
    Option<i64>,
    Option<String>,
    String,
);

fn read_reservation_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ReservationRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
        row.get(7)?,
        row.get(8)?,
        row.get(9)?,
        row.get(10)?,
    ))
}

fn reservation_from_row(row: ReservationRow) -> Result<Reservation, DatabaseError> {
    let (
        id,
        expert_id,
        user_id,
        reservation_date,
        description,
        diagnosis_id,
        status,
        confirmed_date,
        estimated_cost,
        expert_note,
        created_at,
    ) = row;
    Ok(Reservation {
        id,
        expert_id,
        user_id,
        reservation_date,
        description,
        diagnosis_id,
        status: ReservationStatus::from_str(&status)?,
        confirmed_date,
        estimated_cost,
        expert_note,
        created_at,
    })
}
