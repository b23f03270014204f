//! Visit reservations and their effect on linked diagnoses.
//!
//! A reservation starts PENDING and ends CONFIRMED or CANCELED; neither
//! end state can be left. Creating a reservation marks its diagnosis VISIT,
//! canceling it marks the diagnosis REJECTED.

use rusqlite::Connection;

use crate::db::{self, DatabaseError};
use crate::lifecycle;
use crate::models::enums::ReservationStatus;
use crate::models::{NewReservation, Reservation, ReservationConfirmation};

pub fn create(conn: &Connection, input: &NewReservation) -> Result<Reservation, DatabaseError> {
    let id = db::insert_reservation(conn, input, ReservationStatus::Pending, &db::now_timestamp())?;
    tracing::info!(
        reservation_id = id,
        expert_id = input.expert_id,
        diagnosis_id = ?input.diagnosis_id,
        "Reservation created"
    );

    lifecycle::on_reservation_created(conn, input.diagnosis_id)?;

    get_existing(conn, id)
}

/// Expert accepts the visit and attaches a quote.
pub fn confirm(
    conn: &Connection,
    id: i64,
    confirmation: &ReservationConfirmation,
) -> Result<Reservation, DatabaseError> {
    let current = get_existing(conn, id)?;
    ensure_open(&current, ReservationStatus::Confirmed)?;

    db::update_reservation_confirmation(conn, id, confirmation)?;
    tracing::info!(reservation_id = id, estimated_cost = ?confirmation.estimated_cost, "Reservation confirmed");

    get_existing(conn, id)
}

pub fn cancel(conn: &Connection, id: i64) -> Result<Reservation, DatabaseError> {
    let current = get_existing(conn, id)?;
    ensure_open(&current, ReservationStatus::Canceled)?;

    db::update_reservation_status(conn, id, ReservationStatus::Canceled)?;
    tracing::info!(reservation_id = id, "Reservation canceled");

    lifecycle::on_reservation_canceled(conn, current.diagnosis_id)?;

    get_existing(conn, id)
}

/// Newest first.
pub fn find_all(conn: &Connection) -> Result<Vec<Reservation>, DatabaseError> {
    db::get_all_reservations(conn)
}

pub fn find_one(conn: &Connection, id: i64) -> Result<Option<Reservation>, DatabaseError> {
    db::get_reservation(conn, id)
}

/// Hard delete; the linked diagnosis is left untouched.
pub fn remove(conn: &Connection, id: i64) -> Result<(), DatabaseError> {
    if !db::delete_reservation(conn, id)? {
        return Err(DatabaseError::not_found("reservation", id));
    }
    tracing::info!(reservation_id = id, "Reservation deleted");
    Ok(())
}

fn get_existing(conn: &Connection, id: i64) -> Result<Reservation, DatabaseError> {
    db::get_reservation(conn, id)?.ok_or_else(|| DatabaseError::not_found("reservation", id))
}

fn ensure_open(current: &Reservation, target: ReservationStatus) -> Result<(), DatabaseError> {
    if current.status.is_terminal() {
        return Err(DatabaseError::InvalidTransition {
            entity_type: "reservation".into(),
            id: current.id.to_string(),
            from: current.status.to_string(),
            to: target.to_string(),
        });
    }
    Ok(())
}
