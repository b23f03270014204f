//! Reservation endpoints.
//!
//! - `POST /reservations`: book a visit (PENDING); linked diagnosis → VISIT
//! - `PATCH /reservations/:id/confirm`: expert quote (CONFIRMED)
//! - `PATCH /reservations/:id/cancel`: CANCELED; linked diagnosis → REJECTED
//! - `GET /reservations`, `GET /reservations/:id`: newest first / fetch
//! - `DELETE /reservations/:id`: hard delete

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{parse_id, ApiContext};
use crate::intake;
use crate::models::{NewReservation, Reservation, ReservationConfirmation};
use crate::reservations;

/// `POST /reservations`
pub async fn create(
    State(ctx): State<ApiContext>,
    body: Result<Json<NewReservation>, JsonRejection>,
) -> Result<(StatusCode, Json<Reservation>), ApiError> {
    let Json(body) = body?;
    let input = intake::validate_reservation(body)?;
    let conn = ctx.core.lock_db()?;
    let created = reservations::create(&conn, &input)?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `PATCH /reservations/:id/confirm`
pub async fn confirm(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
    body: Result<Json<ReservationConfirmation>, JsonRejection>,
) -> Result<Json<Reservation>, ApiError> {
    let id = parse_id(&id)?;
    let Json(body) = body?;
    let conn = ctx.core.lock_db()?;
    Ok(Json(reservations::confirm(&conn, id, &body)?))
}

/// `PATCH /reservations/:id/cancel`
pub async fn cancel(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<Reservation>, ApiError> {
    let id = parse_id(&id)?;
    let conn = ctx.core.lock_db()?;
    Ok(Json(reservations::cancel(&conn, id)?))
}

/// `GET /reservations`
pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<Vec<Reservation>>, ApiError> {
    let conn = ctx.core.lock_db()?;
    Ok(Json(reservations::find_all(&conn)?))
}

/// `GET /reservations/:id`
pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<Reservation>, ApiError> {
    let id = parse_id(&id)?;
    let conn = ctx.core.lock_db()?;
    reservations::find_one(&conn, id)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("reservation #{id} not found")))
}

/// `DELETE /reservations/:id`
pub async fn remove(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    let conn = ctx.core.lock_db()?;
    reservations::remove(&conn, id)?;
    Ok(StatusCode::NO_CONTENT)
}
