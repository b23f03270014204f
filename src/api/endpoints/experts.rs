//! Expert directory endpoints.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{parse_id, ApiContext};
use crate::experts;
use crate::intake;
use crate::models::{Expert, NewExpert};

/// `GET /experts`
pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<Vec<Expert>>, ApiError> {
    let conn = ctx.core.lock_db()?;
    Ok(Json(experts::find_all(&conn)?))
}

/// `POST /experts`
pub async fn create(
    State(ctx): State<ApiContext>,
    body: Result<Json<NewExpert>, JsonRejection>,
) -> Result<(StatusCode, Json<Expert>), ApiError> {
    let Json(body) = body?;
    let input = intake::validate_expert(body)?;
    let conn = ctx.core.lock_db()?;
    let created = experts::create(&conn, &input)?;
    tracing::info!(expert_id = created.id, "Expert registered");
    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /experts/:id`
pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<Expert>, ApiError> {
    let id = parse_id(&id)?;
    let conn = ctx.core.lock_db()?;
    experts::find_one(&conn, id)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("expert #{id} not found")))
}
