//! Diagnosis endpoints.
//!
//! - `POST /diagnosis`: multipart intake (text fields + up to 5 `files`)
//! - `GET /diagnosis`: list, or `?contact=` tracking lookup (digits compared, newest first)
//! - `GET /diagnosis/:id`: fetch one
//! - `PATCH /diagnosis/:id/response`: expert answer → ANSWERED
//! - `PATCH /diagnosis/:id/status`: unchecked status overwrite
//! - `PATCH|DELETE /diagnosis/:id`: not supported

use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::{parse_id, ApiContext};
use crate::diagnosis;
use crate::intake::{self, DiagnosisForm, ValidationError};
use crate::models::Diagnosis;

/// Multipart part name carrying photos.
const FILES_FIELD: &str = "files";

struct IncomingFile {
    file_name: Option<String>,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

/// `POST /diagnosis`: submit a new diagnosis request.
pub async fn create(
    State(ctx): State<ApiContext>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<Diagnosis>), ApiError> {
    let mut multipart = multipart?;
    let mut form = DiagnosisForm::default();
    let mut files: Vec<IncomingFile> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or("").to_string();
        if name == FILES_FIELD {
            let file_name = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(format!("Failed to read file data: {e}")))?;
            // Browsers send an empty part when no file was picked.
            if bytes.is_empty() && file_name.as_deref().unwrap_or("").is_empty() {
                continue;
            }
            intake::check_file_count(files.len() + 1)?;
            files.push(IncomingFile {
                file_name,
                content_type,
                bytes: bytes.to_vec(),
            });
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| ApiError::BadRequest(format!("Failed to read field {name}: {e}")))?;
            form.set_field(&name, value);
        }
    }

    tracing::info!(files = files.len(), "Received diagnosis submission");

    // Reject bad text fields before anything touches the disk.
    let fields = form.validate()?;

    let uploads = ctx.core.uploads();
    let image_urls = files
        .iter()
        .map(|f| uploads.save(f.file_name.as_deref(), f.content_type.as_deref(), &f.bytes))
        .collect::<Result<Vec<_>, _>>()?;
    let input = fields.with_images(image_urls)?;

    let conn = ctx.core.lock_db()?;
    let created = diagnosis::create(&conn, ctx.core.analyzer(), &input)?;

    Ok((StatusCode::CREATED, Json(created)))
}

#[derive(Deserialize)]
pub struct ListQuery {
    pub contact: Option<String>,
}

/// `GET /diagnosis`: all diagnoses, or those filed under `?contact=`.
pub async fn list(
    State(ctx): State<ApiContext>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Diagnosis>>, ApiError> {
    let contact = query.contact.filter(|c| !c.trim().is_empty());

    let conn = ctx.core.lock_db()?;
    let diagnoses = match contact {
        Some(contact) => diagnosis::find_by_contact(&conn, &contact)?,
        None => diagnosis::find_all(&conn)?,
    };
    Ok(Json(diagnoses))
}

/// `GET /diagnosis/:id`
pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<Diagnosis>, ApiError> {
    let id = parse_id(&id)?;
    let conn = ctx.core.lock_db()?;
    diagnosis::find_one(&conn, id)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("diagnosis #{id} not found")))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBody {
    pub expert_comment: Option<String>,
    pub estimated_cost: Option<i64>,
}

/// `PATCH /diagnosis/:id/response`: expert comment and estimate.
pub async fn respond(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
    body: Result<Json<ResponseBody>, JsonRejection>,
) -> Result<Json<Diagnosis>, ApiError> {
    let id = parse_id(&id)?;
    let Json(body) = body?;
    let (comment, cost) = intake::validate_response(body.expert_comment, body.estimated_cost)?;

    let conn = ctx.core.lock_db()?;
    Ok(Json(diagnosis::add_response(&conn, id, &comment, cost)?))
}

#[derive(Deserialize)]
pub struct StatusBody {
    pub status: Option<String>,
}

/// `PATCH /diagnosis/:id/status`: store the given status verbatim.
pub async fn update_status(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
    body: Result<Json<StatusBody>, JsonRejection>,
) -> Result<Json<Diagnosis>, ApiError> {
    let id = parse_id(&id)?;
    let Json(body) = body?;
    let status = body.status.ok_or(ValidationError::MissingField("status"))?;

    let conn = ctx.core.lock_db()?;
    Ok(Json(diagnosis::update_status(&conn, id, &status)?))
}

/// `PATCH /diagnosis/:id`
pub async fn update(Path(_id): Path<String>) -> ApiError {
    ApiError::NotImplemented("Editing a diagnosis")
}

/// `DELETE /diagnosis/:id`
pub async fn remove(Path(_id): Path<String>) -> ApiError {
    ApiError::NotImplemented("Deleting a diagnosis")
}
