//! Request boundary: turns untrusted form/JSON input into typed values.
//!
//! Form fields arrive as optional strings; anything required that is
//! absent or blank is rejected here so the stores never see it.

use crate::models::{NewDiagnosis, NewExpert, NewReservation};

/// Maximum number of photos attached to one diagnosis.
pub const MAX_DIAGNOSIS_FILES: usize = 5;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("At most {max} files may be attached, got {got}")]
    TooManyFiles { max: usize, got: usize },
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Raw multipart text fields of a diagnosis submission.
#[derive(Debug, Default, Clone)]
pub struct DiagnosisForm {
    pub name: Option<String>,
    pub contact: Option<String>,
    pub symptoms: Option<String>,
    pub description: Option<String>,
}

/// Text fields of a submission that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosisFields {
    pub name: String,
    pub contact: String,
    pub symptoms: String,
    pub description: String,
}

impl DiagnosisForm {
    /// Store a named text part. Unknown names are ignored.
    pub fn set_field(&mut self, name: &str, value: String) {
        match name {
            "name" => self.name = Some(value),
            "contact" => self.contact = Some(value),
            "symptoms" => self.symptoms = Some(value),
            "description" => self.description = Some(value),
            _ => {}
        }
    }

    /// Every field must be present and non-blank. Values are trimmed, nothing else.
    pub fn validate(self) -> Result<DiagnosisFields, ValidationError> {
        Ok(DiagnosisFields {
            name: required("name", self.name)?,
            contact: required("contact", self.contact)?,
            symptoms: required("symptoms", self.symptoms)?,
            description: required("description", self.description)?,
        })
    }
}

impl DiagnosisFields {
    /// Attach already-stored image references.
    pub fn with_images(self, image_urls: Vec<String>) -> Result<NewDiagnosis, ValidationError> {
        check_file_count(image_urls.len())?;
        Ok(NewDiagnosis {
            name: self.name,
            contact: self.contact,
            symptoms: self.symptoms,
            description: self.description,
            image_urls,
        })
    }
}

pub fn check_file_count(got: usize) -> Result<(), ValidationError> {
    if got > MAX_DIAGNOSIS_FILES {
        return Err(ValidationError::TooManyFiles {
            max: MAX_DIAGNOSIS_FILES,
            got,
        });
    }
    Ok(())
}

pub fn validate_response(
    expert_comment: Option<String>,
    estimated_cost: Option<i64>,
) -> Result<(String, i64), ValidationError> {
    let comment = required("expertComment", expert_comment)?;
    let cost = estimated_cost.ok_or(ValidationError::MissingField("estimatedCost"))?;
    if cost < 0 {
        return Err(ValidationError::InvalidValue {
            field: "estimatedCost",
            reason: "must not be negative".into(),
        });
    }
    Ok((comment, cost))
}

pub fn validate_reservation(input: NewReservation) -> Result<NewReservation, ValidationError> {
    if input.reservation_date.trim().is_empty() {
        return Err(ValidationError::MissingField("reservationDate"));
    }
    Ok(input)
}

pub fn validate_expert(input: NewExpert) -> Result<NewExpert, ValidationError> {
    for (field, value) in [
        ("name", &input.name),
        ("specialty", &input.specialty),
        ("region", &input.region),
    ] {
        if value.trim().is_empty() {
            return Err(ValidationError::MissingField(field));
        }
    }
    if !(0.0..=5.0).contains(&input.rating) {
        return Err(ValidationError::InvalidValue {
            field: "rating",
            reason: format!("{} is outside 0.0..=5.0", input.rating),
        });
    }
    Ok(input)
}

fn required(field: &'static str, value: Option<String>) -> Result<String, ValidationError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(ValidationError::MissingField(field)),
    }
}
