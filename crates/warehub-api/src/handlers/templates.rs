//! Template authoring helpers.

use axum::Json;
use validator::Validate;

use warehub_core::error::AppError;
use warehub_service::template::{TemplateValidation, validate};

use crate::dto::request::ValidateTemplateRequest;
use crate::error::ApiError;

/// POST /api/templates/validate
///
/// Reports unknown and malformed placeholders in a subject/body pair.
pub async fn validate_template(
    Json(req): Json<ValidateTemplateRequest>,
) -> Result<Json<TemplateValidation>, ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let mut parts = vec![req.body.as_str()];
    if let Some(subject) = req.subject.as_deref() {
        parts.push(subject);
    }
    Ok(Json(validate(&parts)))
}
