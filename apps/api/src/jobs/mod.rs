pub mod handlers;
pub mod queries;

use uuid::Uuid;

use crate::errors::AppError;
use crate::models::job::NewJob;

/// Parses a path segment as a job id, mapping garbage to a 400.
pub fn parse_job_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::Validation(format!("Invalid job id: {raw}")))
}

pub fn validate_progress(progress: i32) -> Result<(), AppError> {
    if !(0..=100).contains(&progress) {
        return Err(AppError::Validation(format!(
            "progress must be between 0 and 100, got {progress}"
        )));
    }
    Ok(())
}

pub fn validate_new_job(job: &NewJob) -> Result<(), AppError> {
    for (field, value) in [
        ("title", &job.title),
        ("company", &job.company),
        ("description", &job.description),
    ] {
        if value.trim().is_empty() {
            return Err(AppError::Validation(format!("{field} cannot be empty")));
        }
    }
    if let Some(progress) = job.progress {
        validate_progress(progress)?;
    }
    Ok(())
}
