//! Configuration validation logic.

use std::collections::HashSet;

use crate::schema::{Config, JobKindDef};

pub const LATEST_VERSION: u32 = 1;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_config(config: &Config) -> Result<(), ValidationError> {
    if config.version == 0 || config.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: config.version,
        });
    }

    if config.delimiter.is_empty() {
        return Err(ValidationError::InvalidValue {
            field: "delimiter".to_string(),
            value: String::new(),
            reason: "must not be empty".to_string(),
        });
    }

    for (field, value) in [
        ("tolerance.abs", config.tolerance.abs),
        ("tolerance.rel", config.tolerance.rel),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(ValidationError::InvalidValue {
                field: field.to_string(),
                value: value.to_string(),
                reason: "must be finite and non-negative".to_string(),
            });
        }
    }

    let mut region_names = HashSet::new();
    for region in &config.regions {
        if !region_names.insert(&region.name) {
            return Err(ValidationError::DuplicateId {
                id: region.name.clone(),
                context: "regions".to_string(),
            });
        }
        if region.subregions.contains(&region.name) {
            return Err(ValidationError::InvalidValue {
                field: format!("regions.{}.subregions", region.name),
                value: region.name.clone(),
                reason: "a region cannot be its own subregion".to_string(),
            });
        }
    }

    let mut job_ids = HashSet::new();
    for job in &config.jobs {
        if !job_ids.insert(&job.id) {
            return Err(ValidationError::DuplicateId {
                id: job.id.clone(),
                context: "jobs".to_string(),
            });
        }
        if let JobKindDef::Variable { recursive, .. } = &job.kind {
            if recursive.token().is_none() {
                return Err(ValidationError::InvalidValue {
                    field: format!("jobs.{}.recursive", job.id),
                    value: format!("{recursive:?}"),
                    reason: "expected true, false or \"skip-validate\"".to_string(),
                });
            }
        }
        if job.append && (job.check || matches!(job.kind, JobKindDef::Consistency { .. })) {
            return Err(ValidationError::InvalidValue {
                field: format!("jobs.{}.append", job.id),
                value: "true".to_string(),
                reason: "checks produce no records to append".to_string(),
            });
        }
    }

    Ok(())
}
