use hms_database::DatabaseError;
use thiserror::Error;
use validator::ValidationErrors;

pub type Result<T> = std::result::Result<T, ServiceError>;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Hotel settings missing for {0}")]
    HotelNotConfigured(String),

    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl ServiceError {
    /// Map a repository failure. Driver details are only kept when `detailed`.
    pub fn from_database(err: DatabaseError, detailed: bool) -> Self {
        match err {
            DatabaseError::NotFound(msg) => Self::NotFound(msg),
            DatabaseError::DuplicateEntry(msg)
            | DatabaseError::ConstraintViolation(msg)
            | DatabaseError::InvalidInput(msg) => Self::InvalidInput(msg),
            other => {
                tracing::error!("Database operation failed: {}", other);
                if detailed {
                    Self::Persistence(other.to_string())
                } else {
                    Self::Persistence("database operation failed".to_string())
                }
            }
        }
    }

    pub fn validation(errors: ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let codes: Vec<String> = errs.iter().map(|e| e.code.to_string()).collect();
                format!("{} ({})", field, codes.join(", "))
            })
            .collect();
        fields.sort();
        Self::InvalidInput(format!("invalid fields: {}", fields.join("; ")))
    }
}
