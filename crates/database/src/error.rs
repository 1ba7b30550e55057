use thiserror::Error;

pub type Result<T> = std::result::Result<T, DatabaseError>;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Database connection error: {0}")]
    ConnectionError(#[from] sqlx::Error),

    #[error("Invalid connection string: {0}")]
    InvalidConnectionString(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Database error: {0}")]
    Other(String),
}

impl DatabaseError {
    pub fn not_found(entity: &str, id: &str) -> Self {
        Self::NotFound(format!("{} with id {} not found", entity, id))
    }

    pub fn duplicate(entity: &str, field: &str) -> Self {
        Self::DuplicateEntry(format!("{} with {} already exists", entity, field))
    }

    /// Classifies constraint failures raised by INSERT/UPDATE statements
    pub fn from_write(entity: &str, err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return Self::DuplicateEntry(format!(
                    "{} violates unique constraint {}",
                    entity,
                    db_err.constraint().unwrap_or("unknown")
                ));
            }
            if db_err.is_foreign_key_violation() || db_err.is_check_violation() {
                return Self::ConstraintViolation(format!("{}: {}", entity, db_err.message()));
            }
        }
        Self::ConnectionError(err)
    }
}

// Note: From<sqlx::Error> is automatically implemented via #[from] attribute above
