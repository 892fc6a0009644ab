use thiserror::Error;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Failures reported by a store, classified by the constraint that fired.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("duplicate entry: {0}")]
    UniqueViolation(String),
    #[error("referenced entry missing or still in use: {0}")]
    ForeignKeyViolation(String),
    #[error("constraint violated: {0}")]
    ConstraintViolation(String),
    #[error("row {index} rejected ({kept} earlier rows kept): {source}")]
    BatchRow {
        index: usize,
        kept: usize,
        #[source]
        source: Box<StoreError>,
    },
    #[error("database operation failed: {0}")]
    Database(#[source] sqlx::Error),
    #[error("migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl StoreError {
    pub fn batch_row(index: usize, kept: usize, source: StoreError) -> Self {
        StoreError::BatchRow {
            index,
            kept,
            source: Box::new(source),
        }
    }

    /// Error the failing row itself produced, looking through batch wrappers
    pub fn root(&self) -> &StoreError {
        match self {
            StoreError::BatchRow { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Map a SQLSTATE code to a constraint class. Class 23 is "integrity
/// constraint violation" in PostgreSQL.
pub(crate) fn classify_sqlstate(code: &str, message: String) -> Option<StoreError> {
    match code {
        "23505" => Some(StoreError::UniqueViolation(message)),
        "23503" => Some(StoreError::ForeignKeyViolation(message)),
        _ if code.starts_with("23") => Some(StoreError::ConstraintViolation(message)),
        _ => None,
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_error) = &error {
            if let Some(code) = db_error.code() {
                if let Some(classified) = classify_sqlstate(&code, db_error.message().to_string()) {
                    return classified;
                }
            }
        }
        StoreError::Database(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlstate_classification() {
        assert!(matches!(
            classify_sqlstate("23505", "dup".into()),
            Some(StoreError::UniqueViolation(_))
        ));
        assert!(matches!(
            classify_sqlstate("23503", "fk".into()),
            Some(StoreError::ForeignKeyViolation(_))
        ));
        assert!(matches!(
            classify_sqlstate("23502", "not null".into()),
            Some(StoreError::ConstraintViolation(_))
        ));
        assert!(classify_sqlstate("42P01", "no table".into()).is_none());
    }

    #[test]
    fn test_unclassified_sqlx_errors_stay_database_errors() {
        let error = StoreError::from(sqlx::Error::RowNotFound);
        assert!(matches!(error, StoreError::Database(_)));
    }

    #[test]
    fn test_batch_row_names_the_failing_row() {
        let error = StoreError::batch_row(2, 0, StoreError::UniqueViolation("x".into()));
        assert_eq!(
            error.to_string(),
            "row 2 rejected (0 earlier rows kept): duplicate entry: x"
        );
        assert!(matches!(error.root(), StoreError::UniqueViolation(_)));
    }
}
