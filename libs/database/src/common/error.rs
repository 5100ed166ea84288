/// Failures of the connector, each carrying the driver's message
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Health check failed: {0}")]
    HealthCheckFailed(String),

    #[error("Migration failed: {0}")]
    MigrationError(String),
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_the_failed_step() {
        let err = DatabaseError::MigrationError("relation \"todos\" already exists".into());
        assert_eq!(
            err.to_string(),
            "Migration failed: relation \"todos\" already exists"
        );

        let err = DatabaseError::ConnectionFailed("timed out".into());
        assert_eq!(err.to_string(), "Connection failed: timed out");
    }
}
