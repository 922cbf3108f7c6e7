//! Conversions from external infrastructure errors into domain errors.

use meetsync_domain::SyncError;
use reqwest::Error as HttpError;
use rusqlite::Error as SqlError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub SyncError);

impl From<InfraError> for SyncError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<SyncError> for InfraError {
    fn from(value: SyncError) -> Self {
        InfraError(value)
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        use rusqlite::ffi::ErrorCode;

        let err = match value {
            SqlError::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match err.code {
                    ErrorCode::DatabaseBusy => SyncError::Database("database is busy".into()),
                    ErrorCode::DatabaseLocked => SyncError::Database("database is locked".into()),
                    ErrorCode::ConstraintViolation => SyncError::Database(format!(
                        "constraint violation (code {}): {message}",
                        err.extended_code
                    )),
                    _ => SyncError::Database(format!(
                        "sqlite failure {:?} (code {}): {message}",
                        err.code, err.extended_code
                    )),
                }
            }
            SqlError::QueryReturnedNoRows => {
                SyncError::NotFound("no rows returned by query".into())
            }
            SqlError::FromSqlConversionFailure(_, _, cause) => {
                SyncError::Database(format!("failed to convert sqlite value: {cause}"))
            }
            SqlError::InvalidColumnType(_, _, ty) => {
                SyncError::Database(format!("invalid column type: {ty}"))
            }
            SqlError::InvalidQuery => SyncError::Database("invalid SQL query".into()),
            other => SyncError::Database(other.to_string()),
        };
        InfraError(err)
    }
}

impl From<r2d2::Error> for InfraError {
    fn from(value: r2d2::Error) -> Self {
        InfraError(SyncError::Database(format!("pool error: {value}")))
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        let err = if value.is_timeout() {
            SyncError::Network(format!("request timed out: {value}"))
        } else if value.is_connect() {
            SyncError::Network(format!("connection failed: {value}"))
        } else if value.is_builder() || value.is_request() {
            SyncError::Internal(format!("invalid request: {value}"))
        } else if value.is_decode() {
            SyncError::Internal(format!("failed to decode response: {value}"))
        } else {
            SyncError::Network(value.to_string())
        };
        InfraError(err)
    }
}

impl From<serde_json::Error> for InfraError {
    fn from(value: serde_json::Error) -> Self {
        InfraError(SyncError::Internal(format!("serialization failure: {value}")))
    }
}
