use thiserror::Error;

use crate::store::StoreError;

/// Custom error types for the data quality engine
#[derive(Error, Debug)]
pub enum DataQualityError {
    #[error("Failed to fetch {entity}: {message}")]
    Fetch { entity: String, message: String },

    #[error("Failed to decode {entity} row: {message}")]
    Decode { entity: String, message: String },

    #[error("Remediation failed for issue '{key}': {message}")]
    Remediation { key: String, message: String },

    #[error("Entity snapshots not loaded")]
    NotLoaded,

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type DataQualityResult<T> = Result<T, DataQualityError>;

impl DataQualityError {
    /// Create a user-friendly error message for display in the frontend
    pub fn user_message(&self) -> String {
        match self {
            DataQualityError::Fetch { entity, .. } => {
                format!("Could not load {} from the database. The quality checks were not run.", entity)
            }
            DataQualityError::Decode { entity, .. } => {
                format!("The {} data returned by the database was malformed.", entity)
            }
            DataQualityError::Remediation { message, .. } => {
                format!("The fix could not be saved: {}", message)
            }
            DataQualityError::NotLoaded => {
                "Catalog data has not finished loading yet.".to_string()
            }
            DataQualityError::Store(e) => {
                format!("Database operation failed: {}", e)
            }
        }
    }
}

impl From<DataQualityError> for String {
    fn from(error: DataQualityError) -> Self {
        error.user_message()
    }
}
