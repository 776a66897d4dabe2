use thiserror::Error;

pub type Result<T> = std::result::Result<T, RegDashError>;

/// Errors surfaced by the core.
///
/// Validation variants are caller mistakes and map to "bad request" at the
/// edges; `Database` is fatal for the current request.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegDashError {
    #[error("window offset {offset} out of range (expected 0..={max})")]
    InvalidWindow { offset: u32, max: u32 },

    #[error("invalid window bounds: {detail}")]
    InvalidBounds { detail: String },

    #[error("record #{index}{}: {field}: {detail}", request_id_suffix(.request_id))]
    InvalidRecord {
        index: usize,
        request_id: Option<String>,
        field: String,
        detail: String,
    },

    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Database error: {0}")]
    Database(String),
}

fn request_id_suffix(request_id: &Option<String>) -> String {
    match request_id {
        Some(id) => format!(" (request_id={id})"),
        None => String::new(),
    }
}

impl RegDashError {
    pub fn invalid_record(
        index: usize,
        request_id: Option<&str>,
        field: &str,
        detail: impl Into<String>,
    ) -> Self {
        Self::InvalidRecord {
            index,
            request_id: request_id.map(str::to_string),
            field: field.to_string(),
            detail: detail.into(),
        }
    }

    /// True for errors caused by caller input rather than the store.
    pub fn is_validation(&self) -> bool {
        !matches!(self, Self::Database(_))
    }
}

impl From<rusqlite::Error> for RegDashError {
    fn from(e: rusqlite::Error) -> Self {
        RegDashError::Database(e.to_string())
    }
}
