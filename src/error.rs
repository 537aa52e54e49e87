use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The scoring endpoint answered with anything other than 200.
    #[error("Error {status}: {body}")]
    RemoteCall { status: u16, body: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response structure: {0}")]
    MalformedResponse(String),

    #[error("column {column} is missing in {table}")]
    MissingColumn { column: String, table: String },

    #[error("tables differ in length: {left} vs {right} rows")]
    LengthMismatch { left: usize, right: usize },

    #[error("company {company} has {available} rows, {requested} requested")]
    InsufficientRows {
        company: String,
        requested: usize,
        available: usize,
    },

    #[error("{count} duplicate composite keys in {table}")]
    DuplicateKeys { table: String, count: usize },

    #[error("invalid value: {0}")]
    InvalidValue(String),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn missing_column(column: impl Into<String>, table: impl Into<String>) -> Self {
        Self::MissingColumn {
            column: column.into(),
            table: table.into(),
        }
    }
}
