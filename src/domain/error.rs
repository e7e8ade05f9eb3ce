//! Domain error types.

use chrono::NaiveDate;

/// Top-level error type for stockfactor.
#[derive(Debug, thiserror::Error)]
pub enum FactorError {
    #[error("csv error in {file} line {line}: {reason}")]
    Csv {
        file: String,
        line: u64,
        reason: String,
    },

    #[error("invalid date in {file} line {line}: {value:?} (expected YYYY-MM-DD)")]
    InvalidDate {
        file: String,
        line: u64,
        value: String,
    },

    #[error("duplicate record for {code} on {date}")]
    DuplicateRecord { code: String, date: NaiveDate },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("unknown factor: {0}")]
    UnknownFactor(String),

    #[error("factor {factor}: pnl table has no group {label}")]
    MissingGroup { factor: String, label: String },

    #[error("factor {factor}: missing {table} table")]
    MissingTable { factor: String, table: String },

    #[error("invalid group table: {reason}")]
    InvalidTable { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&FactorError> for std::process::ExitCode {
    fn from(err: &FactorError) -> Self {
        let code: u8 = match err {
            FactorError::Io(_) => 1,
            FactorError::ConfigParse { .. }
            | FactorError::ConfigInvalid { .. }
            | FactorError::UnknownFactor(_) => 2,
            FactorError::Csv { .. }
            | FactorError::InvalidDate { .. }
            | FactorError::DuplicateRecord { .. } => 3,
            FactorError::MissingGroup { .. }
            | FactorError::MissingTable { .. }
            | FactorError::InvalidTable { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
