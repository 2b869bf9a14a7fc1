use thiserror::Error;

#[derive(Error, Debug)]
pub enum TakeonError {
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[cfg(feature = "pdf")]
    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("Unknown complex: {0}")]
    UnknownComplex(String),

    #[error("No task '{task}' on the checklist for {complex}")]
    UnknownTask { complex: String, task: String },

    #[error("Unknown master task: {0}")]
    UnknownMasterTask(String),

    #[error("Unknown complex type: {0} (expected 'Body Corporate' or 'HOA')")]
    UnknownComplexType(String),

    #[error("Invalid date '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("Settings error: {0}")]
    Settings(String),
}

pub type Result<T> = std::result::Result<T, TakeonError>;
