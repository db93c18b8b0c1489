use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("duplicate student id {0}")]
    DuplicateId(String),
    #[error("student {id} is missing a {field}")]
    EmptyName { id: String, field: &'static str },
    #[error("unknown grade level {0:?}")]
    UnknownGradeLevel(String),
    #[error("malformed grade entry {0:?}, expected Subject:score:letter")]
    MalformedGrade(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatsError {
    #[error("cannot aggregate an empty roster")]
    EmptyRoster,
}

#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("API key not configured")]
    MissingApiKey,
    #[error("text generation request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("text generation service returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("unreadable text generation response: {0}")]
    Decode(String),
}
