#[derive(Debug, thiserror::Error)]
pub enum OrganizerError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Upstream service error: {0}")]
    UpstreamService(#[from] reqwest::Error),
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
    #[error("Plan has no 'structure' to execute")]
    MissingStructure,
    #[error("Filesystem error: {0}")]
    Io(#[from] std::io::Error),
}
