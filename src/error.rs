use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeskError {
    #[error("ticket '{0}' not found")]
    TicketNotFound(String),

    #[error("invalid filter '{0}', expected one of: all, new, open, closed")]
    InvalidFilter(String),

    #[error("invalid role '{0}', expected 'admin' or 'agent'")]
    InvalidRole(String),

    #[error("cannot {action} ticket '{id}' while it is {status}")]
    TransitionNotOffered {
        id: String,
        action: String,
        status: String,
    },

    #[error("not logged in, run `ticketdesk login <email>` first")]
    NotLoggedIn,

    #[error("this command requires the {0} role")]
    RoleRequired(String),

    #[error("invalid user: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("authentication error: {0}")]
    Auth(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, DeskError>;
