use std::path::PathBuf;

/// Environment variable that relocates the config directory
pub const HOME_ENV: &str = "TICKETDESK_HOME";

/// Returns the directory holding `config.yaml` and `session.yaml`.
///
/// `TICKETDESK_HOME` wins; otherwise the platform config directory, falling
/// back to `.ticketdesk` in the working directory when none can be determined.
pub fn desk_home() -> PathBuf {
    if let Ok(root) = std::env::var(HOME_ENV)
        && !root.is_empty()
    {
        return PathBuf::from(root);
    }

    directories::ProjectDirs::from("com", "ticketdesk", "ticketdesk")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".ticketdesk"))
}

pub fn config_path() -> PathBuf {
    desk_home().join("config.yaml")
}

pub fn session_path() -> PathBuf {
    desk_home().join("session.yaml")
}
