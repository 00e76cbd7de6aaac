use thiserror::Error;

#[derive(Error, Debug)]
pub enum DaemonError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Failed to write configuration: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("No configuration directory found (set HIDLINK_CONFIG or HOME)")]
    ConfigDirNotFound,

    #[error("HCI error: {0}")]
    Hci(#[from] hidlink::HciError),

    #[error(transparent)]
    Link(#[from] hidlink::Error),
}

pub type Result<T> = std::result::Result<T, DaemonError>;
