use std::{fmt, path::PathBuf};

/// Everything that can stop the application from starting.
#[derive(Debug)]
pub enum InitError {
    Config(String),
    Logger(log::SetLoggerError),
    /// Window, GL context or function loader setup failed.
    Window(String),
    Shader(String),
    Texture { path: PathBuf, reason: String },
    Mesh(String),
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "Failed to read config: {}", e),
            Self::Logger(e) => write!(f, "Failed to set up logging: {}", e),
            Self::Window(e) => write!(f, "Failed to create window: {}", e),
            Self::Shader(e) => write!(f, "Failed to create shader program: {}", e),
            Self::Texture { path, reason } => {
                write!(f, "Failed to load texture {}: {}", path.display(), reason)
            }
            Self::Mesh(e) => write!(f, "Failed to upload mesh: {}", e),
        }
    }
}

impl std::error::Error for InitError {}
