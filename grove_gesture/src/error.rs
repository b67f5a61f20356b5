use std::fmt;

#[derive(Debug)]
pub enum Error {
    /// The visualizer window could not be created.
    Window(String),
    /// The hand-tracking source failed to start or died.
    Inference(String),
    Audio(String),
    IO(std::io::Error, Option<String>),
    Json(serde_json::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Window(msg)          => write!(f, "window: {}", msg),
            Error::Inference(msg)       => write!(f, "inference: {}", msg),
            Error::Audio(msg)           => write!(f, "audio: {}", msg),
            Error::IO(e, Some(path))    => write!(f, "{}: {}", path, e),
            Error::IO(e, None)          => write!(f, "{}", e),
            Error::Json(e)              => write!(f, "config: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IO(e, _) => Some(e),
            Error::Json(e)  => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::IO(e, None)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
