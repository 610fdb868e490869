use std::path::PathBuf;

use thiserror::Error;

/// Errors raised before any output is produced
#[derive(Debug, Error)]
pub enum Error {
    #[error("file does not exist: {}", .0.display())]
    NotFound(PathBuf),

    #[error("path is a directory: {}", .0.display())]
    IsDirectory(PathBuf),

    #[error("failed to read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: not valid UTF-8 text (invalid byte at offset {offset})", .path.display())]
    Decode { path: PathBuf, offset: usize },

    #[error("{}: binary file", .path.display())]
    Binary { path: PathBuf },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Rejected option values
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("width {width} is too narrow, need at least {min} columns")]
    WidthTooNarrow { width: usize, min: usize },

    #[error("tab width {width} is larger than {max}")]
    TabWidthTooLarge { width: usize, max: usize },

    #[error("similarity threshold {0} must be between 0 and 1")]
    InvalidThreshold(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_path() {
        let err = Error::NotFound(PathBuf::from("missing.txt"));
        assert_eq!(err.to_string(), "file does not exist: missing.txt");

        let err = Error::Decode {
            path: PathBuf::from("latin1.txt"),
            offset: 7,
        };
        assert_eq!(
            err.to_string(),
            "latin1.txt: not valid UTF-8 text (invalid byte at offset 7)"
        );
    }

    #[test]
    fn config_error_is_transparent() {
        let err = Error::from(ConfigError::WidthTooNarrow { width: 3, min: 5 });
        assert_eq!(err.to_string(), "width 3 is too narrow, need at least 5 columns");
    }
}
