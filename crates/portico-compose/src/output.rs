use std::io::Write;
use std::path::{Path, PathBuf};

/// Default output file name.
pub const DEFAULT_OUTPUT: &str = "docker-compose.yml";

/// Where the generated compose file goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Stdout,
    File(PathBuf),
}

impl Destination {
    /// `-` means stdout, anything else is a file path.
    pub fn parse(arg: &str) -> Self {
        if arg == "-" {
            Destination::Stdout
        } else {
            Destination::File(PathBuf::from(arg))
        }
    }

    /// True when the destination file exists and was modified after `source`.
    ///
    /// Stdout is never up to date.
    pub fn is_up_to_date(&self, source: &Path) -> Result<bool, OutputError> {
        let Destination::File(path) = self else {
            return Ok(false);
        };
        if !path.exists() {
            return Ok(false);
        }
        Ok(modified(path)? > modified(source)?)
    }

    /// Write the rendered document. File output is written in one piece.
    pub fn write(&self, content: &str) -> Result<(), OutputError> {
        match self {
            Destination::Stdout => {
                let mut stdout = std::io::stdout().lock();
                stdout
                    .write_all(content.as_bytes())
                    .and_then(|()| stdout.flush())
                    .map_err(|e| OutputError::Stdout { source: e })
            }
            Destination::File(path) => {
                std::fs::write(path, content).map_err(|e| OutputError::Write {
                    path: path.clone(),
                    source: e,
                })?;
                tracing::debug!(path = %path.display(), bytes = content.len(), "wrote compose file");
                Ok(())
            }
        }
    }
}

impl std::fmt::Display for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Destination::Stdout => f.write_str("-"),
            Destination::File(path) => write!(f, "{}", path.display()),
        }
    }
}

fn modified(path: &Path) -> Result<std::time::SystemTime, OutputError> {
    std::fs::metadata(path)
        .and_then(|m| m.modified())
        .map_err(|e| OutputError::Metadata {
            path: path.to_path_buf(),
            source: e,
        })
}

#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("failed to read modification time of {path}")]
    Metadata {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write {path}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write to stdout")]
    Stdout { source: std::io::Error },
}
