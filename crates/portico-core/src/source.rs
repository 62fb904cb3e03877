use std::path::{Path, PathBuf};

use toml::{Table, Value};

/// Default source document name, looked up in the working directory.
pub const DEFAULT_SOURCE: &str = "services.toml";

/// The parsed `services.toml`: raw service entries in declaration order.
#[derive(Debug, Clone, Default)]
pub struct ServicesFile {
    pub path: PathBuf,
    pub entries: Vec<(String, Table)>,
}

impl ServicesFile {
    /// Read and parse the source document.
    pub fn load(path: &Path) -> crate::Result<Self> {
        if !path.exists() {
            return Err(crate::Error::SourceNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path).map_err(|e| crate::Error::SourceRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let table: Table = toml::from_str(&content).map_err(|e| crate::Error::SourceParse {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut file = Self::from_table(table)?;
        file.path = path.to_path_buf();
        tracing::debug!(
            path = %path.display(),
            services = file.entries.len(),
            "loaded services file"
        );
        Ok(file)
    }

    /// Split a parsed document into its service entries.
    pub fn from_table(table: Table) -> crate::Result<Self> {
        let entries = table
            .into_iter()
            .map(|(name, value)| match value {
                Value::Table(entry) => Ok((name, entry)),
                _ => Err(crate::Error::InvalidServiceEntry { name }),
            })
            .collect::<crate::Result<Vec<_>>>()?;
        Ok(Self {
            path: PathBuf::new(),
            entries,
        })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }
}
