use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::charset::Charset;
use crate::dialect::Dialect;

pub const CONFIG_FILE_NAME: &str = "sassafras.toml";

/// Settings read from `sassafras.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Used when a file has neither a byte order mark nor `@charset`.
    #[serde(default)]
    pub charset: Option<Charset>,

    /// Extra file extension to dialect mappings, e.g. `pcss = "css"`.
    #[serde(default)]
    pub dialects: BTreeMap<String, Dialect>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration: {message}")]
    Parse { message: String },
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse { message: e.to_string() })
    }

    /// Looks for `sassafras.toml` in `dir` and its ancestors.
    pub fn discover(dir: &Path) -> Result<Option<Self>, ConfigError> {
        for ancestor in dir.ancestors() {
            let candidate = ancestor.join(CONFIG_FILE_NAME);
            if candidate.is_file() {
                tracing::debug!(path = %candidate.display(), "using configuration");
                return Self::from_file(&candidate).map(Some);
            }
        }
        Ok(None)
    }

    /// The dialect of `path`: configured extensions first, then the built-in ones.
    pub fn dialect_for(&self, path: &Path) -> Option<Dialect> {
        let extension = path.extension()?.to_str()?;
        self.dialects
            .get(&extension.to_ascii_lowercase())
            .copied()
            .or_else(|| Dialect::from_extension(extension))
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{Config, ConfigError};
    use crate::charset::Charset;
    use crate::dialect::Dialect;

    #[test]
    fn parse_full_config() {
        let config = Config::parse("charset = \"latin1\"\n[dialects]\npcss = \"css\"\nsss = \"scss\"\n").unwrap();
        assert_eq!(config.charset, Some(Charset::Iso8859_1));
        assert_eq!(config.dialect_for(Path::new("a/b.pcss")), Some(Dialect::Css));
        assert_eq!(config.dialect_for(Path::new("b.SSS")), Some(Dialect::Scss));
        assert_eq!(config.dialect_for(Path::new("c.less")), Some(Dialect::Less));
        assert_eq!(config.dialect_for(Path::new("d.txt")), None);
    }

    #[test]
    fn empty_config_is_default() {
        assert_eq!(Config::parse("").unwrap(), Config::default());
    }

    #[test]
    fn invalid_config() {
        assert!(matches!(Config::parse("charset = \"ebcdic\""), Err(ConfigError::Parse { .. })));
        assert!(matches!(Config::parse("[dialects]\npcss = \"sass\""), Err(ConfigError::Parse { .. })));
        assert!(matches!(Config::parse("colour = 1"), Err(ConfigError::Parse { .. })));
    }
}
