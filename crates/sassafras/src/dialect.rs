use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The stylesheet language a source is parsed as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    Css,
    Scss,
    Less,
}

impl Dialect {
    pub const ALL: [Dialect; 3] = [Dialect::Css, Dialect::Scss, Dialect::Less];

    pub fn name(self) -> &'static str {
        match self {
            Dialect::Css => "css",
            Dialect::Scss => "scss",
            Dialect::Less => "less",
        }
    }

    pub fn from_extension(extension: &str) -> Option<Self> {
        extension.parse().ok()
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()?.to_str().and_then(Self::from_extension)
    }

    /// SCSS and Less accept `//` comments, nesting with `&`, and arithmetic.
    pub fn is_preprocessor(self) -> bool {
        self != Dialect::Css
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown dialect `{0}`, expected one of css, scss, less")]
pub struct UnknownDialect(pub String);

impl FromStr for Dialect {
    type Err = UnknownDialect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "css" => Ok(Dialect::Css),
            "scss" => Ok(Dialect::Scss),
            "less" => Ok(Dialect::Less),
            _ => Err(UnknownDialect(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::Dialect;

    #[test]
    fn from_str_is_case_insensitive() {
        assert_eq!("SCSS".parse::<Dialect>(), Ok(Dialect::Scss));
        assert_eq!("less".parse::<Dialect>(), Ok(Dialect::Less));
        assert!("sass".parse::<Dialect>().is_err());
    }

    #[test]
    fn from_path() {
        assert_eq!(Dialect::from_path(Path::new("a/b/site.css")), Some(Dialect::Css));
        assert_eq!(Dialect::from_path(Path::new("theme.less")), Some(Dialect::Less));
        assert_eq!(Dialect::from_path(Path::new("README")), None);
    }
}
