use std::path::{Path, PathBuf};

use line_index::LineIndex;
use rowan::TextSize;

use crate::charset::{Charset, DecodeError, UnsupportedCharset};
use crate::diagnostic::Position;
use crate::dialect::Dialect;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    UnsupportedCharset(#[from] UnsupportedCharset),
    #[error("cannot decode input as {charset}")]
    Decode { charset: Charset },
}

impl From<DecodeError> for LoadError {
    fn from(error: DecodeError) -> Self {
        LoadError::Decode { charset: error.0 }
    }
}

/// Decoded stylesheet text together with its line index.
#[derive(Debug)]
pub struct SourceFile {
    path: PathBuf,
    text: String,
    charset: Charset,
    dialect: Dialect,
    line_index: LineIndex,
}

impl SourceFile {
    /// Reads and decodes `path`. A declared charset wins, then a byte order
    /// mark, then a leading `@charset` rule, then UTF-8. Without a declared
    /// dialect it is taken from the extension, defaulting to CSS.
    pub fn load(path: impl AsRef<Path>, charset: Option<Charset>, dialect: Option<Dialect>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| LoadError::Io { path: path.to_path_buf(), source })?;
        let dialect = dialect.or_else(|| Dialect::from_path(path)).unwrap_or(Dialect::Css);
        let mut file = Self::from_bytes(&bytes, charset, dialect)?;
        file.path = path.to_path_buf();
        Ok(file)
    }

    pub fn from_bytes(bytes: &[u8], charset: Option<Charset>, dialect: Dialect) -> Result<Self, LoadError> {
        let (charset, bytes) = match (charset, Charset::sniff_bom(bytes)) {
            (Some(declared), Some((bom, len))) if declared == bom => (declared, &bytes[len..]),
            (Some(declared), _) => (declared, bytes),
            (None, Some((bom, len))) => (bom, &bytes[len..]),
            (None, None) => match Charset::sniff_rule(bytes) {
                Some(rule) => (rule?, bytes),
                None => (Charset::Utf8, bytes),
            },
        };
        let text = charset.decode(bytes)?;
        tracing::debug!(%charset, %dialect, len = text.len(), "decoded source");
        Ok(Self::new(text, charset, dialect))
    }

    pub fn from_text(text: impl Into<String>, dialect: Dialect) -> Self {
        Self::new(text.into(), Charset::Utf8, dialect)
    }

    fn new(text: String, charset: Charset, dialect: Dialect) -> Self {
        let line_index = LineIndex::new(&text);
        Self { path: PathBuf::new(), text, charset, dialect, line_index }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn charset(&self) -> Charset {
        self.charset
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn parse(&self) -> crate::Parse {
        crate::parse(&self.text, self.dialect)
    }

    /// `(line_number, line)` pairs, 1-based, without line terminators.
    /// `\r\n`, `\n` and a lone `\r` each end a line; a final terminator
    /// does not start an empty line.
    pub fn lines(&self) -> impl Iterator<Item = (u32, &str)> + '_ {
        let mut rest = self.text.as_str();
        let mut number = 0;
        std::iter::from_fn(move || {
            if rest.is_empty() {
                return None;
            }
            let end = rest.find(['\n', '\r']).unwrap_or(rest.len());
            let (line, tail) = rest.split_at(end);
            rest = tail
                .strip_prefix("\r\n")
                .or_else(|| tail.strip_prefix(['\n', '\r']))
                .unwrap_or(tail);
            number += 1;
            Some((number, line))
        })
    }

    /// Panics if `offset` is past the end of the text.
    pub fn line_col(&self, offset: TextSize) -> Position {
        self.line_index.line_col(offset).into()
    }
}
