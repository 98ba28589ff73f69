use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A character encoding a stylesheet can be stored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Charset {
    #[default]
    Utf8,
    Utf16Le,
    Utf16Be,
    Iso8859_1,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported charset `{0}`")]
pub struct UnsupportedCharset(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("input is not valid {0}")]
pub struct DecodeError(pub Charset);

impl Charset {
    pub fn label(self) -> &'static str {
        match self {
            Charset::Utf8 => "utf-8",
            Charset::Utf16Le => "utf-16le",
            Charset::Utf16Be => "utf-16be",
            Charset::Iso8859_1 => "iso-8859-1",
        }
    }

    /// Looks at a byte order mark. Returns the charset and the mark length.
    pub fn sniff_bom(bytes: &[u8]) -> Option<(Charset, usize)> {
        match bytes {
            [0xEF, 0xBB, 0xBF, ..] => Some((Charset::Utf8, 3)),
            [0xFF, 0xFE, ..] => Some((Charset::Utf16Le, 2)),
            [0xFE, 0xFF, ..] => Some((Charset::Utf16Be, 2)),
            _ => None,
        }
    }

    /// Reads `@charset "label";` at the very start of the file. The rule is
    /// ASCII, so this works on the raw bytes of any ASCII-compatible charset.
    pub fn sniff_rule(bytes: &[u8]) -> Option<Result<Charset, UnsupportedCharset>> {
        let rest = bytes.strip_prefix(b"@charset \"")?;
        let end = rest.iter().position(|&b| b == b'"')?;
        if rest.get(end + 1) != Some(&b';') {
            return None;
        }
        let label = std::str::from_utf8(&rest[..end]).ok()?;
        Some(label.parse())
    }

    pub fn decode(self, bytes: &[u8]) -> Result<String, DecodeError> {
        match self {
            Charset::Utf8 => String::from_utf8(bytes.to_vec()).map_err(|_| DecodeError(self)),
            Charset::Utf16Le | Charset::Utf16Be => {
                if bytes.len() % 2 != 0 {
                    return Err(DecodeError(self));
                }
                let units = bytes.chunks_exact(2).map(|pair| {
                    let pair = [pair[0], pair[1]];
                    if self == Charset::Utf16Le {
                        u16::from_le_bytes(pair)
                    } else {
                        u16::from_be_bytes(pair)
                    }
                });
                char::decode_utf16(units)
                    .collect::<Result<String, _>>()
                    .map_err(|_| DecodeError(self))
            }
            Charset::Iso8859_1 => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
        }
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Charset {
    type Err = UnsupportedCharset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" | "unicode-1-1-utf-8" => Ok(Charset::Utf8),
            "utf-16le" | "utf-16" | "utf16le" => Ok(Charset::Utf16Le),
            "utf-16be" | "utf16be" => Ok(Charset::Utf16Be),
            "iso-8859-1" | "iso8859-1" | "latin1" | "l1" | "us-ascii" | "ascii" => Ok(Charset::Iso8859_1),
            _ => Err(UnsupportedCharset(s.to_string())),
        }
    }
}

impl TryFrom<String> for Charset {
    type Error = UnsupportedCharset;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Charset> for String {
    fn from(charset: Charset) -> Self {
        charset.label().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::Charset;

    #[test]
    fn labels_and_aliases() {
        assert_eq!("UTF-8".parse(), Ok(Charset::Utf8));
        assert_eq!("latin1".parse(), Ok(Charset::Iso8859_1));
        assert_eq!("utf-16BE".parse(), Ok(Charset::Utf16Be));
        assert!("shift_jis".parse::<Charset>().is_err());
    }

    #[test]
    fn byte_order_marks() {
        assert_eq!(Charset::sniff_bom(b"\xEF\xBB\xBFa"), Some((Charset::Utf8, 3)));
        assert_eq!(Charset::sniff_bom(b"\xFF\xFEa\0"), Some((Charset::Utf16Le, 2)));
        assert_eq!(Charset::sniff_bom(b"a{}"), None);
    }

    #[test]
    fn charset_rule() {
        assert_eq!(Charset::sniff_rule(b"@charset \"ISO-8859-1\";\na{}"), Some(Ok(Charset::Iso8859_1)));
        assert!(matches!(Charset::sniff_rule(b"@charset \"koi8-r\";"), Some(Err(_))));
        assert_eq!(Charset::sniff_rule(b"@charset 'utf-8';"), None);
        assert_eq!(Charset::sniff_rule(b" @charset \"utf-8\";"), None);
    }

    #[test]
    fn decoding() {
        assert_eq!(Charset::Iso8859_1.decode(b"caf\xE9").as_deref(), Ok("café"));
        assert_eq!(Charset::Utf16Le.decode(b"a\0{\0").as_deref(), Ok("a{"));
        assert_eq!(Charset::Utf16Be.decode(b"\0a\0{").as_deref(), Ok("a{"));
        assert!(Charset::Utf8.decode(b"\xFF").is_err());
        assert!(Charset::Utf16Le.decode(b"a").is_err());
    }
}
