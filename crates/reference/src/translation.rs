use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use crate::error::{Error, ErrorKind, Result};

/// An edition code understood by the remote source (`NIV`, `KJV`, `NIVUK`, ...).
///
/// Codes are opaque: anything non-empty is passed through, and unknown codes
/// only fail once the source rejects them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct Translation(String);
impl Translation {
    pub fn new(code: impl AsRef<str>) -> Result<Self> {
        let code = code.as_ref().trim();
        if code.is_empty() {
            exn::bail!(ErrorKind::EmptyTranslation);
        }
        Ok(Self(code.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
impl FromStr for Translation {
    type Err = Error;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::new(s)
    }
}
impl TryFrom<String> for Translation {
    type Error = Error;
    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        Self::new(value)
    }
}
impl From<Translation> for String {
    fn from(translation: Translation) -> Self {
        translation.0
    }
}
impl AsRef<str> for Translation {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
impl Display for Translation {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trims_code() {
        assert_eq!(Translation::new(" NIV ").unwrap().as_str(), "NIV");
    }

    #[test]
    fn test_unknown_codes_pass_through() {
        assert_eq!(Translation::new("NOT-A-REAL-ONE").unwrap().to_string(), "NOT-A-REAL-ONE");
    }

    #[test]
    fn test_rejects_empty() {
        let err = Translation::new("  ").unwrap_err();
        assert_eq!(&*err, &ErrorKind::EmptyTranslation);
    }
}
