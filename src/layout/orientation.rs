//! Document-level page orientation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Column structure of a document's pages.
///
/// Decided once per document from a representative page and applied to
/// every page. Falls back to [`PageOrientation::SingleColumn`] whenever
/// classification fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageOrientation {
    /// One column, read top to bottom
    #[default]
    SingleColumn,
    /// Two columns, read right column first (RTL scripts)
    DoubleColumn,
}

impl PageOrientation {
    /// Wire/label name of this orientation.
    pub fn as_str(&self) -> &'static str {
        match self {
            PageOrientation::SingleColumn => "single_column",
            PageOrientation::DoubleColumn => "double_column",
        }
    }
}

impl fmt::Display for PageOrientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PageOrientation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single_column" | "single" => Ok(PageOrientation::SingleColumn),
            "double_column" | "double" => Ok(PageOrientation::DoubleColumn),
            other => Err(Error::Classification(format!("unknown page orientation '{}'", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_single_column() {
        assert_eq!(PageOrientation::default(), PageOrientation::SingleColumn);
    }

    #[test]
    fn test_parse_labels() {
        assert_eq!("double_column".parse::<PageOrientation>().unwrap(), PageOrientation::DoubleColumn);
        assert_eq!(" Single_Column ".parse::<PageOrientation>().unwrap(), PageOrientation::SingleColumn);
        assert!("triple_column".parse::<PageOrientation>().is_err());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&PageOrientation::DoubleColumn).unwrap();
        assert_eq!(json, "\"double_column\"");
        let parsed: PageOrientation = serde_json::from_str("\"single_column\"").unwrap();
        assert_eq!(parsed, PageOrientation::SingleColumn);
    }
}
