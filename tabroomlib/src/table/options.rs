//! Per-column settings and table-wide decoration options.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::TableError;

/// Horizontal alignment of a column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    /// Column flushed left
    #[default]
    Left,
    /// Column centered
    Center,
    /// Column flushed right
    Right,
}

impl FromStr for Align {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "l" | "left" => Ok(Align::Left),
            "c" | "center" | "centre" => Ok(Align::Center),
            "r" | "right" => Ok(Align::Right),
            other => Err(TableError::InvalidCode {
                kind: "alignment",
                value: other.to_string(),
            }),
        }
    }
}

/// Vertical alignment of a column within a multi-line row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VAlign {
    /// Cell sits on the top; padding goes below
    #[default]
    Top,
    /// Padding split above and below, the odd line going below
    Middle,
    /// Cell sits on the bottom; padding goes above
    Bottom,
}

impl FromStr for VAlign {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "t" | "top" => Ok(VAlign::Top),
            "m" | "middle" => Ok(VAlign::Middle),
            "b" | "bottom" => Ok(VAlign::Bottom),
            other => Err(TableError::InvalidCode {
                kind: "vertical alignment",
                value: other.to_string(),
            }),
        }
    }
}

/// Datatype hint controlling how numeric cells are formatted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dtype {
    /// Integer when integral, fixed-point otherwise, exponential above 1e8
    #[default]
    Auto,
    /// Raw text, never reformatted
    Text,
    /// Fixed-point with `precision` decimals
    Float,
    /// Scientific notation with `precision` mantissa decimals
    Exponential,
    /// Rounded to the nearest integer
    Integer,
}

impl FromStr for Dtype {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "a" | "auto" => Ok(Dtype::Auto),
            "t" | "text" => Ok(Dtype::Text),
            "f" | "float" => Ok(Dtype::Float),
            "e" | "exp" | "exponential" => Ok(Dtype::Exponential),
            "i" | "int" | "integer" => Ok(Dtype::Integer),
            other => Err(TableError::InvalidCode {
                kind: "datatype",
                value: other.to_string(),
            }),
        }
    }
}

/// How the width of a visible character is counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharWidth {
    /// Terminal display columns: East Asian wide characters count 2,
    /// combining marks count 0
    #[default]
    Unicode,
    /// Every character counts 1
    Narrow,
}

/// Which border and separator lines are drawn.
///
/// All four are enabled by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decorations {
    /// Border around the table
    pub border: bool,
    /// Line below the header
    pub header: bool,
    /// Lines between rows
    pub hlines: bool,
    /// Lines between columns
    pub vlines: bool,
}

impl Default for Decorations {
    fn default() -> Self {
        Self::all()
    }
}

impl Decorations {
    /// Every line enabled
    pub fn all() -> Self {
        Self {
            border: true,
            header: true,
            hlines: true,
            vlines: true,
        }
    }

    /// No lines at all (for building up)
    pub fn none() -> Self {
        Self {
            border: false,
            header: false,
            hlines: false,
            vlines: false,
        }
    }

    /// Builder: enable the outer border
    pub fn with_border(mut self) -> Self {
        self.border = true;
        self
    }

    /// Builder: enable the header separator
    pub fn with_header(mut self) -> Self {
        self.header = true;
        self
    }

    /// Builder: enable separators between rows
    pub fn with_hlines(mut self) -> Self {
        self.hlines = true;
        self
    }

    /// Builder: enable separators between columns
    pub fn with_vlines(mut self) -> Self {
        self.vlines = true;
        self
    }
}

impl FromStr for Decorations {
    type Err = TableError;

    /// Parse a comma-separated list such as `border,header`, or `none`/`all`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut deco = Decorations::none();
        for part in s.split(',').map(|p| p.trim().to_lowercase()) {
            match part.as_str() {
                "" | "none" => {}
                "all" => deco = Decorations::all(),
                "border" => deco.border = true,
                "header" => deco.header = true,
                "hlines" => deco.hlines = true,
                "vlines" => deco.vlines = true,
                other => {
                    return Err(TableError::InvalidCode {
                        kind: "decoration",
                        value: other.to_string(),
                    })
                }
            }
        }
        Ok(deco)
    }
}

/// Characters used to draw table lines.
///
/// Each slot holds at most one character; an empty slot draws nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorderChars {
    pub horizontal: String,
    pub vertical: String,
    pub corner: String,
    pub header: String,
}

impl Default for BorderChars {
    fn default() -> Self {
        Self {
            horizontal: "-".to_string(),
            vertical: "|".to_string(),
            corner: "+".to_string(),
            header: "=".to_string(),
        }
    }
}

impl BorderChars {
    /// Build from `[horizontal, vertical, corner, header]`.
    ///
    /// Only the first character of each entry is kept.
    pub fn from_slice<S: AsRef<str>>(chars: &[S]) -> Result<Self, TableError> {
        if chars.len() != 4 {
            return Err(TableError::Sizing {
                expected: 4,
                found: chars.len(),
            });
        }
        let first = |s: &S| s.as_ref().chars().take(1).collect::<String>();
        Ok(Self {
            horizontal: first(&chars[0]),
            vertical: first(&chars[1]),
            corner: first(&chars[2]),
            header: first(&chars[3]),
        })
    }
}

/// Parse a comma-separated list of codes (`l,c,r`) into column settings.
pub fn parse_list<T: FromStr<Err = TableError>>(s: &str) -> Result<Vec<T>, TableError> {
    s.split(',').map(str::parse).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_codes() {
        assert_eq!("l".parse::<Align>().unwrap(), Align::Left);
        assert_eq!("C".parse::<Align>().unwrap(), Align::Center);
        assert_eq!("right".parse::<Align>().unwrap(), Align::Right);
        assert_eq!("m".parse::<VAlign>().unwrap(), VAlign::Middle);
        assert_eq!("e".parse::<Dtype>().unwrap(), Dtype::Exponential);
        assert_eq!("i".parse::<Dtype>().unwrap(), Dtype::Integer);
    }

    #[test]
    fn test_parse_invalid_code() {
        let err = "x".parse::<Align>().unwrap_err();
        assert!(!err.is_sizing());
        assert!(err.to_string().contains("alignment"));
    }

    #[test]
    fn test_parse_list() {
        let aligns: Vec<Align> = parse_list("l,l,c,c").unwrap();
        assert_eq!(
            aligns,
            vec![Align::Left, Align::Left, Align::Center, Align::Center]
        );
        assert!(parse_list::<VAlign>("t,q").is_err());
    }

    #[test]
    fn test_decorations_parse() {
        assert_eq!("none".parse::<Decorations>().unwrap(), Decorations::none());
        assert_eq!("all".parse::<Decorations>().unwrap(), Decorations::all());
        let deco: Decorations = "border,header".parse().unwrap();
        assert_eq!(deco, Decorations::none().with_border().with_header());
    }

    #[test]
    fn test_border_chars_from_slice() {
        let chars = BorderChars::from_slice(&["~~", "!", "*", "#"]).unwrap();
        assert_eq!(chars.horizontal, "~");
        assert_eq!(chars.vertical, "!");
        assert_eq!(chars.corner, "*");
        assert_eq!(chars.header, "#");
    }

    #[test]
    fn test_border_chars_wrong_length() {
        let err = BorderChars::from_slice(&["-", "|", "+"]).unwrap_err();
        assert_eq!(
            err,
            TableError::Sizing {
                expected: 4,
                found: 3
            }
        );
    }
}
