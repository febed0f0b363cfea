use serde::{Deserialize, Serialize};

/// The standard project colors offered by the color picker, in display order.
pub const DEFAULT_PALETTE: &[&str] = &[
    "#0b83d9", "#9e5bd9", "#d94182", "#e36a00", "#bf7000", "#c7af14", "#d92b2b", "#2da608",
    "#06a893", "#c9806b", "#465bb3", "#990099", "#566614", "#525266",
];

/// A project color, always stored as a lower-case `#rrggbb` string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProjectColor {
    hex: String,
}

impl ProjectColor {
    /// Parse a `#rrggbb` (or `rrggbb`) hex string.
    pub fn parse(hex: &str) -> Result<Self, String> {
        let trimmed = hex.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("Invalid project color '{}'", hex));
        }
        Ok(ProjectColor {
            hex: format!("#{}", digits.to_ascii_lowercase()),
        })
    }

    pub fn hex(&self) -> &str {
        &self.hex
    }

    /// Red, green and blue components.
    pub fn rgb(&self) -> (u8, u8, u8) {
        let channel = |i: usize| u8::from_str_radix(&self.hex[i..i + 2], 16).unwrap_or(0);
        (channel(1), channel(3), channel(5))
    }
}

impl Default for ProjectColor {
    fn default() -> Self {
        ProjectColor {
            hex: DEFAULT_PALETTE[0].to_string(),
        }
    }
}

impl TryFrom<String> for ProjectColor {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ProjectColor::parse(&value)
    }
}

impl From<ProjectColor> for String {
    fn from(color: ProjectColor) -> Self {
        color.hex
    }
}

/// Parse a list of hex strings, skipping (and logging) malformed entries.
pub fn parse_palette(entries: &[String]) -> Vec<ProjectColor> {
    entries
        .iter()
        .filter_map(|entry| match ProjectColor::parse(entry) {
            Ok(color) => Some(color),
            Err(e) => {
                log::warn!("Skipping palette entry: {}", e);
                None
            }
        })
        .collect()
}

pub fn default_palette() -> Vec<ProjectColor> {
    DEFAULT_PALETTE
        .iter()
        .filter_map(|hex| ProjectColor::parse(hex).ok())
        .collect()
}
