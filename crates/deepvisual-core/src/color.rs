use crate::error::{Error, Result};

/// Named colors accepted anywhere a color option is configured.
pub const NAMED_COLORS: &[&str] = &[
    "black",
    "red",
    "green",
    "yellow",
    "orange",
    "gray",
    "lightblue",
    "brown",
    "blue",
    "white",
    "purple",
    "pink",
    "olive",
    "cyan",
];

pub fn is_hex_color(value: &str) -> bool {
    let Some(digits) = value.strip_prefix('#') else {
        return false;
    };
    matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit())
}

pub fn is_valid_color(value: &str) -> bool {
    NAMED_COLORS.contains(&value) || is_hex_color(value)
}

pub fn validate_color(option: &str, value: &str) -> Result<()> {
    if is_valid_color(value) {
        return Ok(());
    }
    Err(Error::InvalidColor {
        option: option.to_string(),
        value: value.to_string(),
        permissible: NAMED_COLORS.join(", "),
    })
}
