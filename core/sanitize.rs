use once_cell::sync::Lazy;
use regex::Regex;

// Shortest match, `.` spans newlines.
static SVG_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<svg>.*?</svg>").expect("Failed to compile svg block regex"));

/// Strips inline `<svg>...</svg>` blocks. Content without a block is returned
/// as-is.
pub fn sanitize(raw: &str) -> String {
    SVG_BLOCK.replace_all(raw, "").into_owned()
}
