use std::path::Path;

/// Lines above this count make a file "large".
pub const LARGE_FILE_MAX_LINES: usize = 250;
/// Characters above this count make a file "large".
pub const LARGE_FILE_MAX_CHARS: usize = 2500;

/// Binary and media extensions that are never exported, lowercase with the
/// leading dot.
pub const SPECIAL_EXTENSIONS: &[&str] = &[
    ".pdf", ".img", ".svg", ".jpg", ".jpeg", ".png", ".gif", ".bmp", ".tiff", ".tif", ".ico",
    ".webp", ".mp3", ".wav", ".ogg", ".flac", ".aac", ".wma", ".m4a", ".opus", ".mp4", ".mkv",
    ".webm", ".avi", ".mov", ".wmv", ".flv", ".3gp", ".mpg", ".mpeg", ".m4v", ".m2v", ".m2ts",
];

pub fn is_special(path: &Path) -> bool {
    let Some(ext) = path.extension() else {
        return false;
    };
    let ext = format!(".{}", ext.to_string_lossy().to_lowercase());
    SPECIAL_EXTENSIONS.contains(&ext.as_str())
}

/// True when the content has more than [`LARGE_FILE_MAX_LINES`] newline
/// delimited segments or more than [`LARGE_FILE_MAX_CHARS`] characters.
pub fn is_large(content: &str) -> bool {
    line_count(content) > LARGE_FILE_MAX_LINES || content.chars().count() > LARGE_FILE_MAX_CHARS
}

/// Number of `\n`-delimited segments; an empty string is one segment.
pub fn line_count(content: &str) -> usize {
    content.split('\n').count()
}
