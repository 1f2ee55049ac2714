//! Binary file detection for chart trees.

use std::path::Path;

/// Extensions that are always treated as binary, regardless of content.
const BINARY_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "ico", "bmp", "webp", "pdf", "zip", "gz", "tgz", "tar", "jar",
    "woff", "woff2", "ttf", "otf", "eot", "so", "dll", "exe", "bin", "class",
];

/// Leading byte sequences of common binary formats.
const MAGIC_PREFIXES: &[&[u8]] = &[
    &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A], // PNG
    &[0xFF, 0xD8, 0xFF],                               // JPEG
    b"GIF8",                                           // GIF87a / GIF89a
    b"%PDF",                                           // PDF
    &[0x50, 0x4B, 0x03, 0x04],                         // ZIP, JAR
    &[0x1F, 0x8B],                                     // gzip, tgz
    &[0x7F, 0x45, 0x4C, 0x46],                         // ELF
];

/// Whether a chart file must be copied verbatim instead of templated.
///
/// A file is binary when its extension is a known binary extension, when its
/// content starts with a known magic sequence, or when the content contains a
/// NUL byte or is not valid UTF-8.
///
/// ```rust
/// use helmkit::product::is_binary;
/// use std::path::Path;
///
/// assert!(is_binary(Path::new("icon.png"), b"@{not_scanned}"));
/// assert!(!is_binary(Path::new("values.yaml"), b"tag: '@{tag}'"));
/// ```
pub fn is_binary(path: &Path, content: &[u8]) -> bool {
    let by_extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| BINARY_EXTENSIONS.iter().any(|known| known.eq_ignore_ascii_case(ext)));

    by_extension
        || MAGIC_PREFIXES.iter().any(|magic| content.starts_with(magic))
        || content.contains(&0)
        || std::str::from_utf8(content).is_err()
}
