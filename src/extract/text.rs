//! Encoding-tolerant text normalization for indicator matching.
//!
//! The source sometimes serves names as UTF-8 that was decoded as Latin-1
//! (`"País"` arrives as `"PaÃ­s"`). Instead of detecting encodings we fold
//! both spellings onto the same ASCII form.

/// Two-character mojibake sequences, matched after lowercasing.
const MOJIBAKE: [(&str, &str); 6] = [
    ("ã¡", "a"),
    ("ã©", "e"),
    ("ã\u{ad}", "i"),
    ("ã³", "o"),
    ("ãº", "u"),
    ("ã±", "n"),
];

/// Trim, lowercase and strip accents/mojibake to ASCII.
///
/// `None` is treated as the empty string.
pub fn normalize<'a>(text: impl Into<Option<&'a str>>) -> String {
    let mut out = text.into().unwrap_or("").trim().to_lowercase();

    for (from, to) in MOJIBAKE {
        if out.contains(from) {
            out = out.replace(from, to);
        }
    }

    out.chars()
        .map(|c| match c {
            'á' | 'ã' | 'â' => 'a',
            'é' => 'e',
            'í' => 'i',
            'ó' => 'o',
            'ú' => 'u',
            'ñ' => 'n',
            other => other,
        })
        .collect()
}
