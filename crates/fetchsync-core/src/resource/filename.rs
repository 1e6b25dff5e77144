//! Local filename derivation for a remote resource.

use url::Url;

/// Filename used when the URL path yields nothing usable.
pub const DEFAULT_FILENAME: &str = "download.bin";

/// Longest filename accepted by common Linux filesystems (NAME_MAX).
const NAME_MAX: usize = 255;

/// Derives a safe local filename from the last segment of the URL path.
///
/// Percent-encoding is decoded, separators and control characters become `_`,
/// and leading/trailing dots or spaces are trimmed. Falls back to
/// [`DEFAULT_FILENAME`] for root paths, `.`/`..` or unparseable URLs.
pub fn filename_for_url(url: &str) -> String {
    last_segment(url)
        .map(|s| sanitize(&s))
        .filter(|s| !s.is_empty() && s != "." && s != "..")
        .unwrap_or_else(|| DEFAULT_FILENAME.to_string())
}

fn last_segment(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let segment = parsed.path_segments()?.filter(|s| !s.is_empty()).last()?;
    Some(percent_decode(segment))
}

fn percent_decode(segment: &str) -> String {
    let bytes = segment.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).ok();
            if let Some(v) = hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                out.push(v);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn sanitize(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| {
            if c == '/' || c == '\\' || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();
    let trimmed = replaced.trim_matches(|c: char| c == '.' || c.is_whitespace());
    let mut take = trimmed.len().min(NAME_MAX);
    while !trimmed.is_char_boundary(take) {
        take -= 1;
    }
    trimmed[..take].to_string()
}
