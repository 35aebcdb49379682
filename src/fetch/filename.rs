//! Attachment filename from a media URL.

/// Used when no usable name can be derived from the URL.
pub const DEFAULT_FILENAME: &str = "facebook_video.mp4";

const EXTENSION: &str = ".mp4";

/// Percent-decode `url`, drop the query string, take the last path segment
/// and make sure it ends in `.mp4`.
///
/// Falls back to [`DEFAULT_FILENAME`] when the URL does not decode to UTF-8
/// or has no final segment.
#[must_use]
pub fn filename_from_url(url: &str) -> String {
    let Ok(decoded) = urlencoding::decode(url) else {
        return DEFAULT_FILENAME.to_string();
    };
    let path = decoded.split('?').next().unwrap_or_default();
    let name = path.rsplit('/').next().unwrap_or_default();
    if name.is_empty() {
        return DEFAULT_FILENAME.to_string();
    }

    if name.ends_with(EXTENSION) {
        name.to_string()
    } else {
        format!("{name}{EXTENSION}")
    }
}

/// `Content-Disposition` value for `filename`.
///
/// Quotes, backslashes and control characters are replaced in the quoted
/// form; non-ASCII names additionally get an RFC 5987 `filename*`.
#[must_use]
pub fn content_disposition(filename: &str) -> String {
    let ascii: String = filename
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii_control() || !c.is_ascii() => '_',
            c => c,
        })
        .collect();

    if ascii == filename {
        format!("attachment; filename=\"{ascii}\"")
    } else {
        format!(
            "attachment; filename=\"{ascii}\"; filename*=UTF-8''{}",
            urlencoding::encode(filename)
        )
    }
}
