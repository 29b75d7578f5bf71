//! File extension to MIME type table.

/// Content type used for paths without an extension.
pub const DEFAULT_CONTENT_TYPE: &str = "text/html";

/// Extension of the last path segment, without the dot.
///
/// The text after the final `.` must be non-empty: `file.` has no extension,
/// while a dotfile such as `.env` has extension `env`.
pub fn extension_of(path: &str) -> Option<&str> {
    let name = path.rsplit('/').next().unwrap_or(path);
    let (_, extension) = name.rsplit_once('.')?;
    (!extension.is_empty()).then_some(extension)
}

/// Look up the MIME type for a file extension (without the dot, case-insensitive).
pub fn content_type_for(extension: &str) -> Option<&'static str> {
    let content_type = match extension.to_ascii_lowercase().as_str() {
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "js" => "text/javascript",
        "json" => "application/json",
        "xml" => "application/xml",
        "txt" => "text/plain",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        _ => return None,
    };
    Some(content_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_extensions() {
        assert_eq!(content_type_for("html"), Some("text/html"));
        assert_eq!(content_type_for("HTM"), Some("text/html"));
        assert_eq!(content_type_for("jpeg"), Some("image/jpeg"));
        assert_eq!(content_type_for("svg"), Some("image/svg+xml"));
    }

    #[test]
    fn extension_of_last_segment() {
        assert_eq!(extension_of("css/site.css"), Some("css"));
        assert_eq!(extension_of("archive.tar.gz"), Some("gz"));
        assert_eq!(extension_of(".env"), Some("env"));
        assert_eq!(extension_of("file."), None);
        assert_eq!(extension_of("v1.2/about"), None);
        assert_eq!(extension_of(""), None);
    }

    #[test]
    fn unknown_extension() {
        assert_eq!(content_type_for("exe"), None);
        assert_eq!(content_type_for(""), None);
    }
}
