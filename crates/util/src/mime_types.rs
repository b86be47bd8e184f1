//! Extension based MIME detection for picked files.

use std::path::Path;

/// Guesses the MIME type of `path` from its extension.
///
/// Returns an empty string for unknown or missing extensions so callers see the
/// same "no declared type" a browser reports.
pub fn guess_mime_type(path: &Path) -> &'static str {
    let Some(extension) = path.extension().and_then(|e| e.to_str()) else {
        return "";
    };
    match extension.to_ascii_lowercase().as_str() {
        // Images
        "jpg" | "jpeg" | "jfif" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        "avif" => "image/avif",
        "ico" => "image/x-icon",
        "tif" | "tiff" => "image/tiff",
        // Video
        "mp4" | "m4v" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        "mkv" => "video/x-matroska",
        "ogv" => "video/ogg",
        "avi" => "video/x-msvideo",
        // Audio
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        // Documents
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        "csv" => "text/csv",
        "json" => "application/json",
        "zip" => "application/zip",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_extensions_map_case_insensitively() {
        assert_eq!(guess_mime_type(Path::new("photo.JPG")), "image/jpeg");
        assert_eq!(guess_mime_type(Path::new("/tmp/clip.mp4")), "video/mp4");
        assert_eq!(guess_mime_type(Path::new("anim.gif")), "image/gif");
    }

    #[test]
    fn unknown_extensions_have_no_type() {
        assert_eq!(guess_mime_type(Path::new("archive.xyz")), "");
        assert_eq!(guess_mime_type(Path::new("Makefile")), "");
    }
}
