//! Lookup tables from domain values to display attributes.

use sha2::{Digest, Sha256};
use spacedash_shared::FileStatus;

/// Broad category of an uploaded file, from its MIME type or extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    Pdf,
    Document,
    Spreadsheet,
    Presentation,
    Image,
    Audio,
    Video,
    Text,
    Other,
}

impl FileKind {
    /// Accepts a MIME type (`application/pdf`), an extension (`.docx`, `mp3`)
    /// or a file name.
    pub fn from_type(value: &str) -> Self {
        let value = value.trim().to_ascii_lowercase();

        if let Some((top, sub)) = value.split_once('/') {
            return match (top, sub) {
                (_, "pdf") => FileKind::Pdf,
                ("image", _) => FileKind::Image,
                ("audio", _) => FileKind::Audio,
                ("video", _) => FileKind::Video,
                (_, sub) if sub.contains("spreadsheet") || sub.contains("excel") || sub == "csv" => {
                    FileKind::Spreadsheet
                }
                (_, sub) if sub.contains("presentation") || sub.contains("powerpoint") => {
                    FileKind::Presentation
                }
                (_, sub) if sub.contains("wordprocessing") || sub == "msword" || sub == "rtf" => {
                    FileKind::Document
                }
                ("text", _) => FileKind::Text,
                _ => FileKind::Other,
            };
        }

        let ext = value.rsplit('.').next().unwrap_or_default();
        match ext {
            "pdf" => FileKind::Pdf,
            "doc" | "docx" | "odt" | "rtf" => FileKind::Document,
            "xls" | "xlsx" | "ods" | "csv" => FileKind::Spreadsheet,
            "ppt" | "pptx" | "odp" | "key" => FileKind::Presentation,
            "png" | "jpg" | "jpeg" | "gif" | "webp" | "svg" => FileKind::Image,
            "mp3" | "wav" | "m4a" | "ogg" | "flac" => FileKind::Audio,
            "mp4" | "mov" | "webm" | "mkv" | "avi" => FileKind::Video,
            "txt" | "md" | "json" | "html" => FileKind::Text,
            _ => FileKind::Other,
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            FileKind::Pdf => "📕",
            FileKind::Document => "📄",
            FileKind::Spreadsheet => "📊",
            FileKind::Presentation => "📽",
            FileKind::Image => "🖼",
            FileKind::Audio => "🎧",
            FileKind::Video => "🎬",
            FileKind::Text => "📝",
            FileKind::Other => "📁",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FileKind::Pdf => "PDF",
            FileKind::Document => "Document",
            FileKind::Spreadsheet => "Spreadsheet",
            FileKind::Presentation => "Presentation",
            FileKind::Image => "Image",
            FileKind::Audio => "Audio",
            FileKind::Video => "Video",
            FileKind::Text => "Text",
            FileKind::Other => "File",
        }
    }

    /// Audio and video files get a transcript.
    pub fn has_transcript(self) -> bool {
        matches!(self, FileKind::Audio | FileKind::Video)
    }
}

/// Background patterns for space cards.
pub const SPACE_PATTERNS: &[&str] = &[
    "pattern-dots",
    "pattern-grid",
    "pattern-waves",
    "pattern-diagonal",
    "pattern-circles",
    "pattern-zigzag",
];

/// Pick a pattern for a space. The same id always maps to the same pattern.
pub fn space_pattern<'a>(space_id: &str, patterns: &[&'a str]) -> Option<&'a str> {
    if patterns.is_empty() {
        return None;
    }
    let digest = Sha256::digest(space_id.as_bytes());
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    let index = u64::from_be_bytes(head) % patterns.len() as u64;
    Some(patterns[index as usize])
}

/// Label and CSS class for a file's processing status.
pub fn status_badge(status: &FileStatus) -> (&'static str, &'static str) {
    match status {
        FileStatus::Active => ("Ready", "badge badge-success"),
        FileStatus::Processing => ("Processing", "badge badge-warning"),
        FileStatus::Error => ("Failed", "badge badge-error"),
        FileStatus::Unknown => ("Unknown", "badge"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_types_and_extensions_agree() {
        let cases = [
            ("application/pdf", FileKind::Pdf),
            ("report.PDF", FileKind::Pdf),
            (
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
                FileKind::Document,
            ),
            (".xlsx", FileKind::Spreadsheet),
            ("application/vnd.ms-powerpoint", FileKind::Presentation),
            ("audio/mpeg", FileKind::Audio),
            ("mp4", FileKind::Video),
            ("text/plain", FileKind::Text),
            ("application/zip", FileKind::Other),
        ];
        for (input, expected) in cases {
            assert_eq!(FileKind::from_type(input), expected, "{input}");
        }
    }

    #[test]
    fn space_pattern_is_stable_and_in_range() {
        let first = space_pattern("space-42", SPACE_PATTERNS).unwrap();
        assert_eq!(space_pattern("space-42", SPACE_PATTERNS), Some(first));
        assert!(SPACE_PATTERNS.contains(&first));
        assert_eq!(space_pattern("space-42", &[]), None);
    }

    #[test]
    fn every_status_has_a_badge() {
        assert_eq!(status_badge(&FileStatus::Processing).0, "Processing");
        assert_eq!(status_badge(&FileStatus::Unknown).1, "badge");
    }
}
