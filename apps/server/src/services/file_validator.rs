//! Upload validation for recordings and brain documents. Pure, no I/O.

/// Content types accepted for recordings.
pub const ALLOWED_RECORDING_TYPES: &[&str] = &[
    "audio/mpeg",
    "audio/mp3",
    "audio/wav",
    "audio/m4a",
    "audio/ogg",
    "audio/webm",
    "audio/flac",
    "video/mp4",
    "video/webm",
];

/// File name suffixes accepted for recordings when the content type is not recognized.
pub const ALLOWED_RECORDING_EXTENSIONS: &[&str] =
    &[".mp3", ".wav", ".m4a", ".ogg", ".webm", ".flac", ".mp4"];

pub const INVALID_TYPE_MESSAGE: &str = "Invalid file type. Please upload an audio file (MP3, WAV, M4A, OGG, WEBM, FLAC) or video file (MP4, WEBM).";

/// Why a file was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileRejection {
    InvalidType,
    TooLarge { max_bytes: u64 },
}

impl FileRejection {
    /// Message shown to the user.
    pub fn message(&self) -> String {
        match self {
            Self::InvalidType => INVALID_TYPE_MESSAGE.to_string(),
            Self::TooLarge { max_bytes } => format!(
                "File size exceeds {}MB. Please upload a smaller file.",
                max_bytes / (1024 * 1024)
            ),
        }
    }
}

impl std::fmt::Display for FileRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// Check a recording upload. Type is checked before size.
pub fn validate_recording_file(
    file_name: &str,
    content_type: Option<&str>,
    size: u64,
    max_bytes: u64,
) -> Result<(), FileRejection> {
    let has_valid_type = content_type
        .map(|ct| ALLOWED_RECORDING_TYPES.contains(&ct))
        .unwrap_or(false);

    let lower = file_name.to_lowercase();
    let has_valid_extension = ALLOWED_RECORDING_EXTENSIONS
        .iter()
        .any(|ext| lower.ends_with(ext));

    if !has_valid_type && !has_valid_extension {
        return Err(FileRejection::InvalidType);
    }

    if size > max_bytes {
        return Err(FileRejection::TooLarge { max_bytes });
    }

    Ok(())
}

/// Check a brain document upload. Any type is accepted.
pub fn validate_document_size(size: u64, max_bytes: u64) -> Result<(), FileRejection> {
    if size > max_bytes {
        return Err(FileRejection::TooLarge { max_bytes });
    }
    Ok(())
}

/// Extension used in a recording's storage key: text after the last dot,
/// or the whole name when there is none.
pub fn file_extension(file_name: &str) -> &str {
    file_name.rsplit('.').next().unwrap_or(file_name)
}
