//! Audio upload value object

use std::fmt;

/// Audio container types accepted by the minutes pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AudioMimeType {
    /// AAC in an MPEG-4 container (`.m4a`), what phone recorders produce
    #[default]
    M4a,
    Mp3,
    Wav,
    Ogg,
    Webm,
    Flac,
}

impl AudioMimeType {
    /// Get the MIME type string
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::M4a => "audio/mp4",
            Self::Mp3 => "audio/mpeg",
            Self::Wav => "audio/wav",
            Self::Ogg => "audio/ogg",
            Self::Webm => "audio/webm",
            Self::Flac => "audio/flac",
        }
    }

    /// Get the file extension used for scratch files
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::M4a => "m4a",
            Self::Mp3 => "mp3",
            Self::Wav => "wav",
            Self::Ogg => "ogg",
            Self::Webm => "webm",
            Self::Flac => "flac",
        }
    }

    /// Resolve a `Content-Type` header value.
    ///
    /// Parameters such as `; codecs=opus` are ignored. Generic types like
    /// `application/octet-stream` resolve to `None`.
    pub fn from_content_type(value: &str) -> Option<Self> {
        let essence = value.split(';').next()?.trim().to_ascii_lowercase();
        match essence.as_str() {
            "audio/mp4" | "audio/m4a" | "audio/x-m4a" | "audio/aac" | "video/mp4" => {
                Some(Self::M4a)
            }
            "audio/mpeg" | "audio/mp3" => Some(Self::Mp3),
            "audio/wav" | "audio/x-wav" | "audio/wave" | "audio/vnd.wave" => Some(Self::Wav),
            "audio/ogg" | "application/ogg" => Some(Self::Ogg),
            "audio/webm" | "video/webm" => Some(Self::Webm),
            "audio/flac" | "audio/x-flac" => Some(Self::Flac),
            _ => None,
        }
    }

    /// Resolve from the extension of a client-supplied filename
    pub fn from_filename(name: &str) -> Option<Self> {
        let (_, ext) = name.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "m4a" | "mp4" | "aac" => Some(Self::M4a),
            "mp3" => Some(Self::Mp3),
            "wav" => Some(Self::Wav),
            "ogg" | "oga" | "opus" => Some(Self::Ogg),
            "webm" => Some(Self::Webm),
            "flac" => Some(Self::Flac),
            _ => None,
        }
    }
}

impl fmt::Display for AudioMimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Value object representing one uploaded recording.
///
/// The original filename comes from the client and is kept for logging
/// only; it never contributes to a filesystem path.
#[derive(Debug, Clone)]
pub struct AudioUpload {
    data: Vec<u8>,
    mime_type: AudioMimeType,
    original_name: Option<String>,
}

impl AudioUpload {
    /// Create an upload from raw bytes with a known type
    pub fn new(data: Vec<u8>, mime_type: AudioMimeType) -> Self {
        Self {
            data,
            mime_type,
            original_name: None,
        }
    }

    /// Create an upload from what a multipart part carries, inferring the
    /// type from the content type, then the filename, then the default.
    pub fn from_part(
        data: Vec<u8>,
        content_type: Option<&str>,
        original_name: Option<&str>,
    ) -> Self {
        let mime_type = content_type
            .and_then(AudioMimeType::from_content_type)
            .or_else(|| original_name.and_then(AudioMimeType::from_filename))
            .unwrap_or_default();

        Self {
            data,
            mime_type,
            original_name: original_name.map(str::to_string),
        }
    }

    /// Get the raw audio data
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume the upload, keeping only its bytes
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Get the resolved MIME type
    pub fn mime_type(&self) -> AudioMimeType {
        self.mime_type
    }

    /// Get the untrusted client filename, if any
    pub fn original_name(&self) -> Option<&str> {
        self.original_name.as_deref()
    }

    /// Get the size in bytes
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    /// Get human-readable size
    pub fn human_readable_size(&self) -> String {
        let bytes = self.size_bytes();
        if bytes < 1024 {
            format!("{} B", bytes)
        } else if bytes < 1024 * 1024 {
            format!("{:.1} KB", bytes as f64 / 1024.0)
        } else {
            format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_ignores_parameters_and_case() {
        assert_eq!(
            AudioMimeType::from_content_type("Audio/WebM; codecs=opus"),
            Some(AudioMimeType::Webm)
        );
        assert_eq!(
            AudioMimeType::from_content_type("audio/x-m4a"),
            Some(AudioMimeType::M4a)
        );
        assert_eq!(AudioMimeType::from_content_type("application/octet-stream"), None);
    }

    #[test]
    fn filename_extension_lookup() {
        assert_eq!(AudioMimeType::from_filename("会議.MP3"), Some(AudioMimeType::Mp3));
        assert_eq!(AudioMimeType::from_filename("rec.wav"), Some(AudioMimeType::Wav));
        assert_eq!(AudioMimeType::from_filename("noext"), None);
        assert_eq!(AudioMimeType::from_filename("notes.txt"), None);
    }

    #[test]
    fn from_part_prefers_content_type() {
        let upload = AudioUpload::from_part(vec![1], Some("audio/ogg"), Some("a.mp3"));
        assert_eq!(upload.mime_type(), AudioMimeType::Ogg);
    }

    #[test]
    fn from_part_falls_back_to_filename_then_default() {
        let upload =
            AudioUpload::from_part(vec![1], Some("application/octet-stream"), Some("a.flac"));
        assert_eq!(upload.mime_type(), AudioMimeType::Flac);

        let upload = AudioUpload::from_part(vec![1], None, None);
        assert_eq!(upload.mime_type(), AudioMimeType::M4a);
        assert_eq!(upload.mime_type().extension(), "m4a");
    }

    #[test]
    fn original_name_is_kept() {
        let upload = AudioUpload::from_part(vec![], None, Some("../../etc/passwd"));
        assert_eq!(upload.original_name(), Some("../../etc/passwd"));
        assert_eq!(upload.size_bytes(), 0);
    }

    #[test]
    fn human_readable_sizes() {
        assert_eq!(AudioUpload::new(vec![0u8; 500], AudioMimeType::Wav).human_readable_size(), "500 B");
        assert_eq!(AudioUpload::new(vec![0u8; 2048], AudioMimeType::Wav).human_readable_size(), "2.0 KB");
        assert_eq!(
            AudioUpload::new(vec![0u8; 2 * 1024 * 1024], AudioMimeType::Wav).human_readable_size(),
            "2.0 MB"
        );
    }
}
