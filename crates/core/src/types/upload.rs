//! Upload acceptance policy.
//!
//! Decides whether an uploaded file is accepted for a given purpose, and how
//! large it may be. Storage itself lives in the server crate.

use serde::{Deserialize, Serialize};

const MIB: usize = 1024 * 1024;

/// Longest file extension kept from a client-supplied filename.
const MAX_EXTENSION_LEN: usize = 8;

/// MIME types accepted for document uploads.
pub const DOCUMENT_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

/// Why an upload was refused. Every message is safe to show to the user.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadRejection {
    /// The request carried no file under the expected field.
    #[error("no file uploaded")]
    MissingFile,
    /// The file has zero bytes.
    #[error("uploaded file is empty")]
    EmptyFile,
    /// Profile uploads must be images.
    #[error("only images are allowed")]
    NotAnImage,
    /// Document upload with a MIME type outside the allow-list.
    #[error("unsupported file format: {0}")]
    UnsupportedType(String),
    /// The file exceeds the size ceiling.
    #[error("file too large (maximum {} MB)", max_bytes / MIB)]
    TooLarge {
        /// Ceiling that was exceeded.
        max_bytes: usize,
    },
}

/// What an upload is for. Each purpose has its own multipart field and
/// storage directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadPurpose {
    /// A user or horse profile image.
    Profile,
    /// An invoice or other attachment.
    Document,
}

impl UploadPurpose {
    /// Name of the multipart field carrying the file.
    #[must_use]
    pub const fn field_name(self) -> &'static str {
        match self {
            Self::Profile => "profile",
            Self::Document => "document",
        }
    }

    /// Directory (relative to the upload root) files are stored under.
    #[must_use]
    pub const fn directory(self) -> &'static str {
        match self {
            Self::Profile => "profiles",
            Self::Document => "documents",
        }
    }

    /// Check a MIME type against this purpose's allow-list.
    ///
    /// # Errors
    ///
    /// Returns `UploadRejection::NotAnImage` for non-image profile uploads and
    /// `UploadRejection::UnsupportedType` for documents outside the allow-list.
    pub fn check_mime(self, mime: &str) -> Result<(), UploadRejection> {
        match self {
            Self::Profile if is_image(mime) => Ok(()),
            Self::Profile => Err(UploadRejection::NotAnImage),
            Self::Document if DOCUMENT_MIME_TYPES.contains(&mime) => Ok(()),
            Self::Document => Err(UploadRejection::UnsupportedType(mime.to_owned())),
        }
    }
}

/// Size ceiling policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UploadLimits {
    /// One ceiling (5 MiB) for every file. Used with local-disk storage.
    #[default]
    Local,
    /// 4 MiB for images, 8 MiB for PDFs and other documents. Matches the
    /// ceilings of hosted object storage.
    PerKind,
}

impl UploadLimits {
    /// Ceiling for the local-disk policy.
    pub const LOCAL_MAX_BYTES: usize = 5 * MIB;
    /// Image ceiling for the per-kind policy.
    pub const IMAGE_MAX_BYTES: usize = 4 * MIB;
    /// PDF/document ceiling for the per-kind policy.
    pub const DOCUMENT_MAX_BYTES: usize = 8 * MIB;

    /// Maximum accepted size for a file of the given MIME type.
    #[must_use]
    pub fn max_bytes(self, mime: &str) -> usize {
        match self {
            Self::Local => Self::LOCAL_MAX_BYTES,
            Self::PerKind if is_image(mime) => Self::IMAGE_MAX_BYTES,
            Self::PerKind => Self::DOCUMENT_MAX_BYTES,
        }
    }

    /// Largest ceiling any file can get under this policy.
    #[must_use]
    pub const fn largest(self) -> usize {
        match self {
            Self::Local => Self::LOCAL_MAX_BYTES,
            Self::PerKind => Self::DOCUMENT_MAX_BYTES,
        }
    }
}

impl std::str::FromStr for UploadLimits {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(Self::Local),
            "per-kind" => Ok(Self::PerKind),
            _ => Err(format!("invalid upload limits: {s} (expected local or per-kind)")),
        }
    }
}

fn is_image(mime: &str) -> bool {
    mime.starts_with("image/")
}

/// Extension (with leading dot, lowercased) to keep from a client filename.
///
/// Returns an empty string when the name has no extension or the extension
/// is not a short alphanumeric token, so stored names never contain path
/// separators or other client-controlled punctuation.
#[must_use]
pub fn sanitized_extension(file_name: &str) -> String {
    let Some((stem, ext)) = file_name.rsplit_once('.') else {
        return String::new();
    };
    if stem.is_empty()
        || ext.is_empty()
        || ext.len() > MAX_EXTENSION_LEN
        || !ext.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return String::new();
    }
    format!(".{}", ext.to_ascii_lowercase())
}
