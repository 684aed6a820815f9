use serde::{Deserialize, Serialize};

use super::raw::RawFile;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "svg", "gif", "webp"];
const AUDIO_EXTENSIONS: &[&str] = &["wav", "mp3", "ogg", "oga"];
const VIDEO_EXTENSIONS: &[&str] = &["webm", "mp4", "mov"];
const DOCUMENT_EXTENSIONS: &[&str] = &["pdf"];

/// Media kind of an attachment, decided from its file name only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Image,
    Audio,
    Video,
    Document,
    Other,
}

impl std::fmt::Display for FileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Image => write!(f, "image"),
            Self::Audio => write!(f, "audio"),
            Self::Video => write!(f, "video"),
            Self::Document => write!(f, "document"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// A display bucket of attachments. `All` is the only one holding `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileBucket {
    Image,
    Audio,
    Video,
    Document,
    #[default]
    All,
}

impl FileBucket {
    pub fn contains(self, file: &File) -> bool {
        match self {
            Self::Image => file.kind == FileKind::Image,
            Self::Audio => file.kind == FileKind::Audio,
            Self::Video => file.kind == FileKind::Video,
            Self::Document => file.kind == FileKind::Document,
            Self::All => true,
        }
    }
}

impl std::str::FromStr for FileBucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "image" | "images" => Ok(Self::Image),
            "audio" => Ok(Self::Audio),
            "video" | "videos" => Ok(Self::Video),
            "document" | "documents" => Ok(Self::Document),
            "all" => Ok(Self::All),
            _ => Err(format!("Unknown file bucket: {s}")),
        }
    }
}

/// Part after the last `/`, cut at `?`. Input without `/` is returned as is.
pub fn filename_from(url_like: &str) -> &str {
    let Some(slash) = url_like.rfind('/') else {
        return url_like;
    };
    let tail = &url_like[slash + 1..];
    match tail.find('?') {
        Some(q) => &tail[..q],
        None => tail,
    }
}

/// Lower-cased text after the last `.`, empty when there is none.
pub fn extension_of(name: &str) -> String {
    name.rfind('.')
        .map(|dot| name[dot + 1..].to_lowercase())
        .unwrap_or_default()
}

/// First matching set wins: image, audio, video, document; otherwise `Other`.
pub fn classify(name: &str) -> FileKind {
    let ext = extension_of(name);
    let ext = ext.as_str();
    if IMAGE_EXTENSIONS.contains(&ext) {
        FileKind::Image
    } else if AUDIO_EXTENSIONS.contains(&ext) {
        FileKind::Audio
    } else if VIDEO_EXTENSIONS.contains(&ext) {
        FileKind::Video
    } else if DOCUMENT_EXTENSIONS.contains(&ext) {
        FileKind::Document
    } else {
        FileKind::Other
    }
}

/// An attachment of a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct File {
    pub file_id: Option<String>,
    /// Remote URL, or the local path when the file was never uploaded.
    pub file_url: Option<String>,
    pub name: String,
    pub kind: FileKind,
}

impl File {
    pub fn is_image(&self) -> bool {
        self.kind == FileKind::Image
    }

    pub fn is_audio(&self) -> bool {
        self.kind == FileKind::Audio
    }

    pub fn is_video(&self) -> bool {
        self.kind == FileKind::Video
    }

    pub fn is_document(&self) -> bool {
        self.kind == FileKind::Document
    }
}

impl From<RawFile> for File {
    fn from(raw: RawFile) -> Self {
        let file_url = raw.file_url.or(raw.local_url);
        let name = file_url.as_deref().map(filename_from).unwrap_or_default().to_string();
        let kind = classify(&name);
        Self {
            file_id: raw.file_id,
            file_url,
            name,
            kind,
        }
    }
}
