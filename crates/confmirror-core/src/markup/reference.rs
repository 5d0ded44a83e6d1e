//! Asset references found in page markup.

use std::fmt;

/// Which per-page subdirectory an asset lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Image,
    File,
}

impl AssetKind {
    pub fn dir_name(self) -> &'static str {
        match self {
            AssetKind::Image => "images",
            AssetKind::File => "files",
        }
    }
}

/// One embedded asset, as written in the storage format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetRef {
    /// `<img src="…">`; only the `src` value is replaced.
    DirectUrl { src: String },
    /// `<ac:image><ri:url ri:value="…"/></ac:image>`
    ExternalImage { url: String },
    /// `<ac:image><ri:attachment ri:filename="…"/></ac:image>`
    AttachmentImage { filename: String },
    /// `<ac:link><ri:attachment ri:filename="…"/></ac:link>`
    AttachmentLink { filename: String },
    /// `<ac:structured-macro ac:name="view-file">…<ri:attachment ri:filename="…"/>…`
    MacroFile { macro_name: String, filename: String },
}

impl AssetRef {
    pub fn kind(&self) -> AssetKind {
        match self {
            AssetRef::DirectUrl { .. }
            | AssetRef::ExternalImage { .. }
            | AssetRef::AttachmentImage { .. } => AssetKind::Image,
            AssetRef::AttachmentLink { .. } | AssetRef::MacroFile { .. } => AssetKind::File,
        }
    }

    /// Attachment name for references resolved through the attachment lookup.
    pub fn attachment_filename(&self) -> Option<&str> {
        match self {
            AssetRef::AttachmentImage { filename }
            | AssetRef::AttachmentLink { filename }
            | AssetRef::MacroFile { filename, .. } => Some(filename),
            AssetRef::DirectUrl { .. } | AssetRef::ExternalImage { .. } => None,
        }
    }
}

impl fmt::Display for AssetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetRef::DirectUrl { src } => write!(f, "image {}", src),
            AssetRef::ExternalImage { url } => write!(f, "external image {}", url),
            AssetRef::AttachmentImage { filename } => write!(f, "image attachment {}", filename),
            AssetRef::AttachmentLink { filename } => write!(f, "attachment link {}", filename),
            AssetRef::MacroFile {
                macro_name,
                filename,
            } => write!(f, "{} macro for {}", macro_name, filename),
        }
    }
}
