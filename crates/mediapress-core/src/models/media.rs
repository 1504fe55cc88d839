use serde::{Deserialize, Serialize};

/// Kind of a selected media file, as decided by the classifier.
///
/// HEIC images are a distinct kind because they need an external decode step
/// before they can be re-encoded for the web.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Image,
    HeicImage,
    Video,
}

impl MediaKind {
    /// Whether this kind goes through the image conversion path.
    pub fn is_image(self) -> bool {
        matches!(self, MediaKind::Image | MediaKind::HeicImage)
    }
}
