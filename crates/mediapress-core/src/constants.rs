//! Shared constants for the ingestion pipeline.

/// Logical path prefix under which all uploaded objects are stored.
pub const UPLOAD_PREFIX: &str = "announcements";

/// Default storage bucket name.
pub const DEFAULT_BUCKET: &str = "images";

/// Cache-Control max-age (seconds) sent with every uploaded object.
pub const UPLOAD_CACHE_CONTROL_SECS: u32 = 3600;

/// Re-encode quality for HEIC sources. The source is already lossy; a second
/// pass at near-original quality avoids visible double degradation.
pub const HEIC_REENCODE_QUALITY: f32 = 85.0;

/// Maximum accepted image size in bytes (10 MB).
pub const MAX_IMAGE_SIZE_BYTES: usize = 10 * 1024 * 1024;

/// Maximum accepted video size in bytes (50 MB).
pub const MAX_VIDEO_SIZE_BYTES: usize = 50 * 1024 * 1024;
