//! Shared key generation for storage backends.
//!
//! Key format: `{prefix}/{uuid}.{ext}`. The random component makes key
//! collisions negligible without any coordination with the backend; the
//! original extension is preserved so downstream consumers can tell media
//! kinds apart from the URL alone.

use uuid::Uuid;

/// Generate a storage key for a new object with the given extension.
///
/// All backends must use this format for consistency.
pub fn generate_object_key(prefix: &str, extension: &str) -> String {
    let ext = extension.trim_start_matches('.').to_lowercase();
    format!("{}/{}.{}", prefix.trim_end_matches('/'), Uuid::new_v4(), ext)
}
