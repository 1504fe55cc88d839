//! Device and network upload profiles.
//!
//! A profile bundles the knobs that vary per call site: maximum image
//! dimension, encode quality, batch file cap, and the retry budget. Mobile
//! devices get smaller bounds to limit memory use and upload size; the
//! network-aware constructor additionally trades visual fidelity for payload
//! size on slow connections.

use std::time::Duration;

/// Class of the device driving the upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceClass {
    Mobile,
    Desktop,
}

/// Measured connection-quality tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkQuality {
    Slow,
    Medium,
    Fast,
}

/// Settings for one batch: dimensions, quality, caps, and retry budget.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadProfile {
    /// Longer image side is scaled down to this bound (never up).
    pub max_dimension: u32,
    /// Encode quality, 0-100.
    pub quality: f32,
    /// Maximum number of files accepted per batch; excess files are dropped.
    pub max_files: usize,
    /// Extra upload attempts after the first failure.
    pub max_retries: u32,
    /// Fixed delay between upload attempts.
    pub retry_delay: Duration,
}

impl UploadProfile {
    /// Profile by device class only (no network signal available).
    pub fn for_device(device: DeviceClass) -> Self {
        match device {
            DeviceClass::Mobile => UploadProfile {
                max_dimension: 1200,
                quality: 65.0,
                max_files: 3,
                max_retries: 2,
                retry_delay: Duration::from_millis(1000),
            },
            DeviceClass::Desktop => UploadProfile {
                max_dimension: 1600,
                quality: 70.0,
                max_files: 10,
                max_retries: 2,
                retry_delay: Duration::from_millis(1000),
            },
        }
    }

    /// Network-aware profile: slower connections get smaller dimensions,
    /// lower quality, fewer files, and a more patient retry strategy.
    pub fn adaptive(device: DeviceClass, network: NetworkQuality) -> Self {
        let mobile = device == DeviceClass::Mobile;
        match network {
            NetworkQuality::Slow => UploadProfile {
                max_dimension: if mobile { 800 } else { 1000 },
                quality: 50.0,
                max_files: 2,
                max_retries: 3,
                retry_delay: Duration::from_millis(2000),
            },
            NetworkQuality::Medium => UploadProfile {
                max_dimension: if mobile { 1000 } else { 1400 },
                quality: 65.0,
                max_files: 3,
                max_retries: 2,
                retry_delay: Duration::from_millis(1000),
            },
            NetworkQuality::Fast => UploadProfile {
                max_dimension: if mobile { 1200 } else { 1600 },
                quality: if mobile { 70.0 } else { 80.0 },
                max_files: if mobile { 4 } else { 10 },
                max_retries: 1,
                retry_delay: Duration::from_millis(500),
            },
        }
    }
}

impl Default for UploadProfile {
    fn default() -> Self {
        Self::for_device(DeviceClass::Desktop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_profiles() {
        let mobile = UploadProfile::for_device(DeviceClass::Mobile);
        let desktop = UploadProfile::for_device(DeviceClass::Desktop);

        assert_eq!(mobile.max_dimension, 1200);
        assert_eq!(mobile.max_files, 3);
        assert_eq!(desktop.max_dimension, 1600);
        assert_eq!(desktop.max_files, 10);
        assert!(mobile.quality < desktop.quality);
    }

    #[test]
    fn test_slow_network_shrinks_everything() {
        let fast = UploadProfile::adaptive(DeviceClass::Mobile, NetworkQuality::Fast);
        let slow = UploadProfile::adaptive(DeviceClass::Mobile, NetworkQuality::Slow);

        assert!(slow.max_dimension < fast.max_dimension);
        assert!(slow.quality < fast.quality);
        assert!(slow.max_files < fast.max_files);
        // Slower network gets more retries with longer waits
        assert!(slow.max_retries > fast.max_retries);
        assert!(slow.retry_delay > fast.retry_delay);
    }

    #[test]
    fn test_adaptive_values() {
        let p = UploadProfile::adaptive(DeviceClass::Desktop, NetworkQuality::Medium);
        assert_eq!(p.max_dimension, 1400);
        assert_eq!(p.quality, 65.0);
        assert_eq!(p.max_files, 3);
        assert_eq!(p.max_retries, 2);
        assert_eq!(p.retry_delay, Duration::from_millis(1000));
    }
}
