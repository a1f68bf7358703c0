//! Global constants for the planview application

/// Interval between two simulated progress ticks (milliseconds)
pub const PROGRESS_INTERVAL_MS: u64 = 100;

/// Progress added per tick (percent)
pub const PROGRESS_STEP: u8 = 10;

/// Delay between reaching 100% and handing the image off (milliseconds)
pub const REDIRECT_DELAY_MS: u64 = 500;

/// Upper bound of the progress value
pub const PROGRESS_MAX: u8 = 100;

/// Extensions advertised to the file picker
pub const ACCEPTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Advertised maximum upload size (megabytes)
pub const MAX_FILE_SIZE_MB: u64 = 50;

/// Session store key prefix, followed by the visualizer's session key
pub const STORAGE_KEY_PREFIX: &str = "uploadedImage:";

/// Every stored handoff value must start with this
pub const IMAGE_DATA_URI_PREFIX: &str = "data:image/";

/// Media type used when the file's type can't be determined
pub const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";

/// Typical browser sessionStorage quota, used by the in-memory store
pub const DEFAULT_SESSION_QUOTA_BYTES: usize = 5 * 1024 * 1024;

/// Upper bound on how long the native loop sleeps between polls (milliseconds)
pub const NATIVE_MAX_SLEEP_MS: u64 = 50;
