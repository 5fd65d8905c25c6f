// Single source of truth for all default values.

// --- Monitor ---
pub const DEFAULT_NO_FACE_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_OBSTRUCTION_IOU_THRESHOLD: f64 = 0.12;
pub const DEFAULT_AUDIO_RMS_THRESHOLD: f64 = 0.12;
pub const DEFAULT_VOICE_NO_FACE_GRACE_MS: u64 = 2_000;
pub const DEFAULT_COOLDOWN_MS: u64 = 8_000;
pub const DEFAULT_MAX_VIOLATIONS_BEFORE_LOCK: u32 = 5;
pub const DEFAULT_RECENT_ALERT_CAPACITY: usize = 10;

// --- Capture ---
pub const DEFAULT_VIDEO_WIDTH: u32 = 640;
pub const DEFAULT_VIDEO_HEIGHT: u32 = 480;
pub const DEFAULT_FACING_MODE: &str = "user";
pub const DEFAULT_AUDIO_CHANNEL_COUNT: u32 = 1;
pub const DEFAULT_AUDIO_SAMPLE_RATE: u32 = 48_000;
pub const DEFAULT_ANALYSER_FFT_SIZE: usize = 512;
pub const DEFAULT_FRAME_INTERVAL_MS: u64 = 33; // ~30 fps

// --- Detector ---
pub const DEFAULT_MAX_NUM_FACES: u32 = 2;
pub const DEFAULT_MAX_NUM_HANDS: u32 = 2;
pub const DEFAULT_MIN_DETECTION_CONFIDENCE: f64 = 0.6;
pub const DEFAULT_MIN_TRACKING_CONFIDENCE: f64 = 0.6;
pub const DEFAULT_MODEL_COMPLEXITY: u8 = 1;
pub const DEFAULT_DETECTOR_TIMEOUT_MS: u64 = 1_000;

// --- Signaling ---
pub const DEFAULT_STUN_SERVER: &str = "stun:stun.l.google.com:19302";

// --- Store ---
pub const DEFAULT_STATE_FILENAME: &str = "vigil-state.json";

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_LOG_JSON: bool = true;
