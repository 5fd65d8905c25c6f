pub mod capture_config;
pub mod defaults;
pub mod detector_config;
pub mod monitor_config;
pub mod observability_config;
pub mod signaling_config;
pub mod store_config;
pub mod vigil_config;

pub use capture_config::CaptureConfig;
pub use detector_config::DetectorConfig;
pub use monitor_config::MonitorConfig;
pub use observability_config::ObservabilityConfig;
pub use signaling_config::SignalingConfig;
pub use store_config::StoreConfig;
pub use vigil_config::VigilConfig;
