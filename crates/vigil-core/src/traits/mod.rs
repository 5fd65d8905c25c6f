pub mod bus;
pub mod cancellation;
pub mod detector;
pub mod media;
pub mod peer;
pub mod sink;
pub mod store;
pub mod submitter;

pub use bus::{BusHandler, IMessageBus};
pub use cancellation::{Cancellable, CancellationToken};
pub use detector::ILandmarkDetector;
pub use media::{IMediaDevices, IMediaStream};
pub use peer::{IPeerConnection, IPeerConnector};
pub use sink::{ExitReason, IAlertSink, INavigator};
pub use store::IResilienceStore;
pub use submitter::IExamSubmitter;
