//! Remote acknowledgement protocol between the coordinator and the
//! capability running inside the target tab.

pub mod ack;
pub mod capability;
pub mod message;

pub use ack::{Acknowledgement, DeliveryError};
pub use capability::{CapabilityTiming, ComposerSurface, run_capability};
pub use message::{Provider, RemoteRequest, SubmitResponse};
