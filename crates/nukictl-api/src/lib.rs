// nukictl-api: Async Rust client for the Nuki Bridge HTTP API

pub mod endpoint;
pub mod error;
pub mod models;
pub mod transport;

pub use endpoint::{BridgeEndpoints, DEFAULT_PORT, Endpoint, LockAction};
pub use error::Error;
pub use models::{Device, DeviceId, LastKnownState};
pub use transport::{HttpTransport, RawResponse, Transport, TransportConfig};
