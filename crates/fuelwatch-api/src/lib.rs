// fuelwatch-api: Async Rust client for the hosted telemetry store (REST) and
// the reverse-geocoding service.

pub mod error;
pub mod geocode;
pub mod telemetry_db;
pub mod transport;

pub use error::Error;
pub use geocode::{GeocodeClient, RetryPolicy};
pub use telemetry_db::TelemetryDb;
pub use transport::{TlsMode, TransportConfig};
