// rdi-client: Versioned client negotiation for RDI management services.
//
// Given instance metadata and credentials, produces a ready-to-use client
// speaking the correct generation of the management protocol: probes for v2
// capability, falls back to the legacy protocol when the probe misses,
// authenticates, and (v2 only) resolves which pipeline is currently
// deployed. One call, at most three round-trips, no retries.

pub mod auth;
pub mod client;
pub mod error;
pub mod factory;
pub mod http;
pub mod pipeline;
pub mod probe;
pub mod token;

pub use client::{Credentials, CurrentClient, LegacyClient, RdiClient, RdiInstance};
pub use error::{ApiError, RdiError};
pub use factory::RdiClientFactory;
pub use probe::ProbeOutcome;
pub use token::AuthToken;
