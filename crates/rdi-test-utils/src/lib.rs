// rdi-test-utils: Shared test utilities for the client negotiation suite.
//
// Provides a configurable mock RDI management service for integration
// testing of the probe / login / pipeline-listing sequence, plus a helper
// for minting unsigned-but-well-shaped JWTs.

pub mod mock_server;

pub use mock_server::{MockRdiServer, MockRdiServerBuilder, make_jwt, sample_pipeline};
