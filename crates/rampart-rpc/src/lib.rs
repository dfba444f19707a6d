// rampart-rpc: Async client for the rampartd privileged control endpoint.
//
// Every call is raced against a per-operation deadline on top of the
// socket-level timeout, so "the daemon did not answer in time" is a
// first-class error kind distinct from "the daemon said no".

pub mod client;
pub mod error;
pub mod transport;
pub mod types;

pub use client::{DaemonClient, RpcTimeouts};
pub use error::Error;
pub use transport::TransportConfig;
