//! Core types: warp-cli runner, status parsing, status poller, tracing
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use warptoggle_core::{PollerConfig, StatusPoller, WarpCli};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let poller = StatusPoller::new(Arc::new(WarpCli::default()), PollerConfig::default());
//!     let mut handle = poller.start();
//!
//!     poller.request_connect().await;
//!     println!("{}", poller.state().connection);
//!
//!     handle.stop();
//! }
//! ```

pub mod command;
pub mod error;
pub mod poller;
pub mod state;
pub mod status;
pub mod tracing;

pub use command::{BoxFuture, CommandOutput, CommandRunner, WarpCli, WarpCommand};
pub use error::{StatusError, StatusResult};
pub use poller::{ActionOutcome, PollerConfig, PollerHandle, StatusPoller};
pub use state::{ToggleObserver, ToggleState};
pub use status::{CONNECTED_MARKER, ConnectionState, parse_status};
pub use self::tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
