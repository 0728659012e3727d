//! # Tracker Client
//!
//! Blocking JSON-over-HTTP session for the work-item tracker.
//!
//! [`HttpSession`] implements [`tracker_core::Session`], so it plugs straight
//! into [`tracker_core::WorkItem`]. Rate limits are retried with exponential
//! backoff per [`RetryConfig`], and so are 5xx replies to operations that are
//! safe to repeat (see [`RetryMode`]). Everything else surfaces as
//! [`tracker_types::TrackerError`].
//!
//! ```no_run
//! use std::sync::Arc;
//! use tracker_client::{ClientConfig, HttpSession};
//! use tracker_core::WorkItem;
//!
//! let session = Arc::new(HttpSession::new(ClientConfig::from_env())?);
//! let item = WorkItem::from_id(session, "DEMO", "DEMO-1")?;
//! println!("{item}");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod client;
mod config;
mod error;
mod session;

pub use client::{RetryMode, RpcClient};
pub use config::{ClientConfig, RetryConfig, TIMEOUT_ENV, TOKEN_ENV, URL_ENV};
pub use error::ClientError;
pub use session::HttpSession;
