//! Transaction-event relay
//!
//! Given a blockchain transaction identifier, fetch its execution trace from
//! the trace provider, extract occurrences of one configured event type from
//! the decoded logs, enrich with contract metadata, and forward a normalized
//! JSON payload to a single downstream webhook.
//!
//! One invocation per transaction notification; no loop, no queue, no
//! persisted state. The two shipped binaries differ only in payload shape
//! and webhook authorization:
//!
//! - `relay` sends `{contractName, addresses, events, traceData}` with no
//!   authorization header.
//! - `sentinel-relay` sends the richer sentinel payload and authorizes
//!   against the webhook with the bearer token.
//!
//! # Example
//!
//! ```rust,no_run
//! use trace_relay::{run_basic, Secrets, TransactionTrigger};
//!
//! #[tokio::main]
//! async fn main() -> trace_relay::Result<()> {
//!     let secrets = Secrets::from_env()?;
//!     let trigger = TransactionTrigger::from_json(
//!         r#"{"hash": "0xabc...", "network": "1"}"#,
//!     )?;
//!
//!     let report = run_basic(&trigger, &secrets).await?;
//!     println!("delivered: {}", report.delivered);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod extract;
pub mod relay;
pub mod types;
pub mod webhook;

pub use client::TraceApiClient;
pub use config::Secrets;
pub use error::{RelayError, Result};
pub use relay::{run_basic, run_sentinel};
pub use types::{ContractMetadata, RelayReport, Trace, TransactionTrigger};
pub use webhook::WebhookDispatcher;
