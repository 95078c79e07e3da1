//! Tencent Cloud CVM API client for Rust.
//!
//! This crate provides the request/response plumbing shared by every CVM
//! operation: credential resolution, v1/TC3 request signing, an HTTP
//! transport with retries, uniform envelope decoding, and a typed façade
//! with one pair of methods per action (context-less and
//! context-bearing).
//!
//! # Quick Start
//!
//! ```no_run
//! use rs_tc_cvm::{Client, Credential, DescribeInstancesRequest};
//!
//! # async fn example() -> rs_tc_cvm::Result<()> {
//! let client = Client::new(
//!     Credential::new("your-secret-id", "your-secret-key"),
//!     "ap-guangzhou",
//! )?;
//!
//! let resp = client
//!     .describe_instances(DescribeInstancesRequest {
//!         limit: Some(20),
//!         ..Default::default()
//!     })
//!     .await?;
//!
//! println!("{} instances", resp.total_count.unwrap_or(0));
//! # Ok(())
//! # }
//! ```
//!
//! # Cancellation and deadlines
//!
//! Every action also has a `_ctx` variant taking a [`CallContext`], which
//! carries a cancellation token and an optional deadline covering the
//! whole pipeline, retries included:
//!
//! ```no_run
//! # use std::time::Duration;
//! # use rs_tc_cvm::{CallContext, Client, Credential, DescribeZonesRequest};
//! # async fn example(client: Client) -> rs_tc_cvm::Result<()> {
//! let ctx = CallContext::with_timeout(Duration::from_secs(5));
//! let zones = client.describe_zones_ctx(&ctx, DescribeZonesRequest::default()).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod context;
pub mod credential;
pub mod error;
pub mod models;
pub mod profile;

mod request;
mod response;
mod retry;
mod sign;
mod transport;

pub use client::{API_VERSION, Client, ClientBuilder, SERVICE};
pub use context::CallContext;
pub use credential::{
    ChainProvider, Credential, CredentialProvider, CredentialSource, EnvProvider, ProfileProvider,
    RefreshableProvider, StaticProvider, TimedCredential,
};
pub use error::{CvmError, Result};
pub use models::*;
pub use profile::{ClientProfile, HttpMethod, Language, RetryPolicy, Scheme, SignMethod};
pub use request::ServiceRequest;

// Compile-time assertions: key types must be Send + Sync for use across tasks.
const _: () = {
    const fn assert_send_sync<T: Send + Sync>() {}
    let _ = assert_send_sync::<Client>;
    let _ = assert_send_sync::<CvmError>;
    let _ = assert_send_sync::<Credential>;
    let _ = assert_send_sync::<CallContext>;
};
