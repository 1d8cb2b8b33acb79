//! Client for the OpenDigger static metric host.
//!
//! Each repository publishes one JSON file per metric under
//! `{base_url}/{platform}/{org}/{repo}/`. This crate fetches those files with
//! retry and short-lived caching, and decodes them into [`timeseries`] types.
//!
//! Events are emitted through `tracing`; the embedding application installs
//! the subscriber.

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod metric;
pub mod payload;
pub mod project;
pub mod retry;

pub use cache::TtlCache;
pub use client::{OpenDiggerClient, ProjectCache, ProjectMetrics};
pub use config::ClientConfig;
pub use error::FetchError;
pub use metric::Metric;
pub use payload::{
    ProjectLabel, ProjectMeta, decode_heatmap, decode_meta, decode_metric, decode_series,
};
pub use project::{Platform, ProjectRef};
pub use retry::RetryPolicy;
