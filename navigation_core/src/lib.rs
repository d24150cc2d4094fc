//! # Navigation Core
//!
//! The relationship graph and the navigation game built on top of it. This
//! crate reads records from `character_catalog`, scores every pair of
//! characters into a weighted undirected graph, and lets players walk that
//! graph from an initial to a destination character.
//!
//! ## Core Components
//!
//! - **relationship_graph**: Graph construction, ranked-neighbor queries and GML export
//! - **session**: The per-player navigation state machine
//! - **service**: Concurrent sessions over one shared graph
//! - **config** / **logging**: TOML configuration and tracing setup
//!
//! ## Design Philosophy
//!
//! - **Build Once, Read Many**: The graph is immutable after construction and shared via `Arc`
//! - **Tunable**: Relation weights and exclusions come from configuration, not code

pub mod config;
pub mod error;
pub mod logging;
pub mod relationship_graph;
pub mod service;
pub mod session;

pub use config::NavigatorConfig;
pub use error::{ConfigError, QueryError, ServiceError, SessionError};
pub use relationship_graph::*;
pub use service::*;
pub use session::*;
