//! `jrquery` - query a remote issue tracker from the command line.
//!
//! The crate is split into a pure query builder ([`query`]), a pagination
//! engine over an abstract search service ([`client`]), and the CLI shell
//! around them ([`cli`], [`config`], [`format`]).

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod model;
pub mod query;

pub use error::{ErrorCode, JrqueryError, RemoteServiceError, Result, StructuredError};
