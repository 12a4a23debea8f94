//! mtrack Data
//!
//! The collaborators the scan view depends on, as explicit seams:
//! - **DataLayer**: machine catalog snapshot and complaint creation
//! - **AuthContext**: the current signed-in user, if any
//!
//! plus in-process implementations of both ([`InMemoryStore`], [`StaticAuth`]).

#![warn(missing_docs)]

pub mod auth;
pub mod error;
pub mod store;

pub use auth::{AuthContext, StaticAuth};
pub use error::DataError;
pub use store::{DataLayer, InMemoryStore};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
