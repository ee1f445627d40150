//! Load Reddit API credentials from a YAML configuration file and construct a read-only Reddit API
//! client with them.

#[doc(hidden)]
mod config;
#[doc(hidden)]
mod error;
#[doc(hidden)]
mod loader;
pub mod paths;
pub mod reddit_api;

pub use config::{ConfigKey, Credentials};
pub use error::Error;
pub use loader::*;
