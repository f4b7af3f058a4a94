//! Application glue module
//!
//! Configuration shared by the command line tool and library users.

mod config;

pub use config::{Config, ConfigError};
