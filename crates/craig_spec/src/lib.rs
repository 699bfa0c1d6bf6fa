//! # craig_spec
//!
//! Configuration model, loading and validation for CRAIG.
//!
//! A CRAIG configuration is a single JSON (or YAML) document describing an
//! IBM Cloud environment: global `_options` plus named collections of
//! resource groups, key management, object storage, VPCs, VSIs and the
//! services around them. Every cross reference between entities is by name.
//!
//! ## Example
//!
//! ```rust,no_run
//! use craig_spec::{CraigReader, CraigValidator};
//!
//! let craig = CraigReader::read_file("./craig.json").unwrap();
//!
//! let result = CraigValidator::validate(&craig);
//! if !result.valid {
//!     for error in &result.errors {
//!         eprintln!("Error: {}", error);
//!     }
//! }
//! ```

pub mod error;
pub mod models;
pub mod reader;
pub mod validator;

pub use error::{SpecError, SpecResult};
pub use models::*;
pub use reader::CraigReader;
pub use validator::{CraigValidator, ValidationResult};
