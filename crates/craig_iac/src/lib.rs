//! # craig_iac
//!
//! Terraform generation for CRAIG configurations.
//!
//! Every resource family formats its entities once into `Section`s of
//! `Emission`s. The same emissions are rendered two ways: as HCL text with
//! banner comments, and as a CDKTF JSON tree. Each VPC becomes its own
//! Terraform module holding the VPC, its subnets, ACLs and security groups.
//!
//! ## Features
//!
//! - Deterministic HCL and CDKTF output for the same configuration
//! - Resource or data source emission per entity (`use_data`)
//! - Name resolution for every cross reference, failing on unknown names
//! - Ordered file maps ready to be written to disk
//!
//! ## Example
//!
//! ```rust,no_run
//! use craig_spec::CraigReader;
//! use craig_iac::{cdktf_files, hcl_files};
//!
//! let craig = CraigReader::read_file("./craig.json").unwrap();
//!
//! for (path, content) in hcl_files(&craig).unwrap() {
//!     println!("{} ({} bytes)", path, content.len());
//! }
//! let cdktf = cdktf_files(&craig).unwrap();
//! ```

pub mod assembler;
pub mod cdktf;
pub mod error;
pub mod family;
pub mod files;
pub mod hcl;
pub mod naming;
pub mod provider;
pub mod refs;
pub mod resources;
pub mod section;
pub mod terraform;

pub use assembler::{craig_to_cdktf, craig_to_vpc_module_cdktf};
pub use error::{CraigError, CraigResult};
pub use family::{families, family, Family};
pub use files::{cdktf_files, hcl_files, FileMap};
pub use section::{Emission, Formatted, Section};
