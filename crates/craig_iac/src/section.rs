//! Formatter output shared by the HCL and CDKTF renderers.
//!
//! Formatters build attribute trees once; both renderers consume the same
//! `Emission` values, so the two outputs cannot drift apart.

use serde_json::{Map, Value};

use crate::hcl::{json_to_tf_print, tf_block};
use crate::refs::BlockKind;

/// Canonical address plus attribute tree of one block.
#[derive(Debug, Clone, PartialEq)]
pub struct Formatted {
    pub name: String,
    pub data: Map<String, Value>,
}

/// A formatted block tagged with its block kind and Terraform type.
#[derive(Debug, Clone, PartialEq)]
pub struct Emission {
    pub kind: BlockKind,
    pub tf_type: &'static str,
    pub name: String,
    pub data: Map<String, Value>,
}

impl Emission {
    /// Create a new emission from formatter output.
    pub fn new(kind: BlockKind, tf_type: &'static str, formatted: Formatted) -> Self {
        Self {
            kind,
            tf_type,
            name: formatted.name,
            data: formatted.data,
        }
    }

    pub fn resource(tf_type: &'static str, formatted: Formatted) -> Self {
        Self::new(BlockKind::Resource, tf_type, formatted)
    }

    pub fn to_hcl(&self) -> String {
        json_to_tf_print(self.kind, self.tf_type, &self.name, &self.data)
    }
}

/// A titled group of emissions, rendered as one banner block in HCL.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub title: String,
    pub emissions: Vec<Emission>,
}

impl Section {
    /// Create a new empty section.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            emissions: Vec::new(),
        }
    }

    pub fn push(&mut self, kind: BlockKind, tf_type: &'static str, formatted: Formatted) {
        self.emissions.push(Emission::new(kind, tf_type, formatted));
    }

    pub fn resource(&mut self, tf_type: &'static str, formatted: Formatted) {
        self.push(BlockKind::Resource, tf_type, formatted);
    }

    pub fn is_empty(&self) -> bool {
        self.emissions.is_empty()
    }

    pub fn to_hcl(&self) -> String {
        let body: Vec<String> = self.emissions.iter().map(Emission::to_hcl).collect();
        tf_block(&self.title, &body.join("\n"))
    }
}
