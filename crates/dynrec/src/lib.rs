// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # dynrec - Runtime record shapes
//!
//! A registry and generation engine for record-like types described at
//! runtime. Callers submit named, typed fields (and optional operations);
//! the registry generates one immutable [`Shape`] per distinct ordered
//! field signature and hands out shared descriptors. [`Record`] instances
//! carry per-field storage with structural equality, content hashing, and
//! operation dispatch.
//!
//! # Features
//!
//! - **Interning**: equal ordered field lists resolve to the same `Arc<Shape>`,
//!   across threads, for the process lifetime
//! - **Race-free generation**: concurrent first requests for a signature
//!   generate exactly once; losers reuse the winner's shape
//! - **Kind-checked records**: named accessors with runtime kind checking,
//!   structural equality, and a hash consistent with it
//! - **Operations**: custom closure bodies or generated stubs derived from
//!   the declared return and parameter lists
//!
//! # Example
//!
//! ```rust
//! use dynrec::{FieldKind, FieldSpec, Record, ShapeRegistry};
//!
//! let registry = ShapeRegistry::new();
//!
//! // Same ordered field list, one generated shape
//! let fields = [
//!     FieldSpec::new("sensor_id", FieldKind::U32),
//!     FieldSpec::new("temperature", FieldKind::F64),
//! ];
//! let first = registry.get_or_create("SensorReading", &fields, &[]).unwrap();
//! let second = registry.get_or_create("SensorReading", &fields, &[]).unwrap();
//! assert!(std::sync::Arc::ptr_eq(&first, &second));
//!
//! // Records expose named, kind-checked fields
//! let mut reading = Record::new(&first);
//! reading.set("sensor_id", 42u32).unwrap();
//! reading.set("temperature", 23.5f64).unwrap();
//! assert_eq!(reading.get::<f64>("temperature").unwrap(), 23.5);
//! assert_eq!(reading.to_string(), "[sensor_id=42, temperature=23.5]");
//! ```

mod builder;
mod error;
mod record;
mod registry;
mod shape;
mod signature;
mod value;

pub use builder::ShapeBuilder;
pub use error::{Error, Result};
pub use record::{FromFieldValue, IntoFieldValue, Record};
pub use registry::{RegistryStats, ShapeRegistry};
pub use shape::{FieldSlot, FieldSpec, OperationBody, OperationSpec, Shape};
pub use signature::Signature;
pub use value::{FieldKind, FieldValue};

/// Create a default-initialized record through the process-wide registry.
///
/// Convenience wrapper over [`ShapeRegistry::create_instance`] on
/// [`ShapeRegistry::global`].
pub fn create_instance(
    label: &str,
    fields: &[FieldSpec],
    operations: &[OperationSpec],
) -> Result<Record> {
    ShapeRegistry::global().create_instance(label, fields, operations)
}

/// Create a record from named initial values through the process-wide
/// registry. Field kinds derive from the values in order.
///
/// Convenience wrapper over [`ShapeRegistry::create_instance_with_values`]
/// on [`ShapeRegistry::global`].
pub fn create_instance_with_values(
    label: &str,
    values: &[(&str, FieldValue)],
    operations: &[OperationSpec],
) -> Result<Record> {
    ShapeRegistry::global().create_instance_with_values(label, values, operations)
}

#[cfg(test)]
mod tests;
