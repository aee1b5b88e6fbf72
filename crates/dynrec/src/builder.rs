// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fluent builder API for shape requests.

use std::sync::Arc;

use crate::error::Result;
use crate::registry::ShapeRegistry;
use crate::shape::{FieldSpec, OperationSpec, Shape};
use crate::value::FieldKind;

/// Builder collecting a shape request field by field.
///
/// `build` hands the request to a registry, so equal field lists still
/// resolve to one shared shape no matter how they were assembled.
#[derive(Debug, Clone)]
pub struct ShapeBuilder {
    label: String,
    fields: Vec<FieldSpec>,
    operations: Vec<OperationSpec>,
}

impl ShapeBuilder {
    /// Create a new builder with a display label.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            fields: Vec::new(),
            operations: Vec::new(),
        }
    }

    /// Add a field.
    pub fn field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.push(FieldSpec::new(name, kind));
        self
    }

    /// Add an operation.
    pub fn operation(mut self, spec: OperationSpec) -> Self {
        self.operations.push(spec);
        self
    }

    /// Resolve the request against a registry.
    pub fn build(self, registry: &ShapeRegistry) -> Result<Arc<Shape>> {
        registry.get_or_create(&self.label, &self.fields, &self.operations)
    }

    /// Resolve the request against the process-wide registry.
    pub fn build_global(self) -> Result<Arc<Shape>> {
        self.build(ShapeRegistry::global())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;
    use crate::value::FieldValue;

    #[test]
    fn test_builder_round_trip() {
        let registry = ShapeRegistry::new();
        let shape = ShapeBuilder::new("Point3D")
            .field("x", FieldKind::F64)
            .field("y", FieldKind::F64)
            .field("z", FieldKind::F64)
            .build(&registry)
            .expect("build");

        assert_eq!(shape.label(), "Point3D");
        assert_eq!(shape.field_count(), 3);
        assert_eq!(shape.field_index("z"), Some(2));
    }

    #[test]
    fn test_builder_resolves_to_cached_shape() {
        let registry = ShapeRegistry::new();
        let direct = registry
            .get_or_create(
                "Pair",
                &[
                    FieldSpec::new("a", FieldKind::I32),
                    FieldSpec::new("b", FieldKind::I32),
                ],
                &[],
            )
            .expect("direct");

        let via_builder = ShapeBuilder::new("Pair")
            .field("a", FieldKind::I32)
            .field("b", FieldKind::I32)
            .build(&registry)
            .expect("builder");

        assert!(Arc::ptr_eq(&direct, &via_builder));
    }

    #[test]
    fn test_builder_with_operation() {
        let registry = ShapeRegistry::new();
        let shape = ShapeBuilder::new("Tally")
            .field("total", FieldKind::I64)
            .operation(
                OperationSpec::new("bump")
                    .returning(FieldKind::I64)
                    .with_body(|record, _args| {
                        let next = record.get::<i64>("total")? + 1;
                        record.set("total", next)?;
                        Ok(Some(FieldValue::I64(next)))
                    }),
            )
            .build(&registry)
            .expect("build");

        let mut record = Record::new(&shape);
        assert_eq!(
            record.invoke("bump", &[]).expect("invoke"),
            Some(FieldValue::I64(1))
        );
        assert_eq!(record.get::<i64>("total").expect("get"), 1);
    }
}
