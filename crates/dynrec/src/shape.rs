// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Shape descriptors and generation.
//!
//! A [`Shape`] is the generated description of one distinct field signature:
//! ordered slots, an operation table, and the owning [`Signature`]. Shapes
//! are built by the registry, shared behind `Arc`, and never mutated, so a
//! cached shape can be handed to any number of threads.

use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::record::Record;
use crate::signature::Signature;
use crate::value::{FieldKind, FieldValue};

/// Declares one named, typed field of a shape request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    /// Field name, unique within the request.
    pub name: String,
    /// Declared kind.
    pub kind: FieldKind,
}

impl FieldSpec {
    /// Create a field declaration.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Shared handler for a custom operation body.
///
/// Receives the target record and the arity- and kind-checked arguments;
/// returns the operation result (`None` for void).
pub type OperationBody =
    Arc<dyn Fn(&mut Record, &[FieldValue]) -> Result<Option<FieldValue>> + Send + Sync>;

/// Declares one named operation of a shape request.
///
/// Without a body the generated operation is a stub whose behavior follows
/// from the declared return and parameter lists alone.
#[derive(Clone)]
pub struct OperationSpec {
    /// Operation name, unique within the request.
    pub name: String,
    /// Declared parameter kinds (may be empty).
    pub params: Vec<FieldKind>,
    /// Declared return kind; `None` is void.
    pub returns: Option<FieldKind>,
    /// Custom body; `None` selects stub behavior.
    pub body: Option<OperationBody>,
}

impl OperationSpec {
    /// Void, parameterless operation with stub behavior.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            returns: None,
            body: None,
        }
    }

    /// Declare parameter kinds, replacing any previous list.
    pub fn with_params(mut self, params: &[FieldKind]) -> Self {
        self.params = params.to_vec();
        self
    }

    /// Declare the return kind. A stub returns its default value.
    pub fn returning(mut self, kind: FieldKind) -> Self {
        self.returns = Some(kind);
        self
    }

    /// Attach a custom body, replacing stub behavior entirely.
    pub fn with_body<F>(mut self, body: F) -> Self
    where
        F: Fn(&mut Record, &[FieldValue]) -> Result<Option<FieldValue>> + Send + Sync + 'static,
    {
        self.body = Some(Arc::new(body));
        self
    }

    /// Stub result for a body-less operation.
    ///
    /// One arm per (return, parameters) case. Arguments were already
    /// checked by the dispatcher; stubs accept and ignore them, never
    /// echoing an argument back.
    pub(crate) fn stub_result(&self) -> Option<FieldValue> {
        match (self.returns, self.params.is_empty()) {
            // Return declared, parameters declared: ignore args, return default.
            (Some(kind), false) => Some(kind.default_value()),
            // Return declared, no parameters: return default.
            (Some(kind), true) => Some(kind.default_value()),
            // Void with parameters: ignore args, produce nothing.
            (None, false) => None,
            // Void, no parameters: pure no-op.
            (None, true) => None,
        }
    }
}

impl fmt::Debug for OperationSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationSpec")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("returns", &self.returns)
            .field("has_body", &self.body.is_some())
            .finish()
    }
}

/// One field slot of a generated shape: name, kind, and storage index.
#[derive(Debug, Clone)]
pub struct FieldSlot {
    name: Arc<str>,
    kind: FieldKind,
    index: usize,
}

impl FieldSlot {
    /// Declared field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared field kind.
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Storage index, equal to the declaration position.
    pub fn index(&self) -> usize {
        self.index
    }
}

/// Generated, immutable descriptor for one distinct field signature.
///
/// Records hold their shape behind `Arc`; two records compare equal only
/// when they share the same shape allocation, which the registry guarantees
/// for equal signatures.
#[derive(Debug)]
pub struct Shape {
    label: Arc<str>,
    fields: Vec<FieldSlot>,
    operations: Vec<OperationSpec>,
    signature: Signature,
}

impl Shape {
    /// Validate a request and lay out the shape.
    ///
    /// Fails with [`Error::InvalidArgument`] on an empty or duplicate field
    /// name, or an empty or duplicate operation name. Interning is the
    /// registry's job; this never touches any cache.
    pub(crate) fn generate(
        label: &str,
        fields: &[FieldSpec],
        operations: &[OperationSpec],
    ) -> Result<Self> {
        for (pos, spec) in fields.iter().enumerate() {
            if spec.name.is_empty() {
                return Err(Error::InvalidArgument(format!(
                    "field at position {} has an empty name",
                    pos
                )));
            }
            if fields[..pos].iter().any(|prior| prior.name == spec.name) {
                return Err(Error::InvalidArgument(format!(
                    "duplicate field name: {}",
                    spec.name
                )));
            }
        }

        for (pos, op) in operations.iter().enumerate() {
            if op.name.is_empty() {
                return Err(Error::InvalidArgument(format!(
                    "operation at position {} has an empty name",
                    pos
                )));
            }
            if operations[..pos].iter().any(|prior| prior.name == op.name) {
                return Err(Error::InvalidArgument(format!(
                    "duplicate operation name: {}",
                    op.name
                )));
            }
        }

        let slots = fields
            .iter()
            .enumerate()
            .map(|(index, spec)| FieldSlot {
                name: Arc::from(spec.name.as_str()),
                kind: spec.kind,
                index,
            })
            .collect();

        Ok(Self {
            label: Arc::from(label),
            fields: slots,
            operations: operations.to_vec(),
            signature: Signature::derive(fields),
        })
    }

    /// Display label. Not part of shape identity.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Owning signature.
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Field slots in declared order.
    pub fn fields(&self) -> &[FieldSlot] {
        &self.fields
    }

    /// Number of declared fields.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Find a field slot by name.
    pub fn field(&self, name: &str) -> Option<&FieldSlot> {
        self.fields.iter().find(|slot| &*slot.name == name)
    }

    /// Find a field's storage index by name.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|slot| &*slot.name == name)
    }

    /// Declared operations.
    pub fn operations(&self) -> &[OperationSpec] {
        &self.operations
    }

    /// Find an operation by name.
    pub fn operation(&self, name: &str) -> Option<&OperationSpec> {
        self.operations.iter().find(|op| op.name == name)
    }
}
