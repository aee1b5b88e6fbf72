// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Record instances with per-field storage.

use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::shape::Shape;
use crate::value::FieldValue;

/// Live instance of a [`Shape`]: one value slot per declared field.
///
/// Records are plain values. Cloning copies the slots, and there is no
/// internal synchronization; sharing one record across threads requires
/// external coordination. The shape itself is freely shared.
#[derive(Clone)]
pub struct Record {
    shape: Arc<Shape>,
    slots: Vec<FieldValue>,
}

impl Record {
    /// Create a record with every field at its kind's default value.
    pub fn new(shape: &Arc<Shape>) -> Self {
        let slots = shape
            .fields()
            .iter()
            .map(|slot| slot.kind().default_value())
            .collect();
        Self {
            shape: Arc::clone(shape),
            slots,
        }
    }

    /// Create a record from named initial values.
    ///
    /// Matching is by name only: pairs may arrive in any order and may cover
    /// any subset of the declared fields; uncovered fields keep their
    /// defaults. A name not declared on the shape fails with
    /// [`Error::FieldNotFound`]; a value of the wrong kind fails with
    /// [`Error::TypeMismatch`].
    pub fn with_values(shape: &Arc<Shape>, values: &[(&str, FieldValue)]) -> Result<Self> {
        let mut record = Self::new(shape);
        for (name, value) in values {
            record.set(name, value.clone())?;
        }
        Ok(record)
    }

    /// The shape this record instantiates.
    pub fn shape(&self) -> &Arc<Shape> {
        &self.shape
    }

    /// The shape's display label.
    pub fn label(&self) -> &str {
        self.shape.label()
    }

    /// Get a field value by name, converted to a concrete type.
    pub fn get<T: FromFieldValue>(&self, name: &str) -> Result<T> {
        T::from_field(self.get_field(name)?)
    }

    /// Get a field value by name.
    pub fn get_field(&self, name: &str) -> Result<&FieldValue> {
        let index = self
            .shape
            .field_index(name)
            .ok_or_else(|| Error::FieldNotFound(name.to_string()))?;
        Ok(&self.slots[index])
    }

    /// Set a field value by name.
    ///
    /// The value's kind must match the declared field kind; a slot never
    /// changes kind after generation.
    pub fn set<T: IntoFieldValue>(&mut self, name: &str, value: T) -> Result<()> {
        let index = self
            .shape
            .field_index(name)
            .ok_or_else(|| Error::FieldNotFound(name.to_string()))?;
        let declared = self.shape.fields()[index].kind();

        let value = value.into_field();
        if value.kind() != declared {
            return Err(Error::TypeMismatch {
                expected: declared.name().to_string(),
                got: value.kind().name().to_string(),
            });
        }

        self.slots[index] = value;
        Ok(())
    }

    /// Invoke a declared operation by name.
    ///
    /// Arguments are checked against the declared parameter list before
    /// dispatch: a count mismatch fails with [`Error::ArityMismatch`], a
    /// kind mismatch with [`Error::TypeMismatch`]. Operations without a
    /// custom body run their generated stub. `None` means void.
    pub fn invoke(&mut self, name: &str, args: &[FieldValue]) -> Result<Option<FieldValue>> {
        let shape = Arc::clone(&self.shape);
        let spec = shape
            .operation(name)
            .ok_or_else(|| Error::OperationNotFound(name.to_string()))?;

        if args.len() != spec.params.len() {
            return Err(Error::ArityMismatch {
                operation: name.to_string(),
                expected: spec.params.len(),
                got: args.len(),
            });
        }
        for (param, arg) in spec.params.iter().zip(args) {
            if arg.kind() != *param {
                return Err(Error::TypeMismatch {
                    expected: param.name().to_string(),
                    got: arg.kind().name().to_string(),
                });
            }
        }

        match &spec.body {
            Some(body) => body(self, args),
            None => Ok(spec.stub_result()),
        }
    }

    /// 64-bit structural hash: XOR fold of slot content hashes, seeded at
    /// zero. Equal records always hash equal.
    pub fn content_hash(&self) -> u64 {
        self.slots
            .iter()
            .fold(0u64, |acc, value| acc ^ value.content_hash())
    }

    /// Iterate (name, value) pairs in declared order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.shape
            .fields()
            .iter()
            .zip(&self.slots)
            .map(|(slot, value)| (slot.name(), value))
    }
}

impl PartialEq for Record {
    /// Structural equality: same shape allocation, then pairwise slot
    /// comparison in declared order, stopping at the first mismatch.
    fn eq(&self, other: &Self) -> bool {
        if !Arc::ptr_eq(&self.shape, &other.shape) {
            return false;
        }
        self.slots.iter().zip(&other.slots).all(|(a, b)| a == b)
    }
}

impl fmt::Display for Record {
    /// Renders `[name=value, ...]` in declared order. Diagnostics only;
    /// values print raw, strings without quotes.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (pos, (name, value)) in self.fields().enumerate() {
            if pos > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", name, value)?;
        }
        f.write_str("]")
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("shape", &self.shape.label())
            .field("slots", &self.slots)
            .finish()
    }
}

/// Trait for converting a borrowed [`FieldValue`] into a concrete type.
pub trait FromFieldValue: Sized {
    /// Convert, failing with [`Error::TypeMismatch`] on the wrong variant.
    fn from_field(value: &FieldValue) -> Result<Self>;
}

/// Trait for converting a concrete type into a [`FieldValue`].
pub trait IntoFieldValue {
    /// Wrap the value in its tagged variant.
    fn into_field(self) -> FieldValue;
}

// Implement FromFieldValue for primitives
macro_rules! impl_from_field {
    ($ty:ty, $variant:ident, $name:expr) => {
        impl FromFieldValue for $ty {
            fn from_field(value: &FieldValue) -> Result<Self> {
                match value {
                    FieldValue::$variant(v) => Ok(*v),
                    other => Err(Error::TypeMismatch {
                        expected: $name.to_string(),
                        got: other.kind().name().to_string(),
                    }),
                }
            }
        }
    };
}

impl_from_field!(bool, Bool, "bool");
impl_from_field!(u8, U8, "u8");
impl_from_field!(u16, U16, "u16");
impl_from_field!(u32, U32, "u32");
impl_from_field!(u64, U64, "u64");
impl_from_field!(i8, I8, "i8");
impl_from_field!(i16, I16, "i16");
impl_from_field!(i32, I32, "i32");
impl_from_field!(i64, I64, "i64");
impl_from_field!(f32, F32, "f32");
impl_from_field!(f64, F64, "f64");
impl_from_field!(char, Char, "char");

impl FromFieldValue for String {
    fn from_field(value: &FieldValue) -> Result<Self> {
        match value {
            FieldValue::Str(s) => Ok(s.clone()),
            other => Err(Error::TypeMismatch {
                expected: "str".to_string(),
                got: other.kind().name().to_string(),
            }),
        }
    }
}

// Implement IntoFieldValue for primitives
macro_rules! impl_into_field {
    ($ty:ty, $variant:ident) => {
        impl IntoFieldValue for $ty {
            fn into_field(self) -> FieldValue {
                FieldValue::$variant(self)
            }
        }
    };
}

impl_into_field!(bool, Bool);
impl_into_field!(u8, U8);
impl_into_field!(u16, U16);
impl_into_field!(u32, U32);
impl_into_field!(u64, U64);
impl_into_field!(i8, I8);
impl_into_field!(i16, I16);
impl_into_field!(i32, I32);
impl_into_field!(i64, I64);
impl_into_field!(f32, F32);
impl_into_field!(f64, F64);
impl_into_field!(char, Char);

impl IntoFieldValue for String {
    fn into_field(self) -> FieldValue {
        FieldValue::Str(self)
    }
}

impl IntoFieldValue for &str {
    fn into_field(self) -> FieldValue {
        FieldValue::Str(self.to_string())
    }
}

impl IntoFieldValue for FieldValue {
    fn into_field(self) -> FieldValue {
        self
    }
}
