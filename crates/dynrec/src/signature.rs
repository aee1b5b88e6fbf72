// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Canonical shape signatures.
//!
//! A [`Signature`] identifies a shape by its ordered field list: equality is
//! pairwise over (name, kind) with no sorting or normalization, so the same
//! fields in a different order are a different signature. The display label
//! never participates.
//!
//! The precomputed hash XORs one term per field. XOR is commutative, so two
//! orderings of the same fields share a hash while comparing unequal; the
//! map handles that like any other bucket collision, with equality as the
//! authority.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::shape::FieldSpec;
use crate::value::FieldKind;

/// Order-sensitive cache key derived from a field list.
///
/// Cheap to clone: the field list is shared behind an `Arc`.
#[derive(Clone, Debug, Eq)]
pub struct Signature {
    fields: Arc<[(Arc<str>, FieldKind)]>,
    hash: u64,
}

impl Signature {
    /// Derive the signature for an ordered field list.
    ///
    /// Operations never contribute: two requests with the same fields but
    /// different operation lists resolve to the same signature, and with it
    /// to the same cached shape.
    pub fn derive(fields: &[FieldSpec]) -> Self {
        let mut hash = 0u64;
        let pairs: Vec<(Arc<str>, FieldKind)> = fields
            .iter()
            .map(|spec| {
                hash ^= hash64(spec.name.as_str()) ^ hash64(&spec.kind);
                (Arc::from(spec.name.as_str()), spec.kind)
            })
            .collect();

        Self {
            fields: pairs.into(),
            hash,
        }
    }

    /// Precomputed XOR-folded hash (0 for the empty field list).
    pub fn hash_value(&self) -> u64 {
        self.hash
    }

    /// Number of fields in the signature.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True for the empty field list.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// (name, kind) pairs in declared order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, FieldKind)> {
        self.fields.iter().map(|(name, kind)| (&**name, *kind))
    }
}

impl PartialEq for Signature {
    fn eq(&self, other: &Self) -> bool {
        // Hash inequality is a cheap fast-fail; the field comparison decides.
        self.hash == other.hash && self.fields == other.fields
    }
}

impl Hash for Signature {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

/// Hash one component with the standard hasher.
fn hash64<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}
