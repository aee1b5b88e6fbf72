// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Process-wide shape cache.
//!
//! The registry interns one [`Shape`] per distinct field [`Signature`].
//! Lookups run under a shared read lock; generation happens under the write
//! lock, guarded by a second probe so that racing creators converge on the
//! first writer's shape and the generator runs at most once per signature.
//!
//! The cache is append-only and unbounded: shapes are never evicted and live
//! for the process lifetime. Lock acquisition blocks without a timeout.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::RwLock;

use crate::error::{Error, Result};
use crate::record::Record;
use crate::shape::{FieldSpec, OperationSpec, Shape};
use crate::signature::Signature;
use crate::value::FieldValue;

/// Cache hit/miss statistics.
#[derive(Debug, Default, Clone, Copy)]
pub struct RegistryStats {
    /// Lookups served from the read-locked fast path.
    pub hits: u64,
    /// Lookups that generated a new shape.
    pub misses: u64,
    /// Lookups that lost the write race and reused the winner's shape.
    pub race_reuses: u64,
    /// Duration of the most recent generation, in nanoseconds.
    pub last_build_ns: u64,
}

/// Concurrent, append-only cache of generated shapes.
pub struct ShapeRegistry {
    shapes: RwLock<HashMap<Signature, Arc<Shape>>>,
    labels: DashMap<Arc<str>, Signature>,
    stats: RwLock<RegistryStats>,
}

impl ShapeRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            shapes: RwLock::new(HashMap::new()),
            labels: DashMap::new(),
            stats: RwLock::new(RegistryStats::default()),
        }
    }

    /// Get the process-wide registry instance.
    pub fn global() -> &'static ShapeRegistry {
        use std::sync::OnceLock;
        static REGISTRY: OnceLock<ShapeRegistry> = OnceLock::new();
        REGISTRY.get_or_init(ShapeRegistry::new)
    }

    /// Look up or generate the shape for an ordered field list.
    ///
    /// The `label` is a display tag only: requests under different labels
    /// with identical fields resolve to one cached shape carrying the first
    /// creator's label. Operations do not participate in identity either; on
    /// a hit the cached shape's operation table stays as generated.
    ///
    /// A failed generation inserts nothing, so a later request with a valid
    /// list for the same signature still generates.
    pub fn get_or_create(
        &self,
        label: &str,
        fields: &[FieldSpec],
        operations: &[OperationSpec],
    ) -> Result<Arc<Shape>> {
        if label.is_empty() {
            return Err(Error::InvalidArgument(
                "shape label must not be empty".to_string(),
            ));
        }

        let signature = Signature::derive(fields);

        if let Some(hit) = self.try_peek(&signature) {
            self.record_hit();
            return Ok(hit);
        }

        let mut shapes = self.shapes.write();
        // Second probe: a racing creator may have inserted while this thread
        // waited for the write lock. First writer wins; later arrivals reuse.
        if let Some(hit) = shapes.get(&signature) {
            self.record_race_reuse();
            log::debug!(
                "[ShapeRegistry] Signature raced for '{}'; reusing shape '{}'",
                label,
                hit.label()
            );
            return Ok(Arc::clone(hit));
        }

        let start = Instant::now();
        let built = Arc::new(Shape::generate(label, fields, operations)?);
        shapes.insert(signature.clone(), Arc::clone(&built));
        drop(shapes);

        self.record_miss(start);
        self.record_label(label, &signature);
        log::info!(
            "[ShapeRegistry] Generated shape '{}' ({} fields, {} operations)",
            label,
            built.field_count(),
            built.operations().len()
        );
        Ok(built)
    }

    /// Probe for an existing shape without creating one.
    pub fn lookup(&self, fields: &[FieldSpec]) -> Option<Arc<Shape>> {
        let signature = Signature::derive(fields);
        self.try_peek(&signature)
    }

    /// Resolve a label recorded at creation time to its cached shape.
    ///
    /// Labels bind first-wins and never affect identity; this is a
    /// diagnostics lookup.
    pub fn find_by_label(&self, label: &str) -> Option<Arc<Shape>> {
        let signature = self.labels.get(label).map(|entry| entry.value().clone())?;
        let shapes = self.shapes.read();
        shapes.get(&signature).map(Arc::clone)
    }

    /// Number of cached shapes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.read().len()
    }

    /// True when nothing has been generated yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.read().is_empty()
    }

    /// Snapshot of the lookup statistics.
    #[must_use]
    pub fn stats(&self) -> RegistryStats {
        *self.stats.read()
    }

    /// Generate (or reuse) a shape and instantiate it with default values.
    pub fn create_instance(
        &self,
        label: &str,
        fields: &[FieldSpec],
        operations: &[OperationSpec],
    ) -> Result<Record> {
        let shape = self.get_or_create(label, fields, operations)?;
        Ok(Record::new(&shape))
    }

    /// Generate (or reuse) a shape from initial values and instantiate it.
    ///
    /// Field kinds are taken from the supplied values in order; the values
    /// are then assigned by name.
    pub fn create_instance_with_values(
        &self,
        label: &str,
        values: &[(&str, FieldValue)],
        operations: &[OperationSpec],
    ) -> Result<Record> {
        let fields: Vec<FieldSpec> = values
            .iter()
            .map(|(name, value)| FieldSpec::new(*name, value.kind()))
            .collect();
        let shape = self.get_or_create(label, &fields, operations)?;
        Record::with_values(&shape, values)
    }

    fn try_peek(&self, signature: &Signature) -> Option<Arc<Shape>> {
        let shapes = self.shapes.read();
        shapes.get(signature).map(Arc::clone)
    }

    fn record_label(&self, label: &str, signature: &Signature) {
        match self.labels.entry(Arc::from(label)) {
            Entry::Occupied(existing) => {
                if existing.get() != signature {
                    log::debug!(
                        "[ShapeRegistry] Label '{}' already names a different signature; keeping the first binding",
                        label
                    );
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(signature.clone());
            }
        }
    }

    fn record_hit(&self) {
        let mut stats = self.stats.write();
        stats.hits = stats.hits.saturating_add(1);
    }

    fn record_race_reuse(&self) {
        let mut stats = self.stats.write();
        stats.race_reuses = stats.race_reuses.saturating_add(1);
    }

    fn record_miss(&self, start: Instant) {
        let mut stats = self.stats.write();
        stats.misses = stats.misses.saturating_add(1);
        stats.last_build_ns = start.elapsed().as_nanos() as u64;
    }
}

impl Default for ShapeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ShapeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShapeRegistry")
            .field("shapes", &self.len())
            .field("labels", &self.labels.len())
            .finish()
    }
}
