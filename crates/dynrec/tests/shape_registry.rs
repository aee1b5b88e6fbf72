// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Shape registry integration tests
//!
//! Exercises interning, record workflows, and concurrent generation through
//! the public API.

use std::sync::{Arc, Barrier};
use std::thread;

use dynrec::{
    Error, FieldKind, FieldSpec, FieldValue, OperationSpec, Record, ShapeBuilder, ShapeRegistry,
};

fn telemetry_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::new("source", FieldKind::Str),
        FieldSpec::new("sequence", FieldKind::U64),
        FieldSpec::new("value", FieldKind::F64),
    ]
}

#[test]
fn test_same_signature_shares_one_shape() {
    let registry = ShapeRegistry::new();

    let first = registry
        .get_or_create("Telemetry", &telemetry_fields(), &[])
        .expect("Failed to create shape");
    let second = registry
        .get_or_create("TelemetryCopy", &telemetry_fields(), &[])
        .expect("Failed to create shape");

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.label(), "Telemetry");
    assert_eq!(registry.len(), 1);

    let stats = registry.stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 1);
}

#[test]
fn test_field_order_separates_shapes() {
    let registry = ShapeRegistry::new();

    let forward = registry
        .get_or_create("Forward", &telemetry_fields(), &[])
        .expect("Failed to create shape");

    let mut reversed = telemetry_fields();
    reversed.reverse();
    let backward = registry
        .get_or_create("Backward", &reversed, &[])
        .expect("Failed to create shape");

    assert!(!Arc::ptr_eq(&forward, &backward));
    assert_eq!(registry.len(), 2);
}

#[test]
fn test_record_round_trip() {
    let registry = ShapeRegistry::new();
    let shape = ShapeBuilder::new("Telemetry")
        .field("source", FieldKind::Str)
        .field("sequence", FieldKind::U64)
        .field("value", FieldKind::F64)
        .build(&registry)
        .expect("Failed to build shape");

    let mut sample = Record::new(&shape);
    sample.set("source", "probe-3").expect("Failed to set source");
    sample.set("sequence", 17u64).expect("Failed to set sequence");
    sample.set("value", 0.5f64).expect("Failed to set value");

    assert_eq!(
        sample.get::<String>("source").expect("Failed to get source"),
        "probe-3"
    );
    assert_eq!(sample.to_string(), "[source=probe-3, sequence=17, value=0.5]");

    let twin = Record::with_values(
        &shape,
        &[
            ("value", FieldValue::F64(0.5)),
            ("sequence", FieldValue::U64(17)),
            ("source", FieldValue::from("probe-3")),
        ],
    )
    .expect("Failed to build record from values");
    assert_eq!(sample, twin);
    assert_eq!(sample.content_hash(), twin.content_hash());
}

#[test]
fn test_operations_through_public_api() {
    let registry = ShapeRegistry::new();
    let shape = ShapeBuilder::new("Odometer")
        .field("km", FieldKind::U64)
        .operation(
            OperationSpec::new("advance")
                .with_params(&[FieldKind::U64])
                .returning(FieldKind::U64)
                .with_body(|record, args| {
                    let delta = args[0].as_u64().unwrap_or(0);
                    let next = record.get::<u64>("km")? + delta;
                    record.set("km", next)?;
                    Ok(Some(FieldValue::U64(next)))
                }),
        )
        .operation(OperationSpec::new("service_due").returning(FieldKind::Bool))
        .build(&registry)
        .expect("Failed to build shape");

    let mut odo = Record::new(&shape);
    odo.invoke("advance", &[FieldValue::U64(120)])
        .expect("Failed to invoke advance");
    assert_eq!(odo.get::<u64>("km").expect("Failed to get km"), 120);

    // Stub: declared return kind's default, arguments-free.
    assert_eq!(
        odo.invoke("service_due", &[])
            .expect("Failed to invoke service_due"),
        Some(FieldValue::Bool(false))
    );
}

#[test]
fn test_invalid_requests_surface_errors() {
    let registry = ShapeRegistry::new();

    let duplicate = registry.get_or_create(
        "Broken",
        &[
            FieldSpec::new("x", FieldKind::I32),
            FieldSpec::new("x", FieldKind::F64),
        ],
        &[],
    );
    assert!(matches!(duplicate, Err(Error::InvalidArgument(_))));
    assert!(registry.is_empty());

    let shape = registry
        .get_or_create("Point", &[FieldSpec::new("x", FieldKind::I32)], &[])
        .expect("Failed to create shape");
    let unknown = Record::with_values(&shape, &[("y", FieldValue::I32(1))]);
    assert!(matches!(unknown, Err(Error::FieldNotFound(_))));
}

#[test]
fn test_concurrent_creation_generates_once() {
    const THREADS: usize = 8;

    let registry = Arc::new(ShapeRegistry::new());
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let registry = Arc::clone(&registry);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                registry
                    .get_or_create("Burst", &telemetry_fields(), &[])
                    .expect("Failed to create shape")
            })
        })
        .collect();

    let shapes: Vec<_> = handles
        .into_iter()
        .map(|handle| handle.join().expect("Worker thread panicked"))
        .collect();

    for shape in &shapes[1..] {
        assert!(Arc::ptr_eq(&shapes[0], shape));
    }
    assert_eq!(registry.len(), 1);

    let stats = registry.stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits + stats.race_reuses, (THREADS - 1) as u64);
}

#[test]
fn test_global_registry_serves_all_threads() {
    const THREADS: usize = 4;

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            thread::spawn(|| {
                dynrec::create_instance(
                    "SharedProbe",
                    &[
                        FieldSpec::new("itest_probe_id", FieldKind::U32),
                        FieldSpec::new("itest_probe_origin", FieldKind::Str),
                    ],
                    &[],
                )
                .expect("Failed to create instance")
            })
        })
        .collect();

    let records: Vec<_> = handles
        .into_iter()
        .map(|handle| handle.join().expect("Worker thread panicked"))
        .collect();

    for record in &records[1..] {
        assert!(Arc::ptr_eq(records[0].shape(), record.shape()));
    }
}
