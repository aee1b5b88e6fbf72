// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Integration tests across the crate surface.

use super::*;
use std::sync::Arc;

#[test]
fn test_full_workflow() {
    let registry = ShapeRegistry::new();

    // 1. Describe the shape at runtime
    let shape = ShapeBuilder::new("SensorReading")
        .field("sensor_id", FieldKind::U32)
        .field("temperature", FieldKind::F64)
        .field("online", FieldKind::Bool)
        .field("location", FieldKind::Str)
        .build(&registry)
        .expect("build");

    // 2. Create and populate a record
    let mut reading = Record::new(&shape);
    reading.set("sensor_id", 42u32).expect("set sensor_id");
    reading.set("temperature", 23.5f64).expect("set temperature");
    reading.set("online", true).expect("set online");
    reading.set("location", "Building A").expect("set location");

    // 3. Verify typed access
    assert_eq!(reading.get::<u32>("sensor_id").unwrap(), 42);
    assert_eq!(reading.get::<f64>("temperature").unwrap(), 23.5);
    assert!(reading.get::<bool>("online").unwrap());
    assert_eq!(reading.get::<String>("location").unwrap(), "Building A");

    // 4. Structural equality against an identically populated record
    let twin = Record::with_values(
        &shape,
        &[
            ("sensor_id", FieldValue::U32(42)),
            ("temperature", FieldValue::F64(23.5)),
            ("online", FieldValue::Bool(true)),
            ("location", FieldValue::from("Building A")),
        ],
    )
    .expect("with_values");
    assert_eq!(reading, twin);
    assert_eq!(reading.content_hash(), twin.content_hash());

    // 5. Human-readable rendering in declared order
    assert_eq!(
        reading.to_string(),
        "[sensor_id=42, temperature=23.5, online=true, location=Building A]"
    );

    // 6. The same field list resolves to the same generated shape
    let again = ShapeBuilder::new("RenamedReading")
        .field("sensor_id", FieldKind::U32)
        .field("temperature", FieldKind::F64)
        .field("online", FieldKind::Bool)
        .field("location", FieldKind::Str)
        .build(&registry)
        .expect("build");
    assert!(Arc::ptr_eq(&shape, &again));
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_operations_end_to_end() {
    let registry = ShapeRegistry::new();
    let shape = ShapeBuilder::new("Tank")
        .field("level", FieldKind::F64)
        .operation(
            OperationSpec::new("fill")
                .with_params(&[FieldKind::F64])
                .returning(FieldKind::F64)
                .with_body(|record, args| {
                    let delta = args[0].as_f64().unwrap_or(0.0);
                    let next = record.get::<f64>("level")? + delta;
                    record.set("level", next)?;
                    Ok(Some(FieldValue::F64(next)))
                }),
        )
        .operation(OperationSpec::new("capacity").returning(FieldKind::F64))
        .build(&registry)
        .expect("build");

    let mut tank = Record::new(&shape);

    // Custom body reads and writes record state
    assert_eq!(
        tank.invoke("fill", &[FieldValue::F64(0.75)])
            .expect("invoke fill"),
        Some(FieldValue::F64(0.75))
    );
    assert_eq!(tank.get::<f64>("level").expect("get level"), 0.75);

    // Body-less operation falls back to its stub
    assert_eq!(
        tank.invoke("capacity", &[]).expect("invoke capacity"),
        Some(FieldValue::F64(0.0))
    );
}

#[test]
fn test_create_instance_via_global_registry() {
    let fields = [
        FieldSpec::new("agent_uptime_s", FieldKind::U64),
        FieldSpec::new("agent_node", FieldKind::Str),
    ];
    let mut status = create_instance("AgentStatus", &fields, &[]).expect("create_instance");
    assert_eq!(status.label(), "AgentStatus");
    assert_eq!(status.get::<u64>("agent_uptime_s").expect("get"), 0);
    status.set("agent_node", "edge-7").expect("set agent_node");

    // Same signature resolves to the interned shape, label included.
    let renamed = create_instance("AgentStatusV2", &fields, &[]).expect("create_instance");
    assert!(Arc::ptr_eq(status.shape(), renamed.shape()));
    assert_eq!(renamed.label(), "AgentStatus");
}

#[test]
fn test_create_instance_with_values_via_global_registry() {
    let mut report = create_instance_with_values(
        "BootReport",
        &[
            ("boot_count", FieldValue::U32(3)),
            ("firmware", FieldValue::from("1.4.2")),
        ],
        &[],
    )
    .expect("create_instance_with_values");

    assert_eq!(report.get::<u32>("boot_count").expect("get"), 3);
    assert_eq!(report.get::<String>("firmware").expect("get"), "1.4.2");

    // Kinds derived from the values stay enforced afterwards.
    assert!(matches!(
        report.set("boot_count", "three"),
        Err(Error::TypeMismatch { .. })
    ));
}
