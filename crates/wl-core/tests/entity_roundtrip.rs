//! Serde roundtrip and JsonSchema validation tests for entity types,
//! including their storage-facing tagged enums.

use chrono::Utc;
use pretty_assertions::assert_eq;
use schemars::schema_for;
use wl_core::entities::*;
use wl_core::enums::*;
use wl_core::history::HistoryRecord;
use wl_core::responses::*;

/// Errors from validating `instance` against a schemars-generated schema.
fn schema_errors(schema: &serde_json::Value, instance: &serde_json::Value) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

macro_rules! roundtrip {
    ($name:ident, $ty:ty, $instance:expr) => {
        #[test]
        fn $name() {
            let val: $ty = $instance;
            let json_str = serde_json::to_string_pretty(&val).unwrap();
            let recovered: $ty = serde_json::from_str(&json_str).unwrap();
            assert_eq!(
                recovered,
                val,
                "serde roundtrip failed for {}",
                stringify!($ty)
            );

            let schema = serde_json::to_value(schema_for!($ty)).unwrap();
            let instance = serde_json::to_value(&val).unwrap();
            let errors = schema_errors(&schema, &instance);
            assert!(
                errors.is_empty(),
                "schema validation failed for {}: {:?}",
                stringify!($ty),
                errors
            );
        }
    };
}

roundtrip!(
    standard_load_roundtrip,
    StandardLoad,
    StandardLoad {
        year: 2024,
        load_lecture: 3.5,
        load_lecture_first: 6.0,
        load_coursework_set: 2.0,
        load_coursework_credit: 0.1,
        load_coursework_marked: 0.05,
        load_exam_credit: 0.2,
        load_exam_marked: 0.1,
        load_fte_misc: 100.0,
        target_load_per_fte: 1650,
        target_load_per_fte_calc: Some(1712),
    }
);

roundtrip!(
    staff_fte_roundtrip,
    Staff,
    Staff::new("ab1", "Ada Byron", Contract::Fte { fraction: 0.8 }, 2024).with_group("T")
);

roundtrip!(
    staff_fixed_roundtrip,
    Staff,
    Staff::new("cd2", "Carl Dee", Contract::FixedHours { hours: 300 }, 2024)
);

roundtrip!(
    lead_task_roundtrip,
    Task,
    Task::new("tsk-a3f8b2c1", "Lead")
        .with_scope(TaskScope::Unit("PHYS101".into()))
        .with_kind(TaskKind::Lead {
            coursework_fraction: 0.5,
            exam_fraction: 1.0,
        })
        .with_load_fixed(10, 5)
);

roundtrip!(
    group_task_roundtrip,
    Task,
    Task::new("tsk-b0b0b0b0", "Admissions")
        .with_scope(TaskScope::Group("T".into()))
        .with_kind(TaskKind::FullTime)
);

roundtrip!(
    assignment_roundtrip,
    Assignment,
    Assignment {
        students: Some(12),
        is_first_time: true,
        ..Assignment::new("asg-00000001", "tsk-a3f8b2c1", "ab1")
    }
);

roundtrip!(
    history_record_roundtrip,
    HistoryRecord,
    HistoryRecord {
        history_id: 7,
        entity_kind: EntityKind::Staff,
        entity_id: "ab1".into(),
        history_date: Utc::now(),
        load_balance_final: Some(-100),
        data: serde_json::json!({"account": "ab1", "load_balance_final": -100}),
    }
);

roundtrip!(
    balance_report_roundtrip,
    BalanceReport,
    BalanceReport {
        year: 2024,
        target_load_per_fte: 900,
        staff: vec![StaffBalance {
            account: "ab1".into(),
            name: "Ada Byron".into(),
            academic_group: Some("T".into()),
            load_assigned: 800,
            load_target: 900,
            load_balance: -100,
            load_balance_historic: 0,
        }],
        groups: vec![GroupBalance {
            code: "T".into(),
            name: "Theory".into(),
            load_balance_final: -100,
            load_balance_historic: 0,
        }],
    }
);

#[test]
fn task_scope_wire_format() {
    let json = serde_json::to_value(TaskScope::Unit("PHYS101".into())).unwrap();
    assert_eq!(json, serde_json::json!({"type": "unit", "code": "PHYS101"}));
    let json = serde_json::to_value(TaskScope::Free).unwrap();
    assert_eq!(json, serde_json::json!({"type": "free"}));
}

#[test]
fn contract_wire_format() {
    let json = serde_json::to_value(Contract::FixedHours { hours: 300 }).unwrap();
    assert_eq!(json, serde_json::json!({"basis": "fixed_hours", "hours": 300}));
}

#[test]
fn schema_rejects_contract_without_basis() {
    let schema = serde_json::to_value(schema_for!(Contract)).unwrap();
    let errors = schema_errors(&schema, &serde_json::json!({"hours": 300}));
    assert!(!errors.is_empty());
}
