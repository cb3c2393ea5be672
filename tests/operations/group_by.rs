//! Copyright © 2025-2026 Rill Contributors. All Rights Reserved.
//!
//! This file is part of Rill.
//! The Rill project belongs to the Rill Team.
//!
//! Licensed under the Apache License, Version 2.0 (the "License");
//! You may not use this file except in compliance with the License.
//! You may obtain a copy of the License at
//!
//!     http://www.apache.org/licenses/LICENSE-2.0
//!
//! Unless required by applicable law or agreed to in writing, software
//! distributed under the License is distributed on an "AS IS" BASIS,
//! WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//! See the License for the specific language governing permissions and
//! limitations under the License.

use rill::operations::group_by::group_by_factory;
use rill::{
    verify_stateless, RillAggregate, RillContent, RillContext, RillError, RillGroupBy,
    RillOperation, RillRecord, RillSchema, RillTableContent, RillTextContent, RillValue,
};
use serde_json::json;

fn payroll_table() -> RillTableContent {
    let rows = [("HR", 50_000), ("IT", 75_000), ("HR", 60_000)];
    let records = rows
        .iter()
        .map(|(dept, salary)| {
            let mut record = RillRecord::new();
            record.set("dept", *dept);
            record.set("salary", *salary as i64);
            record
        })
        .collect();
    RillTableContent::new("payroll", RillSchema::from_columns(["dept", "salary"]))
        .with_records(records)
}

#[test]
fn sums_salaries_per_department() {
    let operation =
        RillGroupBy::new(["dept"]).aggregate_on("total", "salary", RillAggregate::sum());

    let output = operation
        .apply(&RillContent::Table(payroll_table()), &RillContext::new())
        .unwrap();
    let table = output.as_table().unwrap();

    assert_eq!(table.record_count(), 2);
    assert_eq!(table.records[0].get("dept"), Some(&RillValue::Str("HR".into())));
    assert_eq!(table.records[0].get("total"), Some(&RillValue::Float(110_000.0)));
    assert_eq!(table.records[1].get("dept"), Some(&RillValue::Str("IT".into())));
    assert_eq!(table.records[1].get("total"), Some(&RillValue::Float(75_000.0)));
}

#[test]
fn groups_appear_in_first_seen_order() {
    let rows = ["c", "a", "b", "a", "c"];
    let records = rows
        .iter()
        .map(|group| {
            let mut record = RillRecord::new();
            record.set("group", *group);
            record
        })
        .collect();
    let table = RillTableContent::new("rows", RillSchema::from_columns(["group"]))
        .with_records(records);

    let operation = RillGroupBy::new(["group"]).aggregate("n", RillAggregate::count());
    let output = operation
        .apply(&RillContent::Table(table), &RillContext::new())
        .unwrap();

    let order: Vec<String> = output
        .as_table()
        .unwrap()
        .records
        .iter()
        .map(|record| record.get("group").unwrap().to_string())
        .collect();
    assert_eq!(order, vec!["c", "a", "b"]);
}

#[test]
fn per_group_counts_partition_the_input() {
    let table = payroll_table();
    let total_input = table.record_count() as i64;

    let operation = RillGroupBy::new(["dept"]).aggregate("headcount", RillAggregate::count());
    let output = operation
        .apply(&RillContent::Table(table), &RillContext::new())
        .unwrap();

    let counted: i64 = output
        .as_table()
        .unwrap()
        .records
        .iter()
        .map(|record| match record.get("headcount") {
            Some(RillValue::Int(count)) => *count,
            other => panic!("unexpected count: {other:?}"),
        })
        .sum();
    assert_eq!(counted, total_input);
}

#[test]
fn key_order_is_group_columns_then_aggregates() {
    let operation = RillGroupBy::new(["dept"])
        .aggregate_on("total", "salary", RillAggregate::sum())
        .aggregate("headcount", RillAggregate::count());

    let output = operation
        .apply(&RillContent::Table(payroll_table()), &RillContext::new())
        .unwrap();
    let schema = &output.as_table().unwrap().schema;

    assert_eq!(schema.key_order(), ["dept", "total", "headcount"]);
    assert!(schema.is_consistent());
    // Group columns keep their original field descriptors.
    assert_eq!(schema.field("dept").unwrap().name, "dept");
}

#[test]
fn source_field_is_inferred_from_prefixed_output_names() {
    let operation = RillGroupBy::new(["dept"]).aggregate("sum_salary", RillAggregate::sum());

    let output = operation
        .apply(&RillContent::Table(payroll_table()), &RillContext::new())
        .unwrap();
    assert_eq!(
        output.as_table().unwrap().records[0].get("sum_salary"),
        Some(&RillValue::Float(110_000.0))
    );
}

#[test]
fn unresolvable_source_field_aggregates_nothing() {
    // "total" matches no prefix and has no trailing plural, so the
    // source field falls back to the aggregate's own name ("sum"),
    // which no record carries.
    let operation = RillGroupBy::new(["dept"]).aggregate("total", RillAggregate::sum());

    let output = operation
        .apply(&RillContent::Table(payroll_table()), &RillContext::new())
        .unwrap();
    assert_eq!(
        output.as_table().unwrap().records[0].get("total"),
        Some(&RillValue::Float(0.0))
    );
}

#[test]
fn group_column_values_come_from_the_first_member() {
    let operation =
        RillGroupBy::new(["dept", "salary"]).aggregate("n", RillAggregate::count());

    let output = operation
        .apply(&RillContent::Table(payroll_table()), &RillContext::new())
        .unwrap();
    let table = output.as_table().unwrap();
    // Two group columns give three distinct groups here.
    assert_eq!(table.record_count(), 3);
    assert_eq!(table.records[0].get("salary"), Some(&RillValue::Int(50_000)));
}

#[test]
fn validation_rejects_bad_configurations() {
    let err = RillGroupBy::new(Vec::<String>::new())
        .aggregate("n", RillAggregate::count())
        .validate()
        .unwrap_err();
    assert!(matches!(err, RillError::Validation { .. }));

    let err = RillGroupBy::new([""])
        .aggregate("n", RillAggregate::count())
        .validate()
        .unwrap_err();
    assert!(matches!(err, RillError::Validation { .. }));

    let err = RillGroupBy::new(["dept"]).validate().unwrap_err();
    match err {
        RillError::Validation { message } => assert!(message.contains("aggregate")),
        other => panic!("unexpected error: {other:?}"),
    }

    let err = RillGroupBy::new(["dept"])
        .aggregate("", RillAggregate::count())
        .validate()
        .unwrap_err();
    assert!(matches!(err, RillError::Validation { .. }));
}

#[test]
fn non_table_content_is_a_type_mismatch() {
    let operation = RillGroupBy::new(["dept"]).aggregate("n", RillAggregate::count());
    let err = operation
        .apply(
            &RillContent::Text(RillTextContent::new("intro", "hello")),
            &RillContext::new(),
        )
        .unwrap_err();
    assert!(matches!(err, RillError::ContentType { .. }));
}

#[test]
fn does_not_mutate_the_source_content() {
    let table = payroll_table();
    let snapshot = table.clone();

    RillGroupBy::new(["dept"])
        .aggregate("n", RillAggregate::count())
        .apply(&RillContent::Table(table.clone()), &RillContext::new())
        .unwrap();
    assert_eq!(table, snapshot);
}

#[test]
fn satisfies_the_stateless_contract() {
    let operation =
        RillGroupBy::new(["dept"]).aggregate_on("total", "salary", RillAggregate::sum());
    verify_stateless(&operation, &payroll_table()).unwrap();
}

#[test]
fn custom_aggregate_errors_propagate() {
    let failing = RillAggregate::custom("broken", |_records, _field| {
        Err(RillError::internal("aggregate exploded"))
    });
    let operation = RillGroupBy::new(["dept"]).aggregate("out", failing);

    let err = operation
        .apply(&RillContent::Table(payroll_table()), &RillContext::new())
        .unwrap_err();
    assert!(err.to_string().contains("aggregate exploded"));
}

#[test]
fn factory_parses_config() {
    let operation = group_by_factory(&json!({
        "columns": ["dept"],
        "aggregates": [
            {"output": "total", "field": "salary", "func": "sum"},
            {"output": "headcount", "func": "count"},
        ],
    }))
    .unwrap();

    let output = operation
        .apply(&RillContent::Table(payroll_table()), &RillContext::new())
        .unwrap();
    let table = output.as_table().unwrap();
    assert_eq!(table.records[0].get("total"), Some(&RillValue::Float(110_000.0)));
    assert_eq!(table.records[0].get("headcount"), Some(&RillValue::Int(2)));

    let err = group_by_factory(&json!({
        "columns": ["dept"],
        "aggregates": [{"output": "x", "func": "median"}],
    }))
    .unwrap_err();
    assert!(matches!(err, RillError::Validation { .. }));
}
