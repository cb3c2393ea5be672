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

use regex::Regex;
use rill::operations::filter::{
    column_between, column_equals, column_greater_than, column_is_null, column_matches,
    filter_factory,
};
use rill::{
    verify_stateless, RillContent, RillContext, RillError, RillFilter, RillOperation, RillRecord,
    RillSchema, RillTableContent, RillTextContent, RillValue,
};
use serde_json::json;

fn people_table() -> RillTableContent {
    let rows = [
        ("ada", true, 31),
        ("ben", false, 45),
        ("cara", true, 28),
        ("dan", false, 52),
        ("eve", true, 39),
    ];
    let records = rows
        .iter()
        .map(|(name, active, age)| {
            let mut record = RillRecord::new();
            record.set("name", *name);
            record.set("active", *active);
            record.set("age", *age as i64);
            record
        })
        .collect();
    RillTableContent::new("people", RillSchema::from_columns(["name", "active", "age"]))
        .with_records(records)
}

fn names(content: &RillContent) -> Vec<String> {
    content
        .as_table()
        .unwrap()
        .records
        .iter()
        .map(|record| record.get("name").unwrap().to_string())
        .collect()
}

#[test]
fn keeps_matching_records_in_original_order() {
    let operation = RillFilter::new(|record| {
        record.get("active").and_then(RillValue::as_bool) == Some(true)
    });
    let content = RillContent::Table(people_table());

    let output = operation.apply(&content, &RillContext::new()).unwrap();
    assert_eq!(names(&output), vec!["ada", "cara", "eve"]);
}

#[test]
fn is_idempotent() {
    let operation = RillFilter::new(|record| {
        record.get("age").and_then(RillValue::as_f64).map_or(false, |age| age > 30.0)
    });
    let content = RillContent::Table(people_table());
    let context = RillContext::new();

    let once = operation.apply(&content, &context).unwrap();
    let twice = operation.apply(&once, &context).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn does_not_mutate_the_source_content() {
    let table = people_table();
    let snapshot = table.clone();
    let operation = RillFilter::new(|_record| false);

    let output = operation
        .apply(&RillContent::Table(table.clone()), &RillContext::new())
        .unwrap();
    assert_eq!(output.as_table().unwrap().record_count(), 0);
    assert_eq!(table, snapshot);
}

#[test]
fn unset_predicate_fails_validation() {
    let operation = RillFilter::default();
    let err = operation.validate().unwrap_err();
    match err {
        RillError::Validation { message } => assert!(message.contains("predicate")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn non_table_content_is_a_type_mismatch() {
    let operation = RillFilter::new(|_record| true);
    let content = RillContent::Text(RillTextContent::new("intro", "hello"));

    let err = operation.apply(&content, &RillContext::new()).unwrap_err();
    match err {
        RillError::ContentType { operation, actual } => {
            assert_eq!(operation, "filter");
            assert_eq!(actual, "text");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn cancelled_context_stops_before_records() {
    let operation = RillFilter::new(|_record| true);
    let context = RillContext::new();
    context.cancel();

    let err = operation
        .apply(&RillContent::Table(people_table()), &context)
        .unwrap_err();
    assert!(err.is_cancellation());
}

#[test]
fn predicate_helpers_cover_common_comparisons() {
    let table = people_table();
    let first = &table.records[0];
    let second = &table.records[1];

    assert!(column_equals("name", "ada")(first));
    assert!(!column_equals("name", "ada")(second));
    assert!(column_greater_than("age", 40)(second));
    assert!(!column_greater_than("age", 40)(first));
    assert!(column_between("age", 30, 35)(first));
    assert!(column_is_null("missing")(first));
    assert!(column_matches("name", Regex::new("^a").unwrap())(first));
}

#[test]
fn satisfies_the_stateless_contract() {
    let operation = RillFilter::new(|record| {
        record.get("active").and_then(RillValue::as_bool) == Some(true)
    });
    verify_stateless(&operation, &people_table()).unwrap();
}

#[test]
fn factory_parses_config() {
    let operation = filter_factory(&json!({
        "column": "age",
        "compare": "greater_than",
        "value": 40,
    }))
    .unwrap();

    let output = operation
        .apply(&RillContent::Table(people_table()), &RillContext::new())
        .unwrap();
    assert_eq!(names(&output), vec!["ben", "dan"]);
}

#[test]
fn factory_rejects_bad_config() {
    let err = filter_factory(&json!({"compare": "equals", "value": 1})).unwrap_err();
    assert!(matches!(err, RillError::Validation { .. }));

    let err = filter_factory(&json!({"column": "age", "compare": "sideways"})).unwrap_err();
    match err {
        RillError::Validation { message } => assert!(message.contains("sideways")),
        other => panic!("unexpected error: {other:?}"),
    }

    let err = filter_factory(&json!({
        "column": "name",
        "compare": "matches",
        "pattern": "([",
    }))
    .unwrap_err();
    assert!(matches!(err, RillError::Validation { .. }));
}
