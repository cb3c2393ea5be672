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

use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::Duration;

use rill::value::compare_values;
use rill::{
    RillAddColumn, RillContent, RillContext, RillDocument, RillError, RillFilter, RillLimit,
    RillPipeline, RillPipelineOptions, RillPipelineState, RillRecord, RillSchema, RillSort,
    RillSortKey, RillTableContent, RillTextContent, RillValue, TRANSFORM_STATS_KEY,
};

fn staff_table(id: &str) -> RillTableContent {
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
    RillTableContent::new(id, RillSchema::from_columns(["name", "active", "age"]))
        .with_records(records)
}

fn staff_document() -> RillDocument {
    let mut document = RillDocument::new().with_title("Staff Report");
    document.push_content(RillContent::Text(RillTextContent::new(
        "intro",
        "Quarterly staffing overview.",
    )));
    document.push_table(staff_table("staff"));
    document
}

fn active_filter() -> RillFilter {
    RillFilter::new(|record| record.get("active").and_then(RillValue::as_bool) == Some(true))
}

fn table_names(document: &RillDocument) -> Vec<String> {
    document
        .tables()
        .next()
        .unwrap()
        .records
        .iter()
        .map(|record| record.get("name").unwrap().to_string())
        .collect()
}

#[test]
fn filter_then_limit_keeps_the_first_survivors_in_order() {
    let mut pipeline = RillPipeline::new(staff_document());
    pipeline.push(active_filter());
    pipeline.push(RillLimit::new(2));

    let output = pipeline.execute(&RillContext::new()).unwrap();
    assert_eq!(table_names(&output), vec!["ada", "cara"]);
    assert_eq!(pipeline.state(), RillPipelineState::Completed);
}

#[test]
fn source_document_is_never_mutated() {
    let document = staff_document();
    let snapshot = document.clone();

    let mut pipeline = RillPipeline::new(document.clone());
    pipeline.push(active_filter());
    pipeline.push(RillSort::by_keys(vec![RillSortKey::descending("age")]));
    pipeline.execute(&RillContext::new()).unwrap();

    assert_eq!(document, snapshot);
}

#[test]
fn non_table_content_passes_through_unchanged() {
    let mut pipeline = RillPipeline::new(staff_document());
    pipeline.push(active_filter());

    let output = pipeline.execute(&RillContext::new()).unwrap();
    assert_eq!(output.contents.len(), 2);
    match &output.contents[0] {
        RillContent::Text(text) => {
            assert_eq!(text.id, "intro");
            assert_eq!(text.body, "Quarterly staffing overview.");
        }
        other => panic!("unexpected content: {other:?}"),
    }
}

#[test]
fn every_table_content_is_transformed() {
    let mut document = RillDocument::new();
    document.push_table(staff_table("first"));
    document.push_table(staff_table("second"));

    let mut pipeline = RillPipeline::new(document);
    pipeline.push(active_filter());

    let output = pipeline.execute(&RillContext::new()).unwrap();
    for table in output.tables() {
        assert_eq!(table.record_count(), 3);
    }
}

#[test]
fn transform_stats_are_attached_to_metadata() {
    let mut pipeline = RillPipeline::new(staff_document());
    pipeline.push(active_filter());
    pipeline.push(RillLimit::new(2));

    let output = pipeline.execute(&RillContext::new()).unwrap();
    let stats = &output.metadata[TRANSFORM_STATS_KEY];

    assert_eq!(stats["input_records"], 5);
    assert_eq!(stats["output_records"], 2);
    assert_eq!(stats["filtered_records"], 3);
    let operations = stats["operations"].as_array().unwrap();
    assert_eq!(operations.len(), 2);
    assert_eq!(operations[0]["operation"], "filter");
    assert_eq!(operations[0]["records_out"], 3);
    assert_eq!(operations[1]["operation"], "limit");
    assert_eq!(operations[1]["records_out"], 2);
}

#[test]
fn operations_run_in_optimized_order() {
    let mut pipeline = RillPipeline::new(staff_document());
    // Pushed in the "wrong" order on purpose.
    pipeline.push(RillLimit::new(2));
    pipeline.push(RillSort::by_keys(vec![RillSortKey::ascending("age")]));
    pipeline.push(active_filter());

    let output = pipeline.execute(&RillContext::new()).unwrap();
    // Filter ran first, sort second, limit last: the two youngest of
    // the three active members.
    assert_eq!(table_names(&output), vec!["cara", "ada"]);

    let stats = &output.metadata[TRANSFORM_STATS_KEY];
    let order: Vec<&str> = stats["operations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["operation"].as_str().unwrap())
        .collect();
    assert_eq!(order, vec!["filter", "sort", "limit"]);
}

#[test]
fn validation_failure_names_the_offending_operation() {
    let mut pipeline = RillPipeline::new(staff_document());
    pipeline.push(active_filter());
    pipeline.push(RillLimit::new(-5));

    let err = pipeline.execute(&RillContext::new()).unwrap_err();
    match err {
        RillError::Pipeline { stage, message } => {
            assert_eq!(stage, "validate");
            assert!(message.contains("'limit'"));
            assert!(message.contains("1 of 2"));
            assert!(message.contains("non-negative"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(pipeline.state(), RillPipelineState::Failed);
}

#[test]
fn operation_count_limit_is_enforced() {
    let options = RillPipelineOptions {
        max_operations: 1,
        ..RillPipelineOptions::default()
    };
    let mut pipeline = RillPipeline::with_options(staff_document(), options);
    pipeline.push(active_filter());
    pipeline.push(RillLimit::new(1));

    let err = pipeline.validate().unwrap_err();
    match err {
        RillError::Pipeline { message, .. } => assert!(message.contains("maximum of 1")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn stage_failures_carry_operation_and_content_context() {
    let mut pipeline = RillPipeline::new(staff_document());
    pipeline.push(RillAddColumn::new("boom", |_record| {
        Err(RillError::internal("compute exploded"))
    }));

    let err = pipeline.execute(&RillContext::new()).unwrap_err();
    match err {
        RillError::Stage {
            operation,
            kind,
            stage,
            content_kind,
            content_id,
            sample,
            source,
        } => {
            assert_eq!(operation, "add_column");
            assert_eq!(kind, "add_column");
            assert_eq!(stage, 0);
            assert_eq!(content_kind, "table");
            assert_eq!(content_id, "staff");
            assert!(sample.contains("ada"));
            assert!(source.to_string().contains("compute exploded"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn cancellation_mid_sort_surfaces_a_cancellation_error() {
    let context = RillContext::new();
    let handle = context.clone();
    let comparisons = Arc::new(AtomicUsize::new(0));

    let mut pipeline = RillPipeline::new(staff_document());
    pipeline.push(RillSort::by_comparator(move |a, b| {
        if comparisons.fetch_add(1, AtomicOrdering::SeqCst) >= 2 {
            handle.cancel();
        }
        let left = a.get("age").cloned().unwrap_or(RillValue::Null);
        let right = b.get("age").cloned().unwrap_or(RillValue::Null);
        compare_values(&left, &right)
    }));

    let err = pipeline.execute(&context).unwrap_err();
    assert!(err.is_cancellation());
    assert_eq!(pipeline.state(), RillPipelineState::Failed);
}

#[test]
fn deadline_expiry_surfaces_a_cancellation_error() {
    let options = RillPipelineOptions {
        max_duration: Some(Duration::ZERO),
        ..RillPipelineOptions::default()
    };
    let mut pipeline = RillPipeline::with_options(staff_document(), options);
    pipeline.push(active_filter());

    let err = pipeline.execute(&RillContext::new()).unwrap_err();
    assert!(err.is_cancellation());
}

#[test]
fn a_pipeline_executes_at_most_once() {
    let mut pipeline = RillPipeline::new(staff_document());
    pipeline.push(active_filter());
    pipeline.execute(&RillContext::new()).unwrap();

    let err = pipeline.execute(&RillContext::new()).unwrap_err();
    match err {
        RillError::Pipeline { message, .. } => assert!(message.contains("already")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn add_column_then_sort_uses_the_computed_column() {
    let mut pipeline = RillPipeline::new(staff_document());
    // Optimizer moves the add_column ahead of the sort that needs it.
    pipeline.push(RillSort::by_keys(vec![RillSortKey::ascending("seniority")]));
    pipeline.push(RillAddColumn::new("seniority", |record| {
        let age = record.get("age").and_then(RillValue::as_f64).unwrap_or(0.0);
        Ok(RillValue::Float(age / 10.0))
    }));

    let output = pipeline.execute(&RillContext::new()).unwrap();
    assert_eq!(table_names(&output), vec!["cara", "ada", "eve", "ben", "dan"]);
}
