use grouptally::prelude::*;
use serde_json::{Value as JsonValue, json};

// ---- fixtures ------------------------------------------------------------

fn records(rows: JsonValue) -> Vec<Record> {
    serde_json::from_value(rows).expect("fixture rows")
}

fn foo_bar() -> Vec<Record> {
    records(json!([
        { "foo": 1, "bar": 1 },
        { "foo": 1, "bar": 2 },
        { "foo": 1, "bar": 2 },
        { "foo": 2, "bar": 1 },
        { "foo": 2, "bar": 1 },
        { "foo": 2, "bar": 2 },
        { "foo": 2, "bar": 3 },
        { "foo": 2, "bar": 3 },
    ]))
}

fn dated() -> Vec<Record> {
    records(json!([
        { "foo": 1, "bar": 1, "date": "2016-05-05T12:24:00" },
        { "foo": 1, "bar": 1, "date": "2016-05-05T12:24:00" },
        { "foo": 1, "bar": 2, "date": "2016-05-06T12:24:00" },
        { "foo": 2, "bar": 1, "date": "2016-05-05T12:24:00" },
        { "foo": 2, "bar": 1, "date": "2016-05-05T12:24:00" },
        { "foo": 2, "bar": 2, "date": "2016-05-06T12:24:00" },
    ]))
}

fn run(rows: &[Record], keys: &[&str], options: AggregateOptions) -> JsonValue {
    aggregate(rows, keys, options).expect("aggregate").to_json()
}

// Day of month from an ISO-8601 timestamp text.
fn day_of_month(record: &Record) -> Result<Value, MapperError> {
    let found = record.get("date").ok_or_else(|| MapperError::missing_field("date"))?;
    let day = found
        .as_text()
        .and_then(|text| text.get(8..10))
        .and_then(|day| day.parse::<i64>().ok())
        .ok_or_else(|| MapperError::unexpected_value("date", "ISO-8601 text", found))?;

    Ok(Value::Int(day))
}

fn sum_foo_bar(record: &Record) -> Value {
    let sum = ["foo", "bar"]
        .iter()
        .filter_map(|field| record.get(field).and_then(Value::as_i64))
        .sum::<i64>();

    Value::Int(sum)
}

// ---- documented usage ------------------------------------------------------

#[test]
fn groups_by_one_key() {
    assert_eq!(
        run(&foo_bar(), &["foo"], AggregateOptions::new()),
        json!([{ "foo": 1, "count": 3 }, { "foo": 2, "count": 5 }])
    );
}

#[test]
fn groups_by_two_keys() {
    assert_eq!(
        run(&foo_bar(), &["foo", "bar"], AggregateOptions::new()),
        json!([
            { "foo": 1, "bar": 1, "count": 1 },
            { "foo": 1, "bar": 2, "count": 2 },
            { "foo": 2, "bar": 1, "count": 2 },
            { "foo": 2, "bar": 2, "count": 1 },
            { "foo": 2, "bar": 3, "count": 2 },
        ])
    );
}

#[test]
fn four_rows_group_in_first_seen_order() {
    let rows = records(json!([
        { "foo": 1, "bar": 1 },
        { "foo": 1, "bar": 2 },
        { "foo": 1, "bar": 2 },
        { "foo": 2, "bar": 1 },
    ]));

    assert_eq!(
        run(&rows, &["foo"], AggregateOptions::new()),
        json!([{ "foo": 1, "count": 3 }, { "foo": 2, "count": 1 }])
    );
    assert_eq!(
        run(&rows, &["foo", "bar"], AggregateOptions::new()),
        json!([
            { "foo": 1, "bar": 1, "count": 1 },
            { "foo": 1, "bar": 2, "count": 2 },
            { "foo": 2, "bar": 1, "count": 1 },
        ])
    );
}

#[test]
fn mapper_formats_a_grouped_column() {
    let options = AggregateOptions::new().try_map_fn("date", day_of_month);

    assert_eq!(
        run(&dated(), &["foo", "bar", "date"], options),
        json!([
            { "foo": 1, "bar": 1, "date": 5, "count": 2 },
            { "foo": 1, "bar": 2, "date": 6, "count": 1 },
            { "foo": 2, "bar": 1, "date": 5, "count": 2 },
            { "foo": 2, "bar": 2, "date": 6, "count": 1 },
        ])
    );
}

#[test]
fn mapper_derives_a_column_missing_from_the_data() {
    let options = AggregateOptions::new().map_fn("foobar", sum_foo_bar);

    assert_eq!(
        run(&dated(), &["foobar"], options),
        json!([
            { "foobar": 2, "count": 2 },
            { "foobar": 3, "count": 3 },
            { "foobar": 4, "count": 1 },
        ])
    );
}

#[test]
fn aliases_rename_grouped_columns() {
    let result = aggregate(
        &dated(),
        &["foo as foobar", "bar as barfoo"],
        AggregateOptions::new(),
    )
    .expect("aggregate");

    assert_eq!(
        result.to_json(),
        json!([
            { "foobar": 1, "barfoo": 1, "count": 2 },
            { "foobar": 1, "barfoo": 2, "count": 1 },
            { "foobar": 2, "barfoo": 1, "count": 2 },
            { "foobar": 2, "barfoo": 2, "count": 1 },
        ])
    );
    assert!(result.iter().all(|group| group.get("foo").is_none()));
}

#[test]
fn mapper_on_aliased_column_is_keyed_by_alias() {
    let by_alias = AggregateOptions::new().try_map_fn("day", day_of_month);
    assert_eq!(
        run(&dated(), &["date as day"], by_alias),
        json!([{ "day": 5, "count": 4 }, { "day": 6, "count": 2 }])
    );

    // registered under the source name, the mapper never runs
    let by_source = AggregateOptions::new().try_map_fn("date", day_of_month);
    assert_eq!(
        run(&dated(), &["date as day"], by_source),
        json!([
            { "day": "2016-05-05T12:24:00", "count": 4 },
            { "day": "2016-05-06T12:24:00", "count": 2 },
        ])
    );
}

// ---- options -------------------------------------------------------------

#[test]
fn custom_count_field() {
    assert_eq!(
        run(&foo_bar(), &["foo"], AggregateOptions::new().count_field("total")),
        json!([{ "foo": 1, "total": 3 }, { "foo": 2, "total": 5 }])
    );
}

#[test]
fn settings_loaded_from_json_drive_the_run() {
    let settings: AggregateSettings =
        serde_json::from_value(json!({ "count_field": "n", "strategy": "linear_scan" }))
            .expect("settings");

    assert_eq!(
        run(&foo_bar(), &["foo"], AggregateOptions::new().with_settings(settings)),
        json!([{ "foo": 1, "n": 3 }, { "foo": 2, "n": 5 }])
    );
}

#[test]
fn count_field_colliding_with_alias_is_an_error() {
    let err = aggregate(&foo_bar(), &["foo as count"], AggregateOptions::new())
        .expect_err("collision");

    assert_eq!(
        err.display_with_class(),
        "config:conflict: count field 'count' collides with grouping key 'foo'"
    );
}

// ---- edge cases ----------------------------------------------------------

#[test]
fn empty_keys_count_everything_in_one_group() {
    let keys: &[&str] = &[];

    assert_eq!(
        run(&foo_bar(), keys, AggregateOptions::new()),
        json!([{ "count": 8 }])
    );
}

#[test]
fn empty_rows_produce_no_groups() {
    let result = aggregate(&[], &["foo"], AggregateOptions::new()).expect("aggregate");
    assert!(result.is_empty());

    let keys: &[&str] = &[];
    let result = aggregate(&[], keys, AggregateOptions::new()).expect("aggregate");
    assert_eq!(result.to_json(), json!([]));
}

#[test]
fn missing_fields_group_together_apart_from_null() {
    let rows = records(json!([
        { "foo": 1 },
        { "bar": 1 },
        { "foo": null },
        { "bar": 2 },
        { "foo": null },
    ]));
    let result = aggregate(&rows, &["foo"], AggregateOptions::new()).expect("aggregate");

    assert_eq!(
        result.to_json(),
        json!([
            { "foo": 1, "count": 1 },
            { "count": 2 },
            { "foo": null, "count": 2 },
        ])
    );
    assert!(matches!(result[1].field("foo"), FieldPresence::Missing));
    assert!(matches!(result[2].field("foo"), FieldPresence::Present(Value::Null)));
}

#[test]
fn duplicate_output_names_keep_the_later_value() {
    let rows = records(json!([
        { "a": 1, "b": 1 },
        { "a": 2, "b": 1 },
        { "a": 1, "b": 2 },
    ]));

    assert_eq!(
        run(&rows, &["a as x", "b as x"], AggregateOptions::new()),
        json!([{ "x": 1, "count": 2 }, { "x": 2, "count": 1 }])
    );
}

#[test]
fn integral_floats_group_with_integers() {
    let rows = records(json!([{ "v": 1 }, { "v": 1.0 }, { "v": 1.5 }]));

    assert_eq!(
        run(&rows, &["v"], AggregateOptions::new()),
        json!([{ "v": 1, "count": 2 }, { "v": 1.5, "count": 1 }])
    );
}

// Nested values use shallow equality: structurally equal lists or objects
// never share a group.
#[test]
fn nested_values_are_never_grouped_together() {
    let rows = records(json!([
        { "tags": ["a"] },
        { "tags": ["a"] },
        { "tags": { "k": 1 } },
    ]));

    for strategy in [GroupingStrategy::Hashed, GroupingStrategy::LinearScan] {
        assert_eq!(
            run(&rows, &["tags"], AggregateOptions::new().strategy(strategy)),
            json!([
                { "tags": ["a"], "count": 1 },
                { "tags": ["a"], "count": 1 },
                { "tags": { "k": 1 }, "count": 1 },
            ])
        );
    }
}

#[test]
fn mapper_failure_returns_no_partial_result() {
    let mut rows = dated();
    rows.push(records(json!([{ "foo": 3, "bar": 3, "date": 17 }])).remove(0));

    let err = aggregate(
        &rows,
        &["date"],
        AggregateOptions::new().try_map_fn("date", day_of_month),
    )
    .expect_err("numeric date");

    assert!(err.is_mapper_failure());
    assert_eq!(
        err.message,
        "mapper for field 'date' failed on row 6: field 'date' expected ISO-8601 text, found Int(17)"
    );
}

// ---- json surface --------------------------------------------------------

#[test]
fn aggregate_json_round_trip() {
    let rows = json!([
        { "city": "Oslo", "kind": "a" },
        { "city": "Rome", "kind": "b" },
        { "city": "Oslo", "kind": "a" },
        { "kind": "a" },
    ]);

    assert_eq!(
        aggregate_json(&rows, &["city as c", "kind"], AggregateOptions::new()).expect("json"),
        json!([
            { "c": "Oslo", "kind": "a", "count": 2 },
            { "c": "Rome", "kind": "b", "count": 1 },
            { "kind": "a", "count": 1 },
        ])
    );
}

#[test]
fn serialized_result_matches_to_json() {
    let result = aggregate(&foo_bar(), &["bar", "foo"], AggregateOptions::new()).expect("aggregate");
    let serialized = serde_json::to_value(&result).expect("serialize result");

    assert_eq!(serialized, result.to_json());
    let first = result[0].to_record(result.count_field());
    assert_eq!(
        serde_json::to_string(&first).expect("serialize record"),
        r#"{"bar":1,"foo":1,"count":1}"#
    );
}

#[test]
fn version_is_exported() {
    assert!(!grouptally::VERSION.is_empty());
}
