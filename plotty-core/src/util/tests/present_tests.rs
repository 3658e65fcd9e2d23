use crate::model::{AggregateKind, DataAggregate, ScenarioCell, ScenarioValue, Value};
use crate::util::present::{
    format_float, present_scenario, present_value, present_value_csv, sparkline,
};

#[test]
fn plain_numbers_present_as_is() {
    assert_eq!(present_value(&Value::Number(1.5)), "1.5");
}

#[test]
fn aggregates_present_with_symmetric_ci() {
    // Arrange
    let agg = DataAggregate::from_samples(AggregateKind::Mean, 0.95, vec![2.0, 4.0, 6.0]);

    // Act
    let text = present_value(&Value::Aggregate(agg));

    // Assert
    assert!(text.starts_with("4.000 ±"), "got {text}");
    assert!(text.ends_with('%'));
}

#[test]
fn geomean_presents_without_ci() {
    let agg = DataAggregate::from_samples(AggregateKind::Geomean, 0.95, vec![2.0, 8.0]);
    assert_eq!(present_value(&Value::Aggregate(agg)), "4.000");
}

#[test]
fn csv_falls_back_to_value_for_missing_bounds() {
    // Arrange
    let single = DataAggregate::from_samples(AggregateKind::Mean, 0.95, vec![3.0]);

    // Act
    let cells = present_value_csv(&Value::Aggregate(single), true);

    // Assert
    assert_eq!(cells, vec!["3.000000", "3.000000", "3.000000"]);
}

#[test]
fn non_finite_floats_have_stable_text() {
    assert_eq!(format_float(f64::NAN), "nan");
    assert_eq!(format_float(f64::INFINITY), "inf");
    assert_eq!(format_float(f64::NEG_INFINITY), "-inf");
}

#[test]
fn styled_scenarios_show_display_and_raw() {
    let cell = ScenarioCell::Styled(ScenarioValue {
        value: "jdk8".to_string(),
        display: "OpenJDK 8".to_string(),
        index: 0,
        group: None,
        color: None,
    });
    assert_eq!(present_scenario(&cell), "OpenJDK 8 (jdk8)");
    assert_eq!(present_scenario(&ScenarioCell::from("x")), "x");
}

#[test]
fn sparkline_spans_lowest_to_highest() {
    assert_eq!(sparkline(&[1.0, 2.0, 3.0]), "▁▅█");
    assert_eq!(sparkline(&[5.0, 5.0]), "▅▅");
    assert_eq!(sparkline(&[]), "");
}
