use crate::model::{AggregateKind, DataAggregate, Value};

fn mean(samples: &[f64]) -> DataAggregate {
    DataAggregate::from_samples(AggregateKind::Mean, 0.95, samples.to_vec())
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

//-----------------------------------------------------------------------------
// Summaries
//-----------------------------------------------------------------------------

#[test]
fn mean_of_two_four_six() {
    // Arrange
    let agg = mean(&[2.0, 4.0, 6.0]);

    // Act / Assert
    assert_eq!(agg.count(), 3);
    assert!(close(agg.value(), 4.0));
    assert!(close(agg.stdev(), 2.0));
    assert!(close(agg.min(), 2.0));
    assert!(close(agg.max(), 6.0));
}

#[test]
fn mean_ci_uses_student_t() {
    // Arrange
    let agg = mean(&[2.0, 4.0, 6.0]);

    // Act
    let (lo, hi) = agg.ci();

    // Assert: t(0.05, 2) * 2 / sqrt(3)
    let half = 4.302652729749464 * 2.0 / 3f64.sqrt();
    assert!((lo - (4.0 - half)).abs() < 1e-6);
    assert!((hi - (4.0 + half)).abs() < 1e-6);
}

#[test]
fn geomean_of_two_and_eight() {
    // Arrange
    let agg = DataAggregate::from_samples(AggregateKind::Geomean, 0.95, vec![2.0, 8.0]);

    // Act / Assert
    assert!(close(agg.value(), 4.0));
    let (lo, hi) = agg.ci();
    assert!(lo.is_nan() && hi.is_nan());
}

#[test]
fn single_sample_has_no_interval() {
    let agg = mean(&[7.0]);
    assert!(close(agg.value(), 7.0));
    assert!(close(agg.stdev(), 0.0));
    assert!(agg.ci().0.is_nan());
    assert_eq!(Value::Aggregate(agg).bounds(), (7.0, 7.0));
}

#[test]
fn push_invalidates_cached_summary() {
    // Arrange
    let mut agg = DataAggregate::new(AggregateKind::Mean, 0.95);
    agg.push(2.0);
    assert!(close(agg.value(), 2.0));

    // Act
    agg.push(4.0);

    // Assert
    assert!(close(agg.value(), 3.0));
    assert_eq!(agg.count(), 2);
}

//-----------------------------------------------------------------------------
// Division
//-----------------------------------------------------------------------------

#[test]
fn dividing_by_itself_yields_one() {
    // Arrange
    let agg = mean(&[10.0, 12.0, 14.0]);

    // Act
    let ratio = agg.div(&agg);

    // Assert
    assert!(close(ratio.value(), 1.0));
    let (lo, hi) = ratio.ci();
    assert!(lo < 1.0 && hi > 1.0);
    assert!(ratio.is_derived());
}

#[test]
fn dividing_by_zero_keeps_dividend_sign() {
    // Arrange
    let zero = mean(&[0.0, 0.0]);

    // Act / Assert
    assert_eq!(mean(&[3.0, 5.0]).div(&zero).value(), f64::INFINITY);
    assert_eq!(mean(&[-3.0, -5.0]).div(&zero).value(), f64::NEG_INFINITY);
    assert!(mean(&[3.0, 5.0]).div(&zero).ci().0.is_nan());
}

#[test]
fn ratio_ci_needs_two_samples_each() {
    let ratio = mean(&[4.0]).div(&mean(&[2.0, 2.0]));
    assert!(close(ratio.value(), 2.0));
    assert!(ratio.ci().0.is_nan());
}

#[test]
fn ratio_ci_matches_delta_method() {
    // Arrange
    let a = mean(&[9.0, 11.0]);
    let b = mean(&[4.0, 6.0]);

    // Act
    let ratio = a.div(&b);

    // Assert
    let sa = 2f64.sqrt();
    let sb = 2f64.sqrt();
    let spread = (sa * sa / (2.0 * 100.0) + sb * sb / (2.0 * 25.0)).sqrt();
    let t = crate::util::stats::t_quantile(0.05, 2.0);
    let half = t * 2.0 * spread;
    let (lo, hi) = ratio.ci();
    assert!(close(ratio.value(), 2.0));
    assert!((lo - (2.0 - half)).abs() < 1e-9);
    assert!((hi - (2.0 + half)).abs() < 1e-9);
}

#[test]
fn ratio_extrema_come_from_cross_quotients() {
    // Arrange
    let a = mean(&[2.0, 4.0]);
    let b = mean(&[1.0, 2.0]);

    // Act
    let ratio = a.div(&b);

    // Assert
    assert!(close(ratio.min(), 1.0));
    assert!(close(ratio.max(), 4.0));
}

#[test]
fn ratio_extrema_guard_zero_divisors() {
    let ratio = mean(&[2.0, 4.0]).div(&mean(&[0.0, 2.0]));
    assert_eq!(ratio.max(), f64::INFINITY);
    assert!(close(ratio.min(), 1.0));
}

#[test]
fn scaling_by_negative_number_swaps_bounds() {
    // Arrange
    let agg = mean(&[2.0, 4.0, 6.0]);
    let (lo, hi) = agg.ci();

    // Act
    let scaled = agg.div_scalar(-2.0);

    // Assert
    let (slo, shi) = scaled.ci();
    assert!(close(scaled.value(), -2.0));
    assert!(close(slo, hi / -2.0));
    assert!(close(shi, lo / -2.0));
    assert!(close(scaled.min(), -3.0));
    assert!(close(scaled.max(), -1.0));
}

#[test]
fn number_divided_by_aggregate_has_no_interval() {
    let ratio = Value::Number(8.0).divide(&Value::Aggregate(mean(&[2.0, 6.0])));
    assert!(close(ratio.value(), 2.0));
    assert!(!ratio.has_ci());
}

#[test]
fn plain_number_division_by_zero_is_signed_infinity() {
    assert_eq!(
        Value::Number(-1.0).divide(&Value::Number(0.0)).value(),
        f64::NEG_INFINITY
    );
}

#[test]
fn derived_aggregates_survive_json() {
    // Arrange
    let ratio = mean(&[4.0]).div(&mean(&[0.0]));

    // Act
    let json = serde_json::to_string(&Value::Aggregate(ratio)).unwrap();
    let back: Value = serde_json::from_str(&json).unwrap();

    // Assert
    assert_eq!(back.value(), f64::INFINITY);
    assert!(back.as_aggregate().unwrap().ci().0.is_nan());
}
