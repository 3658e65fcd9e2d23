use crate::util::serde_float;
use crate::util::stats::t_quantile;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregateKind {
    Mean,
    Geomean,
}

impl AggregateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AggregateKind::Mean => "mean",
            AggregateKind::Geomean => "geomean",
        }
    }
}

impl Display for AggregateKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Computed statistics of an aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    #[serde(with = "serde_float")]
    pub value: f64,
    #[serde(with = "serde_float")]
    pub stdev: f64,
    #[serde(with = "serde_float")]
    pub min: f64,
    #[serde(with = "serde_float")]
    pub max: f64,
    #[serde(with = "serde_float")]
    pub ci_lower: f64,
    #[serde(with = "serde_float")]
    pub ci_upper: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum Source {
    Samples(#[serde(with = "serde_float::vec")] Vec<f64>),
    Derived(Summary),
}

/// A lazily computed statistical summary over numeric contributions.
///
/// Sample-backed aggregates compute their [`Summary`] on first read and drop it
/// again whenever a contribution is appended. Aggregates produced by division
/// are *derived*: they carry a fixed summary and no samples.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataAggregate {
    kind: AggregateKind,
    confidence: f64,
    source: Source,
    #[serde(skip)]
    summary: OnceCell<Summary>,
}

impl DataAggregate {
    pub fn new(kind: AggregateKind, confidence: f64) -> Self {
        Self {
            kind,
            confidence,
            source: Source::Samples(Vec::new()),
            summary: OnceCell::new(),
        }
    }

    pub fn from_samples(kind: AggregateKind, confidence: f64, samples: Vec<f64>) -> Self {
        Self {
            kind,
            confidence,
            source: Source::Samples(samples),
            summary: OnceCell::new(),
        }
    }

    fn derived(kind: AggregateKind, confidence: f64, summary: Summary) -> Self {
        Self {
            kind,
            confidence,
            source: Source::Derived(summary),
            summary: OnceCell::new(),
        }
    }

    /// Appends a contribution.
    ///
    /// Derived aggregates have no samples to append to; the contribution is ignored.
    pub fn push(&mut self, value: f64) {
        match &mut self.source {
            Source::Samples(samples) => {
                samples.push(value);
                self.summary = OnceCell::new();
            }
            Source::Derived(_) => {
                tracing::debug!(value, "ignoring contribution to a derived aggregate");
            }
        }
    }

    pub fn kind(&self) -> AggregateKind {
        self.kind
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn samples(&self) -> Option<&[f64]> {
        match &self.source {
            Source::Samples(samples) => Some(samples),
            Source::Derived(_) => None,
        }
    }

    pub fn is_derived(&self) -> bool {
        matches!(self.source, Source::Derived(_))
    }

    pub fn summary(&self) -> &Summary {
        self.summary.get_or_init(|| match &self.source {
            Source::Samples(samples) => summarize(self.kind, self.confidence, samples),
            Source::Derived(summary) => *summary,
        })
    }

    pub fn value(&self) -> f64 {
        self.summary().value
    }

    pub fn stdev(&self) -> f64 {
        self.summary().stdev
    }

    pub fn min(&self) -> f64 {
        self.summary().min
    }

    pub fn max(&self) -> f64 {
        self.summary().max
    }

    pub fn count(&self) -> usize {
        self.summary().count
    }

    pub fn ci(&self) -> (f64, f64) {
        let s = self.summary();
        (s.ci_lower, s.ci_upper)
    }

    /// Distance from the value to each CI bound, as a percentage of the value.
    pub fn ci_percent(&self) -> (f64, f64) {
        let s = self.summary();
        let down = (s.value - s.ci_lower) / s.value * 100.0;
        let up = (s.ci_upper - s.value) / s.value * 100.0;
        (down.abs(), up.abs())
    }

    //-------------------------------------------------------------------------
    // Division
    //-------------------------------------------------------------------------

    /// Ratio of two aggregates by propagation of error.
    pub fn div(&self, other: &DataAggregate) -> DataAggregate {
        let a = self.summary();
        let b = other.summary();
        let ratio = safe_div(a.value, b.value);

        let both_mean = self.kind == AggregateKind::Mean && other.kind == AggregateKind::Mean;
        let nonzero = a.value != 0.0 && b.value != 0.0;
        let enough = a.count >= 2 && b.count >= 2;

        let rel = if nonzero {
            ((a.stdev * a.stdev) / (a.value * a.value) + (b.stdev * b.stdev) / (b.value * b.value))
                .sqrt()
        } else {
            f64::NAN
        };
        let stdev = ratio.abs() * rel;

        let (ci_lower, ci_upper) = if both_mean && nonzero && enough {
            let na = a.count as f64;
            let nb = b.count as f64;
            let t = t_quantile(1.0 - self.confidence, na + nb - 2.0);
            let spread = ((a.stdev * a.stdev) / (na * a.value * a.value)
                + (b.stdev * b.stdev) / (nb * b.value * b.value))
                .sqrt();
            let half = t * ratio.abs() * spread;
            (ratio - half, ratio + half)
        } else {
            (f64::NAN, f64::NAN)
        };

        let (min, max) = cross_extrema(&[a.min, a.max], &[b.min, b.max]);

        DataAggregate::derived(
            self.kind,
            self.confidence,
            Summary {
                value: ratio,
                stdev,
                min,
                max,
                ci_lower,
                ci_upper,
                count: a.count,
            },
        )
    }

    /// Scales an aggregate by a plain divisor.
    pub fn div_scalar(&self, divisor: f64) -> DataAggregate {
        let a = self.summary();
        let (mut lo, mut hi) = (safe_div(a.ci_lower, divisor), safe_div(a.ci_upper, divisor));
        let (mut min, mut max) = (safe_div(a.min, divisor), safe_div(a.max, divisor));
        if divisor < 0.0 {
            std::mem::swap(&mut lo, &mut hi);
            std::mem::swap(&mut min, &mut max);
        }

        DataAggregate::derived(
            self.kind,
            self.confidence,
            Summary {
                value: safe_div(a.value, divisor),
                stdev: safe_div(a.stdev, divisor.abs()),
                min,
                max,
                ci_lower: lo,
                ci_upper: hi,
                count: a.count,
            },
        )
    }

    /// Divides a plain number by an aggregate. The result has no interval.
    pub fn scalar_div(dividend: f64, divisor: &DataAggregate) -> DataAggregate {
        let b = divisor.summary();
        let (min, max) = cross_extrema(&[dividend], &[b.min, b.max]);

        DataAggregate::derived(
            divisor.kind,
            divisor.confidence,
            Summary {
                value: safe_div(dividend, b.value),
                stdev: 0.0,
                min,
                max,
                ci_lower: f64::NAN,
                ci_upper: f64::NAN,
                count: b.count,
            },
        )
    }
}

impl Display for DataAggregate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3} [n={}]", self.value(), self.count())
    }
}

/// Division where a zero divisor yields an infinity carrying the dividend's sign.
pub fn safe_div(dividend: f64, divisor: f64) -> f64 {
    if divisor == 0.0 {
        f64::INFINITY.copysign(dividend)
    } else {
        dividend / divisor
    }
}

fn cross_extrema(dividends: &[f64], divisors: &[f64]) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &a in dividends {
        for &b in divisors {
            let q = safe_div(a, b);
            min = min.min(q);
            max = max.max(q);
        }
    }
    if min > max {
        (f64::NAN, f64::NAN)
    } else {
        (min, max)
    }
}

fn summarize(kind: AggregateKind, confidence: f64, samples: &[f64]) -> Summary {
    let count = samples.len();
    if count == 0 {
        return Summary {
            value: f64::NAN,
            stdev: 0.0,
            min: f64::NAN,
            max: f64::NAN,
            ci_lower: f64::NAN,
            ci_upper: f64::NAN,
            count,
        };
    }

    let n = count as f64;
    let mean = samples.iter().sum::<f64>() / n;
    let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
    let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let stdev = if count < 2 {
        0.0
    } else {
        let sq: f64 = samples.iter().map(|x| (x - mean) * (x - mean)).sum();
        (sq / (n - 1.0)).sqrt()
    };

    let value = match kind {
        AggregateKind::Mean => mean,
        AggregateKind::Geomean => geomean(samples),
    };

    let (ci_lower, ci_upper) = if kind == AggregateKind::Mean && count >= 2 {
        let half = t_quantile(1.0 - confidence, n - 1.0) * stdev / n.sqrt();
        (value - half, value + half)
    } else {
        (f64::NAN, f64::NAN)
    };

    Summary {
        value,
        stdev,
        min,
        max,
        ci_lower,
        ci_upper,
        count,
    }
}

/// Geometric mean; any negative sample gives NaN and any zero gives 0.
pub fn geomean(samples: &[f64]) -> f64 {
    if samples.iter().any(|x| *x < 0.0) {
        return f64::NAN;
    }
    if samples.iter().any(|x| *x == 0.0) {
        return 0.0;
    }
    let logs: f64 = samples.iter().map(|x| x.ln()).sum();
    (logs / samples.len() as f64).exp()
}
