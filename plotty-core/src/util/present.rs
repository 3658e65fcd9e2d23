use crate::model::{ScenarioCell, Value};

const SPARKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Human-readable rendering of a value, with its CI as percentages where one exists.
pub fn present_value(value: &Value) -> String {
    match value {
        Value::Number(v) => format!("{v}"),
        Value::Aggregate(agg) => {
            let mut out = format!("{:.3}", agg.value());
            let (down, up) = agg.ci_percent();
            if !up.is_nan() {
                if (down - up).abs() < 1e-9 {
                    out.push_str(&format!(" ±{down:.2}%"));
                } else {
                    out.push_str(&format!(" -{down:.2}%, +{up:.2}%"));
                }
            }
            out
        }
    }
}

/// CSV cell(s) for a value. With `with_ci` this is three cells: value, lower, upper.
pub fn present_value_csv(value: &Value, with_ci: bool) -> Vec<String> {
    if with_ci {
        let (lo, hi) = value.bounds();
        vec![
            format_float(value.value()),
            format_float(lo),
            format_float(hi),
        ]
    } else {
        vec![format_float(value.value())]
    }
}

pub fn present_scenario(cell: &ScenarioCell) -> String {
    match cell {
        ScenarioCell::Raw(v) => v.clone(),
        ScenarioCell::Styled(v) if v.value != v.display => format!("{} ({})", v.display, v.value),
        ScenarioCell::Styled(v) => v.display.clone(),
    }
}

pub fn present_scenario_csv(cell: &ScenarioCell) -> String {
    cell.display().to_string()
}

pub fn format_float(v: f64) -> String {
    if v.is_nan() {
        "nan".to_string()
    } else if v.is_infinite() {
        if v > 0.0 { "inf" } else { "-inf" }.to_string()
    } else {
        format!("{v:.6}")
    }
}

/// Unicode sparkline of an aggregate's contributions, in order.
pub fn sparkline(samples: &[f64]) -> String {
    let finite: Vec<f64> = samples.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return String::new();
    }
    let lo = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = hi - lo;

    finite
        .iter()
        .map(|v| {
            if span == 0.0 {
                SPARKS[SPARKS.len() / 2]
            } else {
                let slot = ((v - lo) / span * (SPARKS.len() - 1) as f64).round() as usize;
                SPARKS[slot.min(SPARKS.len() - 1)]
            }
        })
        .collect()
}
