use crate::block::{GraphKind, GraphOutput};
use crate::plot::PlotError;
use std::path::Path;

const HISTOGRAM: &str = r#"set terminal svg size 800,480 dynamic
set output '{graph_path}.svg'
set datafile separator ","
set ylabel "{yaxis_title}"
set style data histogram
set style histogram errorbars gap 1 lw 1
set style fill solid border -1
set key autotitle columnheader
set xtics rotate by -45
{line_styles}
plot for [COL=2:{num_cols}:3] "{graph_path}.csv" u COL:COL+1:COL+2:xtic(1) title col(COL)
"#;

const XY: &str = r#"set terminal svg size 800,480 dynamic
set output '{graph_path}.svg'
set datafile separator ","
set xlabel "{xaxis_title}"
set ylabel "{yaxis_title}"
set key autotitle columnheader
{line_styles}
plot for [COL=2:{num_cols}:3] "{graph_path}.csv" u 1:COL:xtic(1) title col(COL) w lines, for [COL=2:{num_cols}:3] "" u 1:COL:COL+1:COL+2 notitle w yerr
"#;

const SCATTER: &str = r#"set terminal svg size 800,480 dynamic
set output '{graph_path}.svg'
set datafile separator ","
set xlabel "{xaxis_title}"
set ylabel "{yaxis_title}"
plot "{graph_path}.csv" u 2:5 title "{series}" with points
"#;

/// Substrings that would let a template run arbitrary commands.
const UNSAFE_PATTERNS: [&str; 5] = ["system", "`", "$(", "\"<", "'<"];

/// The builtin template for graphs that name none.
pub fn default_template(kind: GraphKind) -> &'static str {
    match kind {
        GraphKind::Histogram | GraphKind::Series => HISTOGRAM,
        GraphKind::Xy => XY,
        GraphKind::Scatter => SCATTER,
    }
}

/// Refuses templates that look like they shell out.
pub fn check_template(template: &str) -> Result<(), PlotError> {
    if let Some(pattern) = UNSAFE_PATTERNS.iter().find(|p| template.contains(*p)) {
        return Err(PlotError::UnsafeTemplate {
            pattern: pattern.to_string(),
        });
    }
    if template.lines().any(|l| l.trim_start().starts_with('!')) {
        return Err(PlotError::UnsafeTemplate {
            pattern: "!".to_string(),
        });
    }
    Ok(())
}

/// Fills the placeholders of a template for one graph.
///
/// `graph_path` is the CSV path without its extension.
pub fn render_template(template: &str, graph: &GraphOutput, graph_path: &Path) -> String {
    // Row key, then value and both bounds per column; the last value sits at 3n - 1.
    let num_cols = (graph.columns.len() * 3).saturating_sub(1).max(2);
    let series = graph
        .columns
        .iter()
        .map(|c| c.replace('"', "'"))
        .collect::<Vec<_>>()
        .join(", ");
    let line_styles = (1..=graph.columns.len())
        .map(|i| format!("set style line {i} linetype {i} linewidth 2"))
        .collect::<Vec<_>>()
        .join("\n");

    template
        .replace("{graph_path}", &graph_path.to_string_lossy())
        .replace("{num_cols}", &num_cols.to_string())
        .replace("{series}", &series)
        .replace("{yaxis_title}", &graph.value_label.replace('"', "'"))
        .replace("{xaxis_title}", &graph.row_header.replace('"', "'"))
        .replace("{line_styles}", &line_styles)
}
