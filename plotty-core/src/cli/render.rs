use crate::block::GraphOutput;
use crate::model::{DataTable, Messages};
use crate::util::present::{
    present_scenario, present_scenario_csv, present_value, present_value_csv, sparkline,
};
use owo_colors::OwoColorize;

/// Prints a table as aligned text columns.
pub fn print_table(table: &DataTable) {
    let (scenarios, values) = table.headers();
    let mut header: Vec<String> = scenarios.clone();
    header.extend(values.iter().map(|v| table.value_label(v).to_string()));

    let rows: Vec<Vec<String>> = table
        .iter()
        .map(|row| {
            let mut cells: Vec<String> = scenarios
                .iter()
                .map(|c| row.scenario.get(c).map(present_scenario).unwrap_or_default())
                .collect();
            cells.extend(
                values
                    .iter()
                    .map(|v| row.values.get(v).map(present_value).unwrap_or_default()),
            );
            cells
        })
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{c:<w$}"))
            .collect::<Vec<_>>()
            .join("  ")
    };

    println!("{}", line(&header).bold());
    for row in &rows {
        println!("{}", line(row));
    }
    println!("{}", format!("{} row(s)", table.len()).dimmed());
}

/// CSV rendering of a table: scenario columns, then each value column with its
/// confidence bounds where any row has them.
pub fn table_csv(table: &DataTable) -> Result<String, csv::Error> {
    let (scenarios, values) = table.headers();
    let with_ci: Vec<bool> = values
        .iter()
        .map(|v| table.iter().any(|r| r.values.get(v).is_some_and(|x| x.has_ci())))
        .collect();

    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header: Vec<String> = scenarios.clone();
    for (value, ci) in values.iter().zip(&with_ci) {
        let label = table.value_label(value);
        header.push(label.to_string());
        if *ci {
            header.push(format!("{label}.lower"));
            header.push(format!("{label}.upper"));
        }
    }
    writer.write_record(&header)?;

    for row in table {
        let mut record: Vec<String> = scenarios
            .iter()
            .map(|c| row.scenario.get(c).map(present_scenario_csv).unwrap_or_default())
            .collect();
        for (value, ci) in values.iter().zip(&with_ci) {
            match row.values.get(value) {
                Some(v) => record.extend(present_value_csv(v, *ci)),
                None => record.extend(std::iter::repeat_n(String::new(), if *ci { 3 } else { 1 })),
            }
        }
        writer.write_record(&record)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

pub fn print_messages(messages: &Messages) {
    for (title, detail) in &messages.warn {
        eprintln!("{} {}: {detail}", "warning".yellow().bold(), title);
    }
    for (title, detail) in &messages.info {
        eprintln!("{} {}: {detail}", "info".blue().bold(), title);
    }
}

pub fn print_graph(graph: &GraphOutput) {
    println!();
    println!("{} ({:?})", graph.title.bold(), graph.kind);
    for (i, (column, stats)) in graph.columns.iter().zip(&graph.stats).enumerate() {
        let values: Vec<f64> = graph
            .rows
            .iter()
            .filter_map(|r| r.cells.get(i)?.as_ref().map(|v| v.value()))
            .collect();
        println!(
            "  {column:<20} {}  min {:.3}  max {:.3}  mean {:.3}  geomean {:.3}",
            sparkline(&values),
            stats.min,
            stats.max,
            stats.mean,
            stats.geomean
        );
    }
}
