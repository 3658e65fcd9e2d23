use crate::parse::{LogParser, normalize_key};
use pretty_assertions::assert_eq;
use std::io::Cursor;

fn parse(parser: &mut LogParser, name: &str, text: &str) -> Vec<crate::model::LogRecord> {
    parser
        .parse("run1", name, Cursor::new(text.as_bytes().to_vec()))
        .unwrap()
}

const LEGACY_NAME: &str = "fop.2.64.jdk8.gc-ms.fast.log.gz";

#[test]
fn single_passed_line_yields_one_record() {
    // Arrange
    let mut parser = LogParser::new();
    let text = "mkdir /tmp/timedrun\nPASSED in 120 msec\n";

    // Act
    let records = parse(&mut parser, LEGACY_NAME, text);

    // Assert
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].get("bmtime"), Some("120"));
    assert_eq!(records[0].scenario["log"], "run1");
    assert_eq!(records[0].scenario["benchmark"], "fop");
    assert_eq!(records[0].scenario["iteration"], "0");
}

#[test]
fn error_discards_only_its_own_invocation() {
    // Arrange
    let mut parser = LogParser::new();
    let text = "\
mkdir timedrun
===== DaCapo fop PASSED in 100 msec =====
mkdir timedrun
===== DaCapo fop starting =====
java.lang.OutOfMemoryError
===== DaCapo fop PASSED in 999 msec =====
mkdir timedrun
===== DaCapo fop PASSED in 300 msec =====
";

    // Act
    let records = parse(&mut parser, LEGACY_NAME, text);

    // Assert
    let times: Vec<_> = records.iter().map(|r| r.get("bmtime").unwrap()).collect();
    assert_eq!(times, vec!["100", "300"]);
    assert_eq!(records[0].scenario["invocation"], "0");
    assert_eq!(records[1].scenario["invocation"], "2");
}

#[test]
fn starting_marker_separates_iterations() {
    // Arrange
    let mut parser = LogParser::new();
    let text = "\
mkdir timedrun
===== DaCapo fop starting warmup 1 =====
===== DaCapo fop completed warmup 1 in 200 msec =====
===== DaCapo fop starting =====
===== DaCapo fop PASSED in 150 msec =====
";

    // Act
    let records = parse(&mut parser, LEGACY_NAME, text);

    // Assert
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].scenario["iteration"], "0");
    assert_eq!(records[0].get("bmtime"), Some("200"));
    assert_eq!(records[1].scenario["iteration"], "1");
    assert_eq!(records[1].get("bmtime"), Some("150"));
}

#[test]
fn second_completion_flushes_the_first() {
    let mut parser = LogParser::new();
    let text = "mkdir timedrun\nPASSED in 10 msec\nPASSED in 20 msec\n";

    let records = parse(&mut parser, LEGACY_NAME, text);

    assert_eq!(records.len(), 2);
    assert_eq!(records[1].scenario["iteration"], "1");
}

#[test]
fn finished_marker_is_converted_to_milliseconds() {
    let mut parser = LogParser::new();
    let text = "mkdir timedrun\nFinished in 1.5 secs\n";

    let records = parse(&mut parser, LEGACY_NAME, text);

    assert_eq!(records[0].get("bmtime"), Some("1500"));
}

#[test]
fn finished_marker_for_997_and_998_is_ignored() {
    let mut parser = LogParser::new();
    let text = "mkdir timedrun\n_998_ Finished in 1.5 secs\n";

    let records = parse(&mut parser, LEGACY_NAME, text);

    assert!(records.is_empty());
}

#[test]
fn mmtk_statistics_add_total_time() {
    // Arrange
    let mut parser = LogParser::new();
    let text = "\
mkdir timedrun
============================ MMTk Statistics Totals ============================
GC\ttime.mu\ttime.gc
3\t100.0\t20.5
PASSED in 130 msec
";

    // Act
    let records = parse(&mut parser, LEGACY_NAME, text);

    // Assert
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].get("gc"), None);
    assert_eq!(records[0].get("GC"), Some("3"));
    assert_eq!(records[0].get("time"), Some("120.5"));
    assert_eq!(records[0].get("bmtime"), Some("130"));
}

#[test]
fn non_numeric_mmtk_time_is_kept_without_a_total() {
    // Arrange
    let mut parser = LogParser::new();
    let text = "\
mkdir timedrun
============================ MMTk Statistics Totals ============================
GC\ttime.mu\ttime.gc
3\t100.0\tn/a
PASSED in 130 msec
";

    // Act
    let records = parse(&mut parser, LEGACY_NAME, text);

    // Assert
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].get("time.gc"), Some("n/a"));
    assert_eq!(records[0].get("time.mu"), Some("100.0"));
    assert_eq!(records[0].get("time"), None);
    assert_eq!(records[0].get("bmtime"), Some("130"));
}

#[test]
fn malformed_statistics_row_is_an_error() {
    let mut parser = LogParser::new();
    let text = "\
mkdir timedrun
============================ Tabulate Statistics ============================
a b c
1 2
PASSED in 130 msec
";

    let records = parse(&mut parser, LEGACY_NAME, text);

    assert!(records.is_empty());
}

#[test]
fn scenario_markers_switch_off_legacy_names_for_the_batch() {
    // Arrange
    let mut parser = LogParser::new();
    let modern = "mkdir timedrun\n====> Scenario Heap-Size=64\nPASSED in 1 msec\n";
    let later = "mkdir timedrun\nPASSED in 2 msec\n";

    // Act
    let first = parse(&mut parser, "whatever.log.gz", modern);
    let second = parse(&mut parser, LEGACY_NAME, later);

    // Assert
    assert!(!parser.is_legacy());
    assert_eq!(first[0].scenario["heap_size"], "64");
    assert!(!second[0].scenario.contains_key("benchmark"));
}

#[test]
fn incomplete_invocation_at_end_is_flushed() {
    let mut parser = LogParser::new();
    let text = "mkdir timedrun\nPASSED in 5 msec\n===== x starting =====\nPASSED in 6 msec";

    let records = parse(&mut parser, LEGACY_NAME, text);

    assert_eq!(records.len(), 2);
}

#[test]
fn lines_before_first_invocation_are_ignored() {
    let mut parser = LogParser::new();
    let text = "PASSED in 5 msec\n";

    assert!(parse(&mut parser, LEGACY_NAME, text).is_empty());
}

#[test]
fn keys_are_normalized() {
    assert_eq!(normalize_key("Heap Size"), "heap_size");
    assert_eq!(normalize_key("GC-Plan.x"), "gc_plan_x");
}
