mod format_tests;
mod graph_tests;
mod normalize_tests;
mod registry_tests;
mod scenario_tests;
mod test_helpers;
