use crate::parse::patterns::{BUILD_KV, FILENAME, LEADING_DIGIT};
use std::collections::BTreeMap;

/// Scenario encoded in a legacy log file name, `benchmark.hfac.heap.buildstring.log.gz`.
///
/// The build string is split on `.`: its first token is the build, tokens starting
/// with a digit are skipped, `key-value` tokens set `key` and anything else is a
/// flag set to `1`. Returns `None` when the name doesn't follow the grammar.
pub fn scenario_from_filename(name: &str) -> Option<BTreeMap<String, String>> {
    let caps = FILENAME.captures(name)?;

    let mut scenario = BTreeMap::new();
    scenario.insert("benchmark".to_string(), caps[1].to_string());
    scenario.insert("hfac".to_string(), caps[2].to_string());
    scenario.insert("heap".to_string(), caps[3].to_string());

    let buildstring = &caps[4];
    scenario.insert("buildstring".to_string(), buildstring.to_string());

    let mut params = buildstring.split('.');
    if let Some(build) = params.next() {
        scenario.insert("build".to_string(), build.to_string());
    }

    for param in params {
        if LEADING_DIGIT.is_match(param) {
            continue;
        }
        match BUILD_KV.captures(param) {
            Some(kv) => {
                scenario.insert(kv[1].to_string(), kv[2].to_string());
            }
            None => {
                scenario.insert(param.to_string(), "1".to_string());
            }
        }
    }

    Some(scenario)
}
