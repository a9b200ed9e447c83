use std::fmt::Write as _;

use crate::sorter::Warning;

/// Renders warnings as YAML comment lines, one per warning.
///
/// The result can be written in front of an encoded document without making
/// it invalid YAML.
pub fn comments(warnings: &[Warning]) -> String {
    let mut out = String::new();
    for w in warnings {
        // keys may span lines; a stray newline would end the comment
        let line = w.to_string().replace(['\r', '\n'], " ");
        let _ = writeln!(out, "# yamlsort: {line}");
    }
    out
}
