//! Line-rule scanner.
//!
//! Output is processed one trimmed line at a time. For each line the rules
//! are tried in declaration order; the first rule whose guards hold and whose
//! pattern matches fires, writes into the result structure, optionally
//! updates the [`ScanContext`], and decides what happens next ([`Flow`]).
//! Lines no rule fires on are ignored, so banners, separators and blank lines
//! never affect the result.

mod captured;
mod context;
mod rule;

pub use captured::{Captured, Output};
pub use context::ScanContext;
pub use rule::{Action, Conversion, Flow, Guard, Rule, Segment};

use log::debug;

use crate::error::ScanError;
use crate::value::Map;

/// Applies an ordered rule set to command output.
#[derive(Debug, Clone, Copy)]
pub struct Scanner<'r> {
    rules: &'r [Rule],
}

impl<'r> Scanner<'r> {
    /// Create a scanner over a rule set.
    pub fn new(rules: &'r [Rule]) -> Self {
        Self { rules }
    }

    /// Scan text into a new result structure.
    ///
    /// The context is consumed; every scan starts from whatever state the
    /// caller seeds it with (normally [`ScanContext::new`]).
    pub fn scan(&self, text: &str, mut context: ScanContext) -> Result<Map, ScanError> {
        let mut result = Map::new();
        let mut fired = 0usize;
        let mut halted = false;

        'lines: for raw in text.lines() {
            context.advance_line();
            let line = raw.trim();

            for rule in self.rules {
                match rule.apply(line, &mut context, &mut result)? {
                    None => continue,
                    Some(Flow::Next) => {
                        fired += 1;
                        continue 'lines;
                    }
                    Some(Flow::Fallthrough) => fired += 1,
                    Some(Flow::Halt) => {
                        fired += 1;
                        halted = true;
                        break 'lines;
                    }
                }
            }
        }

        debug!(
            "Scanned {} lines, {} rule firings{}",
            context.line_number(),
            fired,
            if halted { " (halted)" } else { "" }
        );
        Ok(result)
    }
}

/// Scan text with a rule set.
///
/// Shorthand for `Scanner::new(rules).scan(text, context)`.
pub fn scan(rules: &[Rule], text: &str, context: ScanContext) -> Result<Map, ScanError> {
    Scanner::new(rules).scan(text, context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScanErrorKind;
    use crate::value::{MapExt, Value};

    fn traffic_rules() -> Vec<Rule> {
        vec![
            Rule::new("icmp", r"^ICMP +statistics:$")
                .unwrap()
                .enter("section", "icmp")
                .leave("direction"),
            Rule::new("igmp", r"^IGMP +statistics:$")
                .unwrap()
                .enter("section", "igmp")
                .leave("direction"),
            Rule::new("rcvd", r"^Rcvd:")
                .unwrap()
                .enter("direction", "rcvd")
                .fallthrough(),
            Rule::new("sent", r"^Sent:")
                .unwrap()
                .enter("direction", "sent")
                .fallthrough(),
            Rule::new("icmp_rcvd_echo", r"^(Rcvd: +)?(?P<echo>\d+) +echo$")
                .unwrap()
                .when(Guard::mode_is("section", "icmp"))
                .when(Guard::mode_is("direction", "rcvd"))
                .then(|caps, out, _| {
                    out.set(&["icmp_statistics"], "received_echo", caps.int("echo")?)
                }),
            Rule::new("icmp_sent_echo", r"^(Sent: +)?(?P<echo>\d+) +echo$")
                .unwrap()
                .when(Guard::mode_is("section", "icmp"))
                .when(Guard::mode_is("direction", "sent"))
                .then(|caps, out, _| out.set(&["icmp_statistics"], "sent_echo", caps.int("echo")?)),
            Rule::new("igmp_queries", r"^(?P<igmp_total>\d+)/(?P<igmp_errors>\d+) +total$")
                .unwrap()
                .when(Guard::mode_is("section", "igmp"))
                .update(&["igmp_statistics"]),
        ]
    }

    #[test]
    fn test_direction_gating() {
        let text = "\
ICMP statistics:
  Rcvd: 0 format errors
        12 echo
  Sent: 3 redirects
        7 echo
";
        let result = scan(&traffic_rules(), text, ScanContext::new()).unwrap();
        assert_eq!(
            result.lookup(&["icmp_statistics", "received_echo"]),
            Some(&Value::Int(12))
        );
        assert_eq!(
            result.lookup(&["icmp_statistics", "sent_echo"]),
            Some(&Value::Int(7))
        );
    }

    #[test]
    fn test_section_gating() {
        // The same line shape outside its section is ignored
        let text = "\
  5/0 total
IGMP statistics:
  9/1 total
";
        let result = scan(&traffic_rules(), text, ScanContext::new()).unwrap();
        assert_eq!(
            result.lookup(&["igmp_statistics", "igmp_total"]),
            Some(&Value::Int(9))
        );
        assert_eq!(
            result.lookup(&["igmp_statistics", "igmp_errors"]),
            Some(&Value::Int(1))
        );
    }

    #[test]
    fn test_decorative_lines_ignored() {
        let plain = "ICMP statistics:\nRcvd: 0 format errors\n12 echo\n";
        let noisy = "\n----\nICMP statistics:\n\n   Rcvd: 0 format errors   \n# banner\n\t12 echo\n----\n";

        let rules = traffic_rules();
        assert_eq!(
            scan(&rules, plain, ScanContext::new()).unwrap(),
            scan(&rules, noisy, ScanContext::new()).unwrap()
        );
    }

    #[test]
    fn test_idempotent() {
        let text = "ICMP statistics:\nRcvd: 0 format errors\n12 echo\n";
        let rules = traffic_rules();
        let scanner = Scanner::new(&rules);
        assert_eq!(
            scanner.scan(text, ScanContext::new()).unwrap(),
            scanner.scan(text, ScanContext::new()).unwrap()
        );
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let rules = vec![
            Rule::new("first", r"^(?P<a>\d+)$").unwrap().update(&["first"]),
            Rule::new("second", r"^(?P<a>\d+)$").unwrap().update(&["second"]),
        ];
        let result = scan(&rules, "1\n", ScanContext::new()).unwrap();
        assert!(result.contains_key("first"));
        assert!(!result.contains_key("second"));
    }

    #[test]
    fn test_fallthrough_reaches_later_rules() {
        let rules = vec![
            Rule::new("first", r"^(?P<a>\d+)$")
                .unwrap()
                .update(&["first"])
                .fallthrough(),
            Rule::new("second", r"^(?P<a>\d+)$").unwrap().update(&["second"]),
        ];
        let result = scan(&rules, "1\n", ScanContext::new()).unwrap();
        assert!(result.contains_key("first"));
        assert!(result.contains_key("second"));
    }

    #[test]
    fn test_halt_stops_scan() {
        let rules = vec![
            Rule::new("row", r"^(?P<vlan>\d+) +(?P<forwarded>\d+)$")
                .unwrap()
                .then(|caps, out, _| {
                    let vlan = caps.int_key("vlan")?;
                    out.set(&["vlan", vlan.as_str()], "forwarded", caps.int("forwarded")?)
                })
                .halt(),
        ];
        let result = scan(&rules, "10 5\n20 6\n", ScanContext::new()).unwrap();
        let vlans = result["vlan"].as_map().unwrap();
        assert_eq!(vlans.len(), 1);
        assert!(vlans.contains_key("10"));
    }

    #[test]
    fn test_last_write_wins_per_field() {
        let rules = vec![
            Rule::new("a", r"^a (?P<x>\d+)$").unwrap().update(&["entry"]),
            Rule::new("b", r"^b (?P<y>\d+)$").unwrap().update(&["entry"]),
        ];
        let result = scan(&rules, "a 1\nb 2\na 3\n", ScanContext::new()).unwrap();
        let entry = result["entry"].as_map().unwrap();
        assert_eq!(entry["x"], Value::Int(3));
        assert_eq!(entry["y"], Value::Int(2));
    }

    #[test]
    fn test_error_reports_line_number() {
        let rules = vec![Rule::new("count", r"^(?P<n>\w+) entries$").unwrap().update(&[])];
        let err = scan(&rules, "header\n3 entries\nmany entries\n", ScanContext::new())
            .unwrap_err();
        assert_eq!(err.line_number, 3);
        assert_eq!(err.line, "many entries");
        assert!(matches!(err.kind, ScanErrorKind::InvalidInteger { .. }));
    }

    #[test]
    fn test_seeded_context() {
        let rules = vec![
            Rule::new("gated", r"^(?P<n>\d+)$")
                .unwrap()
                .when(Guard::mode_set("ready"))
                .update(&[]),
        ];
        assert!(scan(&rules, "1\n", ScanContext::new()).unwrap().is_empty());
        let result = scan(&rules, "1\n", ScanContext::new().with_mode("ready", "yes")).unwrap();
        assert_eq!(result["n"], Value::Int(1));
    }

    #[test]
    fn test_rules_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Rule>();
        assert_send_sync::<ScanContext>();
    }
}
