//! Typed access to a fired rule's captures and to the result being built.

use regex::{Captures, Regex};

use super::context::ScanContext;
use crate::error::{ScanError, ScanErrorKind};
use crate::schema::KeyPath;
use crate::value::{Map, Value};

/// Where a rule fired, for diagnostics.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Site<'a> {
    pub(crate) rule: &'a str,
    pub(crate) line_number: usize,
    pub(crate) line: &'a str,
}

impl Site<'_> {
    pub(crate) fn error(&self, kind: ScanErrorKind) -> ScanError {
        ScanError {
            rule: self.rule.to_string(),
            line_number: self.line_number,
            line: self.line.to_string(),
            kind,
        }
    }
}

/// The named captures of a rule that matched a line.
///
/// Conversions that fail are rule defects and come back as [`ScanError`]s
/// naming the rule, line, capture and offending text.
pub struct Captured<'a> {
    captures: Captures<'a>,
    pattern: &'a Regex,
    site: Site<'a>,
}

impl<'a> Captured<'a> {
    pub(crate) fn new(captures: Captures<'a>, pattern: &'a Regex, site: Site<'a>) -> Self {
        Self {
            captures,
            pattern,
            site,
        }
    }

    /// The trimmed line the rule matched.
    pub fn line(&self) -> &'a str {
        self.site.line
    }

    /// Get a capture if it participated in the match.
    pub fn get(&self, name: &str) -> Option<&'a str> {
        self.captures.name(name).map(|m| m.as_str())
    }

    /// Get a capture that must have participated in the match.
    pub fn str(&self, name: &str) -> Result<&'a str, ScanError> {
        self.get(name).ok_or_else(|| {
            self.site.error(ScanErrorKind::MissingCapture {
                capture: name.to_string(),
            })
        })
    }

    /// Parse a capture as a base-10 integer.
    pub fn int(&self, name: &str) -> Result<i128, ScanError> {
        let text = self.str(name)?;
        self.parse_int(name, text)
    }

    /// Parse a capture as an integer if it participated in the match.
    pub fn opt_int(&self, name: &str) -> Result<Option<i128>, ScanError> {
        self.get(name)
            .map(|text| self.parse_int(name, text))
            .transpose()
    }

    /// Parse a capture as an integer and render it back as a mapping key.
    ///
    /// Used for identifiers that are integers by nature (VLAN ids, process
    /// ids) so that `007` and `7` name the same entry.
    pub fn int_key(&self, name: &str) -> Result<String, ScanError> {
        self.int(name).map(|i| i.to_string())
    }

    /// An integer if the capture is all digits, otherwise the text.
    pub fn int_or_str(&self, name: &str) -> Result<Value, ScanError> {
        let text = self.str(name)?;
        Ok(text
            .parse::<i128>()
            .map(Value::Int)
            .unwrap_or_else(|_| Value::from(text)))
    }

    /// Get a context mode this action depends on.
    pub fn require_mode<'c>(&self, context: &'c ScanContext, mode: &str) -> Result<&'c str, ScanError> {
        context.get(mode).ok_or_else(|| {
            self.site.error(ScanErrorKind::MissingMode {
                mode: mode.to_string(),
            })
        })
    }

    /// Iterate over the named captures that participated, in pattern order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a str)> + '_ {
        self.pattern
            .capture_names()
            .flatten()
            .filter_map(|name| self.captures.name(name).map(|m| (name, m.as_str())))
    }

    fn parse_int(&self, name: &str, text: &str) -> Result<i128, ScanError> {
        text.parse::<i128>().map_err(|_| {
            self.site.error(ScanErrorKind::InvalidInteger {
                capture: name.to_string(),
                value: text.to_string(),
            })
        })
    }
}

/// Write access to the result structure while a rule fires.
pub struct Output<'a> {
    map: &'a mut Map,
    site: Site<'a>,
}

impl<'a> Output<'a> {
    pub(crate) fn new(map: &'a mut Map, site: Site<'a>) -> Self {
        Self { map, site }
    }

    /// The root of the result structure.
    pub fn root(&mut self) -> &mut Map {
        self.map
    }

    /// Get the mapping at `path`, creating every missing level.
    ///
    /// Existing entries are reused, so repeated writes to the same location
    /// accumulate fields rather than replacing the entry.
    pub fn entry<S: AsRef<str>>(&mut self, path: &[S]) -> Result<&mut Map, ScanError> {
        let site = self.site;
        let mut map: &mut Map = self.map;
        for (depth, key) in path.iter().enumerate() {
            let slot = map
                .entry(key.as_ref().to_string())
                .or_insert_with(|| Value::Map(Map::new()));
            map = match slot {
                Value::Map(inner) => inner,
                other => {
                    let path: KeyPath = path[..=depth].iter().map(|k| k.as_ref()).collect();
                    return Err(site.error(ScanErrorKind::PathConflict {
                        path: path.to_string(),
                        found: other.kind().name(),
                    }));
                }
            };
        }
        Ok(map)
    }

    /// Write one field into the mapping at `path`.
    pub fn set<S: AsRef<str>>(
        &mut self,
        path: &[S],
        key: &str,
        value: impl Into<Value>,
    ) -> Result<(), ScanError> {
        self.entry(path)?.insert(key.to_string(), value.into());
        Ok(())
    }

    /// Append one item to the list `key` in the mapping at `path`, creating
    /// the list on first use.
    pub fn push<S: AsRef<str>>(
        &mut self,
        path: &[S],
        key: &str,
        value: impl Into<Value>,
    ) -> Result<(), ScanError> {
        let site = self.site;
        let slot = self
            .entry(path)?
            .entry(key.to_string())
            .or_insert_with(|| Value::List(Vec::new()));
        match slot {
            Value::List(items) => {
                items.push(value.into());
                Ok(())
            }
            other => {
                let full = path.iter().map(|k| k.as_ref()).collect::<KeyPath>().child(key);
                Err(site.error(ScanErrorKind::PathConflict {
                    path: full.to_string(),
                    found: other.kind().name(),
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::MapExt;

    fn site(line: &str) -> Site<'_> {
        Site {
            rule: "test_rule",
            line_number: 7,
            line,
        }
    }

    #[test]
    fn test_typed_captures() {
        let re = Regex::new(r"^(?P<total>\w+) +IP +ARP +entries(, +(?P<incomplete>\d+))?$").unwrap();
        let line = "40 IP ARP entries, 3";
        let caps = Captured::new(re.captures(line).unwrap(), &re, site(line));

        assert_eq!(caps.int("total").unwrap(), 40);
        assert_eq!(caps.opt_int("incomplete").unwrap(), Some(3));
        assert_eq!(caps.int_key("total").unwrap(), "40");

        let names: Vec<&str> = caps.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["total", "incomplete"]);
    }

    #[test]
    fn test_counter_beyond_i64() {
        let re = Regex::new(r"^(?P<octets>\d+) +octets$").unwrap();
        let line = "18446744073709551615 octets";
        let caps = Captured::new(re.captures(line).unwrap(), &re, site(line));

        assert_eq!(caps.int("octets").unwrap(), u64::MAX as i128);
        assert_eq!(caps.int_or_str("octets").unwrap(), Value::from(u64::MAX));
    }

    #[test]
    fn test_invalid_integer_is_a_defect() {
        let re = Regex::new(r"^(?P<total>\w+) +IP +ARP +entries$").unwrap();
        let line = "forty IP ARP entries";
        let caps = Captured::new(re.captures(line).unwrap(), &re, site(line));

        let err = caps.int("total").unwrap_err();
        assert_eq!(err.rule, "test_rule");
        assert_eq!(err.line_number, 7);
        assert_eq!(err.line, "forty IP ARP entries");
        assert_eq!(
            err.kind,
            ScanErrorKind::InvalidInteger {
                capture: "total".to_string(),
                value: "forty".to_string(),
            }
        );
        assert_eq!(caps.int_or_str("total").unwrap(), Value::from("forty"));
    }

    #[test]
    fn test_optional_capture() {
        let re = Regex::new(r"^(?P<other>\d+) +other(, +(?P<ignored>\d+) +ignored)?$").unwrap();
        let line = "0 other";
        let caps = Captured::new(re.captures(line).unwrap(), &re, site(line));

        assert_eq!(caps.opt_int("ignored").unwrap(), None);
        assert!(matches!(
            caps.str("ignored").unwrap_err().kind,
            ScanErrorKind::MissingCapture { .. }
        ));
        assert_eq!(caps.iter().count(), 1);
    }

    #[test]
    fn test_require_mode() {
        let re = Regex::new(r"^State: (?P<state>\w+)$").unwrap();
        let line = "State: Up";
        let caps = Captured::new(re.captures(line).unwrap(), &re, site(line));

        let ctx = ScanContext::new();
        assert!(matches!(
            caps.require_mode(&ctx, "peer").unwrap_err().kind,
            ScanErrorKind::MissingMode { .. }
        ));

        let ctx = ctx.with_mode("peer", "192.168.0.1");
        assert_eq!(caps.require_mode(&ctx, "peer").unwrap(), "192.168.0.1");
    }

    #[test]
    fn test_entry_accumulates() {
        let mut map = Map::new();
        let mut out = Output::new(&mut map, site("x"));

        out.set(&["interfaces", "Vlan100"], "ip", "192.168.234.1").unwrap();
        out.set(&["interfaces", "Vlan100"], "type", "ARPA").unwrap();

        let entry = map.lookup(&["interfaces", "Vlan100"]).unwrap().as_map().unwrap();
        assert_eq!(entry.len(), 2);
    }

    #[test]
    fn test_push_collects_in_order() {
        let mut map = Map::new();
        let mut out = Output::new(&mut map, site("x"));

        out.push(&["nodes", "1"], "advertised_prefixes", "192.168.0.1").unwrap();
        out.push(&["nodes", "1"], "advertised_prefixes", "192.168.0.5").unwrap();
        out.set(&["nodes", "1"], "host_name", "rtrA").unwrap();
        let err = out.push(&["nodes", "1"], "host_name", "rtrB").unwrap_err();
        assert_eq!(
            err.kind,
            ScanErrorKind::PathConflict {
                path: "/nodes/1/host_name".to_string(),
                found: "str",
            }
        );

        assert_eq!(
            map.lookup(&["nodes", "1", "advertised_prefixes"]),
            Some(&Value::List(vec![
                Value::from("192.168.0.1"),
                Value::from("192.168.0.5")
            ]))
        );
    }

    #[test]
    fn test_entry_conflict() {
        let mut map = Map::new();
        map.put("vlan", 10_i64);
        let mut out = Output::new(&mut map, site("x"));

        let err = out.entry(&["vlan", "inner"]).unwrap_err();
        assert_eq!(
            err.kind,
            ScanErrorKind::PathConflict {
                path: "/vlan".to_string(),
                found: "int",
            }
        );
    }
}
