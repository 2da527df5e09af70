//! `show pce ipv4 prefix` and `show pce ipv4 topology summary`.
//!
//! ```text
//! PCE's prefix database:
//! ----------------------
//! Node 1
//!   TE router ID: 192.168.0.4
//!   Host name: rtrD
//!   ISIS system ID: 1921.6800.1004 level-1 ASN: 65001 domain ID: 1111
//!   Advertised Prefixes:
//!     192.168.0.4
//! ```
//!
//! The topology summary nests its counters under `Prefix SIDs:`, `Links:` and
//! `Adjacency SIDs:` headings. Older releases print the total on the heading
//! line itself; newer ones print it on a `Total:` line below.

use crate::error::ExtractorError;
use crate::extractor::Extractor;
use crate::scanner::{Conversion, Guard, Rule, Segment};
use crate::schema::Schema;

const SUMMARY: &str = "pce_topology_database_summary";

/// Create the `show pce ipv4 prefix` extractor.
pub fn show_pce_ipv4_prefix() -> Result<Extractor, ExtractorError> {
    let node_path = || vec![Segment::key("nodes"), Segment::mode("node")];

    let node = Schema::fixed()
        .required("te_router_id", Schema::str())
        .required("host_name", Schema::str())
        .required("isis_system_id", Schema::list(Schema::str()))
        .optional("asn", Schema::list(Schema::int()))
        .optional("domain_id", Schema::list(Schema::int()))
        .required("advertised_prefixes", Schema::list(Schema::str()));

    Ok(Extractor::new("show_pce_ipv4_prefix")
        .with_description("Nodes and advertised prefixes in the PCE prefix database")
        .with_command("show pce ipv4 prefix")?
        .with_rules([
            Rule::new("node", r"^Node (?P<node>\d+)$")?.then(|caps, out, ctx| {
                let node = caps.int_key("node")?;
                out.entry(&["nodes", node.as_str()])?;
                ctx.set("node", node);
                Ok(())
            }),
            Rule::new("te_router_id", r"^TE router ID: (?P<te_router_id>[\d\.]+)$")?
                .when(Guard::mode_set("node"))
                .conversion(Conversion::Str)
                .update_at(node_path()),
            Rule::new("host_name", r"^Host name: (?P<host_name>\S+)$")?
                .when(Guard::mode_set("node"))
                .conversion(Conversion::Str)
                .update_at(node_path()),
            Rule::new(
                "isis_system_id",
                r"^ISIS system ID: (?P<system_id>[\w\.]+\s+level-\d+)(?: ASN: (?P<asn>\d+) domain ID: (?P<domain_id>\d+))?",
            )?
            .when(Guard::mode_set("node"))
            .then(|caps, out, ctx| {
                let node = caps.require_mode(ctx, "node")?;
                let path = ["nodes", node];
                out.push(&path, "isis_system_id", caps.str("system_id")?)?;
                if let Some(asn) = caps.opt_int("asn")? {
                    out.push(&path, "asn", asn)?;
                }
                if let Some(domain) = caps.opt_int("domain_id")? {
                    out.push(&path, "domain_id", domain)?;
                }
                Ok(())
            }),
            Rule::new("advertised_prefix", r"^(?P<prefix>\d+\.\d+\.\d+\.\d+)$")?
                .when(Guard::mode_set("node"))
                .then(|caps, out, ctx| {
                    let node = caps.require_mode(ctx, "node")?;
                    out.push(&["nodes", node], "advertised_prefixes", caps.str("prefix")?)
                }),
        ])
        .with_schema(Schema::fixed().required("nodes", Schema::wildcard(node))))
}

/// Create the `show pce ipv4 topology summary` extractor.
pub fn show_pce_ipv4_topology_summary() -> Result<Extractor, ExtractorError> {
    let block_path = || vec![Segment::key(SUMMARY), Segment::mode("block")];

    // A heading opens a counter block and may carry its total
    let heading = |name: &str, pattern: &str, block: &str| -> Result<Rule, regex::Error> {
        Ok(Rule::new(name, pattern)?
            .update(&[SUMMARY, block])
            .enter("block", block))
    };

    let counter = |name: &str, pattern: &str, block: &str| -> Result<Rule, regex::Error> {
        Ok(Rule::new(name, pattern)?
            .when(Guard::mode_is("block", block))
            .update(&[SUMMARY, block]))
    };

    let update_stat = || Schema::fixed().required_all(&["added", "deleted"], Schema::int());

    Ok(Extractor::new("show_pce_ipv4_topology_summary")
        .with_description("Node, prefix, link and SID totals of the PCE topology database")
        .with_command("show pce ipv4 topology summary")?
        .with_rules([
            Rule::new("topology_nodes", r"^Topology nodes:\s+(?P<topology_nodes>\d+)$")?
                .leave("block")
                .update(&[SUMMARY]),
            Rule::new("prefixes", r"^Prefixes:\s+(?P<prefixes>\d+)$")?
                .leave("block")
                .update(&[SUMMARY]),
            heading("prefix_sids", r"^Prefix +SIDs:(?:\s+(?P<total>\d+))?$", "prefix_sids")?,
            heading("links", r"^Links:(?:\s+(?P<total>\d+))?$", "links")?,
            heading(
                "adjacency_sids",
                r"^Adjacency +SIDs:(?:\s+(?P<total>\d+))?$",
                "adjancency_sids",
            )?,
            Rule::new("total", r"^Total:\s+(?P<total>\d+)$")?
                .when(Guard::mode_set("block"))
                .update_at(block_path()),
            Rule::new("epe", r"^EPE:\s+(?P<epe>\d+)$")?
                .when(Guard::mode_set("block"))
                .update_at(block_path()),
            counter("regular", r"^Regular:\s+(?P<regular>\d+)$", "prefix_sids")?,
            counter("strict", r"^Strict:\s+(?P<strict>\d+)$", "prefix_sids")?,
            counter("unprotected", r"^Unprotected:\s+(?P<unprotected>\d+)$", "adjancency_sids")?,
            counter("protected", r"^Protected:\s+(?P<protected>\d+)$", "adjancency_sids")?,
            Rule::new("private_information", r"^Private +Information:$")?
                .ensure(&[SUMMARY, "private_information"])
                .enter("block", "private_information"),
            counter("lookup_nodes", r"^Lookup +Nodes +(?P<lookup_nodes>\d+)$", "private_information")?,
            counter("consistent", r"^Consistent +(?P<consistent>\S+)$", "private_information")?
                .conversion(Conversion::Str),
            Rule::new(
                "update_stats",
                r"^(?P<kind>Noded|Links|Prefix) +(?P<action>added|deleted): +(?P<count>\d+)$",
            )?
            .when(Guard::mode_is("block", "private_information"))
            .then(|caps, out, _| {
                let kind = caps.str("kind")?.to_lowercase();
                out.set(
                    &[SUMMARY, "private_information", "update_stats", kind.as_str()],
                    caps.str("action")?,
                    caps.int("count")?,
                )
            }),
        ])
        .with_schema(
            Schema::fixed().required(
                SUMMARY,
                Schema::fixed()
                    .required_all(&["topology_nodes", "prefixes"], Schema::int())
                    .required(
                        "prefix_sids",
                        Schema::fixed()
                            .required("total", Schema::int())
                            .optional_all(&["regular", "strict"], Schema::int()),
                    )
                    .required(
                        "links",
                        Schema::fixed()
                            .required("total", Schema::int())
                            .optional("epe", Schema::int()),
                    )
                    .required(
                        "adjancency_sids",
                        Schema::fixed()
                            .required("total", Schema::int())
                            .optional_all(&["unprotected", "protected", "epe"], Schema::int()),
                    )
                    .optional(
                        "private_information",
                        Schema::fixed()
                            .required("lookup_nodes", Schema::int())
                            .required("consistent", Schema::str())
                            .required(
                                "update_stats",
                                Schema::fixed()
                                    .required("noded", update_stat())
                                    .required("links", update_stat())
                                    .required("prefix", update_stat()),
                            ),
                    ),
            ),
        ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::schema::ViolationKind;
    use crate::value::{MapExt, Value};
    use serde_json::json;

    #[test]
    fn test_prefix_database() {
        let text = "\
PCE's prefix database:
----------------------
Node 1
  TE router ID: 192.168.0.4
  Host name: rtrD
  ISIS system ID: 1921.6800.1004 level-1 ASN: 65001 domain ID: 1111
  ISIS system ID: 1921.6800.1004 level-2 ASN: 65001 domain ID: 9999
  Advertised Prefixes:
    192.168.0.4
    192.168.0.6

Node 2
  TE router ID: 192.168.0.1
  Host name: rtrA
  ISIS system ID: 1921.6800.1001 level-2
  Advertised Prefixes:
    192.168.0.1
";
        let result = show_pce_ipv4_prefix().unwrap().parse(text).unwrap();

        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "nodes": {
                    "1": {
                        "te_router_id": "192.168.0.4",
                        "host_name": "rtrD",
                        "isis_system_id": ["1921.6800.1004 level-1", "1921.6800.1004 level-2"],
                        "asn": [65001, 65001],
                        "domain_id": [1111, 9999],
                        "advertised_prefixes": ["192.168.0.4", "192.168.0.6"]
                    },
                    "2": {
                        "te_router_id": "192.168.0.1",
                        "host_name": "rtrA",
                        "isis_system_id": ["1921.6800.1001 level-2"],
                        "advertised_prefixes": ["192.168.0.1"]
                    }
                }
            })
        );
    }

    #[test]
    fn test_prefix_rows_before_node_ignored() {
        let result = show_pce_ipv4_prefix()
            .unwrap()
            .scan("192.168.0.4\nHost name: rtrD\n")
            .unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_topology_summary_inline_totals() {
        let text = "\
PCE's topology database summary:
--------------------------------

Topology nodes:                4
Prefixes:                      4
  Prefix SIDs:                 4
Links:                        12
  Adjacency SIDs:             24

Private Information:
  Lookup Nodes                   4
  Consistent                   yes
  Update Stats (from IGP and/or BGP):
    Noded added:                 4
    Noded deleted:               0
    Links added:                12
    Links deleted:               0
    Prefix added:                4
    Prefix deleted:              0
";
        let result = show_pce_ipv4_topology_summary().unwrap().parse(text).unwrap();

        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "pce_topology_database_summary": {
                    "topology_nodes": 4,
                    "prefixes": 4,
                    "prefix_sids": {"total": 4},
                    "links": {"total": 12},
                    "adjancency_sids": {"total": 24},
                    "private_information": {
                        "lookup_nodes": 4,
                        "consistent": "yes",
                        "update_stats": {
                            "noded": {"added": 4, "deleted": 0},
                            "links": {"added": 12, "deleted": 0},
                            "prefix": {"added": 4, "deleted": 0}
                        }
                    }
                }
            })
        );
    }

    #[test]
    fn test_topology_summary_total_lines() {
        let text = "\
Topology nodes:                3
Prefixes:                      3
Prefix SIDs:
  Total:                       3
  Regular:                     3
  Strict:                      0
Links:
  Total:                      10
  EPE:                         2
Adjacency SIDs:
  Total:                      20
  Unprotected:                10
  Protected:                  10
  EPE:                         1
";
        let result = show_pce_ipv4_topology_summary().unwrap().parse(text).unwrap();
        let summary = result[SUMMARY].as_map().unwrap();

        assert_eq!(summary.lookup(&["prefix_sids", "regular"]), Some(&Value::Int(3)));
        assert_eq!(summary.lookup(&["links", "total"]), Some(&Value::Int(10)));
        assert_eq!(summary.lookup(&["links", "epe"]), Some(&Value::Int(2)));
        assert_eq!(summary.lookup(&["adjancency_sids", "total"]), Some(&Value::Int(20)));
        assert_eq!(summary.lookup(&["adjancency_sids", "epe"]), Some(&Value::Int(1)));
        assert!(!summary.contains_key("private_information"));
    }

    #[test]
    fn test_topology_summary_requires_links() {
        let text = "Topology nodes: 1\nPrefixes: 1\nPrefix SIDs: 1\n";
        let err = show_pce_ipv4_topology_summary().unwrap().parse(text).unwrap_err();
        match err {
            Error::Validation(e) => {
                assert_eq!(e.kind, ViolationKind::MissingKey);
                assert_eq!(e.path.to_string(), "/pce_topology_database_summary/links");
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
