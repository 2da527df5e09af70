//! SR-TE policy database as seen by the head end.
//!
//! ```text
//! Color: 30, End-point: 10.0.0.14
//!   Name: srte_c_30_ep_10.0.0.14
//!   Status:
//!     Admin: up  Operational: up for 09:38:18 (since Aug 28 20:56:55.275)
//!   Candidate-paths:
//!     Preference: 100 (configuration) (active)
//!       Name: test1
//!       Requested BSID: dynamic
//!       PCC info:
//!         Symbolic name: cfg_srte_c_30_ep_10.0.0.14_discr_100
//!         PLSP-ID: 1
//!       Protection Type: protected-preferred
//!       Maximum SID Depth: 12
//!       Dynamic (pce 10.0.0.11) (valid)
//!         Metric Type: TE,   Path Accumulated Metric: 2200
//!           16063 [Prefix-SID, 10.169.196.241]
//!   Attributes:
//!     Binding SID: 15000
//! ```

use crate::error::ExtractorError;
use crate::extractor::Extractor;
use crate::scanner::{Conversion, Guard, Rule, Segment};
use crate::schema::Schema;
use crate::value::MapExt;

const POLICY: &str = "pce_sr_policy_database";

/// Create the `show segment-routing traffic-eng pcc lsp` extractor.
///
/// The output describes a single policy; a second `Symbolic Name` line
/// replaces the first.
pub fn show_segment_routing_traffic_eng_pcc_lsp() -> Result<Extractor, ExtractorError> {
    let lsp_path = || vec![Segment::key(POLICY), Segment::key("lsps"), Segment::mode("lsp")];

    let lsp = Schema::fixed()
        .required_all(&["source", "destination"], Schema::str())
        .required_all(&["tunnel_id", "lsp_id"], Schema::int())
        .required_all(&["admin_state", "operation_state", "setup_type"], Schema::str())
        .required("binding_sid", Schema::int());

    Ok(Extractor::new("show_segment_routing_traffic_eng_pcc_lsp")
        .with_description("SR policy LSPs reported by the PCC")
        .with_command("show segment-routing traffic-eng pcc lsp")?
        .with_rules([
            Rule::new("symbolic_name", r"^Symbolic Name: (?P<symbolic_name>\S+)$")?
                .leave("lsp")
                .conversion(Conversion::Str)
                .update(&[POLICY]),
            Rule::new("lsp", r"^LSP\[(?P<lsp>\d+)\]:$")?.then(|caps, out, ctx| {
                let lsp = caps.int_key("lsp")?;
                out.entry(&[POLICY, "lsps", lsp.as_str()])?;
                ctx.set("lsp", lsp);
                Ok(())
            }),
            Rule::new(
                "endpoints",
                r"^Source (?P<source>[\d\.]+), Destination (?P<destination>[\d\.]+), Tunnel ID (?P<tunnel_id>\d+), LSP ID (?P<lsp_id>\d+)$",
            )?
            .when(Guard::mode_set("lsp"))
            .convert("source", Conversion::Str)
            .convert("destination", Conversion::Str)
            .update_at(lsp_path()),
            Rule::new(
                "state",
                r"^State: Admin (?P<admin_state>\w+), Operation (?P<operation_state>\w+)$",
            )?
            .when(Guard::mode_set("lsp"))
            .conversion(Conversion::Lower)
            .update_at(lsp_path()),
            Rule::new("setup_type", r"^Setup type: (?P<setup_type>[\w\s]+)$")?
                .when(Guard::mode_set("lsp"))
                .conversion(Conversion::Lower)
                .update_at(lsp_path()),
            Rule::new("binding_sid", r"^Binding SID: (?P<binding_sid>\d+)$")?
                .when(Guard::mode_set("lsp"))
                .update_at(lsp_path()),
        ])
        .with_schema(Schema::fixed().required(
            POLICY,
            Schema::fixed()
                .required("symbolic_name", Schema::str())
                .required("lsps", Schema::wildcard(lsp)),
        )))
}

/// Create the `show segment-routing traffic-eng policy color {color_code}
/// endpoint ipv4 {endpoint_ip}` extractor.
///
/// A `Name:` line before the first `Preference:` names the policy; after it
/// the line names the candidate path.
pub fn show_segment_routing_traffic_eng_policy_color_endpoint() -> Result<Extractor, ExtractorError> {
    let candidate = || {
        vec![
            Segment::key(POLICY),
            Segment::key("candidate_paths"),
            Segment::key("preference"),
            Segment::mode("preference"),
        ]
    };
    let under = move |tail: &[&str]| {
        let mut path = candidate();
        path.extend(tail.iter().map(|key| Segment::key(*key)));
        path
    };
    let attributes = || vec![Segment::key(POLICY), Segment::key("attributes")];
    let attribute = |name: &str, pattern: &str| -> Result<Rule, regex::Error> {
        Ok(Rule::new(name, pattern)?
            .when(Guard::mode_set("attributes"))
            .conversion(Conversion::Str)
            .update_at(attributes()))
    };

    Ok(Extractor::new("show_segment_routing_traffic_eng_policy_color_endpoint")
        .with_description("SR-TE policy status, candidate paths and attributes")
        .with_command("show segment-routing traffic-eng policy color {color_code} endpoint ipv4 {endpoint_ip}")?
        .with_rules([
            Rule::new("policy", r"^Color: +(?P<color>\d+), +End-point: *(?P<end_point>\S+)")?
                .leave("preference")
                .leave("path")
                .leave("attributes")
                .convert("end_point", Conversion::Str)
                .update(&[POLICY]),
            Rule::new("policy_name", r"^Name: +(?P<name>\S+)")?
                .when(Guard::mode_unset("preference"))
                .when(Guard::mode_unset("attributes"))
                .conversion(Conversion::Str)
                .update(&[POLICY]),
            Rule::new(
                "status",
                r"^Admin: (?P<admin>\w+),?\s+Operational:\s+(?P<state>\w+)\s+for\s+(?P<time_for_state>\S+) \(since\s(?P<since>[^)]+)\)",
            )?
            .then(|caps, out, _| {
                out.set(&[POLICY, "status"], "admin", caps.str("admin")?)?;
                let operational = out.entry(&[POLICY, "status", "operational"])?;
                for field in ["state", "time_for_state", "since"] {
                    operational.put(field, caps.str(field)?);
                }
                Ok(())
            }),
            Rule::new("preference", r"^Preference:\s+(?P<preference>\d+)")?
                .leave("path")
                .then(|caps, out, ctx| {
                    let preference = caps.int_key("preference")?;
                    out.entry(&[POLICY, "candidate_paths", "preference", preference.as_str()])?;
                    ctx.set("preference", preference);
                    Ok(())
                }),
            Rule::new("candidate_name", r"^Name: +(?P<name>\S+)")?
                .when(Guard::mode_set("preference"))
                .conversion(Conversion::Str)
                .update_at(candidate()),
            Rule::new("requested_bsid", r"^Requested\s+BSID:\s+(?P<Requested_bsid>\w+)")?
                .when(Guard::mode_set("preference"))
                .conversion(Conversion::Str)
                .update_at(candidate()),
            Rule::new("symbolic_name", r"^Symbolic name: (?P<symbolic_name>\S+)$")?
                .when(Guard::mode_set("preference"))
                .conversion(Conversion::Str)
                .update_at(under(&["pcc_info"])),
            Rule::new("plsp_id", r"^PLSP-ID:\s+(?P<plsp_id>\d+)")?
                .when(Guard::mode_set("preference"))
                .update_at(under(&["pcc_info"])),
            Rule::new("protection_type", r"^Protection\s+Type:\s(?P<protection_type>\S+)")?
                .when(Guard::mode_set("preference"))
                .conversion(Conversion::Str)
                .update_at(under(&["constraints"])),
            Rule::new("maximum_sid_depth", r"^Maximum\s+SID\s+Depth:\s+(?P<maximum_dept>\d+)")?
                .when(Guard::mode_set("preference"))
                .update_at(under(&["constraints"])),
            Rule::new(
                "dynamic",
                r"^Dynamic(?P<pce> +\(pce[^)]*\))? +\((?P<status>\w+)\)$",
            )?
            .when(Guard::mode_set("preference"))
            .enter("path", "dynamic")
            .then(|caps, out, ctx| {
                let preference = caps.require_mode(ctx, "preference")?;
                let dynamic = out.entry(&[
                    POLICY,
                    "candidate_paths",
                    "preference",
                    preference,
                    "path_type",
                    "dynamic",
                ])?;
                dynamic.put("status", caps.str("status")?);
                if caps.get("pce").is_some() {
                    dynamic.put("pce", true);
                }
                Ok(())
            }),
            Rule::new(
                "metric",
                r"^Metric +Type: +(?P<metric_type>[^,\s]+),?\s+Path\s+Accumulated\s+Metric:\s+(?P<path_accumulated_metric>\d+)",
            )?
            .when(Guard::mode_set("path"))
            .convert("metric_type", Conversion::Str)
            .update_at(under(&["path_type", "dynamic"])),
            Rule::new(
                "hop",
                r"^(?P<sid>\d+)(?: +\[(?P<sid_type>[^,\]]+), +(?P<local_address>[^\s\]]+)(?: +- +(?P<remote_address>[^\s\]]+))?\])?$",
            )?
            .when(Guard::mode_set("path"))
            .then(|caps, out, ctx| {
                let preference = caps.require_mode(ctx, "preference")?;
                let sid = caps.int("sid")?;
                let hops = [POLICY, "candidate_paths", "preference", preference, "path_type", "dynamic", "hops"];
                let index = (out.entry(&hops)?.len() + 1).to_string();

                let mut path = hops.to_vec();
                path.push(index.as_str());
                let hop = out.entry(&path)?;
                hop.put("sid", sid);
                for field in ["sid_type", "local_address", "remote_address"] {
                    if let Some(value) = caps.get(field) {
                        hop.put(field, value);
                    }
                }
                Ok(())
            }),
            Rule::new("attributes", r"^Attributes:$")?
                .leave("preference")
                .leave("path")
                .enter("attributes", "policy"),
            attribute("binding_sid", r"^Binding +SID: +(?P<binding_sid>\d+)$")?,
            attribute("forward_class", r"^Forward\s+Class:\s+(?P<forward_class>.+)$")?,
            attribute(
                "steering_labeled_services",
                r"^Steering\s+labeled.?services\s+disabled:\s+(?P<steering_labeled_services_disabled>\w+)",
            )?,
            attribute(
                "steering_bgp",
                r"^Steering\s+BGP\s+disabled:\s+(?P<steering_bgp_disabled>\w+)$",
            )?,
            attribute("ipv6_caps", r"^IPv6\s+caps\s+enable:\s+(?P<ipv6_caps_enable>\w+)$")?,
            attribute(
                "invalidation_drop",
                r"^Invalidation\s+drop\s+enabled:\s+(?P<invalidation_drop_enabled>\w+)$",
            )?,
            Rule::new(
                "max_install_standby",
                r"^Max\s+Install\s+Standby\s+Candidate\s+Paths:\s+(?P<max_install_standby_candidate_paths>\d+)$",
            )?
            .when(Guard::mode_set("attributes"))
            .update_at(attributes()),
        ])
        .with_schema(policy_schema()))
}

fn policy_schema() -> Schema {
    let hop = Schema::fixed()
        .required("sid", Schema::int())
        .optional_all(&["sid_type", "local_address", "remote_address"], Schema::str());

    let dynamic = Schema::fixed()
        .required("status", Schema::str())
        .optional("pce", Schema::bool())
        .required("metric_type", Schema::str())
        .optional("path_accumulated_metric", Schema::int())
        .optional("hops", Schema::wildcard(hop));

    let candidate = Schema::fixed()
        .optional_all(&["name", "Requested_bsid"], Schema::str())
        .required(
            "pcc_info",
            Schema::fixed()
                .required("symbolic_name", Schema::str())
                .optional("plsp_id", Schema::int()),
        )
        .required(
            "constraints",
            Schema::fixed()
                .required("protection_type", Schema::str())
                .optional("maximum_dept", Schema::int()),
        )
        .required("path_type", Schema::fixed().optional("dynamic", dynamic));

    let status = Schema::fixed().required("admin", Schema::str()).required(
        "operational",
        Schema::fixed().required_all(&["state", "time_for_state", "since"], Schema::str()),
    );

    let attributes = Schema::fixed()
        .optional_all(
            &[
                "binding_sid",
                "forward_class",
                "steering_labeled_services_disabled",
                "steering_bgp_disabled",
                "ipv6_caps_enable",
                "invalidation_drop_enabled",
            ],
            Schema::str(),
        )
        .optional("max_install_standby_candidate_paths", Schema::int());

    Schema::fixed().required(
        POLICY,
        Schema::fixed()
            .required("color", Schema::int())
            .required_all(&["end_point", "name"], Schema::str())
            .required("status", status)
            .optional(
                "candidate_paths",
                Schema::fixed().required("preference", Schema::wildcard(candidate)),
            )
            .optional("attributes", attributes),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::schema::ViolationKind;
    use serde_json::json;

    const POLICY_DETAIL: &str = "
SR-TE policy database
---------------------

Color: 30, End-point: 10.0.0.14
  Name: srte_c_30_ep_10.0.0.14
  Status:
    Admin: up  Operational: up for 09:38:18 (since Aug 28 20:56:55.275)
  Candidate-paths:
    Preference: 100 (configuration) (active)
      Name: test1
      Requested BSID: dynamic
      PCC info:
        Symbolic name: cfg_srte_c_30_ep_10.0.0.14_discr_100
        PLSP-ID: 1
      Protection Type: protected-preferred
      Maximum SID Depth: 12
      Dynamic (pce 10.0.0.11) (valid)
        Metric Type: TE,   Path Accumulated Metric: 2200
          16063 [Prefix-SID, 10.169.196.241]
          24000 [Adjacency-SID, 10.2.12.1 - 10.2.12.2]
          16072
    Preference: 50 (configuration)
      Name: backup
      PCC info:
        Symbolic name: cfg_srte_c_30_ep_10.0.0.14_discr_50
      Protection Type: unprotected-only
      Dynamic (invalid)
        Metric Type: IGP,   Path Accumulated Metric: 0
  Attributes:
    Binding SID: 15000
    Forward Class: Not Configured
    Steering labeled-services disabled: no
    Steering BGP disabled: no
    IPv6 caps enable: yes
    Invalidation drop enabled: no
    Max Install Standby Candidate Paths: 0
";

    #[test]
    fn test_pcc_lsp() {
        let text = "
PCC's SR policy database:
-------------------------

Symbolic Name: cfg_srte_c_30_ep_10.0.0.14_discr_100
  LSP[0]:
    Source 10.0.0.2, Destination 10.0.0.14, Tunnel ID 1, LSP ID 1048
    State: Admin up, Operation Up
    Setup type: SR
    Binding SID: 26276
";
        let result = show_segment_routing_traffic_eng_pcc_lsp().unwrap().parse(text).unwrap();

        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "pce_sr_policy_database": {
                    "symbolic_name": "cfg_srte_c_30_ep_10.0.0.14_discr_100",
                    "lsps": {
                        "0": {
                            "source": "10.0.0.2",
                            "destination": "10.0.0.14",
                            "tunnel_id": 1,
                            "lsp_id": 1048,
                            "admin_state": "up",
                            "operation_state": "up",
                            "setup_type": "sr",
                            "binding_sid": 26276
                        }
                    }
                }
            })
        );
    }

    #[test]
    fn test_policy_color_endpoint() {
        let result = show_segment_routing_traffic_eng_policy_color_endpoint()
            .unwrap()
            .parse(POLICY_DETAIL)
            .unwrap();

        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "pce_sr_policy_database": {
                    "color": 30,
                    "end_point": "10.0.0.14",
                    "name": "srte_c_30_ep_10.0.0.14",
                    "status": {
                        "admin": "up",
                        "operational": {
                            "state": "up",
                            "time_for_state": "09:38:18",
                            "since": "Aug 28 20:56:55.275"
                        }
                    },
                    "candidate_paths": {
                        "preference": {
                            "100": {
                                "name": "test1",
                                "Requested_bsid": "dynamic",
                                "pcc_info": {
                                    "symbolic_name": "cfg_srte_c_30_ep_10.0.0.14_discr_100",
                                    "plsp_id": 1
                                },
                                "constraints": {
                                    "protection_type": "protected-preferred",
                                    "maximum_dept": 12
                                },
                                "path_type": {
                                    "dynamic": {
                                        "status": "valid",
                                        "pce": true,
                                        "metric_type": "TE",
                                        "path_accumulated_metric": 2200,
                                        "hops": {
                                            "1": {
                                                "sid": 16063,
                                                "sid_type": "Prefix-SID",
                                                "local_address": "10.169.196.241"
                                            },
                                            "2": {
                                                "sid": 24000,
                                                "sid_type": "Adjacency-SID",
                                                "local_address": "10.2.12.1",
                                                "remote_address": "10.2.12.2"
                                            },
                                            "3": {"sid": 16072}
                                        }
                                    }
                                }
                            },
                            "50": {
                                "name": "backup",
                                "pcc_info": {
                                    "symbolic_name": "cfg_srte_c_30_ep_10.0.0.14_discr_50"
                                },
                                "constraints": {"protection_type": "unprotected-only"},
                                "path_type": {
                                    "dynamic": {
                                        "status": "invalid",
                                        "metric_type": "IGP",
                                        "path_accumulated_metric": 0
                                    }
                                }
                            }
                        }
                    },
                    "attributes": {
                        "binding_sid": "15000",
                        "forward_class": "Not Configured",
                        "steering_labeled_services_disabled": "no",
                        "steering_bgp_disabled": "no",
                        "ipv6_caps_enable": "yes",
                        "invalidation_drop_enabled": "no",
                        "max_install_standby_candidate_paths": 0
                    }
                }
            })
        );
    }

    #[test]
    fn test_candidate_name_does_not_rename_policy() {
        let result = show_segment_routing_traffic_eng_policy_color_endpoint()
            .unwrap()
            .scan(POLICY_DETAIL)
            .unwrap();
        let policy = &result[POLICY];
        assert_eq!(
            policy.lookup(&["name"]).and_then(|name| name.as_str()),
            Some("srte_c_30_ep_10.0.0.14")
        );
    }

    #[test]
    fn test_policy_without_status() {
        let text = "Color: 30, End-point: 10.0.0.14\n  Name: srte_c_30_ep_10.0.0.14\n";
        let err = show_segment_routing_traffic_eng_policy_color_endpoint()
            .unwrap()
            .parse(text)
            .unwrap_err();

        match err {
            Error::Validation(err) => {
                assert_eq!(err.path.to_string(), "/pce_sr_policy_database/status");
                assert_eq!(err.kind, ViolationKind::MissingKey);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
