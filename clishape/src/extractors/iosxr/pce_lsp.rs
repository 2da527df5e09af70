//! `show pce lsp` and `show pce lsp detail`.
//!
//! Each LSP record spans several lines under its `PCC` and `LSP[n]`
//! headings, so the headings are tracked as scan modes.
//!
//! ```text
//! PCE's tunnel database:
//! ----------------------
//! PCC 192.168.0.1:
//!
//! Tunnel Name: rtrA_t1
//!  LSPs:
//!   LSP[0]:
//!    source 192.168.0.1, destination 192.168.0.4, tunnel ID 1, LSP ID 2
//!    State: Admin up, Operation up
//!    Setup type: Segment Routing
//!    Binding SID: 24013
//! ```

use crate::error::ExtractorError;
use crate::extractor::Extractor;
use crate::scanner::{Conversion, Guard, Rule, Segment};
use crate::schema::Schema;
use crate::value::MapExt;

const ENDPOINTS: &str = r"^source (?P<source>[\d\.]+), destination (?P<destination>[\d\.]+), tunnel ID (?P<tunnel_id>\d+), LSP ID (?P<lsp_id>\d+)$";
const STATE: &str = r"^State: Admin (?P<admin_state>\w+), Operation (?P<operation_state>\w+)$";
const SETUP: &str = r"^Setup type: (?P<setup_type>[\w\s]+)$";
const BINDING: &str = r"^Binding SID: (?P<binding_sid>\d+)$";

fn lsp_fields() -> Schema {
    Schema::fixed()
        .required_all(&["source", "destination"], Schema::str())
        .required_all(&["tunnel_id", "lsp_id"], Schema::int())
        .required_all(&["admin_state", "operation_state", "setup_type"], Schema::str())
        .required("binding_sid", Schema::int())
}

/// Rules for the four body lines every LSP record starts with.
fn lsp_body(path: impl Fn() -> Vec<Segment>, setup: Conversion) -> Result<Vec<Rule>, regex::Error> {
    Ok(vec![
        Rule::new("endpoints", ENDPOINTS)?
            .when(Guard::mode_set("lsp"))
            .convert("source", Conversion::Str)
            .convert("destination", Conversion::Str)
            .update_at(path()),
        Rule::new("state", STATE)?
            .when(Guard::mode_set("lsp"))
            .conversion(Conversion::Lower)
            .update_at(path()),
        Rule::new("setup_type", SETUP)?
            .when(Guard::mode_set("lsp"))
            .conversion(setup)
            .update_at(path()),
        Rule::new("binding_sid", BINDING)?
            .when(Guard::mode_set("lsp"))
            .update_at(path()),
    ])
}

fn pcc() -> Result<Rule, regex::Error> {
    Ok(Rule::new("pcc", r"^PCC (?P<pcc>[\d\.]+):$")?
        .leave("tunnel")
        .leave("lsp")
        .leave("path")
        .leave("event")
        .then(|caps, out, ctx| {
            let pcc = caps.str("pcc")?;
            out.entry(&["pcc", pcc])?;
            ctx.set("pcc", pcc);
            Ok(())
        }))
}

/// Create the `show pce lsp` extractor.
pub fn show_pce_lsp() -> Result<Extractor, ExtractorError> {
    let path = || {
        vec![
            Segment::key("pcc"),
            Segment::mode("pcc"),
            Segment::key("tunnel_name"),
            Segment::mode("tunnel"),
            Segment::key("lsps"),
            Segment::mode("lsp"),
        ]
    };

    let tunnel = Schema::fixed().required("lsps", Schema::wildcard(lsp_fields()));
    let pcc_entry = Schema::fixed().required("tunnel_name", Schema::wildcard(tunnel));

    Ok(Extractor::new("show_pce_lsp")
        .with_description("LSPs reported to the PCE, per PCC and tunnel")
        .with_command("show pce lsp")?
        .with_rule(pcc()?)
        .with_rules([
            Rule::new("tunnel", r"^Tunnel Name: (?P<tunnel>\S+)$")?
                .when(Guard::mode_set("pcc"))
                .leave("lsp")
                .then(|caps, out, ctx| {
                    let pcc = caps.require_mode(ctx, "pcc")?;
                    let tunnel = caps.str("tunnel")?;
                    out.entry(&["pcc", pcc, "tunnel_name", tunnel])?;
                    ctx.set("tunnel", tunnel);
                    Ok(())
                }),
            Rule::new("lsp", r"^LSP\[(?P<lsp>\d+)\]:$")?
                .when(Guard::mode_set("tunnel"))
                .then(|caps, out, ctx| {
                    let pcc = caps.require_mode(ctx, "pcc")?;
                    let tunnel = caps.require_mode(ctx, "tunnel")?;
                    let lsp = caps.int_key("lsp")?;
                    out.entry(&["pcc", pcc, "tunnel_name", tunnel, "lsps", lsp.as_str()])?;
                    ctx.set("lsp", lsp);
                    Ok(())
                }),
        ])
        .with_rules(lsp_body(path, Conversion::Str)?)
        .with_schema(Schema::fixed().required("pcc", Schema::wildcard(pcc_entry))))
}

/// Create the `show pce lsp detail` extractor.
///
/// Event history entries are filed under the LSP they are printed after,
/// keyed by timestamp and then by event type.
pub fn show_pce_lsp_detail() -> Result<Extractor, ExtractorError> {
    let lsp_path = || vec![Segment::key("pcc"), Segment::mode("pcc"), Segment::key("lsps"), Segment::mode("lsp")];
    let with = |tail: &[&str]| {
        let mut path = lsp_path();
        path.extend(tail.iter().map(|key| Segment::key(*key)));
        path
    };
    let event_path = move || {
        let mut path = lsp_path();
        path.extend([
            Segment::key("event_history"),
            Segment::mode("event"),
            Segment::mode("event_type"),
        ]);
        path
    };

    Ok(Extractor::new("show_pce_lsp_detail")
        .with_description("LSPs reported to the PCE with paths, PCEP flags and event history")
        .with_command("show pce lsp detail")?
        .with_rule(pcc()?)
        .with_rules([
            Rule::new("tunnel", r"^Tunnel Name: (?P<tunnel_name>\S+)$")?
                .when(Guard::mode_set("pcc"))
                .conversion(Conversion::Str)
                .update_at(vec![Segment::key("pcc"), Segment::mode("pcc")]),
            Rule::new("lsp", r"^LSP\[(?P<lsp>\d+)\]:$")?
                .when(Guard::mode_set("pcc"))
                .leave("path")
                .leave("event")
                .then(|caps, out, ctx| {
                    let pcc = caps.require_mode(ctx, "pcc")?;
                    let lsp = caps.int_key("lsp")?;
                    out.entry(&["pcc", pcc, "lsps", lsp.as_str()])?;
                    ctx.set("lsp", lsp);
                    Ok(())
                }),
        ])
        .with_rules(lsp_body(lsp_path, Conversion::Lower)?)
        .with_rules([
            Rule::new(
                "pcep_information",
                r"^plsp-id (?P<plsp_id>\d+), flags: D:(?P<d>\d+) S:(?P<s>\d+) R:(?P<r>\d+) A:(?P<a>\d+) O:(?P<o>\d+)$",
            )?
            .when(Guard::mode_set("lsp"))
            .then(|caps, out, ctx| {
                let pcc = caps.require_mode(ctx, "pcc")?;
                let lsp = caps.require_mode(ctx, "lsp")?;
                let info = ["pcc", pcc, "lsps", lsp, "pcep_information"];
                out.set(&info, "plsp_id", caps.int("plsp_id")?)?;

                let flags = out.entry(&["pcc", pcc, "lsps", lsp, "pcep_information", "flags"])?;
                for flag in ["d", "s", "r", "a", "o"] {
                    flags.put(flag, caps.int(flag)?);
                }
                Ok(())
            }),
            Rule::new("path", r"^(?P<path>\w+) path:$")?
                .when(Guard::mode_set("lsp"))
                .then(|caps, out, ctx| {
                    let pcc = caps.require_mode(ctx, "pcc")?;
                    let lsp = caps.require_mode(ctx, "lsp")?;
                    let path = caps.str("path")?.to_lowercase();
                    out.entry(&["pcc", pcc, "lsps", lsp, "paths", path.as_str()])?;
                    ctx.set("path", path);
                    Ok(())
                }),
            Rule::new(
                "metric",
                r"^Metric type: (?P<metric_type>\w+), Accumulated Metric (?P<accumulated_metric>\d+)$",
            )?
            .when(Guard::mode_set("path"))
            .convert("metric_type", Conversion::Str)
            .update_at({
                let mut path = with(&["paths"]);
                path.push(Segment::mode("path"));
                path
            }),
            Rule::new(
                "sid",
                r"^SID\[(?P<sid>\d+)\]: (?P<type>\w+), Label (?P<label>\d+), Address: local (?P<local_address>[\d\.]+) remote (?P<remote_address>[\d\.]+)$",
            )?
            .when(Guard::mode_set("path"))
            .then(|caps, out, ctx| {
                let pcc = caps.require_mode(ctx, "pcc")?;
                let lsp = caps.require_mode(ctx, "lsp")?;
                let path = caps.require_mode(ctx, "path")?;
                let sid = caps.int_key("sid")?;
                let label = caps.int("label")?;

                let entry = out.entry(&["pcc", pcc, "lsps", lsp, "paths", path, "sids", sid.as_str()])?;
                entry.put("type", caps.str("type")?);
                entry.put("label", label);
                entry.put("local_address", caps.str("local_address")?);
                entry.put("remote_address", caps.str("remote_address")?);
                Ok(())
            }),
            Rule::new("event_history", r"^Event history")?
                .leave("path")
                .leave("event"),
            Rule::new(
                "event",
                r"^(?P<time>\w+ \d+ \d+ [\d:]+)\s+(?P<kind>\w+)$",
            )?
            .when(Guard::mode_set("lsp"))
            .then(|caps, out, ctx| {
                let pcc = caps.require_mode(ctx, "pcc")?;
                let lsp = caps.require_mode(ctx, "lsp")?;
                let time = caps.str("time")?;
                let kind = caps.str("kind")?.to_lowercase();
                out.entry(&["pcc", pcc, "lsps", lsp, "event_history", time, kind.as_str()])?;
                ctx.set("event", time);
                ctx.set("event_type", kind);
                Ok(())
            }),
            Rule::new(
                "event_symbolic_name",
                r"^Symbolic-name: (?P<symbolic_name>[^,\s]+), (?P<id_name>[\w\-]+): (?P<id>\d+),$",
            )?
            .when(Guard::mode_set("event"))
            .then(|caps, out, ctx| {
                let pcc = caps.require_mode(ctx, "pcc")?;
                let lsp = caps.require_mode(ctx, "lsp")?;
                let time = caps.require_mode(ctx, "event")?;
                let kind = caps.require_mode(ctx, "event_type")?;
                let id = caps.int("id")?;

                let event = out.entry(&["pcc", pcc, "lsps", lsp, "event_history", time, kind])?;
                event.put("symbolic_name", caps.str("symbolic_name")?);
                event.put(&caps.str("id_name")?.to_lowercase(), id);
                Ok(())
            }),
            Rule::new(
                "event_endpoints",
                r"^Source: (?P<source>[\d\.]+) Destination: (?P<destination>[\d\.]+),$",
            )?
            .when(Guard::mode_set("event"))
            .conversion(Conversion::Str)
            .update_at(event_path()),
            Rule::new(
                "event_flags",
                r"^D:(?P<d>\d+), R:(?P<r>\d+), A:(?P<a>\d+) O:(?P<o>\d+), Sig\.BW: (?P<sig_bw>\d+), Act\.BW: (?P<act_bw>\d+)$",
            )?
            .when(Guard::mode_set("event"))
            .update_at({
                let mut path = event_path();
                path.push(Segment::key("flags"));
                path
            }),
            Rule::new("event_peer", r"^Peer: (?P<peer>[\d\.]+)$")?
                .when(Guard::mode_set("event"))
                .conversion(Conversion::Str)
                .update_at(event_path()),
        ])
        .with_schema(detail_schema()))
}

fn detail_schema() -> Schema {
    let sid = Schema::fixed()
        .required("type", Schema::str())
        .required("label", Schema::int())
        .required_all(&["local_address", "remote_address"], Schema::str());

    let path = Schema::fixed()
        .optional("metric_type", Schema::str())
        .optional("accumulated_metric", Schema::int())
        .optional("sids", Schema::wildcard(sid));

    let pcep = Schema::fixed().required("plsp_id", Schema::int()).required(
        "flags",
        Schema::fixed().required_all(&["d", "s", "r", "a", "o"], Schema::int()),
    );

    let event = Schema::fixed()
        .required("symbolic_name", Schema::str())
        .optional_all(&["lsp-id", "plsp-id"], Schema::int())
        .optional_all(&["source", "destination"], Schema::str())
        .optional(
            "flags",
            Schema::fixed().required_all(&["d", "r", "a", "o", "sig_bw", "act_bw"], Schema::int()),
        )
        .optional("peer", Schema::str());

    let lsp = lsp_fields()
        .required("pcep_information", pcep)
        .required("paths", Schema::wildcard(path))
        .optional(
            "event_history",
            Schema::wildcard(Schema::wildcard(event)),
        );

    let pcc = Schema::fixed()
        .required("tunnel_name", Schema::str())
        .required("lsps", Schema::wildcard(lsp));

    Schema::fixed().required("pcc", Schema::wildcard(pcc))
}
