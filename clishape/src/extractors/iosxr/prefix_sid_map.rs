//! `show isis segment-routing prefix-sid-map` and its OSPF counterpart.
//!
//! Both print one block per process and policy; the block heading names the
//! process and policy that the following SID rows belong to.
//!
//! ```text
//! IS-IS 1 active policy
//! Prefix               SID Index    Range        Flags
//! 10.4.1.100/32         100          20
//! 10.4.1.150/32         150          10
//!
//! Number of mapping entries: 2
//! ```

use crate::error::ExtractorError;
use crate::extractor::Extractor;
use crate::scanner::{Guard, Rule};
use crate::schema::Schema;
use crate::value::MapExt;

/// Create the `show isis segment-routing prefix-sid-map {status}` extractor.
pub fn show_isis_segment_routing_prefix_sid_map() -> Result<Extractor, ExtractorError> {
    prefix_sid_map(
        "show_isis_segment_routing_prefix_sid_map",
        "show isis segment-routing prefix-sid-map {status}",
        r"^IS-IS (?P<process>\d+) (?P<status>\w+) policy$",
    )
}

/// Create the `show ospf segment-routing prefix-sid-map {status}` extractor.
pub fn show_ospf_segment_routing_prefix_sid_map() -> Result<Extractor, ExtractorError> {
    prefix_sid_map(
        "show_ospf_segment_routing_prefix_sid_map",
        "show ospf segment-routing prefix-sid-map {status}",
        r"^SRMS (?P<status>\w+) policy for Process ID (?P<process>\d+)$",
    )
}

fn prefix_sid_map(name: &str, command: &str, heading: &str) -> Result<Extractor, ExtractorError> {
    Ok(Extractor::new(name)
        .with_description("Segment routing mapping server prefix-SID policies")
        .with_command(command)?
        .with_rules([
            Rule::new("policy", heading)?.then(|caps, out, ctx| {
                let process = caps.int_key("process")?;
                let status = caps.str("status")?;
                out.entry(&["process_id", process.as_str(), "policy", status])?;
                ctx.set("process", process);
                ctx.set("policy", status);
                Ok(())
            }),
            Rule::new(
                "sid",
                r"^(?P<prefix>[\w\.\/]+)\s+(?P<sid_index>\d+)\s+(?P<range>\d+)(?:\s+(?P<flags>\S.*))?$",
            )?
            .when(Guard::mode_set("policy"))
            .then(|caps, out, ctx| {
                let process = caps.require_mode(ctx, "process")?;
                let policy = caps.require_mode(ctx, "policy")?;
                let sid = caps.int_key("sid_index")?;
                let range = caps.int("range")?;

                let entry = out.entry(&["process_id", process, "policy", policy, "sid", sid.as_str()])?;
                entry.put("prefix", caps.str("prefix")?);
                entry.put("range", range);
                if let Some(flags) = caps.get("flags") {
                    entry.put("flags", flags);
                }
                Ok(())
            }),
            Rule::new("entries", r"^Number of mapping entries:\s+(?P<entries>\d+)")?
                .when(Guard::mode_set("policy"))
                .then(|caps, out, ctx| {
                    let process = caps.require_mode(ctx, "process")?;
                    let policy = caps.require_mode(ctx, "policy")?;
                    let entries = caps.int("entries")?;
                    out.set(
                        &["process_id", process, "policy", policy],
                        "number_of_mapping_entries",
                        entries,
                    )
                }),
        ])
        .with_schema(schema()))
}

fn schema() -> Schema {
    let sid = Schema::fixed()
        .required("prefix", Schema::str())
        .required("range", Schema::int())
        .optional("flags", Schema::str());

    let policy = Schema::fixed()
        .optional("sid", Schema::wildcard(sid))
        .required("number_of_mapping_entries", Schema::int());

    Schema::fixed().required(
        "process_id",
        Schema::wildcard(
            Schema::fixed().required("policy", Schema::wildcard(policy)),
        ),
    )
}
