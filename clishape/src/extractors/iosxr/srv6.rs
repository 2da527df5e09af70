//! SRv6 locators and the SIDs allocated from them.
//!
//! ```text
//! *** Locator: 'ALGO_0' ***
//!
//! SID                         Behavior          Context                           Owner               State  RW
//! --------------------------  ----------------  --------------------------------  ------------------  -----  --
//! cafe:0:200::                uN (PSP/USD)      'default':512                     sidmgr              InUse  Y
//! cafe:0:200:e000::           uDT2U             1:0                               l2vpn_srv6          InUse  Y
//! ```

use crate::error::ExtractorError;
use crate::extractor::Extractor;
use crate::scanner::{Guard, Rule};
use crate::schema::Schema;
use crate::value::MapExt;

/// Create the `show segment-routing srv6 sid` extractor.
///
/// Behavior and context may hold one inner space (`uN (PSP/USD)`); the
/// columns themselves are separated by at least two.
pub fn show_segment_routing_srv6_sid() -> Result<Extractor, ExtractorError> {
    let sid = Schema::fixed().required_all(&["behavior", "context", "owner", "state", "rw"], Schema::str());
    let locator = Schema::fixed().required("sid", Schema::wildcard(sid));

    Ok(Extractor::new("show_segment_routing_srv6_sid")
        .with_description("SRv6 SIDs per locator")
        .with_command("show segment-routing srv6 sid")?
        .with_command("show segment-routing srv6 locator {locator} sid")?
        .with_rules([
            Rule::new("header", r"^SID\s+Behavior\s+Context\s+Owner\s+State\s+RW")?,
            Rule::new("locator", r"^\*+\s+Locator:\s+'(?P<locator>\S+)'\s+\*+$")?.then(|caps, _, ctx| {
                ctx.set("locator", caps.str("locator")?);
                Ok(())
            }),
            Rule::new(
                "sid",
                r"^(?P<sid>[\w:]+)\s+(?P<behavior>\S+(?: \S+)?)\s{2,}(?P<context>\S+(?: \S+)?)\s+(?P<owner>\S+)\s+(?P<state>\S+)\s+(?P<rw>\S+)$",
            )?
            .when(Guard::mode_set("locator"))
            .then(|caps, out, ctx| {
                let locator = caps.require_mode(ctx, "locator")?;
                let sid = caps.str("sid")?;
                let entry = out.entry(&["locator", locator, "sid", sid])?;
                for field in ["behavior", "context", "owner", "state", "rw"] {
                    entry.put(field, caps.str(field)?);
                }
                Ok(())
            }),
        ])
        .with_schema(Schema::fixed().required("locator", Schema::wildcard(locator))))
}

/// Create the `show segment-routing srv6 locator` extractor.
pub fn show_segment_routing_srv6_locator() -> Result<Extractor, ExtractorError> {
    let locator = Schema::fixed()
        .required("name", Schema::str())
        .required_all(&["id", "algorithm"], Schema::int())
        .required_all(&["prefix", "status", "flags"], Schema::str());

    Ok(Extractor::new("show_segment_routing_srv6_locator")
        .with_description("SRv6 locators with their prefix and status")
        .with_command("show segment-routing srv6 locator")?
        .with_command("show segment-routing srv6 locator {locator_name}")?
        .with_rule(
            Rule::new(
                "locator",
                r"^(?P<name>\w+)\s+(?P<id>\d+)\s+(?P<algorithm>\d+)\s+(?P<prefix>[\w:]+/\d+)\s+(?P<status>\w+)\s+(?P<flags>\S+)$",
            )?
            .then(|caps, out, _| {
                let name = caps.str("name")?;
                let id = caps.int("id")?;
                let algorithm = caps.int("algorithm")?;

                let entry = out.entry(&["locators", name])?;
                entry.put("name", name);
                entry.put("id", id);
                entry.put("algorithm", algorithm);
                for field in ["prefix", "status", "flags"] {
                    entry.put(field, caps.str(field)?);
                }
                Ok(())
            }),
        )
        .with_schema(Schema::fixed().required("locators", Schema::wildcard(locator))))
}
