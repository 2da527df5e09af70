//! Segment routing mapping server and local block.
//!
//! ```text
//! Prefix               SID Index    Range        Flags
//! 10.186.1.0/24          400          300
//! 10.1.1.1/32            10           200
//!
//! Number of mapping entries: 2
//! ```
//!
//! The `detail` form prints one block per prefix:
//!
//! ```text
//! 10.186.1.0/24
//!     SID Index:      400
//!     Range:          300
//!     Last Prefix:    10.229.44.0/24
//!     Last SID Index: 699
//!     Flags:
//! ```

use crate::error::ExtractorError;
use crate::extractor::Extractor;
use crate::scanner::{Conversion, Guard, Rule, Segment};
use crate::schema::Schema;
use crate::value::MapExt;

/// Create the `show segment-routing mapping-server prefix-sid-map ipv4` extractor.
pub fn show_segment_routing_mapping_server_prefix_sid_map_ipv4() -> Result<Extractor, ExtractorError> {
    let prefix = Schema::fixed()
        .required_all(&["sid_index", "range"], Schema::int())
        .optional("flags", Schema::str());

    Ok(Extractor::new("show_segment_routing_mapping_server_prefix_sid_map_ipv4")
        .with_description("Locally configured mapping server IPv4 prefix-SIDs")
        .with_command("show segment-routing mapping-server prefix-sid-map ipv4")?
        .with_rules([
            Rule::new(
                "prefix",
                r"^(?P<prefix>[\w\.\/]+)\s+(?P<sid_index>\d+)\s+(?P<range>\d+)(?:\s+(?P<flags>\S.*))?$",
            )?
            .then(|caps, out, _| {
                let sid_index = caps.int("sid_index")?;
                let range = caps.int("range")?;

                let entry = out.entry(&["ipv4", "prefix", caps.str("prefix")?])?;
                entry.put("sid_index", sid_index);
                entry.put("range", range);
                if let Some(flags) = caps.get("flags") {
                    entry.put("flags", flags);
                }
                Ok(())
            }),
            Rule::new("entries", r"^Number of mapping entries:\s+(?P<number_of_mapping_entries>\d+)")?
                .update(&["ipv4"]),
        ])
        .with_schema(
            Schema::fixed().required(
                "ipv4",
                Schema::fixed()
                    .required("number_of_mapping_entries", Schema::int())
                    .optional("prefix", Schema::wildcard(prefix)),
            ),
        ))
}

/// Create the `show segment-routing mapping-server prefix-sid-map ipv4 detail` extractor.
pub fn show_segment_routing_mapping_server_prefix_sid_map_ipv4_detail() -> Result<Extractor, ExtractorError> {
    let prefix = Schema::fixed()
        .required_all(&["sid_index", "range"], Schema::int())
        .optional("last_prefix", Schema::str())
        .optional("last_sid_index", Schema::int())
        .optional("flags", Schema::str());

    let field = |name: &str, pattern: &str| -> Result<Rule, regex::Error> {
        Ok(Rule::new(name, pattern)?
            .when(Guard::mode_set("prefix"))
            .update_at(vec![
                Segment::key("ipv4"),
                Segment::key("prefix"),
                Segment::mode("prefix"),
            ]))
    };

    Ok(Extractor::new("show_segment_routing_mapping_server_prefix_sid_map_ipv4_detail")
        .with_description("Locally configured mapping server IPv4 prefix-SIDs, one block per prefix")
        .with_command("show segment-routing mapping-server prefix-sid-map ipv4 detail")?
        .with_rules([
            Rule::new("prefix", r"^(?P<prefix>\d+\.\d+\.\d+\.\d+/\d+)$")?.then(|caps, out, ctx| {
                let prefix = caps.str("prefix")?;
                out.entry(&["ipv4", "prefix", prefix])?;
                ctx.set("prefix", prefix);
                Ok(())
            }),
            field("sid_index", r"^SID Index:\s+(?P<sid_index>\d+)$")?,
            field("range", r"^Range:\s+(?P<range>\d+)$")?,
            field("last_prefix", r"^Last Prefix:\s+(?P<last_prefix>[\d\./]+)$")?
                .conversion(Conversion::Str),
            field("last_sid_index", r"^Last SID Index:\s+(?P<last_sid_index>\d+)$")?,
            field("flags", r"^Flags:\s+(?P<flags>\w+)$")?.conversion(Conversion::Str),
        ])
        .with_schema(Schema::fixed().required(
            "ipv4",
            Schema::fixed().required("prefix", Schema::wildcard(prefix)),
        )))
}

/// Create the `show segment-routing local-block inconsistencies` extractor.
///
/// A device without inconsistencies prints nothing, which yields an empty
/// result.
pub fn show_segment_routing_local_block_inconsistencies() -> Result<Extractor, ExtractorError> {
    Ok(Extractor::new("show_segment_routing_local_block_inconsistencies")
        .with_description("SRLB ranges that conflict with existing label allocations")
        .with_command("show segment-routing local-block inconsistencies")?
        .with_rule(
            Rule::new(
                "range",
                r"^\w+ inconsistencies range: Start/End: (?P<start>\d+)/(?P<end>\d+)",
            )?
            .update(&["srlb_inconsistencies_range"]),
        )
        .with_schema(Schema::fixed().optional(
            "srlb_inconsistencies_range",
            Schema::fixed().required_all(&["start", "end"], Schema::int()),
        )))
}
