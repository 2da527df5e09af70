//! `show pce ipv4 peer` and `show pce ipv4 peer detail`.
//!
//! Every line after a `Peer address:` heading belongs to that peer until the
//! next heading, so the peer address is carried in the scan context.
//!
//! ```text
//! PCE's peer database:
//! --------------------
//! Peer address: 192.168.0.1
//!   State: Up
//!   Capabilities: Stateful, Segment-Routing, Update, Instantiation
//!
//!   PCEP has been up for: 00:01:50
//!   PCEP session ID: local 0, remote 0
//!   ...
//!   Statistics:
//!     Keepalive messages: rx    4 tx    4
//!     Request messages:   rx    3 tx    0
//!   ...
//!   Last PCError:
//!     Received: None
//!     Sent: None
//! ```

use crate::error::ExtractorError;
use crate::extractor::Extractor;
use crate::scanner::{Conversion, Guard, Rule, Segment};
use crate::schema::Schema;
use crate::value::Value;

const CAPABILITIES: &[&str] = &["stateful", "segment-routing", "update", "instantiation"];

/// Create the `show pce ipv4 peer` extractor.
pub fn show_pce_ipv4_peer() -> Result<Extractor, ExtractorError> {
    let flags = Schema::fixed().optional_all(CAPABILITIES, Schema::bool());
    let peer = Schema::fixed()
        .required("state", Schema::str())
        .required("capabilities", flags);

    Ok(Extractor::new("show_pce_ipv4_peer")
        .with_description("PCEP peers of this PCE")
        .with_command("show pce ipv4 peer")?
        .with_rules([peer_address()?, state()?, capabilities()?])
        .with_schema(Schema::fixed().required("pce_peer_database", Schema::wildcard(peer))))
}

/// Create the `show pce ipv4 peer detail` extractor.
pub fn show_pce_ipv4_peer_detail() -> Result<Extractor, ExtractorError> {
    Ok(Extractor::new("show_pce_ipv4_peer_detail")
        .with_description("PCEP peers of this PCE with session details and counters")
        .with_command("show pce ipv4 peer detail")?
        .with_rules([
            peer_address()?,
            state()?,
            capabilities()?,
            peer_rule(
                "uptime",
                r"^PCEP has been up for: (?P<uptime>[\w:]+)$",
                &["pcep"],
                Conversion::Str,
            )?,
            peer_rule(
                "session_id",
                r"^PCEP session ID: local (?P<session_id_local>\d+), remote (?P<session_id_remote>\d+)$",
                &["pcep"],
                Conversion::Int,
            )?,
            peer_rule(
                "keepalive",
                r"^Sending KA every (?P<sending_intervals>\d+)\s+seconds$",
                &["ka"],
                Conversion::Int,
            )?,
            peer_rule(
                "minimum_keepalive",
                r"^Minimum acceptable KA interval: (?P<minimum_acceptable_inteval>\d+)\s+seconds$",
                &["ka"],
                Conversion::Int,
            )?,
            peer_rule(
                "peer_timeout",
                r"^Peer timeout after (?P<peer_timeout>\d+)\s+seconds$",
                &[],
                Conversion::Int,
            )?,
            peer_rule(
                "maximum_sid_depth",
                r"^Maximum SID Depth:\s+(?P<maximum_sid_depth>\d+)$",
                &[],
                Conversion::Int,
            )?,
            peer_rule("md5", r"^MD5:\s+(?P<md5>\w+)$", &[], Conversion::Str)?,
            messages()?,
            peer_rule("last_pcerror", r"^Last\s+PCError:$", &["last_pcerror"], Conversion::Str)?
                .enter("pcerror", "open"),
            peer_rule(
                "pcerror_received",
                r"^Received:\s+(?P<received>\w+)$",
                &["last_pcerror"],
                Conversion::Str,
            )?
            .when(Guard::mode_set("pcerror")),
            peer_rule(
                "pcerror_sent",
                r"^Sent:\s+(?P<sent>\w+)$",
                &["last_pcerror"],
                Conversion::Str,
            )?
            .when(Guard::mode_set("pcerror")),
        ])
        .with_schema(detail_schema()))
}

fn peer_address() -> Result<Rule, regex::Error> {
    Ok(Rule::new("peer_address", r"^Peer address: (?P<address>[\d\.]+)$")?
        .leave("pcerror")
        .then(|caps, out, ctx| {
            let address = caps.str("address")?;
            out.entry(&["pce_peer_database", address])?;
            ctx.set("peer", address);
            Ok(())
        }))
}

fn state() -> Result<Rule, regex::Error> {
    peer_rule("state", r"^State: (?P<state>\w+)$", &[], Conversion::Str)
}

/// `Capabilities: Stateful, Segment-Routing, Update[, Instantiation]`, one
/// flag per column.
fn capabilities() -> Result<Rule, regex::Error> {
    Ok(Rule::new(
        "capabilities",
        r"^Capabilities: (?P<stateful>\w+),\s+(?P<segment_routing>[\w\-]+),\s+(?P<update>\w+)(?:,\s+(?P<instantiation>\w+))?$",
    )?
    .when(Guard::mode_set("peer"))
    .then(|caps, out, ctx| {
        let peer = caps.require_mode(ctx, "peer")?;
        let columns = ["stateful", "segment_routing", "update", "instantiation"];

        let mut flags = Vec::new();
        for (column, key) in columns.iter().zip(CAPABILITIES) {
            if let Some(text) = caps.get(column) {
                flags.push((key.to_string(), Value::Bool(text.to_lowercase().contains(key))));
            }
        }
        out.entry(&["pce_peer_database", peer, "capabilities"])?
            .extend(flags);
        Ok(())
    }))
}

/// `<Kind> messages: rx N tx M`, filed under statistics/rx and statistics/tx.
fn messages() -> Result<Rule, regex::Error> {
    Ok(Rule::new(
        "messages",
        r"^(?P<kind>Keepalive|Request|Reply|Error|Open|Report|Update|Initiate) messages:\s+rx\s+(?P<rx>\d+)\s+tx\s+(?P<tx>\d+)$",
    )?
    .when(Guard::mode_set("peer"))
    .then(|caps, out, ctx| {
        let peer = caps.require_mode(ctx, "peer")?;
        let key = format!("{}_messages", caps.str("kind")?.to_lowercase());
        let rx = caps.int("rx")?;
        let tx = caps.int("tx")?;

        out.set(&["pce_peer_database", peer, "statistics", "rx"], &key, rx)?;
        out.set(&["pce_peer_database", peer, "statistics", "tx"], &key, tx)
    }))
}

/// A line that belongs to the current peer: every capture is written into
/// the mapping at `path` below the peer's entry.
fn peer_rule(
    name: &str,
    pattern: &str,
    path: &[&str],
    conversion: Conversion,
) -> Result<Rule, regex::Error> {
    let mut target = vec![Segment::key("pce_peer_database"), Segment::mode("peer")];
    target.extend(path.iter().map(|key| Segment::key(*key)));

    Ok(Rule::new(name, pattern)?
        .when(Guard::mode_set("peer"))
        .conversion(conversion)
        .update_at(target))
}

fn detail_schema() -> Schema {
    let flags = Schema::fixed()
        .required_all(&CAPABILITIES[..3], Schema::bool())
        .optional("instantiation", Schema::bool());

    let pcep = Schema::fixed()
        .optional("uptime", Schema::str())
        .optional_all(&["session_id_local", "session_id_remote"], Schema::int());

    let ka = Schema::fixed().optional_all(
        &["sending_intervals", "minimum_acceptable_inteval"],
        Schema::int(),
    );

    let counters = Schema::fixed().required_all(
        &[
            "keepalive_messages",
            "request_messages",
            "reply_messages",
            "error_messages",
            "open_messages",
            "report_messages",
            "update_messages",
            "initiate_messages",
        ],
        Schema::int(),
    );

    let peer = Schema::fixed()
        .required("state", Schema::str())
        .optional("capabilities", flags)
        .optional("pcep", pcep)
        .optional("md5", Schema::str())
        .optional("ka", ka)
        .optional_all(&["peer_timeout", "maximum_sid_depth"], Schema::int())
        .required(
            "statistics",
            Schema::fixed()
                .required("rx", counters.clone())
                .required("tx", counters),
        )
        .optional(
            "last_pcerror",
            Schema::fixed().required_all(&["received", "sent"], Schema::str()),
        );

    Schema::fixed().required("pce_peer_database", Schema::wildcard(peer))
}
