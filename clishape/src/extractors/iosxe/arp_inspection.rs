//! Dynamic ARP inspection (`show ip arp inspection ...`).
//!
//! The per-VLAN statistics are printed as three tables whose rows are all
//! bare numbers, so the rows are told apart by position:
//!
//! ```text
//!  Vlan      Forwarded        Dropped     DHCP Drops      ACL Drops
//!  ----      ---------        -------     ----------      ---------
//!    10              0              0              0              0
//!
//!  Vlan   DHCP Permits    ACL Permits  Probe Permits   Source MAC Failures
//!  ----   ------------    -----------  -------------   -------------------
//!    10              0              0              0                     0
//!
//!  Vlan   Dest MAC Failures   IP Validation Failures   Invalid Protocol Data
//!  ----   -----------------   ----------------------   ---------------------
//!    10                   0                        0                       0
//! ```

use crate::error::ExtractorError;
use crate::extractor::Extractor;
use crate::scanner::{Conversion, Guard, Rule};
use crate::schema::Schema;
use crate::value::MapExt;

/// Create the `show ip arp inspection vlan {num}` extractor.
pub fn show_ip_arp_inspection_vlan() -> Result<Extractor, ExtractorError> {
    Ok(Extractor::new("show_ip_arp_inspection_vlan")
        .with_description("ARP inspection configuration of one VLAN")
        .with_command("show ip arp inspection vlan {num}")?
        .with_rules([
            Rule::new(
                "source_mac_validation",
                r"^Source\s+Mac\s+Validation\s+:\s+(?P<source_mac_validation>\S+)",
            )?
            .conversion(Conversion::Str)
            .update(&[]),
            Rule::new(
                "destination_mac_validation",
                r"^Destination\s+Mac\s+Validation\s+:\s+(?P<destination_mac_validation>\S+)",
            )?
            .conversion(Conversion::Str)
            .update(&[]),
            Rule::new(
                "ip_address_validation",
                r"^IP\s+Address\s+Validation\s+:\s+(?P<ip_address_validation>\S+)",
            )?
            .conversion(Conversion::Str)
            .update(&[]),
            Rule::new(
                "operation",
                r"^(?P<vlan>\d+) +(?P<configuration>[a-zA-Z]+) +(?P<operation>[a-zA-Z]+)$",
            )?
            .conversion(Conversion::Str)
            .convert("vlan", Conversion::Int)
            .update(&[]),
            Rule::new(
                "logging",
                r"^\d+ +(?P<acl_logging>[a-zA-Z-]+) +(?P<dhcp_logging>[a-zA-Z]+) +(?P<probe_logging>[a-zA-Z]+)$",
            )?
            .conversion(Conversion::Str)
            .update(&[]),
        ])
        .with_schema(
            Schema::fixed()
                .required_all(
                    &[
                        "source_mac_validation",
                        "destination_mac_validation",
                        "ip_address_validation",
                        "configuration",
                        "operation",
                        "acl_logging",
                        "dhcp_logging",
                        "probe_logging",
                    ],
                    Schema::str(),
                )
                .required("vlan", Schema::int()),
        ))
}

/// Create the `show ip arp inspection statistics vlan {num}` extractor.
pub fn show_ip_arp_inspection_statistics_vlan() -> Result<Extractor, ExtractorError> {
    Ok(Extractor::new("show_ip_arp_inspection_statistics_vlan")
        .with_description("ARP inspection counters of one VLAN")
        .with_command("show ip arp inspection statistics vlan {num}")?
        .with_rules([
            Rule::new(
                "drops",
                r"^(?P<vlan_id>\d+)\s+(?P<forwarded>\d+)\s+(?P<dropped>\d+)\s+(?P<dhcp_drops>\d+)\s+(?P<acl_drops>\d+)$",
            )?
            .when(Guard::mode_unset("row"))
            .update(&[])
            .enter("row", "drops"),
            Rule::new(
                "permits",
                r"^\d+\s+(?P<dhcp_permits>\d+)\s+(?P<acl_permits>\d+)\s+(?P<probe_permits>\d+)\s+(?P<source_mac_failures>\d+)$",
            )?
            .when(Guard::mode_set("row"))
            .update(&[])
            .enter("row", "permits"),
            Rule::new(
                "failures",
                r"^\d+\s+(?P<dest_mac_failures>\d+)\s+(?P<ip_validation_failures>\d+)\s+(?P<invalid_protocol_data>\d+)$",
            )?
            .update(&[])
            .halt(),
        ])
        .with_schema(Schema::fixed().required_all(
            &[
                "vlan_id",
                "forwarded",
                "dropped",
                "dhcp_drops",
                "acl_drops",
                "dhcp_permits",
                "acl_permits",
                "probe_permits",
                "source_mac_failures",
                "dest_mac_failures",
                "ip_validation_failures",
                "invalid_protocol_data",
            ],
            Schema::int(),
        )))
}

/// Create the `show ip arp inspection interfaces` extractor.
pub fn show_ip_arp_inspection_interfaces() -> Result<Extractor, ExtractorError> {
    let interface = Schema::fixed()
        .required_all(&["interface", "state"], Schema::str())
        .required_all(&["rate", "interval"], Schema::int());

    Ok(Extractor::new("show_ip_arp_inspection_interfaces")
        .with_description("ARP inspection trust state and rate limits per interface")
        .with_command("show ip arp inspection interfaces")?
        .with_command("show ip arp inspection interfaces {interface}")?
        .with_rule(
            Rule::new(
                "interface",
                r"^(?P<interface>\S+)\s+(?P<state>\w+)\s+(?P<rate>\d+)\s+(?P<interval>\d+)$",
            )?
            .then(|caps, out, _| {
                let interface = caps.str("interface")?;
                let rate = caps.int("rate")?;
                let interval = caps.int("interval")?;

                let entry = out.entry(&["interfaces", interface])?;
                entry.put("interface", interface);
                entry.put("state", caps.str("state")?);
                entry.put("rate", rate);
                entry.put("interval", interval);
                Ok(())
            }),
        )
        .with_schema(Schema::fixed().required("interfaces", Schema::wildcard(interface))))
}

/// Create the `show ip arp inspection log` extractor.
pub fn show_ip_arp_inspection_log() -> Result<Extractor, ExtractorError> {
    let entry = Schema::fixed()
        .required_all(
            &["interface", "send_mac_addr", "sender_ip", "reason", "time_range"],
            Schema::str(),
        )
        .required_all(&["vlan_id", "no_pkts"], Schema::int());

    Ok(Extractor::new("show_ip_arp_inspection_log")
        .with_description("ARP inspection log buffer")
        .with_command("show ip arp inspection log")?
        .with_rules([
            Rule::new(
                "buffer_size",
                r"^Total\s+Log\s+Buffer\s+Size\s+:\s+(?P<buffer_size>\d+)$",
            )?
            .update(&[]),
            Rule::new(
                "syslog_rate",
                r"^Syslog\s+rate\s+:\s+(?P<syslog_rate>\S+\s+\S+\s+\S+\s+\S+\s+\S+)\.$",
            )?
            .conversion(Conversion::Str)
            .update(&[]),
            Rule::new(
                "entry",
                r"^(?P<interface>\S+)\s+(?P<vlan_id>\d+)\s+(?P<send_mac_addr>\S+)\s+(?P<sender_ip>(?:\d{1,3}\.){3}\d{1,3})\s+(?P<no_pkts>\d+)\s+(?P<reason>\S+\s+\S+)\s+(?P<time_range>\S+\s+\S+\s+\S+\s+\S+\s+\S+\s+\S+)$",
            )?
            .then(|caps, out, _| {
                let interface = caps.str("interface")?;
                let vlan_id = caps.int("vlan_id")?;
                let packets = caps.int("no_pkts")?;

                let entry = out.entry(&["interfaces", interface])?;
                entry.put("interface", interface);
                entry.put("vlan_id", vlan_id);
                entry.put("send_mac_addr", caps.str("send_mac_addr")?);
                entry.put("sender_ip", caps.str("sender_ip")?);
                entry.put("no_pkts", packets);
                entry.put("reason", caps.str("reason")?);
                entry.put("time_range", caps.str("time_range")?);
                Ok(())
            }),
        ])
        .with_schema(
            Schema::fixed()
                .required("buffer_size", Schema::int())
                .required("syslog_rate", Schema::str())
                .optional("interfaces", Schema::wildcard(entry)),
        ))
}
