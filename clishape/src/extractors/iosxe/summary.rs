//! `show ip arp summary` and `show arp summary`.
//!
//! ```text
//! Total number of entries in the ARP table: 1233.
//! Total number of Dynamic ARP entries: 1123.
//! Interface            Entry Count
//! GigabitEthernet0/0/4  4
//! Maximum limit of Learn ARP entry : 512000.
//! Learn ARP Entry Threshold is 409600 and Permit Threshold is 486400.
//! ```

use crate::error::ExtractorError;
use crate::extractor::Extractor;
use crate::scanner::Rule;
use crate::schema::Schema;
use crate::value::MapExt;

/// Create the `show ip arp summary` extractor.
pub fn show_ip_arp_summary() -> Result<Extractor, ExtractorError> {
    Ok(Extractor::new("show_ip_arp_summary")
        .with_description("IP ARP entry totals")
        .with_command("show ip arp summary")?
        .with_rule(
            Rule::new(
                "totals",
                r"^(?P<total_entries>\d+) +IP +ARP +entries, +with +(?P<incomp_entries>\d+) +of +them +incomplete$",
            )?
            .update(&[]),
        )
        .with_schema(
            Schema::fixed().required_all(&["total_entries", "incomp_entries"], Schema::int()),
        ))
}

/// Create the `show arp summary` extractor.
pub fn show_arp_summary() -> Result<Extractor, ExtractorError> {
    Ok(Extractor::new("show_arp_summary")
        .with_description("ARP entry totals per kind and per interface")
        .with_command("show arp summary")?
        .with_rules([
            Rule::new(
                "table_entries",
                r"^Total +number +of +entries +in +the +ARP +table: +(?P<arp_table_entries>\d+)\.?$",
            )?
            .update(&["total_num_of_entries"]),
            Rule::new(
                "entry_totals",
                r"^Total +number +of +(?P<entry_name>.+?): +(?P<num_of_entries>\d+)\.?$",
            )?
            .then(|caps, out, _| {
                let count = caps.int("num_of_entries")?;
                let key = snake_key(caps.str("entry_name")?);
                out.set(&["total_num_of_entries"], &key, count)
            }),
            Rule::new(
                "interface_entries",
                r"^(?P<interface_name>[\w/.\-]+) +(?P<entry_count>\d+)$",
            )?
            .then(|caps, out, _| {
                let count = caps.int("entry_count")?;
                out.set(&["interface_entries"], caps.str("interface_name")?, count)
            }),
            Rule::new(
                "thresholds",
                r"^Learn +ARP +Entry +Threshold +is +(?P<arp_entry_threshold>\d+) +and +Permit +Threshold +is +(?P<permit_threshold>\d+)\.?$",
            )?
            .update(&[]),
            Rule::new(
                "maximum_entries",
                r"^(?P<maximum_entries_name>.+?) +: +(?P<maximum_entries>\d+)\.?$",
            )?
            .then(|caps, out, _| {
                let limit = caps.int("maximum_entries")?;
                let key = snake_key(caps.str("maximum_entries_name")?);
                out.entry(&["maximum_entries"])?.put(&key, limit);
                Ok(())
            }),
        ])
        .with_schema(
            Schema::fixed()
                .required("total_num_of_entries", Schema::wildcard(Schema::int()))
                .required("interface_entries", Schema::wildcard(Schema::int()))
                .optional("maximum_entries", Schema::wildcard(Schema::int()))
                .optional_all(&["arp_entry_threshold", "permit_threshold"], Schema::int()),
        ))
}

/// "Dynamic ARP entries" -> "dynamic_arp_entries".
fn snake_key(name: &str) -> String {
    name.trim().replace(' ', "_").to_lowercase()
}
