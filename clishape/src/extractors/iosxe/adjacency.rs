//! `show adjacency summary`.
//!
//! ```text
//! Adjacency table has 60004 adjacencies:
//!   each adjacency consumes 400 bytes (4 bytes platform extension)
//!   60004 complete adjacencies
//!   0 incomplete adjacencies
//!   60004 adjacencies of linktype IP
//!     60004 complete adjacencies of linktype IP
//!   Database epoch:        0 (60004 entries at this epoch)
//!   Summary events epoch is 5
//!   Summary events queue contains 0 events (high water mark 389 events)
//! ```

use crate::error::ExtractorError;
use crate::extractor::Extractor;
use crate::scanner::{Conversion, Rule};
use crate::schema::Schema;

const SUMMARY: &[&str] = &["adjacencies_summary"];

/// Create the `show adjacency summary` extractor.
pub fn show_adjacency_summary() -> Result<Extractor, ExtractorError> {
    Ok(Extractor::new("show_adjacency_summary")
        .with_description("CEF adjacency table summary")
        .with_command("show adjacency summary")?
        .with_rules([
            Rule::new(
                "complete",
                r"^(?P<complete_adjacencies>\d+) +complete adjacencies$",
            )?
            .update(SUMMARY),
            Rule::new(
                "incomplete",
                r"^(?P<incomplete_adjacencies>\d+) +incomplete adjacencies$",
            )?
            .update(SUMMARY),
            Rule::new(
                "complete_linktype",
                r"^\d+ complete adjacencies of linktype +(?P<complete_adj_linktype>\S+)$",
            )?
            .conversion(Conversion::Str)
            .update(SUMMARY),
            Rule::new(
                "incomplete_linktype",
                r"^\d+ incomplete adjacencies of linktype +(?P<incomplete_adj_linktype>\S+)$",
            )?
            .conversion(Conversion::Str)
            .update(SUMMARY),
            // The form with an entry count must be tried first.
            Rule::new(
                "epoch_with_entries",
                r"^Database epoch: +(?P<database_epoch>\d+) +\((?P<epoch_entries>\d+) entries at this epoch\)$",
            )?
            .update(SUMMARY),
            Rule::new("epoch", r"^Database epoch: +(?P<database_epoch>\d+)$")?.update(SUMMARY),
            Rule::new(
                "events_epoch",
                r"^Summary events epoch is +(?P<summary_events_epoch>\d+)$",
            )?
            .update(SUMMARY),
            Rule::new(
                "events_queue",
                r"^Summary\s+events\s+queue\s+contains\s+(?P<summary_events_queue>\d+) events +\(high water mark (?P<hwm_events>\d+) events\)$",
            )?
            .update(SUMMARY),
        ])
        .with_schema(
            Schema::fixed().required(
                "adjacencies_summary",
                Schema::fixed()
                    .required_all(
                        &[
                            "complete_adjacencies",
                            "incomplete_adjacencies",
                            "database_epoch",
                            "summary_events_epoch",
                            "summary_events_queue",
                            "hwm_events",
                        ],
                        Schema::int(),
                    )
                    .optional_all(&["complete_adj_linktype", "incomplete_adj_linktype"], Schema::str())
                    .optional("epoch_entries", Schema::int()),
            ),
        ))
}
