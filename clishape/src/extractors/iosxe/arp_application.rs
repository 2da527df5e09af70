//! `show arp application`.
//!
//! The application name column is twenty characters wide and long names run
//! straight into the ID column:
//!
//! ```text
//! Number of clients registered: 16
//!
//! Application             ID      Num of Subblocks
//! MLPoA                   200     0
//! ASR1000-RP SPA Ether215 10024
//! ```

use crate::error::ExtractorError;
use crate::extractor::Extractor;
use crate::scanner::Rule;
use crate::schema::Schema;
use crate::value::MapExt;

/// Create the `show arp application` extractor.
pub fn show_arp_application() -> Result<Extractor, ExtractorError> {
    let application = Schema::fixed().required_all(&["id", "num_of_subblocks"], Schema::int());

    Ok(Extractor::new("show_arp_application")
        .with_description("Clients registered with the ARP subsystem")
        .with_command("show arp application")?
        .with_rule(
            Rule::new(
                "clients",
                r"^Number +of +clients +registered: +(?P<num_of_clients_registered>\d+)$",
            )?
            .update(&[]),
        )
        .with_rule(
            Rule::new(
                "application",
                r"^(?P<application_name>.{1,20}?)\s*(?P<id>\d+)\s+(?P<num_of_subblocks>\d+)$",
            )?
            .then(|caps, out, _| {
                let id = caps.int("id")?;
                let subblocks = caps.int("num_of_subblocks")?;
                let name = caps.str("application_name")?.trim_end();

                let entry = out.entry(&["applications", name])?;
                entry.put("id", id);
                entry.put("num_of_subblocks", subblocks);
                Ok(())
            }),
        )
        .with_schema(
            Schema::fixed()
                .required("num_of_clients_registered", Schema::int())
                .required("applications", Schema::wildcard(application)),
        ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    const OUTPUT: &str = "\
Number of clients registered: 16

Application             ID      Num of Subblocks
MLPoA                   200     0
IP ARP                  201     3
ASR1000-RP SPA Ether215 10024
";

    #[test]
    fn test_parse() {
        let result = show_arp_application().unwrap().parse(OUTPUT).unwrap();

        assert_eq!(result["num_of_clients_registered"], Value::Int(16));
        let applications = result["applications"].as_map().unwrap();
        assert_eq!(applications.len(), 3);
        assert_eq!(
            result.lookup(&["applications", "IP ARP", "num_of_subblocks"]),
            Some(&Value::Int(3))
        );
    }

    #[test]
    fn test_overrun_name_column() {
        let result = show_arp_application().unwrap().parse(OUTPUT).unwrap();
        assert_eq!(
            result.lookup(&["applications", "ASR1000-RP SPA Ether", "id"]),
            Some(&Value::Int(215))
        );
        assert_eq!(
            result.lookup(&["applications", "ASR1000-RP SPA Ether", "num_of_subblocks"]),
            Some(&Value::Int(10024))
        );
    }

    #[test]
    fn test_missing_client_count_fails() {
        let text = OUTPUT.replace("Number of clients registered: 16", "");
        assert!(show_arp_application().unwrap().parse(&text).is_err());
    }
}
