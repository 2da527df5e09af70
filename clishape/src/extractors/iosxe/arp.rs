//! `show arp` and `show ip arp`.
//!
//! Entries learned on an interface are filed under that interface's IPv4
//! neighbor table; entries without an interface column (incomplete or
//! alias entries) go to the global static table.
//!
//! ```text
//! Protocol  Address          Age (min)  Hardware Addr   Type   Interface
//! Internet  10.1.18.1              45   0012.7f57.ac80  ARPA   GigabitEthernet1
//! Internet  10.1.18.122             -   0015.f9cd.9a01  ARPA   GigabitEthernet1
//! Internet  10.16.1.1               -   aaaa.bbbb.cccc  ARPA
//! ```

use crate::error::ExtractorError;
use crate::extractor::Extractor;
use crate::scanner::Rule;
use crate::schema::Schema;
use crate::value::MapExt;

const ENTRY: &str = r"^(?P<protocol>\w+) +(?P<address>[\d\.\:]+) +(?P<age>[\d\-]+) +(?P<mac>[\w\.]+) +(?P<type>[\w\.]+)( +(?P<interface>[\w\.\/\-]+)(\s+pv\s+(?P<private_vlan>\d+))?)?$";

/// Create the `show arp` extractor.
pub fn show_arp() -> Result<Extractor, ExtractorError> {
    Ok(Extractor::new("show_arp")
        .with_description("ARP table, optionally per VRF, interface or address")
        .with_command("show arp")?
        .with_command("show arp vrf {vrf}")?
        .with_command("show arp vrf {vrf} {intf_or_ip}")?
        .with_command("show arp {intf_or_ip}")?
        .with_rule(entry()?)
        .with_schema(schema())
        .with_volatile("age"))
}

/// Create the `show ip arp` extractor.
pub fn show_ip_arp() -> Result<Extractor, ExtractorError> {
    Ok(Extractor::new("show_ip_arp")
        .with_description("IP ARP table, optionally per VRF")
        .with_command("show ip arp")?
        .with_command("show ip arp vrf {vrf}")?
        .with_rule(entry()?)
        .with_schema(schema())
        .with_volatile("age"))
}

fn entry() -> Result<Rule, regex::Error> {
    Ok(Rule::new("arp_entry", ENTRY)?.then(|caps, out, _| {
        let address = caps.str("address")?;
        let age = caps.str("age")?;
        let mac = caps.str("mac")?;
        let kind = caps.str("type")?;
        let protocol = caps.str("protocol")?;

        let Some(interface) = caps.get("interface") else {
            let entry = out.entry(&["global_static_table", address])?;
            entry.put("ip_address", address);
            entry.put("mac_address", mac);
            entry.put("encap_type", kind);
            entry.put("age", age);
            entry.put("protocol", protocol);
            return Ok(());
        };

        let private_vlan = caps.opt_int("private_vlan")?;
        let origin = if age == "-" { "static" } else { "dynamic" };

        let neighbor = out.entry(&["interfaces", interface, "ipv4", "neighbors", address])?;
        neighbor.put("ip", address);
        neighbor.put("link_layer_address", mac);
        neighbor.put("type", kind);
        neighbor.put("origin", origin);
        neighbor.put("age", age);
        neighbor.put("protocol", protocol);
        if let Some(vlan) = private_vlan {
            neighbor.put("private_vlan", vlan);
        }
        Ok(())
    }))
}

fn schema() -> Schema {
    let global = Schema::fixed().required_all(
        &["ip_address", "mac_address", "encap_type", "age", "protocol"],
        Schema::str(),
    );

    let neighbor = Schema::fixed()
        .required_all(
            &["ip", "link_layer_address", "origin", "age", "type", "protocol"],
            Schema::str(),
        )
        .optional("private_vlan", Schema::int());

    let interface = Schema::fixed().required(
        "ipv4",
        Schema::fixed().required("neighbors", Schema::wildcard(neighbor)),
    );

    Schema::fixed()
        .optional("global_static_table", Schema::wildcard(global))
        .optional("interfaces", Schema::wildcard(interface))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Map, Value};

    const OUTPUT: &str = "\
Protocol  Address          Age (min)  Hardware Addr   Type   Interface
Internet  10.1.18.1              45   0012.7f57.ac80  ARPA   GigabitEthernet1
Internet  10.1.18.122             -   0015.f9cd.9a01  ARPA   GigabitEthernet1
Internet  192.168.100.1           -   aabb.cc00.0100  ARPA   Vlan100 pv 200
Internet  10.16.1.1               -   aaaa.bbbb.cccc  ARPA
";

    #[test]
    fn test_interface_neighbors() {
        let result = show_arp().unwrap().parse(OUTPUT).unwrap();

        let neighbors = result
            .lookup(&["interfaces", "GigabitEthernet1", "ipv4", "neighbors"])
            .and_then(Value::as_map)
            .unwrap();
        assert_eq!(neighbors.len(), 2);

        let mut expected = Map::new();
        expected.put("ip", "10.1.18.1");
        expected.put("link_layer_address", "0012.7f57.ac80");
        expected.put("type", "ARPA");
        expected.put("origin", "dynamic");
        expected.put("age", "45");
        expected.put("protocol", "Internet");
        assert_eq!(neighbors["10.1.18.1"], Value::Map(expected));

        assert_eq!(
            result.lookup(&["interfaces", "GigabitEthernet1", "ipv4", "neighbors", "10.1.18.122", "origin"]),
            Some(&Value::from("static"))
        );
    }

    #[test]
    fn test_dash_age_is_static() {
        let result = show_arp()
            .unwrap()
            .parse("Internet  192.168.234.1  -  58bf.eaff.e508  ARPA  Vlan100")
            .unwrap();

        let mut expected = Map::new();
        expected.put("ip", "192.168.234.1");
        expected.put("link_layer_address", "58bf.eaff.e508");
        expected.put("type", "ARPA");
        expected.put("origin", "static");
        expected.put("age", "-");
        expected.put("protocol", "Internet");
        assert_eq!(
            result.lookup(&["interfaces", "Vlan100", "ipv4", "neighbors", "192.168.234.1"]),
            Some(&Value::Map(expected))
        );
        assert!(!result.contains_key("global_static_table"));
    }

    #[test]
    fn test_private_vlan() {
        let result = show_arp().unwrap().parse(OUTPUT).unwrap();
        assert_eq!(
            result.lookup(&["interfaces", "Vlan100", "ipv4", "neighbors", "192.168.100.1", "private_vlan"]),
            Some(&Value::Int(200))
        );
    }

    #[test]
    fn test_global_static_table() {
        let result = show_arp().unwrap().parse(OUTPUT).unwrap();

        let mut expected = Map::new();
        expected.put("ip_address", "10.16.1.1");
        expected.put("mac_address", "aaaa.bbbb.cccc");
        expected.put("encap_type", "ARPA");
        expected.put("age", "-");
        expected.put("protocol", "Internet");
        assert_eq!(
            result.lookup(&["global_static_table", "10.16.1.1"]),
            Some(&Value::Map(expected))
        );
    }

    #[test]
    fn test_empty_table() {
        let header = "Protocol  Address          Age (min)  Hardware Addr   Type   Interface\n";
        assert!(show_ip_arp().unwrap().parse(header).unwrap().is_empty());
    }

    #[test]
    fn test_age_is_volatile() {
        let extractor = show_ip_arp().unwrap();
        let before = extractor.parse(OUTPUT).unwrap();
        let after = extractor
            .parse(&OUTPUT.replace("      45   ", "      46   "))
            .unwrap();

        assert_ne!(before, after);
        assert_eq!(extractor.strip_volatile(&before), extractor.strip_volatile(&after));
    }

    #[test]
    fn test_commands() {
        let extractor = show_arp().unwrap();
        assert!(extractor.match_command("show arp vrf blue 10.1.1.1").is_some());
        assert!(extractor.match_command("show ip arp").is_none());
        assert!(show_ip_arp().unwrap().match_command("show ip arp vrf blue").is_some());
    }
}
