//! `show ip traffic`.
//!
//! The report is a sequence of per-protocol sections. Several line shapes
//! (`Rcvd: N total`, `Sent: N total`, `Queue drops: N`, the irdp counter
//! lines) repeat across sections or across the Rcvd/Sent halves of one
//! section, so every body rule is gated on the `section` mode set by the
//! heading that precedes it, and the ICMP, OSPF and BGP continuation lines are
//! additionally gated on the `direction` mode.
//!
//! ```text
//! IP statistics:
//!   Rcvd:  17780 total, 110596 local destination
//!          0 format errors, 0 checksum errors, 0 bad hop count
//!   ...
//! ICMP statistics:
//!   Rcvd: 0 format errors, 0 checksum errors, 0 redirects, 0 unreachable
//!         0 irdp solicitations, 0 irdp advertisements
//!   Sent: 0 redirects, 14 unreachable, 9 echo, 134 echo reply
//!         0 irdp solicitations, 0 irdp advertisements
//! ```

use crate::error::ExtractorError;
use crate::extractor::Extractor;
use crate::scanner::{Conversion, Guard, Rule};
use crate::schema::{LeafType, Schema};

const VOLATILE: &[&str] = &[
    "bgp_received_keepalives",
    "bgp_received_total",
    "bgp_sent_keepalives",
    "bgp_sent_total",
    "eigrp_ipv4_received_total",
    "eigrp_ipv4_sent_total",
    "icmp_received_echo",
    "icmp_sent_echo_reply",
    "igmp_host_queries",
    "igmp_host_reports",
    "igmp_total",
    "ip_bcast_received",
    "ip_bcast_sent",
    "ip_mcast_received",
    "ip_mcast_sent",
    "ip_opts_alert",
    "ip_rcvd_format_errors",
    "ip_rcvd_local_destination",
    "ip_rcvd_total",
    "ip_rcvd_with_optns",
    "ip_sent_generated",
    "ospf_received_hello",
    "ospf_received_lnk_st_acks",
    "ospf_received_lnk_st_updates",
    "ospf_received_total",
    "ospf_sent_hello",
    "ospf_sent_lnk_st_acks",
    "ospf_sent_lnk_st_updates",
    "ospf_sent_total",
    "pimv2_bootstraps",
    "pimv2_candidate_rp_advs",
    "pimv2_hellos",
    "pimv2_registers",
    "pimv2_registers_stops",
    "pimv2_total",
    "tcp_received_no_port",
    "tcp_received_total",
    "tcp_sent_total",
    "udp_received_no_port",
    "udp_received_total",
    "udp_sent_total",
];

/// Create the `show ip traffic` extractor.
pub fn show_ip_traffic() -> Result<Extractor, ExtractorError> {
    let extractor = Extractor::new("show_ip_traffic")
        .with_description("Per-protocol IP traffic statistics")
        .with_command("show ip traffic")?
        .with_rules(rules()?)
        .with_schema(schema());

    Ok(VOLATILE
        .iter()
        .fold(extractor, |extractor, field| extractor.with_volatile(*field)))
}

/// A section heading: opens the section and resets the Rcvd/Sent half.
fn heading(section: &str, pattern: &str) -> Result<Rule, regex::Error> {
    Ok(Rule::new(format!("{section}_heading"), pattern)?
        .ensure(&[format!("{section}_statistics").as_str()])
        .enter("section", section)
        .leave("direction"))
}

/// A counter line that only belongs to one section.
fn counters(name: &str, section: &str, pattern: &str) -> Result<Rule, regex::Error> {
    Ok(Rule::new(name, pattern)?
        .when(Guard::mode_is("section", section))
        .update(&[format!("{section}_statistics").as_str()]))
}

fn rules() -> Result<Vec<Rule>, regex::Error> {
    Ok(vec![
        // ARP
        heading("arp", r"^ARP +statistics:")?,
        counters(
            "arp_rcvd",
            "arp",
            r"^Rcvd: +(?P<arp_in_requests>\d+) +requests, +(?P<arp_in_replies>\d+) +replies, +(?P<arp_in_reverse>\d+) +reverse, +(?P<arp_in_other>\d+) +other$",
        )?,
        counters(
            "arp_sent",
            "arp",
            r"^Sent: +(?P<arp_out_requests>\d+) +requests, +(?P<arp_out_replies>\d+) +replies +\((?P<arp_out_proxy>\w+) +proxy\), +(?P<arp_out_reverse>\d+) +reverse$",
        )?
        .convert("arp_out_proxy", Conversion::IntOrStr),
        counters(
            "arp_drops",
            "arp",
            r"^Drop +due +to +input +queue +full: +(?P<arp_drops_input_full>\d+)$",
        )?,
        // IP
        heading("ip", r"^IP +statistics:")?,
        counters(
            "ip_rcvd",
            "ip",
            r"^Rcvd: +(?P<ip_rcvd_total>\d+) +total, +(?P<ip_rcvd_local_destination>\d+) +local +destination$",
        )?,
        counters(
            "ip_rcvd_errors",
            "ip",
            r"^(?P<ip_rcvd_format_errors>\d+) +format +errors, +(?P<ip_rcvd_checksum_errors>\d+) +checksum +errors, +(?P<ip_rcvd_bad_hop>\d+) +bad +hop +count$",
        )?,
        counters(
            "ip_rcvd_unknown",
            "ip",
            r"^(?P<ip_rcvd_unknwn_protocol>\d+) +unknown +protocol, +(?P<ip_rcvd_not_gateway>\d+) +not +a +gateway$",
        )?,
        counters(
            "ip_rcvd_security",
            "ip",
            r"^(?P<ip_rcvd_sec_failures>\d+) +security +failures, +(?P<ip_rcvd_bad_optns>\d+) +bad +options, +(?P<ip_rcvd_with_optns>\d+) +with +options$",
        )?,
        counters(
            "ip_opts",
            "ip",
            r"^Opts: +(?P<ip_opts_end>\d+) +end, +(?P<ip_opts_nop>\d+) +nop, +(?P<ip_opts_basic_security>\d+) +basic +security, +(?P<ip_opts_loose_src_route>\d+) +loose +source +route$",
        )?,
        counters(
            "ip_opts_timestamp",
            "ip",
            r"^(?P<ip_opts_timestamp>\d+) +timestamp, +(?P<ip_opts_extended_security>\d+) +extended +security, +(?P<ip_opts_record_route>\d+) +record +route$",
        )?,
        counters(
            "ip_opts_stream",
            "ip",
            r"^(?P<ip_opts_strm_id>\d+) +stream +ID, +(?P<ip_opts_strct_src_route>\d+) +strict +source +route, +(?P<ip_opts_alert>\d+) +alert, +(?P<ip_opts_cipso>\d+) +cipso, +(?P<ip_opts_ump>\d+) +ump$",
        )?,
        counters(
            "ip_opts_other",
            "ip",
            r"^(?P<ip_opts_other>\d+) +other(, +(?P<ip_opts_ignored>\d+) +ignored)?$",
        )?,
        counters(
            "ip_frags",
            "ip",
            r"^Frags: +(?P<ip_frags_reassembled>\d+) +reassembled, +(?P<ip_frags_timeouts>\d+) +timeouts, +(?P<ip_frags_no_reassembled>\d+) +couldn't +reassemble$",
        )?,
        counters(
            "ip_frags_fragmented",
            "ip",
            r"^(?P<ip_frags_fragmented>\d+) +fragmented,( +(?P<ip_frags_fragments>\d+) +fragments,)? +(?P<ip_frags_no_fragmented>\d+) +couldn't +fragment$",
        )?,
        counters(
            "ip_frags_invalid_hole",
            "ip",
            r"^(?P<ip_frags_invalid_hole>\d+) +invalid +hole$",
        )?,
        counters(
            "ip_bcast",
            "ip",
            r"^Bcast: +(?P<ip_bcast_received>\d+) +received, +(?P<ip_bcast_sent>\d+) +sent$",
        )?,
        counters(
            "ip_mcast",
            "ip",
            r"^Mcast: +(?P<ip_mcast_received>\d+) +received, +(?P<ip_mcast_sent>\d+) +sent$",
        )?,
        counters(
            "ip_sent",
            "ip",
            r"^Sent: +(?P<ip_sent_generated>\d+) +generated, +(?P<ip_sent_forwarded>\d+) +forwarded$",
        )?,
        counters(
            "ip_drop",
            "ip",
            r"^Drop: +(?P<ip_drop_encap_failed>\d+) +encapsulation +failed, +(?P<ip_drop_unresolved>\d+) +unresolved, +(?P<ip_drop_no_adj>\d+) +no +adjacency$",
        )?,
        counters(
            "ip_drop_route",
            "ip",
            r"^(?P<ip_drop_no_route>\d+) +no +route, +(?P<ip_drop_unicast_rpf>\d+) +unicast +RPF, +(?P<ip_drop_forced_drop>\d+) +forced +drop(, +(?P<ip_drop_unsupp_address>\d+) +unsupported-addr)?$",
        )?,
        counters(
            "ip_drop_options",
            "ip",
            r"^(?P<ip_drop_opts_denied>\d+) +options +denied(, +(?P<ip_drop_src_ip>\d+) +source +IP +address +zero)?$",
        )?,
        // ICMP
        heading("icmp", r"^ICMP +statistics:")?,
        counters(
            "icmp_rcvd",
            "icmp",
            r"^Rcvd: +(?P<icmp_received_format_errors>\d+) +format +errors, +(?P<icmp_received_checksum_errors>\d+) +checksum +errors, +(?P<icmp_received_redirects>\d+) +redirects, +(?P<icmp_received_unreachable>\d+) +unreachable$",
        )?
        .enter("direction", "rcvd"),
        counters(
            "icmp_rcvd_echo",
            "icmp",
            r"^(?P<icmp_received_echo>\d+) +echo, +(?P<icmp_received_echo_reply>\d+) +echo +reply, +(?P<icmp_received_mask_requests>\d+) +mask +requests, +(?P<icmp_received_mask_replies>\d+) +mask +replies, +(?P<icmp_received_quench>\d+) +quench$",
        )?
        .when(Guard::mode_is("direction", "rcvd")),
        counters(
            "icmp_rcvd_parameter",
            "icmp",
            r"^(?P<icmp_received_parameter>\d+) +parameter, +(?P<icmp_received_timestamp>\d+) +timestamp(, +(?P<icmp_received_timestamp_replies>\d+) +timestamp +replies)?, +(?P<icmp_received_info_request>\d+) +info +request, +(?P<icmp_received_other>\d+) +other$",
        )?
        .when(Guard::mode_is("direction", "rcvd")),
        counters(
            "icmp_rcvd_irdp",
            "icmp",
            r"^(?P<icmp_received_irdp_solicitations>\d+) +irdp +solicitations, +(?P<icmp_received_irdp_advertisements>\d+) +irdp +advertisements$",
        )?
        .when(Guard::mode_is("direction", "rcvd")),
        counters(
            "icmp_rcvd_time_exceeded",
            "icmp",
            r"^(?P<icmp_received_time_exceeded>\d+) +time +exceeded, +(?P<icmp_received_info_replies>\d+) +info +replies$",
        )?
        .when(Guard::mode_is("direction", "rcvd")),
        counters(
            "icmp_sent",
            "icmp",
            r"^Sent: +(?P<icmp_sent_redirects>\d+) +redirects, +(?P<icmp_sent_unreachable>\d+) +unreachable, +(?P<icmp_sent_echo>\d+) +echo, +(?P<icmp_sent_echo_reply>\d+) +echo +reply$",
        )?
        .enter("direction", "sent"),
        counters(
            "icmp_sent_mask",
            "icmp",
            r"^(?P<icmp_sent_mask_requests>\d+) +mask +requests, +(?P<icmp_sent_mask_replies>\d+) +mask +replies, +(?P<icmp_sent_quench>\d+) +quench, +(?P<icmp_sent_timestamp>\d+) +timestamp(, +(?P<icmp_sent_timestamp_replies>\d+) +timestamp +replies)?$",
        )?
        .when(Guard::mode_is("direction", "sent")),
        counters(
            "icmp_sent_info",
            "icmp",
            r"^(?P<icmp_sent_info_reply>\d+) +info +reply, +(?P<icmp_sent_time_exceeded>\d+) +time +exceeded, +(?P<icmp_sent_parameter_problem>\d+) +parameter +problem$",
        )?
        .when(Guard::mode_is("direction", "sent")),
        counters(
            "icmp_sent_irdp",
            "icmp",
            r"^(?P<icmp_sent_irdp_solicitations>\d+) +irdp +solicitations, +(?P<icmp_sent_irdp_advertisements>\d+) +irdp +advertisements$",
        )?
        .when(Guard::mode_is("direction", "sent")),
        // UDP
        heading("udp", r"^UDP +statistics:")?,
        counters(
            "udp_rcvd",
            "udp",
            r"^Rcvd: +(?P<udp_received_total>\d+) +total, +(?P<udp_received_udp_checksum_errors>\d+) +checksum +errors, +(?P<udp_received_no_port>\d+) +no +port( +(?P<udp_received_finput>\d+) +finput)?$",
        )?,
        counters(
            "udp_sent",
            "udp",
            r"^Sent: +(?P<udp_sent_total>\d+) +total, +(?P<udp_sent_fwd_broadcasts>\d+) +forwarded +broadcasts$",
        )?,
        // OSPF
        heading("ospf", r"^OSPF +statistics:")?,
        counters(
            "ospf_last_clearing",
            "ospf",
            r"^Last +clearing +of +OSPF +traffic +counters +(?P<ospf_traffic_cntrs_clear>\S+)$",
        )?
        .conversion(Conversion::Str),
        counters(
            "ospf_rcvd",
            "ospf",
            r"^Rcvd: +(?P<ospf_received_total>\d+) +total, +(?P<ospf_received_checksum_errors>\d+) +checksum +errors$",
        )?
        .enter("direction", "rcvd"),
        counters(
            "ospf_rcvd_hello",
            "ospf",
            r"^(?P<ospf_received_hello>\d+) +hello, +(?P<ospf_received_database_desc>\d+) +database +desc, +(?P<ospf_received_link_state_req>\d+) +link +state +req$",
        )?
        .when(Guard::mode_is("direction", "rcvd")),
        counters(
            "ospf_rcvd_lsu",
            "ospf",
            r"^(?P<ospf_received_lnk_st_updates>\d+) +link +state +updates, +(?P<ospf_received_lnk_st_acks>\d+) +link +state +acks$",
        )?
        .when(Guard::mode_is("direction", "rcvd")),
        counters("ospf_sent", "ospf", r"^Sent: +(?P<ospf_sent_total>\d+) +total$")?
            .enter("direction", "sent"),
        counters(
            "ospf_sent_hello",
            "ospf",
            r"^(?P<ospf_sent_hello>\d+) +hello, +(?P<ospf_sent_database_desc>\d+) +database +desc, +(?P<ospf_sent_link_state_req>\d+) +link +state +req$",
        )?
        .when(Guard::mode_is("direction", "sent")),
        counters(
            "ospf_sent_lsu",
            "ospf",
            r"^(?P<ospf_sent_lnk_st_updates>\d+) +link +state +updates, +(?P<ospf_sent_lnk_st_acks>\d+) +link +state +acks$",
        )?
        .when(Guard::mode_is("direction", "sent")),
        // PIMv2, counters are "sent/received" pairs kept as text
        heading("pimv2", r"^PIMv2 +statistics: +Sent/Received")?,
        counters(
            "pimv2_total",
            "pimv2",
            r"^Total: +(?P<pimv2_total>[\d/]+), +(?P<pimv2_checksum_errors>\d+) +checksum +errors, +(?P<pimv2_format_errors>\d+) +format +errors$",
        )?
        .convert("pimv2_total", Conversion::Str),
        counters(
            "pimv2_registers",
            "pimv2",
            r"^Registers: +(?P<pimv2_registers>[\d/]+) +\((?P<pimv2_non_rp>\d+) +non-rp, +(?P<pimv2_non_sm_group>\d+) +non-sm-group\), +Register +Stops: +(?P<pimv2_registers_stops>[\d/]+), +Hellos: +(?P<pimv2_hellos>[\d/]+)$",
        )?
        .convert("pimv2_registers", Conversion::Str)
        .convert("pimv2_registers_stops", Conversion::Str)
        .convert("pimv2_hellos", Conversion::Str),
        counters(
            "pimv2_join_prunes",
            "pimv2",
            r"^Join/Prunes: +(?P<pimv2_join_prunes>[\d/]+), +Asserts: +(?P<pimv2_asserts>[\d/]+), +grafts: +(?P<pimv2_grafts>[\d/]+)$",
        )?
        .conversion(Conversion::Str),
        counters(
            "pimv2_bootstraps",
            "pimv2",
            r"^Bootstraps: +(?P<pimv2_bootstraps>[\d/]+), +Candidate_RP_Advertisements: +(?P<pimv2_candidate_rp_advs>[\d/]+)$",
        )?
        .conversion(Conversion::Str),
        counters(
            "pimv2_queue_drops",
            "pimv2",
            r"^Queue +drops: +(?P<pimv2_queue_drops>\d+)$",
        )?,
        counters(
            "pimv2_state_refresh",
            "pimv2",
            r"^State-Refresh: +(?P<pimv2_state_refresh>[\d/]+)$",
        )?
        .conversion(Conversion::Str),
        // IGMP
        heading("igmp", r"^IGMP +statistics: +Sent/Received")?,
        counters(
            "igmp_total",
            "igmp",
            r"^Total: +(?P<igmp_total>[\d/]+), +Format +errors: +(?P<igmp_format_errors>[\d/]+), +Checksum +errors: +(?P<igmp_checksum_errors>[\d/]+)$",
        )?
        .conversion(Conversion::Str),
        counters(
            "igmp_host",
            "igmp",
            r"^Host +Queries: +(?P<igmp_host_queries>[\d/]+), +Host +Reports: +(?P<igmp_host_reports>[\d/]+), +Host +Leaves: +(?P<igmp_host_leaves>[\d/]+)$",
        )?
        .conversion(Conversion::Str),
        counters(
            "igmp_dvmrp",
            "igmp",
            r"^DVMRP: +(?P<igmp_dvmrp>[\d/]+), +PIM: +(?P<igmp_pim>[\d/]+)$",
        )?
        .conversion(Conversion::Str),
        counters(
            "igmp_queue_drops",
            "igmp",
            r"^Queue +drops: +(?P<igmp_queue_drops>\d+)$",
        )?,
        // TCP
        heading("tcp", r"^TCP +statistics:")?,
        counters(
            "tcp_rcvd",
            "tcp",
            r"^Rcvd: +(?P<tcp_received_total>\d+) +total, +(?P<tcp_received_checksum_errors>\d+) +checksum +errors, +(?P<tcp_received_no_port>\d+) +no +port$",
        )?,
        counters("tcp_sent", "tcp", r"^Sent: +(?P<tcp_sent_total>\d+) +total$")?,
        // EIGRP, older releases print the heading as IP-EIGRP
        heading("eigrp_ipv4", r"^(EIGRP-IPv4|IP-EIGRP) +statistics:")?,
        counters(
            "eigrp_rcvd",
            "eigrp_ipv4",
            r"^Rcvd: +(?P<eigrp_ipv4_received_total>\d+) +total$",
        )?,
        counters(
            "eigrp_sent",
            "eigrp_ipv4",
            r"^Sent: +(?P<eigrp_ipv4_sent_total>\d+) +total$",
        )?,
        // BGP
        heading("bgp", r"^BGP +statistics:")?,
        counters(
            "bgp_rcvd",
            "bgp",
            r"^Rcvd: +(?P<bgp_received_total>\d+) +total, +(?P<bgp_received_opens>\d+) +opens, +(?P<bgp_received_notifications>\d+) +notifications, +(?P<bgp_received_updates>\d+) +updates$",
        )?
        .enter("direction", "rcvd"),
        counters(
            "bgp_rcvd_keepalives",
            "bgp",
            r"^(?P<bgp_received_keepalives>\d+) +keepalives, +(?P<bgp_received_route_refresh>\d+) +route-refresh, +(?P<bgp_received_unrecognized>\d+) +unrecognized$",
        )?
        .when(Guard::mode_is("direction", "rcvd")),
        counters(
            "bgp_sent",
            "bgp",
            r"^Sent: +(?P<bgp_sent_total>\d+) +total, +(?P<bgp_sent_opens>\d+) +opens, +(?P<bgp_sent_notifications>\d+) +notifications, +(?P<bgp_sent_updates>\d+) +updates$",
        )?
        .enter("direction", "sent"),
        counters(
            "bgp_sent_keepalives",
            "bgp",
            r"^(?P<bgp_sent_keepalives>\d+) +keepalives, +(?P<bgp_sent_route_refresh>\d+) +route-refresh$",
        )?
        .when(Guard::mode_is("direction", "sent")),
    ])
}

fn schema() -> Schema {
    let int = Schema::int;
    let str = Schema::str;

    let arp = Schema::fixed()
        .required_all(
            &[
                "arp_in_requests",
                "arp_in_replies",
                "arp_in_reverse",
                "arp_in_other",
                "arp_out_requests",
                "arp_out_replies",
            ],
            int(),
        )
        .required("arp_out_proxy", Schema::any_of([LeafType::Int, LeafType::Str]))
        .required("arp_out_reverse", int())
        .optional("arp_drops_input_full", int());

    let ip = Schema::fixed()
        .required_all(
            &[
                "ip_rcvd_total",
                "ip_rcvd_local_destination",
                "ip_rcvd_format_errors",
                "ip_rcvd_checksum_errors",
                "ip_rcvd_bad_hop",
                "ip_rcvd_unknwn_protocol",
                "ip_rcvd_not_gateway",
                "ip_rcvd_sec_failures",
                "ip_rcvd_bad_optns",
                "ip_rcvd_with_optns",
                "ip_opts_end",
                "ip_opts_nop",
                "ip_opts_basic_security",
                "ip_opts_loose_src_route",
                "ip_opts_timestamp",
                "ip_opts_extended_security",
                "ip_opts_record_route",
                "ip_opts_strm_id",
                "ip_opts_strct_src_route",
                "ip_opts_alert",
                "ip_opts_cipso",
                "ip_opts_ump",
                "ip_opts_other",
                "ip_frags_reassembled",
                "ip_frags_timeouts",
                "ip_frags_no_reassembled",
                "ip_frags_fragmented",
                "ip_frags_no_fragmented",
                "ip_bcast_received",
                "ip_bcast_sent",
                "ip_mcast_received",
                "ip_mcast_sent",
                "ip_sent_generated",
                "ip_sent_forwarded",
                "ip_drop_encap_failed",
                "ip_drop_unresolved",
                "ip_drop_no_adj",
                "ip_drop_no_route",
                "ip_drop_unicast_rpf",
                "ip_drop_forced_drop",
                "ip_drop_opts_denied",
            ],
            int(),
        )
        .optional_all(
            &[
                "ip_opts_ignored",
                "ip_frags_fragments",
                "ip_frags_invalid_hole",
                "ip_drop_unsupp_address",
                "ip_drop_src_ip",
            ],
            int(),
        );

    let icmp = Schema::fixed()
        .required_all(
            &[
                "icmp_received_format_errors",
                "icmp_received_checksum_errors",
                "icmp_received_redirects",
                "icmp_received_unreachable",
                "icmp_received_echo",
                "icmp_received_echo_reply",
                "icmp_received_mask_requests",
                "icmp_received_mask_replies",
                "icmp_received_quench",
                "icmp_received_parameter",
                "icmp_received_timestamp",
                "icmp_received_info_request",
                "icmp_received_other",
                "icmp_received_irdp_solicitations",
                "icmp_received_irdp_advertisements",
                "icmp_sent_redirects",
                "icmp_sent_unreachable",
                "icmp_sent_echo",
                "icmp_sent_echo_reply",
                "icmp_sent_mask_requests",
                "icmp_sent_mask_replies",
                "icmp_sent_quench",
                "icmp_sent_timestamp",
                "icmp_sent_parameter_problem",
                "icmp_sent_irdp_solicitations",
                "icmp_sent_irdp_advertisements",
            ],
            int(),
        )
        .optional_all(
            &[
                "icmp_received_timestamp_replies",
                "icmp_received_time_exceeded",
                "icmp_received_info_replies",
                "icmp_sent_timestamp_replies",
                "icmp_sent_info_reply",
                "icmp_sent_time_exceeded",
            ],
            int(),
        );

    let udp = Schema::fixed()
        .required_all(
            &[
                "udp_received_total",
                "udp_received_udp_checksum_errors",
                "udp_received_no_port",
                "udp_sent_total",
                "udp_sent_fwd_broadcasts",
            ],
            int(),
        )
        .optional("udp_received_finput", int());

    let ospf = Schema::fixed()
        .optional("ospf_traffic_cntrs_clear", str())
        .required_all(
            &[
                "ospf_received_total",
                "ospf_received_checksum_errors",
                "ospf_received_hello",
                "ospf_received_database_desc",
                "ospf_received_link_state_req",
                "ospf_received_lnk_st_updates",
                "ospf_received_lnk_st_acks",
                "ospf_sent_total",
                "ospf_sent_hello",
                "ospf_sent_database_desc",
                "ospf_sent_link_state_req",
                "ospf_sent_lnk_st_updates",
                "ospf_sent_lnk_st_acks",
            ],
            int(),
        );

    let pimv2 = Schema::fixed()
        .required("pimv2_total", str())
        .required_all(&["pimv2_checksum_errors", "pimv2_format_errors"], int())
        .required("pimv2_registers", str())
        .required_all(&["pimv2_non_rp", "pimv2_non_sm_group"], int())
        .required_all(
            &[
                "pimv2_registers_stops",
                "pimv2_hellos",
                "pimv2_join_prunes",
                "pimv2_asserts",
                "pimv2_grafts",
                "pimv2_bootstraps",
                "pimv2_candidate_rp_advs",
            ],
            str(),
        )
        .optional("pimv2_queue_drops", int())
        .required("pimv2_state_refresh", str());

    let igmp = Schema::fixed()
        .required_all(
            &[
                "igmp_total",
                "igmp_format_errors",
                "igmp_checksum_errors",
                "igmp_host_queries",
                "igmp_host_reports",
                "igmp_host_leaves",
                "igmp_dvmrp",
                "igmp_pim",
            ],
            str(),
        )
        .optional("igmp_queue_drops", int());

    let tcp = Schema::fixed().required_all(
        &[
            "tcp_received_total",
            "tcp_received_checksum_errors",
            "tcp_received_no_port",
            "tcp_sent_total",
        ],
        int(),
    );

    let eigrp = Schema::fixed().required_all(
        &["eigrp_ipv4_received_total", "eigrp_ipv4_sent_total"],
        int(),
    );

    let bgp = Schema::fixed().required_all(
        &[
            "bgp_received_total",
            "bgp_received_opens",
            "bgp_received_notifications",
            "bgp_received_updates",
            "bgp_received_keepalives",
            "bgp_received_route_refresh",
            "bgp_received_unrecognized",
            "bgp_sent_total",
            "bgp_sent_opens",
            "bgp_sent_notifications",
            "bgp_sent_updates",
            "bgp_sent_keepalives",
            "bgp_sent_route_refresh",
        ],
        int(),
    );

    Schema::fixed()
        .required("arp_statistics", arp)
        .required("ip_statistics", ip)
        .required("icmp_statistics", icmp)
        .required("udp_statistics", udp)
        .required("ospf_statistics", ospf)
        .required("pimv2_statistics", pimv2)
        .required("igmp_statistics", igmp)
        .required("tcp_statistics", tcp)
        .required("eigrp_ipv4_statistics", eigrp)
        .optional("bgp_statistics", bgp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::schema::ViolationKind;
    use crate::value::{MapExt, Value};

    const OUTPUT: &str = "\
IP statistics:
  Rcvd:  17780 total, 110596 local destination
         0 format errors, 0 checksum errors, 0 bad hop count
         0 unknown protocol, 5 not a gateway
         0 security failures, 0 bad options, 12717 with options
  Opts:  0 end, 0 nop, 0 basic security, 0 loose source route
         0 timestamp, 0 extended security, 0 record route
         0 stream ID, 0 strict source route, 12717 alert, 0 cipso, 0 ump
         0 other, 0 ignored
  Frags: 0 reassembled, 0 timeouts, 0 couldn't reassemble
         1 fragmented, 5 fragments, 0 couldn't fragment
         0 invalid hole
  Bcast: 33324 received, 5 sent
  Mcast: 144833 received, 66274 sent
  Sent:  85543 generated, 1654728 forwarded
  Drop:  8 encapsulation failed, 0 unresolved, 20 no adjacency
         19 no route, 0 unicast RPF, 0 forced drop, 0 unsupported-addr
         0 options denied, 0 source IP address zero

ICMP statistics:
  Rcvd: 0 format errors, 0 checksum errors, 0 redirects, 0 unreachable
        284 echo, 9 echo reply, 0 mask requests, 0 mask replies, 0 quench
        0 parameter, 0 timestamp, 0 timestamp replies, 0 info request, 0 other
        3 irdp solicitations, 4 irdp advertisements
        0 time exceeded, 0 info replies
  Sent: 0 redirects, 14 unreachable, 9 echo, 134 echo reply
        0 mask requests, 0 mask replies, 0 quench, 0 timestamp, 0 timestamp replies
        0 info reply, 0 time exceeded, 0 parameter problem
        1 irdp solicitations, 2 irdp advertisements

UDP statistics:
  Rcvd: 62515 total, 0 checksum errors, 15906 no port 0 finput
  Sent: 41486 total, 0 forwarded broadcasts

OSPF statistics:
  Last clearing of OSPF traffic counters never
  Rcvd: 16222 total, 0 checksum errors
        15153 hello, 20 database desc, 2 link state req
        359 link state updates, 688 link state acks
  Sent: 9456 total
        8887 hello, 30 database desc, 8 link state req
        299 link state updates, 239 link state acks

PIMv2 statistics: Sent/Received
  Total: 7458/8859, 0 checksum errors, 0 format errors
  Registers: 1/1 (0 non-rp, 0 non-sm-group), Register Stops: 1/1,  Hellos: 5011/5008
  Join/Prunes: 5/712, Asserts: 0/697, grafts: 0/2
  Bootstraps: 2088/2438, Candidate_RP_Advertisements: 350/0
  Queue drops: 0
  State-Refresh: 0/0

IGMP statistics: Sent/Received
  Total: 2832/4946, Format errors: 0/0, Checksum errors: 0/0
  Host Queries: 2475/1414, Host Reports: 357/3525, Host Leaves: 0/5
  DVMRP: 0/0, PIM: 0/0
  Queue drops: 7

TCP statistics:
  Rcvd: 15396 total, 0 checksum errors, 0 no port
  Sent: 19552 total

EIGRP-IPv4 statistics:
  Rcvd: 4612 total
  Sent: 4611 total

BGP statistics:
  Rcvd: 2185 total, 6 opens, 0 notifications, 12 updates
        2167 keepalives, 0 route-refresh, 0 unrecognized
  Sent: 2304 total, 6 opens, 2 notifications, 0 updates
        2296 keepalives, 0 route-refresh

ARP statistics:
  Rcvd: 2020 requests, 764 replies, 0 reverse, 0 other
  Sent: 29 requests, 126 replies (2 proxy), 0 reverse
  Drop due to input queue full: 0
";

    fn get(result: &crate::value::Map, section: &str, field: &str) -> Option<Value> {
        result.lookup(&[section, field]).cloned()
    }

    #[test]
    fn test_parse_full_output() {
        let result = show_ip_traffic().unwrap().parse(OUTPUT).unwrap();

        assert_eq!(get(&result, "ip_statistics", "ip_rcvd_total"), Some(Value::Int(17780)));
        assert_eq!(get(&result, "ip_statistics", "ip_frags_fragments"), Some(Value::Int(5)));
        assert_eq!(get(&result, "ip_statistics", "ip_drop_no_route"), Some(Value::Int(19)));
        assert_eq!(get(&result, "udp_statistics", "udp_received_finput"), Some(Value::Int(0)));
        assert_eq!(get(&result, "tcp_statistics", "tcp_sent_total"), Some(Value::Int(19552)));
        assert_eq!(
            get(&result, "eigrp_ipv4_statistics", "eigrp_ipv4_sent_total"),
            Some(Value::Int(4611))
        );
        assert_eq!(get(&result, "arp_statistics", "arp_out_proxy"), Some(Value::Int(2)));
        assert_eq!(
            get(&result, "ospf_statistics", "ospf_traffic_cntrs_clear"),
            Some(Value::from("never"))
        );
        assert_eq!(
            get(&result, "pimv2_statistics", "pimv2_hellos"),
            Some(Value::from("5011/5008"))
        );
    }

    #[test]
    fn test_rcvd_and_sent_are_routed_apart() {
        let result = show_ip_traffic().unwrap().parse(OUTPUT).unwrap();

        let icmp = |f: &str| get(&result, "icmp_statistics", f);
        assert_eq!(icmp("icmp_received_irdp_solicitations"), Some(Value::Int(3)));
        assert_eq!(icmp("icmp_received_irdp_advertisements"), Some(Value::Int(4)));
        assert_eq!(icmp("icmp_sent_irdp_solicitations"), Some(Value::Int(1)));
        assert_eq!(icmp("icmp_sent_irdp_advertisements"), Some(Value::Int(2)));

        let ospf = |f: &str| get(&result, "ospf_statistics", f);
        assert_eq!(ospf("ospf_received_lnk_st_acks"), Some(Value::Int(688)));
        assert_eq!(ospf("ospf_sent_lnk_st_acks"), Some(Value::Int(239)));
        assert_eq!(ospf("ospf_sent_link_state_req"), Some(Value::Int(8)));
        assert_eq!(ospf("ospf_sent_total"), Some(Value::Int(9456)));

        let bgp = |f: &str| get(&result, "bgp_statistics", f);
        assert_eq!(bgp("bgp_received_keepalives"), Some(Value::Int(2167)));
        assert_eq!(bgp("bgp_sent_keepalives"), Some(Value::Int(2296)));
    }

    #[test]
    fn test_queue_drops_follow_section() {
        let result = show_ip_traffic().unwrap().parse(OUTPUT).unwrap();
        assert_eq!(get(&result, "pimv2_statistics", "pimv2_queue_drops"), Some(Value::Int(0)));
        assert_eq!(get(&result, "igmp_statistics", "igmp_queue_drops"), Some(Value::Int(7)));
    }

    #[test]
    fn test_ungated_line_is_ignored() {
        let extractor = show_ip_traffic().unwrap();

        // Same shape as the irdp counters, but no Rcvd/Sent heading yet
        let result = extractor
            .scan("ICMP statistics:\n  0 irdp solicitations, 0 irdp advertisements\n")
            .unwrap();
        assert_eq!(
            result["icmp_statistics"].as_map().map(|m| m.len()),
            Some(0)
        );

        // And with no section at all nothing is written
        let result = extractor
            .scan("  0 irdp solicitations, 0 irdp advertisements\n")
            .unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_sent_total_per_section() {
        let extractor = show_ip_traffic().unwrap();
        let result = extractor
            .scan("TCP statistics:\n  Sent: 10 total\nEIGRP-IPv4 statistics:\n  Sent: 20 total\n")
            .unwrap();
        assert_eq!(get(&result, "tcp_statistics", "tcp_sent_total"), Some(Value::Int(10)));
        assert_eq!(
            get(&result, "eigrp_ipv4_statistics", "eigrp_ipv4_sent_total"),
            Some(Value::Int(20))
        );
        assert!(result.lookup(&["ospf_statistics"]).is_none());
    }

    #[test]
    fn test_legacy_eigrp_heading() {
        let result = show_ip_traffic()
            .unwrap()
            .scan("IP-EIGRP statistics:\n  Rcvd: 1 total\n  Sent: 2 total\n")
            .unwrap();
        assert_eq!(
            get(&result, "eigrp_ipv4_statistics", "eigrp_ipv4_received_total"),
            Some(Value::Int(1))
        );
    }

    #[test]
    fn test_textual_proxy_count() {
        let result = show_ip_traffic()
            .unwrap()
            .scan("ARP statistics:\n  Sent: 29 requests, 126 replies (none proxy), 0 reverse\n")
            .unwrap();
        assert_eq!(
            get(&result, "arp_statistics", "arp_out_proxy"),
            Some(Value::from("none"))
        );
    }

    #[test]
    fn test_missing_section_fails_validation() {
        let text = OUTPUT.replace("TCP statistics:", "TCP-ish statistics:");
        let err = show_ip_traffic().unwrap().parse(&text).unwrap_err();
        match err {
            Error::Validation(e) => {
                assert_eq!(e.kind, ViolationKind::MissingKey);
                assert_eq!(e.path.to_string(), "/tcp_statistics");
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_strip_volatile() {
        let extractor = show_ip_traffic().unwrap();
        let result = extractor.parse(OUTPUT).unwrap();
        let stripped = extractor.strip_volatile(&result);

        assert!(stripped.lookup(&["tcp_statistics", "tcp_sent_total"]).is_none());
        assert!(stripped.lookup(&["tcp_statistics", "tcp_received_checksum_errors"]).is_some());
    }
}
