//! Cisco IOS-XR extractors.

mod mapping_server;
mod pce;
mod pce_lsp;
mod pce_topology;
mod prefix_sid_map;
mod srv6;
mod traffic_eng;

pub use mapping_server::{
    show_segment_routing_local_block_inconsistencies,
    show_segment_routing_mapping_server_prefix_sid_map_ipv4,
    show_segment_routing_mapping_server_prefix_sid_map_ipv4_detail,
};
pub use pce::{show_pce_ipv4_peer, show_pce_ipv4_peer_detail};
pub use pce_lsp::{show_pce_lsp, show_pce_lsp_detail};
pub use pce_topology::{show_pce_ipv4_prefix, show_pce_ipv4_topology_summary};
pub use prefix_sid_map::{
    show_isis_segment_routing_prefix_sid_map, show_ospf_segment_routing_prefix_sid_map,
};
pub use srv6::{show_segment_routing_srv6_locator, show_segment_routing_srv6_sid};
pub use traffic_eng::{
    show_segment_routing_traffic_eng_pcc_lsp,
    show_segment_routing_traffic_eng_policy_color_endpoint,
};

use crate::error::ExtractorError;
use crate::extractor::Extractor;

/// All IOS-XR extractors, in registration order.
pub fn extractors() -> Result<Vec<Extractor>, ExtractorError> {
    Ok(vec![
        show_isis_segment_routing_prefix_sid_map()?,
        show_ospf_segment_routing_prefix_sid_map()?,
        show_segment_routing_local_block_inconsistencies()?,
        show_segment_routing_mapping_server_prefix_sid_map_ipv4()?,
        show_segment_routing_mapping_server_prefix_sid_map_ipv4_detail()?,
        show_pce_ipv4_peer()?,
        show_pce_ipv4_peer_detail()?,
        show_pce_ipv4_prefix()?,
        show_pce_ipv4_topology_summary()?,
        show_pce_lsp()?,
        show_pce_lsp_detail()?,
        show_segment_routing_srv6_sid()?,
        show_segment_routing_srv6_locator()?,
        show_segment_routing_traffic_eng_pcc_lsp()?,
        show_segment_routing_traffic_eng_policy_color_endpoint()?,
    ])
}
