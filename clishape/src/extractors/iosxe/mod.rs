//! Cisco IOS-XE extractors.

mod adjacency;
mod arp;
mod arp_application;
mod arp_inspection;
mod ip_traffic;
mod summary;

pub use adjacency::show_adjacency_summary;
pub use arp::{show_arp, show_ip_arp};
pub use arp_application::show_arp_application;
pub use arp_inspection::{
    show_ip_arp_inspection_interfaces, show_ip_arp_inspection_log,
    show_ip_arp_inspection_statistics_vlan, show_ip_arp_inspection_vlan,
};
pub use ip_traffic::show_ip_traffic;
pub use summary::{show_arp_summary, show_ip_arp_summary};

use crate::error::ExtractorError;
use crate::extractor::Extractor;

/// All IOS-XE extractors, in registration order.
pub fn extractors() -> Result<Vec<Extractor>, ExtractorError> {
    Ok(vec![
        show_arp()?,
        show_ip_arp()?,
        show_ip_arp_summary()?,
        show_arp_summary()?,
        show_ip_traffic()?,
        show_arp_application()?,
        show_ip_arp_inspection_vlan()?,
        show_ip_arp_inspection_statistics_vlan()?,
        show_ip_arp_inspection_interfaces()?,
        show_ip_arp_inspection_log()?,
        show_adjacency_summary()?,
    ])
}
