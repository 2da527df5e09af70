//! Built-in extractors, grouped by network operating system.
//!
//! Each extractor is a plain constructor returning an [`Extractor`], so a
//! caller can use one directly without going through the registry:
//!
//! ```
//! use clishape::extractors::iosxe;
//!
//! let extractor = iosxe::show_ip_arp_summary().unwrap();
//! let result = extractor
//!     .parse("40 IP ARP entries, with 0 of them incomplete")
//!     .unwrap();
//! assert_eq!(result["total_entries"].as_int(), Some(40));
//! ```

pub mod iosxe;
pub mod iosxr;

use crate::error::ExtractorError;
use crate::extractor::Extractor;

/// Every built-in extractor, in registration order.
pub fn builtin() -> Result<Vec<Extractor>, ExtractorError> {
    let mut extractors = iosxe::extractors()?;
    extractors.extend(iosxr::extractors()?);
    Ok(extractors)
}
