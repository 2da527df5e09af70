//! # Clishape
//!
//! Schema-checked line-rule scanner for network device CLI output.
//!
//! Clishape turns the human-oriented text a router or switch prints for a
//! `show` command into a nested, schema-validated structure, similar to
//! Python's genie parsers and TextFSM templates.
//!
//! ## Features
//!
//! - Ordered line rules with named captures and typed conversion
//! - Scan context (modes) for output whose meaning depends on earlier lines
//! - Declarative schemas with deterministic, path-reporting validation
//! - Command templates with placeholder rendering and matching
//! - Built-in extractors for Cisco IOS-XE and IOS-XR
//! - Pluggable async executor for acquiring output from a live device
//!
//! ## Quick Start
//!
//! ```rust
//! use clishape::extractor::{ParseSession, ReplayExecutor};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), clishape::Error> {
//!     let executor = ReplayExecutor::new().with_output(
//!         "show ip arp summary",
//!         "40 IP ARP entries, with 0 of them incomplete",
//!     );
//!
//!     let mut session = ParseSession::new(executor);
//!     let result = session.parse("show ip arp summary").await?;
//!     println!("{:?}", result);
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod extractor;
pub mod extractors;
pub mod scanner;
pub mod schema;
pub mod value;

// Re-export main types for convenience
pub use error::{Error, Result};
pub use extractor::{Executor, Extractor, ExtractorRegistry, Params, ParseSession};
pub use scanner::{Guard, Rule, ScanContext};
pub use schema::Schema;
pub use value::{Map, MapExt, Value};
