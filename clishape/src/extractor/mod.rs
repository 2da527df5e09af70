//! Extractor definitions and dispatch.
//!
//! An [`Extractor`] bundles the command templates, rule list and schema for
//! one command family. Extractors are looked up by name or by concrete
//! command in the [`ExtractorRegistry`], and get their input either from the
//! caller or from an [`Executor`].

mod definition;
mod executor;
mod registry;
mod session;
mod template;

pub use definition::Extractor;
pub use executor::{Executor, ReplayError, ReplayExecutor};
pub use registry::ExtractorRegistry;
pub use session::ParseSession;
pub use template::{CommandTemplate, Params};
