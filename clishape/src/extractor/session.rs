//! Command-string dispatch over an executor.

use std::sync::{Arc, PoisonError};

use log::debug;

use super::definition::Extractor;
use super::executor::{acquire, Executor};
use super::registry::ExtractorRegistry;
use super::template::Params;
use crate::error::Result;
use crate::value::Map;

/// Parses concrete commands with whichever registered extractor matches.
///
/// # Example
///
/// ```
/// use clishape::extractor::{ParseSession, ReplayExecutor};
///
/// # tokio_test::block_on(async {
/// let executor = ReplayExecutor::new().with_output(
///     "show ip arp summary",
///     "40 IP ARP entries, with 0 of them incomplete",
/// );
/// let mut session = ParseSession::new(executor);
///
/// let result = session.parse("show ip arp summary").await?;
/// assert_eq!(result["total_entries"].as_int(), Some(40));
/// # Ok::<(), clishape::Error>(())
/// # }).unwrap();
/// ```
#[derive(Debug)]
pub struct ParseSession<E: Executor> {
    executor: E,
}

impl<E: Executor> ParseSession<E> {
    /// Create a session over an executor, dispatching through the global
    /// registry.
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    /// Get the executor.
    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Get the executor mutably.
    pub fn executor_mut(&mut self) -> &mut E {
        &mut self.executor
    }

    /// Consume the session, returning the executor.
    pub fn into_inner(self) -> E {
        self.executor
    }

    /// Execute a command and parse its output.
    pub async fn parse(&mut self, command: &str) -> Result<Map> {
        let (extractor, _) = resolve(command)?;
        let output = acquire(&mut self.executor, command).await?;
        extractor.parse(&output)
    }

    /// Parse already captured output of a command.
    pub fn parse_output(&self, command: &str, output: &str) -> Result<Map> {
        let (extractor, _) = resolve(command)?;
        extractor.parse(output)
    }
}

fn resolve(command: &str) -> Result<(Arc<Extractor>, Params)> {
    let registry = ExtractorRegistry::global()
        .read()
        .unwrap_or_else(PoisonError::into_inner);
    let (extractor, params) = registry.lookup(command)?;
    debug!(
        "Dispatching '{}' to extractor '{}' with parameters [{}]",
        command, extractor.name, params
    );
    Ok((extractor, params))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, ExtractorError};
    use crate::extractor::ReplayExecutor;
    use crate::value::Value;

    const ARP_SUMMARY: &str = "40 IP ARP entries, with 0 of them incomplete";

    #[tokio::test]
    async fn test_parse_through_executor() {
        let _ = env_logger::builder().is_test(true).try_init();

        let executor = ReplayExecutor::new().with_output("show ip arp summary", ARP_SUMMARY);
        let mut session = ParseSession::new(executor);

        let result = session.parse("show ip arp summary").await.unwrap();
        assert_eq!(result["total_entries"], Value::Int(40));
        assert_eq!(session.executor().history(), ["show ip arp summary"]);
    }

    #[tokio::test]
    async fn test_unknown_command_never_reaches_executor() {
        let mut session = ParseSession::new(ReplayExecutor::new());

        let err = session.parse("show version").await.unwrap_err();
        assert!(matches!(
            err,
            Error::Extractor(ExtractorError::NoMatchingExtractor { .. })
        ));
        assert!(session.into_inner().history().is_empty());
    }

    #[tokio::test]
    async fn test_acquisition_failure() {
        let mut session = ParseSession::new(ReplayExecutor::new());
        let err = session.parse("show ip arp summary").await.unwrap_err();
        assert!(matches!(err, Error::Acquisition { .. }));
    }

    #[test]
    fn test_parse_output_offline() {
        let session = ParseSession::new(ReplayExecutor::new());
        let result = session
            .parse_output("show ip arp summary", ARP_SUMMARY)
            .unwrap();
        assert_eq!(result["incomp_entries"], Value::Int(0));
    }
}
