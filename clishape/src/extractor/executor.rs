//! The acquisition seam: whatever turns a command into its text output.

use std::future::Future;

use indexmap::IndexMap;
use log::debug;
use thiserror::Error;

use crate::error::{Error, Result};

/// Produces the raw output of a command.
///
/// Implemented by whatever talks to the device (an SSH driver, a console
/// server, a recorded session). The core never retries and sets no timeouts;
/// failures are wrapped in [`Error::Acquisition`] with the executor's error
/// kept as the source.
pub trait Executor: Send {
    /// Error type of the underlying transport.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Run a command and return its output.
    fn execute(
        &mut self,
        command: &str,
    ) -> impl Future<Output = std::result::Result<String, Self::Error>> + Send;
}

/// Run a command through an executor, wrapping any failure.
pub(crate) async fn acquire<E: Executor>(executor: &mut E, command: &str) -> Result<String> {
    debug!("Executing '{}'", command);
    let output = executor
        .execute(command)
        .await
        .map_err(|e| Error::Acquisition {
            command: command.to_string(),
            source: Box::new(e),
        })?;
    debug!("Received {} bytes for '{}'", output.len(), command);
    Ok(output)
}

/// Errors returned by [`ReplayExecutor`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReplayError {
    /// No output was recorded for this command
    #[error("No recorded output for command '{command}'")]
    UnknownCommand { command: String },
}

/// An executor that answers from recorded command output.
///
/// Commands are looked up with surrounding whitespace trimmed and inner runs
/// of whitespace collapsed, so `show  ip arp` finds a recording of
/// `show ip arp`.
///
/// ```
/// use clishape::extractor::{Executor, ReplayExecutor};
///
/// # tokio_test::block_on(async {
/// let mut executor = ReplayExecutor::new()
///     .with_output("show ip arp summary", "40 IP ARP entries, with 0 of them incomplete");
///
/// let output = executor.execute("show ip arp summary").await.unwrap();
/// assert!(output.starts_with("40 IP ARP"));
/// assert_eq!(executor.history(), ["show ip arp summary"]);
/// # });
/// ```
#[derive(Debug, Clone, Default)]
pub struct ReplayExecutor {
    recorded: IndexMap<String, String>,
    history: Vec<String>,
}

impl ReplayExecutor {
    /// Create an executor with no recordings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a recording.
    pub fn with_output(mut self, command: &str, output: impl Into<String>) -> Self {
        self.record(command, output);
        self
    }

    /// Add or replace a recording.
    pub fn record(&mut self, command: &str, output: impl Into<String>) {
        self.recorded.insert(normalize(command), output.into());
    }

    /// Commands executed so far, in order.
    pub fn history(&self) -> &[String] {
        &self.history
    }
}

impl Executor for ReplayExecutor {
    type Error = ReplayError;

    async fn execute(&mut self, command: &str) -> std::result::Result<String, ReplayError> {
        let command = normalize(command);
        let output = self
            .recorded
            .get(&command)
            .cloned()
            .ok_or_else(|| ReplayError::UnknownCommand {
                command: command.clone(),
            });
        self.history.push(command);
        output
    }
}

fn normalize(command: &str) -> String {
    command.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replay() {
        let mut executor = ReplayExecutor::new().with_output("show arp", "Internet 10.1.1.1 - aabb.cc00.0100 ARPA");

        let output = executor.execute("  show   arp ").await.unwrap();
        assert!(output.contains("aabb.cc00.0100"));
        assert_eq!(executor.history(), ["show arp"]);
    }

    #[tokio::test]
    async fn test_unknown_command() {
        let mut executor = ReplayExecutor::new();
        let err = executor.execute("show arp").await.unwrap_err();
        assert_eq!(
            err,
            ReplayError::UnknownCommand {
                command: "show arp".to_string()
            }
        );
        // Failed attempts are still recorded
        assert_eq!(executor.history().len(), 1);
    }

    #[tokio::test]
    async fn test_acquire_wraps_errors() {
        let mut executor = ReplayExecutor::new();
        let err = acquire(&mut executor, "show ip traffic").await.unwrap_err();

        match err {
            Error::Acquisition { command, source } => {
                assert_eq!(command, "show ip traffic");
                assert!(source.to_string().contains("show ip traffic"));
            }
            other => panic!("expected acquisition error, got {:?}", other),
        }
    }

    #[test]
    fn test_acquire_blocking() {
        let mut executor = ReplayExecutor::new().with_output("show adjacency summary", "5 complete adjacencies");
        let output = tokio_test::block_on(acquire(&mut executor, "show adjacency summary")).unwrap();
        assert_eq!(output, "5 complete adjacencies");
    }
}
