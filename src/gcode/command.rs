//! The polymorphic contract every G-code handler satisfies.

use async_trait::async_trait;
use thiserror::Error;

use super::GCodeCommand;
use crate::planner::PlannerError;

/// Failure modes a command handler may report. Every variant names the
/// failing command so the dispatcher can log a useful diagnostic.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{command}: invalid parameter: {reason}")]
    InvalidParameter { command: String, reason: String },

    #[error("{command}: unsupported state: {reason}")]
    UnsupportedState { command: String, reason: String },

    #[error("{command}: path planner failure")]
    Downstream {
        command: String,
        #[source]
        source: PlannerError,
    },

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("{0}: command queue closed")]
    QueueClosed(String),
}

/// Uniform shape of a G-code handler. One implementor per command type,
/// registered with the dispatcher at startup and living for the process
/// lifetime; handlers hold a cloned [`crate::printer::Printer`] handle
/// rather than owning printer internals.
#[async_trait]
pub trait GCodeHandler: Send + Sync {
    /// Apply the command's effect against the shared printer. Handlers
    /// either complete their full mutation set or leave state untouched;
    /// errors propagate to the dispatcher unchanged.
    async fn execute(&self, cmd: &GCodeCommand) -> Result<(), CommandError>;

    /// One-line human-readable summary. Pure and stable, valid before the
    /// first `execute`.
    fn description(&self) -> &str;

    /// Whether the dispatcher must enqueue this command in order with
    /// queued motion (`true`) instead of running it immediately (`false`).
    /// Fixed per command type.
    fn is_buffered(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Describe;

    #[async_trait]
    impl GCodeHandler for Describe {
        async fn execute(&self, _cmd: &GCodeCommand) -> Result<(), CommandError> {
            Ok(())
        }

        fn description(&self) -> &str {
            "No-op command used to exercise the contract"
        }
    }

    #[tokio::test]
    async fn commands_default_to_immediate() {
        let handler = Describe;
        assert!(!handler.is_buffered());
        assert!(!handler.description().is_empty());
        handler.execute(&GCodeCommand::new("M0")).await.unwrap();
        assert!(!handler.is_buffered());
    }

    #[test]
    fn errors_name_the_failing_command() {
        let err = CommandError::UnsupportedState {
            command: "T2".to_string(),
            reason: "extruder 2 not configured".to_string(),
        };
        assert!(err.to_string().starts_with("T2:"));
    }
}
