//! Process-creation context handed to worker-creating code.

use super::{Decision, Reason, StartMethod};
use std::process::Command;

/// The committed start method together with the configuration children must
/// inherit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerContext {
    key: String,
    decision: Decision,
    exported: Option<String>,
}

impl WorkerContext {
    pub(crate) fn new(key: String, decision: Decision, exported: Option<String>) -> Self {
        let exported = exported.filter(|v| !v.trim().is_empty());
        Self {
            key,
            decision,
            exported,
        }
    }

    /// Start method workers must be created with.
    pub fn method(&self) -> StartMethod {
        self.decision.method
    }

    /// Why the start method was chosen.
    pub fn reason(&self) -> &Reason {
        &self.decision.reason
    }

    /// Whether workers may be forked.
    pub fn allows_fork(&self) -> bool {
        self.decision.method == StartMethod::Fork
    }

    /// Configuration entry children must see, if the process-wide key is set.
    ///
    /// An auto-detected `fork` is never exported: a child receiving an
    /// explicit value would skip its own safety checks.
    pub fn env_pair(&self) -> Option<(&str, &str)> {
        self.exported
            .as_deref()
            .map(|value| (self.key.as_str(), value))
    }

    /// Export the committed configuration to a child command.
    pub fn apply_to<'a>(&self, command: &'a mut Command) -> &'a mut Command {
        match self.env_pair() {
            Some((key, value)) => command.env(key, value),
            None => command,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;

    fn exported_value(command: &Command, key: &str) -> Option<String> {
        command
            .get_envs()
            .find(|(k, _)| *k == OsStr::new(key))
            .and_then(|(_, v)| v)
            .map(|v| v.to_string_lossy().into_owned())
    }

    #[test]
    fn test_apply_to_sets_child_env() {
        let context = WorkerContext::new(
            "WORKER_MP_START_METHOD".to_string(),
            Decision {
                method: StartMethod::Spawn,
                reason: Reason::IncompatibleKernelLayer,
            },
            Some("spawn".to_string()),
        );
        let mut command = Command::new("worker");
        context.apply_to(&mut command);

        assert_eq!(
            exported_value(&command, "WORKER_MP_START_METHOD").as_deref(),
            Some("spawn")
        );
        assert!(!context.allows_fork());
    }

    #[test]
    fn test_auto_fork_is_not_exported() {
        let context = WorkerContext::new(
            "WORKER_MP_START_METHOD".to_string(),
            Decision {
                method: StartMethod::Fork,
                reason: Reason::Default,
            },
            Some("  ".to_string()),
        );
        let mut command = Command::new("worker");
        context.apply_to(&mut command);

        assert_eq!(context.env_pair(), None);
        assert_eq!(exported_value(&command, "WORKER_MP_START_METHOD"), None);
        assert!(context.allows_fork());
        assert_eq!(context.reason(), &Reason::Default);
    }
}
