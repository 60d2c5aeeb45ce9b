//! Process-wide start method configuration.

use super::selector::{Decision, parse_override, select};
use super::{StartMethod, WorkerContext};
use crate::constants::START_METHOD_ENV;
use crate::error::Result;
use crate::probe::ProbeRegistry;
use tracing::{info, warn};

/// Process-wide start method setting, created once at process entry and passed
/// to whatever builds worker process contexts.
///
/// The setting is a one-shot latch: once selection forces spawn, the forced
/// value is written back and every later call returns the same decision
/// without probing again. Deciding takes `&mut self`, so the decision is
/// committed before the configuration can be shared with worker-creating code.
#[derive(Debug, Clone)]
pub struct ProcessStartupConfig {
    key: String,
    value: Option<String>,
    probes: ProbeRegistry,
    forced: Option<Decision>,
}

impl ProcessStartupConfig {
    /// Create a configuration from an explicit initial value of `key`.
    pub fn new(key: impl Into<String>, value: Option<String>, probes: ProbeRegistry) -> Self {
        Self {
            key: key.into(),
            value,
            probes,
            forced: None,
        }
    }

    /// Snapshot [`START_METHOD_ENV`] from the process environment.
    pub fn from_env(probes: ProbeRegistry) -> Self {
        Self::from_env_with_key(START_METHOD_ENV, probes)
    }

    /// Snapshot `key` from the process environment.
    ///
    /// A value that is not valid UTF-8 is kept in lossy form, so it fails to
    /// parse and surfaces as [`crate::Error::InvalidOverride`] on first use.
    pub fn from_env_with_key(key: &str, probes: ProbeRegistry) -> Self {
        let value = std::env::var_os(key).map(|raw| match raw.into_string() {
            Ok(value) => value,
            Err(raw) => raw.to_string_lossy().into_owned(),
        });
        Self::new(key, value, probes)
    }

    /// Name of the configuration key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Current raw value of the configuration key.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Registered probes.
    pub fn probes(&self) -> &ProbeRegistry {
        &self.probes
    }

    /// Start method currently held by the configuration key, if any.
    pub fn start_method(&self) -> Result<Option<StartMethod>> {
        parse_override(&self.key, self.value.as_deref())
    }

    /// Decide the start method, forcing spawn into the configuration when
    /// forking is unsafe.
    ///
    /// Probe failures never surface here. The only error is an explicit but
    /// unrecognized configuration value.
    pub fn determine_method(&mut self) -> Result<Decision> {
        if let Some(decision) = &self.forced {
            return Ok(decision.clone());
        }

        let decision = select(&self.key, self.value.as_deref(), &self.probes)?;
        if decision.reason.forces_spawn() {
            warn!(
                "Forcing {} to '{}' because of {}. Workers will be spawned \
                 instead of forked; set {} explicitly to override.",
                self.key, decision.method, decision.reason, self.key
            );
            self.set(decision.method);
            self.forced = Some(decision.clone());
        } else {
            info!(
                "Worker start method: {} ({})",
                decision.method, decision.reason
            );
        }
        Ok(decision)
    }

    /// Decide the start method and build the context workers are created with.
    pub fn context(&mut self) -> Result<WorkerContext> {
        let decision = self.determine_method()?;
        Ok(WorkerContext::new(
            self.key.clone(),
            decision,
            self.value.clone(),
        ))
    }

    fn set(&mut self, method: StartMethod) {
        // Only reached when no explicit value was present
        self.value = Some(method.as_str().to_string());
    }
}

#[cfg(test)]
#[allow(unsafe_code)]
mod tests {
    use super::*;
    use crate::probe::{DriverProbe, HostProbes};
    use crate::start_method::Reason;
    use serial_test::serial;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_forced_spawn_is_written_back() {
        let probes = ProbeRegistry::new(HostProbes::fixed(false, false))
            .register(DriverProbe::custom("cuda", || Ok(true)));
        let mut startup = ProcessStartupConfig::new(START_METHOD_ENV, None, probes);

        let decision = startup.determine_method().ok();
        assert_eq!(decision.map(|d| d.method), Some(StartMethod::Spawn));
        assert_eq!(startup.value(), Some("spawn"));
        assert_eq!(startup.start_method().ok().flatten(), Some(StartMethod::Spawn));
    }

    #[test]
    fn test_default_fork_is_not_written_back() {
        let probes = ProbeRegistry::new(HostProbes::fixed(false, false));
        let mut startup =
            ProcessStartupConfig::new(START_METHOD_ENV, Some(String::new()), probes);

        let decision = startup.determine_method().ok();
        assert_eq!(decision.map(|d| d.method), Some(StartMethod::Fork));
        assert_eq!(startup.value(), Some(""));
    }

    #[test]
    fn test_forced_decision_is_latched() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let probes = ProbeRegistry::new(HostProbes::fixed(false, false)).register(
            DriverProbe::custom("cuda", move || {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(true)
            }),
        );
        let mut startup = ProcessStartupConfig::new(START_METHOD_ENV, None, probes);

        let first = startup.determine_method().ok();
        let second = startup.determine_method().ok();

        assert_eq!(first, second);
        assert_eq!(
            second.map(|d| d.reason),
            Some(Reason::DriverInitialized("cuda".to_string()))
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_context_exports_forced_value() {
        let probes = ProbeRegistry::new(HostProbes::fixed(true, false));
        let mut startup = ProcessStartupConfig::new("MY_START_METHOD", None, probes);

        let context = startup.context();
        assert!(context.is_ok());
        if let Ok(context) = context {
            assert_eq!(context.method(), StartMethod::Spawn);
            assert_eq!(context.env_pair(), Some(("MY_START_METHOD", "spawn")));
        }
    }

    #[test]
    #[serial]
    fn test_from_env_reads_key() {
        let key = "FORKGUARD_TEST_START_METHOD";
        unsafe {
            std::env::set_var(key, "forkserver");
        }
        let probes = ProbeRegistry::new(HostProbes::fixed(true, true));
        let mut startup = ProcessStartupConfig::from_env_with_key(key, probes);
        unsafe {
            std::env::remove_var(key);
        }

        let decision = startup.determine_method().ok();
        assert_eq!(
            decision.map(|d| (d.method, d.reason)),
            Some((StartMethod::ForkServer, Reason::ExplicitOverride))
        );
    }

    #[cfg(unix)]
    #[test]
    #[serial]
    fn test_from_env_non_utf8_value_is_invalid_override() {
        use crate::error::Error;
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let key = "FORKGUARD_TEST_START_METHOD";
        unsafe {
            std::env::set_var(key, OsStr::from_bytes(b"fo\xffk"));
        }
        let probes = ProbeRegistry::new(HostProbes::fixed(false, false));
        let mut startup = ProcessStartupConfig::from_env_with_key(key, probes);
        unsafe {
            std::env::remove_var(key);
        }

        assert!(startup.value().is_some());
        let result = startup.determine_method();
        assert!(matches!(
            &result,
            Err(Error::InvalidOverride { key: found, value })
                if found == key && value == "fo\u{fffd}k"
        ));
        assert!(startup.context().is_err());
    }
}
