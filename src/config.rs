use std::time::Duration;

/// What happens to requests still queued in a lane when the engine shuts down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ShutdownPolicy {
    /// Apply everything already queued, then stop.
    #[default]
    Drain,
    /// Fail everything already queued with `ShuttingDown`.
    Discard,
}

/// Runtime settings of the wallet engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EngineConfig {
    /// How long a lane may sit empty before its worker retires.
    /// `None` keeps lanes alive for the lifetime of the engine.
    pub idle_timeout: Option<Duration>,
    pub shutdown_policy: ShutdownPolicy,
}

impl EngineConfig {
    /// A zero timeout disables idle reclamation.
    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = Some(idle_timeout).filter(|timeout| !timeout.is_zero());
        self
    }

    pub fn with_shutdown_policy(mut self, shutdown_policy: ShutdownPolicy) -> Self {
        self.shutdown_policy = shutdown_policy;
        self
    }
}
