/// Runner configuration
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Bound for the text-condition waits (ms)
    pub wait_timeout_ms: u64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            wait_timeout_ms: 10_000,
        }
    }
}
