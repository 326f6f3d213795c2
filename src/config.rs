use std::time::Duration;

/// How long a search may run before it's abandoned, in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 15_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// `None` means search until solved or out of states
    pub timeout: Option<Duration>,
    /// Print a short summary every time the search reaches a new depth
    pub print_status: bool,
}

impl Config {
    pub fn with_timeout_ms(timeout_ms: u64) -> Self {
        Config {
            timeout: Some(Duration::from_millis(timeout_ms)),
            ..Config::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            timeout: Some(Duration::from_millis(DEFAULT_TIMEOUT_MS)),
            print_status: false,
        }
    }
}
