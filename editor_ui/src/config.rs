//! Editor configuration.

use std::env;
use std::time::Duration;

/// Runtime settings for the terminal editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Extra Ctrl-Q presses required to quit with unsaved changes.
    pub quit_times: u32,
    /// How long a status message stays visible.
    pub status_timeout: Duration,
    /// Read window for one input byte; also bounds escape-sequence lookahead.
    pub input_timeout: Duration,
    /// Banner shown centered on an empty buffer.
    pub welcome: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            quit_times: 3,
            status_timeout: Duration::from_secs(5),
            input_timeout: Duration::from_millis(100),
            welcome: format!("Milli editor -- version {}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Config {
    /// Default settings with overrides from `MILLI_QUIT_TIMES` and
    /// `MILLI_STATUS_SECS`.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|name| env::var(name).ok())
    }

    fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = parse_var(&lookup, "MILLI_QUIT_TIMES") {
            self.quit_times = value;
        }
        if let Some(value) = parse_var(&lookup, "MILLI_STATUS_SECS") {
            self.status_timeout = Duration::from_secs(value);
        }
        self
    }
}

fn parse_var<F, T>(lookup: &F, name: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    let raw = lookup(name)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("ignoring {}={:?}: not a number", name, raw);
            None
        }
    }
}
