use serde::{Deserialize, Serialize};

/// Nesting limit shared by the JSON decoder and the item builder.
///
/// Matches the recursion limit `serde_json` applies when parsing text.
pub const DEFAULT_MAX_DEPTH: usize = 128;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenieConfig {
    /// Maximum nesting depth of an example value. Deeper documents are rejected
    /// with [`GenieError::MaxDepthExceeded`](crate::GenieError::MaxDepthExceeded).
    pub max_depth: usize,
    /// Enable debug output. When `true`, prints which kind each field was inferred as,
    /// including object references, ranges and allow-unknown overrides.
    pub debug: bool,
    /// Controls the verbosity level of debug output
    pub verbosity: DebugVerbosity,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DebugVerbosity {
    /// Show endpoint-level progress and special-cased fields
    #[default]
    Normal,
    /// Show every field as it is classified
    Verbose,
}

impl GenieConfig {
    pub fn debug(&self, args: std::fmt::Arguments) {
        if self.debug {
            eprintln!("{}", args);
        }
    }

    pub fn debug_verbose(&self, args: std::fmt::Arguments) {
        if self.debug && matches!(self.verbosity, DebugVerbosity::Verbose) {
            eprintln!("{}", args);
        }
    }
}

impl Default for GenieConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            debug: false,
            verbosity: DebugVerbosity::default(),
        }
    }
}

#[macro_export]
macro_rules! debug {
    ($cfg:expr, $($arg:tt)*) => {
        $cfg.debug(format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! debug_verbose {
    ($cfg:expr, $($arg:tt)*) => {
        $cfg.debug_verbose(format_args!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: GenieConfig = serde_json::from_str(r#"{"max_depth": 8}"#).unwrap();
        assert_eq!(config.max_depth, 8);
        assert!(!config.debug);
        assert_eq!(config.verbosity, DebugVerbosity::Normal);
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let config = GenieConfig {
            max_depth: 16,
            debug: true,
            verbosity: DebugVerbosity::Verbose,
        };
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["verbosity"], "Verbose");

        let back: GenieConfig = serde_json::from_value(value).unwrap();
        assert_eq!(back.max_depth, 16);
        assert!(back.debug);
        assert_eq!(back.verbosity, DebugVerbosity::Verbose);
    }
}
