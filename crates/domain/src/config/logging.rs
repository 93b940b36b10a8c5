use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Logging configuration
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Tracing subscriber settings for the `cronkit` binary.
///
/// `RUST_LOG` always wins over `filter` when set. Output goes to stderr so
/// command results on stdout stay machine-readable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "d_filter")]
    pub filter: String,

    /// Emit JSON lines instead of the compact text format.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: d_filter(),
            json: false,
        }
    }
}

fn d_filter() -> String {
    "warn,ck_cli=info".into()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter() {
        let cfg = LoggingConfig::default();
        assert_eq!(cfg.filter, "warn,ck_cli=info");
        assert!(!cfg.json);
    }

    #[test]
    fn deserialize_empty_uses_defaults() {
        let cfg: LoggingConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.filter, "warn,ck_cli=info");
        assert!(!cfg.json);
    }

    #[test]
    fn deserialize_with_json() {
        let toml_str = r#"
            filter = "debug"
            json = true
        "#;
        let cfg: LoggingConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.filter, "debug");
        assert!(cfg.json);
    }

    #[test]
    fn serde_roundtrip() {
        let cfg = LoggingConfig {
            filter: "ck_scheduler=trace".into(),
            json: true,
        };
        let json = serde_json::to_string(&cfg).unwrap();
        let back: LoggingConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.filter, cfg.filter);
        assert_eq!(back.json, cfg.json);
    }
}
