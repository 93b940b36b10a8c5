use std::io::Write;

use ck_domain::config::{Config, ConfigSeverity};

/// Validate the loaded config, printing any issues.
///
/// Returns `false` when at least one issue is an error; warnings alone pass.
pub fn validate(config: &Config, config_path: &str, out: &mut impl Write) -> anyhow::Result<bool> {
    let issues = config.validate();

    if issues.is_empty() {
        writeln!(out, "Config OK ({config_path})")?;
        return Ok(true);
    }

    let error_count = issues
        .iter()
        .filter(|e| e.severity == ConfigSeverity::Error)
        .count();
    let warning_count = issues.len() - error_count;

    for issue in &issues {
        writeln!(out, "{issue}")?;
    }

    writeln!(
        out,
        "\n{error_count} error(s), {warning_count} warning(s) in {config_path}"
    )?;

    Ok(error_count == 0)
}

/// Dump the resolved config (with all defaults filled in) as TOML.
pub fn show(config: &Config, out: &mut impl Write) -> anyhow::Result<()> {
    let output = toml::to_string_pretty(config)?;
    write!(out, "{output}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_validate(config: &Config) -> (bool, String) {
        let mut out = Vec::new();
        let ok = validate(config, "cronkit.toml", &mut out).unwrap();
        (ok, String::from_utf8(out).unwrap())
    }

    #[test]
    fn validate_clean_config() {
        let (ok, out) = run_validate(&Config::default());
        assert!(ok);
        assert_eq!(out, "Config OK (cronkit.toml)\n");
    }

    #[test]
    fn validate_warnings_still_pass() {
        let mut cfg = Config::default();
        cfg.scheduler.preview_count = 0;
        let (ok, out) = run_validate(&cfg);
        assert!(ok);
        assert!(out.contains("[WARN] scheduler.preview_count"));
        assert!(out.contains("0 error(s), 1 warning(s) in cronkit.toml"));
    }

    #[test]
    fn validate_errors_fail() {
        let mut cfg = Config::default();
        cfg.scheduler.default_timezone = "Nowhere/Land".into();
        let (ok, out) = run_validate(&cfg);
        assert!(!ok);
        assert!(out.contains("[ERROR] scheduler.default_timezone"));
    }

    #[test]
    fn show_emits_every_section() {
        let mut out = Vec::new();
        show(&Config::default(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("[scheduler]"));
        assert!(text.contains("search_horizon_days = 1464"));
        assert!(text.contains("[logging]"));
    }
}
