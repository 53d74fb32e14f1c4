use std::path::{Path, PathBuf};
use std::time::Duration;

use dcc_lib::config::ConfigError;
use dcc_lib::engine::{MatchPolicy, UnitScale};
use dcc_lib::figma::FigmaAuth;
use dcc_lib::{Config, DccError, Viewport};
use tracing::debug;

/// Values given on the `compare` command line; `None`/empty means "use config".
#[derive(Debug, Default, Clone)]
pub struct CompareOverrides {
    pub viewports: Vec<Viewport>,
    pub device_pixel_ratio: Option<f64>,
    pub match_policy: Option<MatchPolicy>,
    pub out_dir: Option<PathBuf>,
    pub nav_timeout: Option<u64>,
    pub process_timeout: Option<u64>,
}

impl CompareOverrides {
    /// Applies every present override on top of `config`.
    pub fn apply(&self, config: &mut Config) {
        if !self.viewports.is_empty() {
            config.viewports = self.viewports.clone();
        }
        if let Some(ratio) = self.device_pixel_ratio {
            config.units = UnitScale {
                device_pixel_ratio: ratio,
            };
        }
        if let Some(policy) = self.match_policy {
            config.matching.policy = policy;
        }
        if let Some(dir) = &self.out_dir {
            config.report.out_dir = dir.clone();
        }
        if let Some(secs) = self.nav_timeout {
            config.browser.navigation_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = self.process_timeout {
            config.browser.process_timeout = Duration::from_secs(secs);
        }
    }
}

/// Load config from a TOML file, `./dcc.toml`, or return defaults.
/// Priority: explicit path > ./dcc.toml > defaults
pub fn load_config(path: Option<&Path>) -> Result<Config, DccError> {
    let source = Config::resolve_path(path);
    let cfg = Config::load(path).map_err(|e| {
        let loc = source
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "defaults".to_string());
        match e {
            ConfigError::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound => {
                DccError::Config(format!("Config file not found: {}", loc))
            }
            other => DccError::Config(format!("Failed to read config {}: {}", loc, other)),
        }
    })?;
    validate(&cfg, source.as_deref())?;
    Ok(cfg)
}

/// Loads config, applies CLI overrides and validates the merged result.
pub fn resolve_compare_config(
    path: Option<&Path>,
    overrides: &CompareOverrides,
) -> Result<Config, DccError> {
    let mut cfg = load_config(path)?;
    overrides.apply(&mut cfg);
    validate(&cfg, None)?;
    Ok(cfg)
}

fn validate(cfg: &Config, source: Option<&Path>) -> Result<(), DccError> {
    cfg.validate().map_err(|e| {
        let prefix = source
            .map(|p| format!("Invalid config ({}): {}", p.display(), e))
            .unwrap_or_else(|| format!("Invalid config: {}", e));
        DccError::Config(prefix)
    })
}

/// Figma credentials: config file first, then `FIGMA_TOKEN` / `FIGMA_OAUTH_TOKEN`.
pub fn figma_auth(config: &Config) -> Option<FigmaAuth> {
    config.figma.auth().or_else(FigmaAuth::from_env)
}

/// Log the effective config (visible with `--verbose`).
pub fn log_effective_config(config: &Config, config_path: Option<&Path>) {
    let source = Config::resolve_path(config_path);
    debug!("{}", format_effective_config(config, source.as_deref()));
}

/// Format effective config as a single-line string.
pub fn format_effective_config(config: &Config, config_source: Option<&Path>) -> String {
    let source = config_source
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "defaults".to_string());
    let viewports: Vec<String> = config.viewports.iter().map(|v| v.to_string()).collect();
    let properties: Vec<String> = config.diff.properties.iter().map(|p| p.to_string()).collect();
    format!(
        "Effective config [{source}]: policy={}, name-threshold={:.2}, size-threshold={:.2}, materiality={}, critical={}, dpr={}, properties=[{}], viewports=[{}], timeouts: nav={}s, network-idle={}s, process={}s, out-dir={}",
        config.matching.policy,
        config.matching.name_threshold,
        config.matching.size_threshold,
        config.diff.materiality,
        config.report.critical_threshold,
        config.units.device_pixel_ratio,
        properties.join(", "),
        viewports.join(", "),
        config.browser.navigation_timeout.as_secs(),
        config.browser.network_idle_timeout.as_secs(),
        config.browser.process_timeout.as_secs(),
        config.report.out_dir.display(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn overrides_replace_only_given_values() {
        let mut cfg = Config::default();
        let overrides = CompareOverrides {
            viewports: vec![Viewport::new("Mobile", 375, 667)],
            device_pixel_ratio: Some(2.0),
            nav_timeout: Some(12),
            ..CompareOverrides::default()
        };
        overrides.apply(&mut cfg);

        assert_eq!(cfg.viewports, vec![Viewport::new("Mobile", 375, 667)]);
        assert!((cfg.units.device_pixel_ratio - 2.0).abs() < f64::EPSILON);
        assert_eq!(cfg.browser.navigation_timeout, Duration::from_secs(12));
        assert_eq!(cfg.matching.policy, MatchPolicy::First);
        assert_eq!(cfg.browser.process_timeout, Config::default().browser.process_timeout);
        assert_eq!(cfg.report.out_dir, PathBuf::from("dcc-report"));
    }

    #[test]
    fn resolve_compare_config_prefers_cli_over_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dcc.toml");
        std::fs::write(
            &path,
            "[matching]\npolicy = \"best\"\n\n[units]\ndevice_pixel_ratio = 3.0\n",
        )
        .unwrap();

        let overrides = CompareOverrides {
            device_pixel_ratio: Some(2.0),
            ..CompareOverrides::default()
        };
        let cfg = resolve_compare_config(Some(&path), &overrides).expect("config");
        assert_eq!(cfg.matching.policy, MatchPolicy::Best);
        assert!((cfg.units.device_pixel_ratio - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn invalid_override_is_a_config_error() {
        let overrides = CompareOverrides {
            device_pixel_ratio: Some(0.0),
            ..CompareOverrides::default()
        };
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.toml");
        std::fs::write(&path, "").unwrap();

        match resolve_compare_config(Some(&path), &overrides) {
            Err(DccError::Config(msg)) => assert!(msg.starts_with("Invalid config"), "got {msg}"),
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn missing_explicit_config_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nope.toml");
        match load_config(Some(&path)) {
            Err(DccError::Config(msg)) => assert!(msg.contains("Config file not found")),
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn format_effective_config_includes_key_fields() {
        let summary = format_effective_config(&Config::default(), Some(Path::new("dcc.toml")));
        assert!(summary.contains("policy=first"));
        assert!(summary.contains("materiality=2"));
        assert!(summary.contains("critical=10"));
        assert!(summary.contains("dpr=1"));
        assert!(summary.contains("properties=[width, height]"));
        assert!(summary.contains("Desktop (1440x900)"));
        assert!(summary.contains("nav=30s"));
        assert!(summary.contains("process=45s"));
        assert!(summary.contains("dcc.toml"));
    }
}
