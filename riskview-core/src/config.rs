//! Configuration file support for riskview
//!
//! Loads project-specific configuration from JSON files.
//!
//! Search order:
//! 1. Explicit path (--config CLI flag)
//! 2. `.riskviewrc.json` in project root
//! 3. `riskview.config.json` in project root
//! 4. `"riskview"` key in `package.json`
//!
//! All fields are optional. CLI flags take precedence over config file values.

use crate::filter::FilterOptions;
use crate::risk::{
    RiskThresholds, ORDINAL_HIGH, ORDINAL_MEDIUM, ORDINAL_SCALE_MAX, RISK_HIGH, RISK_MEDIUM,
};
use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default exclude patterns applied when no config is specified
const DEFAULT_EXCLUDES: &[&str] = &[
    "**/node_modules/**",
    "**/package.json",
    "**/package-lock.json",
    "**/tsconfig*.json",
    "**/.riskviewrc.json",
    "**/riskview.config.json",
];

/// riskview configuration loaded from a JSON config file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RiskviewConfig {
    /// Glob patterns for payload files to include (default: all `.json` files)
    #[serde(default)]
    pub include: Vec<String>,

    /// Glob patterns for payload files to exclude (default: manifests, node_modules)
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Custom level thresholds
    #[serde(default)]
    pub thresholds: Option<ThresholdConfig>,

    /// Minimum risk score to report
    #[serde(default)]
    pub min_score: Option<i64>,

    /// Only report these statuses
    #[serde(default)]
    pub statuses: Vec<String>,

    /// Maximum number of results to show
    #[serde(default)]
    pub top: Option<usize>,

    /// Sort by risk score instead of payload order
    #[serde(default)]
    pub sort: Option<bool>,
}

/// Custom level thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThresholdConfig {
    /// Composite score for high risk (default: 75)
    pub risk_high: Option<i64>,
    /// Composite score for medium risk (default: 45)
    pub risk_medium: Option<i64>,
    /// Ordinal rating for high impact/probability (default: 4)
    pub ordinal_high: Option<f64>,
    /// Ordinal rating for medium impact/probability (default: 3)
    pub ordinal_medium: Option<f64>,
}

/// Resolved configuration with compiled glob patterns
#[derive(Debug)]
pub struct ResolvedConfig {
    /// Compiled include patterns (None means include all)
    pub include: Option<GlobSet>,
    /// Compiled exclude patterns
    pub exclude: GlobSet,
    /// Level thresholds
    pub thresholds: RiskThresholds,
    /// Filters
    pub min_score: Option<i64>,
    pub statuses: Vec<String>,
    pub top_n: Option<usize>,
    pub sort_by_score: bool,
    /// Path the config was loaded from (None if defaults)
    pub config_path: Option<PathBuf>,
}

impl RiskviewConfig {
    /// Validate the configuration for logical errors
    pub fn validate(&self) -> Result<()> {
        if let Some(ref t) = self.thresholds {
            let risk_high = t.risk_high.unwrap_or(RISK_HIGH);
            let risk_medium = t.risk_medium.unwrap_or(RISK_MEDIUM);
            let ordinal_high = t.ordinal_high.unwrap_or(ORDINAL_HIGH);
            let ordinal_medium = t.ordinal_medium.unwrap_or(ORDINAL_MEDIUM);

            for (name, val) in [("risk_high", risk_high), ("risk_medium", risk_medium)] {
                if !(0..=100).contains(&val) {
                    anyhow::bail!("thresholds.{} must be between 0 and 100 (got {})", name, val);
                }
            }
            if risk_medium >= risk_high {
                anyhow::bail!(
                    "thresholds.risk_medium ({}) must be less than thresholds.risk_high ({})",
                    risk_medium,
                    risk_high
                );
            }

            for (name, val) in [("ordinal_high", ordinal_high), ("ordinal_medium", ordinal_medium)] {
                if !(0.0..=ORDINAL_SCALE_MAX).contains(&val) {
                    anyhow::bail!(
                        "thresholds.{} must be between 0 and {} (got {})",
                        name,
                        ORDINAL_SCALE_MAX,
                        val
                    );
                }
            }
            if ordinal_medium >= ordinal_high {
                anyhow::bail!(
                    "thresholds.ordinal_medium ({}) must be less than thresholds.ordinal_high ({})",
                    ordinal_medium,
                    ordinal_high
                );
            }
        }

        if let Some(min) = self.min_score {
            if !(0..=100).contains(&min) {
                anyhow::bail!("min_score must be between 0 and 100 (got {})", min);
            }
        }

        if self.top == Some(0) {
            anyhow::bail!("top must be at least 1");
        }

        // Validate glob patterns compile
        for pattern in &self.include {
            Glob::new(pattern).with_context(|| format!("invalid include pattern: {}", pattern))?;
        }
        for pattern in &self.exclude {
            Glob::new(pattern).with_context(|| format!("invalid exclude pattern: {}", pattern))?;
        }

        Ok(())
    }

    /// Resolve config into compiled form ready for use
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        self.validate()?;

        let include = if self.include.is_empty() {
            None
        } else {
            Some(build_globset(self.include.iter().map(String::as_str))?)
        };

        // User excludes replace the defaults rather than extending them
        let exclude = if self.exclude.is_empty() {
            build_globset(DEFAULT_EXCLUDES.iter().copied())?
        } else {
            build_globset(self.exclude.iter().map(String::as_str))?
        };

        let thresholds = match &self.thresholds {
            Some(t) => RiskThresholds {
                ordinal_high: t.ordinal_high.unwrap_or(ORDINAL_HIGH),
                ordinal_medium: t.ordinal_medium.unwrap_or(ORDINAL_MEDIUM),
                risk_high: t.risk_high.unwrap_or(RISK_HIGH),
                risk_medium: t.risk_medium.unwrap_or(RISK_MEDIUM),
            },
            None => RiskThresholds::default(),
        };

        Ok(ResolvedConfig {
            include,
            exclude,
            thresholds,
            min_score: self.min_score,
            statuses: self.statuses.clone(),
            top_n: self.top,
            sort_by_score: self.sort.unwrap_or(false),
            config_path: None,
        })
    }
}

impl ResolvedConfig {
    /// Check if a payload file should be included based on include/exclude patterns
    pub fn should_include(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();

        if self.exclude.is_match(path_str.as_ref()) {
            return false;
        }

        if let Some(ref include) = self.include {
            return include.is_match(path_str.as_ref());
        }

        true
    }

    /// Filter options from config values
    pub fn filter_options(&self) -> FilterOptions {
        FilterOptions {
            min_score: self.min_score,
            statuses: self.statuses.clone(),
            top_n: self.top_n,
            sort_by_score: self.sort_by_score,
        }
    }

    /// Build a ResolvedConfig with all defaults (no config file)
    pub fn defaults() -> Result<Self> {
        RiskviewConfig::default().resolve()
    }
}

fn build_globset<'a>(patterns: impl Iterator<Item = &'a str>) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}

/// Discover and load a config file from the project root
///
/// Search order:
/// 1. `.riskviewrc.json`
/// 2. `riskview.config.json`
/// 3. `"riskview"` key in `package.json`
///
/// Returns `None` if no config file is found (use defaults).
pub fn discover_config(project_root: &Path) -> Result<Option<(RiskviewConfig, PathBuf)>> {
    for name in [".riskviewrc.json", "riskview.config.json"] {
        let path = project_root.join(name);
        if path.exists() {
            let config = load_config_file(&path)?;
            return Ok(Some((config, path)));
        }
    }

    let pkg_path = project_root.join("package.json");
    if pkg_path.exists() {
        if let Some(config) = load_from_package_json(&pkg_path)? {
            return Ok(Some((config, pkg_path)));
        }
    }

    Ok(None)
}

/// Load config from an explicit file path
pub fn load_config_file(path: &Path) -> Result<RiskviewConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;

    let config: RiskviewConfig = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse config file: {}", path.display()))?;

    config
        .validate()
        .with_context(|| format!("invalid config in: {}", path.display()))?;

    Ok(config)
}

/// Load riskview config from the "riskview" key in package.json
fn load_from_package_json(path: &Path) -> Result<Option<RiskviewConfig>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let pkg: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse {}", path.display()))?;

    match pkg.get("riskview") {
        Some(value) => {
            let config = RiskviewConfig::deserialize(value)
                .with_context(|| format!("invalid riskview config in {}", path.display()))?;
            config
                .validate()
                .with_context(|| format!("invalid riskview config in {}", path.display()))?;
            Ok(Some(config))
        }
        None => Ok(None),
    }
}

/// Load and resolve config for a project
///
/// If `config_path` is provided, loads from that file.
/// Otherwise, discovers config from the project root.
/// Returns default config if nothing is found.
pub fn load_and_resolve(project_root: &Path, config_path: Option<&Path>) -> Result<ResolvedConfig> {
    let (config, source_path) = if let Some(path) = config_path {
        (load_config_file(path)?, Some(path.to_path_buf()))
    } else {
        match discover_config(project_root)? {
            Some((config, path)) => (config, Some(path)),
            None => (RiskviewConfig::default(), None),
        }
    };

    match source_path {
        Some(ref p) => tracing::info!("using config: {}", p.display()),
        None => tracing::debug!("no config file found under {}", project_root.display()),
    }

    let mut resolved = config.resolve()?;
    resolved.config_path = source_path;
    Ok(resolved)
}
