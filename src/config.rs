/*
 *  config.rs
 *
 *  PhotoGallery - responsive grid, banner aware
 *  (c) 2020-26 Stuart Hunter
 *
 *  Configuration: defaults, YAML file, CLI overrides, validation
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use clap::{ArgAction, Parser, ValueHint};
use dirs_next::home_dir;
use serde::{Deserialize, Serialize};
use std::{fs, path::{Path, PathBuf}, time::Duration};
use thiserror::Error;

use crate::ads::TEST_AD_UNIT_ID;
use crate::icons::{IconClientOptions, DEFAULT_ICON_ENDPOINT, DEFAULT_USER_AGENT};
use crate::inset::InsetConfig;
use crate::layout::{DisplayMetrics, LayoutError, Orientation};

/// Error type for config loading/validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Top-level app configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub log_level: Option<String>,     // "error" .. "trace"
    /// window the gallery starts in
    pub screen: Option<ScreenConfig>,
    pub ads: Option<AdsConfig>,
    pub icons: Option<IconsConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ScreenConfig {
    pub width_px: Option<u32>,
    pub height_px: Option<u32>,
    pub density: Option<f32>,
    pub orientation: Option<Orientation>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AdsConfig {
    pub unit_id: Option<String>,
    pub fallback_height_dp: Option<u32>,
    pub extra_margin_dp: Option<u32>,
    /// simulated network: measured banner height, or fail every load
    pub simulated_height_px: Option<u32>,
    pub simulate_failure: Option<bool>,
    pub load_delay_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct IconsConfig {
    pub enabled: Option<bool>,
    pub endpoint: Option<String>,
    pub user_agent: Option<String>,
    pub connect_timeout_secs: Option<u64>,
    pub read_timeout_secs: Option<u64>,
    pub cache_ttl_secs: Option<u64>,
}

const DEFAULT_WIDTH_PX: u32 = 1080;
const DEFAULT_HEIGHT_PX: u32 = 2400;
const DEFAULT_DENSITY: f32 = 3.0;
const DEFAULT_SIMULATED_HEIGHT_PX: u32 = 150;
const DEFAULT_LOAD_DELAY_MS: u64 = 300;

/// CLI overrides. All fields are Options so we can layer them over YAML.
#[derive(Debug, Parser, Clone, Default)]
#[command(name = "photogallery", about = "PhotoGallery layout and banner inset engine", disable_help_flag = false)]
pub struct Cli {
    /// Path to a YAML config file (overrides search)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub log_level: Option<String>,
    #[arg(long)]
    pub width_px: Option<u32>,
    #[arg(long)]
    pub height_px: Option<u32>,
    #[arg(long)]
    pub density: Option<f32>,
    #[arg(long, value_parser = parse_orientation)]
    pub orientation: Option<Orientation>,
    #[arg(long)]
    pub ad_unit_id: Option<String>,
    /// measured height the simulated banner reports
    #[arg(long)]
    pub ad_height_px: Option<u32>,
    /// make every simulated banner load fail
    #[arg(long, action = ArgAction::SetTrue)]
    pub ad_fail: bool,
    #[arg(long)]
    pub ad_delay_ms: Option<u64>,
    #[arg(long)]
    pub icon_endpoint: Option<String>,
    /// skip the icon url lookup
    #[arg(long, action = ArgAction::SetTrue)]
    pub no_icons: bool,
    /// rotate the window once mid-run
    #[arg(long, action = ArgAction::SetTrue)]
    pub rotate: bool,
    /// seconds to run before shutting down
    #[arg(long, default_value_t = 3)]
    pub run_secs: u64,
    /// dump fully merged config (after overrides) and exit
    #[arg(long, action = ArgAction::SetTrue)]
    pub dump_config: bool,
}

fn parse_orientation(s: &str) -> Result<Orientation, String> {
    match s.to_ascii_lowercase().as_str() {
        "portrait" | "p" => Ok(Orientation::Portrait),
        "landscape" | "l" => Ok(Orientation::Landscape),
        other => Err(format!("unknown orientation '{other}', expected portrait|landscape")),
    }
}

/// Public entry point: parse CLI, read YAML, merge, validate.
pub fn load() -> Result<(Config, Cli), ConfigError> {
    let cli = Cli::parse();
    let cfg = load_with(&cli)?;

    if cli.dump_config {
        // Pretty YAML of effective config
        let s = serde_yaml::to_string(&cfg)?;
        println!("{s}");
        std::process::exit(0);
    }

    Ok((cfg, cli))
}

/// Layer defaults, the YAML file and `cli`, then validate.
pub fn load_with(cli: &Cli) -> Result<Config, ConfigError> {
    // 1) defaults (from `Default` impl)
    let mut cfg = Config::default();

    // 2) YAML file (explicit path or search)
    if let Some(p) = cli.config.as_ref() {
        if p.exists() {
            let y = read_yaml(p)?;
            merge(&mut cfg, y);
        } else {
            return Err(ConfigError::Validation(format!(
                "Config file not found: {}",
                p.display()
            )));
        }
    } else if let Some(p) = find_config_file() {
        let y = read_yaml(&p)?;
        merge(&mut cfg, y);
    }

    // 3) CLI overrides (highest precedence)
    apply_cli_overrides(&mut cfg, cli);

    // 4) Validate
    validate(&cfg)?;
    Ok(cfg)
}

/// Try common locations in order (first hit wins).
fn find_config_file() -> Option<PathBuf> {
    // XDG-style: ~/.config/photogallery/config.yaml
    if let Some(home) = home_dir() {
        let p = home.join(".config/photogallery/config.yaml");
        if p.exists() { return Some(p) }
        let p = home.join(".config/photogallery.yaml");
        if p.exists() { return Some(p) }
    }
    // project local
    for candidate in &["photogallery.yaml", "config.yaml", "config/photogallery.yaml"] {
        let p = PathBuf::from(candidate);
        if p.exists() { return Some(p) }
    }
    None
}

fn read_yaml(path: &Path) -> Result<Config, ConfigError> {
    let s = fs::read_to_string(path)?;
    let cfg: Config = serde_yaml::from_str(&s)?;
    Ok(cfg)
}

/// Shallow merge `src` into `dst`, Option-by-Option.
fn merge(dst: &mut Config, src: Config) {
    if src.log_level.is_some() { dst.log_level = src.log_level; }
    match (&mut dst.screen, src.screen) {
        (None, Some(c)) => dst.screen = Some(c),
        (Some(d), Some(s)) => merge_screen(d, s),
        _ => {}
    }
    match (&mut dst.ads, src.ads) {
        (None, Some(c)) => dst.ads = Some(c),
        (Some(d), Some(s)) => merge_ads(d, s),
        _ => {}
    }
    match (&mut dst.icons, src.icons) {
        (None, Some(c)) => dst.icons = Some(c),
        (Some(d), Some(s)) => merge_icons(d, s),
        _ => {}
    }
}

fn merge_screen(dst: &mut ScreenConfig, src: ScreenConfig) {
    if src.width_px.is_some()    { dst.width_px = src.width_px; }
    if src.height_px.is_some()   { dst.height_px = src.height_px; }
    if src.density.is_some()     { dst.density = src.density; }
    if src.orientation.is_some() { dst.orientation = src.orientation; }
}

fn merge_ads(dst: &mut AdsConfig, src: AdsConfig) {
    if src.unit_id.is_some()             { dst.unit_id = src.unit_id; }
    if src.fallback_height_dp.is_some()  { dst.fallback_height_dp = src.fallback_height_dp; }
    if src.extra_margin_dp.is_some()     { dst.extra_margin_dp = src.extra_margin_dp; }
    if src.simulated_height_px.is_some() { dst.simulated_height_px = src.simulated_height_px; }
    if src.simulate_failure.is_some()    { dst.simulate_failure = src.simulate_failure; }
    if src.load_delay_ms.is_some()       { dst.load_delay_ms = src.load_delay_ms; }
}

fn merge_icons(dst: &mut IconsConfig, src: IconsConfig) {
    if src.enabled.is_some()              { dst.enabled = src.enabled; }
    if src.endpoint.is_some()             { dst.endpoint = src.endpoint; }
    if src.user_agent.is_some()           { dst.user_agent = src.user_agent; }
    if src.connect_timeout_secs.is_some() { dst.connect_timeout_secs = src.connect_timeout_secs; }
    if src.read_timeout_secs.is_some()    { dst.read_timeout_secs = src.read_timeout_secs; }
    if src.cache_ttl_secs.is_some()       { dst.cache_ttl_secs = src.cache_ttl_secs; }
}

fn apply_cli_overrides(cfg: &mut Config, cli: &Cli) {
    if cli.log_level.is_some() { cfg.log_level = cli.log_level.clone(); }

    if cli.width_px.is_some() || cli.height_px.is_some() || cli.density.is_some() || cli.orientation.is_some() {
        let screen = cfg.screen.get_or_insert_with(ScreenConfig::default);
        if cli.width_px.is_some()    { screen.width_px = cli.width_px; }
        if cli.height_px.is_some()   { screen.height_px = cli.height_px; }
        if cli.density.is_some()     { screen.density = cli.density; }
        if cli.orientation.is_some() { screen.orientation = cli.orientation; }
    }

    if cli.ad_unit_id.is_some() || cli.ad_height_px.is_some() || cli.ad_fail || cli.ad_delay_ms.is_some() {
        let ads = cfg.ads.get_or_insert_with(AdsConfig::default);
        if cli.ad_unit_id.is_some()   { ads.unit_id = cli.ad_unit_id.clone(); }
        if cli.ad_height_px.is_some() { ads.simulated_height_px = cli.ad_height_px; }
        if cli.ad_fail                { ads.simulate_failure = Some(true); }
        if cli.ad_delay_ms.is_some()  { ads.load_delay_ms = cli.ad_delay_ms; }
    }

    if cli.icon_endpoint.is_some() || cli.no_icons {
        let icons = cfg.icons.get_or_insert_with(IconsConfig::default);
        if cli.icon_endpoint.is_some() { icons.endpoint = cli.icon_endpoint.clone(); }
        if cli.no_icons                { icons.enabled = Some(false); }
    }
}

/// Invariants the rest of the crate relies on
fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if let Some(level) = cfg.log_level.as_deref() {
        if !matches!(level, "off" | "error" | "warn" | "info" | "debug" | "trace") {
            return Err(ConfigError::Validation(format!("unknown log_level '{level}'")));
        }
    }
    if let Some(screen) = cfg.screen.as_ref() {
        if screen.width_px == Some(0) || screen.height_px == Some(0) {
            return Err(ConfigError::Validation("screen width_px/height_px must be > 0".into()));
        }
        if let Some(d) = screen.density {
            if !d.is_finite() || d <= 0.0 {
                return Err(ConfigError::Validation("screen density must be > 0".into()));
            }
        }
    }
    if let Some(ads) = cfg.ads.as_ref() {
        // a zero fallback would let a failed banner cover the last row
        if ads.fallback_height_dp == Some(0) {
            return Err(ConfigError::Validation("ads fallback_height_dp must be > 0".into()));
        }
        if ads.unit_id.as_deref().is_some_and(str::is_empty) {
            return Err(ConfigError::Validation("ads unit_id must not be empty".into()));
        }
    }
    if let Some(icons) = cfg.icons.as_ref() {
        if icons.connect_timeout_secs == Some(0) || icons.read_timeout_secs == Some(0) {
            return Err(ConfigError::Validation("icons timeouts must be > 0".into()));
        }
        if icons.endpoint.as_deref().is_some_and(|e| !e.starts_with("http://") && !e.starts_with("https://")) {
            return Err(ConfigError::Validation("icons endpoint must be an http(s) url".into()));
        }
    }
    Ok(())
}

impl Config {
    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or("info")
    }

    pub fn display_metrics(&self) -> Result<DisplayMetrics, LayoutError> {
        let screen = self.screen.clone().unwrap_or_default();
        DisplayMetrics::new(
            screen.width_px.unwrap_or(DEFAULT_WIDTH_PX),
            screen.height_px.unwrap_or(DEFAULT_HEIGHT_PX),
            screen.density.unwrap_or(DEFAULT_DENSITY),
        )
    }

    pub fn orientation(&self) -> Orientation {
        self.screen.as_ref().and_then(|s| s.orientation).unwrap_or_default()
    }

    pub fn inset_config(&self) -> InsetConfig {
        let defaults = InsetConfig::default();
        let ads = self.ads.clone().unwrap_or_default();
        InsetConfig {
            fallback_ad_height_dp: ads.fallback_height_dp.unwrap_or(defaults.fallback_ad_height_dp),
            extra_margin_dp: ads.extra_margin_dp.unwrap_or(defaults.extra_margin_dp),
        }
    }

    pub fn ad_unit_id(&self) -> String {
        self.ads
            .as_ref()
            .and_then(|a| a.unit_id.clone())
            .unwrap_or_else(|| TEST_AD_UNIT_ID.to_string())
    }

    pub fn simulated_height_px(&self) -> u32 {
        self.ads.as_ref().and_then(|a| a.simulated_height_px).unwrap_or(DEFAULT_SIMULATED_HEIGHT_PX)
    }

    pub fn simulate_failure(&self) -> bool {
        self.ads.as_ref().and_then(|a| a.simulate_failure).unwrap_or(false)
    }

    pub fn ad_load_delay(&self) -> Duration {
        Duration::from_millis(self.ads.as_ref().and_then(|a| a.load_delay_ms).unwrap_or(DEFAULT_LOAD_DELAY_MS))
    }

    /// Client options, or None when the lookup is switched off
    pub fn icon_options(&self) -> Option<IconClientOptions> {
        let icons = self.icons.clone().unwrap_or_default();
        if icons.enabled == Some(false) {
            return None;
        }
        let defaults = IconClientOptions::default();
        Some(IconClientOptions {
            endpoint: icons.endpoint.unwrap_or_else(|| DEFAULT_ICON_ENDPOINT.to_string()),
            user_agent: icons.user_agent.unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            connect_timeout: icons.connect_timeout_secs.map(Duration::from_secs).unwrap_or(defaults.connect_timeout),
            timeout: icons.read_timeout_secs.map(Duration::from_secs).unwrap_or(defaults.timeout),
            cache_ttl: icons.cache_ttl_secs.map(Duration::from_secs).unwrap_or(defaults.cache_ttl),
        })
    }
}
