use serde::{Deserialize, Serialize};
use clap::{ArgAction, Parser, ValueEnum, ValueHint};
use dirs_next::home_dir;
use std::{fs, path::{Path, PathBuf}};
use thiserror::Error;

/// Label drawn when neither the config nor the feed names the site.
pub const PLACEHOLDER_LOCATION: &str = "XXXXX";
pub const DEFAULT_FEED_URL: &str = "https://dd.weather.gc.ca/citypage_weather/xml/XX/XXXXXXXXXX.xml";
pub const DEFAULT_FONT_PATH: &str = "font/Font.ttc";
pub const DEFAULT_ICON_DIR: &str = "icons";
pub const DEFAULT_LOG_FILE: &str = "weather_dashboard_activity.log";
pub const DEFAULT_PBM_OUTPUT: &str = "dashboard.pbm";

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
///
/// Every field is optional so a YAML file may name only what it changes;
/// accessors fall back to the built-in defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Display label for the site; unset means "whatever the feed says"
    pub location: Option<String>,
    pub feed_url: Option<String>,
    pub font_path: Option<PathBuf>,
    /// Draw with the built-in bitmap faces instead of `font_path`
    pub builtin_fonts: Option<bool>,
    pub icon_dir: Option<PathBuf>,
    pub log_level: Option<String>,     // e.g., "info" | "debug"
    pub log_file: Option<PathBuf>,
    pub history: Option<HistoryConfig>,
    pub display: Option<DisplayConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            location: None,
            feed_url: Some(DEFAULT_FEED_URL.to_string()),
            font_path: Some(PathBuf::from(DEFAULT_FONT_PATH)),
            builtin_fonts: Some(false),
            icon_dir: Some(PathBuf::from(DEFAULT_ICON_DIR)),
            log_level: Some("info".to_string()),
            log_file: Some(PathBuf::from(DEFAULT_LOG_FILE)),
            history: Some(HistoryConfig::default()),
            display: Some(DisplayConfig::default()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HistoryConfig {
    pub enabled: Option<bool>,
    /// directory holding both CSV logs
    pub dir: Option<PathBuf>,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            enabled: Some(true),
            dir: Some(PathBuf::from(".")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DisplayConfig {
    pub driver: Option<DriverKind>, // <- strongly-typed driver selection
    pub invert: Option<bool>,
    /// image path for the pbm driver
    pub output: Option<PathBuf>,
    pub bus: Option<BusConfig>,     // <- spi wiring for the panel
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            driver: Some(DriverKind::Pbm),
            invert: Some(false),
            output: Some(PathBuf::from(DEFAULT_PBM_OUTPUT)),
            bus: Some(BusConfig::default()),
        }
    }
}

impl DisplayConfig {
    pub fn driver(&self) -> DriverKind {
        self.driver.unwrap_or(DriverKind::Pbm)
    }

    pub fn invert(&self) -> bool {
        self.invert.unwrap_or(false)
    }

    pub fn output(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_PBM_OUTPUT))
    }

    pub fn bus(&self) -> BusConfig {
        self.bus.clone().unwrap_or_default()
    }
}

/// Waveshare HAT wiring, BCM numbering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BusConfig {
    pub spi: String,    // e.g. "/dev/spidev0.0"
    pub dc_pin: u64,
    pub rst_pin: u64,
    pub busy_pin: u64,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            spi: "/dev/spidev0.0".to_string(),
            dc_pin: 25,
            rst_pin: 17,
            busy_pin: 24,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DriverKind {
    /// write a PBM image file
    Pbm,
    /// Waveshare 7.5" V2 e-paper
    #[value(name = "waveshare7in5v2")]
    Waveshare7in5V2,
}

impl Config {
    /// No keys set at all, the shape of an empty YAML file.
    pub fn empty() -> Self {
        Self {
            location: None,
            feed_url: None,
            font_path: None,
            builtin_fonts: None,
            icon_dir: None,
            log_level: None,
            log_file: None,
            history: None,
            display: None,
        }
    }

    /// Configured label, if any. The feed name and placeholder are applied later.
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    pub fn feed_url(&self) -> &str {
        self.feed_url.as_deref().unwrap_or(DEFAULT_FEED_URL)
    }

    pub fn font_path(&self) -> PathBuf {
        self.font_path.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_FONT_PATH))
    }

    pub fn builtin_fonts(&self) -> bool {
        self.builtin_fonts.unwrap_or(false)
    }

    pub fn icon_dir(&self) -> PathBuf {
        self.icon_dir.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_ICON_DIR))
    }

    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or("info")
    }

    pub fn log_file(&self) -> PathBuf {
        self.log_file.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE))
    }

    pub fn history_enabled(&self) -> bool {
        self.history.as_ref().and_then(|h| h.enabled).unwrap_or(true)
    }

    pub fn history_dir(&self) -> PathBuf {
        self.history
            .as_ref()
            .and_then(|h| h.dir.clone())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn display(&self) -> DisplayConfig {
        self.display.clone().unwrap_or_default()
    }
}

/// CLI overrides. All fields are Options so we can layer them over YAML.
#[derive(Debug, Parser, Clone, Default)]
#[command(name = "wxpaper", version, about = "Weather dashboard for a 7.5\" e-paper panel")]
pub struct Cli {
    /// Path to a YAML config file (overrides search)
    #[arg(long, short = 'c', value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    /// Enable debug log level
    #[arg(long, short = 'v', alias = "verbose", action = ArgAction::SetTrue)]
    pub debug: bool,
    /// Location label shown in the header
    #[arg(long, short = 'L')]
    pub location: Option<String>,
    /// Citypage XML feed URL
    #[arg(long, short = 'U')]
    pub feed_url: Option<String>,
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub font_path: Option<PathBuf>,
    /// Draw with the built-in bitmap faces (preview without a font file)
    #[arg(long, action = ArgAction::SetTrue)]
    pub builtin_fonts: bool,
    #[arg(long, value_hint = ValueHint::DirPath)]
    pub icon_dir: Option<PathBuf>,
    #[arg(long)]
    pub log_level: Option<String>,
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub log_file: Option<PathBuf>,
    #[arg(long, value_hint = ValueHint::DirPath)]
    pub history_dir: Option<PathBuf>,
    /// Skip writing the CSV history
    #[arg(long, action = ArgAction::SetTrue)]
    pub no_history: bool,
    #[arg(long, value_enum)]
    pub display_driver: Option<DriverKind>,
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub display_output: Option<PathBuf>,
    #[arg(long, action = ArgAction::Set)]
    pub display_invert: Option<bool>,
    /// dump fully merged config (after overrides) and exit
    #[arg(long, action = ArgAction::SetTrue)]
    pub dump_config: bool,
}

/// Public entry point: parse CLI, read YAML, merge, validate.
pub fn load() -> Result<Config, ConfigError> {
    let cli = Cli::parse();
    let cfg = load_from(&cli)?;

    if cli.dump_config {
        // Pretty YAML of effective config (nice for debugging)
        let s = serde_yaml::to_string(&cfg)?;
        println!("{s}");
        std::process::exit(0);
    }

    Ok(cfg)
}

/// Layer defaults, YAML and `cli` into one validated config.
pub fn load_from(cli: &Cli) -> Result<Config, ConfigError> {
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
    // XDG-style: ~/.config/wxpaper/config.yaml
    if let Some(home) = home_dir() {
        let p = home.join(".config/wxpaper/config.yaml");
        if p.exists() { return Some(p) }
        let p = home.join(".config/wxpaper.yaml");
        if p.exists() { return Some(p) }
    }
    // project local
    for candidate in &["wxpaper.yaml", "config.yaml", "config/wxpaper.yaml"] {
        let p = PathBuf::from(candidate);
        if p.exists() { return Some(p) }
    }
    None
}

fn read_yaml(path: &Path) -> Result<Config, ConfigError> {
    let s = fs::read_to_string(path)?;
    parse_yaml(&s)
}

/// Keys the text leaves out stay `None`, so a merge leaves them alone.
fn parse_yaml(s: &str) -> Result<Config, ConfigError> {
    let cfg = serde_yaml::from_str::<Option<Config>>(s)?.unwrap_or_else(Config::empty);
    Ok(cfg)
}

/// Shallow merge `src` into `dst`, Option-by-Option.
fn merge(dst: &mut Config, src: Config) {
    // top-level
    if src.location.is_some()       { dst.location = src.location; }
    if src.feed_url.is_some()       { dst.feed_url = src.feed_url; }
    if src.font_path.is_some()      { dst.font_path = src.font_path; }
    if src.builtin_fonts.is_some()  { dst.builtin_fonts = src.builtin_fonts; }
    if src.icon_dir.is_some()       { dst.icon_dir = src.icon_dir; }
    if src.log_level.is_some()      { dst.log_level = src.log_level; }
    if src.log_file.is_some()       { dst.log_file = src.log_file; }
    // history
    match (&mut dst.history, src.history) {
        (None, Some(h)) => dst.history = Some(h),
        (Some(d), Some(s)) => merge_history(d, s),
        _ => {}
    }
    // display
    match (&mut dst.display, src.display) {
        (None, Some(c)) => dst.display = Some(c),
        (Some(d), Some(s)) => merge_display(d, s),
        _ => {}
    }
}

fn merge_history(dst: &mut HistoryConfig, src: HistoryConfig) {
    if src.enabled.is_some()     { dst.enabled = src.enabled; }
    if src.dir.is_some()         { dst.dir = src.dir; }
}

fn merge_display(dst: &mut DisplayConfig, src: DisplayConfig) {
    if src.driver.is_some()      { dst.driver = src.driver; }
    if src.invert.is_some()      { dst.invert = src.invert; }
    if src.output.is_some()      { dst.output = src.output; }
    if src.bus.is_some()         { dst.bus = src.bus; }
}

fn apply_cli_overrides(cfg: &mut Config, cli: &Cli) {
    if cli.location.is_some()      { cfg.location = cli.location.clone(); }
    if cli.feed_url.is_some()      { cfg.feed_url = cli.feed_url.clone(); }
    if cli.font_path.is_some()     { cfg.font_path = cli.font_path.clone(); }
    if cli.builtin_fonts           { cfg.builtin_fonts = Some(true); }
    if cli.icon_dir.is_some()      { cfg.icon_dir = cli.icon_dir.clone(); }
    if cli.log_level.is_some()     { cfg.log_level = cli.log_level.clone(); }
    if cli.debug                   { cfg.log_level = Some("debug".to_string()); }
    if cli.log_file.is_some()      { cfg.log_file = cli.log_file.clone(); }

    if cli.history_dir.is_some() || cli.no_history {
        let history = cfg.history.get_or_insert_with(HistoryConfig::default);
        if cli.history_dir.is_some() { history.dir = cli.history_dir.clone(); }
        if cli.no_history            { history.enabled = Some(false); }
    }

    let any_display = cli.display_driver.is_some()
        || cli.display_output.is_some()
        || cli.display_invert.is_some();
    if any_display {
        let display = cfg.display.get_or_insert_with(DisplayConfig::default);
        if cli.display_driver.is_some()  { display.driver = cli.display_driver; }
        if cli.display_output.is_some()  { display.output = cli.display_output.clone(); }
        if cli.display_invert.is_some()  { display.invert = cli.display_invert; }
    }
}

/// Put any invariants here (required fields, ranges, etc.)
fn validate(cfg: &Config) -> Result<(), ConfigError> {
    let url = cfg.feed_url();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::Validation(format!("feed_url must be an http(s) URL, got {:?}", url)));
    }
    if let Some(level) = cfg.log_level.as_deref() {
        if level.parse::<log::LevelFilter>().is_err() {
            return Err(ConfigError::Validation(format!(
                "log_level must be one of off|error|warn|info|debug|trace, got {:?}", level
            )));
        }
    }
    if let Some(display) = cfg.display.as_ref() {
        if display.driver() == DriverKind::Pbm && display.output().as_os_str().is_empty() {
            return Err(ConfigError::Validation("display output path must not be empty".into()));
        }
        if display.driver() == DriverKind::Waveshare7in5V2 {
            let bus = display.bus();
            if bus.spi.is_empty() {
                return Err(ConfigError::Validation("display bus spi device must be set".into()));
            }
            if bus.dc_pin == bus.rst_pin || bus.dc_pin == bus.busy_pin || bus.rst_pin == bus.busy_pin {
                return Err(ConfigError::Validation("display bus pins must be distinct".into()));
            }
        }
    }
    Ok(())
}
