// SPDX-License-Identifier: MIT
//
// Configuration for tilepaint.
//
// Precedence, lowest to highest: built-in defaults, the TOML file
// (`--config` or `<config_dir>/tilepaint/config.toml`), environment
// variables, then command-line flags. The merged result is validated once.
//
//   scroll_rate = 4
//   tick_ms     = 30
//   max_pairs   = 32767
//   prefixes    = ["^["]
//   codepage    = 0x2600
//   new_width   = 80
//   new_height  = 25
//   new_file    = "untitled.tile"
//   viewer      = "less -R"        # $PAGER wins when set
//   debug       = false
//   log_file    = "/tmp/tilepaint.log"
//
//   [keys]
//   "^[q" = "quit"

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use clap::Parser;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use tp_editor::editor::Settings;
use tp_editor::keymap::{Keymap, UnknownCommand};
use tp_term::event_loop::LoopConfig;
use tp_tile::palette::DEFAULT_MAX_PAIRS;

// ─── CLI ────────────────────────────────────────────────────────────────────

/// Command-line arguments.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "tilepaint")]
#[command(version)]
#[command(about = "Paint colored character tiles in the terminal", long_about = None)]
pub struct CliArgs {
    /// Quit on the first error instead of showing it
    #[arg(short, long)]
    pub debug: bool,

    /// Path to a config file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Cells moved by the arrow keys
    #[arg(long, value_name = "N")]
    pub scroll_rate: Option<u16>,

    /// Where to write the log
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Tiles to open; the first one that loads is edited
    #[arg(value_name = "FILES")]
    pub files: Vec<PathBuf>,
}

// ─── Errors ─────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

// ─── Config ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_scroll_rate")]
    pub scroll_rate: u16,

    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,

    #[serde(default = "default_max_pairs")]
    pub max_pairs: u16,

    #[serde(default = "default_prefixes")]
    pub prefixes: Vec<String>,

    #[serde(default = "default_codepage")]
    pub codepage: u32,

    #[serde(default = "default_new_width")]
    pub new_width: usize,

    #[serde(default = "default_new_height")]
    pub new_height: usize,

    #[serde(default = "default_new_file")]
    pub new_file: PathBuf,

    #[serde(default = "default_viewer")]
    pub viewer: String,

    #[serde(default)]
    pub debug: bool,

    #[serde(default)]
    pub log_file: Option<PathBuf>,

    /// Key name → command name, applied over the default keymap.
    #[serde(default)]
    pub keys: BTreeMap<String, String>,

    /// Problems met while loading that did not stop it. Logged once
    /// logging is up.
    #[serde(skip)]
    pub warnings: Vec<String>,
}

const fn default_scroll_rate() -> u16 {
    4
}

const fn default_tick_ms() -> u64 {
    30
}

const fn default_max_pairs() -> u16 {
    DEFAULT_MAX_PAIRS
}

fn default_prefixes() -> Vec<String> {
    vec![tp_editor::keys::ESCAPE.to_owned()]
}

const fn default_codepage() -> u32 {
    0x2600
}

const fn default_new_width() -> usize {
    80
}

const fn default_new_height() -> usize {
    25
}

fn default_new_file() -> PathBuf {
    PathBuf::from("untitled.tile")
}

fn default_viewer() -> String {
    "less -R".to_owned()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scroll_rate: default_scroll_rate(),
            tick_ms: default_tick_ms(),
            max_pairs: default_max_pairs(),
            prefixes: default_prefixes(),
            codepage: default_codepage(),
            new_width: default_new_width(),
            new_height: default_new_height(),
            new_file: default_new_file(),
            viewer: default_viewer(),
            debug: false,
            log_file: None,
            keys: BTreeMap::new(),
            warnings: Vec::new(),
        }
    }
}

impl Config {
    /// Build the effective configuration.
    ///
    /// A config file named with `--config` must load. The default file is
    /// optional, and a broken one only produces a warning.
    pub fn load_with_args(args: &CliArgs) -> Result<Self, ConfigError> {
        let mut config = match &args.config {
            Some(path) => Self::load_from_file(path)?,
            None => Self::load_default_file(),
        };
        config.apply_env_vars(|name| std::env::var(name).ok());
        config.apply_cli_args(args);
        config.validate()?;
        Ok(config)
    }

    fn load_default_file() -> Self {
        let Some(path) = Self::default_config_path().filter(|p| p.exists()) else {
            return Self::default();
        };
        Self::load_from_file(&path).unwrap_or_else(|e| Self {
            warnings: vec![format!("{e}; using defaults")],
            ..Self::default()
        })
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// `$PAGER` replaces the viewer command.
    fn apply_env_vars(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(pager) = var("PAGER").filter(|p| !p.trim().is_empty()) {
            self.viewer = pager;
        }
    }

    fn apply_cli_args(&mut self, args: &CliArgs) {
        if args.debug {
            self.debug = true;
        }
        if let Some(rate) = args.scroll_rate {
            self.scroll_rate = rate;
        }
        if let Some(path) = &args.log_file {
            self.log_file = Some(path.clone());
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("scroll_rate", self.scroll_rate == 0),
            ("tick_ms", self.tick_ms == 0),
            ("max_pairs", self.max_pairs == 0),
            ("new_width", self.new_width == 0),
            ("new_height", self.new_height == 0),
        ];
        if let Some(&(field, _)) = positive.iter().find(|(_, zero)| *zero) {
            return Err(ConfigError::Invalid {
                field,
                reason: "must be greater than zero".into(),
            });
        }
        if self.viewer.split_whitespace().next().is_none() {
            return Err(ConfigError::Invalid {
                field: "viewer",
                reason: "empty command".into(),
            });
        }
        self.keymap().map(drop)
    }

    /// The default config file location.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("tilepaint").join("config.toml"))
    }

    /// Where to log: `log_file`, else the platform cache directory.
    pub fn log_path(&self) -> Option<PathBuf> {
        self.log_file
            .clone()
            .or_else(|| dirs::cache_dir().map(|p| p.join("tilepaint").join("tilepaint.log")))
    }

    // ─── Views for the other crates ─────────────────────────────────────

    pub fn settings(&self) -> Settings {
        Settings {
            scroll_rate: i32::from(self.scroll_rate),
            prefixes: self.prefixes.clone(),
            codepage: self.codepage,
            debug: self.debug,
        }
    }

    pub fn keymap(&self) -> Result<Keymap, ConfigError> {
        Keymap::with_overrides(self.keys.iter().map(|(k, v)| (k.as_str(), v.as_str()))).map_err(
            |UnknownCommand(name)| ConfigError::Invalid {
                field: "keys",
                reason: format!("unknown command '{name}'"),
            },
        )
    }

    pub const fn loop_config(&self) -> LoopConfig {
        LoopConfig::from_millis(self.tick_ms)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tp_editor::keymap::Command;

    fn write_config(text: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, text).unwrap();
        (dir, path)
    }

    fn args_with(path: &Path) -> CliArgs {
        CliArgs {
            config: Some(path.to_path_buf()),
            ..CliArgs::default()
        }
    }

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.scroll_rate, 4);
        assert_eq!(config.tick_ms, 30);
        assert_eq!(config.max_pairs, 32767);
        assert_eq!(config.prefixes, vec!["^[".to_owned()]);
        assert_eq!(config.codepage, 0x2600);
        assert_eq!((config.new_width, config.new_height), (80, 25));
        assert_eq!(config.new_file, PathBuf::from("untitled.tile"));
        assert_eq!(config.viewer, "less -R");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let (_dir, path) = write_config("scroll_rate = 8\ncodepage = 0x2500\n");
        let config = Config::load_from_file(&path).unwrap();
        assert_eq!(config.scroll_rate, 8);
        assert_eq!(config.codepage, 0x2500);
        assert_eq!(config.tick_ms, 30);
    }

    #[test]
    fn cli_overrides_file() {
        let (_dir, path) = write_config("scroll_rate = 8\n");
        let args = CliArgs {
            scroll_rate: Some(2),
            debug: true,
            log_file: Some(PathBuf::from("/tmp/tp.log")),
            ..args_with(&path)
        };
        let config = Config::load_with_args(&args).unwrap();
        assert_eq!(config.scroll_rate, 2);
        assert!(config.debug);
        assert_eq!(config.log_path(), Some(PathBuf::from("/tmp/tp.log")));
    }

    #[test]
    fn explicit_file_must_parse() {
        let (_dir, path) = write_config("scroll_rate = \"fast\"\n");
        let err = Config::load_with_args(&args_with(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }), "{err}");
    }

    #[test]
    fn explicit_file_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load_with_args(&args_with(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }), "{err}");
    }

    #[test]
    fn zero_values_are_rejected() {
        for text in ["scroll_rate = 0", "tick_ms = 0", "max_pairs = 0", "new_width = 0"] {
            let (_dir, path) = write_config(text);
            let err = Config::load_with_args(&args_with(&path)).unwrap_err();
            assert!(err.to_string().contains("must be greater than zero"), "{text}: {err}");
        }
    }

    #[test]
    fn key_overrides() {
        let (_dir, path) = write_config("[keys]\n\"^[q\" = \"quit\"\nq = \"redraw\"\n");
        let config = Config::load_with_args(&args_with(&path)).unwrap();
        let keymap = config.keymap().unwrap();
        assert_eq!(keymap.get("^[q"), Some(Command::Quit));
        assert_eq!(keymap.get("q"), Some(Command::Redraw));
        assert_eq!(keymap.get("space"), Some(Command::PaintChar));
    }

    #[test]
    fn unknown_command_is_rejected() {
        let (_dir, path) = write_config("[keys]\nq = \"vanish\"\n");
        let err = Config::load_with_args(&args_with(&path)).unwrap_err();
        assert_eq!(err.to_string(), "invalid keys: unknown command 'vanish'");
    }

    #[test]
    fn pager_replaces_viewer() {
        let mut config = Config::default();
        config.apply_env_vars(|name| (name == "PAGER").then(|| "most".to_owned()));
        assert_eq!(config.viewer, "most");

        let mut config = Config::default();
        config.apply_env_vars(|name| (name == "PAGER").then(|| "  ".to_owned()));
        assert_eq!(config.viewer, "less -R");
    }

    #[test]
    fn settings_view() {
        let config = Config {
            scroll_rate: 6,
            debug: true,
            ..Config::default()
        };
        let settings = config.settings();
        assert_eq!(settings.scroll_rate, 6);
        assert!(settings.debug);
        assert_eq!(settings.codepage, 0x2600);
        assert_eq!(config.loop_config(), LoopConfig::from_millis(30));
    }
}
