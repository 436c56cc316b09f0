pub mod default;

use serde::Deserialize;
use std::env;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use tracing::{debug, error, info, warn};
use universal_config::ConfigLoader;

#[derive(Debug, Deserialize, Copy, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BarPosition {
    Top,
    #[default]
    Bottom,
}

#[derive(Debug, Deserialize, Copy, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    Start,
    Center,
    #[default]
    End,
}

#[derive(Debug, Deserialize, Copy, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct MarginConfig {
    pub top: i32,
    pub bottom: i32,
    pub left: i32,
    pub right: i32,
}

#[derive(Debug, Deserialize, Copy, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BusType {
    #[default]
    Session,
    System,
}

impl Display for BusType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Session => write!(f, "session"),
            Self::System => write!(f, "system"),
        }
    }
}

/// Where to find the power manager.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ServiceConfig {
    /// The message bus the service lives on.
    ///
    /// **Valid options**: `session`, `system`
    /// <br>
    /// **Default**: `session`
    pub bus: BusType,

    /// Well-known bus name of the service.
    ///
    /// **Default**: `org.gnome.PowerManager`
    pub name: String,

    /// Object path of the service.
    ///
    /// **Default**: `/org/gnome/PowerManager`
    pub path: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bus: BusType::default(),
            name: default::SERVICE_NAME.to_string(),
            path: default::SERVICE_PATH.to_string(),
        }
    }
}

/// Shell commands run by the indicator.
/// Each is executed through `sh -c`.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct CommandsConfig {
    /// Statistics viewer.
    /// `--device <id>` is appended when a device row is clicked.
    ///
    /// **Default**: `gnome-power-statistics`
    pub statistics: String,

    /// **Default**: `gnome-power-statistics --device wakeups`
    pub wakeups: String,

    /// **Default**: `gnome-control-center power`
    pub settings: String,

    /// Stops a misbehaving service before it is restarted.
    /// This blocks the UI until it exits.
    ///
    /// **Default**: `pkill -f "^gnome-power-manager$"`
    pub kill_service: String,

    /// **Default**: `gnome-power-manager`
    pub start_service: String,
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            statistics: default::statistics_command(),
            wakeups: default::wakeups_command(),
            settings: default::settings_command(),
            kill_service: default::kill_service_command(),
            start_service: default::start_service_command(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LabelsConfig {
    pub wakeups: String,
    pub settings: String,
}

impl Default for LabelsConfig {
    fn default() -> Self {
        Self {
            wakeups: default::WAKEUPS_LABEL.to_string(),
            settings: default::SETTINGS_LABEL.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// The screen edge to place the indicator on.
    ///
    /// **Valid options**: `top`, `bottom`
    /// <br>
    /// **Default**: `bottom`
    pub position: BarPosition,

    /// Where along the edge to place the indicator.
    ///
    /// **Valid options**: `start`, `center`, `end`
    /// <br>
    /// **Default**: `end`
    pub alignment: Alignment,

    pub margin: MarginConfig,

    /// The size to render icons at, in pixels.
    ///
    /// **Default**: `16`
    pub icon_size: i32,

    /// Whether to request the `-symbolic` variant of each icon.
    ///
    /// **Default**: `true`
    pub symbolic_icons: bool,

    pub service: ServiceConfig,
    pub commands: CommandsConfig,
    pub labels: LabelsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            position: BarPosition::default(),
            alignment: Alignment::default(),
            margin: MarginConfig::default(),
            icon_size: default::IconSize::Tiny as i32,
            symbolic_icons: true,
            service: ServiceConfig::default(),
            commands: CommandsConfig::default(),
            labels: LabelsConfig::default(),
        }
    }
}

impl Config {
    /// Loads the config from `path`, `POWERLET_CONFIG`,
    /// or the first `powerlet/config.*` found in the user config dir,
    /// in that order.
    ///
    /// Falls back to the default config if none can be loaded.
    pub fn load(path: Option<PathBuf>) -> Self {
        let path = path.or_else(|| env::var("POWERLET_CONFIG").ok().map(PathBuf::from));

        let config = path
            .map_or_else(
                || ConfigLoader::new("powerlet").find_and_load(),
                ConfigLoader::load,
            )
            .unwrap_or_else(|err| {
                error!("Failed to load config: {}", err);
                warn!("Falling back to the default config");
                info!("To customise powerlet, create a config in ~/.config/powerlet/");

                Self::default()
            });

        debug!("Loaded config: {config:?}");
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_default() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn defaults_target_gnome_power_manager() {
        let config = Config::default();

        assert_eq!(config.service.bus, BusType::Session);
        assert_eq!(config.service.name, "org.gnome.PowerManager");
        assert_eq!(config.service.path, "/org/gnome/PowerManager");
        assert_eq!(config.commands.start_service, "gnome-power-manager");
        assert_eq!(config.icon_size, 16);
    }

    #[test]
    fn partial_override() {
        let json = r#"{
            "position": "top",
            "service": { "bus": "system" },
            "commands": { "statistics": "my-stats" }
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();

        assert_eq!(config.position, BarPosition::Top);
        assert_eq!(config.alignment, Alignment::End);
        assert_eq!(config.service.bus, BusType::System);
        assert_eq!(config.service.name, "org.gnome.PowerManager");
        assert_eq!(config.commands.statistics, "my-stats");
        assert_eq!(config.commands.settings, "gnome-control-center power");
    }

    #[test]
    fn invalid_position() {
        let config = serde_json::from_str::<Config>(r#"{ "position": "left" }"#);
        assert!(config.is_err());
    }
}
