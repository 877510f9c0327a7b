#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use std::env;
use std::path;

use anyhow::bail;
use anyhow::Result;
use clap::ArgMatches;
use clap::Command;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use strum::EnumIter;
use strum::EnumVariantNames;
use strum::IntoEnumIterator;
use tokio::fs;

use crate::domain::models::SessionIdStyle;

static CONFIG: Lazy<DashMap<String, String>> = Lazy::new(DashMap::new);

#[derive(Clone, Copy, Debug, Eq, PartialEq, EnumIter, EnumVariantNames, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ConfigKey {
    ConfigFile,
    #[strum(serialize = "server-url")]
    ServerURL,
    AppName,
    RequestTimeout,
    HealthCheckTimeout,
    SessionIdStyle,
    AutoSession,
    Username,
}

fn default_config_path() -> path::PathBuf {
    #[cfg(not(target_os = "macos"))]
    let config_dir = dirs::config_dir();
    #[cfg(target_os = "macos")]
    let config_dir = dirs::home_dir().map(|home| return home.join(".config"));

    return config_dir
        .unwrap_or_else(env::temp_dir)
        .join("scribe/config.toml");
}

fn possible_values(cmd: &Command, key: ConfigKey) -> Vec<String> {
    let key_str = key.to_string();
    if let Some(arg) = cmd
        .get_arguments()
        .find(|e| return e.get_long() == Some(key_str.as_str()))
    {
        return arg
            .get_possible_values()
            .iter()
            .map(|e| return e.get_name().to_string())
            .collect::<Vec<String>>();
    }

    return vec![];
}

pub struct Config {}

impl Config {
    /// Returns the loaded value, or the default for keys that were never
    /// loaded.
    pub fn get(key: ConfigKey) -> String {
        if let Some(val) = CONFIG.get(&key.to_string()) {
            return val.to_string();
        }

        return Config::default(key);
    }

    pub fn set(key: ConfigKey, value: &str) {
        CONFIG.insert(key.to_string(), value.to_string());
    }

    pub fn get_bool(key: ConfigKey) -> bool {
        return Config::get(key) == "true";
    }

    pub fn default(key: ConfigKey) -> String {
        if key == ConfigKey::Username {
            let mut user = env::var("USER").unwrap_or_else(|_| return "".to_string());
            if user.is_empty() {
                user = "User".to_string();
            }

            return user;
        }

        if key == ConfigKey::ConfigFile {
            return default_config_path().to_string_lossy().to_string();
        }

        let default_session_id_style = SessionIdStyle::Timestamp.to_string();

        let res = match key {
            ConfigKey::ServerURL => "http://0.0.0.0:8080",
            ConfigKey::AppName => "multi_tool_agent",
            ConfigKey::RequestTimeout => "300000",
            ConfigKey::HealthCheckTimeout => "1000",
            ConfigKey::SessionIdStyle => &default_session_id_style,
            ConfigKey::AutoSession => "false",

            // Special
            ConfigKey::ConfigFile => "",
            ConfigKey::Username => "",
        };

        return res.to_string();
    }

    pub async fn load(cmd: Command, clap_arg_matches: Vec<&ArgMatches>) -> Result<()> {
        for key in ConfigKey::iter() {
            Config::set(key, &Config::default(key))
        }

        let mut config_file = Config::default(ConfigKey::ConfigFile);
        for matches in clap_arg_matches.as_slice() {
            if let Ok(Some(arg_config_file)) =
                matches.try_get_one::<String>(&ConfigKey::ConfigFile.to_string())
            {
                config_file = arg_config_file.to_string();
            }
        }

        let config_path = path::PathBuf::from(config_file);
        if config_path.exists() {
            let toml_str = fs::read_to_string(&config_path).await?;
            let doc = toml_str.parse::<toml_edit::Document>()?;

            for key in ConfigKey::iter() {
                let val = match doc.get(&key.to_string()) {
                    Some(val) => val,
                    None => continue,
                };

                // Use clap value parsers to do validation.
                let possible_values = possible_values(&cmd, key);

                let val_str = if let Some(val_int) = val.as_integer() {
                    val_int.to_string()
                } else if let Some(val_bool) = val.as_bool() {
                    val_bool.to_string()
                } else if let Some(val_str) = val.as_str() {
                    val_str.to_string()
                } else {
                    bail!(format!(
                        "{} has an unsupported value type for key '{key}'",
                        config_path.display()
                    ));
                };

                if val_str.is_empty() {
                    continue;
                }

                if !possible_values.is_empty() && !possible_values.contains(&val_str) {
                    bail!(format!(
                        "{} has an invalid value for key '{key}': {val_str}\nPossible values are: {}",
                        config_path.display(),
                        possible_values.join(", ")
                    ));
                }

                Config::set(key, &val_str);
            }
        }

        for key in ConfigKey::iter() {
            for matches in clap_arg_matches.as_slice() {
                if let Ok(Some(val)) = matches.try_get_one::<String>(&key.to_string()) {
                    if val.is_empty() {
                        continue;
                    }

                    Config::set(key, val)
                }
            }
        }

        tracing::debug!(
            username = Config::get(ConfigKey::Username),
            server_url = Config::get(ConfigKey::ServerURL),
            app_name = Config::get(ConfigKey::AppName),
            request_timeout = Config::get(ConfigKey::RequestTimeout),
            session_id_style = Config::get(ConfigKey::SessionIdStyle),
            auto_session = Config::get(ConfigKey::AutoSession),
            "config"
        );

        return Ok(());
    }

    pub fn serialize_default(cmd: Command) -> String {
        let toml_str = ConfigKey::iter()
            .filter_map(|key| {
                if key == ConfigKey::ConfigFile {
                    return None;
                }

                if key == ConfigKey::Username {
                    return Some(
                        "# Your user name displayed in all chat bubbles.\n# username = \"\""
                            .to_string(),
                    );
                }

                let key_str = key.to_string();
                let arg = cmd
                    .get_arguments()
                    .find(|e| return e.get_long() == Some(key_str.as_str()))?;

                let mut description = arg
                    .get_help()
                    .map(|help| return help.to_string())
                    .unwrap_or_default()
                    .split("[default:")
                    .next()
                    .unwrap_or_default()
                    .trim()
                    .to_string();

                let possible_values = possible_values(&cmd, key);
                if !possible_values.is_empty() {
                    description = format!(
                        "{description} [possible values: {}]",
                        possible_values.join(", ")
                    );
                }

                let mut val = Config::default(key);
                if val.is_empty() {
                    val = format!("# {key} = \"\"");
                } else if val.parse::<i64>().is_ok() || val.parse::<bool>().is_ok() {
                    val = format!("{key} = {val}");
                } else {
                    val = format!("{key} = \"{val}\"");
                }

                return Some(format!("# {description}\n{val}"));
            })
            .collect::<Vec<String>>()
            .join("\n\n");

        return toml_str;
    }
}
