use crate::error::{BiteCastError, Result};
use crate::models::Location;
use dialoguer::{Input, MultiSelect, Password};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub lake: LakeConfig,
    #[serde(default)]
    pub openweathermap: Option<OpenWeatherMapConfig>,
    #[serde(default)]
    pub forecast: ForecastConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LakeConfig {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Key for the stored daily weather history of this lake's region
    #[serde(default = "default_region_id")]
    pub region_id: String,
}

fn default_region_id() -> String {
    "default".into()
}

impl LakeConfig {
    pub fn location(&self) -> Location {
        Location::new(self.latitude, self.longitude)
    }
}

#[derive(Clone, Deserialize, Serialize)]
pub struct OpenWeatherMapConfig {
    pub api_key: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl OpenWeatherMapConfig {
    pub fn is_usable(&self) -> bool {
        self.enabled && !self.api_key.is_empty()
    }
}

impl std::fmt::Debug for OpenWeatherMapConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenWeatherMapConfig")
            .field("api_key", &"[REDACTED]")
            .field("enabled", &self.enabled)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ForecastConfig {
    /// Species ids to score; empty scores every known species
    #[serde(default)]
    pub species: Vec<String>,
    #[serde(default = "default_history_days")]
    pub history_days: u32,
    #[serde(default = "default_cache_max_age")]
    pub cache_max_age_minutes: i64,
}

fn default_history_days() -> u32 {
    7
}

fn default_cache_max_age() -> i64 {
    60
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            species: Vec::new(),
            history_days: default_history_days(),
            cache_max_age_minutes: default_cache_max_age(),
        }
    }
}

impl Config {
    pub fn load(config_override: Option<PathBuf>) -> Result<Self> {
        let config_path = match config_override {
            Some(p) => p,
            None => Self::find_config_path()?,
        };

        if !config_path.exists() {
            return Err(BiteCastError::Config(format!(
                "Config file not found at {:?}. Run `bitecast init` to set up.",
                config_path
            )));
        }

        Self::from_file(&config_path)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .map_err(|e| BiteCastError::Config(format!("Failed to read config: {}", e)))?;
        Self::parse(&config_str)
    }

    /// Parse YAML after `${VAR}` substitution and validate it
    pub fn parse(content: &str) -> Result<Self> {
        let content = Self::substitute_env_vars(content);

        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| BiteCastError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(-90.0..=90.0).contains(&self.lake.latitude) {
            return Err(BiteCastError::Config(format!(
                "lake.latitude {} is outside -90..90",
                self.lake.latitude
            )));
        }
        if !(-180.0..=180.0).contains(&self.lake.longitude) {
            return Err(BiteCastError::Config(format!(
                "lake.longitude {} is outside -180..180",
                self.lake.longitude
            )));
        }
        if self.forecast.cache_max_age_minutes < 0 {
            return Err(BiteCastError::Config(
                "forecast.cache_max_age_minutes must not be negative".into(),
            ));
        }
        Ok(())
    }

    /// Search for config.yaml in standard locations.
    /// Returns the path of the first found config, or the XDG default path if none found.
    fn find_config_path() -> Result<PathBuf> {
        let local_config = PathBuf::from("config/config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("bitecast").join("config.yaml");
            if xdg_config.exists() {
                return Ok(xdg_config);
            }
        }

        Self::default_config_path()
    }

    /// Returns true if a config file can be found in any standard location.
    pub fn exists(config_override: Option<&PathBuf>) -> bool {
        match config_override {
            Some(p) => p.exists(),
            None => Self::find_config_path()
                .map(|p| p.exists())
                .unwrap_or(false),
        }
    }

    /// Default path for writing new config files (~/.config/bitecast/config.yaml).
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| BiteCastError::Config("Cannot determine config directory".into()))?
            .join("bitecast");
        Ok(config_dir.join("config.yaml"))
    }

    /// Run interactive setup prompts and write config to disk.
    /// Returns the loaded Config and the path it was written to.
    pub fn setup_interactive(species_ids: &[&str]) -> Result<(Self, PathBuf)> {
        println!();
        println!("Let's set up BiteCast!");
        println!();

        println!("Lake");
        let name: String = Input::new()
            .with_prompt("  Lake name")
            .default("Mille Lacs".into())
            .interact_text()
            .map_err(input_error)?;

        let latitude: f64 = Input::new()
            .with_prompt("  Latitude")
            .default(46.25)
            .validate_with(|v: &f64| {
                if (-90.0..=90.0).contains(v) {
                    Ok(())
                } else {
                    Err("latitude must be between -90 and 90")
                }
            })
            .interact_text()
            .map_err(input_error)?;

        let longitude: f64 = Input::new()
            .with_prompt("  Longitude")
            .default(-93.65)
            .validate_with(|v: &f64| {
                if (-180.0..=180.0).contains(v) {
                    Ok(())
                } else {
                    Err("longitude must be between -180 and 180")
                }
            })
            .interact_text()
            .map_err(input_error)?;

        let region_id: String = Input::new()
            .with_prompt("  Weather history region id")
            .default(default_region_id())
            .interact_text()
            .map_err(input_error)?;

        println!();

        println!("OpenWeatherMap (leave API key blank to use forecast files only)");
        let owm_api_key: String = Password::new()
            .with_prompt("  API key")
            .allow_empty_password(true)
            .interact()
            .map_err(input_error)?;

        let openweathermap = (!owm_api_key.is_empty()).then(|| OpenWeatherMapConfig {
            api_key: owm_api_key,
            enabled: true,
        });

        println!();

        println!("Species (space to toggle, enter to accept; none selected means all)");
        let picked = MultiSelect::new()
            .with_prompt("  Target species")
            .items(species_ids)
            .interact()
            .map_err(input_error)?;
        let species = picked.into_iter().map(|i| species_ids[i].to_string()).collect();

        println!();

        let config = Config {
            lake: LakeConfig {
                name,
                latitude,
                longitude,
                region_id,
            },
            openweathermap,
            forecast: ForecastConfig {
                species,
                ..ForecastConfig::default()
            },
        };

        let config_path = Self::default_config_path()?;
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml::to_string(&config)
            .map_err(|e| BiteCastError::Config(format!("Failed to serialize config: {}", e)))?;

        let content = format!(
            "# BiteCast Configuration\n# Generated by `bitecast init`\n# Environment variable substitution (${{VAR}}) is supported.\n\n{}",
            yaml
        );
        std::fs::write(&config_path, content)?;

        println!("Configuration saved to {}", config_path.display());
        println!();

        Ok((config, config_path))
    }

    fn substitute_env_vars(content: &str) -> String {
        let mut result = content.to_string();

        let Ok(re) = regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}") else {
            return result;
        };

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let placeholder = &cap[0];
            if let Ok(value) = std::env::var(var_name) {
                result = result.replace(placeholder, &value);
            }
        }

        result
    }

    pub fn data_dir(data_dir_override: Option<&PathBuf>) -> Result<PathBuf> {
        if let Some(dir) = data_dir_override {
            std::fs::create_dir_all(dir)?;
            return Ok(dir.clone());
        }

        if let Ok(dir) = std::env::var("BITECAST_DATA_DIR") {
            let p = PathBuf::from(dir);
            std::fs::create_dir_all(&p)?;
            return Ok(p);
        }

        let data_dir = dirs::data_dir()
            .ok_or_else(|| BiteCastError::Config("Cannot determine data directory".into()))?
            .join("bitecast");

        std::fs::create_dir_all(&data_dir)?;
        Ok(data_dir)
    }

    pub fn db_path(data_dir_override: Option<&PathBuf>) -> Result<PathBuf> {
        Ok(Self::data_dir(data_dir_override)?.join("bitecast.db"))
    }
}

fn input_error(e: dialoguer::Error) -> BiteCastError {
    BiteCastError::Config(format!("Input error: {}", e))
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lake: LakeConfig {
                name: "Mille Lacs".into(),
                latitude: 46.25,
                longitude: -93.65,
                region_id: default_region_id(),
            },
            openweathermap: None,
            forecast: ForecastConfig::default(),
        }
    }
}
