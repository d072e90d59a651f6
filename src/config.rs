use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Employers queried when the config names none.
pub const DEFAULT_EMPLOYER_IDS: &[u64] = &[
    665449, 5554827, 32501, 3776, 4233, 4181, 39305, 1329, 478, 1122462,
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VacancyConfig {
    pub database: PathBuf,
    pub api_base_url: String,
    pub employer_ids: Vec<u64>,
    pub per_page: u32,
    pub vacancies_file: PathBuf,
    pub employers_file: PathBuf,
    pub user_agent: String,
    pub timeout_secs: Option<u64>,
}

impl Default for VacancyConfig {
    fn default() -> Self {
        Self {
            database: PathBuf::from("headhunter.db"),
            api_base_url: "https://api.hh.ru".to_string(),
            employer_ids: DEFAULT_EMPLOYER_IDS.to_vec(),
            per_page: 100,
            vacancies_file: PathBuf::from("vacancies.json"),
            employers_file: PathBuf::from("employers.json"),
            user_agent: format!("vacancydb/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: None,
        }
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("vacancydb.toml")
}

/// Load the config file, or defaults when it does not exist.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<VacancyConfig> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        tracing::debug!("No config at {}, using defaults", path.display());
        return Ok(VacancyConfig::default());
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: VacancyConfig = toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("invalid config {}: {}", path.display(), e))?;
    Ok(config)
}

pub fn write_config(path: &Path, config: &VacancyConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

/// Write a default config (with an optional database override) to `path`.
///
/// Whatever is already at `path` is never parsed, so `force` can replace a
/// broken file.
pub fn init_config(path: &Path, database: Option<PathBuf>, force: bool) -> anyhow::Result<VacancyConfig> {
    let mut config = VacancyConfig::default();
    if let Some(database) = database {
        config.database = database;
    }
    write_config(path, &config, force)?;
    Ok(config)
}

pub fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
