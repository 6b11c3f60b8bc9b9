use anyhow::{bail, Context, Result};
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

use crate::{config::yml_settings::EngineSettings, domain::SearchEngine, validation};

pub const DEFAULT_CONFIG_FILE: &str = "engines.yml";

impl From<EngineSettings> for SearchEngine {
    fn from(value: EngineSettings) -> Self {
        Self {
            alias: value.alias,
            name: value.name,
            url: value.url,
            description: value.description,
            encode: value.encode.unwrap_or(true),
        }
    }
}

/// Search engines keyed by alias
#[derive(Debug, Default)]
pub struct EngineCatalog {
    engines: HashMap<String, SearchEngine>,
}

impl EngineCatalog {
    pub fn from_settings(settings: Vec<EngineSettings>) -> Result<Self> {
        let mut engines = HashMap::new();

        for engine in settings.into_iter().map(SearchEngine::from) {
            if engine.alias.trim().is_empty() {
                bail!("Engine '{}' has an empty alias", engine.name);
            }

            for issue in validation::lint_template(&engine.url) {
                warn!(alias = %engine.alias, "{}", issue);
            }

            if let Some(previous) = engines.insert(engine.alias.clone(), engine) {
                bail!("Duplicate alias: {}", previous.alias);
            }
        }

        Ok(Self { engines })
    }

    pub fn from_yaml(yml: &str) -> Result<Self> {
        let settings: Vec<EngineSettings> =
            serde_yaml::from_str(yml).context("Invalid engine configuration")?;
        Self::from_settings(settings)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yml = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        let catalog = Self::from_yaml(&yml)
            .with_context(|| format!("Could not load engines from {}", path.display()))?;
        info!(path = %path.display(), engines = catalog.len(), "Loaded engine catalog");
        Ok(catalog)
    }

    pub fn get(&self, alias: &str) -> Option<&SearchEngine> {
        self.engines.get(alias)
    }

    /// All engines, sorted by alias
    pub fn engines(&self) -> Vec<&SearchEngine> {
        let mut engines: Vec<&SearchEngine> = self.engines.values().collect();
        engines.sort_by(|a, b| a.alias.cmp(&b.alias));
        engines
    }

    pub fn len(&self) -> usize {
        self.engines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }
}
