use std::path::PathBuf;

use serde::{Deserialize, Serialize};

const DEFAULT_CATALOG_URL: &str = "https://api.themoviedb.org/3";
const DEFAULT_STORE_ENDPOINT: &str = "https://cloud.appwrite.io/v1";

fn default_catalog_url() -> String {
    String::from(DEFAULT_CATALOG_URL)
}

fn default_store_endpoint() -> String {
    String::from(DEFAULT_STORE_ENDPOINT)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default)]
    pub tmdb_api_token: String,
    #[serde(default = "default_catalog_url")]
    pub tmdb_base_url: String,
    #[serde(default = "default_store_endpoint")]
    pub store_endpoint: String,
    #[serde(default)]
    pub store_project_id: String,
    #[serde(default)]
    pub store_api_key: Option<String>,
    #[serde(default)]
    pub store_database_id: String,
    #[serde(default)]
    pub store_collection_id: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            tmdb_api_token: String::new(),
            tmdb_base_url: default_catalog_url(),
            store_endpoint: default_store_endpoint(),
            store_project_id: String::new(),
            store_api_key: None,
            store_database_id: String::new(),
            store_collection_id: String::new(),
        }
    }
}

impl AppSettings {
    pub fn config_path() -> Option<PathBuf> {
        std::env::var("HOME").ok().map(|home| {
            PathBuf::from(home)
                .join(".config")
                .join("cinefind")
                .join("config.json")
        })
    }

    /// Config file first, then environment overrides on top, so a partial
    /// file plus a few exported variables is a valid setup.
    pub fn load() -> Self {
        let mut settings = Self::load_file().unwrap_or_default();
        settings.apply_env_overrides();
        settings
    }

    fn load_file() -> Option<Self> {
        let path = Self::config_path()?;
        let content = std::fs::read_to_string(path).ok()?;
        serde_json::from_str(&content).ok()
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(token) = std::env::var("TMDB_API_TOKEN") {
            self.tmdb_api_token = token;
        }
        if let Ok(endpoint) = std::env::var("COUNTER_STORE_ENDPOINT") {
            self.store_endpoint = endpoint;
        }
        if let Ok(project) = std::env::var("COUNTER_STORE_PROJECT_ID") {
            self.store_project_id = project;
        }
        if let Ok(key) = std::env::var("COUNTER_STORE_API_KEY") {
            self.store_api_key = Some(key);
        }
        if let Ok(database) = std::env::var("COUNTER_STORE_DATABASE_ID") {
            self.store_database_id = database;
        }
        if let Ok(collection) = std::env::var("COUNTER_STORE_COLLECTION_ID") {
            self.store_collection_id = collection;
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.tmdb_api_token.trim().is_empty()
    }

    /// Trending aggregation only works with a fully configured store; the
    /// app still browses the catalog without one.
    pub fn has_counter_store(&self) -> bool {
        !self.store_project_id.trim().is_empty()
            && !self.store_database_id.trim().is_empty()
            && !self.store_collection_id.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_fills_in_defaults() {
        let settings: AppSettings =
            serde_json::from_str(r#"{"tmdb_api_token": "token-123"}"#).unwrap();
        assert_eq!(settings.tmdb_api_token, "token-123");
        assert_eq!(settings.tmdb_base_url, DEFAULT_CATALOG_URL);
        assert_eq!(settings.store_endpoint, DEFAULT_STORE_ENDPOINT);
        assert!(!settings.has_counter_store());
    }

    #[test]
    fn validity_requires_a_catalog_token() {
        let mut settings = AppSettings::default();
        assert!(!settings.is_valid());
        settings.tmdb_api_token = String::from("  ");
        assert!(!settings.is_valid());
        settings.tmdb_api_token = String::from("token");
        assert!(settings.is_valid());
    }

    #[test]
    fn counter_store_needs_project_database_and_collection() {
        let mut settings = AppSettings {
            store_project_id: String::from("proj"),
            store_database_id: String::from("db"),
            ..AppSettings::default()
        };
        assert!(!settings.has_counter_store());
        settings.store_collection_id = String::from("metrics");
        assert!(settings.has_counter_store());
    }
}
