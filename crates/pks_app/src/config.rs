use std::sync::Arc;

use chrono::Utc;
use pks_engine::{BackendSettings, EngineConfig};

/// Environment override for the backend base URL.
pub const BACKEND_URL_ENV: &str = "PKS_BACKEND_URL";

/// Resolve the engine configuration: an explicit flag wins, then the
/// environment, then the built-in default.
pub fn engine_config(backend_url_flag: Option<&str>) -> EngineConfig {
    let backend = BackendSettings {
        base_url: resolve_base_url(backend_url_flag),
        ..BackendSettings::default()
    };
    EngineConfig::new(backend, Arc::new(|| Utc::now().to_rfc3339()))
}

fn resolve_base_url(flag: Option<&str>) -> String {
    flag.map(str::to_string)
        .or_else(|| {
            std::env::var(BACKEND_URL_ENV)
                .ok()
                .filter(|value| !value.trim().is_empty())
        })
        .unwrap_or_else(|| pks_engine::DEFAULT_BASE_URL.to_string())
}
