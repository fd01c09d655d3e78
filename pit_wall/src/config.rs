use anyhow::Context;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use strategy_core::EngineConfig;

const CONFIG_FILE: &str = "config/pit_wall.json";

#[derive(Deserialize, Debug)]
pub struct FeedConfig {
    pub track_id: String,
    /// JSON catalog to use instead of the built-in one.
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,
    #[serde(default)]
    pub engine: EngineConfig,
}

impl FeedConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("feed config not found at {}", path.display()))?;
        serde_json::from_str(&data).with_context(|| format!("invalid feed config {}", path.display()))
    }
}

/// Locate the feed config whether started from the workspace root, the crate
/// directory or next to the binary.
pub fn resolve_config_path() -> PathBuf {
    if let Ok(path) = std::env::var("PIT_WALL_CONFIG") {
        return PathBuf::from(path);
    }

    let candidates = [
        PathBuf::from(CONFIG_FILE),
        PathBuf::from("pit_wall").join(CONFIG_FILE),
        {
            let mut p = std::env::current_exe().unwrap_or_else(|_| PathBuf::from("."));
            p.pop();
            p.push(CONFIG_FILE);
            p
        },
    ];

    for c in candidates {
        if c.exists() {
            return c;
        }
    }

    // load() reports the missing file
    PathBuf::from(CONFIG_FILE)
}
