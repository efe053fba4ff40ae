use anyhow::{Context, Result};

use crate::{cli::CafeArgs, reference::Menu};

pub const DEFAULT_SENTINELS: [&str; 2] = ["UNKNOWN", "ERROR"];

/// Everything the cafe pipeline needs besides the data itself.
#[derive(Debug, Clone)]
pub struct CleaningConfig {
    /// Tokens that mean "missing" in categorical cells. Matched exactly.
    pub sentinels: Vec<String>,
    pub menu: Menu,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            sentinels: DEFAULT_SENTINELS.iter().map(|s| s.to_string()).collect(),
            menu: Menu::cafe_default(),
        }
    }
}

impl CleaningConfig {
    pub fn from_args(args: &CafeArgs) -> Result<Self> {
        let mut config = Self::default();
        let sentinels = args
            .sentinels
            .iter()
            .flat_map(|s| s.split(','))
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect::<Vec<_>>();
        if !sentinels.is_empty() {
            config.sentinels = sentinels;
        }
        if let Some(path) = &args.menu {
            config.menu = Menu::load(path).with_context(|| format!("Loading menu from {path:?}"))?;
        }
        Ok(config)
    }
}
