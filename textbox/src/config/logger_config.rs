use log::LevelFilter;
use serde::{Deserialize, Serialize};

/// Logger configuration used by the preview tool.
///
/// `app_level_filter` applies to the textbox crates, `level_filter` to everything else.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LoggerConfig {
    pub app_level_filter: LevelFilter,
    pub level_filter: LevelFilter,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self { app_level_filter: LevelFilter::Info, level_filter: LevelFilter::Warn }
    }
}

impl LoggerConfig {
    /// Installs `env_logger` with these filters. `RUST_LOG` still overrides them.
    pub fn init(&self) {
        let _ = env_logger::Builder::new()
            .filter_level(self.level_filter)
            .filter_module("textbox", self.app_level_filter)
            .filter_module("textbox_core", self.app_level_filter)
            .parse_default_env()
            .try_init();
    }
}
