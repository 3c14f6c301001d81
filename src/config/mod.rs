mod app_config;
mod providers;

pub use app_config::{AppConfig, CONFIG_FILE};
pub use providers::{ProvidersConfig, ResolvedService, PROVIDERS_FILE, PROVIDERS_TEMPLATE};
