use anyhow::{Context, Result};

use crate::config::{AppConfig, CONFIG_FILE, PROVIDERS_FILE, PROVIDERS_TEMPLATE};
use crate::ui::Output;

/// Write `config.toml` and `providers.toml` into the chosen scope
///
/// Existing files are left untouched.
pub fn initialize(local: bool) -> Result<()> {
    let output = Output::new();
    let config_dir = if local {
        AppConfig::local_dir()
    } else {
        AppConfig::global_dir()
    };
    let scope = AppConfig::get_scope_name(local, !local);

    std::fs::create_dir_all(&config_dir).with_context(|| {
        format!(
            "Failed to create config directory: {}",
            config_dir.display()
        )
    })?;

    let config_path = config_dir.join(CONFIG_FILE);
    if config_path.exists() {
        output.resource_action("Found", "config", &config_path);
    } else {
        let written = AppConfig::default().save_to(&config_dir)?;
        output.resource_action("Creating", "config", &written);
    }

    let providers_path = config_dir.join(PROVIDERS_FILE);
    if providers_path.exists() {
        output.resource_action("Found", "providers", &providers_path);
    } else {
        std::fs::write(&providers_path, PROVIDERS_TEMPLATE).with_context(|| {
            format!(
                "Failed to write providers config: {}",
                providers_path.display()
            )
        })?;
        output.resource_action("Creating", "providers", &providers_path);
        output.note("Set GROQ_API_KEY or fill in api_key in providers.toml");
    }

    let config = AppConfig::load_from_dir(&config_dir)?;
    output.note(&format!(
        "Knowledge files are read from {} and {}",
        config.csv_path().display(),
        config.pdf_path().display()
    ));

    output.finish("initialization", scope);

    Ok(())
}
