use std::path::Path;
use std::process::ExitCode;

use extracto_core::config::{load_config, LayoutConfig};
use extracto_core::error::ExtractoError;

pub fn show() -> Result<ExitCode, ExtractoError> {
    let json = serde_json::to_string_pretty(&LayoutConfig::default())?;
    println!("{json}");
    Ok(ExitCode::SUCCESS)
}

pub fn validate(file: &Path) -> Result<ExitCode, ExtractoError> {
    let config = load_config(file)?;
    let defaults = LayoutConfig::default();

    println!("Layout config '{}' is valid.", file.display());

    // Differences from the defaults, as JSON values.
    let current = serde_json::to_value(&config)?;
    let baseline = serde_json::to_value(&defaults)?;
    if let (Some(current), Some(baseline)) = (current.as_object(), baseline.as_object()) {
        let changed: Vec<String> = current
            .iter()
            .filter(|(k, v)| baseline.get(*k) != Some(*v))
            .map(|(k, v)| format!("{k} = {v}"))
            .collect();
        if changed.is_empty() {
            println!("  All thresholds at their defaults.");
        } else {
            println!("  Overrides:");
            for c in &changed {
                println!("    {c}");
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
