//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# openapi-lint configuration

# Rule preset: "all", "arm" or "data-plane"
preset = "all"

# Severity at which the run fails: "info", "warning", "error" or "fatal"
fail_on = "error"

[validator]
# Document flavor(s): "arm", "data-plane", or a list such as ["arm", "data-plane"]
flavor = "arm"

# Passes to run: "individual", "composed" or "both"
pass = "both"

# Glob patterns selecting documents when a directory is given
include = ["**/*.json", "**/*.yaml", "**/*.yml"]

# Glob patterns to exclude from validation
exclude = [
    "**/examples/**",
    "**/node_modules/**",
]

# Rule configurations, keyed by rule id or name.
# Each rule can be enabled/disabled and have its severity overridden.

# [rules.R3018]
# enabled = false

# [rules.GuidUsage]
# severity = "info"
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    let config_path = Path::new("openapi-lint.toml");

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)?;

    println!("Created openapi-lint.toml");
    println!("\nNext steps:");
    println!("  1. Edit openapi-lint.toml to configure rules");
    println!("  2. Run: openapi-lint validate <path>");

    Ok(())
}
