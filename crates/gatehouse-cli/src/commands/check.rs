//! `gatehouse check` - validate a configuration file.
//!
//! Loads the main file and its services directory, then reports:
//! - duplicate provider and service ids
//! - trigger patterns that do not compile
//! - policies that reference unregistered providers or can never trigger

use anyhow::{Context, Result, bail};
use gatehouse_core::{ConfigFinding, GatehouseConfig, Severity};
use std::path::Path;

/// Count findings as (errors, warnings).
pub fn summarize(findings: &[ConfigFinding]) -> (usize, usize) {
    let errors = findings.iter().filter(|f| f.severity == Severity::Error).count();
    (errors, findings.len() - errors)
}

/// Run the check and print the findings. Fails if any error was found.
pub fn run_check(config_path: &Path) -> Result<()> {
    let config = GatehouseConfig::load_with_context(config_path)
        .with_context(|| format!("Failed to load configuration from {}", config_path.display()))?;

    let findings = config.validate();
    for finding in &findings {
        println!("{finding}");
    }

    let (errors, warnings) = summarize(&findings);
    println!(
        "{}: {} service(s), {} provider(s), {} error(s), {} warning(s)",
        config_path.display(),
        config.services.len(),
        config.providers.len(),
        errors,
        warnings
    );

    if errors > 0 {
        bail!("configuration has {errors} error(s)");
    }
    Ok(())
}
