//! Rule engine for VMware `.vmx` files.
//!
//! [`parser`] turns raw text into a [`parser::VmxConfig`], [`rules`] holds the
//! checklist and [`evaluator`] runs it, producing [`crate::models::CheckResult`]s
//! in report order.

pub mod evaluator;
mod output;
pub mod parser;
pub mod profile;
pub mod rules;

use anyhow::Result;
use std::path::Path;
use tracing::info;

/// Validate a .vmx file (or a directory of them). Returns true if any check failed.
pub fn check_vmx(
    path: &str,
    profile_path: Option<&str>,
    format: &str,
    output_file: Option<&str>,
) -> Result<bool> {
    let profile = profile_path
        .map(|p| profile::load_profile(Path::new(p)))
        .transpose()?;
    let report = evaluator::audit_path(path, profile.as_ref())?;
    info!(
        files = report.total_files,
        failures = report.fail_count,
        warnings = report.warning_count,
        skipped = report.skipped.len(),
        "audit complete"
    );
    let has_failures = report.has_failures();

    match format {
        "json" => output::output_json(&report, output_file)?,
        _ => output::output_terminal(&report, profile.as_ref())?,
    }

    Ok(has_failures)
}

/// List the checks that would run, optionally narrowed by a profile.
pub fn list_rules(profile_path: Option<&str>) -> Result<()> {
    let profile = profile_path
        .map(|p| profile::load_profile(Path::new(p)))
        .transpose()?;
    let active = match &profile {
        Some(p) => p.active_rules(),
        None => rules::all(),
    };
    output::output_rules(&active, profile.as_ref())
}
