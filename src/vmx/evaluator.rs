use anyhow::{Context, Result, ensure};
use chrono::Utc;
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::models::{AuditReport, CheckResult, SkippedFile, Status, ValidationReport};
use crate::utils::{hash_bytes, is_vmx};

use super::parser::{VmxConfig, parse};
use super::profile::Profile;
use super::rules::{self, Rule};

/// Run the full checklist against a parsed config.
pub fn evaluate(config: &VmxConfig) -> Vec<CheckResult> {
    evaluate_with(config, &rules::all())
}

/// Run the given rules in order, concatenating their results.
pub fn evaluate_with(config: &VmxConfig, rules: &[&dyn Rule]) -> Vec<CheckResult> {
    let mut results = Vec::new();
    for rule in rules {
        let found = rule.evaluate(config);
        debug!(rule = rule.id(), results = found.len(), "rule evaluated");
        results.extend(found);
    }
    results
}

/// Parse and evaluate raw .vmx text. Duplicate-key findings come first.
pub fn validate(content: &str, rules: &[&dyn Rule]) -> Vec<CheckResult> {
    let parsed = parse(content);
    debug!(
        settings = parsed.config.len(),
        duplicates = parsed.diagnostics.len(),
        "parsed vmx"
    );
    let mut results = parsed.diagnostics;
    results.extend(evaluate_with(&parsed.config, rules));
    results
}

/// Validate one file's contents and summarize the outcome.
pub fn build_report(file: &str, content: &str, profile: Option<&Profile>) -> ValidationReport {
    let rules = match profile {
        Some(p) => p.active_rules(),
        None => rules::all(),
    };
    let results = validate(content, &rules);
    let count = |status: Status| results.iter().filter(|r| r.status == status).count();

    ValidationReport {
        checked_at: Utc::now().to_rfc3339(),
        file: file.to_string(),
        sha256: hash_bytes(content.as_bytes()),
        profile: profile.map(|p| p.name.clone()),
        total_results: results.len(),
        pass_count: count(Status::Pass),
        fail_count: count(Status::Fail),
        warning_count: count(Status::Warning),
        info_count: count(Status::Info),
        results,
    }
}

/// Read and validate a single .vmx file.
pub fn validate_file(path: &Path, profile: Option<&Profile>) -> Result<ValidationReport> {
    ensure!(
        path.exists(),
        "The file '{}' was not found.",
        path.display()
    );
    if !is_vmx(path) {
        warn!(file = %path.display(), "file does not have a .vmx extension");
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read VMX file: {}", path.display()))?;
    Ok(build_report(&path.display().to_string(), &content, profile))
}

/// Validate a .vmx file, or every .vmx file under a directory.
pub fn audit_path(path: &str, profile: Option<&Profile>) -> Result<AuditReport> {
    let root = Path::new(path);
    let mut files = Vec::new();
    let mut skipped = Vec::new();

    if root.is_dir() {
        for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
            let file_path = entry.path();
            if !file_path.is_file() || !is_vmx(file_path) {
                continue;
            }
            match validate_file(file_path, profile) {
                Ok(report) => files.push(report),
                Err(e) => {
                    warn!(file = %file_path.display(), "skipping: {:#}", e);
                    skipped.push(SkippedFile {
                        path: file_path.display().to_string(),
                        error: format!("{:#}", e),
                    });
                }
            }
        }
        files.sort_by(|a, b| a.file.cmp(&b.file));
        skipped.sort_by(|a, b| a.path.cmp(&b.path));
        if files.is_empty() && skipped.is_empty() {
            warn!(path, "no .vmx files found");
        }
    } else {
        files.push(validate_file(root, profile)?);
    }

    let fail_count = files.iter().map(|f| f.fail_count).sum();
    let warning_count = files.iter().map(|f| f.warning_count).sum();

    Ok(AuditReport {
        checked_at: Utc::now().to_rfc3339(),
        path: path.to_string(),
        total_files: files.len(),
        files_with_failures: files.iter().filter(|f| f.fail_count > 0).count(),
        fail_count,
        warning_count,
        files,
        skipped,
    })
}
