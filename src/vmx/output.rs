use anyhow::Result;
use std::fs;
use std::io::Write;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::models::{AuditReport, Status, ValidationReport};

use super::profile::Profile;
use super::rules::Rule;

/// Output results as JSON.
pub fn output_json(report: &AuditReport, output_file: Option<&str>) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    if let Some(file_path) = output_file {
        fs::write(file_path, json)?;
        println!("Wrote VMX audit report to {}", file_path);
    } else {
        println!("{}", json);
    }
    Ok(())
}

/// Output results to terminal with colors.
pub fn output_terminal(report: &AuditReport, profile: Option<&Profile>) -> Result<()> {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);

    if let Some(p) = profile {
        writeln!(&mut stdout, "\nProfile: {}", p.name)?;
        if let Some(desc) = &p.description {
            writeln!(&mut stdout, "  {}", desc)?;
        }
    }

    if report.files.is_empty() && report.skipped.is_empty() {
        writeln!(&mut stdout, "\nNo .vmx files found under {}", report.path)?;
        return Ok(());
    }

    for file in &report.files {
        write_file_report(&mut stdout, file)?;
    }

    if !report.skipped.is_empty() {
        let mut spec = ColorSpec::new();
        spec.set_fg(Some(Color::Red)).set_bold(true);
        stdout.set_color(&spec)?;
        writeln!(
            &mut stdout,
            "\nCould not read {} file(s):",
            report.skipped.len()
        )?;
        stdout.reset()?;
        for skipped in &report.skipped {
            writeln!(&mut stdout, "  {}: {}", skipped.path, skipped.error)?;
        }
        writeln!(&mut stdout)?;
    }

    if report.files.len() + report.skipped.len() > 1 {
        writeln!(&mut stdout, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        writeln!(&mut stdout, "Audit summary:")?;
        writeln!(&mut stdout, "  Files checked: {}", report.total_files)?;
        writeln!(&mut stdout, "  Files unreadable: {}", report.skipped.len())?;
        writeln!(
            &mut stdout,
            "  Files with failures: {}",
            report.files_with_failures
        )?;
        writeln!(&mut stdout, "  Total warnings: {}", report.warning_count)?;
        writeln!(&mut stdout, "  Total failures: {}", report.fail_count)?;
        writeln!(&mut stdout)?;
    }

    Ok(())
}

fn write_file_report(stdout: &mut StandardStream, report: &ValidationReport) -> Result<()> {
    writeln!(stdout, "\nFile: {}", report.file)?;
    writeln!(stdout, "  SHA256: {}", report.sha256)?;
    writeln!(stdout)?;

    for result in &report.results {
        write_status(stdout, result.status)?;
        writeln!(stdout, ": {}", result.message)?;
        stdout.reset()?;
        if !result.evidence.is_empty() {
            let mut spec = ColorSpec::new();
            spec.set_fg(Some(Color::Cyan));
            stdout.set_color(&spec)?;
            writeln!(stdout, "VMX: {}", result.evidence)?;
            stdout.reset()?;
        }
        writeln!(stdout)?;
    }

    if report.warning_count == 0 && report.fail_count == 0 {
        let mut spec = ColorSpec::new();
        spec.set_fg(Some(Color::Green)).set_bold(true);
        stdout.set_color(&spec)?;
        writeln!(stdout, "All checks passed!")?;
        stdout.reset()?;
        return Ok(());
    }

    let mut spec = ColorSpec::new();
    spec.set_bold(true);
    for (status, line) in summary_lines(report) {
        let color = match status {
            Status::Fail => Color::Red,
            _ => Color::Yellow,
        };
        spec.set_fg(Some(color));
        stdout.set_color(&spec)?;
        writeln!(stdout, "{}", line)?;
    }
    stdout.reset()?;
    Ok(())
}

/// Closing tally for one file; empty when nothing warned or failed.
fn summary_lines(report: &ValidationReport) -> Vec<(Status, String)> {
    let mut lines = Vec::new();
    if report.warning_count == 0 && report.fail_count == 0 {
        return lines;
    }
    lines.push((Status::Warning, "Summary:".to_string()));
    if report.warning_count > 0 {
        lines.push((
            Status::Warning,
            format!(
                "{} warning(s) found - may require SROC approval",
                report.warning_count
            ),
        ));
    }
    if report.fail_count > 0 {
        lines.push((
            Status::Fail,
            format!("{} check(s) failed - must be fixed", report.fail_count),
        ));
    }
    lines
}

fn write_status(stdout: &mut StandardStream, status: Status) -> Result<()> {
    let color = match status {
        Status::Pass => Color::Green,
        Status::Fail => Color::Red,
        Status::Warning => Color::Yellow,
        Status::Info => Color::Blue,
    };
    let mut spec = ColorSpec::new();
    spec.set_fg(Some(color));
    stdout.set_color(&spec)?;
    write!(stdout, "{}", status)?;
    Ok(())
}

/// Print the active checklist.
pub fn output_rules(rules: &[&dyn Rule], profile: Option<&Profile>) -> Result<()> {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    match profile {
        Some(p) => writeln!(
            &mut stdout,
            "Profile '{}' runs {} rules:",
            p.name,
            rules.len()
        )?,
        None => writeln!(&mut stdout, "{} rules:", rules.len())?,
    }
    for (i, rule) in rules.iter().enumerate() {
        write!(&mut stdout, "  {:>2}. ", i + 1)?;
        let mut spec = ColorSpec::new();
        spec.set_bold(true);
        stdout.set_color(&spec)?;
        write!(&mut stdout, "{}", rule.id())?;
        stdout.reset()?;
        writeln!(&mut stdout, "  {}", rule.description())?;
    }
    Ok(())
}
