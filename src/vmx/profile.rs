use anyhow::{Context, Result, ensure};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

use super::rules::{self, Rule};

/// Optional YAML file narrowing which checks run.
#[derive(Debug, Deserialize)]
pub struct Profile {
    pub name: String,
    pub description: Option<String>,
    /// Rule ids to leave out of the run.
    #[serde(default)]
    pub skip: Vec<String>,
}

impl Profile {
    /// Registered rules minus the skipped ones, in report order.
    pub fn active_rules(&self) -> Vec<&'static dyn Rule> {
        rules::all()
            .into_iter()
            .filter(|r| !self.skip.iter().any(|s| s == r.id()))
            .collect()
    }
}

/// Load and validate a profile file from disk.
pub fn load_profile(path: &Path) -> Result<Profile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read profile file: {}", path.display()))?;

    let profile: Profile = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse profile file: {}", path.display()))?;

    validate_profile(&profile)?;
    Ok(profile)
}

fn validate_profile(profile: &Profile) -> Result<()> {
    let mut seen = HashSet::new();
    for id in &profile.skip {
        ensure!(
            rules::find(id).is_some(),
            "Unknown rule id in profile '{}': '{}'",
            profile.name,
            id
        );
        ensure!(seen.insert(id), "Rule '{}' is skipped more than once", id);
    }

    ensure!(
        !profile.active_rules().is_empty(),
        "Profile must leave at least one rule active"
    );
    Ok(())
}
