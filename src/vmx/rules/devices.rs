use crate::models::CheckResult;
use crate::vmx::parser::VmxConfig;

use super::Rule;

/// A single setting that must hold one specific value (case-insensitive).
/// Anything else, including an absent key, fails.
pub struct SettingRule {
    pub id: &'static str,
    pub description: &'static str,
    pub key: &'static str,
    pub expected: &'static str,
    pub pass_message: &'static str,
    pub fail_message: &'static str,
}

impl Rule for SettingRule {
    fn id(&self) -> &'static str {
        self.id
    }

    fn description(&self) -> &'static str {
        self.description
    }

    fn evaluate(&self, config: &VmxConfig) -> Vec<CheckResult> {
        let evidence = config.evidence(self.key);
        if config.value(self.key).eq_ignore_ascii_case(self.expected) {
            vec![CheckResult::pass(self.pass_message, evidence)]
        } else {
            vec![CheckResult::fail(self.fail_message, evidence)]
        }
    }
}

/// Sound card must be present (accessibility).
pub struct SoundCard;

impl Rule for SoundCard {
    fn id(&self) -> &'static str {
        "sound-card"
    }

    fn description(&self) -> &'static str {
        "Sound card must be present for accessibility features"
    }

    fn evaluate(&self, config: &VmxConfig) -> Vec<CheckResult> {
        let present = config.iter().any(|(k, v)| {
            let k = k.to_lowercase();
            k.starts_with("sound") && k.ends_with("present") && v.eq_ignore_ascii_case("true")
        });
        let evidence = config.evidence_where(|k, _| k.to_lowercase().starts_with("sound"));

        if present {
            vec![CheckResult::pass(
                "Sound card is present and configured correctly",
                evidence,
            )]
        } else {
            vec![CheckResult::fail(
                "Sound card must be present for accessibility features",
                evidence,
            )]
        }
    }
}
