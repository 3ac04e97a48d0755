use crate::models::CheckResult;
use crate::vmx::parser::VmxConfig;

use super::Rule;

const HW_VERSION: &str = "18";
const HW_VERSION_WIN11: &str = "19";

/// Hardware compatibility level; Windows 11 guests need the newer one.
pub struct HardwareVersion;

impl HardwareVersion {
    fn is_windows11(config: &VmxConfig) -> bool {
        config.value("guestOS").to_lowercase().contains("windows11")
            || config
                .value("guestinfo.detailed.data")
                .to_lowercase()
                .contains("windows 11")
    }
}

impl Rule for HardwareVersion {
    fn id(&self) -> &'static str {
        "hardware-version"
    }

    fn description(&self) -> &'static str {
        "Hardware compatibility must be 18 (19 for Windows 11 guests)"
    }

    fn evaluate(&self, config: &VmxConfig) -> Vec<CheckResult> {
        let version = config.value("virtualHW.version");
        let evidence = config.evidence("virtualHW.version");
        let win11 = Self::is_windows11(config);
        let required = if win11 { HW_VERSION_WIN11 } else { HW_VERSION };

        if version == required {
            return vec![CheckResult::pass(
                format!(
                    "Hardware Compatibility version is {} (compatible with Fusion 13.x, 12.x and Workstation 17.x, 16.x)",
                    version
                ),
                evidence,
            )];
        }

        let expected = if win11 {
            format!("{} for Windows 11", HW_VERSION_WIN11)
        } else {
            HW_VERSION.to_string()
        };
        vec![CheckResult::fail(
            format!(
                "Hardware Compatibility version should be {}, found {}",
                expected, version
            ),
            evidence,
        )]
    }
}

/// The annotation must tell the recipient how to log in.
pub struct CredentialsAnnotation;

impl Rule for CredentialsAnnotation {
    fn id(&self) -> &'static str {
        "credentials-annotation"
    }

    fn description(&self) -> &'static str {
        "Login credentials must be noted in the VM annotation"
    }

    fn evaluate(&self, config: &VmxConfig) -> Vec<CheckResult> {
        let annotation = config.value("annotation").to_lowercase();
        let evidence = config.evidence("annotation");
        let noted = ["user", "pass", "credentials"]
            .iter()
            .any(|needle| annotation.contains(needle));

        if noted {
            vec![CheckResult::pass("Credentials noted in annotation", evidence)]
        } else {
            vec![CheckResult::fail(
                "Credentials must be noted in the annotation (string search for user/pass/credentials)",
                evidence,
            )]
        }
    }
}

pub struct DisplayName;

impl Rule for DisplayName {
    fn id(&self) -> &'static str {
        "display-name"
    }

    fn description(&self) -> &'static str {
        "Display name must be set and descriptive"
    }

    fn evaluate(&self, config: &VmxConfig) -> Vec<CheckResult> {
        let name = config.value("displayName");
        let evidence = config.evidence("displayName");
        if name.is_empty() {
            vec![CheckResult::fail(
                "Display name must be set and descriptive",
                evidence,
            )]
        } else {
            vec![CheckResult::pass(
                format!("Display name is set to \"{}\"", name),
                evidence,
            )]
        }
    }
}
