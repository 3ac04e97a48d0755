use crate::models::CheckResult;
use crate::vmx::parser::{VmxConfig, render_line};

use super::Rule;

/// Adapters must be isolated from the host network unless SROC signs off.
pub struct EthernetAdapters;

impl Rule for EthernetAdapters {
    fn id(&self) -> &'static str {
        "ethernet-adapters"
    }

    fn description(&self) -> &'static str {
        "Ethernet adapters must use NAT or host-only networking"
    }

    fn evaluate(&self, config: &VmxConfig) -> Vec<CheckResult> {
        let adapters: Vec<(&str, String)> = config
            .iter()
            .filter(|(k, _)| {
                k.starts_with("ethernet") && k.to_lowercase().contains("connectiontype")
            })
            .map(|(k, v)| (k, v.to_lowercase()))
            .collect();

        if adapters.is_empty() {
            return vec![CheckResult::warning("No ethernet adapters found", "")];
        }

        adapters
            .into_iter()
            .map(|(key, mode)| {
                let evidence = render_line(key, &mode);
                match mode.as_str() {
                    "nat" | "hostonly" => {
                        CheckResult::pass(format!("{} is set to {}", key, mode), evidence)
                    }
                    "bridged" => CheckResult::warning(
                        format!("{} is set to bridged - requires SROC approval", key),
                        evidence,
                    ),
                    _ => CheckResult::fail(format!("{} must be NAT or HOSTONLY", key), evidence),
                }
            })
            .collect()
    }
}

/// Nested virtualization must be explicitly configured.
pub struct NestedHypervisor;

impl Rule for NestedHypervisor {
    fn id(&self) -> &'static str {
        "nested-hypervisor"
    }

    fn description(&self) -> &'static str {
        "Hypervisor applications must be explicitly disabled"
    }

    fn evaluate(&self, config: &VmxConfig) -> Vec<CheckResult> {
        let evidence = config.evidence("vhv.enable");
        // An empty value and a missing key both fall through to FAIL.
        let result = match config.value("vhv.enable").to_lowercase().as_str() {
            "false" => CheckResult::pass("Hypervisor applications disabled", evidence),
            "true" => CheckResult::warning(
                "Hypervisor applications enabled - requires SROC approval",
                evidence,
            ),
            _ => CheckResult::fail(
                "Hypervisor setting must be explicitly set to FALSE",
                evidence,
            ),
        };
        vec![result]
    }
}
