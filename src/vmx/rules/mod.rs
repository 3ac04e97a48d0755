mod devices;
mod identity;
mod network;
mod storage;

use lazy_static::lazy_static;

use crate::models::CheckResult;

use super::parser::VmxConfig;

use devices::{SettingRule, SoundCard};
use identity::{CredentialsAnnotation, DisplayName, HardwareVersion};
use network::{EthernetAdapters, NestedHypervisor};
use storage::{CdDrives, SharedFolders, VirtualDrives};

/// A single policy check over a parsed .vmx file.
///
/// Rules only read the config; they never see each other's results.
pub trait Rule: Send + Sync {
    /// Stable identifier used by profiles and the `rules` listing.
    fn id(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// Produce zero or more results, in the order they should be reported.
    fn evaluate(&self, config: &VmxConfig) -> Vec<CheckResult>;
}

lazy_static! {
    /// The full checklist, in report order.
    pub static ref DEFAULT_RULES: Vec<Box<dyn Rule>> = vec![
        Box::new(HardwareVersion),
        Box::new(CredentialsAnnotation),
        Box::new(DisplayName),
        Box::new(VirtualDrives),
        Box::new(CdDrives),
        Box::new(SharedFolders),
        Box::new(SoundCard),
        Box::new(EthernetAdapters),
        Box::new(SettingRule {
            id: "usb-xhci",
            description: "USB 3.1 (xHCI) controller must be present",
            key: "usb_xhci.present",
            expected: "true",
            pass_message: "USB 3.1 compatibility enabled",
            fail_message: "USB 3.1 compatibility must be enabled",
        }),
        Box::new(NestedHypervisor),
        Box::new(SettingRule {
            id: "bluetooth",
            description: "Virtual Bluetooth must not connect at power on",
            key: "usb.vbluetooth.startconnected",
            expected: "false",
            pass_message: "Bluetooth auto-start disabled",
            fail_message: "Bluetooth auto-start must be disabled",
        }),
        Box::new(SettingRule {
            id: "floppy",
            description: "Floppy drive must be removed",
            key: "floppy0.present",
            expected: "false",
            pass_message: "Floppy drive disabled",
            fail_message: "Floppy drive must be disabled",
        }),
        Box::new(SettingRule {
            id: "side-channel-mitigations",
            description: "Side channel mitigations must be disabled",
            key: "ulm.disableMitigations",
            expected: "true",
            pass_message: "Side Channel Mitigations disabled for better performance",
            fail_message: "Side Channel Mitigations must be disabled",
        }),
        Box::new(SettingRule {
            id: "3d-graphics",
            description: "3D acceleration must be disabled",
            key: "mks.enable3d",
            expected: "false",
            pass_message: "3D acceleration disabled for better display compatibility",
            fail_message: "3D acceleration must be disabled",
        }),
    ];
}

/// Every registered rule, in report order.
pub fn all() -> Vec<&'static dyn Rule> {
    DEFAULT_RULES.iter().map(|r| r.as_ref()).collect()
}

/// Look up a registered rule by id.
pub fn find(id: &str) -> Option<&'static dyn Rule> {
    DEFAULT_RULES
        .iter()
        .find(|r| r.id() == id)
        .map(|r| r.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_registry_order() {
        let ids: Vec<_> = DEFAULT_RULES.iter().map(|r| r.id()).collect();
        assert_eq!(
            ids,
            vec![
                "hardware-version",
                "credentials-annotation",
                "display-name",
                "virtual-drives",
                "cd-drives",
                "shared-folders",
                "sound-card",
                "ethernet-adapters",
                "usb-xhci",
                "nested-hypervisor",
                "bluetooth",
                "floppy",
                "side-channel-mitigations",
                "3d-graphics",
            ]
        );
    }

    #[test]
    fn test_ids_unique_and_described() {
        let mut seen = HashSet::new();
        for rule in DEFAULT_RULES.iter() {
            assert!(seen.insert(rule.id()), "duplicate id {}", rule.id());
            assert!(!rule.description().is_empty());
        }
    }

    #[test]
    fn test_find() {
        assert_eq!(find("floppy").map(|r| r.id()), Some("floppy"));
        assert!(find("no-such-rule").is_none());
    }

    #[test]
    fn test_every_rule_reports_on_empty_config() {
        let config = VmxConfig::default();
        for rule in DEFAULT_RULES.iter() {
            assert_eq!(rule.evaluate(&config).len(), 1, "rule {}", rule.id());
        }
    }
}
