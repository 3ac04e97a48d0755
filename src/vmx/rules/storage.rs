use lazy_static::lazy_static;
use regex::Regex;

use crate::models::CheckResult;
use crate::vmx::parser::{VmxConfig, render_line, render_lines};

use super::Rule;

const DISK_PREFIXES: [&str; 3] = ["scsi", "nvme", "sata"];

lazy_static! {
    static ref DESCRIPTIVE_VMDK: Regex = Regex::new(r"^[A-Za-z0-9-]+\.vmdk$").unwrap();
    // Split disks are named disk-s001.vmdk, disk-s002.vmdk, ...
    static ref SEGMENT_TOKEN: Regex = Regex::new(r"00[0-9]").unwrap();
}

/// Disk images attached to SCSI/NVMe/SATA controllers.
pub struct VirtualDrives;

impl VirtualDrives {
    fn disks(config: &VmxConfig) -> Vec<(&str, &str)> {
        config
            .iter()
            .filter(|(k, v)| {
                DISK_PREFIXES.iter().any(|p| k.starts_with(*p)) && v.ends_with(".vmdk")
            })
            .collect()
    }
}

impl Rule for VirtualDrives {
    fn id(&self) -> &'static str {
        "virtual-drives"
    }

    fn description(&self) -> &'static str {
        "Disks must be single, descriptively named, non-clone VMDK files"
    }

    fn evaluate(&self, config: &VmxConfig) -> Vec<CheckResult> {
        let disks = Self::disks(config);
        let evidence = render_lines(disks.iter().copied());

        if disks.is_empty() {
            return vec![CheckResult::fail("No VMDK files found", evidence)];
        }

        let mut results = Vec::new();
        for (_, vmdk) in &disks {
            let before = results.len();
            let lower = vmdk.to_lowercase();
            if lower.contains("-cl") || lower.contains("clone") {
                results.push(CheckResult::fail(
                    format!("VMDK filename contains clone reference: {}", vmdk),
                    evidence.clone(),
                ));
            }
            if !DESCRIPTIVE_VMDK.is_match(vmdk) {
                results.push(CheckResult::warning(
                    format!("VMDK filename may not be descriptive enough: {}", vmdk),
                    evidence.clone(),
                ));
            }
            if SEGMENT_TOKEN.is_match(vmdk) {
                results.push(CheckResult::fail(
                    format!("VMDK appears to be segmented: {}", vmdk),
                    evidence.clone(),
                ));
            }
            if results.len() == before {
                results.push(CheckResult::pass(
                    format!("VMDK file is a single descriptively named disk: {}", vmdk),
                    evidence.clone(),
                ));
            }
        }
        results
    }
}

/// Every CD/DVD drive must start disconnected.
pub struct CdDrives;

impl Rule for CdDrives {
    fn id(&self) -> &'static str {
        "cd-drives"
    }

    fn description(&self) -> &'static str {
        "CD/DVD drives must not connect at power on"
    }

    fn evaluate(&self, config: &VmxConfig) -> Vec<CheckResult> {
        let drives: Vec<(&str, String)> = config
            .iter()
            .filter(|(k, v)| k.ends_with(".deviceType") && v.to_lowercase().contains("cdrom"))
            .filter_map(|(k, _)| k.rsplit_once('.').map(|(prefix, _)| prefix))
            .map(|prefix| {
                let connected = config
                    .value(&format!("{}.startConnected", prefix))
                    .to_lowercase();
                (prefix, connected)
            })
            .collect();

        if drives.is_empty() {
            return vec![CheckResult::info("No CD/DVD drives found", "")];
        }

        drives
            .into_iter()
            .map(|(prefix, connected)| {
                let evidence = render_line(&format!("{}.startConnected", prefix), &connected);
                if connected == "false" {
                    CheckResult::pass(format!("CD drive {} starts disconnected", prefix), evidence)
                } else {
                    CheckResult::fail(
                        format!("CD drive {} must start disconnected", prefix),
                        evidence,
                    )
                }
            })
            .collect()
    }
}

pub struct SharedFolders;

impl Rule for SharedFolders {
    fn id(&self) -> &'static str {
        "shared-folders"
    }

    fn description(&self) -> &'static str {
        "Shared folders must be removed"
    }

    fn evaluate(&self, config: &VmxConfig) -> Vec<CheckResult> {
        let is_shared = |k: &str, _: &str| k.starts_with("shared");
        if !config.iter().any(|(k, v)| is_shared(k, v)) {
            return vec![CheckResult::pass(
                "No shared folders present",
                "No shared folders",
            )];
        }
        vec![CheckResult::fail(
            "Shared folders are present and must be removed",
            config.evidence_where(is_shared),
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Status;
    use crate::vmx::parser::parse;

    fn run(rule: &dyn Rule, text: &str) -> Vec<CheckResult> {
        rule.evaluate(&parse(text).config)
    }

    #[test]
    fn test_no_vmdk_is_single_fail() {
        let results = run(&VirtualDrives, "scsi0.present = \"TRUE\"\nide0:0.fileName = \"a.vmdk\"");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].status, Status::Fail);
        assert_eq!(results[0].message, "No VMDK files found");
        assert_eq!(results[0].evidence, "");
    }

    #[test]
    fn test_clean_vmdk_passes() {
        let results = run(&VirtualDrives, "nvme0:0.fileName = \"Windows-11-Lab.vmdk\"");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].status, Status::Pass);
        assert!(results[0].message.ends_with("Windows-11-Lab.vmdk"));
    }

    #[test]
    fn test_clone_reference() {
        let results = run(&VirtualDrives, "scsi0:0.fileName = \"disk-cl.vmdk\"");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].status, Status::Fail);
        assert!(results[0].message.contains("clone reference"));
        assert_eq!(results[0].evidence, "scsi0:0.fileName = \"disk-cl.vmdk\"");
    }

    #[test]
    fn test_clone_word_case_insensitive() {
        let results = run(&VirtualDrives, "sata0:1.fileName = \"LabClone.vmdk\"");
        assert!(
            results
                .iter()
                .any(|r| r.status == Status::Fail && r.message.contains("clone reference"))
        );
    }

    #[test]
    fn test_segmented_disk() {
        let results = run(&VirtualDrives, "scsi0:0.fileName = \"disk001.vmdk\"");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].status, Status::Fail);
        assert!(results[0].message.contains("segmented"));
    }

    #[test]
    fn test_non_descriptive_name_warns() {
        let results = run(&VirtualDrives, "scsi0:0.fileName = \"my disk.vmdk\"");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].status, Status::Warning);
        assert!(results[0].message.contains("not be descriptive"));
    }

    #[test]
    fn test_multiple_findings_share_all_disk_evidence() {
        let results = run(
            &VirtualDrives,
            "scsi0:0.fileName = \"Base.vmdk\"\nscsi0:1.fileName = \"Base_clone-s001.vmdk\"",
        );
        // Base.vmdk passes; the second disk is a clone, has an underscore and a segment token
        let statuses: Vec<_> = results.iter().map(|r| r.status).collect();
        assert_eq!(
            statuses,
            vec![Status::Pass, Status::Fail, Status::Warning, Status::Fail]
        );
        for r in &results {
            assert_eq!(
                r.evidence,
                "scsi0:0.fileName = \"Base.vmdk\"\nscsi0:1.fileName = \"Base_clone-s001.vmdk\""
            );
        }
    }

    #[test]
    fn test_no_cd_drives_is_info() {
        let results = run(&CdDrives, "");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].status, Status::Info);
        assert_eq!(results[0].message, "No CD/DVD drives found");
    }

    #[test]
    fn test_cd_drives_per_drive() {
        let results = run(
            &CdDrives,
            "sata0:1.deviceType = \"cdrom-image\"\nsata0:1.startConnected = \"FALSE\"\n\
             ide1:0.deviceType = \"atapi-cdrom\"\nide1:0.startConnected = \"TRUE\"\n\
             sata0:0.deviceType = \"disk\"",
        );
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].status, Status::Pass);
        assert_eq!(results[0].evidence, "sata0:1.startConnected = \"false\"");
        assert_eq!(results[1].status, Status::Fail);
        assert_eq!(results[1].message, "CD drive ide1:0 must start disconnected");
    }

    #[test]
    fn test_cd_drive_without_start_connected_fails() {
        let results = run(&CdDrives, "ide1:0.deviceType = \"CDROM-RAW\"");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].status, Status::Fail);
        assert_eq!(results[0].evidence, "ide1:0.startConnected = \"\"");
    }

    #[test]
    fn test_shared_folders() {
        let none = run(&SharedFolders, "displayName = \"x\"");
        assert_eq!(none[0].status, Status::Pass);
        assert_eq!(none[0].evidence, "No shared folders");

        let some = run(
            &SharedFolders,
            "sharedFolder0.present = \"TRUE\"\nsharedFolder0.hostPath = \"/home\"",
        );
        assert_eq!(some.len(), 1);
        assert_eq!(some[0].status, Status::Fail);
        assert_eq!(
            some[0].evidence,
            "sharedFolder0.present = \"TRUE\"\nsharedFolder0.hostPath = \"/home\""
        );
    }
}
