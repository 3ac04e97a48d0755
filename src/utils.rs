use sha2::{Digest, Sha256};
use std::path::Path;

/// Compute SHA-256 hash of file contents already in memory
pub fn hash_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

/// Check if a file is a VMware configuration file
pub fn is_vmx(p: &Path) -> bool {
    p.extension()
        .and_then(|s| s.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("vmx"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_vmx() {
        assert!(is_vmx(Path::new("win11.vmx")));
        assert!(is_vmx(Path::new("dir/Ubuntu.VMX")));
        assert!(!is_vmx(Path::new("disk.vmdk")));
        assert!(!is_vmx(Path::new("vmx")));
    }

    #[test]
    fn test_hash_bytes_is_hex_sha256() {
        let digest = hash_bytes(b"displayName = \"lab\"\n");
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(digest, hash_bytes(b"displayName = \"lab2\"\n"));
    }

    #[test]
    fn test_hash_bytes_empty() {
        assert_eq!(
            hash_bytes(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
