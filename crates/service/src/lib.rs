pub mod service;

pub use service::{
    active_notice, dismiss_conflict_notice, install_content, installer_registration,
    publish_notice, run_conflict_scan, run_conflict_scan_with, test_supported_content,
    ConflictNotice, ConflictScanRequest, InstallRequest, InstallResponse, InstallerRegistration,
    TestSupportedRequest,
};
