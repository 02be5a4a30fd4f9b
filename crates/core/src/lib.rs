pub mod archive_path;
pub mod classify;
pub mod conflict;
pub mod doctor;
pub mod game;
pub mod lister;
pub mod markdown;
pub mod model;
pub mod plan;

pub use classify::{classify_content, content_signals, kind_from_signals, test_supported};
pub use conflict::{
    aggregate_conflicts, collect_manifests, list_packages, owner_fingerprint, scan_conflicts,
    ConflictIndex, EXCLUDED_BASE_ARCHIVES,
};
pub use doctor::{collect_doctor_info, DoctorInfo, PathCheck};
pub use game::{
    is_game_install, modding_directories, pak_directory, GAME_ID, GAME_NAME, INSTALLER_ID,
    INSTALLER_PRIORITY, MOD_ROOT, STEAM_APP_ID,
};
pub use lister::{parse_listing, CommandLister, ListerError, ManifestLister};
pub use markdown::{render_conflict_summary, render_install_plan};
pub use model::{
    ConflictGroup, ConflictReport, ContentKind, ContentSignals, CopyInstruction, InstallPlan,
    PackageManifest, PlannedInstall, SkipReason, SkippedFile, SupportCheck, REPORT_VERSION,
};
pub use plan::{build_install_plan, classify_and_plan, install_content, ACCEPTED_EXTENSIONS};
