use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use abyss_modkit_core::{
    build_install_plan, pak_directory, scan_conflicts, test_supported, CommandLister,
    ConflictReport, CopyInstruction, ManifestLister, SupportCheck, GAME_ID, INSTALLER_ID,
    INSTALLER_PRIORITY,
};
use anyhow::{anyhow, bail, Context, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InstallerRegistration {
    pub id: String,
    pub priority: i32,
    pub game_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestSupportedRequest {
    pub files: Vec<String>,
    #[serde(default = "default_game_id")]
    pub game_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallRequest {
    pub files: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InstallResponse {
    pub instructions: Vec<CopyInstruction>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictScanRequest {
    /// Pak directory to scan. Derived from `game_root` when omitted.
    #[serde(default)]
    pub pak_dir: Option<PathBuf>,
    #[serde(default)]
    pub game_root: Option<PathBuf>,
    #[serde(default)]
    pub lister: CommandLister,
    #[serde(default)]
    pub output: Option<PathBuf>,
}

fn default_game_id() -> String {
    GAME_ID.to_string()
}

impl Default for ConflictScanRequest {
    fn default() -> Self {
        Self {
            pak_dir: None,
            game_root: None,
            lister: CommandLister::default(),
            output: None,
        }
    }
}

impl ConflictScanRequest {
    pub fn resolve_pak_dir(&self) -> Result<PathBuf> {
        match (&self.pak_dir, &self.game_root) {
            (Some(pak_dir), _) => Ok(pak_dir.clone()),
            (None, Some(game_root)) => Ok(pak_directory(game_root)),
            (None, None) => bail!("conflict scan needs either pak_dir or game_root"),
        }
    }
}

/// What the host should do with its conflict notification after a scan:
/// drop the stale one, then show the new one (if any).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictNotice {
    pub report: ConflictReport,
    pub dismiss: Option<String>,
    pub show: Option<String>,
}

static ACTIVE_NOTICE: Lazy<Mutex<Option<String>>> = Lazy::new(|| Mutex::new(None));

pub fn installer_registration() -> InstallerRegistration {
    InstallerRegistration {
        id: INSTALLER_ID.to_string(),
        priority: INSTALLER_PRIORITY,
        game_id: GAME_ID.to_string(),
    }
}

pub fn test_supported_content(request: &TestSupportedRequest) -> SupportCheck {
    test_supported(&request.files, &request.game_id)
}

pub fn install_content(request: &InstallRequest) -> InstallResponse {
    InstallResponse {
        instructions: build_install_plan(&request.files).instructions,
    }
}

pub fn run_conflict_scan(request: &ConflictScanRequest) -> Result<ConflictNotice> {
    run_conflict_scan_with(request, &request.lister)
}

pub fn run_conflict_scan_with<L>(
    request: &ConflictScanRequest,
    lister: &L,
) -> Result<ConflictNotice>
where
    L: ManifestLister + ?Sized,
{
    let pak_dir = request.resolve_pak_dir()?;
    let report = scan_conflicts(&pak_dir, lister)?;

    if let Some(path) = &request.output {
        let payload = serde_json::to_string_pretty(&report)
            .context("failed to serialize conflict report")?;
        fs::write(path, payload)
            .with_context(|| format!("failed to write conflict report to {}", path.display()))?;
    }

    publish_notice(report)
}

/// Replaces the active notice with one for `report`.
pub fn publish_notice(report: ConflictReport) -> Result<ConflictNotice> {
    let mut active = lock_notice()?;
    let dismiss = active.take();
    let show = if report.is_empty() {
        None
    } else {
        Some(format!("{INSTALLER_ID}-conflicts-{}", Uuid::new_v4()))
    };
    active.clone_from(&show);

    info!(
        groups = report.groups.len(),
        dismissed = dismiss.is_some(),
        shown = show.is_some(),
        "conflict notice updated"
    );
    Ok(ConflictNotice {
        report,
        dismiss,
        show,
    })
}

pub fn active_notice() -> Result<Option<String>> {
    Ok(lock_notice()?.clone())
}

pub fn dismiss_conflict_notice() -> Result<Option<String>> {
    Ok(lock_notice()?.take())
}

fn lock_notice() -> Result<std::sync::MutexGuard<'static, Option<String>>> {
    ACTIVE_NOTICE
        .lock()
        .map_err(|_| anyhow!("conflict notice registry lock poisoned"))
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use abyss_modkit_core::{ContentKind, GAME_ID};
    use tempfile::TempDir;

    use super::{
        active_notice, dismiss_conflict_notice, install_content, installer_registration,
        run_conflict_scan, run_conflict_scan_with, test_supported_content, ConflictScanRequest,
        InstallRequest, TestSupportedRequest,
    };

    fn overlapping(_package: &Path) -> anyhow::Result<Vec<String>> {
        Ok(vec!["Game/Data/Items.uasset".to_string()])
    }

    fn disjoint(package: &Path) -> anyhow::Result<Vec<String>> {
        Ok(vec![package.to_string_lossy().to_string()])
    }

    #[test]
    fn registration_matches_game() {
        let registration = installer_registration();
        assert_eq!(registration.id, "miabsfd-mod");
        assert_eq!(registration.priority, 25);
        assert_eq!(registration.game_id, GAME_ID);
    }

    #[test]
    fn requests_deserialize_with_defaults() {
        let request: TestSupportedRequest =
            serde_json::from_str(r#"{"files":["Paks/x.pak"]}"#).expect("request parses");
        let check = test_supported_content(&request);
        assert!(check.supported);
        assert_eq!(check.kind, ContentKind::StandardPak);

        let scan: ConflictScanRequest =
            serde_json::from_str(r#"{"game_root":"C:/Games/MIA"}"#).expect("scan parses");
        assert_eq!(scan.lister.program, "repak");
        assert!(scan
            .resolve_pak_dir()
            .expect("pak dir")
            .ends_with("Paks"));
        assert!(ConflictScanRequest::default().resolve_pak_dir().is_err());
    }

    #[test]
    fn install_returns_copy_instructions() {
        let response = install_content(&InstallRequest {
            files: vec!["LogicMods/Bp.pak".to_string()],
        });
        assert_eq!(
            response.instructions[0].destination,
            "Content/Paks/LogicMods/Bp.pak"
        );
        let json = serde_json::to_value(&response).expect("serializes");
        assert_eq!(json["instructions"][0]["type"], "copy");
    }

    // Runs the whole notice lifecycle in one test: the registry is process-wide.
    #[test]
    fn new_scan_dismisses_previous_notice() {
        let temp = TempDir::new().expect("tempdir");
        fs::write(temp.path().join("a.pak"), b"").expect("write a");
        fs::write(temp.path().join("b.pak"), b"").expect("write b");
        let output = temp.path().join("report.json");
        let request = ConflictScanRequest {
            pak_dir: Some(temp.path().to_path_buf()),
            output: Some(output.clone()),
            ..ConflictScanRequest::default()
        };

        let first = run_conflict_scan_with(&request, &overlapping).expect("first scan");
        assert_eq!(first.report.groups.len(), 1);
        let shown = first.show.clone().expect("notice shown");
        assert!(output.exists());

        let second = run_conflict_scan_with(&request, &overlapping).expect("second scan");
        assert_eq!(second.dismiss.as_deref(), Some(shown.as_str()));
        assert!(second.show.is_some());

        let third = run_conflict_scan_with(&request, &disjoint).expect("third scan");
        assert!(third.report.is_empty());
        assert_eq!(third.dismiss, second.show);
        assert!(third.show.is_none());
        assert_eq!(active_notice().expect("registry"), None);

        let fourth = run_conflict_scan_with(&request, &overlapping).expect("fourth scan");
        assert_eq!(dismiss_conflict_notice().expect("registry"), fourth.show);
        assert_eq!(active_notice().expect("registry"), None);
    }

    #[test]
    fn scan_of_missing_directory_fails() {
        let request = ConflictScanRequest {
            pak_dir: Some("/definitely/not/a/pak/dir".into()),
            ..ConflictScanRequest::default()
        };
        assert!(run_conflict_scan(&request).is_err());
    }
}
