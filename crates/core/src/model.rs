use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub const REPORT_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    /// UE4SS Lua mod (or the UE4SS loader itself), installed under `Binaries/Win64`.
    ScriptMod,
    /// UE4SS blueprint mod: a pak that lives in a `LogicMods` folder.
    BlueprintPak,
    /// Plain pak replacement, installed flat into `Content/Paks`.
    StandardPak,
    #[default]
    Unsupported,
}

impl ContentKind {
    pub fn label(&self) -> &'static str {
        match self {
            ContentKind::ScriptMod => "script_mod",
            ContentKind::BlueprintPak => "blueprint_pak",
            ContentKind::StandardPak => "standard_pak",
            ContentKind::Unsupported => "unsupported",
        }
    }
}

/// Independent structural markers found in an archive listing.
///
/// More than one can be set for the same archive; `ContentKind` is the
/// single label derived from them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ContentSignals {
    pub script_mod_root: Option<String>,
    pub has_pak: bool,
    pub has_blueprint_pak: bool,
    pub has_loader: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SupportCheck {
    pub supported: bool,
    pub kind: ContentKind,
    #[serde(default)]
    pub required_files: Vec<String>,
}

impl SupportCheck {
    pub fn unsupported() -> Self {
        Self {
            supported: false,
            kind: ContentKind::Unsupported,
            required_files: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename = "copy")]
pub struct CopyInstruction {
    pub source: String,
    pub destination: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    UnsupportedExtension,
    NotScriptPackage,
    NoModsSegment,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SkippedFile {
    pub path: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct InstallPlan {
    pub kind: ContentKind,
    pub instructions: Vec<CopyInstruction>,
    #[serde(default)]
    pub skipped: Vec<SkippedFile>,
}

impl InstallPlan {
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

/// Result of running the support check and the plan builder together.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlannedInstall {
    pub supported: bool,
    pub kind: ContentKind,
    pub instructions: Vec<CopyInstruction>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PackageManifest {
    pub package_id: String,
    pub files: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConflictGroup {
    pub fingerprint: String,
    pub owners: Vec<String>,
    pub files: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConflictReport {
    pub report_version: String,
    pub scan_id: String,
    pub generated_at: String,
    pub pak_dir: String,
    pub scanned_packages: Vec<String>,
    pub groups: Vec<ConflictGroup>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl ConflictReport {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn group(&self, fingerprint: &str) -> Option<&ConflictGroup> {
        self.groups
            .iter()
            .find(|group| group.fingerprint == fingerprint)
    }

    pub fn files_by_fingerprint(&self) -> HashMap<&str, &[String]> {
        self.groups
            .iter()
            .map(|group| (group.fingerprint.as_str(), group.files.as_slice()))
            .collect()
    }

    pub fn owners_by_fingerprint(&self) -> HashMap<&str, &[String]> {
        self.groups
            .iter()
            .map(|group| (group.fingerprint.as_str(), group.owners.as_slice()))
            .collect()
    }
}
