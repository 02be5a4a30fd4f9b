use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{SecondsFormat, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;
use walkdir::WalkDir;

use crate::archive_path::has_extension;
use crate::classify::PAK_EXTENSION;
use crate::lister::ManifestLister;
use crate::model::{ConflictGroup, ConflictReport, PackageManifest, REPORT_VERSION};

/// Archives shipped with the game. They overlap every pak mod by design and
/// are never reported as owners.
pub const EXCLUDED_BASE_ARCHIVES: [&str; 2] = [
    "MadeInAbyss-BSFD-WindowsNoEditor.pak",
    "pakchunk0-WindowsNoEditor.pak",
];

/// Game file -> packages that write it, in first-seen order.
#[derive(Debug, Default)]
pub struct ConflictIndex {
    order: Vec<String>,
    owners: HashMap<String, Vec<String>>,
}

impl ConflictIndex {
    pub fn from_manifests(manifests: &[PackageManifest]) -> Self {
        let mut index = Self::default();
        for manifest in manifests {
            for file in &manifest.files {
                index.insert(file, &manifest.package_id);
            }
        }
        index
    }

    pub fn insert(&mut self, file: &str, package_id: &str) {
        match self.owners.get_mut(file) {
            Some(owners) => {
                if !owners.iter().any(|owner| owner == package_id) {
                    owners.push(package_id.to_string());
                }
            }
            None => {
                self.order.push(file.to_string());
                self.owners
                    .insert(file.to_string(), vec![package_id.to_string()]);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn owners(&self, file: &str) -> Option<&[String]> {
        self.owners.get(file).map(Vec::as_slice)
    }

    pub fn buckets(&self) -> impl Iterator<Item = (&str, &[String])> + '_ {
        self.order.iter().filter_map(|file| {
            self.owners
                .get(file)
                .map(|owners| (file.as_str(), owners.as_slice()))
        })
    }
}

/// Order-independent digest of a set of package ids.
pub fn owner_fingerprint(owners: &[String]) -> String {
    let mut sorted = owners.to_vec();
    sorted.sort();
    fingerprint_sorted(&sorted)
}

fn fingerprint_sorted(sorted: &[String]) -> String {
    blake3::hash(sorted.join("\n").as_bytes())
        .to_hex()
        .to_string()
}

/// Groups every file touched by two or more packages by its exact owner set.
///
/// Groups come out in the order their fingerprint is first seen while walking
/// the index; files inside a group keep index order.
pub fn aggregate_conflicts(manifests: &[PackageManifest]) -> Vec<ConflictGroup> {
    let index = ConflictIndex::from_manifests(manifests);
    debug!(
        packages = manifests.len(),
        files = index.len(),
        "built conflict index"
    );
    if index.is_empty() {
        return Vec::new();
    }

    let mut groups: Vec<ConflictGroup> = Vec::new();
    let mut by_fingerprint: HashMap<String, usize> = HashMap::new();

    for (file, owners) in index.buckets() {
        if owners.len() < 2 {
            continue;
        }

        let mut sorted = owners.to_vec();
        sorted.sort();
        let fingerprint = fingerprint_sorted(&sorted);

        match by_fingerprint.get(&fingerprint) {
            Some(&position) => groups[position].files.push(file.to_string()),
            None => {
                by_fingerprint.insert(fingerprint.clone(), groups.len());
                groups.push(ConflictGroup {
                    fingerprint,
                    owners: sorted,
                    files: vec![file.to_string()],
                });
            }
        }
    }

    groups
}

pub fn is_candidate_package(file_name: &str) -> bool {
    has_extension(file_name, PAK_EXTENSION) && !EXCLUDED_BASE_ARCHIVES.contains(&file_name)
}

/// Pak files directly inside `pak_dir`, sorted by file name.
pub fn list_packages(pak_dir: &Path, warnings: &mut Vec<String>) -> Result<Vec<PathBuf>> {
    let metadata = fs::metadata(pak_dir)
        .with_context(|| format!("failed to read pak directory {}", pak_dir.display()))?;
    if !metadata.is_dir() {
        bail!("{} is not a directory", pak_dir.display());
    }

    let mut packages = Vec::new();
    for entry in WalkDir::new(pak_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warnings.push(format!(
                    "pak directory entry skipped in {}: {}",
                    pak_dir.display(),
                    err
                ));
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if is_candidate_package(&name) {
            packages.push(entry.into_path());
        } else {
            debug!(name = %name, "not a conflict candidate");
        }
    }
    Ok(packages)
}

/// Lists each package in turn. A package whose listing fails contributes an
/// empty manifest and a warning instead of aborting the scan.
pub fn collect_manifests<L>(
    packages: &[PathBuf],
    lister: &L,
    warnings: &mut Vec<String>,
) -> Vec<PackageManifest>
where
    L: ManifestLister + ?Sized,
{
    packages
        .iter()
        .map(|package| {
            let package_id = package_id(package);
            let files = match lister.list_files(package) {
                Ok(files) => files
                    .into_iter()
                    .map(|file| file.trim().to_string())
                    .filter(|file| !file.is_empty())
                    .collect(),
                Err(err) => {
                    warn!(package = %package_id, error = %err, "manifest listing failed");
                    warnings.push(format!(
                        "manifest for {} treated as empty: {:#}",
                        package_id, err
                    ));
                    Vec::new()
                }
            };
            PackageManifest { package_id, files }
        })
        .collect()
}

pub fn scan_conflicts<L>(pak_dir: &Path, lister: &L) -> Result<ConflictReport>
where
    L: ManifestLister + ?Sized,
{
    let mut warnings = Vec::new();
    let packages = list_packages(pak_dir, &mut warnings)?;
    info!(
        pak_dir = %pak_dir.display(),
        packages = packages.len(),
        "scanning pak conflicts"
    );

    let manifests = collect_manifests(&packages, lister, &mut warnings);
    let groups = aggregate_conflicts(&manifests);
    info!(groups = groups.len(), warnings = warnings.len(), "conflict scan complete");

    Ok(ConflictReport {
        report_version: REPORT_VERSION.to_string(),
        scan_id: Uuid::new_v4().to_string(),
        generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        pak_dir: pak_dir.to_string_lossy().to_string(),
        scanned_packages: manifests
            .into_iter()
            .map(|manifest| manifest.package_id)
            .collect(),
        groups,
        warnings,
    })
}

fn package_id(package: &Path) -> String {
    package
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| package.to_string_lossy().to_string())
}
