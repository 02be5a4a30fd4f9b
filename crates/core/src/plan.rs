use tracing::debug;

use crate::archive_path::{basename, components, extension_lower, parent_name};
use crate::classify::{
    classify_content, test_supported, LOADER_MARKER, LOGIC_MODS_FOLDER, MODS_FOLDER,
    PAK_EXTENSION, SCRIPT_ENTRY,
};
use crate::game::{BINARIES_DIR, LOGIC_MODS_DIR, MOD_ROOT, PAKS_DIR};
use crate::model::{CopyInstruction, InstallPlan, PlannedInstall, SkipReason, SkippedFile};

/// Extensions copied out of an accepted archive. Anything else (previews,
/// readmes, archive metadata) would make the host report files that are
/// "not part of the archive".
pub const ACCEPTED_EXTENSIONS: [&str; 5] = [".pak", ".txt", ".dll", ".ini", ".lua"];

impl CopyInstruction {
    /// Destination relative to the game root rather than the mod-loading root.
    pub fn game_relative_destination(&self) -> String {
        format!("{MOD_ROOT}/{}", self.destination)
    }
}

pub fn install_content(files: &[String]) -> Vec<CopyInstruction> {
    build_install_plan(files).instructions
}

pub fn classify_and_plan(files: &[String], game_id: &str) -> PlannedInstall {
    let check = test_supported(files, game_id);
    let instructions = if check.supported {
        install_content(files)
    } else {
        Vec::new()
    };
    PlannedInstall {
        supported: check.supported,
        kind: check.kind,
        instructions,
    }
}

pub fn build_install_plan(files: &[String]) -> InstallPlan {
    let is_script_package = files.iter().any(|file| basename(file) == SCRIPT_ENTRY);
    let loader_dirs = if is_script_package {
        loader_directories(files)
    } else {
        Vec::new()
    };

    let mut plan = InstallPlan {
        kind: classify_content(files),
        ..InstallPlan::default()
    };

    for file in files {
        let Some(extension) = extension_lower(file).filter(|ext| is_accepted_extension(ext))
        else {
            plan.skipped.push(skipped(file, SkipReason::UnsupportedExtension));
            continue;
        };

        if extension == PAK_EXTENSION {
            let destination = if parent_name(file) == Some(LOGIC_MODS_FOLDER) {
                format!("{LOGIC_MODS_DIR}/{}", basename(file))
            } else {
                format!("{PAKS_DIR}/{}", basename(file))
            };
            plan.instructions.push(CopyInstruction {
                source: file.clone(),
                destination,
            });
            continue;
        }

        if !is_script_package {
            plan.skipped.push(skipped(file, SkipReason::NotScriptPackage));
            continue;
        }

        match binaries_suffix(file, &loader_dirs) {
            Some(suffix) => plan.instructions.push(CopyInstruction {
                source: file.clone(),
                destination: format!("{BINARIES_DIR}/{suffix}"),
            }),
            None => plan.skipped.push(skipped(file, SkipReason::NoModsSegment)),
        }
    }

    debug!(
        kind = plan.kind.label(),
        instructions = plan.instructions.len(),
        skipped = plan.skipped.len(),
        "built install plan"
    );
    plan
}

fn is_accepted_extension(extension: &str) -> bool {
    ACCEPTED_EXTENSIONS.contains(&extension)
}

fn skipped(path: &str, reason: SkipReason) -> SkippedFile {
    SkippedFile {
        path: path.to_string(),
        reason,
    }
}

/// Directories holding the UE4SS loader next to a `Mods` folder.
fn loader_directories(files: &[String]) -> Vec<Vec<&str>> {
    let mods_parents = files
        .iter()
        .filter_map(|file| {
            let parts = components(file);
            let index = parts.iter().position(|part| *part == MODS_FOLDER)?;
            Some(parts[..index].to_vec())
        })
        .collect::<Vec<_>>();

    let mut dirs: Vec<Vec<&str>> = Vec::new();
    for file in files {
        let parts = components(file);
        if parts.last() != Some(&LOADER_MARKER) {
            continue;
        }
        let dir = parts[..parts.len() - 1].to_vec();
        if mods_parents.contains(&dir) && !dirs.contains(&dir) {
            dirs.push(dir);
        }
    }
    dirs
}

/// Path of `file` below the folder that contains `Mods`.
///
/// Files inside a `Mods` folder keep everything from their own `Mods`
/// segment onward. Files directly beside the loader DLL (its settings, the
/// proxy DLL) keep their basename. Everything else has no route.
fn binaries_suffix(file: &str, loader_dirs: &[Vec<&str>]) -> Option<String> {
    let parts = components(file);
    if let Some(index) = parts.iter().position(|part| *part == MODS_FOLDER) {
        return Some(parts[index..].join("/"));
    }

    let (name, dir) = parts.split_last()?;
    loader_dirs
        .iter()
        .any(|loader_dir| loader_dir.as_slice() == dir)
        .then(|| name.to_string())
}
