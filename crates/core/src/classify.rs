use std::collections::HashSet;

use tracing::debug;

use crate::archive_path::{basename, components, has_extension, normalize, parent_name};
use crate::game::GAME_ID;
use crate::model::{ContentKind, ContentSignals, SupportCheck};

pub const SCRIPT_ENTRY: &str = "main.lua";
pub const SCRIPT_ENABLED_MARKER: &str = "enabled.txt";
pub const LOADER_MARKER: &str = "UE4SS.dll";
pub const MODS_FOLDER: &str = "Mods";
pub const SCRIPTS_FOLDER: &str = "Scripts";
pub const LOGIC_MODS_FOLDER: &str = "LogicMods";
pub const PAK_EXTENSION: &str = ".pak";

/// Host entry point: rejects other games outright, otherwise runs the
/// structural checks.
pub fn test_supported(files: &[String], game_id: &str) -> SupportCheck {
    if game_id != GAME_ID {
        return SupportCheck::unsupported();
    }

    let kind = classify_content(files);
    debug!(kind = kind.label(), files = files.len(), "classified archive");
    SupportCheck {
        supported: kind != ContentKind::Unsupported,
        kind,
        required_files: Vec::new(),
    }
}

pub fn classify_content(files: &[String]) -> ContentKind {
    kind_from_signals(&content_signals(files))
}

pub fn kind_from_signals(signals: &ContentSignals) -> ContentKind {
    if signals.script_mod_root.is_some() || signals.has_loader {
        ContentKind::ScriptMod
    } else if signals.has_blueprint_pak {
        ContentKind::BlueprintPak
    } else if signals.has_pak {
        ContentKind::StandardPak
    } else {
        ContentKind::Unsupported
    }
}

pub fn content_signals(files: &[String]) -> ContentSignals {
    let paks = files
        .iter()
        .filter(|file| has_extension(file, PAK_EXTENSION))
        .collect::<Vec<_>>();

    ContentSignals {
        script_mod_root: script_mod_root(files),
        has_pak: !paks.is_empty(),
        has_blueprint_pak: paks
            .iter()
            .any(|file| parent_name(file) == Some(LOGIC_MODS_FOLDER)),
        has_loader: files.iter().any(|file| basename(file) == LOADER_MARKER),
    }
}

/// Root folder (`.../Mods/<name>`) of a UE4SS Lua mod.
///
/// Only the first `Mods/<name>/Scripts/main.lua` in the listing is considered,
/// and it counts only when `<root>/enabled.txt` is listed alongside it.
pub fn script_mod_root(files: &[String]) -> Option<String> {
    let entry = files.iter().find(|file| is_script_entry(file))?;
    let parts = components(entry);
    let root = parts[..parts.len() - 2].join("/");

    let listed = files
        .iter()
        .map(|file| normalize(file))
        .collect::<HashSet<_>>();
    let marker = format!("{root}/{SCRIPT_ENABLED_MARKER}");
    if listed.contains(&marker) {
        Some(root)
    } else {
        debug!(root = %root, "script entry found without {SCRIPT_ENABLED_MARKER}");
        None
    }
}

fn is_script_entry(path: &str) -> bool {
    let parts = components(path);
    let len = parts.len();
    len >= 4
        && parts[len - 1] == SCRIPT_ENTRY
        && parts[len - 2] == SCRIPTS_FOLDER
        && parts[len - 4] == MODS_FOLDER
}
