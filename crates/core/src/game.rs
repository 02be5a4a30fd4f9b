use std::path::{Path, PathBuf};

pub const GAME_ID: &str = "madeinabyssbinarystarfallingintodarkness";
pub const GAME_NAME: &str = "Made in Abyss: Binary Star Falling into Darkness";
pub const STEAM_APP_ID: &str = "1324340";
pub const GAME_EXECUTABLE: &str = "MadeInAbyss.exe";

/// Folder under the game root that holds `Content` and `Binaries`.
/// Install destinations are relative to this folder.
pub const MOD_ROOT: &str = "MadeInAbyss-BSFD";

pub const REQUIRED_FILES: [&str; 2] = [
    "MadeInAbyss.exe",
    "MadeInAbyss-BSFD/Binaries/Win64/MadeInAbyss-Win64-Shipping.exe",
];

pub const INSTALLER_ID: &str = "miabsfd-mod";
pub const INSTALLER_PRIORITY: i32 = 25;

pub const PAKS_DIR: &str = "Content/Paks";
pub const LOGIC_MODS_DIR: &str = "Content/Paks/LogicMods";
pub const BINARIES_DIR: &str = "Binaries/Win64";
pub const SCRIPT_MODS_DIR: &str = "Binaries/Win64/Mods";

/// Directories the host must create before anything is deployed.
pub fn modding_directories(game_root: &Path) -> Vec<PathBuf> {
    [PAKS_DIR, LOGIC_MODS_DIR, SCRIPT_MODS_DIR]
        .iter()
        .map(|relative| join_relative(&game_root.join(MOD_ROOT), relative))
        .collect()
}

pub fn pak_directory(game_root: &Path) -> PathBuf {
    join_relative(&game_root.join(MOD_ROOT), PAKS_DIR)
}

pub fn is_game_install(game_root: &Path) -> bool {
    REQUIRED_FILES
        .iter()
        .all(|relative| join_relative(game_root, relative).is_file())
}

pub(crate) fn join_relative(base: &Path, relative: &str) -> PathBuf {
    relative
        .split('/')
        .fold(base.to_path_buf(), |path, segment| path.join(segment))
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use tempfile::TempDir;

    use super::{is_game_install, modding_directories, pak_directory, REQUIRED_FILES};

    #[test]
    fn lists_directories_under_mod_root() {
        let dirs = modding_directories(Path::new("game"));
        assert_eq!(dirs.len(), 3);
        assert!(dirs
            .iter()
            .all(|dir| dir.starts_with(Path::new("game").join("MadeInAbyss-BSFD"))));
        assert!(dirs.iter().any(|dir| dir.ends_with("LogicMods")));
        assert!(pak_directory(Path::new("game")).ends_with(Path::new("Content").join("Paks")));
    }

    #[test]
    fn detects_install_from_required_files() {
        let temp = TempDir::new().expect("tempdir");
        assert!(!is_game_install(temp.path()));

        for relative in REQUIRED_FILES {
            let path = super::join_relative(temp.path(), relative);
            fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
            fs::write(&path, b"").expect("write");
        }
        assert!(is_game_install(temp.path()));
    }
}
