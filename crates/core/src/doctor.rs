use std::env;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::game::{
    is_game_install, join_relative, modding_directories, pak_directory, GAME_NAME, REQUIRED_FILES,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorInfo {
    pub os: String,
    pub arch: String,
    pub game_name: String,
    pub game_root: String,
    pub is_game_install: bool,
    pub required_files: Vec<PathCheck>,
    pub modding_directories: Vec<PathCheck>,
    pub pak_directory: PathCheck,
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PathCheck {
    pub path: String,
    pub present: bool,
}

pub fn collect_doctor_info(game_root: &Path) -> DoctorInfo {
    let required_files = REQUIRED_FILES
        .iter()
        .map(|relative| {
            let path = join_relative(game_root, relative);
            PathCheck {
                present: path.is_file(),
                path: path.to_string_lossy().to_string(),
            }
        })
        .collect::<Vec<_>>();
    let modding_directories = modding_directories(game_root)
        .into_iter()
        .map(|path| PathCheck {
            present: path.is_dir(),
            path: path.to_string_lossy().to_string(),
        })
        .collect::<Vec<_>>();
    let paks = pak_directory(game_root);
    let pak_directory = PathCheck {
        present: paks.is_dir(),
        path: paks.to_string_lossy().to_string(),
    };

    let is_game_install = is_game_install(game_root);
    let mut notes = Vec::new();
    if !is_game_install {
        notes.push(format!(
            "{} was not found at this root; the Steam release is the only moddable build.",
            GAME_NAME
        ));
    }
    if modding_directories.iter().any(|check| !check.present) {
        notes.push(
            "Some mod directories are missing; the mod manager creates them during setup."
                .to_string(),
        );
    }

    DoctorInfo {
        os: env::consts::OS.to_string(),
        arch: env::consts::ARCH.to_string(),
        game_name: GAME_NAME.to_string(),
        game_root: game_root.to_string_lossy().to_string(),
        is_game_install,
        required_files,
        modding_directories,
        pak_directory,
        notes,
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::collect_doctor_info;
    use crate::game::modding_directories;

    #[test]
    fn reports_missing_install() {
        let temp = TempDir::new().expect("tempdir");
        let info = collect_doctor_info(temp.path());
        assert!(!info.is_game_install);
        assert!(info.required_files.iter().all(|check| !check.present));
        assert!(!info.pak_directory.present);
        assert_eq!(info.notes.len(), 2);
    }

    #[test]
    fn sees_prepared_directories() {
        let temp = TempDir::new().expect("tempdir");
        for dir in modding_directories(temp.path()) {
            fs::create_dir_all(dir).expect("mkdir");
        }
        let info = collect_doctor_info(temp.path());
        assert!(info.modding_directories.iter().all(|check| check.present));
        assert!(info.pak_directory.present);
        assert_eq!(info.notes.len(), 1);
    }
}
