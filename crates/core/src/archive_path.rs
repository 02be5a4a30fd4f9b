//! Helpers over archive-relative path strings.
//!
//! Archive listings arrive as plain strings. Hosts on Windows hand us `\`
//! separated entries while most listers emit `/`, so every helper here splits
//! on both and ignores empty segments (trailing separators on directory
//! entries, doubled separators).

const SEPARATORS: [char; 2] = ['/', '\\'];

pub fn components(path: &str) -> Vec<&str> {
    path.split(SEPARATORS)
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect()
}

/// Joins the components of `path` back together with `/`.
pub fn normalize(path: &str) -> String {
    components(path).join("/")
}

pub fn basename(path: &str) -> &str {
    components(path).last().copied().unwrap_or("")
}

/// Name of the directory that directly contains `path`, if any.
pub fn parent_name(path: &str) -> Option<&str> {
    let parts = components(path);
    if parts.len() < 2 {
        return None;
    }
    Some(parts[parts.len() - 2])
}

/// Lowercased extension including the leading dot (`.pak`).
///
/// Dotfiles such as `.gitignore` have no extension.
pub fn extension_lower(path: &str) -> Option<String> {
    let name = basename(path);
    match name.rfind('.') {
        Some(0) | None => None,
        Some(index) => Some(name[index..].to_lowercase()),
    }
}

pub fn has_extension(path: &str, extension: &str) -> bool {
    extension_lower(path).is_some_and(|ext| ext == extension)
}

#[cfg(test)]
mod tests {
    use super::{basename, components, extension_lower, has_extension, normalize, parent_name};

    #[test]
    fn splits_on_either_separator() {
        assert_eq!(
            components("Mods\\MyMod/Scripts//main.lua"),
            vec!["Mods", "MyMod", "Scripts", "main.lua"]
        );
        assert_eq!(normalize("Mods\\MyMod\\enabled.txt"), "Mods/MyMod/enabled.txt");
    }

    #[test]
    fn basename_ignores_trailing_separator() {
        assert_eq!(basename("Mods/MyMod/"), "MyMod");
        assert_eq!(basename("x.pak"), "x.pak");
        assert_eq!(basename(""), "");
    }

    #[test]
    fn parent_name_requires_a_directory() {
        assert_eq!(parent_name("LogicMods/x.pak"), Some("LogicMods"));
        assert_eq!(parent_name("x.pak"), None);
    }

    #[test]
    fn extension_is_lowercased_and_skips_dotfiles() {
        assert_eq!(extension_lower("Paks/Big.PAK"), Some(".pak".to_string()));
        assert_eq!(extension_lower("archive.tar.gz"), Some(".gz".to_string()));
        assert_eq!(extension_lower(".gitignore"), None);
        assert_eq!(extension_lower("Mods/"), None);
        assert!(has_extension("a/b/C.Lua", ".lua"));
        assert!(!has_extension("a/b/c.luac", ".lua"));
    }
}
