use abyss_modkit_core::{build_install_plan, test_supported, ContentKind, GAME_ID};

fn fixture(text: &str) -> Vec<String> {
    text.lines().map(str::to_string).collect()
}

fn destinations(files: &[String]) -> Vec<String> {
    build_install_plan(files)
        .instructions
        .into_iter()
        .map(|instruction| instruction.destination)
        .collect()
}

#[test]
fn ue4ss_release_installs_into_binaries() {
    let files = fixture(include_str!("../../../fixtures/ue4ss-release.txt"));

    let check = test_supported(&files, GAME_ID);
    assert!(check.supported);
    assert_eq!(check.kind, ContentKind::ScriptMod);

    assert_eq!(
        destinations(&files),
        vec![
            "Binaries/Win64/UE4SS.dll",
            "Binaries/Win64/UE4SS-settings.ini",
            "Binaries/Win64/dwmapi.dll",
            "Binaries/Win64/Mods/mods.txt",
            "Binaries/Win64/Mods/BPModLoaderMod/enabled.txt",
            "Binaries/Win64/Mods/BPModLoaderMod/Scripts/main.lua",
            "Binaries/Win64/Mods/Keybinds/Scripts/main.lua",
            "Binaries/Win64/Mods/Keybinds/enabled.txt",
        ]
    );
}

#[test]
fn lua_mod_with_blueprint_splits_across_roots() {
    let files = fixture(include_str!("../../../fixtures/lua-mod-with-blueprint.txt"));

    let plan = build_install_plan(&files);
    assert_eq!(plan.kind, ContentKind::ScriptMod);
    assert_eq!(
        destinations(&files),
        vec![
            "Binaries/Win64/Mods/MoreAbyssCurse/Scripts/main.lua",
            "Binaries/Win64/Mods/MoreAbyssCurse/Scripts/config.lua",
            "Binaries/Win64/Mods/MoreAbyssCurse/enabled.txt",
            "Content/Paks/LogicMods/MoreAbyssCurse.pak",
        ]
    );
    assert!(plan
        .skipped
        .iter()
        .any(|skipped| skipped.path.ends_with(".utoc")));
}

#[test]
fn standard_pak_is_flattened() {
    let files = fixture(include_str!("../../../fixtures/standard-pak.txt"));

    assert_eq!(test_supported(&files, GAME_ID).kind, ContentKind::StandardPak);
    assert_eq!(destinations(&files), vec!["Content/Paks/RikoOutfit_P.pak"]);
}
