use crate::archive_path::basename;
use crate::model::{ConflictReport, InstallPlan, SkipReason};

/// Conflict summary for the user: one section per owner set, files shown by
/// basename only.
pub fn render_conflict_summary(report: &ConflictReport) -> String {
    let mut out = String::new();
    out.push_str("# Pak Conflict Summary\n\n");
    out.push_str(&format!(
        "- Report version: `{}`\n- Generated at: `{}`\n- Pak directory: `{}`\n- Packages scanned: {}\n\n",
        report.report_version,
        report.generated_at,
        report.pak_dir,
        report.scanned_packages.len()
    ));

    out.push_str("## Conflicts\n\n");
    if report.is_empty() {
        out.push_str("No conflicting pak files were detected.\n\n");
    } else {
        out.push_str(
            "Each group lists packages that overwrite the same game files. \
             The package loaded last wins.\n\n",
        );
        for group in &report.groups {
            out.push_str(&format!("### {}\n\n", group.owners.join(" / ")));
            for file in &group.files {
                out.push_str(&format!("- `{}`\n", basename(file)));
            }
            out.push('\n');
        }
    }

    if !report.warnings.is_empty() {
        out.push_str("## Warnings\n\n");
        for warning in &report.warnings {
            out.push_str(&format!("- {}\n", warning));
        }
    }

    out
}

pub fn render_install_plan(plan: &InstallPlan) -> String {
    let mut out = String::new();
    out.push_str("# Install Plan\n\n");
    out.push_str(&format!("- Content kind: `{}`\n\n", plan.kind.label()));

    out.push_str("## Copy Instructions\n\n");
    if plan.instructions.is_empty() {
        out.push_str("Nothing to install.\n\n");
    } else {
        for instruction in &plan.instructions {
            out.push_str(&format!(
                "- `{}` -> `{}`\n",
                instruction.source, instruction.destination
            ));
        }
        out.push('\n');
    }

    if !plan.skipped.is_empty() {
        out.push_str("## Skipped\n\n");
        for skipped in &plan.skipped {
            out.push_str(&format!(
                "- `{}` ({})\n",
                skipped.path,
                skip_reason_label(&skipped.reason)
            ));
        }
    }

    out
}

fn skip_reason_label(reason: &SkipReason) -> &'static str {
    match reason {
        SkipReason::UnsupportedExtension => "unsupported extension",
        SkipReason::NotScriptPackage => "not part of a script mod",
        SkipReason::NoModsSegment => "no Mods folder in its path",
    }
}

#[cfg(test)]
mod tests {
    use super::{render_conflict_summary, render_install_plan};
    use crate::model::{ConflictGroup, ConflictReport, InstallPlan};
    use crate::plan::build_install_plan;

    fn report(groups: Vec<ConflictGroup>) -> ConflictReport {
        ConflictReport {
            report_version: "1.0.0".to_string(),
            scan_id: "scan".to_string(),
            generated_at: "2026-01-01T00:00:00Z".to_string(),
            pak_dir: "Paks".to_string(),
            scanned_packages: vec!["a.pak".to_string(), "b.pak".to_string()],
            groups,
            warnings: vec!["manifest for c.pak treated as empty: boom".to_string()],
        }
    }

    #[test]
    fn renders_owners_then_file_basenames() {
        let markdown = render_conflict_summary(&report(vec![ConflictGroup {
            fingerprint: "f".to_string(),
            owners: vec!["a.pak".to_string(), "b.pak".to_string()],
            files: vec!["MadeInAbyss-BSFD/Content/Data/Items.uasset".to_string()],
        }]));
        assert!(markdown.contains("### a.pak / b.pak"));
        assert!(markdown.contains("- `Items.uasset`"));
        assert!(!markdown.contains("Content/Data"));
        assert!(markdown.contains("treated as empty"));
    }

    #[test]
    fn empty_report_says_so() {
        let markdown = render_conflict_summary(&report(Vec::new()));
        assert!(markdown.contains("No conflicting pak files"));
    }

    #[test]
    fn install_plan_lists_instructions_and_skips() {
        let plan = build_install_plan(&[
            "LogicMods/x.pak".to_string(),
            "preview.png".to_string(),
        ]);
        let markdown = render_install_plan(&plan);
        assert!(markdown.contains("`LogicMods/x.pak` -> `Content/Paks/LogicMods/x.pak`"));
        assert!(markdown.contains("`preview.png` (unsupported extension)"));
        assert!(render_install_plan(&InstallPlan::default()).contains("Nothing to install."));
    }
}
