use colored::*;
use folder_sorter_core::size::format_kb;
use folder_sorter_core::{FileRecord, OrganizationPlan, PreviewTree};
use std::fmt::Write as _;

pub fn render_files(files: &[&FileRecord]) -> String {
    let mut out = String::new();
    for file in files {
        let _ = writeln!(
            out,
            "{}  {}",
            format!("{:>10}", format_kb(file.size_kb())).cyan(),
            file.path
        );
    }
    out
}

pub fn render_buckets(buckets: &[(String, usize)]) -> String {
    let width = buckets
        .iter()
        .map(|(_, count)| count.to_string().len())
        .max()
        .unwrap_or(1);
    let mut out = String::new();
    for (label, count) in buckets {
        let _ = writeln!(out, "{}  {}", format!("{count:>width$}").green(), label);
    }
    out
}

pub fn render_tree(tree: &PreviewTree) -> String {
    let mut out = String::new();
    for (name, folder) in &tree.folders {
        let _ = writeln!(out, "{}/", name.bold());
        for file in &folder.files {
            let _ = writeln!(out, "  {file}");
        }
        for (sub, files) in &folder.subfolders {
            let _ = writeln!(out, "  {}/", sub.bold());
            for file in files {
                let _ = writeln!(out, "    {file}");
            }
        }
    }
    out
}

pub fn render_plan(plan: &OrganizationPlan) -> String {
    let mut out = String::new();
    for entry in &plan.entries {
        let _ = writeln!(
            out,
            "{} {} {}",
            entry.source_path,
            "->".dimmed(),
            entry.relative_path
        );
    }
    out
}
