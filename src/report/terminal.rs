use std::path::Path;

use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Table};

use super::manifest::WrittenManifest;
use crate::pipeline::RunStats;

/// Print the run summary to stderr.
pub fn render(written: &[WrittenManifest], stats: &RunStats, root: &Path) {
    eprintln!(
        "\n {} v{}",
        "advisory-conflicts".bold(),
        env!("CARGO_PKG_VERSION")
    );
    eprintln!(" Output: {}\n", root.display());

    let skipped = stats.legacy + stats.lookup_failed + stats.invalid;
    eprintln!(" ┌────────────────────────────────────────────────────┐");
    eprintln!(" │  {:<48} │", "SUMMARY".bold());
    eprintln!(
        " │  {:<48} │",
        format!("Releases fetched   : {} ({} pages)", stats.releases, stats.pages)
    );
    eprintln!(
        " │  {:<48} │",
        format!("{}  Ingested        : {:>4}", "✓".green(), stats.ingested)
    );
    eprintln!(
        " │  {:<48} │",
        format!(
            "{}  Skipped         : {:>4}  [legacy {}, lookup {}, invalid {}]",
            "⚠".yellow(),
            skipped,
            stats.legacy,
            stats.lookup_failed,
            stats.invalid
        )
    );
    eprintln!(" └────────────────────────────────────────────────────┘\n");

    if written.is_empty() {
        eprintln!(" {} No manifests written.\n", "[WARN]".yellow().bold());
        return;
    }

    eprintln!("{}", manifest_table(written, root));
}

fn manifest_table(written: &[WrittenManifest], root: &Path) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Major").add_attribute(Attribute::Bold),
            Cell::new("Manifest").add_attribute(Attribute::Bold),
            Cell::new("Packages").add_attribute(Attribute::Bold),
            Cell::new("Constraints").add_attribute(Attribute::Bold),
        ]);

    for manifest in written {
        let shown = manifest.path.strip_prefix(root).unwrap_or(&manifest.path);
        table.add_row(vec![
            Cell::new(manifest.major).set_alignment(CellAlignment::Center),
            Cell::new(shown.display()),
            Cell::new(manifest.packages).set_alignment(CellAlignment::Right),
            Cell::new(manifest.constraints).set_alignment(CellAlignment::Right),
        ]);
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_table_lists_relative_paths() {
        let root = PathBuf::from("/out");
        let written = vec![WrittenManifest {
            major: 8,
            path: root.join("build-8.x").join("composer.json"),
            packages: 12,
            constraints: 40,
        }];

        let rendered = manifest_table(&written, &root).to_string();
        assert!(rendered.contains("build-8.x/composer.json"));
        assert!(rendered.contains("12"));
        assert!(rendered.contains("40"));
        assert!(!rendered.contains("/out/"));
    }
}
