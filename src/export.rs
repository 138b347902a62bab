//! CSV export of the visible page

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::models::Product;

const HEADER: [&str; 6] = ["id", "title", "price", "category", "images", "description"];

/// Quote a text field, doubling embedded quotes
fn quoted(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}

/// Render rows as CSV: numeric columns bare, text columns always quoted
pub fn to_csv<'a, I>(rows: I) -> String
where
    I: IntoIterator<Item = &'a Product>,
{
    let mut lines = vec![HEADER.join(",")];
    for p in rows {
        let fields = [
            p.id.to_string(),
            quoted(&p.title),
            p.price.to_string(),
            quoted(&p.category.name),
            quoted(&p.images.join(";")),
            quoted(&p.description),
        ];
        lines.push(fields.join(","));
    }
    lines.join("\n")
}

/// File name embedding the active page number
pub fn export_file_name(page: usize) -> String {
    format!("products_page{}.csv", page)
}

/// Write the given page to `dir`, returning the written path
pub fn write_page<'a, I>(dir: &Path, page: usize, rows: I) -> Result<PathBuf>
where
    I: IntoIterator<Item = &'a Product>,
{
    if !dir.exists() {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating export directory {}", dir.display()))?;
    }
    let path = dir.join(export_file_name(page));
    fs::write(&path, to_csv(rows)).with_context(|| format!("writing {}", path.display()))?;
    tracing::info!(path = %path.display(), page, "Exported page");
    Ok(path)
}
