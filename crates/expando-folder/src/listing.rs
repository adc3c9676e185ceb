//! Reading a directory and rendering it line by line.

use std::io;
use std::path::Path;

use expando::{Expando, RegistryError, RenderFlags};
use tracing::{debug, warn};

use crate::entry::FolderEntry;
use crate::fields::{folder_registry, Folder};

/// Configuration key of the listing format.
pub const FORMAT_KEY: &str = "folder_format";

/// Configuration key of the strftime pattern used by `%D`.
pub const DATE_FORMAT_KEY: &str = "date_format";

pub const DEFAULT_DATE_FORMAT: &str = "!%a, %b %d, %Y at %I:%M:%S%p %Z";

/// Flags every listing row is rendered with.
pub const LISTING_FLAGS: RenderFlags = RenderFlags::ARROW_CURSOR;

/// Reads the entries of `dir`, sorted by name.
///
/// Entries whose metadata cannot be read are skipped.
pub fn read_dir(dir: &Path) -> io::Result<Vec<FolderEntry>> {
    let mut entries = Vec::new();

    for item in std::fs::read_dir(dir)? {
        let path = item?.path();
        match FolderEntry::from_path(&path) {
            Ok(entry) => entries.push(entry),
            Err(err) => warn!(path = %path.display(), error = %err, "skipping entry"),
        }
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    debug!(dir = %dir.display(), count = entries.len(), "read directory");
    Ok(entries)
}

/// Renders one line per entry, each at most `width` columns wide.
pub fn render_listing(
    format: &Expando,
    entries: &[FolderEntry],
    date_format: &str,
    width: usize,
) -> Result<Vec<String>, RegistryError> {
    let registry = folder_registry()?;

    Ok(entries
        .iter()
        .enumerate()
        .map(|(num, entry)| {
            let row = Folder::new(entry, num, date_format);
            format.render(&registry, &row, LISTING_FLAGS, width)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::FOLDER_FORMAT_DEFS;

    #[test]
    fn rows_use_arrow_cursor() {
        assert!(LISTING_FLAGS.contains(RenderFlags::ARROW_CURSOR));
    }

    #[test]
    fn rows_are_numbered_in_order() {
        let entries = [FolderEntry::new("a"), FolderEntry::new("b")];
        let format = Expando::parse("%C %f", FOLDER_FORMAT_DEFS).unwrap();
        let registry = folder_registry().unwrap();

        let lines = render_listing(&format, &entries, "%c", 80).unwrap();
        assert_eq!(lines, ["1 a", "2 b"]);

        let row = Folder::new(&entries[1], 1, "%c");
        assert_eq!(format.render(&registry, &row, LISTING_FLAGS, 80), lines[1]);
    }
}
