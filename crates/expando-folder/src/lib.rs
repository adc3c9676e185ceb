//! Folder browser listings rendered with expando formats.
//!
//! Each directory entry becomes a [`Folder`] row and is rendered through
//! [`folder_registry`] with a format such as [`DEFAULT_FOLDER_FORMAT`]:
//!
//! ```rust
//! use expando::{Expando, RenderFlags};
//! use expando_folder::{folder_registry, Folder, FolderEntry, FOLDER_FORMAT_DEFS};
//!
//! let entry = FolderEntry {
//!     size: 2048,
//!     mode: 0o755,
//!     ..FolderEntry::new("build.sh")
//! };
//! let registry = folder_registry().unwrap();
//! let format = Expando::parse("%-10f|%5s", FOLDER_FORMAT_DEFS).unwrap();
//! let row = Folder::new(&entry, 0, "%c");
//! assert_eq!(format.render(&registry, &row, RenderFlags::empty(), 80), "build.sh* | 2.0K");
//! ```

mod entry;
mod fields;
mod listing;

pub use entry::{mode, pretty_size, EntryKind, FolderEntry};
pub use fields::{
    folder_registry, folder_render_data, strftime, Folder, FolderField, DEFAULT_FOLDER_FORMAT,
    FOLDER, FOLDER_FORMAT_DEFS,
};
pub use listing::{
    read_dir, render_listing, DATE_FORMAT_KEY, DEFAULT_DATE_FORMAT, FORMAT_KEY, LISTING_FLAGS,
};
