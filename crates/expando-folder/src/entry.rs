//! Directory entries as shown by the folder browser.

use std::io;
use std::path::Path;
use std::time::UNIX_EPOCH;

/// What a directory entry points at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EntryKind {
    #[default]
    File,
    Directory,
    Symlink,
}

/// Permission bits, matching the POSIX `st_mode` layout.
pub mod mode {
    pub const SET_UID: u32 = 0o4000;
    pub const SET_GID: u32 = 0o2000;
    pub const STICKY: u32 = 0o1000;
    pub const USER_EXEC: u32 = 0o100;
}

/// One line of the folder browser.
///
/// Local entries come from the filesystem; remote ones (IMAP mailboxes)
/// carry no file metadata and render their file fields as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderEntry {
    pub name: String,
    pub desc: Option<String>,
    /// Permission bits, including setuid, setgid and sticky.
    pub mode: u32,
    pub kind: EntryKind,
    pub local: bool,
    /// Remote IMAP mailbox.
    pub imap: bool,
    /// Remote mailbox that has both sub-mailboxes and mail of its own.
    pub has_children: bool,
    pub size: u64,
    /// Modification time, Unix seconds.
    pub mtime: i64,
    pub nlink: u64,
    pub owner: String,
    pub group: String,
    pub msg_count: i64,
    pub msg_unread: i64,
    pub has_new_mail: bool,
    pub tagged: bool,
    pub notify_user: bool,
    pub poll_new_mail: bool,
    pub has_mailbox: bool,
}

impl FolderEntry {
    /// A local regular file with no metadata.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            local: true,
            ..Self::default()
        }
    }

    /// Reads an entry from the filesystem without following a final symlink.
    pub fn from_path(path: &Path) -> io::Result<Self> {
        let meta = std::fs::symlink_metadata(path)?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let kind = if meta.file_type().is_symlink() {
            EntryKind::Symlink
        } else if meta.is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::File
        };

        let mtime = meta
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map_or(0, |d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX));

        let mut entry = Self {
            name,
            kind,
            local: true,
            size: meta.len(),
            mtime,
            ..Self::default()
        };
        fill_owner_and_mode(&mut entry, &meta);
        Ok(entry)
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    /// `@` for symlinks, `/` for directories, `*` for executables; local only.
    pub fn type_suffix(&self) -> &'static str {
        if !self.local {
            return "";
        }
        match self.kind {
            EntryKind::Symlink => "@",
            EntryKind::Directory => "/",
            EntryKind::File if self.mode & mode::USER_EXEC != 0 => "*",
            EntryKind::File => "",
        }
    }

    /// `ls -l` style permission string, e.g. `drwxr-x---`.
    ///
    /// Remote IMAP entries show `IMAP +` when they have children, `IMAP  `
    /// otherwise; other remote entries show nothing.
    pub fn permissions(&self) -> String {
        if !self.local {
            return if self.imap {
                format!("IMAP {}", if self.has_children { '+' } else { ' ' })
            } else {
                String::new()
            };
        }

        let bit = |mask: u32, c: char| if self.mode & mask != 0 { c } else { '-' };
        let exec = |special: u32, s: char, mask: u32| {
            if self.mode & special != 0 {
                s
            } else {
                bit(mask, 'x')
            }
        };

        let kind = match self.kind {
            EntryKind::Directory => 'd',
            EntryKind::Symlink => 'l',
            EntryKind::File => '-',
        };

        [
            kind,
            bit(0o400, 'r'),
            bit(0o200, 'w'),
            exec(mode::SET_UID, 's', 0o100),
            bit(0o040, 'r'),
            bit(0o020, 'w'),
            exec(mode::SET_GID, 's', 0o010),
            bit(0o004, 'r'),
            bit(0o002, 'w'),
            exec(mode::STICKY, 't', 0o001),
        ]
        .iter()
        .collect()
    }
}

#[cfg(unix)]
fn fill_owner_and_mode(entry: &mut FolderEntry, meta: &std::fs::Metadata) {
    use std::os::unix::fs::MetadataExt;

    entry.mode = meta.mode() & 0o7777;
    entry.nlink = meta.nlink();
    entry.owner = meta.uid().to_string();
    entry.group = meta.gid().to_string();
}

#[cfg(not(unix))]
fn fill_owner_and_mode(entry: &mut FolderEntry, meta: &std::fs::Metadata) {
    let write = if meta.permissions().readonly() { 0 } else { 0o200 };
    let exec = if meta.is_dir() { 0o111 } else { 0 };
    entry.mode = 0o444 | write | exec;
    entry.nlink = 1;
}

/// Human-sized byte count: `999`, `1.2K`, `87K`, `3.4M`, `120M`.
pub fn pretty_size(bytes: u64) -> String {
    const K: f64 = 1024.0;
    const M: f64 = 1024.0 * 1024.0;

    match bytes {
        0..=999 => bytes.to_string(),
        1000..=10188 => format!("{:.1}K", bytes as f64 / K),
        10189..=1023948 => format!("{}K", (bytes + 51) / 1024),
        1023949..=10433331 => format!("{:.1}M", bytes as f64 / M),
        _ => format!("{}M", (bytes + 52428) / 1_048_576),
    }
}
