//! The folder field table and its getters.

use std::fmt::Write as _;

use chrono::{Local, TimeZone};
use expando::{
    DomainId, ExpandoField, FieldDef, RegistryError, RenderData, RenderFlags, RenderRegistry,
    ValueType,
};

use crate::entry::{pretty_size, FolderEntry};

/// Domain id of the folder fields.
pub const FOLDER: DomainId = 1;

/// Unique ids within [`FOLDER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum FolderField {
    Notify,
    Number,
    Date,
    DateFormat,
    FileMode,
    Filename,
    FileGroup,
    Description,
    HardLinks,
    MessageCount,
    NewMail,
    UnreadCount,
    Poll,
    FileSize,
    Tagged,
    FileOwner,
    Strf,
}

use FolderField as F;

/// The listing used when no format is configured.
pub const DEFAULT_FOLDER_FORMAT: &str = "%2C %t %N %F %2l %-8.8u %-8.8g %8s %d %i";

/// Fields accepted in a folder format.
pub const FOLDER_FORMAT_DEFS: &[FieldDef] = &[
    FieldDef::new("a", "notify", FOLDER, F::Notify as u16, ValueType::Number),
    FieldDef::new("C", "number", FOLDER, F::Number as u16, ValueType::Number),
    FieldDef::new("d", "date", FOLDER, F::Date as u16, ValueType::String),
    FieldDef::new("D", "date-format", FOLDER, F::DateFormat as u16, ValueType::String),
    FieldDef::new("F", "file-mode", FOLDER, F::FileMode as u16, ValueType::String),
    FieldDef::new("f", "filename", FOLDER, F::Filename as u16, ValueType::String),
    FieldDef::new("g", "file-group", FOLDER, F::FileGroup as u16, ValueType::String),
    FieldDef::new("i", "description", FOLDER, F::Description as u16, ValueType::String),
    FieldDef::new("l", "hard-links", FOLDER, F::HardLinks as u16, ValueType::String),
    FieldDef::new("m", "message-count", FOLDER, F::MessageCount as u16, ValueType::String),
    FieldDef::new("N", "new-mail", FOLDER, F::NewMail as u16, ValueType::String),
    FieldDef::new("n", "unread-count", FOLDER, F::UnreadCount as u16, ValueType::String),
    FieldDef::new("p", "poll", FOLDER, F::Poll as u16, ValueType::Number),
    FieldDef::new("s", "file-size", FOLDER, F::FileSize as u16, ValueType::String),
    FieldDef::new("t", "tagged", FOLDER, F::Tagged as u16, ValueType::String),
    FieldDef::new("u", "file-owner", FOLDER, F::FileOwner as u16, ValueType::String),
    FieldDef::date("[", "strf", FOLDER, F::Strf as u16, ']'),
];

/// One row of the browser: an entry and where it sits in the listing.
#[derive(Debug, Clone, Copy)]
pub struct Folder<'a> {
    pub entry: &'a FolderEntry,
    /// Zero-based position in the listing.
    pub num: usize,
    /// strftime pattern for `%D`.
    pub date_format: &'a str,
}

impl<'a> Folder<'a> {
    pub fn new(entry: &'a FolderEntry, num: usize, date_format: &'a str) -> Self {
        Self {
            entry,
            num,
            date_format,
        }
    }
}

const ONE_YEAR: i64 = 31_536_000;

/// Formats a Unix timestamp in local time.
///
/// A leading `!` is accepted and dropped. Patterns chrono cannot format
/// produce an empty string.
pub fn strftime(timestamp: i64, pattern: &str) -> String {
    let pattern = pattern.strip_prefix('!').unwrap_or(pattern);
    let Some(time) = Local.timestamp_opt(timestamp, 0).earliest() else {
        return String::new();
    };

    let mut out = String::new();
    if write!(out, "{}", time.format(pattern)).is_err() {
        out.clear();
    }
    out
}

/// `ls -l` style date: time of day within the last year, the year otherwise.
fn listing_date(mtime: i64, now: i64) -> String {
    let pattern = if now - mtime < ONE_YEAR {
        "%b %d %H:%M"
    } else {
        "%b %d  %Y"
    };
    strftime(mtime, pattern)
}

fn flag(set: bool, c: &str) -> String {
    let s = if set { c } else { " " };
    s.to_string()
}

fn to_i64<N: TryInto<i64>>(n: N) -> i64 {
    n.try_into().unwrap_or(i64::MAX)
}

fn notify_num(_: &ExpandoField, f: &Folder<'_>, _: RenderFlags) -> i64 {
    i64::from(f.entry.notify_user)
}

fn number_num(_: &ExpandoField, f: &Folder<'_>, _: RenderFlags) -> i64 {
    to_i64(f.num).saturating_add(1)
}

fn mtime_num(_: &ExpandoField, f: &Folder<'_>, _: RenderFlags) -> i64 {
    if f.entry.local {
        f.entry.mtime
    } else {
        0
    }
}

fn date(_: &ExpandoField, f: &Folder<'_>, _: RenderFlags) -> String {
    if !f.entry.local {
        return String::new();
    }
    listing_date(f.entry.mtime, Local::now().timestamp())
}

fn date_format(_: &ExpandoField, f: &Folder<'_>, _: RenderFlags) -> String {
    if !f.entry.local {
        return String::new();
    }
    strftime(f.entry.mtime, f.date_format)
}

fn file_mode(_: &ExpandoField, f: &Folder<'_>, _: RenderFlags) -> String {
    f.entry.permissions()
}

fn filename(_: &ExpandoField, f: &Folder<'_>, _: RenderFlags) -> String {
    format!("{}{}", f.entry.name, f.entry.type_suffix())
}

fn file_group(_: &ExpandoField, f: &Folder<'_>, _: RenderFlags) -> String {
    if f.entry.local {
        f.entry.group.clone()
    } else {
        String::new()
    }
}

fn description(_: &ExpandoField, f: &Folder<'_>, _: RenderFlags) -> String {
    let name = f.entry.desc.as_deref().unwrap_or(&f.entry.name);
    format!("{}{}", name, f.entry.type_suffix())
}

fn hard_links_num(_: &ExpandoField, f: &Folder<'_>, _: RenderFlags) -> i64 {
    if f.entry.local {
        to_i64(f.entry.nlink)
    } else {
        0
    }
}

fn hard_links(_: &ExpandoField, f: &Folder<'_>, _: RenderFlags) -> String {
    if f.entry.local {
        f.entry.nlink.to_string()
    } else {
        String::new()
    }
}

fn message_count_num(_: &ExpandoField, f: &Folder<'_>, _: RenderFlags) -> i64 {
    if f.entry.has_mailbox {
        f.entry.msg_count
    } else {
        0
    }
}

fn message_count(_: &ExpandoField, f: &Folder<'_>, _: RenderFlags) -> String {
    if f.entry.has_mailbox {
        f.entry.msg_count.to_string()
    } else {
        String::new()
    }
}

fn new_mail_num(_: &ExpandoField, f: &Folder<'_>, _: RenderFlags) -> i64 {
    i64::from(f.entry.has_new_mail)
}

fn new_mail(_: &ExpandoField, f: &Folder<'_>, _: RenderFlags) -> String {
    flag(f.entry.has_new_mail, "N")
}

fn unread_count_num(_: &ExpandoField, f: &Folder<'_>, _: RenderFlags) -> i64 {
    if f.entry.has_mailbox {
        f.entry.msg_unread
    } else {
        0
    }
}

fn unread_count(_: &ExpandoField, f: &Folder<'_>, _: RenderFlags) -> String {
    if f.entry.has_mailbox {
        f.entry.msg_unread.to_string()
    } else {
        String::new()
    }
}

fn poll_num(_: &ExpandoField, f: &Folder<'_>, _: RenderFlags) -> i64 {
    i64::from(f.entry.poll_new_mail)
}

fn file_size_num(_: &ExpandoField, f: &Folder<'_>, _: RenderFlags) -> i64 {
    to_i64(f.entry.size)
}

fn file_size(_: &ExpandoField, f: &Folder<'_>, _: RenderFlags) -> String {
    pretty_size(f.entry.size)
}

fn tagged_num(_: &ExpandoField, f: &Folder<'_>, _: RenderFlags) -> i64 {
    i64::from(f.entry.tagged)
}

fn tagged(_: &ExpandoField, f: &Folder<'_>, _: RenderFlags) -> String {
    flag(f.entry.tagged, "*")
}

fn file_owner(_: &ExpandoField, f: &Folder<'_>, _: RenderFlags) -> String {
    if f.entry.local {
        f.entry.owner.clone()
    } else {
        String::new()
    }
}

fn strf(field: &ExpandoField, f: &Folder<'_>, _: RenderFlags) -> String {
    if !f.entry.local {
        return String::new();
    }
    strftime(f.entry.mtime, field.arg.as_deref().unwrap_or(""))
}

/// Getters for every field in [`FOLDER_FORMAT_DEFS`].
pub fn folder_render_data<'a>() -> Vec<RenderData<Folder<'a>>> {
    vec![
        RenderData::number(FOLDER, F::Notify as u16, notify_num),
        RenderData::number(FOLDER, F::Number as u16, number_num),
        RenderData::both(FOLDER, F::Date as u16, date, mtime_num),
        RenderData::both(FOLDER, F::DateFormat as u16, date_format, mtime_num),
        RenderData::string(FOLDER, F::FileMode as u16, file_mode),
        RenderData::string(FOLDER, F::Filename as u16, filename),
        RenderData::string(FOLDER, F::FileGroup as u16, file_group),
        RenderData::string(FOLDER, F::Description as u16, description),
        RenderData::both(FOLDER, F::HardLinks as u16, hard_links, hard_links_num),
        RenderData::both(FOLDER, F::MessageCount as u16, message_count, message_count_num),
        RenderData::both(FOLDER, F::NewMail as u16, new_mail, new_mail_num),
        RenderData::both(FOLDER, F::UnreadCount as u16, unread_count, unread_count_num),
        RenderData::number(FOLDER, F::Poll as u16, poll_num),
        RenderData::both(FOLDER, F::FileSize as u16, file_size, file_size_num),
        RenderData::both(FOLDER, F::Tagged as u16, tagged, tagged_num),
        RenderData::string(FOLDER, F::FileOwner as u16, file_owner),
        RenderData::both(FOLDER, F::Strf as u16, strf, mtime_num),
    ]
}

/// Builds the folder registry and checks it against [`FOLDER_FORMAT_DEFS`].
pub fn folder_registry<'a>() -> Result<RenderRegistry<Folder<'a>>, RegistryError> {
    let registry = RenderRegistry::new(&folder_render_data())?;
    registry.check(FOLDER_FORMAT_DEFS)?;
    Ok(registry)
}
