//! Field tables and render registries.
//!
//! Two tables describe a domain:
//!
//! - A **field table** (`&[FieldDef]`) used at parse time. It maps the short
//!   names written in format strings to `(domain, uid)` keys.
//! - A **render registry** ([`RenderRegistry`]) used at render time. It maps
//!   the same keys to getter functions over the domain's row type.
//!
//! ```rust
//! use expando::{ExpandoField, FieldDef, RenderData, RenderFlags, RenderRegistry, ValueType};
//!
//! struct Row { name: String, size: i64 }
//!
//! const DEFS: &[FieldDef] = &[
//!     FieldDef::new("n", "name", 1, 0, ValueType::String),
//!     FieldDef::new("s", "size", 1, 1, ValueType::Number),
//! ];
//!
//! fn name(_: &ExpandoField, row: &Row, _: RenderFlags) -> String {
//!     row.name.clone()
//! }
//!
//! fn size(_: &ExpandoField, row: &Row, _: RenderFlags) -> i64 {
//!     row.size
//! }
//!
//! let registry = RenderRegistry::new(&[
//!     RenderData::string(1, 0, name),
//!     RenderData::number(1, 1, size),
//! ])
//! .unwrap();
//! registry.check(DEFS).unwrap();
//! ```

use std::collections::HashMap;
use std::fmt;

use bitflags::bitflags;

use crate::error::RegistryError;
use crate::node::{DomainId, ExpandoField, FieldKey, UniqueId};

bitflags! {
    /// Flags passed through the renderer to every getter.
    ///
    /// The renderer itself only ever adds [`RenderFlags::OPTIONAL`], while
    /// evaluating or rendering conditional content.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct RenderFlags: u32 {
        /// The row is drawn with an arrow cursor.
        const ARROW_CURSOR  = 1 << 0;
        /// The row is part of an index listing.
        const INDEX         = 1 << 1;
        /// Rendering inside a conditional.
        const OPTIONAL      = 1 << 2;
        /// Render without colour markers.
        const PLAIN         = 1 << 3;
        /// Values come from a stat of the file rather than a mailbox.
        const STAT_FILE     = 1 << 4;
        /// Draw thread-tree glyphs.
        const TREE          = 1 << 5;
        /// Always show the subject, even when it repeats.
        const FORCE_SUBJECT = 1 << 6;
    }
}

/// The kind of value a field produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueType {
    String,
    Number,
}

/// How a field is written in a format string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldSyntax {
    /// Just the identifier.
    Plain,
    /// A date field. In a plain escape the identifier is followed by an
    /// argument ending at `close`; in a conditional it is followed by a
    /// count and period such as `3d`.
    Date { close: char },
}

/// One entry of a field table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldDef {
    pub short_name: &'static str,
    pub long_name: &'static str,
    pub domain: DomainId,
    pub uid: UniqueId,
    pub value_type: ValueType,
    pub syntax: FieldSyntax,
}

impl FieldDef {
    pub const fn new(
        short_name: &'static str,
        long_name: &'static str,
        domain: DomainId,
        uid: UniqueId,
        value_type: ValueType,
    ) -> Self {
        Self {
            short_name,
            long_name,
            domain,
            uid,
            value_type,
            syntax: FieldSyntax::Plain,
        }
    }

    /// A date field whose argument runs to `close`.
    pub const fn date(
        short_name: &'static str,
        long_name: &'static str,
        domain: DomainId,
        uid: UniqueId,
        close: char,
    ) -> Self {
        Self {
            short_name,
            long_name,
            domain,
            uid,
            value_type: ValueType::String,
            syntax: FieldSyntax::Date { close },
        }
    }

    pub const fn key(&self) -> FieldKey {
        FieldKey::new(self.domain, self.uid)
    }
}

/// Produces a field's text for one row.
pub type StringGetter<T> = fn(&ExpandoField, &T, RenderFlags) -> String;

/// Produces a field's numeric value for one row.
pub type NumberGetter<T> = fn(&ExpandoField, &T, RenderFlags) -> i64;

/// One record of a render registry: the getters for one field.
pub struct RenderData<T> {
    pub domain: DomainId,
    pub uid: UniqueId,
    pub get_string: Option<StringGetter<T>>,
    pub get_number: Option<NumberGetter<T>>,
}

impl<T> RenderData<T> {
    pub const fn string(domain: DomainId, uid: UniqueId, get: StringGetter<T>) -> Self {
        Self {
            domain,
            uid,
            get_string: Some(get),
            get_number: None,
        }
    }

    pub const fn number(domain: DomainId, uid: UniqueId, get: NumberGetter<T>) -> Self {
        Self {
            domain,
            uid,
            get_string: None,
            get_number: Some(get),
        }
    }

    pub const fn both(
        domain: DomainId,
        uid: UniqueId,
        get_string: StringGetter<T>,
        get_number: NumberGetter<T>,
    ) -> Self {
        Self {
            domain,
            uid,
            get_string: Some(get_string),
            get_number: Some(get_number),
        }
    }

    pub const fn key(&self) -> FieldKey {
        FieldKey::new(self.domain, self.uid)
    }
}

// Manual impls: fn pointers are Copy for every T, derive would demand T: Copy.
impl<T> Clone for RenderData<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for RenderData<T> {}

impl<T> fmt::Debug for RenderData<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderData")
            .field("key", &self.key())
            .field("string", &self.get_string.is_some())
            .field("number", &self.get_number.is_some())
            .finish()
    }
}

struct Getters<T> {
    string: Option<StringGetter<T>>,
    number: Option<NumberGetter<T>>,
}

/// Keyed lookup of getters, compiled once from a list of [`RenderData`].
pub struct RenderRegistry<T> {
    getters: HashMap<FieldKey, Getters<T>>,
}

impl<T> RenderRegistry<T> {
    /// Compiles records into a lookup map.
    ///
    /// Fails if a record has no getter at all or a key appears twice.
    pub fn new(records: &[RenderData<T>]) -> Result<Self, RegistryError> {
        let mut getters = HashMap::with_capacity(records.len());

        for record in records {
            let key = record.key();
            if record.get_string.is_none() && record.get_number.is_none() {
                return Err(RegistryError::MissingGetter(key));
            }
            let entry = Getters {
                string: record.get_string,
                number: record.get_number,
            };
            if getters.insert(key, entry).is_some() {
                return Err(RegistryError::DuplicateKey(key));
            }
        }

        Ok(Self { getters })
    }

    /// Verifies that every field in `defs` can be rendered by this registry.
    ///
    /// String fields need a string getter, number fields a number getter, and
    /// date fields also a number getter (the timestamp tested by date
    /// conditions).
    pub fn check(&self, defs: &[FieldDef]) -> Result<(), RegistryError> {
        for def in defs {
            let key = def.key();
            let mismatch = |reason| RegistryError::Mismatch {
                name: def.short_name,
                key,
                reason,
            };

            let getters = self
                .getters
                .get(&key)
                .ok_or_else(|| mismatch("no record registered"))?;

            match def.value_type {
                ValueType::String if getters.string.is_none() => {
                    return Err(mismatch("string field without a string getter"))
                }
                ValueType::Number if getters.number.is_none() => {
                    return Err(mismatch("number field without a number getter"))
                }
                _ => {}
            }

            if matches!(def.syntax, FieldSyntax::Date { .. }) && getters.number.is_none() {
                return Err(mismatch("date field without a timestamp getter"));
            }
        }
        Ok(())
    }

    pub fn string_getter(&self, key: FieldKey) -> Option<StringGetter<T>> {
        self.getters.get(&key).and_then(|g| g.string)
    }

    pub fn number_getter(&self, key: FieldKey) -> Option<NumberGetter<T>> {
        self.getters.get(&key).and_then(|g| g.number)
    }

    pub fn contains(&self, key: FieldKey) -> bool {
        self.getters.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.getters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.getters.is_empty()
    }
}

impl<T> fmt::Debug for RenderRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.getters.keys().collect();
        keys.sort();
        f.debug_struct("RenderRegistry").field("keys", &keys).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row {
        name: &'static str,
        size: i64,
    }

    fn name(_: &ExpandoField, row: &Row, _: RenderFlags) -> String {
        row.name.to_string()
    }

    fn size(_: &ExpandoField, row: &Row, _: RenderFlags) -> i64 {
        row.size
    }

    const DEFS: &[FieldDef] = &[
        FieldDef::new("n", "name", 3, 0, ValueType::String),
        FieldDef::new("s", "size", 3, 1, ValueType::Number),
    ];

    #[test]
    fn builds_and_looks_up() {
        let registry = RenderRegistry::new(&[RenderData::string(3, 0, name), RenderData::number(3, 1, size)])
            .unwrap();
        assert_eq!(registry.len(), 2);

        let row = Row { name: "inbox", size: 42 };
        let field = ExpandoField::new(FieldKey::new(3, 0), Default::default());
        let get = registry.string_getter(FieldKey::new(3, 0)).unwrap();
        assert_eq!(get(&field, &row, RenderFlags::empty()), "inbox");
        assert!(registry.number_getter(FieldKey::new(3, 0)).is_none());
        assert!(!registry.contains(FieldKey::new(4, 0)));
    }

    #[test]
    fn rejects_duplicate_key() {
        let err = RenderRegistry::new(&[RenderData::string(3, 0, name), RenderData::number(3, 0, size)])
            .unwrap_err();
        assert_eq!(err, RegistryError::DuplicateKey(FieldKey::new(3, 0)));
    }

    #[test]
    fn rejects_record_without_getter() {
        let empty = RenderData::<Row> {
            domain: 3,
            uid: 9,
            get_string: None,
            get_number: None,
        };
        let err = RenderRegistry::new(&[empty]).unwrap_err();
        assert_eq!(err, RegistryError::MissingGetter(FieldKey::new(3, 9)));
    }

    #[test]
    fn check_accepts_matching_table() {
        let registry = RenderRegistry::new(&[RenderData::string(3, 0, name), RenderData::number(3, 1, size)])
            .unwrap();
        assert!(registry.check(DEFS).is_ok());
    }

    #[test]
    fn check_reports_missing_and_mismatched() {
        let registry = RenderRegistry::new(&[RenderData::string(3, 0, name)]).unwrap();
        assert!(matches!(
            registry.check(DEFS),
            Err(RegistryError::Mismatch { name: "s", .. })
        ));

        let registry = RenderRegistry::new(&[RenderData::number(3, 0, size), RenderData::number(3, 1, size)])
            .unwrap();
        assert!(matches!(
            registry.check(DEFS),
            Err(RegistryError::Mismatch { name: "n", .. })
        ));
    }

    #[test]
    fn check_date_needs_timestamp() {
        let defs = [FieldDef::date("[", "date", 3, 2, ']')];
        let registry = RenderRegistry::new(&[RenderData::string(3, 2, name)]).unwrap();
        assert!(registry.check(&defs).is_err());

        let registry = RenderRegistry::new(&[RenderData::both(3, 2, name, size)]).unwrap();
        assert!(registry.check(&defs).is_ok());
    }

    #[test]
    fn flags_compose() {
        let flags = RenderFlags::INDEX | RenderFlags::OPTIONAL;
        assert!(flags.contains(RenderFlags::OPTIONAL));
        assert!(!flags.contains(RenderFlags::TREE));
    }
}
