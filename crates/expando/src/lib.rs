//! Expando - compiled row formats for fixed-width terminal displays.
//!
//! An expando is a printf-like format string such as
//! `"%2C %-8.8u %8s %<N?new&   > %f"`. It is compiled once into a tree and
//! rendered many times, once per visible row, into text that fits an exact
//! number of terminal columns. Wide glyphs are never split and every field
//! can be padded, truncated and justified.
//!
//! # Quick Start
//!
//! ```rust
//! use expando::{Expando, ExpandoField, FieldDef, RenderData, RenderFlags, RenderRegistry, ValueType};
//!
//! struct Mailbox {
//!     name: String,
//!     unread: i64,
//! }
//!
//! const MAILBOX: u16 = 1;
//!
//! // What the parser accepts
//! const DEFS: &[FieldDef] = &[
//!     FieldDef::new("f", "name", MAILBOX, 0, ValueType::String),
//!     FieldDef::new("n", "unread", MAILBOX, 1, ValueType::Number),
//! ];
//!
//! fn name(_: &ExpandoField, m: &Mailbox, _: RenderFlags) -> String {
//!     m.name.clone()
//! }
//!
//! fn unread(_: &ExpandoField, m: &Mailbox, _: RenderFlags) -> i64 {
//!     m.unread
//! }
//!
//! // How the renderer gets the values
//! let registry = RenderRegistry::new(&[
//!     RenderData::string(MAILBOX, 0, name),
//!     RenderData::number(MAILBOX, 1, unread),
//! ])
//! .unwrap();
//! registry.check(DEFS).unwrap();
//!
//! let exp = Expando::parse("%-8f%<n?(%n)&->", DEFS).unwrap();
//! let inbox = Mailbox { name: "inbox".into(), unread: 3 };
//! assert_eq!(exp.render(&registry, &inbox, RenderFlags::empty(), 80), "inbox   (3)");
//! ```
//!
//! # Format Syntax
//!
//! | Syntax            | Meaning                                              |
//! |-------------------|------------------------------------------------------|
//! | `%X`              | field `X`                                            |
//! | `%-8.8X`          | field `X`, see [`FormatSpec`]                        |
//! | `%%`              | a literal `%`                                        |
//! | `%<X?yes&no>`     | `yes` if `X` is non-zero / non-empty, else `no`      |
//! | `%<X?yes>`        | `yes` or nothing                                     |
//! | `%<[3d?new&old>`  | date condition: newer than 3 days (`ymwdHM`)         |
//! | `%[%b %d]`        | date field with a strftime argument                  |
//! | `%>X` `%*X` `%\|X` | hard, soft and end-of-line padding with `X`         |
//! | `\&` `\>` `\\`    | literal delimiters inside conditionals               |
//!
//! # Modules
//!
//! - [`width`]: display-width measurement, clipping and padding
//! - [`conddate`]: cutoff times for date conditions
//! - [`cache`]: the process-wide store of compiled formats
//!
//! The library logs through `tracing` and never installs a subscriber.

mod config;
mod error;
mod format;
mod lexer;
mod node;
mod parser;
mod registry;
mod render;
mod template;

pub mod cache;
pub mod conddate;
pub mod width;

pub use cache::ExpandoCache;
pub use config::FormatConfig;
pub use error::{ConfigError, Error, ParseError, ParseErrorKind, RegistryError, Result};
pub use format::{FormatSpec, Justify};
pub use node::{
    CondDate, Conditional, DomainId, ExpandoField, FieldKey, Node, PadKind, Padding, Period,
    UniqueId,
};
pub use parser::{parse, Parser};
pub use registry::{
    FieldDef, FieldSyntax, NumberGetter, RenderData, RenderFlags, RenderRegistry, StringGetter,
    ValueType,
};
pub use render::render;
pub use template::Expando;
