//! Entry and structure model for strukt.
//!
//! Defines the types the casting layer works on:
//! - [`Schema`] / [`FieldDefinition`]: a structure's fields as served by the content API
//! - [`Record`]: an entry's raw attributes
//! - [`FieldValue`]: a decoded attribute, with the rich values it can hold
//!   ([`File`], [`Image`], [`JsonField`], [`EditorBlocks`], [`DateRule`], [`HtmlString`], [`Block`])
//! - [`defaults`]: platform fields every entry carries
//!
//! These types carry no casting logic themselves; `strukt-cast` turns raw
//! attributes into [`FieldValue`]s and back.

pub mod coerce;
mod de;
pub mod defaults;
mod editor;
mod json;
mod media;
mod record;
mod rule;
mod schema;
mod value;

pub use editor::{EditorBlock, EditorBlocks, HtmlString};
pub use json::JsonField;
pub use media::{File, Image};
pub use record::{Record, STRUCTURE_KEY};
pub use rule::{DateRule, RuleParseError};
pub use schema::{FieldDefinition, FieldTags, Schema, MATRIX_BLOCK_TAG, MATRIX_TAG};
pub use value::{Block, FieldValue, OptionValue, BLOCK_TYPE_KEY, DATETIME_FORMAT, DATE_FORMAT};
