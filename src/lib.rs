//! Arena-backed JSON and JSON5 tree parser and serializer.
//!
//! The parser ingests one in-memory text buffer into a tree of typed values
//! whose storage is carved from a chained-block arena; the serializer emits
//! the tree back as compact or pretty text. The tree and its arena travel
//! together as a [`Document`] and are torn down as one unit.
//!
//! ```
//! use hawkjson::{Dialect, ParseOptions, Value};
//!
//! let options = ParseOptions::new().with_dialect(Dialect::Json5);
//! let doc = hawkjson::parse_str_with_options("{a: 1, /* note */ b: 2,}", &options).unwrap();
//! let Value::Object(range) = *doc.get(doc.root()) else {
//!     panic!("expected object root");
//! };
//! let a = doc.arena().field(range, "a").unwrap();
//! assert_eq!(*doc.get(a), Value::Int(1));
//! ```

pub mod arena;
pub mod decode;
pub mod encode;
pub mod error;
pub mod options;

pub use crate::arena::{Arena, ByteSlice, Pair, PairRange, Value, ValueId, NULL_ID};
pub use crate::error::{Error, ErrorKind, Location};
pub use crate::options::{Dialect, ParseOptions, WriteOptions};

pub type Result<T> = std::result::Result<T, Error>;

/// A parsed value tree together with the arena that owns it.
#[derive(Debug)]
pub struct Document {
    arena: Arena,
    root: ValueId,
}

impl Document {
    pub fn root(&self) -> ValueId {
        self.root
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    /// Mutable access for explicit element/field replacement.
    pub fn arena_mut(&mut self) -> &mut Arena {
        &mut self.arena
    }

    pub fn get(&self, id: ValueId) -> &Value {
        self.arena.get(id)
    }
}

pub fn parse_str(input: &str) -> Result<Document> {
    parse_str_with_options(input, &ParseOptions::default())
}

pub fn parse_str_with_options(input: &str, options: &ParseOptions) -> Result<Document> {
    let mut arena = Arena::with_capacity(input.len());
    let root = decode::parse_value(&mut arena, input, options)?;
    Ok(Document { arena, root })
}

pub fn parse_object_str(input: &str) -> Result<Document> {
    parse_object_str_with_options(input, &ParseOptions::default())
}

pub fn parse_object_str_with_options(input: &str, options: &ParseOptions) -> Result<Document> {
    let mut arena = Arena::with_capacity(input.len());
    let root = decode::parse_object(&mut arena, input, options)?;
    Ok(Document { arena, root })
}

/// Parses into a caller-owned arena, allowing reuse across parses with an
/// explicit [`Arena::clear`] between them. One arena serves one parse at a
/// time.
pub fn parse_into(arena: &mut Arena, input: &str, options: &ParseOptions) -> Result<ValueId> {
    decode::parse_value(arena, input, options)
}

pub fn to_string(document: &Document) -> String {
    to_string_with_options(document, &WriteOptions::default())
}

pub fn to_string_with_options(document: &Document, options: &WriteOptions) -> String {
    encode::to_string(document.arena(), document.root(), options)
}
