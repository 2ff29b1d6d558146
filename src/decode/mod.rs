//! Decoding: text in, arena-owned value tree out.

mod cursor;
mod parser;

use crate::arena::{Arena, ValueId};
use crate::options::ParseOptions;
use crate::Result;

use cursor::Cursor;
use parser::Parser;

/// Parses one value of any kind into `arena` and returns its id.
pub fn parse_value(arena: &mut Arena, input: &str, options: &ParseOptions) -> Result<ValueId> {
    let cursor = Cursor::new(input, options.dialect);
    Parser::new(cursor, arena).parse_document()
}

/// Parses a document whose root must be an object.
pub fn parse_object(arena: &mut Arena, input: &str, options: &ParseOptions) -> Result<ValueId> {
    let cursor = Cursor::new(input, options.dialect);
    Parser::new(cursor, arena).parse_object_document()
}
