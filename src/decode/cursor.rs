use crate::error::{Error, Location};
use crate::options::Dialect;
use crate::Result;

/// Read position over the input text plus the active dialect. Every
/// production goes through it, so line and column stay accurate for error
/// reporting. Columns count bytes, starting at 1.
pub(crate) struct Cursor<'a> {
    bytes: &'a [u8],
    offset: usize,
    line: u32,
    column: u32,
    dialect: Dialect,
}

impl<'a> Cursor<'a> {
    pub fn new(input: &'a str, dialect: Dialect) -> Self {
        Self {
            bytes: input.as_bytes(),
            offset: 0,
            line: 1,
            column: 1,
            dialect,
        }
    }

    pub fn json5(&self) -> bool {
        self.dialect.is_json5()
    }

    pub fn peek(&self) -> Option<u8> {
        self.bytes.get(self.offset).copied()
    }

    pub fn peek_at(&self, ahead: usize) -> Option<u8> {
        self.bytes.get(self.offset + ahead).copied()
    }

    pub fn rest(&self) -> &'a [u8] {
        &self.bytes[self.offset..]
    }

    pub fn bump(&mut self) {
        self.offset += 1;
        self.column += 1;
    }

    pub fn bump_newline(&mut self) {
        self.offset += 1;
        self.line += 1;
        self.column = 1;
    }

    pub fn advance(&mut self, count: usize) {
        self.offset += count;
        self.column += count as u32;
    }

    pub fn location(&self) -> Location {
        Location {
            offset: self.offset,
            line: self.line,
            column: self.column,
        }
    }

    /// Consumes `literal` if the input continues with it.
    pub fn eat(&mut self, literal: &str) -> bool {
        if self.rest().starts_with(literal.as_bytes()) {
            self.advance(literal.len());
            return true;
        }
        false
    }

    /// Space, tab, CR and LF in both dialects; JSON5 additionally consumes
    /// `// …` and `/* … */` comments. A `/` in strict mode is not
    /// whitespace and is left for the dispatcher to reject.
    pub fn skip_whitespace(&mut self) -> Result<()> {
        loop {
            match self.peek() {
                Some(b' ') | Some(b'\t') | Some(b'\r') => self.bump(),
                Some(b'\n') => self.bump_newline(),
                Some(b'/') if self.json5() => self.skip_comment()?,
                _ => return Ok(()),
            }
        }
    }

    fn skip_comment(&mut self) -> Result<()> {
        let start = self.location();
        match self.peek_at(1) {
            Some(b'/') => {
                self.advance(2);
                while let Some(c) = self.peek() {
                    if c == b'\n' {
                        self.bump_newline();
                        return Ok(());
                    }
                    self.bump();
                }
                // A line comment may run to the end of input.
                Ok(())
            }
            Some(b'*') => {
                self.advance(2);
                while let Some(c) = self.peek() {
                    if c == b'*' && self.peek_at(1) == Some(b'/') {
                        self.advance(2);
                        return Ok(());
                    }
                    if c == b'\n' {
                        self.bump_newline();
                    } else {
                        self.bump();
                    }
                }
                Err(Error::syntax("unterminated block comment", start))
            }
            _ => Err(Error::syntax("expected '//' or '/*'", start)),
        }
    }

    /// Digit or `-` in both dialects; `.` and `+` only under JSON5.
    pub fn is_number_start(&self, c: u8) -> bool {
        is_digit(c) || c == b'-' || (self.json5() && (c == b'.' || c == b'+'))
    }
}

pub(crate) fn is_digit(c: u8) -> bool {
    c.is_ascii_digit()
}

pub(crate) fn is_hex_digit(c: u8) -> bool {
    c.is_ascii_hexdigit()
}

pub(crate) fn is_ascii_letter(c: u8) -> bool {
    c.is_ascii_alphabetic()
}
