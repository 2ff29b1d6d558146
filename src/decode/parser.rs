use memchr::memchr3;
use smallvec::SmallVec;

use crate::arena::{Arena, Pair, Value, ValueId, NULL_ID};
use crate::error::Error;
use crate::Result;

use super::cursor::{is_ascii_letter, is_digit, is_hex_digit, Cursor};

type ElementBuf = SmallVec<[ValueId; 16]>;
type PairBuf = SmallVec<[Pair; 8]>;

/// Recursive-descent parser. Dispatches on the lookahead byte, drives the
/// cursor, and allocates every node it builds from the arena.
pub(crate) struct Parser<'a, 'b> {
    cursor: Cursor<'a>,
    arena: &'b mut Arena,
}

impl<'a, 'b> Parser<'a, 'b> {
    pub fn new(cursor: Cursor<'a>, arena: &'b mut Arena) -> Self {
        Self { cursor, arena }
    }

    /// Any-value entry point. Trailing bytes after the first complete value
    /// are not validated.
    pub fn parse_document(&mut self) -> Result<ValueId> {
        self.cursor.skip_whitespace()?;
        self.parse_value()
    }

    /// Object-only entry point: the first non-whitespace byte must open an
    /// object.
    pub fn parse_object_document(&mut self) -> Result<ValueId> {
        self.cursor.skip_whitespace()?;
        if self.cursor.peek() != Some(b'{') {
            return Err(Error::syntax("expected '{'", self.cursor.location()));
        }
        self.cursor.bump();
        self.parse_object_body()
    }

    fn parse_value(&mut self) -> Result<ValueId> {
        let c = match self.cursor.peek() {
            Some(c) => c,
            None => {
                return Err(Error::syntax(
                    "unexpected end of input",
                    self.cursor.location(),
                ))
            }
        };

        if self.cursor.is_number_start(c) {
            return self.parse_number();
        }
        if c == b'{' {
            self.cursor.bump();
            return self.parse_object_body();
        }
        if c == b'[' {
            self.cursor.bump();
            return self.parse_array_body();
        }
        if c == b't' || c == b'f' {
            if self.cursor.eat("true") {
                return Ok(self.arena.push(Value::Bool(true)));
            }
            if self.cursor.eat("false") {
                return Ok(self.arena.push(Value::Bool(false)));
            }
        }
        if c == b'n' && self.cursor.eat("null") {
            return Ok(NULL_ID);
        }
        let text = self.parse_string_token()?;
        let slice = self.arena.alloc_bytes(text.as_bytes());
        Ok(self.arena.push(Value::Str(slice)))
    }

    fn parse_number(&mut self) -> Result<ValueId> {
        let start = self.cursor.location();
        let mut negative = false;
        match self.cursor.peek() {
            Some(b'-') => {
                negative = true;
                self.cursor.bump();
            }
            Some(b'+') if self.cursor.json5() => self.cursor.bump(),
            _ => {}
        }

        if self.cursor.json5() {
            if self.cursor.eat("Infinity") {
                let value = if negative {
                    f32::NEG_INFINITY
                } else {
                    f32::INFINITY
                };
                return Ok(self.arena.push(Value::Float(value)));
            }
            if self.cursor.eat("NaN") {
                return Ok(self.arena.push(Value::Float(f32::NAN)));
            }
            if self.cursor.peek() == Some(b'0') && self.cursor.peek_at(1) == Some(b'x') {
                self.cursor.advance(2);
                return self.parse_hex(negative);
            }
        }

        let mut text = String::new();
        let mut is_float = false;
        let mut has_exponent = false;
        let mut digits = 0usize;

        loop {
            let c = match self.cursor.peek() {
                Some(c) => c,
                None => break,
            };
            if is_digit(c) {
                text.push(c as char);
                self.cursor.bump();
                digits += 1;
            } else if c == b'.' {
                if is_float || has_exponent {
                    return Err(Error::syntax(
                        "unexpected '.' in number",
                        self.cursor.location(),
                    ));
                }
                if !self.cursor.json5()
                    && (digits == 0 || !self.cursor.peek_at(1).is_some_and(is_digit))
                {
                    return Err(Error::syntax(
                        "unexpected '.' in number",
                        self.cursor.location(),
                    ));
                }
                is_float = true;
                text.push('.');
                self.cursor.bump();
            } else if c == b'e' || c == b'E' {
                if has_exponent {
                    return Err(Error::syntax(
                        "duplicate exponent in number",
                        self.cursor.location(),
                    ));
                }
                has_exponent = true;
                text.push('e');
                self.cursor.bump();
                if let Some(sign @ (b'+' | b'-')) = self.cursor.peek() {
                    text.push(sign as char);
                    self.cursor.bump();
                }
            } else {
                break;
            }
        }

        if digits == 0 {
            return Err(Error::syntax(
                "expected digit in number",
                self.cursor.location(),
            ));
        }

        if is_float || has_exponent {
            let magnitude: f32 = text
                .parse()
                .map_err(|_| Error::syntax(format!("malformed number '{text}'"), start))?;
            let value = if negative { -magnitude } else { magnitude };
            return Ok(self.arena.push(Value::Float(value)));
        }

        // Out-of-range literals truncate rather than error.
        let mut magnitude: i64 = 0;
        for digit in text.bytes() {
            magnitude = magnitude
                .wrapping_mul(10)
                .wrapping_add(i64::from(digit - b'0'));
        }
        let value = if negative {
            magnitude.wrapping_neg()
        } else {
            magnitude
        } as i32;
        Ok(self.arena.push(Value::Int(value)))
    }

    fn parse_hex(&mut self, negative: bool) -> Result<ValueId> {
        let mut digits = 0usize;
        let mut magnitude: i64 = 0;
        while let Some(c) = self.cursor.peek() {
            if !is_hex_digit(c) {
                if c == b'.' {
                    return Err(Error::syntax(
                        "unexpected '.' in hex number",
                        self.cursor.location(),
                    ));
                }
                break;
            }
            let digit = match c {
                b'0'..=b'9' => c - b'0',
                b'a'..=b'f' => c - b'a' + 10,
                _ => c - b'A' + 10,
            };
            magnitude = magnitude.wrapping_mul(16).wrapping_add(i64::from(digit));
            self.cursor.bump();
            digits += 1;
        }
        if digits == 0 {
            return Err(Error::syntax(
                "expected hex digit",
                self.cursor.location(),
            ));
        }
        let value = if negative {
            magnitude.wrapping_neg()
        } else {
            magnitude
        } as i32;
        Ok(self.arena.push(Value::Int(value)))
    }

    /// Quoted string in both dialects; single quotes and barewords only
    /// under JSON5. Shared by the value fallback and object keys.
    fn parse_string_token(&mut self) -> Result<String> {
        match self.cursor.peek() {
            Some(b'"') => self.parse_quoted(b'"'),
            Some(b'\'') if self.cursor.json5() => self.parse_quoted(b'\''),
            Some(c) if self.cursor.json5() && is_ascii_letter(c) => self.parse_bareword(),
            Some(c) => Err(Error::syntax(
                format!("unexpected character '{}'", c as char),
                self.cursor.location(),
            )),
            None => Err(Error::syntax(
                "unexpected end of input",
                self.cursor.location(),
            )),
        }
    }

    fn parse_quoted(&mut self, delim: u8) -> Result<String> {
        let open = self.cursor.location();
        self.cursor.bump();
        let mut out: Vec<u8> = Vec::new();
        loop {
            let rest = self.cursor.rest();
            let Some(found) = memchr3(delim, b'\\', b'\n', rest) else {
                return Err(Error::syntax("unterminated string", open));
            };
            out.extend_from_slice(&rest[..found]);
            self.cursor.advance(found);
            match rest[found] {
                c if c == delim => {
                    self.cursor.bump();
                    let text = String::from_utf8(out)
                        .map_err(|_| Error::syntax("invalid utf-8 in string", open))?;
                    return Ok(text);
                }
                b'\\' => self.parse_escape(&mut out)?,
                _ => {
                    if !self.cursor.json5() {
                        return Err(Error::syntax(
                            "raw newline in string",
                            self.cursor.location(),
                        ));
                    }
                    out.push(b'\n');
                    self.cursor.bump_newline();
                }
            }
        }
    }

    fn parse_escape(&mut self, out: &mut Vec<u8>) -> Result<()> {
        let start = self.cursor.location();
        self.cursor.bump();
        let c = match self.cursor.peek() {
            Some(c) => c,
            None => return Err(Error::syntax("unterminated escape", start)),
        };
        match c {
            b'"' => {
                out.push(b'"');
                self.cursor.bump();
            }
            b'\\' => {
                out.push(b'\\');
                self.cursor.bump();
            }
            b'/' => {
                out.push(b'/');
                self.cursor.bump();
            }
            b'b' => {
                out.push(0x08);
                self.cursor.bump();
            }
            b'f' => {
                out.push(0x0c);
                self.cursor.bump();
            }
            b'n' => {
                out.push(b'\n');
                self.cursor.bump();
            }
            b'r' => {
                out.push(b'\r');
                self.cursor.bump();
            }
            b't' => {
                out.push(b'\t');
                self.cursor.bump();
            }
            b'\'' if self.cursor.json5() => {
                out.push(b'\'');
                self.cursor.bump();
            }
            b'\n' if self.cursor.json5() => {
                out.push(b'\n');
                self.cursor.bump_newline();
            }
            b'u' => {
                // Validated but not decoded: the raw escape text passes
                // through unresolved.
                for ahead in 1..=4 {
                    if !self.cursor.peek_at(ahead).is_some_and(is_hex_digit) {
                        return Err(Error::syntax("malformed unicode escape", start));
                    }
                }
                out.push(b'\\');
                out.push(b'u');
                self.cursor.bump();
                for _ in 0..4 {
                    if let Some(h) = self.cursor.peek() {
                        out.push(h);
                        self.cursor.bump();
                    }
                }
            }
            _ => {
                return Err(Error::syntax(
                    format!("invalid escape '\\{}'", c as char),
                    start,
                ))
            }
        }
        Ok(())
    }

    /// One or more ASCII letters, JSON5 only.
    fn parse_bareword(&mut self) -> Result<String> {
        let mut word = String::new();
        while let Some(c) = self.cursor.peek() {
            if !is_ascii_letter(c) {
                break;
            }
            word.push(c as char);
            self.cursor.bump();
        }
        if word.is_empty() {
            return Err(Error::syntax("expected bareword", self.cursor.location()));
        }
        Ok(word)
    }

    fn parse_array_body(&mut self) -> Result<ValueId> {
        let mut items = ElementBuf::new();
        let mut expect_item = true;
        loop {
            self.cursor.skip_whitespace()?;
            match self.cursor.peek() {
                None => {
                    return Err(Error::structural(
                        "unterminated array",
                        self.cursor.location(),
                    ))
                }
                Some(b']') => {
                    if !self.cursor.json5() && expect_item && !items.is_empty() {
                        return Err(Error::structural(
                            "trailing comma in array",
                            self.cursor.location(),
                        ));
                    }
                    self.cursor.bump();
                    break;
                }
                Some(_) => {}
            }
            if !expect_item {
                return Err(Error::structural(
                    "expected ',' or ']'",
                    self.cursor.location(),
                ));
            }
            let item = self.parse_value()?;
            items.push(item);
            self.cursor.skip_whitespace()?;
            if self.cursor.peek() == Some(b',') {
                self.cursor.bump();
                expect_item = true;
            } else {
                expect_item = false;
            }
        }
        Ok(self.arena.alloc_array(&items))
    }

    fn parse_object_body(&mut self) -> Result<ValueId> {
        let mut pairs = PairBuf::new();
        let mut expect_pair = true;
        let mut trailing_comma = false;
        loop {
            self.cursor.skip_whitespace()?;
            match self.cursor.peek() {
                None => {
                    return Err(Error::structural(
                        "unterminated object",
                        self.cursor.location(),
                    ))
                }
                Some(b'}') => {
                    if !self.cursor.json5() && trailing_comma {
                        return Err(Error::structural(
                            "trailing comma in object",
                            self.cursor.location(),
                        ));
                    }
                    self.cursor.bump();
                    break;
                }
                Some(b',') => {
                    return Err(Error::structural(
                        "stray comma in object",
                        self.cursor.location(),
                    ));
                }
                Some(_) => {}
            }
            if !expect_pair {
                return Err(Error::structural(
                    "expected ',' or '}'",
                    self.cursor.location(),
                ));
            }
            let key = self.parse_string_token()?;
            self.cursor.skip_whitespace()?;
            if self.cursor.peek() != Some(b':') {
                return Err(Error::structural(
                    "expected ':' after object key",
                    self.cursor.location(),
                ));
            }
            self.cursor.bump();
            self.cursor.skip_whitespace()?;
            let value = self.parse_value()?;
            self.insert_pair(&mut pairs, &key, value);
            self.cursor.skip_whitespace()?;
            if self.cursor.peek() == Some(b',') {
                self.cursor.bump();
                expect_pair = true;
                trailing_comma = true;
            } else {
                expect_pair = false;
                trailing_comma = false;
            }
        }
        Ok(self.arena.alloc_object(&pairs))
    }

    /// Duplicate keys overwrite the earlier value; key bytes are allocated
    /// once per distinct key.
    fn insert_pair(&mut self, pairs: &mut PairBuf, key: &str, value: ValueId) {
        for pair in pairs.iter_mut() {
            if self.arena.bytes(pair.key) == key.as_bytes() {
                pair.value = value;
                return;
            }
        }
        let key_slice = self.arena.alloc_bytes(key.as_bytes());
        pairs.push(Pair {
            key: key_slice,
            value,
        });
    }
}
