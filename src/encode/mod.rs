//! Serialization of an arena-owned value tree back to text.

use crate::arena::{Arena, Value, ValueId, NULL_ID};
use crate::options::WriteOptions;

pub fn to_string(arena: &Arena, root: ValueId, options: &WriteOptions) -> String {
    let mut writer = Writer::new(arena, options.pretty);
    writer.write_value(root, 1);
    writer.finish()
}

struct Writer<'a> {
    arena: &'a Arena,
    buffer: String,
    pretty: bool,
}

impl<'a> Writer<'a> {
    fn new(arena: &'a Arena, pretty: bool) -> Self {
        Self {
            arena,
            buffer: String::new(),
            pretty,
        }
    }

    fn finish(self) -> String {
        self.buffer
    }

    fn write_value(&mut self, id: ValueId, depth: usize) {
        match *self.arena.get(id) {
            Value::Null => self.buffer.push_str("null"),
            Value::Bool(true) => self.buffer.push_str("true"),
            Value::Bool(false) => self.buffer.push_str("false"),
            Value::Int(value) => {
                let mut buf = itoa::Buffer::new();
                self.buffer.push_str(buf.format(value));
            }
            Value::Float(value) => self.write_float(value),
            Value::Str(slice) => {
                // Contents go back verbatim; embedded quotes and control
                // characters are not re-escaped, which breaks round-trips
                // for such strings.
                self.buffer.push('"');
                self.buffer.push_str(self.arena.get_str(slice).unwrap_or(""));
                self.buffer.push('"');
            }
            Value::Array(slice) => {
                self.buffer.push('[');
                let count = self.arena.element_count(slice);
                for index in 0..count {
                    if index > 0 {
                        self.buffer.push(',');
                    }
                    self.break_line(depth);
                    let child = self.arena.element(slice, index).unwrap_or(NULL_ID);
                    self.write_value(child, depth + 1);
                }
                if count > 0 {
                    self.break_line(depth - 1);
                }
                self.buffer.push(']');
            }
            Value::Object(range) => {
                self.buffer.push('{');
                for index in 0..range.len {
                    let Some(pair) = self.arena.pair_at(range, index) else {
                        break;
                    };
                    if index > 0 {
                        self.buffer.push(',');
                    }
                    self.break_line(depth);
                    self.buffer.push('"');
                    self.buffer
                        .push_str(self.arena.get_str(pair.key).unwrap_or(""));
                    self.buffer.push_str("\": ");
                    self.write_value(pair.value, depth + 1);
                }
                if range.len > 0 {
                    self.break_line(depth - 1);
                }
                self.buffer.push('}');
            }
        }
    }

    fn write_float(&mut self, value: f32) {
        if value.is_nan() {
            self.buffer.push_str("NaN");
        } else if value == f32::INFINITY {
            self.buffer.push_str("Infinity");
        } else if value == f32::NEG_INFINITY {
            self.buffer.push_str("-Infinity");
        } else {
            let mut buf = ryu::Buffer::new();
            self.buffer.push_str(buf.format(value));
        }
    }

    fn break_line(&mut self, depth: usize) {
        if !self.pretty {
            return;
        }
        self.buffer.push('\n');
        for _ in 0..depth {
            self.buffer.push('\t');
        }
    }
}
