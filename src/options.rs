/// Grammar variant, fixed for a whole parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    /// Strict JSON.
    #[default]
    Json,
    /// JSON5 extensions: comments, trailing commas, unquoted keys,
    /// single-quoted strings, hex/Infinity/NaN numeric literals.
    Json5,
}

impl Dialect {
    pub fn is_json5(self) -> bool {
        matches!(self, Dialect::Json5)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    pub dialect: Dialect,
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WriteOptions {
    /// Tab-indented output with one element or pair per line.
    pub pretty: bool,
}

impl WriteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}
