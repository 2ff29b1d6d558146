//! Arena-backed storage for parsed value trees.
//!
//! All memory for one parse lives here: string payloads and the packed
//! element ids of arrays are carved out of a chain of byte blocks, value
//! nodes sit in a node table, and object pairs sit in a flat pair table.
//! Handles into the arena are plain indices, so a [`Value`] stays `Copy`
//! and the whole tree is released in one teardown.

/// Index of a value node in the arena's node table.
pub type ValueId = usize;

/// Explicit absent reference standing in for JSON `null`. No node is
/// allocated behind it.
pub const NULL_ID: ValueId = usize::MAX;

const DEFAULT_BLOCK_SIZE: usize = 4096;

/// Packed array elements are stored as little-endian `u64` ids.
const ELEMENT_SIZE: usize = std::mem::size_of::<u64>();

/// Opaque handle to a carved region of one arena block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteSlice {
    pub block: usize,
    pub start: usize,
    pub len: usize,
}

impl ByteSlice {
    /// The null reference returned by zero-sized or zero-aligned requests.
    pub const EMPTY: ByteSlice = ByteSlice {
        block: 0,
        start: 0,
        len: 0,
    };

    pub fn is_empty(self) -> bool {
        self.len == 0
    }
}

/// One key/value entry of an object. Keys are arena byte slices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pair {
    pub key: ByteSlice,
    pub value: ValueId,
}

/// Contiguous run of entries in the arena's pair table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairRange {
    pub first: usize,
    pub len: usize,
}

/// Closed set of value kinds. Consumed by exhaustive matching; there are
/// no fallible accessors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i32),
    Float(f32),
    Str(ByteSlice),
    Array(ByteSlice),
    Object(PairRange),
}

#[derive(Debug)]
struct Block {
    data: Box<[u8]>,
    used: usize,
}

impl Block {
    fn new(capacity: usize) -> Self {
        Self {
            data: vec![0u8; capacity].into_boxed_slice(),
            used: 0,
        }
    }
}

/// Chained-block bump allocator plus the node and pair tables it feeds.
///
/// Growth is one-directional: once a successor block exists, earlier blocks
/// are never revisited. Nothing is freed individually; the arena and every
/// value carved from it go away together.
#[derive(Debug)]
pub struct Arena {
    blocks: Vec<Block>,
    block_size: usize,
    nodes: Vec<Value>,
    pairs: Vec<Pair>,
}

impl Arena {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_BLOCK_SIZE)
    }

    /// Sizes the first block from a capacity hint, typically the input
    /// length of the upcoming parse.
    pub fn with_capacity(hint: usize) -> Self {
        let block_size = hint.max(DEFAULT_BLOCK_SIZE);
        Self {
            blocks: vec![Block::new(block_size)],
            block_size,
            nodes: Vec::new(),
            pairs: Vec::new(),
        }
    }

    /// Carves `size` bytes from the current block, rounding its used offset
    /// up to `align` first. When the request does not fit, exactly one
    /// successor block is chained, sized to at least the request rounded up
    /// to block granularity, and the carve happens there at offset zero.
    ///
    /// Zero `size` or zero `align` yields [`ByteSlice::EMPTY`] without
    /// advancing any offset.
    pub fn allocate(&mut self, size: usize, align: usize) -> ByteSlice {
        if size == 0 || align == 0 {
            return ByteSlice::EMPTY;
        }
        let block_index = self.blocks.len() - 1;
        let block = &mut self.blocks[block_index];
        let start = round_up(block.used, align);
        if start + size <= block.data.len() {
            block.used = start + size;
            return ByteSlice {
                block: block_index,
                start,
                len: size,
            };
        }
        // Offset zero satisfies any alignment, so the retry cannot miss.
        let grown = round_up(size, self.block_size);
        self.blocks.push(Block::new(grown));
        let block_index = self.blocks.len() - 1;
        self.blocks[block_index].used = size;
        ByteSlice {
            block: block_index,
            start: 0,
            len: size,
        }
    }

    /// Allocates and copies `bytes` into the arena.
    pub fn alloc_bytes(&mut self, bytes: &[u8]) -> ByteSlice {
        let slice = self.allocate(bytes.len(), 1);
        if !slice.is_empty() {
            self.blocks[slice.block].data[slice.start..slice.start + slice.len]
                .copy_from_slice(bytes);
        }
        slice
    }

    pub fn bytes(&self, slice: ByteSlice) -> &[u8] {
        if slice.is_empty() {
            return &[];
        }
        self.blocks
            .get(slice.block)
            .and_then(|block| block.data.get(slice.start..slice.start + slice.len))
            .unwrap_or(&[])
    }

    pub fn get_str(&self, slice: ByteSlice) -> Option<&str> {
        std::str::from_utf8(self.bytes(slice)).ok()
    }

    pub fn push(&mut self, value: Value) -> ValueId {
        let id = self.nodes.len();
        self.nodes.push(value);
        id
    }

    pub fn get(&self, id: ValueId) -> &Value {
        if id == NULL_ID {
            return &Value::Null;
        }
        self.nodes.get(id).unwrap_or(&Value::Null)
    }

    /// Commits a collected element list into one contiguous backing block
    /// sized exactly to the final count.
    pub fn alloc_array(&mut self, items: &[ValueId]) -> ValueId {
        let slice = self.allocate(items.len() * ELEMENT_SIZE, ELEMENT_SIZE);
        for (index, id) in items.iter().enumerate() {
            self.write_element(slice, index, *id);
        }
        self.push(Value::Array(slice))
    }

    pub fn element_count(&self, slice: ByteSlice) -> usize {
        slice.len / ELEMENT_SIZE
    }

    pub fn element(&self, slice: ByteSlice, index: usize) -> Option<ValueId> {
        if index >= self.element_count(slice) {
            return None;
        }
        let bytes = self.bytes(slice);
        let start = index * ELEMENT_SIZE;
        let raw = <[u8; ELEMENT_SIZE]>::try_from(&bytes[start..start + ELEMENT_SIZE]).ok()?;
        Some(u64::from_le_bytes(raw) as ValueId)
    }

    pub fn elements(&self, slice: ByteSlice) -> impl Iterator<Item = ValueId> + '_ {
        (0..self.element_count(slice)).filter_map(move |index| self.element(slice, index))
    }

    /// Replaces the element at `index`. Array length is fixed at
    /// construction, so out-of-range writes report `false`.
    pub fn set_element(&mut self, slice: ByteSlice, index: usize, id: ValueId) -> bool {
        if index >= self.element_count(slice) {
            return false;
        }
        self.write_element(slice, index, id);
        true
    }

    fn write_element(&mut self, slice: ByteSlice, index: usize, id: ValueId) {
        let start = slice.start + index * ELEMENT_SIZE;
        if let Some(block) = self.blocks.get_mut(slice.block) {
            if let Some(raw) = block.data.get_mut(start..start + ELEMENT_SIZE) {
                raw.copy_from_slice(&(id as u64).to_le_bytes());
            }
        }
    }

    /// Commits a collected pair list into the flat pair table. The caller
    /// guarantees key uniqueness (duplicate keys overwrite while the list
    /// is being collected).
    pub fn alloc_object(&mut self, pairs: &[Pair]) -> ValueId {
        let first = self.pairs.len();
        self.pairs.extend_from_slice(pairs);
        self.push(Value::Object(PairRange {
            first,
            len: pairs.len(),
        }))
    }

    pub fn pairs(&self, range: PairRange) -> &[Pair] {
        let end = range.first.saturating_add(range.len);
        self.pairs.get(range.first..end).unwrap_or(&[])
    }

    pub fn pair_at(&self, range: PairRange, index: usize) -> Option<Pair> {
        self.pairs(range).get(index).copied()
    }

    pub fn field(&self, range: PairRange, key: &str) -> Option<ValueId> {
        self.pairs(range)
            .iter()
            .find(|pair| self.bytes(pair.key) == key.as_bytes())
            .map(|pair| pair.value)
    }

    /// Replaces the value stored under an existing key. Reports `false`
    /// when the key is absent; the pair table never grows after commit.
    pub fn set_field(&mut self, range: PairRange, key: &str, id: ValueId) -> bool {
        let end = range.first.saturating_add(range.len);
        let found = self
            .pairs
            .get(range.first..end)
            .and_then(|pairs| {
                pairs
                    .iter()
                    .position(|pair| self.bytes(pair.key) == key.as_bytes())
            });
        match found {
            Some(offset) => {
                self.pairs[range.first + offset].value = id;
                true
            }
            None => false,
        }
    }

    /// Resets every block's used offset to zero and empties the node and
    /// pair tables. With `secure` set, previously used bytes are zeroed
    /// first.
    pub fn clear(&mut self, secure: bool) {
        for block in &mut self.blocks {
            if secure {
                block.data[..block.used].fill(0);
            }
            block.used = 0;
        }
        self.nodes.clear();
        self.pairs.clear();
    }

    /// Copies the whole chain into one contiguous block.
    ///
    /// Every previously issued handle is invalidated, so this must not be
    /// called while a value tree is live. Maintenance use only, between
    /// [`Arena::clear`] and the next parse.
    pub fn compact(&mut self) {
        if self.blocks.len() <= 1 {
            return;
        }
        let mut merged = Block::new(self.capacity());
        let mut offset = 0;
        for block in &self.blocks {
            merged.data[offset..offset + block.used].copy_from_slice(&block.data[..block.used]);
            offset += block.used;
        }
        merged.used = offset;
        self.blocks.clear();
        self.blocks.push(merged);
    }

    pub fn capacity(&self) -> usize {
        self.blocks.iter().map(|block| block.data.len()).sum()
    }

    pub fn used(&self) -> usize {
        self.blocks.iter().map(|block| block.used).sum()
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}

fn round_up(value: usize, granularity: usize) -> usize {
    (value + granularity - 1) / granularity * granularity
}
