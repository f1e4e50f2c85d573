use crate::{bitmove::BitMove, defs::Depth, params::DEFAULT_TT_ENTRIES};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HashEntry {
    pub key: u64,
    pub best_move: BitMove,
    pub depth: Depth,
}

impl HashEntry {
    pub const fn new(key: u64, best_move: BitMove, depth: Depth) -> Self {
        HashEntry {
            key,
            best_move,
            depth,
        }
    }

    pub const fn valid(&self) -> bool {
        !self.best_move.is_null()
    }
}

/// Fixed size cache of best moves, indexed by `key % size`
///
/// Stores always replace whatever sits in the slot
pub struct TranspositionTable {
    entries: Vec<HashEntry>,
}

impl TranspositionTable {
    pub fn new(size: usize) -> Self {
        TranspositionTable {
            entries: vec![HashEntry::default(); size.max(1)],
        }
    }

    pub fn size(&self) -> usize {
        self.entries.len()
    }

    fn index(&self, key: u64) -> usize {
        (key % self.entries.len() as u64) as usize
    }

    pub fn entry(&self, key: u64) -> Option<HashEntry> {
        let entry = self.entries[self.index(key)];
        (entry.valid() && entry.key == key).then_some(entry)
    }

    /// Best move stored for exactly this position, if any
    pub fn best_move(&self, key: u64) -> Option<BitMove> {
        self.entry(key).map(|entry| entry.best_move)
    }

    pub fn store(&mut self, key: u64, best_move: BitMove, depth: Depth) {
        let index = self.index(key);
        self.entries[index] = HashEntry::new(key, best_move, depth);
    }

    pub fn clear(&mut self) {
        self.entries.fill(HashEntry::default());
    }

    /// Drop every entry and change the number of slots
    pub fn resize(&mut self, size: usize) {
        self.entries = vec![HashEntry::default(); size.max(1)];
    }
}

impl Default for TranspositionTable {
    fn default() -> Self {
        TranspositionTable::new(DEFAULT_TT_ENTRIES)
    }
}
