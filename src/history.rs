/// Keys of the positions that led to the current one, oldest first
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct History {
    keys: Vec<u64>,
}

impl History {
    pub const fn new() -> Self {
        History { keys: Vec::new() }
    }

    pub fn push(&mut self, key: u64) {
        self.keys.push(key);
    }

    /// Must be paired with an earlier `push`
    pub fn pop(&mut self) -> Option<u64> {
        self.keys.pop()
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// How often `key` appeared among the last `window` positions with the
    /// same side to move, the current position excluded
    pub fn occurrences(&self, key: u64, window: usize) -> usize {
        self.keys
            .iter()
            .rev()
            .take(window)
            .skip(1)
            .step_by(2)
            .filter(|&&k| k == key)
            .count()
    }
}
