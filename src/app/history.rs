pub const DEFAULT_LIMIT: usize = 200;

/// Linear undo/redo over committed values. Only `set` records a step;
/// previews never go through here.
#[derive(Clone, Debug)]
pub struct History<T: Clone> {
    past: Vec<T>,
    present: T,
    future: Vec<T>,
    limit: usize,
    revision: u64,
}

impl<T: Clone> History<T> {
    pub fn new(present: T) -> Self {
        Self::with_limit(present, DEFAULT_LIMIT)
    }

    pub fn with_limit(present: T, limit: usize) -> Self {
        Self {
            past: Vec::new(),
            present,
            future: Vec::new(),
            limit: limit.max(1),
            revision: 0,
        }
    }

    pub fn present(&self) -> &T {
        &self.present
    }

    pub fn set(&mut self, value: T) {
        let previous = std::mem::replace(&mut self.present, value);
        self.past.push(previous);
        if self.past.len() > self.limit {
            let overflow = self.past.len() - self.limit;
            self.past.drain(0..overflow);
        }
        self.future.clear();
        self.revision += 1;
    }

    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.past.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.present, previous);
        self.future.push(current);
        self.revision += 1;
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(next) = self.future.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.present, next);
        self.past.push(current);
        self.revision += 1;
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Bumped whenever `present` changes.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit.max(1);
        if self.past.len() > self.limit {
            let overflow = self.past.len() - self.limit;
            self.past.drain(0..overflow);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undo_redo_walks_the_timeline() {
        let mut h = History::new(0);
        assert!(!h.can_undo());
        h.set(1);
        h.set(2);
        assert!(h.undo());
        assert_eq!(*h.present(), 1);
        assert!(h.redo());
        assert_eq!(*h.present(), 2);
        assert!(!h.redo());
        assert!(h.undo());
        assert!(h.undo());
        assert_eq!(*h.present(), 0);
        assert!(!h.undo());
        assert_eq!(*h.present(), 0);
    }

    #[test]
    fn new_commit_clears_future() {
        let mut h = History::new("a");
        h.set("b");
        h.undo();
        assert!(h.can_redo());
        h.set("c");
        assert!(!h.can_redo());
        assert!(h.undo());
        assert_eq!(*h.present(), "a");
    }

    #[test]
    fn limit_drops_oldest() {
        let mut h = History::with_limit(0, 3);
        for i in 1..=5 {
            h.set(i);
        }
        let mut steps = 0;
        while h.undo() {
            steps += 1;
        }
        assert_eq!(steps, 3);
        assert_eq!(*h.present(), 2);
    }

    #[test]
    fn revision_tracks_changes() {
        let mut h = History::new(0);
        let r0 = h.revision();
        h.set(1);
        h.undo();
        assert!(!h.undo());
        assert_eq!(h.revision(), r0 + 2);
    }
}
