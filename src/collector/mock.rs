//! Scripted data source for tests.

use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;

use super::traits::{CollectError, DataSource};

/// Returns pre-arranged results in order; once the script runs out the last
/// successful rows are repeated.
pub struct MockSource<R> {
    script: VecDeque<Result<Vec<R>, CollectError>>,
    last: Vec<R>,
    calls: Rc<Cell<usize>>,
}

impl<R: Clone> MockSource<R> {
    pub fn new(script: impl IntoIterator<Item = Result<Vec<R>, CollectError>>) -> Self {
        Self {
            script: script.into_iter().collect(),
            last: Vec::new(),
            calls: Rc::new(Cell::new(0)),
        }
    }

    /// Always returns `rows`.
    pub fn fixed(rows: Vec<R>) -> Self {
        let mut source = Self::new([]);
        source.last = rows;
        source
    }

    /// Shared counter of `fetch` calls, readable after the source is moved.
    pub fn call_counter(&self) -> Rc<Cell<usize>> {
        Rc::clone(&self.calls)
    }
}

impl<R: Clone> DataSource<R> for MockSource<R> {
    fn fetch(&mut self) -> Result<Vec<R>, CollectError> {
        self.calls.set(self.calls.get() + 1);
        match self.script.pop_front() {
            Some(Ok(rows)) => {
                self.last = rows.clone();
                Ok(rows)
            }
            Some(Err(e)) => Err(e),
            None => Ok(self.last.clone()),
        }
    }
}
