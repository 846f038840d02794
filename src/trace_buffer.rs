use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::Rc;

/// Cloneable sink for `debug!` output: hand one clone to a tree as its debug
/// writer and keep another to read the trace back.
#[derive(Clone, Default)]
pub struct TraceBuffer(Rc<RefCell<String>>);

impl fmt::Write for TraceBuffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0.borrow_mut().push_str(s);
        Ok(())
    }
}

impl TraceBuffer {
    pub fn new() -> Self {
        TraceBuffer::default()
    }

    pub fn contents(&self) -> Ref<'_, String> {
        self.0.borrow()
    }

    /// Returns everything logged so far and empties the buffer.
    pub fn take(&self) -> String {
        std::mem::take(&mut *self.0.borrow_mut())
    }

    /// Number of logged lines starting with `prefix`.
    pub fn count(&self, prefix: &str) -> usize {
        self.contents()
            .lines()
            .filter(|line| line.starts_with(prefix))
            .count()
    }
}
