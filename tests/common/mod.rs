#![allow(dead_code)]

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use rox::session::{RunOutcome, Session};

/// In-memory `print` sink that the test keeps a handle to.
#[derive(Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.borrow().clone()).expect("output is UTF-8")
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub fn session() -> (Session, SharedBuffer) {
    let buffer = SharedBuffer::default();
    let session = Session::with_output(Box::new(buffer.clone()));
    (session, buffer)
}

/// Run `source` in a fresh session, returning printed lines and the outcome.
pub fn run(source: &str) -> (Vec<String>, RunOutcome) {
    let (mut session, buffer) = session();
    let outcome = session.run(source);
    (buffer.lines(), outcome)
}

/// Run a program that must succeed and return what it printed.
pub fn output_of(source: &str) -> Vec<String> {
    let (lines, outcome) = run(source);
    assert!(
        outcome.is_success(),
        "program failed: {:?}",
        outcome
            .errors()
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
    );
    lines
}

/// Rendered diagnostics of an outcome.
pub fn diagnostics(outcome: &RunOutcome) -> Vec<String> {
    outcome.errors().iter().map(|e| e.to_string()).collect()
}
