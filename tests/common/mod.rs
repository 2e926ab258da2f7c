use std::io::Write;
use std::sync::{Arc, Mutex};

use wisp::wisp;

/// A `Write` sink that can be read back after the interpreter that owns it is dropped.
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().write(buf)
    }
    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

/// Runs `source` as a single program and returns everything it printed.
pub fn run(source: &str) -> String {
    let buffer = SharedBuffer::default();
    let mut interpreter = wisp::new(Box::new(buffer.clone()));
    interpreter.run_line(source);
    buffer.contents()
}
