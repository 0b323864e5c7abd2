use std::io::{self, Write};

/// Receives the bytes a program prints, one `.` at a time, in order.
///
/// The machine never buffers output itself; the sink decides whether to
/// collect it or write it through.
pub trait Sink {
    fn emit(&mut self, byte: u8);
}

impl<F: FnMut(u8)> Sink for F {
    #[inline(always)]
    fn emit(&mut self, byte: u8) {
        self(byte)
    }
}

impl Sink for Vec<u8> {
    #[inline(always)]
    fn emit(&mut self, byte: u8) {
        self.push(byte);
    }
}

/// Adapts any `io::Write` into a sink.
///
/// Emitting cannot fail, so the first write error is kept and every later
/// byte is dropped. `finish` flushes and reports it.
pub struct IoSink<W: Write> {
    writer: W,
    written: usize,
    error: Option<io::Error>,
}

impl<W: Write> IoSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            written: 0,
            error: None,
        }
    }

    /// Number of bytes successfully handed to the writer.
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn finish(mut self) -> io::Result<W> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W: Write> Sink for IoSink<W> {
    fn emit(&mut self, byte: u8) {
        if self.error.is_some() {
            return;
        }
        match self.writer.write_all(&[byte]) {
            Ok(()) => self.written += 1,
            Err(err) => self.error = Some(err),
        }
    }
}
