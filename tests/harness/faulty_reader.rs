use std::io::{Read, Result};

/// Wraps a reader and misbehaves in a controlled way.
pub struct FaultyReader<R: Read> {
    inner: R,
    mode: FaultMode,
    counter: usize,
}

#[allow(dead_code)]
pub enum FaultMode {
    /// Hand out at most one byte per read call.
    OneByteChunks,
    /// Return `Interrupted` on every n-th read call.
    InterruptedEvery(usize),
    /// Report end of stream from the n-th read call onwards.
    PrematureEofAt(usize),
    /// Fail with `ConnectionReset` from the n-th read call onwards.
    BrokenAt(usize),
}

impl<R: Read> FaultyReader<R> {
    pub fn new(inner: R, mode: FaultMode) -> Self {
        Self {
            inner,
            mode,
            counter: 0,
        }
    }

    #[allow(dead_code)]
    pub fn reads(&self) -> usize {
        self.counter
    }
}

impl<R: Read> Read for FaultyReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.counter += 1;
        match self.mode {
            FaultMode::OneByteChunks => {
                let limit = buf.len().min(1);
                self.inner.read(&mut buf[..limit])
            }
            FaultMode::InterruptedEvery(n) if n != 0 && self.counter % n == 0 => {
                Err(std::io::Error::from(std::io::ErrorKind::Interrupted))
            }
            FaultMode::PrematureEofAt(n) if self.counter >= n => Ok(0),
            FaultMode::BrokenAt(n) if self.counter >= n => Err(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "Simulated source failure",
            )),
            _ => self.inner.read(buf),
        }
    }
}
