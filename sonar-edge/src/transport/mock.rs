use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use sonar_core::protocol::POLL_COMMAND;

use super::Uart;

/// In-memory UART with a scripted rangefinder on the other end.
///
/// Clones share the same buffers, so a test can keep a handle while the
/// sensor link owns another.
#[derive(Clone, Default)]
pub struct MockUart {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    rx: VecDeque<u8>,
    written: Vec<u8>,
    responses: VecDeque<Vec<u8>>,
}

impl MockUart {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make bytes readable immediately.
    pub fn inject(&self, data: &[u8]) {
        self.lock().rx.extend(data);
    }

    /// Queue bytes the device answers with on its next poll command.
    /// Polls beyond the script get no answer.
    pub fn respond_with(&self, data: &[u8]) {
        self.lock().responses.push_back(data.to_vec());
    }

    /// Everything written so far.
    pub fn written(&self) -> Vec<u8> {
        self.lock().written.clone()
    }

    /// Bytes still waiting to be read.
    pub fn pending(&self) -> usize {
        self.lock().rx.len()
    }
}

impl Uart for MockUart {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        let mut inner = self.lock();
        inner.written.extend_from_slice(data);

        for _ in data.iter().filter(|&&b| b == POLL_COMMAND) {
            if let Some(response) = inner.responses.pop_front() {
                inner.rx.extend(response);
            }
        }

        Ok(data.len())
    }

    fn available(&mut self) -> io::Result<usize> {
        Ok(self.lock().rx.len())
    }

    fn read(&mut self, buffer: &mut [u8]) -> io::Result<usize> {
        let mut inner = self.lock();
        let n = inner.rx.len().min(buffer.len());

        for (slot, byte) in buffer.iter_mut().zip(inner.rx.drain(..n)) {
            *slot = byte;
        }

        Ok(n)
    }
}
