//! Bounded receive buffer for HTTP response bodies.

/// Default receive capacity in bytes.
///
/// Sized for the positioning service's responses, which are a few hundred
/// bytes for both the success and error shapes.
pub const DEFAULT_RECEIVE_CAPACITY: usize = 1023;

/// Fixed-capacity byte buffer that truncates on overflow.
///
/// Bytes beyond `capacity` are discarded and [`is_truncated`](Self::is_truncated)
/// reports that data was lost. A truncated JSON body will normally classify
/// as a parse failure downstream.
#[derive(Debug, Clone)]
pub struct ReceiveBuffer {
    data: Vec<u8>,
    capacity: usize,
    truncated: bool,
}

impl ReceiveBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            capacity,
            truncated: false,
        }
    }

    /// Appends as much of `chunk` as fits; returns the number of bytes kept.
    pub fn extend(&mut self, chunk: &[u8]) -> usize {
        let available = self.remaining();
        let accepted = chunk.len().min(available);
        self.data.extend_from_slice(&chunk[..accepted]);
        if accepted < chunk.len() {
            self.truncated = true;
        }
        accepted
    }

    /// Bytes that can still be accepted.
    pub fn remaining(&self) -> usize {
        self.capacity - self.data.len()
    }

    pub fn is_full(&self) -> bool {
        self.remaining() == 0
    }

    /// Returns true if any received bytes were dropped.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the buffer, decoding it as text (invalid UTF-8 is replaced).
    pub fn into_text(self) -> String {
        match String::from_utf8(self.data) {
            Ok(text) => text,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        }
    }
}

impl Default for ReceiveBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_RECEIVE_CAPACITY)
    }
}
