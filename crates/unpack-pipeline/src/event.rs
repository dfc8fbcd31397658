//! Raw event records read from an event file

/// One raw record read from the input source, before any decoding.
///
/// The payload carries a flat sequence of named banks; which banks are
/// present depends on the frontend that produced the file. Decoding the
/// bank contents is the job of the pipeline stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEvent {
    /// Serial number assigned by the acquisition frontend
    pub serial: u32,

    /// Event id tag from the record header
    pub event_id: u16,

    /// Undecoded bank payload
    pub payload: Vec<u8>,
}

impl RawEvent {
    /// Find a named bank inside the payload.
    ///
    /// Banks are laid out as `[4-byte ASCII name][u32 LE length][bytes]`,
    /// back to back. Returns the bank body, or `None` if the bank is absent
    /// or the payload is malformed past the point where it could appear.
    pub fn bank(&self, name: &str) -> Option<&[u8]> {
        let wanted = name.as_bytes();
        if wanted.len() != 4 {
            return None;
        }

        let mut offset = 0usize;
        while offset + 8 <= self.payload.len() {
            let bank_name = &self.payload[offset..offset + 4];
            let len = u32::from_le_bytes([
                self.payload[offset + 4],
                self.payload[offset + 5],
                self.payload[offset + 6],
                self.payload[offset + 7],
            ]) as usize;

            let body_start = offset + 8;
            let body_end = body_start.checked_add(len)?;
            if body_end > self.payload.len() {
                return None;
            }

            if bank_name == wanted {
                return Some(&self.payload[body_start..body_end]);
            }

            offset = body_end;
        }

        None
    }
}
