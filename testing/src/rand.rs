use rand::RngCore;

/// A generator that replays the provided bytes in a loop, yielding zeros
/// when no bytes were provided.
pub struct SequenceRng {
    data: Vec<u8>,
    pos: usize,
}

impl SequenceRng {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            pos: 0,
        }
    }

    fn next_byte(&mut self) -> u8 {
        if self.data.is_empty() {
            return 0;
        }
        let result = self.data[self.pos % self.data.len()];
        self.pos += 1;
        result
    }
}

impl RngCore for SequenceRng {
    fn next_u32(&mut self) -> u32 {
        let mut buf = [0u8; 4];
        self.fill_bytes(&mut buf);
        u32::from_be_bytes(buf)
    }

    fn next_u64(&mut self) -> u64 {
        let mut buf = [0u8; 8];
        self.fill_bytes(&mut buf);
        u64::from_be_bytes(buf)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for byte in dest.iter_mut() {
            *byte = self.next_byte();
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rand::RngCore;
    use super::SequenceRng;

    #[test]
    fn replay() {
        let mut rng = SequenceRng::new([1, 2]);
        assert_eq!(rng.next_u32(), 0x01020102);
        let mut buf = [0u8; 3];
        rng.fill_bytes(&mut buf);
        assert_eq!(buf, [1, 2, 1]);

        let mut empty = SequenceRng::new(Vec::new());
        assert_eq!(empty.next_u64(), 0);
    }
}
