/// Bytes placed at a load address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub address: u32,
    pub data: Vec<u8>,
}

impl Segment {
    pub fn new(address: u32, data: impl Into<Vec<u8>>) -> Self {
        Self {
            address,
            data: data.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// One past the last address, widened so it cannot wrap.
    pub fn end(&self) -> u64 {
        u64::from(self.address) + self.data.len() as u64
    }

    /// `true` when the ranges intersect or share a boundary.
    pub fn touches(&self, other: &Segment) -> bool {
        u64::from(other.address) <= self.end() && other.end() >= u64::from(self.address)
    }
}
