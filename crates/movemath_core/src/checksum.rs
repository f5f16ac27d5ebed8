//! Stable 32-bit digests used to verify that all participants in a session
//! loaded identical movement data.
//!
//! FNV-1a over an explicit, ordered list of fields. Floats contribute their
//! bit patterns so that the digest does not depend on formatting or on the
//! memory layout of the structs being hashed.

const FNV_OFFSET: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// Incremental FNV-1a (32-bit) hasher.
#[derive(Debug, Clone, Copy)]
pub struct Checksum(u32);

impl Default for Checksum {
    fn default() -> Self {
        Self::new()
    }
}

impl Checksum {
    /// Start a new digest.
    #[must_use]
    pub const fn new() -> Self {
        Self(FNV_OFFSET)
    }

    /// Feed raw bytes.
    pub fn bytes(&mut self, bytes: &[u8]) -> &mut Self {
        for &b in bytes {
            self.0 ^= u32::from(b);
            self.0 = self.0.wrapping_mul(FNV_PRIME);
        }
        self
    }

    /// Feed a little-endian `u32`.
    pub fn u32(&mut self, v: u32) -> &mut Self {
        self.bytes(&v.to_le_bytes())
    }

    /// Feed a little-endian `i32`.
    pub fn i32(&mut self, v: i32) -> &mut Self {
        self.bytes(&v.to_le_bytes())
    }

    /// Feed the bit pattern of an `f32`.
    pub fn f32(&mut self, v: f32) -> &mut Self {
        self.u32(v.to_bits())
    }

    /// Feed a boolean as one byte.
    pub fn bool(&mut self, v: bool) -> &mut Self {
        self.bytes(&[u8::from(v)])
    }

    /// Final digest.
    #[must_use]
    pub const fn finish(&self) -> u32 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_vectors() {
        assert_eq!(Checksum::new().finish(), 0x811c_9dc5);
        assert_eq!(Checksum::new().bytes(b"a").finish(), 0xe40c_292c);
        assert_eq!(Checksum::new().bytes(b"foobar").finish(), 0xbf9c_f968);
    }

    #[test]
    fn test_order_matters() {
        let a = Checksum::new().i32(1).i32(2).finish();
        let b = Checksum::new().i32(2).i32(1).finish();
        assert_ne!(a, b);
    }

    #[test]
    fn test_float_sign_matters() {
        let pos = Checksum::new().f32(0.0).finish();
        let neg = Checksum::new().f32(-0.0).finish();
        assert_ne!(pos, neg);
    }
}
