use std::fmt;

/// Content fingerprint of a type descriptor: the Blake3 hash of its
/// canonical CBOR encoding.
///
/// Equal descriptors share a fingerprint however their nested parameters
/// are shared in memory, which is what lets [`TypeRegistry`] intern them.
///
/// [`TypeRegistry`]: crate::TypeRegistry
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint(blake3::Hash);

impl Fingerprint {
    pub(crate) fn of_encoding(encoded: &[u8]) -> Self {
        Fingerprint(blake3::hash(encoded))
    }
}

impl fmt::Debug for Fingerprint {
    // Eight hex digits are plenty to tell descriptors apart in logs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex = self.0.to_hex();
        write!(f, "Fingerprint({})", &hex[..8])
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_hex())
    }
}
