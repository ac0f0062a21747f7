//! Single-pass digest accumulation
//!
//! A [`DigestAccumulator`] holds one [`Hasher`] per requested algorithm plus a
//! byte histogram and a running size. Every block read from a file is fed to
//! all of them, so the file is read once no matter how many algorithms run.

use crate::config::DigestAlgorithm;
use crate::hash::Hasher;
use serde::{Deserialize, Serialize};

/// Finalized digests, size and entropy of one byte stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileDigest {
    /// Total bytes ingested
    pub size: u64,
    /// Digests in configured algorithm order
    pub digests: Vec<AlgorithmDigest>,
    /// Shannon entropy in bits per byte
    pub entropy: f64,
    /// Occurrences of each byte value
    pub histogram: Vec<u64>,
}

/// One algorithm's lowercase hex digest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlgorithmDigest {
    /// Algorithm that produced the digest
    pub algorithm: DigestAlgorithm,
    /// Lowercase hex digest
    pub hex: String,
}

impl FileDigest {
    /// Look up the digest for an algorithm
    pub fn digest(&self, algorithm: DigestAlgorithm) -> Option<&str> {
        self.digests
            .iter()
            .find(|d| d.algorithm == algorithm)
            .map(|d| d.hex.as_str())
    }

    /// Entropy as fixed-point text with six decimal places
    pub fn entropy_string(&self) -> String {
        format!("{:.6}", self.entropy)
    }
}

/// Incremental state for every requested algorithm over one byte stream
pub struct DigestAccumulator {
    hashers: Vec<Hasher>,
    algorithms: Vec<DigestAlgorithm>,
    histogram: [u64; 256],
    size: u64,
    finalized: Option<FileDigest>,
}

impl DigestAccumulator {
    /// Create an accumulator for the given algorithms, in column order
    pub fn new(algorithms: &[DigestAlgorithm]) -> Self {
        Self {
            hashers: algorithms.iter().map(|a| Hasher::new(*a)).collect(),
            algorithms: algorithms.to_vec(),
            histogram: [0; 256],
            size: 0,
            finalized: None,
        }
    }

    /// Feed the next block of the stream to every algorithm.
    ///
    /// Blocks must arrive in stream order. Blocks arriving after
    /// [`finalize`](Self::finalize) are dropped.
    pub fn ingest(&mut self, block: &[u8]) {
        if block.is_empty() {
            return;
        }
        if self.finalized.is_some() {
            tracing::warn!("Ignoring {} bytes ingested after finalization", block.len());
            return;
        }

        for hasher in &mut self.hashers {
            hasher.update(block);
        }

        for &byte in block {
            self.histogram[byte as usize] += 1;
        }

        self.size += block.len() as u64;
    }

    /// Finalize every algorithm and compute entropy.
    ///
    /// The first call consumes the hash states; later calls return the stored
    /// result unchanged.
    pub fn finalize(&mut self) -> FileDigest {
        if let Some(done) = &self.finalized {
            return done.clone();
        }

        let digests = std::mem::take(&mut self.hashers)
            .into_iter()
            .map(|hasher| AlgorithmDigest {
                algorithm: hasher.algorithm(),
                hex: hasher.finalize(),
            })
            .collect();

        let digest = FileDigest {
            size: self.size,
            digests,
            entropy: shannon_entropy(&self.histogram, self.size),
            histogram: self.histogram.to_vec(),
        };

        self.finalized = Some(digest.clone());
        digest
    }

    /// Bytes ingested so far
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Byte histogram so far
    pub fn histogram(&self) -> &[u64; 256] {
        &self.histogram
    }

    /// Algorithms in column order
    pub fn algorithms(&self) -> &[DigestAlgorithm] {
        &self.algorithms
    }

    /// Whether [`finalize`](Self::finalize) has run
    pub fn is_finalized(&self) -> bool {
        self.finalized.is_some()
    }
}

/// Shannon entropy in bits per byte of a histogram totalling `size` bytes.
///
/// An empty stream has entropy 0.0. The result is never negative zero.
pub fn shannon_entropy(histogram: &[u64; 256], size: u64) -> f64 {
    if size == 0 {
        return 0.0;
    }

    let total = size as f64;
    let mut entropy = 0.0f64;
    for &count in histogram.iter().filter(|&&c| c > 0) {
        let p = count as f64 / total;
        entropy -= p * p.log2();
    }
    entropy
}

/// Digest an in-memory buffer with several algorithms at once
pub fn hash_bytes(data: &[u8], algorithms: &[DigestAlgorithm]) -> FileDigest {
    let mut acc = DigestAccumulator::new(algorithms);
    acc.ingest(data);
    acc.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::digest_bytes;
    use proptest::prelude::*;

    fn default_algos() -> Vec<DigestAlgorithm> {
        DigestAlgorithm::defaults()
    }

    #[test]
    fn test_ingest_updates_all_state() {
        let mut acc = DigestAccumulator::new(&default_algos());
        acc.ingest(b"AAB");
        acc.ingest(b"B");

        assert_eq!(acc.size(), 4);
        assert_eq!(acc.histogram()[b'A' as usize], 2);
        assert_eq!(acc.histogram()[b'B' as usize], 2);
        assert_eq!(acc.histogram().iter().sum::<u64>(), 4);

        let digest = acc.finalize();
        assert_eq!(digest.digests.len(), 4);
        assert_eq!(digest.digest(DigestAlgorithm::Md5).unwrap(), digest_bytes(b"AABB", DigestAlgorithm::Md5));
        assert_eq!(digest.entropy, 1.0);
    }

    #[test]
    fn test_digest_order_follows_algorithms() {
        let algos = [DigestAlgorithm::Sha512, DigestAlgorithm::Md5, DigestAlgorithm::Blake3];
        let digest = hash_bytes(b"ordered", &algos);
        let order: Vec<_> = digest.digests.iter().map(|d| d.algorithm).collect();
        assert_eq!(order, algos);
    }

    #[test]
    fn test_empty_stream() {
        let mut acc = DigestAccumulator::new(&[DigestAlgorithm::Md5]);
        acc.ingest(b"");
        let digest = acc.finalize();

        assert_eq!(digest.size, 0);
        assert_eq!(digest.entropy, 0.0);
        assert!(digest.entropy.is_sign_positive());
        assert_eq!(digest.digest(DigestAlgorithm::Md5).unwrap(), "d41d8cd98f00b204e9800998ecf8427e");
    }

    #[test]
    fn test_entropy_identical_bytes_is_zero() {
        let digest = hash_bytes(&[0x41u8; 4096], &[DigestAlgorithm::Md5]);
        assert_eq!(digest.entropy, 0.0);
        assert!(digest.entropy.is_sign_positive());
        assert_eq!(digest.entropy_string(), "0.000000");
    }

    #[test]
    fn test_entropy_uniform_bytes() {
        let data: Vec<u8> = (0..256 * 64).map(|i| (i % 256) as u8).collect();
        let digest = hash_bytes(&data, &[DigestAlgorithm::Md5]);
        assert!((digest.entropy - 8.0).abs() < 1e-9);
        assert_eq!(digest.entropy_string(), "8.000000");
    }

    #[test]
    fn test_entropy_two_symbols() {
        let mut histogram = [0u64; 256];
        histogram[0] = 3;
        histogram[1] = 1;
        let expected = -(0.75f64 * 0.75f64.log2() + 0.25 * 0.25f64.log2());
        assert!((shannon_entropy(&histogram, 4) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_finalize_is_idempotent() {
        let mut acc = DigestAccumulator::new(&default_algos());
        acc.ingest(b"some bytes worth hashing");

        let first = acc.finalize();
        let second = acc.finalize();

        assert!(acc.is_finalized());
        assert_eq!(first, second);
        assert_eq!(first.entropy.to_bits(), second.entropy.to_bits());
    }

    #[test]
    fn test_ingest_after_finalize_is_ignored() {
        let mut acc = DigestAccumulator::new(&[DigestAlgorithm::Sha256]);
        acc.ingest(b"abc");
        let first = acc.finalize();

        acc.ingest(b"more");
        assert_eq!(acc.size(), 3);
        assert_eq!(acc.finalize(), first);
    }

    proptest! {
        #[test]
        fn prop_block_size_independent(
            data in proptest::collection::vec(any::<u8>(), 0..4096),
            block_size in 1usize..512,
        ) {
            let algos = [
                DigestAlgorithm::Md5,
                DigestAlgorithm::Sha1,
                DigestAlgorithm::Sha256,
                DigestAlgorithm::Sha512,
                DigestAlgorithm::Blake3,
                DigestAlgorithm::XXHash3,
            ];

            let mut acc = DigestAccumulator::new(&algos);
            for block in data.chunks(block_size) {
                acc.ingest(block);
            }
            let streamed = acc.finalize();
            let whole = hash_bytes(&data, &algos);

            prop_assert_eq!(streamed.digests, whole.digests);
            prop_assert_eq!(streamed.size, data.len() as u64);
            prop_assert_eq!(streamed.histogram, whole.histogram);
            prop_assert_eq!(streamed.entropy.to_bits(), whole.entropy.to_bits());
        }
    }
}
