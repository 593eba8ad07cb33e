use sha2::{Digest, Sha256};

/// Deterministic, non-semantic pseudo-embedding.
///
/// The hex digest of the text's SHA-256 hash is repeated cyclically until the
/// vector reaches `dimension`; each component is the character code / 255, so
/// every value lies in [0, 1]. Identical text always yields an identical
/// vector. Similarity between two fallback vectors says nothing about the
/// similarity of their texts.
pub fn hash_embedding(text: &str, dimension: usize) -> Vec<f32> {
    let digest = hex::encode(Sha256::digest(text.as_bytes()));
    digest
        .bytes()
        .cycle()
        .take(dimension)
        .map(|b| f32::from(b) / 255.0)
        .collect()
}
