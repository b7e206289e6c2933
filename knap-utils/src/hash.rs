/// Derives the 32 byte seed used for instance generation from a free-form
/// string and a nonce, so that one seed string can produce many instances.
pub fn calc_seed(seed: &str, nonce: u64) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new();
    hasher.update(seed.as_bytes());
    hasher.update(&nonce.to_le_bytes());
    hasher.finalize().into()
}
