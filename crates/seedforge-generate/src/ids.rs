use rand::RngCore;

/// Synthesize a structurally valid document identifier (24 hex chars).
pub fn object_id(rng: &mut dyn RngCore) -> String {
    let mut bytes = [0_u8; 12];
    rng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Returns true when the value is shaped like an object id.
pub fn is_object_id(value: &str) -> bool {
    value.len() == 24 && value.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Derive a per-model seed from the run seed (FNV-1a over the label).
pub fn hash_seed(seed: u64, label: &str) -> u64 {
    let mut hash = seed ^ 0xcbf29ce484222325;
    for byte in label.as_bytes() {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn object_id_has_valid_format() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let id = object_id(&mut rng);
        assert!(is_object_id(&id), "{id} should be 24 hex chars");
    }

    #[test]
    fn hash_seed_is_stable_and_label_sensitive() {
        assert_eq!(hash_seed(1, "User"), hash_seed(1, "User"));
        assert_ne!(hash_seed(1, "User"), hash_seed(1, "Post"));
        assert_ne!(hash_seed(1, "User"), hash_seed(2, "User"));
    }
}
