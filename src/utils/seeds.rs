use rand::Rng;

/// Returns the user-provided seed, or draws one from the thread-local generator.
///
/// A drawn seed is logged so that an otherwise unreproducible run can be repeated.
pub fn resolve_seed(seed: Option<u64>) -> u64 {
    match seed {
        Some(seed) => seed,
        None => {
            let seed: u64 = rand::rng().random();
            log::warn!(
                "No seed provided, results are not reproducible unless rerun with --seed {}",
                seed
            );
            seed
        }
    }
}

/// Derives an independent stream seed from a base seed and a stream index (SplitMix64 finalizer).
pub fn derive_seed(base: u64, stream: u64) -> u64 {
    let mut z = base ^ stream.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
