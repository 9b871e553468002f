/// Entropy estimate for a generation request.
///
/// Every character is drawn uniformly from the pool, so the entropy of one
/// password is exactly `length * log2(pool_size)`. No guessing at character
/// classes is needed because the pool is known.
use crate::generate::GenerationRequest;

/// Bits of entropy of one password built from `request`.
pub fn request_entropy_bits(request: &GenerationRequest) -> f64 {
    entropy_bits(request.pool().len(), request.length)
}

/// `length * log2(pool_size)`; zero for an empty or single-symbol pool.
pub fn entropy_bits(pool_size: usize, length: usize) -> f64 {
    if pool_size < 2 {
        return 0.0;
    }
    (pool_size as f64).log2() * length as f64
}

/// Coarse strength label for an entropy value.
pub fn verdict(bits: f64) -> &'static str {
    match bits {
        b if b < 40.0 => "very weak",
        b if b < 64.0 => "weak",
        b if b < 80.0 => "fair",
        b if b < 128.0 => "strong",
        _ => "very strong",
    }
}
