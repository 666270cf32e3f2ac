//! Identity number generation
//!
//! Subjects inserted without a national identity number receive a random
//! one immediately before the row is written. The generator never checks
//! storage; stores call it again when a generated value collides with an
//! existing subject, up to `MAX_GENERATION_ATTEMPTS` times.

use rand::Rng;

use core_kernel::{AdhaarCardNo, ADHAAR_CARD_NO_LEN};

/// Number of generated identifiers a store tries before reporting a conflict
pub const MAX_GENERATION_ATTEMPTS: usize = 5;

/// Produces identity numbers for new subjects
pub trait IdentifierGenerator: Send + Sync {
    /// Returns `current` unchanged when present, otherwise a fresh identifier
    fn generate(&self, current: Option<AdhaarCardNo>) -> AdhaarCardNo;
}

/// Random twelve digit identifier generator
///
/// The leading digit is never zero, so generated values are always
/// twelve significant digits.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdhaarCardIdGenerator;

impl AdhaarCardIdGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl IdentifierGenerator for AdhaarCardIdGenerator {
    fn generate(&self, current: Option<AdhaarCardNo>) -> AdhaarCardNo {
        if let Some(id) = current {
            return id;
        }

        let mut rng = rand::thread_rng();
        let mut digits = [0u8; ADHAAR_CARD_NO_LEN];
        digits[0] = rng.gen_range(1..=9);
        for digit in digits.iter_mut().skip(1) {
            *digit = rng.gen_range(0..=9);
        }
        AdhaarCardNo::from_digits(digits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_supplied_identifier() {
        let supplied = AdhaarCardNo::parse("000000000001").unwrap();
        let id = AdhaarCardIdGenerator::new().generate(Some(supplied.clone()));
        assert_eq!(id, supplied);
    }

    #[test]
    fn test_generated_identifier_shape() {
        let generator = AdhaarCardIdGenerator::new();
        for _ in 0..200 {
            let id = generator.generate(None);
            assert_eq!(id.as_str().len(), ADHAAR_CARD_NO_LEN);
            assert!(id.as_str().bytes().all(|b| b.is_ascii_digit()));
            assert!(!id.as_str().starts_with('0'));
        }
    }

    #[test]
    fn test_generated_identifiers_vary() {
        let generator = AdhaarCardIdGenerator::new();
        let first = generator.generate(None);
        let differs = (0..20).any(|_| generator.generate(None) != first);
        assert!(differs);
    }
}
