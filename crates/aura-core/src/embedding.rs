// Copyright (c) 2026 Aura PoCA Contributors
// SPDX-License-Identifier: Apache-2.0

//! Deterministic text embeddings.
//!
//! Placeholder for a frozen production model: character-derived values
//! cycled to a fixed dimension. Must stay reproducible across runs and
//! processes, since semantic alignment scores feed certified records.

/// Dimension of the semantic alignment space.
pub const EMBEDDING_DIM: usize = 1536;

/// Embed text into exactly [`EMBEDDING_DIM`] dimensions, each value in
/// `[0, 1)`. Empty text embeds to the zero vector.
pub fn embed_text(text: &str) -> Vec<f64> {
    if text.is_empty() {
        return vec![0.0; EMBEDDING_DIM];
    }
    text.chars()
        .map(|c| f64::from(u32::from(c) % 32) / 32.0)
        .cycle()
        .take(EMBEDDING_DIM)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedding_has_fixed_dimension() {
        assert_eq!(embed_text("x").len(), EMBEDDING_DIM);
        assert_eq!(embed_text(&"long text ".repeat(400)).len(), EMBEDDING_DIM);
        assert_eq!(embed_text("").len(), EMBEDDING_DIM);
    }

    #[test]
    fn embedding_is_deterministic() {
        let text = "Be helpful, harmless, and honest";
        assert_eq!(embed_text(text), embed_text(text));
        assert_ne!(embed_text(text), embed_text("Be unhelpful"));
    }

    #[test]
    fn embedding_values_stay_in_unit_range() {
        for v in embed_text("arbitrary input, including üñïçödé") {
            assert!((0.0..1.0).contains(&v));
        }
    }
}
