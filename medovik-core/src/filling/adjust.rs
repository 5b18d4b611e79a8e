use crate::constants::{SWEET_SUBSTITUTIONS, UPSCALE_MIN_MULTIPLIER, UPSCALE_REDUCTION_STEP};
use crate::filling::chemistry::{SweetnessIndex, sweetness_index};
use crate::recipe::FillingRecipe;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FillingAdjustment {
    pub recipe: FillingRecipe,
    pub scale_factor: f64,
    pub original_sweetness: SweetnessIndex,
    pub new_sweetness: SweetnessIndex,
    /// Total cut applied to the sweet ingredients, percent.
    pub reduction_applied: f64,
}

/// Multiplier applied to sweet ingredients when a batch is scaled up:
/// larger batches taste sweeter, so sweet mass shrinks with the factor.
pub fn upscale_multiplier(scale_factor: f64) -> f64 {
    if scale_factor > 1.0 {
        (1.0 - (scale_factor - 1.0) * UPSCALE_REDUCTION_STEP).max(UPSCALE_MIN_MULTIPLIER)
    } else {
        1.0
    }
}

/// Scales `base` to `target_weight` grams and trims its sweet ingredients.
///
/// `sweetness_reduction` is a percent (clamped to 0..=100). Mass removed
/// from each sweet ingredient moves into its compensating ingredients, so
/// the total stays at `target_weight`. `None` for a weightless base or a
/// non-positive target.
pub fn adjust_filling(
    base: &FillingRecipe,
    target_weight: f64,
    sweetness_reduction: f64,
) -> Option<FillingAdjustment> {
    let base_weight = base.total();
    if base_weight <= 0.0 || !(target_weight.is_finite() && target_weight > 0.0) {
        return None;
    }
    let scale_factor = target_weight / base_weight;
    let manual = if sweetness_reduction.is_finite() {
        sweetness_reduction.clamp(0.0, 100.0) / 100.0
    } else {
        0.0
    };
    let multiplier = (1.0 - manual) * upscale_multiplier(scale_factor);

    let mut recipe: FillingRecipe = base
        .iter()
        .map(|(name, grams)| (name.to_string(), grams * scale_factor))
        .collect();

    if multiplier < 1.0 {
        for (sweet, compensators) in SWEET_SUBSTITUTIONS {
            let grams = recipe.get(sweet);
            if grams <= 0.0 {
                continue;
            }
            let removed = grams * (1.0 - multiplier);
            recipe.insert(sweet, grams - removed);
            for (target, share) in compensators {
                recipe.add(target, removed * share);
            }
        }
    }

    let reduction_applied = (1.0 - multiplier) * 100.0;
    debug!(scale_factor, reduction_applied, "adjusted filling");
    Some(FillingAdjustment {
        original_sweetness: sweetness_index(base),
        new_sweetness: sweetness_index(&recipe),
        recipe,
        scale_factor,
        reduction_applied,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn condensed() -> FillingRecipe {
        FillingRecipe::from_pairs(&[
            ("condensed-milk", 400.0),
            ("butter", 200.0),
            ("sour-cream", 400.0),
        ])
    }

    #[test]
    fn test_plain_downscale_is_uniform() {
        let adj = adjust_filling(&condensed(), 500.0, 0.0).unwrap();
        assert_relative_eq!(adj.scale_factor, 0.5);
        assert_relative_eq!(adj.recipe.get("condensed-milk"), 200.0);
        assert_relative_eq!(adj.reduction_applied, 0.0);
        assert_relative_eq!(
            adj.new_sweetness.index,
            adj.original_sweetness.index,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_manual_reduction_moves_mass_to_compensators() {
        let adj = adjust_filling(&condensed(), 1000.0, 20.0).unwrap();
        // 80 g condensed milk removed: 56 g to sour cream, 24 g to butter
        assert_relative_eq!(adj.recipe.get("condensed-milk"), 320.0, epsilon = 1e-9);
        assert_relative_eq!(adj.recipe.get("sour-cream"), 456.0, epsilon = 1e-9);
        assert_relative_eq!(adj.recipe.get("butter"), 224.0, epsilon = 1e-9);
        assert_relative_eq!(adj.recipe.total(), 1000.0, epsilon = 1e-9);
        assert_relative_eq!(adj.reduction_applied, 20.0, epsilon = 1e-9);
        assert!(adj.new_sweetness.index < adj.original_sweetness.index);
    }

    #[test]
    fn test_upscale_adds_automatic_reduction() {
        let adj = adjust_filling(&condensed(), 2000.0, 0.0).unwrap();
        // factor 2 -> multiplier 0.9
        assert_relative_eq!(adj.reduction_applied, 10.0, epsilon = 1e-9);
        assert_relative_eq!(adj.recipe.get("condensed-milk"), 720.0, epsilon = 1e-9);
        assert_relative_eq!(adj.recipe.total(), 2000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_upscale_multiplier_floor() {
        assert_eq!(upscale_multiplier(0.5), 1.0);
        assert_relative_eq!(upscale_multiplier(2.0), 0.9, epsilon = 1e-12);
        assert_eq!(upscale_multiplier(10.0), 0.75);
    }

    #[test]
    fn test_compensator_added_when_missing() {
        let base = FillingRecipe::from_pairs(&[("caramel", 100.0)]);
        let adj = adjust_filling(&base, 100.0, 50.0).unwrap();
        assert_relative_eq!(adj.recipe.get("caramel"), 50.0, epsilon = 1e-9);
        assert_relative_eq!(adj.recipe.get("heavy-cream"), 25.0, epsilon = 1e-9);
        assert_relative_eq!(adj.recipe.get("butter"), 25.0, epsilon = 1e-9);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(adjust_filling(&FillingRecipe::new(), 500.0, 0.0).is_none());
        assert!(adjust_filling(&condensed(), 0.0, 0.0).is_none());
    }

    #[test]
    fn test_reduction_is_clamped() {
        let adj = adjust_filling(&condensed(), 1000.0, 250.0).unwrap();
        assert_relative_eq!(adj.recipe.get("condensed-milk"), 0.0, epsilon = 1e-9);
        assert_relative_eq!(adj.reduction_applied, 100.0, epsilon = 1e-9);
    }
}
