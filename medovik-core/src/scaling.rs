//! Pan geometry and dough density: converts between total recipe weight,
//! layer weight and layer count.

use crate::analyzer::RecipeAnalysis;
use crate::constants::{
    AVERAGE_DOUGH_DENSITY, DEFAULT_AIR_FACTOR, DOUGH_DENSITIES, FILLING_DENSITY, ideal_range,
    lookup,
};
use crate::recipe::{Component, DoughRecipe, FillingRecipe, IngredientMass};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PanShape {
    Round,
    Rectangle,
}

/// Pan outline in centimetres. `dim1` is the diameter (round) or length;
/// `dim2` is the width and only read for rectangles.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PanGeometry {
    pub shape: PanShape,
    pub dim1: f64,
    #[serde(default)]
    pub dim2: f64,
}

impl PanGeometry {
    pub fn round(diameter_cm: f64) -> Self {
        PanGeometry {
            shape: PanShape::Round,
            dim1: diameter_cm,
            dim2: 0.0,
        }
    }

    pub fn rectangle(length_cm: f64, width_cm: f64) -> Self {
        PanGeometry {
            shape: PanShape::Rectangle,
            dim1: length_cm,
            dim2: width_cm,
        }
    }
}

fn usable(x: f64) -> bool {
    x.is_finite() && x > 0.0
}

/// Base area in cm². 0 for missing or non-positive dimensions.
pub fn pan_area(pan: &PanGeometry) -> f64 {
    match pan.shape {
        PanShape::Round if usable(pan.dim1) => std::f64::consts::PI * (pan.dim1 / 2.0).powi(2),
        PanShape::Rectangle if usable(pan.dim1) && usable(pan.dim2) => pan.dim1 * pan.dim2,
        _ => 0.0,
    }
}

/// Mass-weighted dough density in g/cm³ with an air-pocket correction.
///
/// Only ingredients in [`DOUGH_DENSITIES`] add volume; any other key adds
/// mass alone. `None` when nothing contributes volume.
pub fn effective_density(masses: &IngredientMass, air_factor: f64) -> Option<f64> {
    let total_mass: f64 = masses.values().sum();
    let solid_volume: f64 = masses
        .iter()
        .filter_map(|(name, &grams)| lookup(&DOUGH_DENSITIES, name).map(|d| grams / d))
        .sum();
    if total_mass <= 0.0 || solid_volume <= 0.0 || air_factor >= 1.0 {
        return None;
    }
    Some(total_mass / (solid_volume / (1.0 - air_factor)))
}

/// Weight of one layer of the given thickness (mm) over the pan, grams.
pub fn layer_weight(area_cm2: f64, thickness_mm: f64, density: f64) -> f64 {
    area_cm2 * (thickness_mm / 10.0) * density
}

#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LayerPlan {
    pub pan_area: f64,
    pub density: f64,
    pub thickness_mm: f64,
    pub total_weight: f64,
    pub single_layer_weight: f64,
    pub num_layers: u32,
    /// Fractional number of layers the dough covers.
    pub layer_coverage: f64,
    /// Dough left after the last full layer, grams.
    pub remainder_weight: f64,
}

/// How many layers of `thickness_mm` an analyzed recipe yields in `pan`.
pub fn calculate_layers(
    analysis: &RecipeAnalysis,
    pan: &PanGeometry,
    thickness_mm: f64,
) -> Option<LayerPlan> {
    let area = pan_area(pan);
    if area <= 0.0 || analysis.total_weight <= 0.0 || !usable(thickness_mm) {
        warn!(area, thickness_mm, "cannot plan layers for this pan");
        return None;
    }
    let density = effective_density(&analysis.recipe.to_mass_map(), DEFAULT_AIR_FACTOR)?;
    let single = layer_weight(area, thickness_mm, density);
    let coverage = analysis.total_weight / single;
    let num_layers = coverage.floor() as u32;

    debug!(area, density, single, num_layers, "planned layers");
    Some(LayerPlan {
        pan_area: area,
        density,
        thickness_mm,
        total_weight: analysis.total_weight,
        single_layer_weight: single,
        num_layers,
        layer_coverage: coverage,
        remainder_weight: analysis.total_weight - num_layers as f64 * single,
    })
}

#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TargetScaling {
    pub target_layer_weight: f64,
    pub target_count: u32,
    pub extra_percent: f64,
    pub total_weight: f64,
    pub scaling_factor: f64,
    pub new_recipe: DoughRecipe,
}

/// Scales the recipe so it yields `target_count` layers of
/// `target_layer_weight` grams, plus `extra_percent` for trimming losses.
/// `None` unless the weight and count are positive and the extra is not
/// negative.
pub fn calculate_advanced(
    analysis: &RecipeAnalysis,
    target_layer_weight: f64,
    target_count: u32,
    extra_percent: f64,
) -> Option<TargetScaling> {
    if analysis.total_weight <= 0.0
        || !usable(target_layer_weight)
        || target_count == 0
        || !(extra_percent.is_finite() && extra_percent >= 0.0)
    {
        warn!(target_layer_weight, target_count, extra_percent, "cannot scale to this target");
        return None;
    }
    let total_weight = target_layer_weight * target_count as f64 * (1.0 + extra_percent / 100.0);
    let scaling_factor = total_weight / analysis.total_weight;
    Some(TargetScaling {
        target_layer_weight,
        target_count,
        extra_percent,
        total_weight,
        scaling_factor,
        new_recipe: analysis.recipe.scaled(scaling_factor),
    })
}

#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReversePlan {
    pub pan_area: f64,
    pub layer_count: u32,
    pub thickness_mm: f64,
    pub single_layer_weight: f64,
    pub total_weight: f64,
    pub recipe: DoughRecipe,
}

/// Splits `total_weight` by the midpoints of the ideal bands. The sugars
/// share is halved between sugar and honey.
pub fn ideal_recipe_for_weight(total_weight: f64) -> DoughRecipe {
    let share = |c: Component| ideal_range(c).midpoint();
    let sum: f64 = Component::ALL.into_iter().map(share).sum();
    let part = |c: Component| total_weight * share(c) / sum;
    DoughRecipe {
        flour: part(Component::Flour),
        butter: part(Component::Butter),
        sugar: part(Component::Sugars) / 2.0,
        honey: part(Component::Sugars) / 2.0,
        eggs: part(Component::Eggs),
        soda: part(Component::Soda),
    }
}

/// Ideal recipe for `layer_count` layers of `thickness_mm` in `pan`.
pub fn calculate_reverse(pan: &PanGeometry, layer_count: u32, thickness_mm: f64) -> Option<ReversePlan> {
    let area = pan_area(pan);
    if area <= 0.0 || layer_count == 0 || !usable(thickness_mm) {
        warn!(area, layer_count, "cannot derive a recipe for this pan");
        return None;
    }
    let single = layer_weight(area, thickness_mm, AVERAGE_DOUGH_DENSITY);
    let total = single * layer_count as f64;
    Some(ReversePlan {
        pan_area: area,
        layer_count,
        thickness_mm,
        single_layer_weight: single,
        total_weight: total,
        recipe: ideal_recipe_for_weight(total),
    })
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FillingPlan {
    pub pan_area: f64,
    pub filling_layers: u32,
    pub thickness_mm: f64,
    pub required_weight: f64,
    pub scale_factor: f64,
    pub recipe: FillingRecipe,
}

/// Filling weight for spreading between `layer_count` cake layers (one
/// filling layer fewer, at least one) and `base` scaled to match.
pub fn calculate_filling(
    pan: &PanGeometry,
    layer_count: u32,
    thickness_mm: f64,
    base: &FillingRecipe,
) -> Option<FillingPlan> {
    let area = pan_area(pan);
    let base_weight = base.total();
    if area <= 0.0 || base_weight <= 0.0 || !usable(thickness_mm) {
        warn!(area, base_weight, "cannot size filling");
        return None;
    }
    let filling_layers = layer_count.saturating_sub(1).max(1);
    let required = layer_weight(area, thickness_mm, FILLING_DENSITY) * filling_layers as f64;
    let factor = required / base_weight;
    Some(FillingPlan {
        pan_area: area,
        filling_layers,
        thickness_mm,
        required_weight: required,
        scale_factor: factor,
        recipe: base.iter().map(|(k, g)| (k.to_string(), g * factor)).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::analyze_recipe;
    use approx::assert_relative_eq;

    fn ideal() -> RecipeAnalysis {
        analyze_recipe(&DoughRecipe::ideal()).unwrap().unwrap()
    }

    #[test]
    fn test_pan_areas() {
        assert_relative_eq!(pan_area(&PanGeometry::round(20.0)), 100.0 * std::f64::consts::PI);
        assert_relative_eq!(pan_area(&PanGeometry::rectangle(30.0, 20.0)), 600.0);
        assert_eq!(pan_area(&PanGeometry::rectangle(30.0, 0.0)), 0.0);
        assert_eq!(pan_area(&PanGeometry::round(-5.0)), 0.0);
    }

    #[test]
    fn test_density_of_single_ingredient() {
        let mut m = IngredientMass::new();
        m.insert("honey".into(), 142.0);
        // 100 cm³ solid, 103.09 cm³ with 3% air
        assert_relative_eq!(effective_density(&m, 0.03).unwrap(), 1.42 * 0.97, epsilon = 1e-12);
    }

    #[test]
    fn test_unknown_keys_add_mass_without_volume() {
        let mut m = IngredientMass::new();
        m.insert("honey".into(), 142.0);
        let base = effective_density(&m, 0.0).unwrap();
        m.insert("walnuts".into(), 142.0);
        assert_relative_eq!(effective_density(&m, 0.0).unwrap(), base * 2.0, epsilon = 1e-12);

        let mut only_unknown = IngredientMass::new();
        only_unknown.insert("walnuts".into(), 100.0);
        assert!(effective_density(&only_unknown, 0.03).is_none());
    }

    #[test]
    fn test_forward_plan() {
        let a = ideal();
        let plan = calculate_layers(&a, &PanGeometry::round(22.0), 3.0).unwrap();
        assert_relative_eq!(
            plan.single_layer_weight,
            plan.pan_area * 0.3 * plan.density,
            epsilon = 1e-9
        );
        assert_eq!(plan.num_layers, plan.layer_coverage.floor() as u32);
        assert!(plan.remainder_weight >= 0.0 && plan.remainder_weight < plan.single_layer_weight);
        assert!(plan.density > 1.0 && plan.density < 1.5);
    }

    #[test]
    fn test_forward_plan_rejects_zero_area() {
        assert!(calculate_layers(&ideal(), &PanGeometry::rectangle(0.0, 20.0), 3.0).is_none());
    }

    #[test]
    fn test_advanced_round_trip() {
        let a = ideal();
        let n = 8;
        let t = calculate_advanced(&a, a.total_weight / n as f64, n, 0.0).unwrap();
        assert_relative_eq!(t.scaling_factor, 1.0, epsilon = 1e-12);
        assert_relative_eq!(t.new_recipe.flour, a.recipe.flour, epsilon = 1e-9);
        assert_relative_eq!(t.new_recipe.soda, a.recipe.soda, epsilon = 1e-9);
    }

    #[test]
    fn test_advanced_extra_percent() {
        let a = ideal();
        let t = calculate_advanced(&a, 100.0, 10, 10.0).unwrap();
        assert_relative_eq!(t.total_weight, 1100.0, epsilon = 1e-9);
        assert_relative_eq!(t.new_recipe.total(), 1100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_advanced_rejects_nonsense_targets() {
        let a = ideal();
        assert!(calculate_advanced(&a, -100.0, 8, 0.0).is_none());
        assert!(calculate_advanced(&a, 0.0, 8, 0.0).is_none());
        assert!(calculate_advanced(&a, 100.0, 0, 0.0).is_none());
        assert!(calculate_advanced(&a, 100.0, 8, -5.0).is_none());
        assert!(calculate_advanced(&a, f64::NAN, 8, 0.0).is_none());
    }

    #[test]
    fn test_reverse_plan_recipe_is_optimal() {
        let plan = calculate_reverse(&PanGeometry::round(24.0), 8, 3.0).unwrap();
        assert_relative_eq!(plan.recipe.total(), plan.total_weight, epsilon = 1e-9);
        assert_relative_eq!(plan.recipe.sugar, plan.recipe.honey);
        let a = analyze_recipe(&plan.recipe).unwrap().unwrap();
        assert_eq!(a.quality_score, 100);
    }

    #[test]
    fn test_reverse_plan_degenerate() {
        assert!(calculate_reverse(&PanGeometry::round(0.0), 8, 3.0).is_none());
        assert!(calculate_reverse(&PanGeometry::round(24.0), 0, 3.0).is_none());
    }

    #[test]
    fn test_filling_plan() {
        let base = FillingRecipe::from_pairs(&[("sour-cream", 800.0), ("powdered-sugar", 200.0)]);
        let pan = PanGeometry::rectangle(20.0, 10.0);
        let plan = calculate_filling(&pan, 6, 5.0, &base).unwrap();
        // 200 cm² * 0.5 cm * 5 layers * 1.1 g/cm³
        assert_relative_eq!(plan.required_weight, 550.0, epsilon = 1e-9);
        assert_relative_eq!(plan.scale_factor, 0.55, epsilon = 1e-12);
        assert_relative_eq!(plan.recipe.get("sour-cream"), 440.0, epsilon = 1e-9);
        assert_relative_eq!(plan.recipe.total(), 550.0, epsilon = 1e-9);

        let single = calculate_filling(&pan, 1, 5.0, &base).unwrap();
        assert_eq!(single.filling_layers, 1);
        assert!(calculate_filling(&pan, 6, 5.0, &FillingRecipe::new()).is_none());
    }
}
