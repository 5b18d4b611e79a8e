use crate::constants::*;
use crate::filling::presets::{Band, FillingPreset};
use crate::recipe::{FillingRecipe, normalize_key};
use crate::clamp;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Dominant sugar in an ingredient, which sets its relative sweetness.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum SugarType {
    Sucrose,
    Honey,
    CondensedMilk,
    DulceDeLeche,
    Caramel,
    Lactose,
}

/// Sugar type for an ingredient name; unrecognized names count as sucrose.
pub fn resolve_sugar_type(name: &str) -> SugarType {
    let key = normalize_key(name);
    SUGAR_TYPE_ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|(_, t)| *t)
        .unwrap_or(SugarType::Sucrose)
}

#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum SweetnessLevel {
    NotSweetened,
    LightlySweet,
    Mild,
    Moderate,
    Sweet,
    VerySweet,
}

impl SweetnessLevel {
    pub fn from_percentage(percentage: f64) -> Self {
        let [light, mild, moderate, sweet, very] = SWEETNESS_LEVEL_EDGES;
        if percentage < light {
            SweetnessLevel::NotSweetened
        } else if percentage < mild {
            SweetnessLevel::LightlySweet
        } else if percentage < moderate {
            SweetnessLevel::Mild
        } else if percentage < sweet {
            SweetnessLevel::Moderate
        } else if percentage < very {
            SweetnessLevel::Sweet
        } else {
            SweetnessLevel::VerySweet
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SweetnessLevel::NotSweetened => "Not sweetened",
            SweetnessLevel::LightlySweet => "Lightly sweet",
            SweetnessLevel::Mild => "Mildly sweet",
            SweetnessLevel::Moderate => "Moderately sweet",
            SweetnessLevel::Sweet => "Sweet",
            SweetnessLevel::VerySweet => "Very sweet",
        }
    }

    /// Label shown by the Arabic interface.
    pub fn arabic_label(self) -> &'static str {
        match self {
            SweetnessLevel::NotSweetened => "غير محلى",
            SweetnessLevel::LightlySweet => "محلى قليلاً",
            SweetnessLevel::Mild => "خفيف الحلاوة",
            SweetnessLevel::Moderate => "متوسط الحلاوة",
            SweetnessLevel::Sweet => "حلو",
            SweetnessLevel::VerySweet => "حلو جداً",
        }
    }

    /// Hex colour the UI paints the level with.
    pub fn color(self) -> &'static str {
        match self {
            SweetnessLevel::NotSweetened => "#9E9E9E",
            SweetnessLevel::LightlySweet => "#8BC34A",
            SweetnessLevel::Mild => "#4CAF50",
            SweetnessLevel::Moderate => "#FFC107",
            SweetnessLevel::Sweet => "#FF9800",
            SweetnessLevel::VerySweet => "#F44336",
        }
    }
}

#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SweetnessIndex {
    /// Sucrose-equivalent sugar per gram of filling.
    pub index: f64,
    /// `index` in percent; the level is banded on this.
    pub percentage: f64,
    pub level: SweetnessLevel,
}

/// Sucrose-equivalent sweetness of a filling. An empty or weightless
/// filling is not sweetened.
pub fn sweetness_index(recipe: &FillingRecipe) -> SweetnessIndex {
    let total = recipe.total();
    if total <= 0.0 {
        return SweetnessIndex {
            index: 0.0,
            percentage: 0.0,
            level: SweetnessLevel::NotSweetened,
        };
    }
    let weighted: f64 = recipe
        .iter()
        .map(|(name, grams)| {
            grams
                * lookup_or_zero(&SUGAR_CONTENT, name)
                * sweetness_power(resolve_sugar_type(name))
        })
        .sum();
    let index = weighted / total;
    let percentage = index * 100.0;
    SweetnessIndex {
        index,
        percentage,
        level: SweetnessLevel::from_percentage(percentage),
    }
}

#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum WaterActivityBand {
    VeryHigh,
    High,
    Moderate,
    Low,
}

impl WaterActivityBand {
    pub fn from_aw(aw: f64) -> Self {
        if aw > AW_VERY_HIGH {
            WaterActivityBand::VeryHigh
        } else if aw > AW_HIGH {
            WaterActivityBand::High
        } else if aw > AW_MODERATE {
            WaterActivityBand::Moderate
        } else {
            WaterActivityBand::Low
        }
    }

    pub fn moisture_transfer(self) -> &'static str {
        match self {
            WaterActivityBand::VeryHigh => "Very fast: layers soften within a few hours",
            WaterActivityBand::High => "Fast: layers soften overnight",
            WaterActivityBand::Moderate => "Moderate: layers soften over a day",
            WaterActivityBand::Low => "Slow: layers stay crisp for a long time",
        }
    }

    pub fn maturation_time(self) -> &'static str {
        match self {
            WaterActivityBand::VeryHigh => "6-8 hours",
            WaterActivityBand::High => "8-12 hours",
            WaterActivityBand::Moderate => "12-24 hours",
            WaterActivityBand::Low => "24-48 hours",
        }
    }

    pub fn stability(self) -> &'static str {
        match self {
            WaterActivityBand::VeryHigh => "Short: best within 2 days, refrigerated",
            WaterActivityBand::High => "Fair: up to 3 days refrigerated",
            WaterActivityBand::Moderate => "Good: up to 5 days refrigerated",
            WaterActivityBand::Low => "Long: up to a week refrigerated",
        }
    }

    pub fn microbial_safety(self) -> &'static str {
        match self {
            WaterActivityBand::VeryHigh => "High risk: keep below 4°C at all times",
            WaterActivityBand::High => "Moderate risk: refrigerate promptly",
            WaterActivityBand::Moderate => "Low risk: most bacteria are inhibited",
            WaterActivityBand::Low => "Very low risk: only moulds and yeasts can grow",
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WaterActivity {
    pub aw: f64,
    pub total_water: f64,
    pub total_solutes: f64,
    pub band: WaterActivityBand,
    pub moisture_transfer: String,
    pub maturation_time: String,
    pub stability: String,
    pub microbial_safety: String,
}

/// Simplified colligative estimate of the filling's water activity.
pub fn water_activity(recipe: &FillingRecipe) -> WaterActivity {
    let total_water: f64 = recipe
        .iter()
        .map(|(name, grams)| grams * lookup_or_zero(&WATER_CONTENT, name))
        .sum();
    let total_solutes: f64 = recipe
        .iter()
        .filter(|(name, _)| is_high_sugar(name))
        .map(|(_, grams)| grams * SOLUTE_FRACTION)
        .sum();

    let denominator = total_water + total_solutes * SOLUTE_COLLIGATIVE_FACTOR;
    let water_fraction = if denominator > 0.0 {
        total_water / denominator
    } else {
        0.0
    };
    let aw = (water_fraction * WATER_ACTIVITY_CAP).min(WATER_ACTIVITY_CAP);
    let band = WaterActivityBand::from_aw(aw);

    WaterActivity {
        aw,
        total_water,
        total_solutes,
        band,
        moisture_transfer: band.moisture_transfer().to_string(),
        maturation_time: band.maturation_time().to_string(),
        stability: band.stability().to_string(),
        microbial_safety: band.microbial_safety().to_string(),
    }
}

#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StabilityLevel {
    Excellent,
    Good,
    Moderate,
    Poor,
}

impl StabilityLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= STABILITY_EXCELLENT_FROM {
            StabilityLevel::Excellent
        } else if score >= STABILITY_GOOD_FROM {
            StabilityLevel::Good
        } else if score >= STABILITY_MODERATE_FROM {
            StabilityLevel::Moderate
        } else {
            StabilityLevel::Poor
        }
    }

    pub fn recommendation(self) -> &'static str {
        match self {
            StabilityLevel::Excellent => "Holds its shape under stacked layers; assemble freely",
            StabilityLevel::Good => "Stable enough for 8-10 layers; chill between every few layers",
            StabilityLevel::Moderate => {
                "May ooze under weight: add butter or cream cheese, or chill well before assembly"
            }
            StabilityLevel::Poor => {
                "Will run and soak through: thicken with a stabilizer or switch to a firmer cream"
            }
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct StabilityContribution {
    pub ingredient: String,
    /// Share of the filling mass, percent.
    pub percentage: f64,
    /// Points added to (or taken from) the score.
    pub effect: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct StabilityReport {
    pub score: f64,
    pub level: StabilityLevel,
    /// Only contributions of at least one point.
    pub contributions: Vec<StabilityContribution>,
    pub recommendation: String,
}

/// Structural stability score in [0, 100], starting from a neutral 50.
pub fn stability_score(recipe: &FillingRecipe) -> StabilityReport {
    let total = recipe.total();
    let mut score = STABILITY_BASE;
    let mut contributions = Vec::new();

    if total > 0.0 {
        for (name, grams) in recipe.iter() {
            let percentage = grams / total * 100.0;
            let power = lookup(&STABILIZERS, name)
                .or_else(|| lookup(&DESTABILIZERS, name).map(|p| -p));
            let Some(power) = power else { continue };
            let effect = percentage * power / 100.0;
            score += effect;
            if effect.abs() >= STABILITY_DETAIL_MIN {
                contributions.push(StabilityContribution {
                    ingredient: name.to_string(),
                    percentage,
                    effect,
                });
            }
        }
    }

    let score = clamp(score, 0.0, 100.0);
    let level = StabilityLevel::from_score(score);
    StabilityReport {
        score,
        level,
        contributions,
        recommendation: level.recommendation().to_string(),
    }
}

/// Everything known about a filling's chemistry.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FillingChemistry {
    pub sweetness: SweetnessIndex,
    pub water_activity: WaterActivity,
    pub stability: StabilityReport,
    /// Preset the display bands come from, if any.
    pub preset: Option<String>,
    pub viscosity: Option<Band>,
    pub ph: Option<Band>,
    pub brix: Option<Band>,
}

/// Computes the filling chemistry; viscosity, pH and brix bands are copied
/// from `preset` when one is given.
pub fn analyze_filling(recipe: &FillingRecipe, preset: Option<&FillingPreset>) -> FillingChemistry {
    let chemistry = FillingChemistry {
        sweetness: sweetness_index(recipe),
        water_activity: water_activity(recipe),
        stability: stability_score(recipe),
        preset: preset.map(|p| p.key.to_string()),
        viscosity: preset.map(|p| p.target.viscosity),
        ph: preset.map(|p| p.target.ph),
        brix: preset.map(|p| p.target.brix),
    };
    debug!(
        sweetness = chemistry.sweetness.percentage,
        aw = chemistry.water_activity.aw,
        stability = chemistry.stability.score,
        "analyzed filling"
    );
    chemistry
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sugar_type_resolution() {
        assert_eq!(resolve_sugar_type("Condensed Milk"), SugarType::CondensedMilk);
        assert_eq!(resolve_sugar_type("boiled_condensed_milk"), SugarType::DulceDeLeche);
        assert_eq!(resolve_sugar_type("sour-cream"), SugarType::Lactose);
        assert_eq!(resolve_sugar_type("maple-syrup"), SugarType::Sucrose);
    }

    #[test]
    fn test_empty_filling_is_not_sweetened() {
        let s = sweetness_index(&FillingRecipe::new());
        assert_eq!(s.index, 0.0);
        assert_eq!(s.percentage, 0.0);
        assert_eq!(s.level, SweetnessLevel::NotSweetened);
        assert_eq!(s.level.arabic_label(), "غير محلى");
    }

    #[test]
    fn test_pure_sugar_is_very_sweet() {
        let s = sweetness_index(&FillingRecipe::from_pairs(&[("sugar", 100.0)]));
        assert_relative_eq!(s.index, 1.0);
        assert_eq!(s.level, SweetnessLevel::VerySweet);
    }

    #[test]
    fn test_sweetness_weights_by_sugar_content_and_power() {
        // 400 g condensed milk (55% sugar, power 0.95) + 600 g sour cream (3%, lactose 0.16)
        let r = FillingRecipe::from_pairs(&[("condensed-milk", 400.0), ("sour-cream", 600.0)]);
        let expected = (400.0 * 0.55 * 0.95 + 600.0 * 0.03 * 0.16) / 1000.0;
        let s = sweetness_index(&r);
        assert_relative_eq!(s.index, expected, epsilon = 1e-12);
        assert_eq!(s.level, SweetnessLevel::Mild);
    }

    #[test]
    fn test_unknown_ingredients_dilute_sweetness() {
        let sweet = sweetness_index(&FillingRecipe::from_pairs(&[("sugar", 100.0)]));
        let diluted = sweetness_index(&FillingRecipe::from_pairs(&[
            ("sugar", 100.0),
            ("walnuts", 100.0),
        ]));
        assert_relative_eq!(diluted.index, sweet.index / 2.0);
    }

    #[test]
    fn test_sweetness_level_edges() {
        assert_eq!(SweetnessLevel::from_percentage(9.99), SweetnessLevel::NotSweetened);
        assert_eq!(SweetnessLevel::from_percentage(10.0), SweetnessLevel::LightlySweet);
        assert_eq!(SweetnessLevel::from_percentage(34.9), SweetnessLevel::Mild);
        assert_eq!(SweetnessLevel::from_percentage(50.0), SweetnessLevel::Sweet);
        assert_eq!(SweetnessLevel::from_percentage(65.0), SweetnessLevel::VerySweet);
    }

    #[test]
    fn test_water_activity_formula() {
        let r = FillingRecipe::from_pairs(&[("condensed-milk", 400.0), ("sour-cream", 600.0)]);
        let water = 400.0 * 0.27 + 600.0 * 0.72;
        let solutes = 400.0 * 0.6;
        let expected = water / (water + solutes * 0.003) * 0.99;
        let w = water_activity(&r);
        assert_relative_eq!(w.total_water, water, epsilon = 1e-9);
        assert_relative_eq!(w.total_solutes, solutes, epsilon = 1e-9);
        assert_relative_eq!(w.aw, expected, epsilon = 1e-12);
        assert_eq!(w.band, WaterActivityBand::VeryHigh);
    }

    #[test]
    fn test_water_activity_without_water() {
        let w = water_activity(&FillingRecipe::from_pairs(&[("sugar", 100.0)]));
        assert_eq!(w.aw, 0.0);
        assert_eq!(w.band, WaterActivityBand::Low);
        assert_eq!(water_activity(&FillingRecipe::new()).aw, 0.0);
    }

    #[test]
    fn test_water_activity_bands() {
        assert_eq!(WaterActivityBand::from_aw(0.96), WaterActivityBand::VeryHigh);
        assert_eq!(WaterActivityBand::from_aw(0.95), WaterActivityBand::High);
        assert_eq!(WaterActivityBand::from_aw(0.88), WaterActivityBand::Moderate);
        assert_eq!(WaterActivityBand::from_aw(0.85), WaterActivityBand::Low);
    }

    #[test]
    fn test_stability_clamps() {
        let stiff = stability_score(&FillingRecipe::from_pairs(&[("gelatin", 100.0)]));
        assert_eq!(stiff.score, 100.0);
        assert_eq!(stiff.level, StabilityLevel::Excellent);

        let runny = stability_score(&FillingRecipe::from_pairs(&[("lemon-juice", 100.0)]));
        assert_eq!(runny.score, 0.0);
        assert_eq!(runny.level, StabilityLevel::Poor);
    }

    #[test]
    fn test_stability_contributions() {
        // butter 20% -> +8, condensed milk 40% -> +8, sour cream 40% -> -10
        let r = FillingRecipe::from_pairs(&[
            ("condensed-milk", 400.0),
            ("butter", 200.0),
            ("sour-cream", 400.0),
        ]);
        let s = stability_score(&r);
        assert_relative_eq!(s.score, 56.0, epsilon = 1e-9);
        assert_eq!(s.level, StabilityLevel::Moderate);
        assert_eq!(s.contributions.len(), 3);
        let sour = s
            .contributions
            .iter()
            .find(|c| c.ingredient == "sour-cream")
            .unwrap();
        assert_relative_eq!(sour.effect, -10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_small_contributions_hidden_but_counted() {
        // heavy cream at 5% -> +0.5, below the detail threshold
        let r = FillingRecipe::from_pairs(&[("heavy-cream", 50.0), ("walnuts", 950.0)]);
        let s = stability_score(&r);
        assert!(s.contributions.is_empty());
        assert_relative_eq!(s.score, 50.5, epsilon = 1e-9);
    }

    #[test]
    fn test_analyze_filling_without_preset_has_no_bands() {
        let chem = analyze_filling(&FillingRecipe::from_pairs(&[("butter", 100.0)]), None);
        assert!(chem.preset.is_none());
        assert!(chem.viscosity.is_none() && chem.ph.is_none() && chem.brix.is_none());
    }
}
