//! Reference values for the dough, baking, tempering, scaling and filling
//! models. Pure data plus table lookups; no model logic lives here.

use crate::filling::SugarType;
use crate::recipe::{Component, DoughIngredient, normalize_key};
use serde::{Deserialize, Serialize};

/// Inclusive percentage band for a ranged component.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IdealRange {
    pub min: f64,
    pub max: f64,
}

impl IdealRange {
    pub const fn new(min: f64, max: f64) -> Self {
        IdealRange { min, max }
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }
}

/* ---------- Dough formulation ---------- */

/// Ideal share of total dough mass, in percent.
pub const IDEAL_RANGES: [(Component, IdealRange); 5] = [
    (Component::Flour, IdealRange::new(45.0, 52.0)),
    (Component::Butter, IdealRange::new(10.0, 14.0)),
    (Component::Sugars, IdealRange::new(27.0, 33.0)),
    (Component::Eggs, IdealRange::new(8.0, 12.0)),
    (Component::Soda, IdealRange::new(0.4, 0.7)),
];

pub fn ideal_range(component: Component) -> IdealRange {
    IDEAL_RANGES
        .iter()
        .find(|(c, _)| *c == component)
        .map(|(_, r)| *r)
        .unwrap_or(IdealRange::new(0.0, 100.0))
}

/// Accepted mass per dough ingredient, grams (min, max).
pub const MASS_BOUNDS: [(DoughIngredient, f64, f64); 6] = [
    (DoughIngredient::Flour, 0.0, 10_000.0),
    (DoughIngredient::Butter, 0.0, 5_000.0),
    (DoughIngredient::Sugar, 0.0, 5_000.0),
    (DoughIngredient::Honey, 0.0, 5_000.0),
    (DoughIngredient::Eggs, 0.0, 5_000.0),
    (DoughIngredient::Soda, 0.0, 100.0),
];

/// Soda above this percent of flour is reported.
pub const MAX_SODA_TO_FLOUR_PERCENT: f64 = 2.0;

/// Water fraction each wet ingredient brings to the dough.
pub const EGG_WATER_FRACTION: f64 = 0.75;
pub const HONEY_WATER_FRACTION: f64 = 0.18;
pub const BUTTER_WATER_FRACTION: f64 = 0.16;

pub const QUALITY_PENALTY: i32 = 20;

/// Hydration band edges (percent of flour).
pub const HYDRATION_DRY_BELOW: f64 = 20.0;
pub const HYDRATION_IDEAL_MAX: f64 = 26.0;
pub const HYDRATION_SOFT_MAX: f64 = 32.0;

/* ---------- Baking ---------- */

pub const DEFAULT_LAYER_THICKNESS_MM: f64 = 3.0;
pub const MAILLARD_BASE_RATE: f64 = 0.005;
pub const MAILLARD_REFERENCE_C: f64 = 150.0;
pub const MAILLARD_TEMP_SCALE: f64 = 20.0;
pub const HONEY_BROWNING_BOOST: f64 = 0.4;
pub const SODA_HIGH_BROWNING: f64 = 1.15;
pub const SODA_LOW_BROWNING: f64 = 0.85;
pub const MOISTURE_BASE_RATE: f64 = 0.01;
pub const MOISTURE_REFERENCE_C: f64 = 100.0;
pub const MOISTURE_TEMP_SCALE: f64 = 30.0;
pub const MOISTURE_LOSS_FACTOR: f64 = 0.3;
pub const OVERHEAT_THRESHOLD_C: f64 = 190.0;
pub const OVERHEAT_PENALTY_PER_C: f64 = 0.5;

/// Browning index edges: pale | golden | amber | dark | burnt.
pub const BROWNING_GOLDEN_FROM: f64 = 60.0;
pub const BROWNING_AMBER_FROM: f64 = 90.0;
pub const BROWNING_DARK_FROM: f64 = 110.0;
pub const BROWNING_BURNT_FROM: f64 = 130.0;

/// Texture score edges: soft | tender | firm | dry.
pub const TEXTURE_SOFT_FROM: f64 = 85.0;
pub const TEXTURE_TENDER_FROM: f64 = 70.0;
pub const TEXTURE_FIRM_FROM: f64 = 50.0;

/* ---------- Tempering ---------- */

/// Specific heats, kJ/(kg·K).
pub const CP_EGG: f64 = 3.18;
pub const CP_LIQUID_FALLBACK: f64 = 2.6;
pub const CP_BUTTER: f64 = 2.05;
pub const CP_SUGAR: f64 = 1.25;
pub const CP_HONEY: f64 = 2.25;
pub const CP_SODA: f64 = 0.88;

/// Batch temperature bands (°C).
pub const BATCH_DANGER_ABOVE: f64 = 65.0;
pub const BATCH_CAUTION_ABOVE: f64 = 60.0;
pub const BATCH_SAFE_ABOVE: f64 = 50.0;

/// Whole-run classification on the running maximum (°C).
pub const TEMPER_DANGER_ABOVE: f64 = 68.0;
pub const TEMPER_WARNING_ABOVE: f64 = 65.0;

/// Target used for corrective quantities (°C).
pub const TEMPER_SAFE_TARGET: f64 = 65.0;

pub const DEFAULT_BATCH_COUNT: u8 = 5;

/// Percent of the liquid poured in each batch.
pub fn batch_split(batch_count: u8) -> &'static [f64] {
    match batch_count {
        3 => &[25.0, 35.0, 40.0],
        4 => &[15.0, 25.0, 30.0, 30.0],
        6 => &[10.0, 15.0, 15.0, 20.0, 20.0, 20.0],
        _ => &[15.0, 20.0, 20.0, 20.0, 25.0],
    }
}

/* ---------- Scaling ---------- */

/// Compacted ingredient densities, g/cm³.
pub const DOUGH_DENSITIES: [(&str, f64); 6] = [
    ("flour", 1.45),
    ("butter", 0.91),
    ("sugar", 1.59),
    ("honey", 1.42),
    ("eggs", 1.03),
    ("soda", 2.20),
];

pub const DEFAULT_AIR_FACTOR: f64 = 0.03;
pub const AVERAGE_DOUGH_DENSITY: f64 = 1.25;
pub const FILLING_DENSITY: f64 = 1.1;

/* ---------- Filling chemistry ---------- */

/// Water mass fraction per filling ingredient.
pub const WATER_CONTENT: [(&str, f64); 14] = [
    ("sour-cream", 0.72),
    ("heavy-cream", 0.58),
    ("cream-cheese", 0.55),
    ("mascarpone", 0.45),
    ("milk", 0.87),
    ("butter", 0.16),
    ("condensed-milk", 0.27),
    ("dulce-de-leche", 0.30),
    ("honey", 0.17),
    ("caramel", 0.18),
    ("lemon-juice", 0.92),
    ("gelatin", 0.10),
    ("cornstarch", 0.12),
    ("vanilla", 0.50),
];

/// Sugar mass fraction per filling ingredient.
pub const SUGAR_CONTENT: [(&str, f64); 11] = [
    ("sugar", 1.0),
    ("powdered-sugar", 0.97),
    ("honey", 0.82),
    ("condensed-milk", 0.55),
    ("dulce-de-leche", 0.50),
    ("caramel", 0.70),
    ("sour-cream", 0.03),
    ("heavy-cream", 0.03),
    ("cream-cheese", 0.03),
    ("mascarpone", 0.04),
    ("milk", 0.05),
];

/// Name aliases resolving to a sugar type. Unlisted names are sucrose.
pub const SUGAR_TYPE_ALIASES: [(&str, SugarType); 16] = [
    ("sugar", SugarType::Sucrose),
    ("powdered-sugar", SugarType::Sucrose),
    ("icing-sugar", SugarType::Sucrose),
    ("brown-sugar", SugarType::Sucrose),
    ("honey", SugarType::Honey),
    ("condensed-milk", SugarType::CondensedMilk),
    ("sweetened-condensed-milk", SugarType::CondensedMilk),
    ("dulce-de-leche", SugarType::DulceDeLeche),
    ("boiled-condensed-milk", SugarType::DulceDeLeche),
    ("caramel", SugarType::Caramel),
    ("sour-cream", SugarType::Lactose),
    ("smetana", SugarType::Lactose),
    ("heavy-cream", SugarType::Lactose),
    ("cream-cheese", SugarType::Lactose),
    ("mascarpone", SugarType::Lactose),
    ("milk", SugarType::Lactose),
];

/// Sweetness relative to sucrose.
pub fn sweetness_power(sugar: SugarType) -> f64 {
    match sugar {
        SugarType::Sucrose => 1.0,
        SugarType::Honey => 1.3,
        SugarType::CondensedMilk => 0.95,
        SugarType::DulceDeLeche => 0.9,
        SugarType::Caramel => 0.7,
        SugarType::Lactose => 0.16,
    }
}

/// Sweetness level edges, percent.
pub const SWEETNESS_LEVEL_EDGES: [f64; 5] = [10.0, 20.0, 35.0, 50.0, 65.0];

/// Ingredients whose solids count as dissolved solutes.
pub const HIGH_SUGAR_INGREDIENTS: [&str; 6] = [
    "sugar",
    "powdered-sugar",
    "honey",
    "condensed-milk",
    "dulce-de-leche",
    "caramel",
];
pub const SOLUTE_FRACTION: f64 = 0.6;
pub const SOLUTE_COLLIGATIVE_FACTOR: f64 = 0.003;
pub const WATER_ACTIVITY_CAP: f64 = 0.99;
pub const AW_VERY_HIGH: f64 = 0.95;
pub const AW_HIGH: f64 = 0.90;
pub const AW_MODERATE: f64 = 0.85;

/// Structure-building ingredients and their power.
pub const STABILIZERS: [(&str, f64); 9] = [
    ("butter", 40.0),
    ("cream-cheese", 35.0),
    ("mascarpone", 30.0),
    ("dulce-de-leche", 30.0),
    ("condensed-milk", 20.0),
    ("powdered-sugar", 15.0),
    ("heavy-cream", 10.0),
    ("gelatin", 400.0),
    ("cornstarch", 150.0),
];

/// Ingredients that thin or weep; power is subtracted.
pub const DESTABILIZERS: [(&str, f64); 5] = [
    ("sour-cream", 25.0),
    ("milk", 50.0),
    ("honey", 20.0),
    ("lemon-juice", 60.0),
    ("sugar", 10.0),
];

pub const STABILITY_BASE: f64 = 50.0;
pub const STABILITY_EXCELLENT_FROM: f64 = 80.0;
pub const STABILITY_GOOD_FROM: f64 = 60.0;
pub const STABILITY_MODERATE_FROM: f64 = 40.0;
/// Contributions smaller than this are left out of the breakdown.
pub const STABILITY_DETAIL_MIN: f64 = 1.0;

/* ---------- Filling adjustment ---------- */

/// Sweet ingredient -> where its removed mass goes (name, share).
pub const SWEET_SUBSTITUTIONS: [(&str, &[(&str, f64)]); 6] = [
    ("condensed-milk", &[("sour-cream", 0.7), ("butter", 0.3)]),
    ("dulce-de-leche", &[("sour-cream", 0.6), ("butter", 0.4)]),
    ("sugar", &[("sour-cream", 1.0)]),
    ("powdered-sugar", &[("cream-cheese", 0.5), ("sour-cream", 0.5)]),
    ("honey", &[("sour-cream", 1.0)]),
    ("caramel", &[("heavy-cream", 0.5), ("butter", 0.5)]),
];

/// Auto sweetness reduction per unit of upscale, and its floor.
pub const UPSCALE_REDUCTION_STEP: f64 = 0.1;
pub const UPSCALE_MIN_MULTIPLIER: f64 = 0.75;

/* ---------- Lookups ---------- */

/// Value for `name` in a keyed table, or `None` when the name is absent.
pub fn lookup(table: &[(&str, f64)], name: &str) -> Option<f64> {
    let key = normalize_key(name);
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

/// Value for `name`, or 0 for unknown names.
pub fn lookup_or_zero(table: &[(&str, f64)], name: &str) -> f64 {
    lookup(table, name).unwrap_or(0.0)
}

pub fn is_high_sugar(name: &str) -> bool {
    let key = normalize_key(name);
    HIGH_SUGAR_INGREDIENTS.contains(&key.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_splits_sum_to_100() {
        for n in [3u8, 4, 5, 6] {
            let total: f64 = batch_split(n).iter().sum();
            assert!((total - 100.0).abs() < 1e-9, "{n} batches sum to {total}");
        }
    }

    #[test]
    fn test_unsupported_batch_count_uses_five_batches() {
        assert_eq!(batch_split(2), batch_split(5));
        assert_eq!(batch_split(9).len(), 5);
    }

    #[test]
    fn test_lookup_normalizes_and_defaults() {
        assert_eq!(lookup(&WATER_CONTENT, "Sour Cream"), Some(0.72));
        assert_eq!(lookup_or_zero(&WATER_CONTENT, "pistachio"), 0.0);
    }

    #[test]
    fn test_substitution_shares_sum_to_one() {
        for (name, targets) in SWEET_SUBSTITUTIONS {
            let total: f64 = targets.iter().map(|(_, s)| s).sum();
            assert!((total - 1.0).abs() < 1e-9, "{name}");
        }
    }
}
