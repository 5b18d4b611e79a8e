use crate::recipe::{FillingRecipe, normalize_key};
use serde::{Deserialize, Serialize};

/// Inclusive numeric band.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Band {
    pub min: f64,
    pub max: f64,
}

impl Band {
    pub const fn new(min: f64, max: f64) -> Self {
        Band { min, max }
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }
}

/// Reference properties a well-made batch should show. Display data only.
#[derive(Copy, Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TargetProperties {
    /// g/cm³
    pub density: f64,
    /// mPa·s
    pub viscosity: Band,
    pub ph: Band,
    /// °Bx
    pub brix: Band,
    pub water_activity: f64,
    /// Serving temperature, °C.
    pub serving_temp: Band,
}

#[derive(Copy, Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FillingPreset {
    pub key: &'static str,
    pub name: &'static str,
    pub base_recipe: &'static [(&'static str, f64)],
    pub target: TargetProperties,
    pub sensory_targets: &'static [&'static str],
    pub required_equipment: &'static [&'static str],
    pub critical_control_points: &'static [&'static str],
    pub failure_indicators: &'static [&'static str],
}

impl FillingPreset {
    pub fn base_recipe(&self) -> FillingRecipe {
        FillingRecipe::from_pairs(self.base_recipe)
    }
}

pub static PRESETS: [FillingPreset; 4] = [
    FillingPreset {
        key: "sour-cream",
        name: "Classic sour cream (smetana) cream",
        base_recipe: &[("sour-cream", 800.0), ("powdered-sugar", 200.0), ("vanilla", 5.0)],
        target: TargetProperties {
            density: 1.05,
            viscosity: Band::new(3_000.0, 8_000.0),
            ph: Band::new(4.4, 4.8),
            brix: Band::new(18.0, 24.0),
            water_activity: 0.97,
            serving_temp: Band::new(4.0, 8.0),
        },
        sensory_targets: &[
            "Light tang balancing the honey layers",
            "Pourable but coats the back of a spoon",
            "Clean dairy aroma",
        ],
        required_equipment: &["Chilled bowl", "Balloon whisk or mixer", "Fine sieve for the sugar"],
        critical_control_points: &[
            "Sour cream at 20% fat or more, well chilled",
            "Add sugar gradually to avoid thinning",
            "Do not overbeat: the cream turns to liquid",
        ],
        failure_indicators: &[
            "Cream runs off the layers",
            "Grainy texture from undissolved sugar",
            "Whey pooling at the base of the cake",
        ],
    },
    FillingPreset {
        key: "condensed-milk",
        name: "Condensed milk and butter cream",
        base_recipe: &[("condensed-milk", 400.0), ("butter", 200.0), ("sour-cream", 400.0)],
        target: TargetProperties {
            density: 1.15,
            viscosity: Band::new(15_000.0, 40_000.0),
            ph: Band::new(5.6, 6.4),
            brix: Band::new(28.0, 36.0),
            water_activity: 0.93,
            serving_temp: Band::new(6.0, 12.0),
        },
        sensory_targets: &[
            "Rich, milky sweetness",
            "Smooth and spreadable, holds soft peaks",
        ],
        required_equipment: &["Stand or hand mixer", "Spatula"],
        critical_control_points: &[
            "Butter soft (18-20°C) before beating",
            "Add condensed milk in a thin stream",
            "All ingredients at the same temperature",
        ],
        failure_indicators: &[
            "Curdled look from temperature mismatch",
            "Greasy film on the surface",
        ],
    },
    FillingPreset {
        key: "dulce-de-leche",
        name: "Dulce de leche cream",
        base_recipe: &[("dulce-de-leche", 400.0), ("butter", 250.0), ("heavy-cream", 200.0)],
        target: TargetProperties {
            density: 1.2,
            viscosity: Band::new(30_000.0, 70_000.0),
            ph: Band::new(6.0, 6.6),
            brix: Band::new(35.0, 45.0),
            water_activity: 0.88,
            serving_temp: Band::new(8.0, 14.0),
        },
        sensory_targets: &["Deep caramel notes", "Dense, glossy, pipeable"],
        required_equipment: &["Stand mixer", "Piping bag"],
        critical_control_points: &[
            "Whip the cream separately to soft peaks",
            "Fold, do not beat, once combined",
        ],
        failure_indicators: &["Too stiff to spread on thin layers", "Butter lumps"],
    },
    FillingPreset {
        key: "cream-cheese",
        name: "Cream cheese frosting",
        base_recipe: &[
            ("cream-cheese", 500.0),
            ("butter", 150.0),
            ("powdered-sugar", 150.0),
            ("heavy-cream", 200.0),
        ],
        target: TargetProperties {
            density: 1.1,
            viscosity: Band::new(20_000.0, 50_000.0),
            ph: Band::new(4.6, 5.2),
            brix: Band::new(20.0, 28.0),
            water_activity: 0.94,
            serving_temp: Band::new(4.0, 10.0),
        },
        sensory_targets: &["Tangy and creamy", "Firm enough to hold straight sides"],
        required_equipment: &["Mixer with paddle", "Offset spatula"],
        critical_control_points: &[
            "Cream cheese straight from the fridge",
            "Beat butter and sugar first, cheese last",
        ],
        failure_indicators: &["Runny frosting from overmixing the cheese", "Lumps of cold butter"],
    },
];

/// Preset by key (name normalization applies).
pub fn preset(key: &str) -> Option<&'static FillingPreset> {
    let key = normalize_key(key);
    PRESETS.iter().find(|p| p.key == key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_lookup() {
        assert_eq!(preset("Sour Cream").map(|p| p.key), Some("sour-cream"));
        assert!(preset("tiramisu").is_none());
    }

    #[test]
    fn test_presets_are_well_formed() {
        for p in &PRESETS {
            assert!(p.base_recipe().total() > 0.0, "{}", p.key);
            for band in [p.target.viscosity, p.target.ph, p.target.brix] {
                assert!(band.min < band.max, "{}", p.key);
            }
            assert!(p.target.water_activity > 0.0 && p.target.water_activity < 1.0);
        }
    }
}
