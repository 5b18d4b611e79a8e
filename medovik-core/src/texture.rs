use crate::analyzer::RecipeAnalysis;
use crate::constants::{HYDRATION_DRY_BELOW, HYDRATION_IDEAL_MAX, HYDRATION_SOFT_MAX};
use serde::Serialize;

/// Dough consistency band derived from hydration.
#[derive(Copy, Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TextureBand {
    /// above 32%
    Critical,
    /// 26–32%
    Soft,
    /// 20–26%
    Ideal,
    /// below 20%
    Dry,
}

impl TextureBand {
    pub fn from_hydration(hydration: f64) -> Self {
        if hydration > HYDRATION_SOFT_MAX {
            TextureBand::Critical
        } else if hydration > HYDRATION_IDEAL_MAX {
            TextureBand::Soft
        } else if hydration >= HYDRATION_DRY_BELOW {
            TextureBand::Ideal
        } else {
            TextureBand::Dry
        }
    }
}

#[derive(Copy, Clone, Debug, Serialize, PartialEq, Eq)]
pub struct SensoryCues {
    pub touch: &'static str,
    pub appearance: &'static str,
    pub sound: &'static str,
    pub aroma: &'static str,
}

#[derive(Copy, Clone, Debug, Serialize, PartialEq, Eq)]
pub struct TechniqueCues {
    pub immediate: &'static str,
    pub working: &'static str,
    pub correction: &'static str,
}

/// What the dough should feel like and how to handle it.
#[derive(Copy, Clone, Debug, Serialize, PartialEq, Eq)]
pub struct TextureProfile {
    pub band: TextureBand,
    pub title: &'static str,
    pub sensory: SensoryCues,
    pub technique: TechniqueCues,
    pub indicator: &'static str,
    pub diagnosis: &'static str,
}

const CRITICAL: TextureProfile = TextureProfile {
    band: TextureBand::Critical,
    title: "Very sticky dough",
    sensory: SensoryCues {
        touch: "Clings to fingers and leaves strings when pulled away",
        appearance: "Glossy, slumps and spreads when left on the bench",
        sound: "Wet smacking when worked with a spatula",
        aroma: "Strong raw honey and egg",
    },
    technique: TechniqueCues {
        immediate: "Stop kneading and chill the dough for 30 minutes",
        working: "Roll between sheets of baking paper, never on a floured bench",
        correction: "Work in flour 1 tablespoon at a time until it releases from the bowl",
    },
    indicator: "🔴",
    diagnosis: "Too much liquid for the flour: layers will tear and spread",
};

const SOFT: TextureProfile = TextureProfile {
    band: TextureBand::Soft,
    title: "Soft dough",
    sensory: SensoryCues {
        touch: "Tacky, slightly sticks to a dry finger",
        appearance: "Smooth surface with a soft sheen",
        sound: "Quiet, pliable when folded",
        aroma: "Pronounced honey",
    },
    technique: TechniqueCues {
        immediate: "Rest the dough covered for 15 minutes before dividing",
        working: "Dust the rolling pin lightly and roll quickly",
        correction: "Add up to 2% more flour if it still sticks after resting",
    },
    indicator: "🟡",
    diagnosis: "Workable with care: expect slightly softer layers",
};

const IDEAL: TextureProfile = TextureProfile {
    band: TextureBand::Ideal,
    title: "Ideal dough",
    sensory: SensoryCues {
        touch: "Soft and elastic, leaves fingers clean",
        appearance: "Satin finish, holds its shape",
        sound: "Silent, rolls without cracking",
        aroma: "Balanced honey and caramel",
    },
    technique: TechniqueCues {
        immediate: "Divide into equal pieces while still warm",
        working: "Roll thin (2-3 mm) directly on baking paper",
        correction: "No correction needed",
    },
    indicator: "🟢",
    diagnosis: "Hydration in the target window: thin, even, tender layers",
};

const DRY: TextureProfile = TextureProfile {
    band: TextureBand::Dry,
    title: "Dry dough",
    sensory: SensoryCues {
        touch: "Firm and crumbly, cracks when pressed",
        appearance: "Matte with split edges",
        sound: "Crackles as it is rolled",
        aroma: "Faint honey, floury",
    },
    technique: TechniqueCues {
        immediate: "Keep the dough warm over a water bath",
        working: "Roll in short strokes and patch cracks at once",
        correction: "Add a beaten egg or a spoon of warm honey and knead briefly",
    },
    indicator: "🟠",
    diagnosis: "Too little liquid: layers will be brittle and crack when stacked",
};

pub fn profile_for(band: TextureBand) -> &'static TextureProfile {
    match band {
        TextureBand::Critical => &CRITICAL,
        TextureBand::Soft => &SOFT,
        TextureBand::Ideal => &IDEAL,
        TextureBand::Dry => &DRY,
    }
}

/// Texture profile for an analyzed dough.
pub fn predict_texture(analysis: &RecipeAnalysis) -> &'static TextureProfile {
    profile_for(TextureBand::from_hydration(analysis.hydration))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_edges() {
        assert_eq!(TextureBand::from_hydration(0.0), TextureBand::Dry);
        assert_eq!(TextureBand::from_hydration(19.999), TextureBand::Dry);
        assert_eq!(TextureBand::from_hydration(20.0), TextureBand::Ideal);
        assert_eq!(TextureBand::from_hydration(26.0), TextureBand::Ideal);
        assert_eq!(TextureBand::from_hydration(26.01), TextureBand::Soft);
        assert_eq!(TextureBand::from_hydration(32.0), TextureBand::Soft);
        assert_eq!(TextureBand::from_hydration(32.5), TextureBand::Critical);
        assert_eq!(TextureBand::from_hydration(1e6), TextureBand::Critical);
    }

    #[test]
    fn test_profiles_match_their_band() {
        for band in [
            TextureBand::Critical,
            TextureBand::Soft,
            TextureBand::Ideal,
            TextureBand::Dry,
        ] {
            assert_eq!(profile_for(band).band, band);
        }
    }
}
