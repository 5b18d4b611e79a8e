//! Layer baking model: Maillard-style browning and moisture loss as
//! first-order exponentials in time with Arrhenius-like temperature terms.

use crate::analyzer::RecipeAnalysis;
use crate::constants::*;
use crate::recipe::{CheckStatus, Component};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Oven settings for one layer.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BakingParams {
    /// °C
    pub temp: f64,
    /// minutes
    pub time: f64,
    #[serde(default = "default_thickness")]
    pub thickness_mm: f64,
}

fn default_thickness() -> f64 {
    DEFAULT_LAYER_THICKNESS_MM
}

impl BakingParams {
    pub fn new(temp: f64, time: f64) -> Self {
        BakingParams {
            temp,
            time,
            thickness_mm: DEFAULT_LAYER_THICKNESS_MM,
        }
    }

    pub fn with_thickness(mut self, thickness_mm: f64) -> Self {
        self.thickness_mm = thickness_mm;
        self
    }
}

#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LayerColor {
    Pale,
    Golden,
    Amber,
    Dark,
    Burnt,
}

impl LayerColor {
    pub fn from_browning(index: f64) -> Self {
        if index >= BROWNING_BURNT_FROM {
            LayerColor::Burnt
        } else if index >= BROWNING_DARK_FROM {
            LayerColor::Dark
        } else if index >= BROWNING_AMBER_FROM {
            LayerColor::Amber
        } else if index >= BROWNING_GOLDEN_FROM {
            LayerColor::Golden
        } else {
            LayerColor::Pale
        }
    }

    fn recommendation(self) -> &'static str {
        match self {
            LayerColor::Pale => "Layers are underbaked: add 1-2 minutes or raise the oven by 10°C",
            LayerColor::Golden => "Colour is right: keep time and temperature",
            LayerColor::Amber => "Deep colour: watch the last minute closely",
            LayerColor::Dark => "Too dark: lower the oven by 10-15°C",
            LayerColor::Burnt => "Burnt: lower the temperature and shorten the bake",
        }
    }

    fn visual(self) -> &'static str {
        match self {
            LayerColor::Pale => "Cream to light straw, edges barely coloured",
            LayerColor::Golden => "Even golden brown with slightly darker edges",
            LayerColor::Amber => "Amber brown, glossy surface",
            LayerColor::Dark => "Dark brown, edges close to black",
            LayerColor::Burnt => "Blackened patches and scorched edges",
        }
    }

    fn aroma(self) -> &'static str {
        match self {
            LayerColor::Pale => "Raw flour and faint honey",
            LayerColor::Golden => "Warm honey and toasted biscuit",
            LayerColor::Amber => "Caramel and roasted honey",
            LayerColor::Dark => "Bitter caramel",
            LayerColor::Burnt => "Acrid, burnt sugar",
        }
    }
}

#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LayerTexture {
    Soft,
    Tender,
    Firm,
    Dry,
}

impl LayerTexture {
    pub fn from_score(score: f64) -> Self {
        if score >= TEXTURE_SOFT_FROM {
            LayerTexture::Soft
        } else if score >= TEXTURE_TENDER_FROM {
            LayerTexture::Tender
        } else if score >= TEXTURE_FIRM_FROM {
            LayerTexture::Firm
        } else {
            LayerTexture::Dry
        }
    }

    fn recommendation(self) -> &'static str {
        match self {
            LayerTexture::Soft => "Soft layers: they will soak quickly, use a thicker cream",
            LayerTexture::Tender => "Tender layers: ideal for a standard soak",
            LayerTexture::Firm => "Firm layers: allow at least 12 hours of resting with the filling",
            LayerTexture::Dry => "Dry layers: shorten the bake or lower the temperature",
        }
    }

    fn description(self) -> &'static str {
        match self {
            LayerTexture::Soft => "Flexible, bends without cracking",
            LayerTexture::Tender => "Crisp at the edge, yielding in the middle",
            LayerTexture::Firm => "Crisp throughout, snaps when bent",
            LayerTexture::Dry => "Hard and brittle, shatters when cut",
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SensoryPredictions {
    pub visual: String,
    pub aroma: String,
    pub texture: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BakingPrediction {
    pub color: LayerColor,
    pub texture: LayerTexture,
    /// rounded to an integer
    pub browning_index: f64,
    /// percent, one decimal
    pub moisture_loss: f64,
    /// rounded to an integer
    pub texture_score: f64,
    pub recommendations: Vec<String>,
    pub sensory_predictions: SensoryPredictions,
    pub parameters: BakingParams,
}

/// Browning index in [0, 100).
pub fn browning_index(analysis: &RecipeAnalysis, params: &BakingParams) -> f64 {
    let recipe = &analysis.recipe;
    let honey_share = recipe.honey / (recipe.honey + recipe.sugar).max(1.0);
    let maillard_rate =
        MAILLARD_BASE_RATE * ((params.temp - MAILLARD_REFERENCE_C) / MAILLARD_TEMP_SCALE).exp();
    let sugar_effect = 1.0 + HONEY_BROWNING_BOOST * honey_share;
    let soda_effect = match analysis.check(Component::Soda) {
        CheckStatus::High => SODA_HIGH_BROWNING,
        CheckStatus::Low => SODA_LOW_BROWNING,
        CheckStatus::Optimal => 1.0,
    };
    let thickness_effect = (DEFAULT_LAYER_THICKNESS_MM / params.thickness_mm.max(1.0)).sqrt();

    100.0
        * (1.0
            - (-maillard_rate * params.time * sugar_effect * soda_effect * thickness_effect).exp())
}

/// Percent of dough weight lost as steam. Thickness counts as at least 1 mm,
/// as in [`browning_index`].
pub fn moisture_loss(analysis: &RecipeAnalysis, params: &BakingParams) -> f64 {
    let moisture_rate =
        MOISTURE_BASE_RATE * ((params.temp - MOISTURE_REFERENCE_C) / MOISTURE_TEMP_SCALE).exp();
    let butter_ratio = analysis.percentages.butter / 100.0;
    let butter_protection = 1.0 - butter_ratio * 0.5;
    let thickness_dryness = params.thickness_mm.max(1.0) / DEFAULT_LAYER_THICKNESS_MM;

    analysis.hydration
        * (1.0 - (-moisture_rate * params.time).exp())
        * MOISTURE_LOSS_FACTOR
        * butter_protection
        / thickness_dryness
}

/// Predicts colour, texture and moisture loss for one layer.
pub fn simulate_baking(analysis: &RecipeAnalysis, params: BakingParams) -> BakingPrediction {
    let browning = browning_index(analysis, &params);
    let loss = moisture_loss(analysis, &params);
    let texture_score =
        100.0 - loss * 2.0 - ((params.temp - OVERHEAT_THRESHOLD_C) * OVERHEAT_PENALTY_PER_C).max(0.0);

    let color = LayerColor::from_browning(browning);
    let texture = LayerTexture::from_score(texture_score);

    let mut recommendations = vec![
        color.recommendation().to_string(),
        texture.recommendation().to_string(),
    ];
    if params.temp > OVERHEAT_THRESHOLD_C {
        recommendations.push(format!(
            "Oven above {OVERHEAT_THRESHOLD_C}°C dries thin layers; 180-190°C is the usual range"
        ));
    }

    debug!(
        browning,
        moisture_loss = loss,
        texture_score,
        "simulated layer bake"
    );

    BakingPrediction {
        color,
        texture,
        browning_index: browning.round(),
        moisture_loss: (loss * 10.0).round() / 10.0,
        texture_score: texture_score.round(),
        recommendations,
        sensory_predictions: SensoryPredictions {
            visual: color.visual().to_string(),
            aroma: color.aroma().to_string(),
            texture: texture.description().to_string(),
        },
        parameters: params,
    }
}
