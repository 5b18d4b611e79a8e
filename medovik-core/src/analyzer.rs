use crate::constants::{
    BUTTER_WATER_FRACTION, EGG_WATER_FRACTION, HONEY_WATER_FRACTION, QUALITY_PENALTY, ideal_range,
};
use crate::error::ValidationError;
use crate::recipe::{CheckStatus, Component, DoughRecipe};
use crate::validator::validate_recipe;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Share of total dough mass per ingredient, in percent.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Percentages {
    pub flour: f64,
    pub butter: f64,
    pub sugar: f64,
    pub honey: f64,
    pub eggs: f64,
    pub soda: f64,
    /// sugar + honey
    pub sugars: f64,
}

impl Percentages {
    pub fn of_component(&self, component: Component) -> f64 {
        match component {
            Component::Flour => self.flour,
            Component::Butter => self.butter,
            Component::Sugars => self.sugars,
            Component::Eggs => self.eggs,
            Component::Soda => self.soda,
        }
    }
}

/// Immutable snapshot of a dough recipe's composition and compliance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeAnalysis {
    pub recipe: DoughRecipe,
    pub total_weight: f64,
    pub percentages: Percentages,
    /// Iterates in component order: flour, butter, sugars, eggs, soda.
    pub checks: BTreeMap<Component, CheckStatus>,
    pub quality_score: u8,
    /// Water from eggs, honey and butter as percent of flour.
    pub hydration: f64,
    pub liquid_weight: f64,
}

impl RecipeAnalysis {
    pub fn check(&self, component: Component) -> CheckStatus {
        self.checks
            .get(&component)
            .copied()
            .unwrap_or(CheckStatus::Optimal)
    }

    pub fn is_fully_optimal(&self) -> bool {
        self.checks.values().all(|s| *s == CheckStatus::Optimal)
    }
}

/// Water carried by the wet ingredients, grams.
pub fn liquid_weight(recipe: &DoughRecipe) -> f64 {
    recipe.eggs * EGG_WATER_FRACTION
        + recipe.honey * HONEY_WATER_FRACTION
        + recipe.butter * BUTTER_WATER_FRACTION
}

/// Liquid as percent of flour; 0 when there is no flour.
pub fn hydration_percent(recipe: &DoughRecipe) -> f64 {
    if recipe.flour > 0.0 {
        liquid_weight(recipe) / recipe.flour * 100.0
    } else {
        0.0
    }
}

fn classify(percent: f64, component: Component) -> CheckStatus {
    let range = ideal_range(component);
    if percent < range.min {
        CheckStatus::Low
    } else if percent > range.max {
        CheckStatus::High
    } else {
        CheckStatus::Optimal
    }
}

/// Analyzes a dough recipe.
///
/// - `Err` when the validator rejects the masses.
/// - `Ok(None)` when the recipe weighs nothing.
/// - `Ok(Some(_))` otherwise. Same input, same output.
pub fn analyze_recipe(recipe: &DoughRecipe) -> Result<Option<RecipeAnalysis>, ValidationError> {
    if let Err(e) = validate_recipe(recipe).into_result() {
        warn!(errors = ?e.errors, "dough recipe rejected");
        return Err(e);
    }

    let total = recipe.total();
    if total <= 0.0 {
        debug!("empty dough recipe, nothing to analyze");
        return Ok(None);
    }

    let pct = |g: f64| g / total * 100.0;
    let percentages = Percentages {
        flour: pct(recipe.flour),
        butter: pct(recipe.butter),
        sugar: pct(recipe.sugar),
        honey: pct(recipe.honey),
        eggs: pct(recipe.eggs),
        soda: pct(recipe.soda),
        sugars: pct(recipe.sugar + recipe.honey),
    };

    let mut checks = BTreeMap::new();
    let mut score: i32 = 100;
    for component in Component::ALL {
        let status = classify(percentages.of_component(component), component);
        if status != CheckStatus::Optimal {
            score -= QUALITY_PENALTY;
        }
        checks.insert(component, status);
    }

    let analysis = RecipeAnalysis {
        recipe: *recipe,
        total_weight: total,
        percentages,
        checks,
        quality_score: score.clamp(0, 100) as u8,
        hydration: hydration_percent(recipe),
        liquid_weight: liquid_weight(recipe),
    };
    debug!(
        total = analysis.total_weight,
        hydration = analysis.hydration,
        score = analysis.quality_score,
        "analyzed dough recipe"
    );
    Ok(Some(analysis))
}
