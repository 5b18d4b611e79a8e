use crate::constants::{MASS_BOUNDS, MAX_SODA_TO_FLOUR_PERCENT};
use crate::error::ValidationError;
use crate::recipe::DoughRecipe;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Outcome of bounds-checking a dough recipe.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    pub fn into_result(self) -> Result<(), ValidationError> {
        if self.valid {
            Ok(())
        } else {
            Err(ValidationError::new(self.errors))
        }
    }
}

/// Checks every dough mass against [`MASS_BOUNDS`] and the soda/flour ratio.
///
/// All violations are collected. The soda ratio message lands in the same
/// list, so a high ratio alone makes the recipe invalid.
pub fn validate_recipe(recipe: &DoughRecipe) -> ValidationReport {
    let mut errors = Vec::new();

    for (ingredient, min, max) in MASS_BOUNDS {
        let grams = recipe.get(ingredient);
        if !grams.is_finite() {
            errors.push(format!("{ingredient}: value is not a number"));
        } else if grams < min || grams > max {
            errors.push(format!(
                "{ingredient}: {grams} g is outside the allowed range {min}-{max} g"
            ));
        }
    }

    if recipe.flour > 0.0 && recipe.soda > 0.0 {
        let ratio = recipe.soda / recipe.flour * 100.0;
        if ratio > MAX_SODA_TO_FLOUR_PERCENT {
            errors.push(format!(
                "warning: soda is {ratio:.2}% of flour (more than {MAX_SODA_TO_FLOUR_PERCENT}%), expect a soapy taste"
            ));
        }
    }

    debug!(violations = errors.len(), "validated dough recipe");
    ValidationReport {
        valid: errors.is_empty(),
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ideal_recipe_is_valid() {
        let report = validate_recipe(&DoughRecipe::ideal());
        assert!(report.valid);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_collects_every_violation() {
        let recipe = DoughRecipe {
            flour: 12_000.0,
            butter: -1.0,
            sugar: f64::NAN,
            soda: 150.0,
            ..DoughRecipe::ideal()
        };
        let report = validate_recipe(&recipe);
        assert!(!report.valid);
        // flour, butter, sugar, soda bounds + soda ratio (150/12000 = 1.25% is fine)
        assert_eq!(report.errors.len(), 4);
        assert!(report.errors[2].contains("not a number"));
    }

    #[test]
    fn test_soda_ratio_message_blocks_validity() {
        let recipe = DoughRecipe {
            flour: 100.0,
            soda: 3.0,
            ..DoughRecipe::ideal()
        };
        let report = validate_recipe(&recipe);
        assert!(!report.valid);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].starts_with("warning: soda"));
    }

    #[test]
    fn test_ratio_check_skipped_without_flour() {
        let recipe = DoughRecipe {
            flour: 0.0,
            soda: 50.0,
            ..DoughRecipe::default()
        };
        assert!(validate_recipe(&recipe).valid);
    }

    #[test]
    fn test_into_result() {
        assert!(validate_recipe(&DoughRecipe::ideal()).into_result().is_ok());
        let bad = DoughRecipe {
            eggs: 6000.0,
            ..DoughRecipe::ideal()
        };
        let err = validate_recipe(&bad).into_result().unwrap_err();
        assert_eq!(err.errors.len(), 1);
        assert!(err.to_string().starts_with("invalid recipe: eggs"));
    }
}
