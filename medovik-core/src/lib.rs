//! Calculation engine for layered honey cake (medovik): dough analysis,
//! baking and tempering predictions, pan scaling and filling chemistry.
//!
//! Every operation is a pure function of its inputs. Expected bad input is
//! reported through return values: a [`ValidationError`] for rejected dough
//! masses, `None` for degenerate inputs (empty recipes, zero pan area) and
//! `f64::INFINITY` / `0.0` from solvers at physically impossible targets.

pub mod advisor;
pub mod analyzer;
pub mod baking;
pub mod compatibility;
pub mod constants;
pub mod error;
pub mod filling;
pub mod recipe;
pub mod scaling;
pub mod tempering;
pub mod texture;
pub mod validator;

pub use advisor::{AdviceCard, generate_advice};
pub use analyzer::{Percentages, RecipeAnalysis, analyze_recipe};
pub use baking::{BakingParams, BakingPrediction, simulate_baking};
pub use compatibility::{
    CompatibilityReport, DoughChemistry, build_compatibility, estimate_dough_chemistry,
};
pub use error::ValidationError;
pub use recipe::{
    CheckStatus, Component, DoughIngredient, DoughRecipe, FillingRecipe, IngredientEntry,
    IngredientMass, amount_of,
};
pub use scaling::{PanGeometry, PanShape, pan_area};
pub use tempering::{SafetyStatus, TemperingInput, TemperingResult, simulate_tempering};
pub use texture::{TextureProfile, predict_texture};
pub use validator::{ValidationReport, validate_recipe};

#[inline]
pub(crate) fn clamp<T: PartialOrd>(v: T, lo: T, hi: T) -> T {
    if v < lo {
        lo
    } else if v > hi {
        hi
    } else {
        v
    }
}
