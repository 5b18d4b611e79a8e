//! Pairs baked-layer chemistry with filling chemistry.

use crate::analyzer::RecipeAnalysis;
use crate::baking::BakingPrediction;
use crate::clamp;
use crate::filling::FillingChemistry;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Estimated chemistry of a baked layer.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DoughChemistry {
    pub water_activity: f64,
    pub ph: f64,
    /// sugar + honey share of the dough, percent.
    pub sugar_percentage: f64,
    pub moisture_loss: f64,
}

/// Crumb water activity, pH and sugar load after baking.
pub fn estimate_dough_chemistry(analysis: &RecipeAnalysis, baking: &BakingPrediction) -> DoughChemistry {
    let water_activity = clamp(
        0.30 + (analysis.hydration - baking.moisture_loss) / 100.0,
        0.20,
        0.90,
    );
    let ph = (6.0 + analysis.percentages.soda * 1.6).min(9.0);
    DoughChemistry {
        water_activity,
        ph,
        sugar_percentage: analysis.percentages.sugars,
        moisture_loss: baking.moisture_loss,
    }
}

#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IssueCategory {
    Moisture,
    Sweetness,
    Acidity,
    Structure,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CompatibilityIssue {
    pub category: IssueCategory,
    pub penalty: u8,
    pub message: String,
    pub recommendation: String,
}

#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CompatibilityRating {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl CompatibilityRating {
    pub fn from_score(score: u8) -> Self {
        match score {
            85.. => CompatibilityRating::Excellent,
            70..=84 => CompatibilityRating::Good,
            50..=69 => CompatibilityRating::Fair,
            _ => CompatibilityRating::Poor,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CompatibilityReport {
    pub score: u8,
    pub rating: CompatibilityRating,
    pub issues: Vec<CompatibilityIssue>,
    pub recommendations: Vec<String>,
}

fn issue(category: IssueCategory, penalty: u8, message: &str, recommendation: &str) -> CompatibilityIssue {
    CompatibilityIssue {
        category,
        penalty,
        message: message.to_string(),
        recommendation: recommendation.to_string(),
    }
}

/// Scores how well a filling suits the baked layers. Only defined when
/// both chemistries are available.
pub fn build_compatibility(
    dough: Option<&DoughChemistry>,
    filling: Option<&FillingChemistry>,
) -> Option<CompatibilityReport> {
    let (dough, filling) = (dough?, filling?);
    let mut issues = Vec::new();

    let aw_gap = filling.water_activity.aw - dough.water_activity;
    if aw_gap < 0.2 {
        issues.push(issue(
            IssueCategory::Moisture,
            20,
            "Filling is too dry to soften the layers",
            "Add sour cream or heavy cream to the filling, or soak the layers with syrup",
        ));
    } else if aw_gap > 0.6 {
        issues.push(issue(
            IssueCategory::Moisture,
            15,
            "Moisture will rush into the layers and turn them soggy",
            "Thicken the filling or bake the layers a minute longer",
        ));
    }

    let combined_sweetness = dough.sugar_percentage + filling.sweetness.percentage;
    if combined_sweetness > 90.0 {
        issues.push(issue(
            IssueCategory::Sweetness,
            20,
            "Layers and filling together are cloying",
            "Reduce the filling's sweet ingredients or use a tangier cream",
        ));
    } else if combined_sweetness < 35.0 {
        issues.push(issue(
            IssueCategory::Sweetness,
            10,
            "The cake will taste flat",
            "Sweeten the filling slightly or add honey to the layers",
        ));
    }

    if let Some(ph) = filling.ph {
        if ph.min < 4.6 && dough.ph > 7.5 {
            issues.push(issue(
                IssueCategory::Acidity,
                10,
                "Alkaline layers against an acidic cream sharpen the soda aftertaste",
                "Reduce soda in the dough so it fully reacts with the honey",
            ));
        }
    }

    if filling.stability.score < 40.0 {
        issues.push(issue(
            IssueCategory::Structure,
            20,
            "Filling will squeeze out under the weight of the layers",
            "Use a firmer cream or add butter or cream cheese",
        ));
    } else if filling.stability.score < 60.0 {
        issues.push(issue(
            IssueCategory::Structure,
            10,
            "Filling may bulge at the sides of a tall cake",
            "Chill the cake between every few layers",
        ));
    }

    let penalty: i32 = issues.iter().map(|i| i32::from(i.penalty)).sum();
    let score = clamp(100 - penalty, 0, 100) as u8;
    let recommendations = issues.iter().map(|i| i.recommendation.clone()).collect();
    debug!(score, issues = issues.len(), "built compatibility report");

    Some(CompatibilityReport {
        score,
        rating: CompatibilityRating::from_score(score),
        issues,
        recommendations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::analyze_recipe;
    use crate::baking::{BakingParams, simulate_baking};
    use crate::filling::{Band, analyze_filling, preset};
    use crate::recipe::{DoughRecipe, FillingRecipe};
    use approx::assert_relative_eq;

    fn dough() -> DoughChemistry {
        let a = analyze_recipe(&DoughRecipe::app_default()).unwrap().unwrap();
        let b = simulate_baking(&a, BakingParams::new(180.0, 6.0));
        estimate_dough_chemistry(&a, &b)
    }

    #[test]
    fn test_dough_chemistry_estimate() {
        let d = dough();
        assert!(d.water_activity >= 0.2 && d.water_activity <= 0.9);
        assert!(d.ph > 6.0 && d.ph < 9.0);
        assert_relative_eq!(d.sugar_percentage, 300.0 / 1020.5 * 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_missing_side_gives_no_report() {
        let d = dough();
        let p = preset("condensed-milk").unwrap();
        let f = analyze_filling(&p.base_recipe(), Some(p));
        assert!(build_compatibility(None, Some(&f)).is_none());
        assert!(build_compatibility(Some(&d), None).is_none());
        assert!(build_compatibility(Some(&d), Some(&f)).is_some());
    }

    #[test]
    fn test_runny_filling_is_penalized() {
        let d = dough();
        let f = analyze_filling(&FillingRecipe::from_pairs(&[("milk", 100.0)]), None);
        let r = build_compatibility(Some(&d), Some(&f)).unwrap();
        assert!(r.issues.iter().any(|i| i.category == IssueCategory::Structure));
        assert!(r.score < 100);
        assert_eq!(r.recommendations.len(), r.issues.len());
    }

    fn neutral_dough() -> DoughChemistry {
        DoughChemistry {
            water_activity: 0.5,
            ph: 7.0,
            sugar_percentage: 30.0,
            moisture_loss: 2.0,
        }
    }

    /// Filling chemistry with aw 0.9, sweetness 30 %, stability 70, no pH band.
    fn neutral_filling() -> FillingChemistry {
        let mut f = analyze_filling(&FillingRecipe::from_pairs(&[("sour-cream", 100.0)]), None);
        f.water_activity.aw = 0.9;
        f.sweetness.percentage = 30.0;
        f.stability.score = 70.0;
        f.ph = None;
        f
    }

    fn report(dough: &DoughChemistry, filling: &FillingChemistry) -> CompatibilityReport {
        build_compatibility(Some(dough), Some(filling)).unwrap()
    }

    fn categories(r: &CompatibilityReport) -> Vec<IssueCategory> {
        r.issues.iter().map(|i| i.category).collect()
    }

    #[test]
    fn test_balanced_pair_scores_full() {
        let r = report(&neutral_dough(), &neutral_filling());
        assert!(r.issues.is_empty());
        assert_eq!(r.score, 100);
        assert_eq!(r.rating, CompatibilityRating::Excellent);
    }

    #[test]
    fn test_dry_filling_moisture_penalty() {
        let mut f = neutral_filling();
        f.water_activity.aw = 0.65;
        let r = report(&neutral_dough(), &f);
        assert_eq!(categories(&r), vec![IssueCategory::Moisture]);
        assert_eq!(r.issues[0].penalty, 20);
        assert_eq!(r.score, 80);
    }

    #[test]
    fn test_wet_filling_moisture_penalty() {
        let mut d = neutral_dough();
        d.water_activity = 0.25;
        let r = report(&d, &neutral_filling());
        assert_eq!(categories(&r), vec![IssueCategory::Moisture]);
        assert_eq!(r.score, 85);
    }

    #[test]
    fn test_sweetness_penalties() {
        let mut f = neutral_filling();
        f.sweetness.percentage = 65.0;
        let r = report(&neutral_dough(), &f);
        assert_eq!(categories(&r), vec![IssueCategory::Sweetness]);
        assert_eq!(r.score, 80);

        f.sweetness.percentage = 2.0;
        let r = report(&neutral_dough(), &f);
        assert_eq!(categories(&r), vec![IssueCategory::Sweetness]);
        assert_eq!(r.score, 90);
    }

    #[test]
    fn test_acidic_filling_on_alkaline_dough() {
        let mut f = neutral_filling();
        f.ph = Some(Band::new(4.4, 4.8));
        let r = report(&neutral_dough(), &f);
        assert!(r.issues.is_empty());

        let mut d = neutral_dough();
        d.ph = 7.6;
        let r = report(&d, &f);
        assert_eq!(categories(&r), vec![IssueCategory::Acidity]);
        assert_eq!(r.score, 90);
    }

    #[test]
    fn test_high_soda_dough_with_sour_cream_preset() {
        let recipe = DoughRecipe {
            soda: 10.0,
            ..DoughRecipe::app_default()
        };
        let a = analyze_recipe(&recipe).unwrap().unwrap();
        let b = simulate_baking(&a, BakingParams::new(180.0, 6.0));
        let d = estimate_dough_chemistry(&a, &b);
        assert!(d.ph > 7.5);

        let p = preset("sour-cream").unwrap();
        let f = analyze_filling(&p.base_recipe(), Some(p));
        let r = report(&d, &f);
        assert!(categories(&r).contains(&IssueCategory::Acidity));
    }

    #[test]
    fn test_penalties_add_up() {
        let mut d = neutral_dough();
        d.ph = 8.0;
        let mut f = neutral_filling();
        f.water_activity.aw = 0.6;
        f.sweetness.percentage = 70.0;
        f.stability.score = 30.0;
        f.ph = Some(Band::new(4.2, 4.8));
        let r = report(&d, &f);
        assert_eq!(
            categories(&r),
            vec![
                IssueCategory::Moisture,
                IssueCategory::Sweetness,
                IssueCategory::Acidity,
                IssueCategory::Structure,
            ]
        );
        assert_eq!(r.score, 30);
        assert_eq!(r.rating, CompatibilityRating::Poor);
        assert_eq!(r.recommendations.len(), 4);
    }

    #[test]
    fn test_rating_bands() {
        assert_eq!(CompatibilityRating::from_score(100), CompatibilityRating::Excellent);
        assert_eq!(CompatibilityRating::from_score(70), CompatibilityRating::Good);
        assert_eq!(CompatibilityRating::from_score(50), CompatibilityRating::Fair);
        assert_eq!(CompatibilityRating::from_score(0), CompatibilityRating::Poor);
    }
}
