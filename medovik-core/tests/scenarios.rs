use approx::assert_relative_eq;
use medovik_core::baking::LayerColor;
use medovik_core::filling::{adjust_filling, analyze_filling, preset, sweetness_index};
use medovik_core::scaling::{calculate_advanced, calculate_filling, calculate_layers};
use medovik_core::texture::TextureBand;
use medovik_core::*;

#[test]
fn ideal_preset_is_fully_optimal() {
    let recipe = DoughRecipe::ideal();
    assert!(validate_recipe(&recipe).valid);

    let analysis = analyze_recipe(&recipe).unwrap().unwrap();
    assert_eq!(analysis.quality_score, 100);
    assert!(analysis.checks.values().all(|s| *s == CheckStatus::Optimal));
    assert!(generate_advice(&analysis).is_empty());
}

#[test]
fn default_recipe_hydration_is_exact_and_ideal() {
    let analysis = analyze_recipe(&DoughRecipe::app_default()).unwrap().unwrap();
    // (95*0.75 + 100*0.18 + 120*0.16) / 500 * 100
    assert_relative_eq!(analysis.hydration, 21.69, epsilon = 1e-9);
    assert_eq!(predict_texture(&analysis).band, TextureBand::Ideal);
}

#[test]
fn analysis_is_deterministic() {
    let recipe = DoughRecipe {
        flour: 480.0,
        butter: 140.0,
        sugar: 90.0,
        honey: 210.0,
        eggs: 150.0,
        soda: 7.0,
    };
    assert_eq!(analyze_recipe(&recipe), analyze_recipe(&recipe));
}

#[test]
fn analysis_serializes_with_camel_case_keys() {
    let analysis = analyze_recipe(&DoughRecipe::ideal()).unwrap().unwrap();
    let json = serde_json::to_value(&analysis).unwrap();
    assert_eq!(json["qualityScore"], 100);
    assert_eq!(json["checks"]["sugars"], "optimal");
    let back: RecipeAnalysis = serde_json::from_value(json).unwrap();
    assert_eq!(back, analysis);
}

#[test]
fn baking_boundary_has_no_browning() {
    let analysis = analyze_recipe(&DoughRecipe::ideal()).unwrap().unwrap();
    let p = simulate_baking(&analysis, BakingParams::new(150.0, 0.0));
    assert_eq!(p.browning_index, 0.0);
    assert_eq!(p.color, LayerColor::Pale);
}

#[test]
fn hot_tempering_is_not_safe() {
    let r = simulate_tempering(&TemperingInput {
        egg_mass: 200.0,
        egg_temp: 20.0,
        liquid_mass: 800.0,
        liquid_temp: 85.0,
        batch_count: 5,
        liquid_breakdown: None,
    });
    assert!(r.max_batch_temp > 65.0);
    assert!(matches!(
        r.safety_status,
        SafetyStatus::Danger | SafetyStatus::Warning
    ));
    let c = r.corrections.unwrap();
    assert!(c.extra_egg_mass > 0.0);
    assert!(c.max_liquid_temp < 85.0);
    assert!(c.max_liquid_mass < 800.0);
}

#[test]
fn target_scaling_round_trip() {
    let analysis = analyze_recipe(&DoughRecipe::app_default()).unwrap().unwrap();
    let n = 7;
    let t = calculate_advanced(&analysis, analysis.total_weight / n as f64, n, 0.0).unwrap();
    assert_relative_eq!(t.scaling_factor, 1.0, epsilon = 1e-12);
    for (ingredient, grams) in analysis.recipe.iter() {
        assert_relative_eq!(t.new_recipe.get(ingredient), grams, epsilon = 1e-9);
    }
}

#[test]
fn empty_filling_is_not_sweetened() {
    let s = sweetness_index(&FillingRecipe::new());
    assert_eq!(s.index, 0.0);
    assert_eq!(s.percentage, 0.0);
    assert_eq!(s.level.arabic_label(), "غير محلى");
}

#[test]
fn full_cake_pipeline() {
    let analysis = analyze_recipe(&DoughRecipe::app_default()).unwrap().unwrap();
    let pan = PanGeometry::round(22.0);
    let layers = calculate_layers(&analysis, &pan, 3.0).unwrap();
    assert!(layers.num_layers >= 1);

    let sour = preset("sour-cream").unwrap();
    let plan = calculate_filling(&pan, layers.num_layers, 5.0, &sour.base_recipe()).unwrap();
    let adjusted = adjust_filling(&sour.base_recipe(), plan.required_weight, 15.0).unwrap();
    assert_relative_eq!(adjusted.recipe.total(), plan.required_weight, epsilon = 1e-6);
    assert!(adjusted.new_sweetness.percentage < adjusted.original_sweetness.percentage);

    let filling = analyze_filling(&adjusted.recipe, Some(sour));
    assert_eq!(filling.preset.as_deref(), Some("sour-cream"));

    let baked = simulate_baking(&analysis, BakingParams::new(180.0, 6.0));
    let dough = estimate_dough_chemistry(&analysis, &baked);
    let report = build_compatibility(Some(&dough), Some(&filling)).unwrap();
    assert!(report.score <= 100);
    assert_eq!(report.recommendations.len(), report.issues.len());
}
