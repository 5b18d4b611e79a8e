use anyhow::Result;
use comfy_table::{Attribute, Cell, ContentArrangement, Table, presets::UTF8_FULL};
use medovik_core::advisor::AdviceCard;
use medovik_core::baking::BakingPrediction;
use medovik_core::compatibility::{CompatibilityReport, DoughChemistry};
use medovik_core::filling::{FillingAdjustment, FillingChemistry, FillingPreset};
use medovik_core::scaling::{FillingPlan, LayerPlan, ReversePlan, TargetScaling};
use medovik_core::tempering::TemperingResult;
use medovik_core::texture::TextureProfile;
use medovik_core::{DoughIngredient, DoughRecipe, FillingRecipe, RecipeAnalysis};
use serde::Serialize;

use crate::store::{Comparison, SavedRecipe};

pub fn fmt_g(x: f64) -> String {
    let v = (x * 10.0).round() / 10.0;
    if (v - v.round()).abs() < 1e-9 {
        format!("{:.0} g", v)
    } else {
        format!("{:.1} g", v)
    }
}

/// Solver results may be unbounded.
fn fmt_limit(x: f64, unit: &str) -> String {
    if x.is_finite() {
        format!("{x:.1} {unit}")
    } else {
        "no limit".to_string()
    }
}

fn table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            headers
                .iter()
                .map(|h| Cell::new(h).add_attribute(Attribute::Bold))
                .collect::<Vec<_>>(),
        );
    table
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_dough(recipe: &DoughRecipe, title: &str) {
    let mut t = table(&["Ingredient", "Amount"]);
    for (ingredient, grams) in recipe.iter() {
        t.add_row(vec![Cell::new(ingredient), Cell::new(fmt_g(grams))]);
    }
    t.add_row(vec![
        Cell::new("Total").add_attribute(Attribute::Bold),
        Cell::new(fmt_g(recipe.total())),
    ]);
    println!("\n=== {title} ===");
    println!("{t}");
}

fn print_filling(recipe: &FillingRecipe, title: &str) {
    let mut t = table(&["Ingredient", "Amount"]);
    for (name, grams) in recipe.iter() {
        t.add_row(vec![Cell::new(name), Cell::new(fmt_g(grams))]);
    }
    t.add_row(vec![
        Cell::new("Total").add_attribute(Attribute::Bold),
        Cell::new(fmt_g(recipe.total())),
    ]);
    println!("\n=== {title} ===");
    println!("{t}");
}

pub fn print_analysis(analysis: &RecipeAnalysis, texture: &TextureProfile, advice: &[AdviceCard]) {
    let p = &analysis.percentages;
    let mut t = table(&["Ingredient", "Amount", "Share"]);
    for (ingredient, grams) in analysis.recipe.iter() {
        let share = match ingredient {
            DoughIngredient::Flour => p.flour,
            DoughIngredient::Butter => p.butter,
            DoughIngredient::Sugar => p.sugar,
            DoughIngredient::Honey => p.honey,
            DoughIngredient::Eggs => p.eggs,
            DoughIngredient::Soda => p.soda,
        };
        t.add_row(vec![
            Cell::new(ingredient),
            Cell::new(fmt_g(grams)),
            Cell::new(format!("{share:.1}%")),
        ]);
    }
    println!("\n=== Composition ({}) ===", fmt_g(analysis.total_weight));
    println!("{t}");

    let mut checks = table(&["Component", "Share", "Status"]);
    for (component, status) in &analysis.checks {
        checks.add_row(vec![
            Cell::new(component.label()),
            Cell::new(format!("{:.2}%", p.of_component(*component))),
            Cell::new(status),
        ]);
    }
    println!("\n=== Ideal ranges ===");
    println!("{checks}");

    println!("\nQuality score: {}/100", analysis.quality_score);
    println!(
        "Hydration:     {:.2}% ({} of liquid)",
        analysis.hydration,
        fmt_g(analysis.liquid_weight)
    );

    println!("\n=== Texture: {} {} ===", texture.indicator, texture.title);
    println!("{}", texture.diagnosis);
    println!("• Touch:      {}", texture.sensory.touch);
    println!("• Appearance: {}", texture.sensory.appearance);
    println!("• Sound:      {}", texture.sensory.sound);
    println!("• Aroma:      {}", texture.sensory.aroma);
    println!("→ Now:        {}", texture.technique.immediate);
    println!("→ Rolling:    {}", texture.technique.working);
    println!("→ Fix:        {}", texture.technique.correction);

    if !advice.is_empty() {
        println!("\n=== Advice ===");
        for card in advice {
            println!(
                "\n{} is {} ({:.2}%, ideal {}-{}%)",
                card.component_name, card.status, card.current_value, card.ideal_range.min, card.ideal_range.max
            );
            println!("  Impact:   {}", card.impact);
            println!("  Solution: {}", card.solution);
            println!("  Why:      {}", card.science);
        }
    }
}

pub fn print_baking(b: &BakingPrediction) {
    let mut t = table(&["Prediction", "Value"]);
    t.add_row(vec![Cell::new("Colour"), Cell::new(format!("{:?}", b.color))]);
    t.add_row(vec![Cell::new("Browning index"), Cell::new(b.browning_index)]);
    t.add_row(vec![Cell::new("Texture"), Cell::new(format!("{:?}", b.texture))]);
    t.add_row(vec![Cell::new("Texture score"), Cell::new(b.texture_score)]);
    t.add_row(vec![
        Cell::new("Moisture loss"),
        Cell::new(format!("{:.1}%", b.moisture_loss)),
    ]);
    println!(
        "\n=== Baking at {:.0}°C for {:.1} min, {:.1} mm ===",
        b.parameters.temp, b.parameters.time, b.parameters.thickness_mm
    );
    println!("{t}");
    println!("• Looks:   {}", b.sensory_predictions.visual);
    println!("• Smells:  {}", b.sensory_predictions.aroma);
    println!("• Feels:   {}", b.sensory_predictions.texture);
    println!("\nRecommendations:");
    for r in &b.recommendations {
        println!("• {r}");
    }
}

pub fn print_tempering(r: &TemperingResult) {
    let mut t = table(&["Batch", "Pour", "Before", "After", "Note"]);
    for b in &r.batches {
        t.add_row(vec![
            Cell::new(b.batch_number),
            Cell::new(format!("{:.0}% ({})", b.percentage, fmt_g(b.batch_mass))),
            Cell::new(format!("{:.1}°C", b.temp_before)),
            Cell::new(format!("{:.1}°C", b.temp_after)),
            Cell::new(format!("{}\n{}", b.sensory_note, b.technique)),
        ]);
    }
    println!("\n=== Tempering (liquid cp {:.2} kJ/kg·K) ===", r.liquid_cp);
    println!("{t}");
    println!("Final temperature: {:.1}°C", r.final_temp);
    println!(
        "Peak:              {:.1}°C (batch {})",
        r.max_batch_temp, r.critical_batch
    );
    println!("Status:            {:?}", r.safety_status);
    println!("→ {}", r.recommendation);

    if let Some(c) = &r.corrections {
        println!("\nTo stay at or below {:.0}°C in a single pour:", c.target_temp);
        println!("• add eggs:          {}", fmt_limit(c.extra_egg_mass, "g"));
        println!("• cool liquid to:    {}", fmt_limit(c.max_liquid_temp, "°C"));
        println!("• or pour at most:   {}", fmt_limit(c.max_liquid_mass, "g"));
    }
}

pub fn print_layer_plan(plan: &LayerPlan) {
    let mut t = table(&["Layers", "Value"]);
    t.add_row(vec![Cell::new("Pan area"), Cell::new(format!("{:.1} cm²", plan.pan_area))]);
    t.add_row(vec![
        Cell::new("Dough density"),
        Cell::new(format!("{:.3} g/cm³", plan.density)),
    ]);
    t.add_row(vec![Cell::new("One layer"), Cell::new(fmt_g(plan.single_layer_weight))]);
    t.add_row(vec![Cell::new("Full layers"), Cell::new(plan.num_layers)]);
    t.add_row(vec![
        Cell::new("Coverage"),
        Cell::new(format!("{:.2} layers", plan.layer_coverage)),
    ]);
    t.add_row(vec![Cell::new("Left over"), Cell::new(fmt_g(plan.remainder_weight))]);
    println!(
        "\n=== {} of dough at {:.1} mm ===",
        fmt_g(plan.total_weight),
        plan.thickness_mm
    );
    println!("{t}");
}

pub fn print_target(s: &TargetScaling) {
    println!(
        "\n{} layers × {} (+{:.0}%) = {} → factor {:.3}",
        s.target_count,
        fmt_g(s.target_layer_weight),
        s.extra_percent,
        fmt_g(s.total_weight),
        s.scaling_factor
    );
    print_dough(&s.new_recipe, "Scaled recipe");
}

pub fn print_reverse(plan: &ReversePlan) {
    println!(
        "\nPan {:.1} cm² → {} layers × {} at {:.1} mm = {}",
        plan.pan_area,
        plan.layer_count,
        fmt_g(plan.single_layer_weight),
        plan.thickness_mm,
        fmt_g(plan.total_weight)
    );
    print_dough(&plan.recipe, "Ideal recipe");
}

pub fn print_filling_plan(plan: &FillingPlan) {
    println!(
        "\n{} filling layers at {:.1} mm need {} (factor {:.3})",
        plan.filling_layers,
        plan.thickness_mm,
        fmt_g(plan.required_weight),
        plan.scale_factor
    );
    print_filling(&plan.recipe, "Scaled filling");
}

pub fn print_adjustment(adj: &FillingAdjustment) {
    print_filling(&adj.recipe, "Adjusted filling");
    println!(
        "Scale factor {:.3}, sweetness cut {:.1}%",
        adj.scale_factor, adj.reduction_applied
    );
    println!(
        "Sweetness: {:.1}% ({}) → {:.1}% ({})",
        adj.original_sweetness.percentage,
        adj.original_sweetness.level.label(),
        adj.new_sweetness.percentage,
        adj.new_sweetness.level.label()
    );
}

pub fn print_filling_chemistry(recipe: &FillingRecipe, chem: &FillingChemistry) {
    print_filling(recipe, "Filling");

    let s = &chem.sweetness;
    let w = &chem.water_activity;
    let mut t = table(&["Property", "Value", "Meaning"]);
    t.add_row(vec![
        Cell::new("Sweetness"),
        Cell::new(format!("{:.1}%", s.percentage)),
        Cell::new(format!("{} ({})", s.level.label(), s.level.arabic_label())),
    ]);
    t.add_row(vec![
        Cell::new("Water activity"),
        Cell::new(format!("{:.3}", w.aw)),
        Cell::new(&w.moisture_transfer),
    ]);
    t.add_row(vec![Cell::new("Maturation"), Cell::new(""), Cell::new(&w.maturation_time)]);
    t.add_row(vec![Cell::new("Shelf life"), Cell::new(""), Cell::new(&w.stability)]);
    t.add_row(vec![Cell::new("Microbial"), Cell::new(""), Cell::new(&w.microbial_safety)]);
    t.add_row(vec![
        Cell::new("Stability"),
        Cell::new(format!("{:.0}/100", chem.stability.score)),
        Cell::new(&chem.stability.recommendation),
    ]);
    if let (Some(v), Some(ph), Some(brix)) = (chem.viscosity, chem.ph, chem.brix) {
        t.add_row(vec![
            Cell::new("Viscosity target"),
            Cell::new(format!("{:.0}-{:.0} mPa·s", v.min, v.max)),
            Cell::new(""),
        ]);
        t.add_row(vec![
            Cell::new("pH target"),
            Cell::new(format!("{:.1}-{:.1}", ph.min, ph.max)),
            Cell::new(""),
        ]);
        t.add_row(vec![
            Cell::new("Brix target"),
            Cell::new(format!("{:.0}-{:.0} °Bx", brix.min, brix.max)),
            Cell::new(""),
        ]);
    }
    println!("\n=== Chemistry ===");
    println!("{t}");

    if !chem.stability.contributions.is_empty() {
        println!("Stability contributions:");
        for c in &chem.stability.contributions {
            println!("• {:<16} {:>5.1}% → {:+.1}", c.ingredient, c.percentage, c.effect);
        }
    }
}

pub fn print_presets(presets: &[FillingPreset]) {
    let mut t = table(&["Key", "Name", "Base recipe", "pH", "Brix", "Serve at"]);
    for p in presets {
        let base = p
            .base_recipe
            .iter()
            .map(|(name, grams)| format!("{name} {}", fmt_g(*grams)))
            .collect::<Vec<_>>()
            .join("\n");
        t.add_row(vec![
            Cell::new(p.key),
            Cell::new(p.name),
            Cell::new(base),
            Cell::new(format!("{:.1}-{:.1}", p.target.ph.min, p.target.ph.max)),
            Cell::new(format!("{:.0}-{:.0}", p.target.brix.min, p.target.brix.max)),
            Cell::new(format!(
                "{:.0}-{:.0}°C",
                p.target.serving_temp.min, p.target.serving_temp.max
            )),
        ]);
    }
    println!("{t}");
}

pub fn print_compatibility(dough: &DoughChemistry, report: &CompatibilityReport) {
    println!(
        "\nBaked layers: aw {:.2}, pH {:.1}, sugars {:.1}%",
        dough.water_activity, dough.ph, dough.sugar_percentage
    );
    println!("Compatibility: {}/100 ({:?})", report.score, report.rating);
    for issue in &report.issues {
        println!("• [{:?}] {} (-{})", issue.category, issue.message, issue.penalty);
        println!("  → {}", issue.recommendation);
    }
}

pub fn print_saved(recipes: &[SavedRecipe]) {
    let mut t = table(&["Id", "Name", "Total", "Score", "Hydration", "Saved"]);
    for r in recipes {
        t.add_row(vec![
            Cell::new(r.id),
            Cell::new(&r.name),
            Cell::new(fmt_g(r.analysis.total_weight)),
            Cell::new(r.analysis.quality_score),
            Cell::new(format!("{:.1}%", r.analysis.hydration)),
            Cell::new(r.created_at.format("%Y-%m-%d %H:%M")),
        ]);
    }
    println!("{t}");
}

pub fn print_comparisons(comparisons: &[Comparison]) {
    let mut t = table(&["Id", "Date", "Filling", "Sweetness", "Stability", "Compat", "Notes"]);
    for c in comparisons {
        t.add_row(vec![
            Cell::new(c.id),
            Cell::new(c.date.format("%Y-%m-%d %H:%M")),
            Cell::new(c.filling_chemistry.preset.as_deref().unwrap_or("custom")),
            Cell::new(format!("{:.1}%", c.filling_chemistry.sweetness.percentage)),
            Cell::new(format!("{:.0}", c.filling_chemistry.stability.score)),
            Cell::new(
                c.compatibility
                    .as_ref()
                    .map(|r| r.score.to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ),
            Cell::new(&c.notes),
        ]);
    }
    println!("{t}");
}
