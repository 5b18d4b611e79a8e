use anyhow::{Context, Result, bail};
use clap::{Args, ValueEnum};
use medovik_core::filling::{FillingPreset, preset};
use medovik_core::{BakingParams, DoughRecipe, FillingRecipe, PanGeometry, PanShape};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf};
use tracing::info;

/// Dough masses in grams. Defaults are the calculator's starting recipe.
#[derive(Args, Debug, Clone)]
pub struct DoughArgs {
    /// Flour (g)
    #[arg(long, default_value_t = 500.0)]
    pub flour: f64,

    /// Butter (g)
    #[arg(long, default_value_t = 120.0)]
    pub butter: f64,

    /// Sugar (g)
    #[arg(long, default_value_t = 200.0)]
    pub sugar: f64,

    /// Honey (g)
    #[arg(long, default_value_t = 100.0)]
    pub honey: f64,

    /// Eggs without shell (g)
    #[arg(long, default_value_t = 95.0)]
    pub eggs: f64,

    /// Baking soda (g)
    #[arg(long, default_value_t = 5.5)]
    pub soda: f64,

    /// Load a profile JSON before applying flag overrides
    #[arg(long)]
    pub profile: Option<PathBuf>,

    /// Save the effective parameters to a profile JSON
    #[arg(long)]
    pub save_profile: Option<PathBuf>,
}

/// Oven settings for one layer.
#[derive(Args, Debug, Clone)]
pub struct BakeArgs {
    /// Oven temperature in °C
    #[arg(long, default_value_t = 180.0)]
    pub temp: f64,

    /// Baking time per layer in minutes
    #[arg(long, default_value_t = 6.0)]
    pub time: f64,

    /// Rolled layer thickness in mm
    #[arg(long, default_value_t = 3.0)]
    pub thickness: f64,
}

/// Pan shape CLI enum mirrors medovik-core (derive for Clap).
#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum ShapeFlag {
    Round,
    Rectangle,
}

impl From<ShapeFlag> for PanShape {
    fn from(s: ShapeFlag) -> Self {
        match s {
            ShapeFlag::Round => PanShape::Round,
            ShapeFlag::Rectangle => PanShape::Rectangle,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct PanArgs {
    /// Pan shape
    #[arg(long, value_enum, default_value_t = ShapeFlag::Round)]
    pub shape: ShapeFlag,

    /// Diameter (round) or length (rectangle) in cm
    #[arg(long, default_value_t = 22.0)]
    pub size: f64,

    /// Width in cm (rectangle only)
    #[arg(long, default_value_t = 0.0)]
    pub width: f64,
}

impl PanArgs {
    pub fn geometry(&self) -> PanGeometry {
        PanGeometry {
            shape: self.shape.into(),
            dim1: self.size,
            dim2: self.width,
        }
    }
}

/// Where a filling recipe comes from.
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct FillingArgs {
    /// Filling preset key (see `medovik filling presets`)
    #[arg(long)]
    pub preset: Option<String>,

    /// Filling recipe JSON: {"ingredient": grams | {"amount": grams}}
    #[arg(long)]
    pub recipe: Option<PathBuf>,
}

impl FillingArgs {
    pub fn resolve(&self) -> Result<(FillingRecipe, Option<&'static FillingPreset>)> {
        if let Some(key) = &self.preset {
            let p = preset(key).with_context(|| format!("Unknown filling preset: {key}"))?;
            return Ok((p.base_recipe(), Some(p)));
        }
        let path = self
            .recipe
            .as_ref()
            .context("Either --preset or --recipe is required")?;
        let txt = fs::read_to_string(path)
            .with_context(|| format!("Failed to read filling recipe: {}", path.display()))?;
        let recipe: FillingRecipe = serde_json::from_str(&txt)
            .with_context(|| format!("Invalid filling recipe JSON: {}", path.display()))?;
        if recipe.is_empty() {
            bail!("Filling recipe has no ingredients: {}", path.display());
        }
        Ok((recipe, None))
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Profile {
    pub dough: DoughRecipe,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baking: Option<BakingParams>,
}

pub fn load_profile(path: &Path) -> Result<Profile> {
    let txt = fs::read_to_string(path)
        .with_context(|| format!("Failed to read profile: {}", path.display()))?;
    serde_json::from_str(&txt).with_context(|| format!("Invalid profile JSON: {}", path.display()))
}

pub fn save_profile(path: &Path, profile: &Profile) -> Result<()> {
    fs::write(path, serde_json::to_string_pretty(profile)?)
        .with_context(|| format!("Failed to save profile: {}", path.display()))?;
    info!("Profile saved to {}", path.display());
    Ok(())
}

/// Effective dough (and oven settings, if the command takes them): the
/// profile is loaded first, then every flag that differs from its default
/// wins. Writes the result back out when `--save-profile` is given.
pub fn resolve_inputs(
    dough: &DoughArgs,
    bake: Option<&BakeArgs>,
) -> Result<(DoughRecipe, Option<BakingParams>)> {
    let mut recipe = DoughRecipe {
        flour: dough.flour,
        butter: dough.butter,
        sugar: dough.sugar,
        honey: dough.honey,
        eggs: dough.eggs,
        soda: dough.soda,
    };
    let mut baking = bake.map(|b| BakingParams::new(b.temp, b.time).with_thickness(b.thickness));

    if let Some(path) = &dough.profile {
        let p = load_profile(path)?;

        let def = DoughRecipe::app_default();
        macro_rules! take {
            ($field:ident) => {
                if recipe.$field == def.$field { p.dough.$field } else { recipe.$field }
            };
        }
        recipe.flour = take!(flour);
        recipe.butter = take!(butter);
        recipe.sugar = take!(sugar);
        recipe.honey = take!(honey);
        recipe.eggs = take!(eggs);
        recipe.soda = take!(soda);

        if let (Some(current), Some(saved)) = (baking.as_mut(), p.baking) {
            let def = BakingParams::new(180.0, 6.0);
            if current.temp == def.temp {
                current.temp = saved.temp;
            }
            if current.time == def.time {
                current.time = saved.time;
            }
            if current.thickness_mm == def.thickness_mm {
                current.thickness_mm = saved.thickness_mm;
            }
        }
    }

    if let Some(b) = &baking {
        if !(b.thickness_mm.is_finite() && b.thickness_mm > 0.0) {
            bail!("Layer thickness must be positive, got {} mm", b.thickness_mm);
        }
        if !(b.time.is_finite() && b.time >= 0.0) {
            bail!("Baking time must not be negative, got {} min", b.time);
        }
    }

    if let Some(path) = &dough.save_profile {
        save_profile(
            path,
            &Profile {
                dough: recipe,
                baking,
            },
        )?;
    }

    Ok((recipe, baking))
}
