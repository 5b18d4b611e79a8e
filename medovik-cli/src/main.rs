mod profile;
mod render;
mod store;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use medovik_core::filling::{PRESETS, adjust_filling, analyze_filling};
use medovik_core::scaling::{calculate_advanced, calculate_filling, calculate_layers, calculate_reverse};
use medovik_core::tempering::LiquidBreakdown;
use medovik_core::{
    DoughRecipe, RecipeAnalysis, TemperingInput, analyze_recipe, build_compatibility,
    estimate_dough_chemistry, generate_advice, predict_texture, simulate_baking,
    simulate_tempering,
};
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use profile::{BakeArgs, DoughArgs, FillingArgs, PanArgs, resolve_inputs};
use store::Store;

#[derive(Parser, Debug)]
#[command(
    name = "medovik",
    about = "Honey cake calculator: dough balance, baking, tempering, scaling and fillings.",
    version
)]
struct Cli {
    /// Print results as JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    /// Store file for saved recipes and comparisons
    #[arg(long, global = true, env = "MEDOVIK_STORE", default_value = "medovik-store.json")]
    store: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Composition, ideal-range checks, hydration, texture and advice
    Analyze {
        #[command(flatten)]
        dough: DoughArgs,
    },
    /// Predict colour, texture and moisture loss of one baked layer
    Bake {
        #[command(flatten)]
        dough: DoughArgs,
        #[command(flatten)]
        bake: BakeArgs,
    },
    /// Pour hot syrup into eggs in batches and track the mix temperature
    Temper(TemperArgs),
    /// Pan and layer scaling
    #[command(subcommand)]
    Scale(ScaleCommand),
    /// Filling presets, chemistry and adjustment
    #[command(subcommand)]
    Filling(FillingCommand),
    /// Rate how well baked layers and a filling go together
    Compat {
        #[command(flatten)]
        dough: DoughArgs,
        #[command(flatten)]
        bake: BakeArgs,
        #[command(flatten)]
        filling: FillingArgs,
    },
    /// Saved dough recipes
    #[command(subcommand)]
    Saved(SavedCommand),
    /// Saved dough/filling comparisons
    #[command(subcommand)]
    Compare(CompareCommand),
}

#[derive(Args, Debug)]
struct TemperArgs {
    /// Egg mass (g)
    #[arg(long, default_value_t = 95.0)]
    egg_mass: f64,

    /// Egg temperature in °C
    #[arg(long, default_value_t = 20.0)]
    egg_temp: f64,

    /// Hot liquid mass (g)
    #[arg(long, default_value_t = 425.0)]
    liquid_mass: f64,

    /// Hot liquid temperature in °C
    #[arg(long, default_value_t = 80.0)]
    liquid_temp: f64,

    /// Number of pours (3, 4, 5 or 6 have dedicated splits)
    #[arg(long, default_value_t = 5)]
    batches: u8,

    /// Butter in the hot liquid (g); with the other breakdown flags sets its heat capacity
    #[arg(long)]
    butter: Option<f64>,

    /// Sugar in the hot liquid (g)
    #[arg(long)]
    sugar: Option<f64>,

    /// Honey in the hot liquid (g)
    #[arg(long)]
    honey: Option<f64>,

    /// Soda in the hot liquid (g)
    #[arg(long)]
    soda: Option<f64>,
}

impl TemperArgs {
    fn input(&self) -> TemperingInput {
        let any = [self.butter, self.sugar, self.honey, self.soda]
            .iter()
            .any(Option::is_some);
        let liquid_breakdown = any.then(|| LiquidBreakdown {
            butter: self.butter.unwrap_or(0.0),
            sugar: self.sugar.unwrap_or(0.0),
            honey: self.honey.unwrap_or(0.0),
            soda: self.soda.unwrap_or(0.0),
        });
        TemperingInput {
            egg_mass: self.egg_mass,
            egg_temp: self.egg_temp,
            liquid_mass: self.liquid_mass,
            liquid_temp: self.liquid_temp,
            batch_count: self.batches,
            liquid_breakdown,
        }
    }
}

#[derive(Subcommand, Debug)]
enum ScaleCommand {
    /// How many layers a recipe rolls out to in a pan
    Forward {
        #[command(flatten)]
        dough: DoughArgs,
        #[command(flatten)]
        pan: PanArgs,
        /// Rolled layer thickness in mm
        #[arg(long, default_value_t = 3.0)]
        thickness: f64,
    },
    /// Scale a recipe to a target layer weight and count
    Target {
        #[command(flatten)]
        dough: DoughArgs,
        /// Weight of one layer (g)
        #[arg(long)]
        layer_weight: f64,
        /// Number of layers
        #[arg(long, default_value_t = 8)]
        count: u32,
        /// Extra dough for trimming, in percent
        #[arg(long, default_value_t = 0.0)]
        extra: f64,
    },
    /// Ideal recipe for a pan, layer count and thickness
    Reverse {
        #[command(flatten)]
        pan: PanArgs,
        /// Number of layers
        #[arg(long, default_value_t = 8)]
        count: u32,
        /// Rolled layer thickness in mm
        #[arg(long, default_value_t = 3.0)]
        thickness: f64,
    },
    /// Filling needed between layers, adjusted for sweetness
    Filling {
        #[command(flatten)]
        pan: PanArgs,
        #[command(flatten)]
        filling: FillingArgs,
        /// Number of cake layers; filling goes between them
        #[arg(long, default_value_t = 8)]
        count: u32,
        /// Filling thickness in mm
        #[arg(long, default_value_t = 5.0)]
        thickness: f64,
        /// Sweetness cut in percent (raised automatically when scaling up)
        #[arg(long, default_value_t = 0.0)]
        reduction: f64,
    },
}

#[derive(Subcommand, Debug)]
enum FillingCommand {
    /// List built-in filling presets
    Presets,
    /// Sweetness, water activity and stability of a filling
    Chemistry {
        #[command(flatten)]
        filling: FillingArgs,
    },
    /// Scale a filling to a weight and cut its sweetness
    Adjust {
        #[command(flatten)]
        filling: FillingArgs,
        /// Target weight (g)
        #[arg(long)]
        weight: f64,
        /// Sweetness cut in percent
        #[arg(long, default_value_t = 0.0)]
        reduction: f64,
    },
}

#[derive(Subcommand, Debug)]
enum SavedCommand {
    /// List saved recipes, newest first
    List,
    /// Analyze a recipe and save it
    Save {
        #[command(flatten)]
        dough: DoughArgs,
        /// Name to save under
        #[arg(long)]
        name: String,
    },
    /// Delete a saved recipe
    Delete {
        #[arg(long)]
        id: i64,
    },
}

#[derive(Subcommand, Debug)]
enum CompareCommand {
    /// List saved comparisons, newest first
    List,
    /// Bake, analyze a filling and save the pairing
    Save {
        #[command(flatten)]
        dough: DoughArgs,
        #[command(flatten)]
        bake: BakeArgs,
        #[command(flatten)]
        filling: FillingArgs,
        /// Free-form notes
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// Delete a saved comparison
    Delete {
        #[arg(long)]
        id: i64,
    },
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "medovik=info,medovik_core=warn".into()),
        )
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn analyze(recipe: &DoughRecipe) -> Result<RecipeAnalysis> {
    match analyze_recipe(recipe)? {
        Some(analysis) => Ok(analysis),
        None => bail!("Recipe is empty: total weight must be positive"),
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    debug!(?cli, "parsed arguments");

    match cli.command {
        Command::Analyze { dough } => {
            let (recipe, _) = resolve_inputs(&dough, None)?;
            let analysis = analyze(&recipe)?;
            let texture = predict_texture(&analysis);
            let advice = generate_advice(&analysis);
            if cli.json {
                render::print_json(&json!({
                    "analysis": analysis,
                    "texture": texture,
                    "advice": advice,
                }))?;
            } else {
                render::print_analysis(&analysis, texture, &advice);
            }
        }
        Command::Bake { dough, bake } => {
            let (recipe, params) = resolve_inputs(&dough, Some(&bake))?;
            let params = params.context("Baking parameters missing")?;
            let analysis = analyze(&recipe)?;
            let prediction = simulate_baking(&analysis, params);
            if cli.json {
                render::print_json(&prediction)?;
            } else {
                render::print_baking(&prediction);
            }
        }
        Command::Temper(args) => {
            let result = simulate_tempering(&args.input());
            if cli.json {
                render::print_json(&result)?;
            } else {
                render::print_tempering(&result);
            }
        }
        Command::Scale(cmd) => run_scale(cmd, cli.json)?,
        Command::Filling(cmd) => run_filling(cmd, cli.json)?,
        Command::Compat {
            dough,
            bake,
            filling,
        } => {
            let (recipe, params) = resolve_inputs(&dough, Some(&bake))?;
            let params = params.context("Baking parameters missing")?;
            let analysis = analyze(&recipe)?;
            let baked = simulate_baking(&analysis, params);
            let dough_chem = estimate_dough_chemistry(&analysis, &baked);
            let (filling_recipe, preset) = filling.resolve()?;
            let filling_chem = analyze_filling(&filling_recipe, preset);
            let report = build_compatibility(Some(&dough_chem), Some(&filling_chem))
                .context("Compatibility needs both dough and filling")?;
            if cli.json {
                render::print_json(&json!({
                    "dough": dough_chem,
                    "filling": filling_chem,
                    "compatibility": report,
                }))?;
            } else {
                render::print_compatibility(&dough_chem, &report);
            }
        }
        Command::Saved(cmd) => run_saved(cmd, &cli.store, cli.json)?,
        Command::Compare(cmd) => run_compare(cmd, &cli.store, cli.json)?,
    }
    Ok(())
}

fn run_scale(cmd: ScaleCommand, as_json: bool) -> Result<()> {
    match cmd {
        ScaleCommand::Forward {
            dough,
            pan,
            thickness,
        } => {
            let (recipe, _) = resolve_inputs(&dough, None)?;
            let analysis = analyze(&recipe)?;
            let plan = calculate_layers(&analysis, &pan.geometry(), thickness)
                .context("Pan area and thickness must be positive")?;
            if as_json {
                render::print_json(&plan)?;
            } else {
                render::print_layer_plan(&plan);
            }
        }
        ScaleCommand::Target {
            dough,
            layer_weight,
            count,
            extra,
        } => {
            let (recipe, _) = resolve_inputs(&dough, None)?;
            let analysis = analyze(&recipe)?;
            let scaled = calculate_advanced(&analysis, layer_weight, count, extra)
                .context("Layer weight and count must be positive and extra must not be negative")?;
            if as_json {
                render::print_json(&scaled)?;
            } else {
                render::print_target(&scaled);
            }
        }
        ScaleCommand::Reverse {
            pan,
            count,
            thickness,
        } => {
            let plan = calculate_reverse(&pan.geometry(), count, thickness)
                .context("Pan area, layer count and thickness must be positive")?;
            if as_json {
                render::print_json(&plan)?;
            } else {
                render::print_reverse(&plan);
            }
        }
        ScaleCommand::Filling {
            pan,
            filling,
            count,
            thickness,
            reduction,
        } => {
            let (base, _) = filling.resolve()?;
            let plan = calculate_filling(&pan.geometry(), count, thickness, &base)
                .context("Filling recipe must not be empty and the pan must have an area")?;
            let adjusted = adjust_filling(&base, plan.required_weight, reduction)
                .context("Filling recipe has no weight to scale")?;
            if as_json {
                render::print_json(&json!({ "plan": plan, "adjusted": adjusted }))?;
            } else {
                render::print_filling_plan(&plan);
                render::print_adjustment(&adjusted);
            }
        }
    }
    Ok(())
}

fn run_filling(cmd: FillingCommand, as_json: bool) -> Result<()> {
    match cmd {
        FillingCommand::Presets => {
            if as_json {
                render::print_json(&PRESETS)?;
            } else {
                render::print_presets(&PRESETS);
            }
        }
        FillingCommand::Chemistry { filling } => {
            let (recipe, preset) = filling.resolve()?;
            let chem = analyze_filling(&recipe, preset);
            if as_json {
                render::print_json(&chem)?;
            } else {
                render::print_filling_chemistry(&recipe, &chem);
            }
        }
        FillingCommand::Adjust {
            filling,
            weight,
            reduction,
        } => {
            let (recipe, _) = filling.resolve()?;
            let adjusted = adjust_filling(&recipe, weight, reduction)
                .context("Filling recipe must not be empty and the weight must be positive")?;
            if as_json {
                render::print_json(&adjusted)?;
            } else {
                render::print_adjustment(&adjusted);
            }
        }
    }
    Ok(())
}

fn run_saved(cmd: SavedCommand, path: &Path, as_json: bool) -> Result<()> {
    let mut store = Store::open(path)?;
    match cmd {
        SavedCommand::List => {
            if as_json {
                render::print_json(&store.recipes())?;
            } else {
                render::print_saved(store.recipes());
            }
        }
        SavedCommand::Save { dough, name } => {
            let (recipe, _) = resolve_inputs(&dough, None)?;
            let analysis = analyze(&recipe)?;
            let id = store.add_recipe(&name, analysis).id;
            store.save()?;
            info!(id, %name, "recipe saved");
            println!("Saved recipe {id}");
        }
        SavedCommand::Delete { id } => {
            if !store.delete_recipe(id) {
                bail!("No saved recipe with id {id}");
            }
            store.save()?;
            println!("Deleted recipe {id}");
        }
    }
    Ok(())
}

fn run_compare(cmd: CompareCommand, path: &Path, as_json: bool) -> Result<()> {
    let mut store = Store::open(path)?;
    match cmd {
        CompareCommand::List => {
            if as_json {
                render::print_json(&store.comparisons())?;
            } else {
                render::print_comparisons(store.comparisons());
            }
        }
        CompareCommand::Save {
            dough,
            bake,
            filling,
            notes,
        } => {
            let (recipe, params) = resolve_inputs(&dough, Some(&bake))?;
            let params = params.context("Baking parameters missing")?;
            let analysis = analyze(&recipe)?;
            let baked = simulate_baking(&analysis, params);
            let dough_chem = estimate_dough_chemistry(&analysis, &baked);
            let (filling_recipe, preset) = filling.resolve()?;
            let filling_chem = analyze_filling(&filling_recipe, preset);
            let compat = build_compatibility(Some(&dough_chem), Some(&filling_chem));
            let id = store
                .add_comparison(recipe, params, dough_chem, filling_chem, compat, &notes)
                .id;
            store.save()?;
            info!(id, "comparison saved");
            println!("Saved comparison {id}");
        }
        CompareCommand::Delete { id } => {
            if !store.delete_comparison(id) {
                bail!("No saved comparison with id {id}");
            }
            store.save()?;
            println!("Deleted comparison {id}");
        }
    }
    Ok(())
}
