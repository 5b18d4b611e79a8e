//! Egg tempering: hot honey/butter/sugar syrup is poured onto beaten eggs in
//! batches. Each pour is an adiabatic mix solved by energy balance; the
//! running mixture keeps the egg specific heat.

use crate::constants::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Masses making up the hot liquid, grams. Used for its specific heat.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiquidBreakdown {
    pub butter: f64,
    pub sugar: f64,
    pub honey: f64,
    pub soda: f64,
}

impl LiquidBreakdown {
    pub fn total(&self) -> f64 {
        self.butter + self.sugar + self.honey + self.soda
    }
}

/// Mass-weighted specific heat of the liquid, or the fallback constant
/// when no usable breakdown is given.
pub fn liquid_specific_heat(breakdown: Option<&LiquidBreakdown>) -> f64 {
    match breakdown {
        Some(b) if b.total() > 0.0 => {
            (b.butter * CP_BUTTER + b.sugar * CP_SUGAR + b.honey * CP_HONEY + b.soda * CP_SODA)
                / b.total()
        }
        _ => CP_LIQUID_FALLBACK,
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemperingInput {
    pub egg_mass: f64,
    pub egg_temp: f64,
    pub liquid_mass: f64,
    pub liquid_temp: f64,
    #[serde(default = "default_batches")]
    pub batch_count: u8,
    #[serde(default)]
    pub liquid_breakdown: Option<LiquidBreakdown>,
}

fn default_batches() -> u8 {
    DEFAULT_BATCH_COUNT
}

/// One side of a mix: mass (g), temperature (°C) and specific heat.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ThermalMass {
    pub mass: f64,
    pub temp: f64,
    pub cp: f64,
}

impl ThermalMass {
    pub fn new(mass: f64, temp: f64, cp: f64) -> Self {
        ThermalMass { mass, temp, cp }
    }

    fn capacity(&self) -> f64 {
        self.mass * self.cp
    }
}

/// Temperature after mixing two bodies with no heat loss. With no heat
/// capacity on either side the cold side's temperature is kept.
pub fn mix_temperature(cold: ThermalMass, hot: ThermalMass) -> f64 {
    let capacity = cold.capacity() + hot.capacity();
    if capacity <= 0.0 {
        return cold.temp;
    }
    (cold.capacity() * cold.temp + hot.capacity() * hot.temp) / capacity
}

/// Largest hot mass that can be mixed into `cold` without passing `target`.
/// `INFINITY` when the hot side is not above the target, 0 when the cold
/// side is already at or above it.
pub fn max_hot_mass_for_target(cold: ThermalMass, hot_temp: f64, hot_cp: f64, target: f64) -> f64 {
    if hot_temp <= target {
        return f64::INFINITY;
    }
    if target <= cold.temp || hot_cp <= 0.0 {
        return 0.0;
    }
    cold.capacity() * (target - cold.temp) / (hot_cp * (hot_temp - target))
}

/// Hottest the hot mass may be so the mix stays at `target`.
/// `INFINITY` with no hot mass, 0 when the cold side is already at the target.
pub fn max_hot_temp_for_target(cold: ThermalMass, hot_mass: f64, hot_cp: f64, target: f64) -> f64 {
    if hot_mass <= 0.0 || hot_cp <= 0.0 {
        return f64::INFINITY;
    }
    if target <= cold.temp {
        return 0.0;
    }
    target + cold.capacity() * (target - cold.temp) / (hot_mass * hot_cp)
}

/// Extra egg mass needed so mixing all of `hot` into the eggs stays at
/// `target`. 0 when the liquid is not above the target, `INFINITY` when the
/// eggs themselves are already at or above it.
pub fn needed_egg_increase(eggs: ThermalMass, hot: ThermalMass, target: f64) -> f64 {
    if hot.temp <= target {
        return 0.0;
    }
    if target <= eggs.temp || eggs.cp <= 0.0 {
        return f64::INFINITY;
    }
    let needed = hot.capacity() * (hot.temp - target) / (eggs.cp * (target - eggs.temp));
    (needed - eggs.mass).max(0.0)
}

#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum BatchNote {
    Danger,
    Caution,
    SafeContinue,
    Excellent,
}

impl BatchNote {
    pub fn from_temp(temp: f64) -> Self {
        if temp > BATCH_DANGER_ABOVE {
            BatchNote::Danger
        } else if temp > BATCH_CAUTION_ABOVE {
            BatchNote::Caution
        } else if temp > BATCH_SAFE_ABOVE {
            BatchNote::SafeContinue
        } else {
            BatchNote::Excellent
        }
    }

    pub fn sensory(self) -> &'static str {
        match self {
            BatchNote::Danger => "Eggs start to set: grainy threads appear on the whisk",
            BatchNote::Caution => "Mixture thickens noticeably and steams",
            BatchNote::SafeContinue => "Warm and smooth, slight thickening",
            BatchNote::Excellent => "Silky and fluid, no change in texture",
        }
    }

    pub fn technique(self) -> &'static str {
        match self {
            BatchNote::Danger => "Stop pouring, whisk hard and let the syrup cool before the next batch",
            BatchNote::Caution => "Pour in a thin stream and whisk continuously",
            BatchNote::SafeContinue => "Continue at a steady pace while whisking",
            BatchNote::Excellent => "Pour the batch in one go and whisk",
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TemperingBatch {
    pub batch_number: usize,
    /// Percent of the liquid poured in this batch.
    pub percentage: f64,
    pub batch_mass: f64,
    pub temp_before: f64,
    pub temp_after: f64,
    pub note: BatchNote,
    pub sensory_note: String,
    pub technique: String,
}

#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SafetyStatus {
    Safe,
    Warning,
    Danger,
}

impl SafetyStatus {
    pub fn from_max_temp(max_temp: f64) -> Self {
        if max_temp > TEMPER_DANGER_ABOVE {
            SafetyStatus::Danger
        } else if max_temp > TEMPER_WARNING_ABOVE {
            SafetyStatus::Warning
        } else {
            SafetyStatus::Safe
        }
    }

    pub fn recommendation(self) -> &'static str {
        match self {
            SafetyStatus::Danger => {
                "Coagulation risk: cool the syrup to about 60°C or add more batches before tempering"
            }
            SafetyStatus::Warning => {
                "Close to the setting point: pour slowly and whisk without pause"
            }
            SafetyStatus::Safe => "Safe tempering: the eggs stay below their setting point",
        }
    }
}

/// Quantities that bring a single full pour down to the safe target.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TemperingCorrections {
    pub target_temp: f64,
    pub extra_egg_mass: f64,
    pub max_liquid_temp: f64,
    pub max_liquid_mass: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TemperingResult {
    pub batches: Vec<TemperingBatch>,
    pub final_temp: f64,
    pub max_batch_temp: f64,
    /// 1-based batch that reached `max_batch_temp`; 0 if no batch warmed the eggs.
    pub critical_batch: usize,
    pub safety_status: SafetyStatus,
    pub recommendation: String,
    pub liquid_cp: f64,
    pub corrections: Option<TemperingCorrections>,
}

/// Corrective quantities toward [`TEMPER_SAFE_TARGET`], treating the whole
/// liquid as one pour.
pub fn corrections_for(input: &TemperingInput, liquid_cp: f64) -> TemperingCorrections {
    let eggs = ThermalMass::new(input.egg_mass, input.egg_temp, CP_EGG);
    let hot = ThermalMass::new(input.liquid_mass, input.liquid_temp, liquid_cp);
    TemperingCorrections {
        target_temp: TEMPER_SAFE_TARGET,
        extra_egg_mass: needed_egg_increase(eggs, hot, TEMPER_SAFE_TARGET),
        max_liquid_temp: max_hot_temp_for_target(
            eggs,
            input.liquid_mass,
            liquid_cp,
            TEMPER_SAFE_TARGET,
        ),
        max_liquid_mass: max_hot_mass_for_target(
            eggs,
            input.liquid_temp,
            liquid_cp,
            TEMPER_SAFE_TARGET,
        ),
    }
}

/// Runs the batch-by-batch tempering simulation.
pub fn simulate_tempering(input: &TemperingInput) -> TemperingResult {
    let liquid_cp = liquid_specific_heat(input.liquid_breakdown.as_ref());
    let split = batch_split(input.batch_count);

    let mut current_mass = input.egg_mass;
    let mut current_temp = input.egg_temp;
    let mut max_temp = input.egg_temp;
    let mut critical_batch = 0;
    let mut batches = Vec::with_capacity(split.len());

    for (i, &percentage) in split.iter().enumerate() {
        let batch_mass = percentage / 100.0 * input.liquid_mass;
        let new_temp = mix_temperature(
            ThermalMass::new(current_mass, current_temp, CP_EGG),
            ThermalMass::new(batch_mass, input.liquid_temp, liquid_cp),
        );
        if new_temp > max_temp {
            max_temp = new_temp;
            critical_batch = i + 1;
        }
        let note = BatchNote::from_temp(new_temp);
        batches.push(TemperingBatch {
            batch_number: i + 1,
            percentage,
            batch_mass,
            temp_before: current_temp,
            temp_after: new_temp,
            note,
            sensory_note: note.sensory().to_string(),
            technique: note.technique().to_string(),
        });
        current_mass += batch_mass;
        current_temp = new_temp;
    }

    let safety_status = SafetyStatus::from_max_temp(max_temp);
    let corrections = (safety_status != SafetyStatus::Safe).then(|| corrections_for(input, liquid_cp));
    if safety_status == SafetyStatus::Danger {
        warn!(max_temp, critical_batch, "tempering exceeds egg setting point");
    } else {
        debug!(max_temp, critical_batch, ?safety_status, "simulated tempering");
    }

    TemperingResult {
        batches,
        final_temp: current_temp,
        max_batch_temp: max_temp,
        critical_batch,
        safety_status,
        recommendation: safety_status.recommendation().to_string(),
        liquid_cp,
        corrections,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn input(egg_mass: f64, liquid_mass: f64, liquid_temp: f64, batch_count: u8) -> TemperingInput {
        TemperingInput {
            egg_mass,
            egg_temp: 20.0,
            liquid_mass,
            liquid_temp,
            batch_count,
            liquid_breakdown: None,
        }
    }

    #[test]
    fn test_hot_syrup_is_flagged() {
        let r = simulate_tempering(&input(200.0, 800.0, 85.0, 5));
        assert!(r.max_batch_temp > 65.0);
        assert_ne!(r.safety_status, SafetyStatus::Safe);
        assert_eq!(r.batches.len(), 5);
        assert_eq!(r.critical_batch, 5);
        assert!(r.corrections.is_some());
    }

    #[test]
    fn test_gentle_tempering_is_safe() {
        let r = simulate_tempering(&input(300.0, 300.0, 60.0, 5));
        assert_eq!(r.safety_status, SafetyStatus::Safe);
        assert!(r.corrections.is_none());
        assert!(r.batches.iter().all(|b| b.note == BatchNote::Excellent));
    }

    #[test]
    fn test_batches_chain_temperatures() {
        let r = simulate_tempering(&input(200.0, 400.0, 80.0, 4));
        assert_eq!(r.batches.len(), 4);
        assert_relative_eq!(r.batches[0].temp_before, 20.0);
        for pair in r.batches.windows(2) {
            assert_relative_eq!(pair[1].temp_before, pair[0].temp_after);
        }
        let poured: f64 = r.batches.iter().map(|b| b.batch_mass).sum();
        assert_relative_eq!(poured, 400.0, epsilon = 1e-9);
        assert_relative_eq!(r.final_temp, r.batches[3].temp_after);
    }

    #[test]
    fn test_first_batch_energy_balance() {
        // 15% of 800 g at 85°C into 200 g eggs at 20°C.
        let r = simulate_tempering(&input(200.0, 800.0, 85.0, 5));
        let expected = (200.0 * CP_EGG * 20.0 + 120.0 * CP_LIQUID_FALLBACK * 85.0)
            / (200.0 * CP_EGG + 120.0 * CP_LIQUID_FALLBACK);
        assert_relative_eq!(r.batches[0].temp_after, expected, epsilon = 1e-9);
    }

    #[test]
    fn test_unknown_batch_count_uses_five_batch_split() {
        let r = simulate_tempering(&input(200.0, 400.0, 80.0, 8));
        let pct: Vec<f64> = r.batches.iter().map(|b| b.percentage).collect();
        assert_eq!(pct, vec![15.0, 20.0, 20.0, 20.0, 25.0]);
    }

    #[test]
    fn test_breakdown_specific_heat() {
        let b = LiquidBreakdown {
            butter: 100.0,
            sugar: 100.0,
            honey: 0.0,
            soda: 0.0,
        };
        assert_relative_eq!(liquid_specific_heat(Some(&b)), (CP_BUTTER + CP_SUGAR) / 2.0);
        assert_relative_eq!(
            liquid_specific_heat(Some(&LiquidBreakdown::default())),
            CP_LIQUID_FALLBACK
        );
        assert_relative_eq!(liquid_specific_heat(None), CP_LIQUID_FALLBACK);
    }

    #[test]
    fn test_remedial_solvers_hit_target() {
        let eggs = ThermalMass::new(200.0, 20.0, CP_EGG);
        let cp = 2.5;

        let m = max_hot_mass_for_target(eggs, 90.0, cp, 60.0);
        let mixed = mix_temperature(eggs, ThermalMass::new(m, 90.0, cp));
        assert_relative_eq!(mixed, 60.0, epsilon = 1e-9);

        let t = max_hot_temp_for_target(eggs, 300.0, cp, 60.0);
        let mixed = mix_temperature(eggs, ThermalMass::new(300.0, t, cp));
        assert_relative_eq!(mixed, 60.0, epsilon = 1e-9);

        let hot = ThermalMass::new(800.0, 85.0, cp);
        let extra = needed_egg_increase(eggs, hot, 60.0);
        assert!(extra > 0.0);
        let bigger = ThermalMass::new(200.0 + extra, 20.0, CP_EGG);
        assert_relative_eq!(mix_temperature(bigger, hot), 60.0, epsilon = 1e-9);
    }

    #[test]
    fn test_remedial_solver_guards() {
        let eggs = ThermalMass::new(200.0, 20.0, CP_EGG);
        assert_eq!(max_hot_mass_for_target(eggs, 50.0, 2.5, 60.0), f64::INFINITY);
        assert_eq!(max_hot_mass_for_target(eggs, 90.0, 2.5, 15.0), 0.0);
        assert_eq!(max_hot_temp_for_target(eggs, 0.0, 2.5, 60.0), f64::INFINITY);
        assert_eq!(max_hot_temp_for_target(eggs, 100.0, 2.5, 20.0), 0.0);
        let hot = ThermalMass::new(500.0, 55.0, 2.5);
        assert_eq!(needed_egg_increase(eggs, hot, 60.0), 0.0);
        let warm_eggs = ThermalMass::new(200.0, 70.0, CP_EGG);
        let hotter = ThermalMass::new(500.0, 90.0, 2.5);
        assert_eq!(needed_egg_increase(warm_eggs, hotter, 60.0), f64::INFINITY);
    }

    #[test]
    fn test_no_eggs_no_liquid_keeps_temperature() {
        let r = simulate_tempering(&input(0.0, 0.0, 80.0, 3));
        assert_relative_eq!(r.final_temp, 20.0);
        assert_eq!(r.critical_batch, 0);
        assert_eq!(r.safety_status, SafetyStatus::Safe);
    }
}
