//! Filling (cream) chemistry, presets and sizing.

pub mod adjust;
pub mod chemistry;
pub mod presets;

pub use adjust::{FillingAdjustment, adjust_filling};
pub use chemistry::{
    FillingChemistry, StabilityLevel, StabilityReport, SugarType, SweetnessIndex, SweetnessLevel,
    WaterActivity, WaterActivityBand, analyze_filling, resolve_sugar_type, stability_score,
    sweetness_index, water_activity,
};
pub use presets::{Band, FillingPreset, PRESETS, TargetProperties, preset};
