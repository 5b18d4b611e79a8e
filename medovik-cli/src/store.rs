//! File-backed storage for saved recipes and dough/filling comparisons.
//! Newest records come first; records are only ever prepended or removed.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use medovik_core::filling::FillingChemistry;
use medovik_core::{BakingParams, CompatibilityReport, DoughChemistry, DoughRecipe, RecipeAnalysis};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedRecipe {
    pub id: i64,
    pub name: String,
    pub analysis: RecipeAnalysis,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparison {
    pub id: i64,
    pub date: DateTime<Utc>,
    pub recipe: DoughRecipe,
    pub baking_params: BakingParams,
    pub dough_chemistry: DoughChemistry,
    pub filling_chemistry: FillingChemistry,
    pub compatibility: Option<CompatibilityReport>,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreData {
    #[serde(default)]
    recipes: Vec<SavedRecipe>,
    #[serde(default)]
    comparisons: Vec<Comparison>,
}

pub struct Store {
    path: PathBuf,
    data: StoreData,
}

impl Store {
    /// Opens the store at `path`; a missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let data = if path.exists() {
            let txt = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read store: {}", path.display()))?;
            serde_json::from_str(&txt)
                .with_context(|| format!("Invalid store JSON: {}", path.display()))?
        } else {
            StoreData::default()
        };
        debug!(path = %path.display(), "opened store");
        Ok(Store { path, data })
    }

    pub fn save(&self) -> Result<()> {
        fs::write(&self.path, serde_json::to_string_pretty(&self.data)?)
            .with_context(|| format!("Failed to write store: {}", self.path.display()))
    }

    /// Creation time in ms, bumped past any id already in use.
    fn next_id(&self, now: DateTime<Utc>) -> i64 {
        let newest = self
            .data
            .recipes
            .iter()
            .map(|r| r.id)
            .chain(self.data.comparisons.iter().map(|c| c.id))
            .max()
            .unwrap_or(i64::MIN);
        now.timestamp_millis().max(newest.saturating_add(1))
    }

    pub fn recipes(&self) -> &[SavedRecipe] {
        &self.data.recipes
    }

    pub fn comparisons(&self) -> &[Comparison] {
        &self.data.comparisons
    }

    pub fn add_recipe(&mut self, name: &str, analysis: RecipeAnalysis) -> &SavedRecipe {
        let now = Utc::now();
        let record = SavedRecipe {
            id: self.next_id(now),
            name: name.to_string(),
            analysis,
            created_at: now,
        };
        self.data.recipes.insert(0, record);
        &self.data.recipes[0]
    }

    /// Removes the recipe with `id`; false if there was none.
    pub fn delete_recipe(&mut self, id: i64) -> bool {
        let before = self.data.recipes.len();
        self.data.recipes.retain(|r| r.id != id);
        self.data.recipes.len() != before
    }

    pub fn add_comparison(
        &mut self,
        recipe: DoughRecipe,
        baking_params: BakingParams,
        dough_chemistry: DoughChemistry,
        filling_chemistry: FillingChemistry,
        compatibility: Option<CompatibilityReport>,
        notes: &str,
    ) -> &Comparison {
        let now = Utc::now();
        let record = Comparison {
            id: self.next_id(now),
            date: now,
            recipe,
            baking_params,
            dough_chemistry,
            filling_chemistry,
            compatibility,
            notes: notes.to_string(),
        };
        self.data.comparisons.insert(0, record);
        &self.data.comparisons[0]
    }

    pub fn delete_comparison(&mut self, id: i64) -> bool {
        let before = self.data.comparisons.len();
        self.data.comparisons.retain(|c| c.id != id);
        self.data.comparisons.len() != before
    }
}
