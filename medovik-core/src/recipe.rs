use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Open ingredient-name to grams map. Used where unknown keys must be
/// tolerated (density, fillings).
pub type IngredientMass = BTreeMap<String, f64>;

/// Closed set of dough ingredients.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DoughIngredient {
    Flour,
    Butter,
    Sugar,
    Honey,
    Eggs,
    Soda,
}

impl DoughIngredient {
    pub const ALL: [DoughIngredient; 6] = [
        DoughIngredient::Flour,
        DoughIngredient::Butter,
        DoughIngredient::Sugar,
        DoughIngredient::Honey,
        DoughIngredient::Eggs,
        DoughIngredient::Soda,
    ];

    pub fn key(self) -> &'static str {
        match self {
            DoughIngredient::Flour => "flour",
            DoughIngredient::Butter => "butter",
            DoughIngredient::Sugar => "sugar",
            DoughIngredient::Honey => "honey",
            DoughIngredient::Eggs => "eggs",
            DoughIngredient::Soda => "soda",
        }
    }
}

impl std::fmt::Display for DoughIngredient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Dough masses in grams.
///
/// Fields may hold any `f64` (including NaN) until the validator has
/// looked at them; the analyzer refuses anything the validator rejects.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DoughRecipe {
    pub flour: f64,
    pub butter: f64,
    pub sugar: f64,
    pub honey: f64,
    pub eggs: f64,
    pub soda: f64,
}

impl DoughRecipe {
    /// Reference formulation: every ranged component sits inside its band.
    pub fn ideal() -> Self {
        DoughRecipe {
            flour: 500.0,
            butter: 120.0,
            sugar: 155.0,
            honey: 150.0,
            eggs: 95.0,
            soda: 5.5,
        }
    }

    /// The formulation the calculator starts from.
    pub fn app_default() -> Self {
        DoughRecipe {
            flour: 500.0,
            butter: 120.0,
            sugar: 200.0,
            honey: 100.0,
            eggs: 95.0,
            soda: 5.5,
        }
    }

    pub fn get(&self, ingredient: DoughIngredient) -> f64 {
        match ingredient {
            DoughIngredient::Flour => self.flour,
            DoughIngredient::Butter => self.butter,
            DoughIngredient::Sugar => self.sugar,
            DoughIngredient::Honey => self.honey,
            DoughIngredient::Eggs => self.eggs,
            DoughIngredient::Soda => self.soda,
        }
    }

    pub fn set(&mut self, ingredient: DoughIngredient, grams: f64) {
        match ingredient {
            DoughIngredient::Flour => self.flour = grams,
            DoughIngredient::Butter => self.butter = grams,
            DoughIngredient::Sugar => self.sugar = grams,
            DoughIngredient::Honey => self.honey = grams,
            DoughIngredient::Eggs => self.eggs = grams,
            DoughIngredient::Soda => self.soda = grams,
        }
    }

    /// Ingredients in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (DoughIngredient, f64)> + '_ {
        DoughIngredient::ALL.into_iter().map(|i| (i, self.get(i)))
    }

    pub fn total(&self) -> f64 {
        self.iter().map(|(_, g)| g).sum()
    }

    /// Every ingredient multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        let mut out = *self;
        for (ingredient, grams) in self.iter() {
            out.set(ingredient, grams * factor);
        }
        out
    }

    pub fn to_mass_map(&self) -> IngredientMass {
        self.iter().map(|(i, g)| (i.key().to_string(), g)).collect()
    }
}

/// The five components that are checked against ideal percentage bands.
/// Declaration order is the reporting order.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Component {
    Flour,
    Butter,
    Sugars,
    Eggs,
    Soda,
}

impl Component {
    pub const ALL: [Component; 5] = [
        Component::Flour,
        Component::Butter,
        Component::Sugars,
        Component::Eggs,
        Component::Soda,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Component::Flour => "Flour",
            Component::Butter => "Butter",
            Component::Sugars => "Sugars (sugar + honey)",
            Component::Eggs => "Eggs",
            Component::Soda => "Baking soda",
        }
    }
}

#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Low,
    Optimal,
    High,
}

impl std::fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckStatus::Low => write!(f, "low"),
            CheckStatus::Optimal => write!(f, "optimal"),
            CheckStatus::High => write!(f, "high"),
        }
    }
}

/// A filling ingredient amount as it may arrive from a saved file:
/// either bare grams or an object carrying an `amount` plus metadata.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IngredientEntry {
    Grams(f64),
    Detailed {
        amount: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        unit: Option<String>,
    },
}

/// Grams held by an entry. Negative and non-finite amounts read as 0.
pub fn amount_of(entry: &IngredientEntry) -> f64 {
    let raw = match entry {
        IngredientEntry::Grams(g) => *g,
        IngredientEntry::Detailed { amount, .. } => *amount,
    };
    if raw.is_finite() && raw > 0.0 { raw } else { 0.0 }
}

/// Canonical form of an ingredient name: trimmed, lowercase, words joined by `-`.
pub fn normalize_key(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '_' || c == '-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Filling ingredient masses in grams, keyed by normalized ingredient name.
///
/// The key set is open: names missing from the lookup tables are kept and
/// contribute mass but no chemistry.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, IngredientEntry>")]
pub struct FillingRecipe(BTreeMap<String, f64>);

impl FillingRecipe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs(pairs: &[(&str, f64)]) -> Self {
        pairs.iter().map(|(k, g)| (k.to_string(), *g)).collect()
    }

    /// Adds `grams` to whatever the ingredient already holds.
    pub fn add(&mut self, name: &str, grams: f64) {
        *self.0.entry(normalize_key(name)).or_insert(0.0) += grams;
    }

    pub fn insert(&mut self, name: &str, grams: f64) {
        self.0.insert(normalize_key(name), grams);
    }

    pub fn get(&self, name: &str) -> f64 {
        self.0.get(&normalize_key(name)).copied().unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.0.iter().map(|(k, g)| (k.as_str(), *g))
    }

    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<BTreeMap<String, IngredientEntry>> for FillingRecipe {
    fn from(raw: BTreeMap<String, IngredientEntry>) -> Self {
        let mut recipe = FillingRecipe::new();
        for (name, entry) in &raw {
            recipe.add(name, amount_of(entry));
        }
        recipe
    }
}

impl FromIterator<(String, f64)> for FillingRecipe {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        let mut recipe = FillingRecipe::new();
        for (name, grams) in iter {
            recipe.add(&name, grams);
        }
        recipe
    }
}
