use serde::{Deserialize, Serialize};
use validator::Validate;

/// Weekly budget assumed when the profile does not state one, in dollars.
pub const DEFAULT_WEEKLY_BUDGET: f64 = 100.0;

/// 3 meals/day over 7 days; converts a weekly budget into a per-serving cap.
pub const SERVINGS_PER_WEEK: f64 = 21.0;

/// User profile collected during onboarding
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UserProfile {
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(rename = "primaryGoal", default)]
    pub primary_goal: Option<String>,
    #[serde(rename = "dietaryRestrictions", default)]
    pub dietary_restrictions: Vec<String>,
    #[serde(rename = "weeklyBudget", default)]
    #[validate(range(min = 0.01))]
    pub weekly_budget: Option<f64>,
}

impl UserProfile {
    /// Weekly budget in dollars, defaulting when absent
    pub fn budget(&self) -> f64 {
        self.weekly_budget.unwrap_or(DEFAULT_WEEKLY_BUDGET)
    }

    /// Maximum acceptable cost per serving derived from the weekly budget
    pub fn max_cost_per_serving(&self) -> f64 {
        self.budget() / SERVINGS_PER_WEEK
    }

    /// Primary goal parsed into the adjustment strategy
    pub fn goal(&self) -> Goal {
        Goal::parse(self.primary_goal.as_deref())
    }

    /// Goal label echoed in the response, defaulting when absent
    pub fn goal_label(&self) -> String {
        self.primary_goal
            .clone()
            .unwrap_or_else(|| "General Health".to_string())
    }

    /// Recognized restrictions from the free-form restriction strings.
    /// Unrecognized entries are ignored.
    pub fn restrictions(&self) -> Vec<Restriction> {
        self.dietary_restrictions
            .iter()
            .filter_map(|raw| Restriction::parse(raw))
            .collect()
    }
}

/// A catalog food item as loaded from the durable catalog.
///
/// Every field beyond the display name is optional: the raw source catalog
/// may lack whole columns, and `None` always means "no information" rather
/// than zero. Defaults are applied only at materialization time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FoodItem {
    #[serde(default)]
    pub fdc_id: Option<u64>,
    pub description: String,
    #[serde(default)]
    pub food_category: Option<String>,
    #[serde(default)]
    pub calories: Option<f64>,
    #[serde(default)]
    pub protein_g: Option<f64>,
    #[serde(default)]
    pub fat_g: Option<f64>,
    #[serde(default)]
    pub carbs_g: Option<f64>,
    #[serde(default)]
    pub fiber_g: Option<f64>,
    #[serde(default)]
    pub sugars_g: Option<f64>,
    #[serde(default)]
    pub sodium_mg: Option<f64>,
    #[serde(default)]
    pub vitamin_a_iu: Option<f64>,
    #[serde(default)]
    pub vitamin_c_mg: Option<f64>,
    #[serde(default)]
    pub calcium_mg: Option<f64>,
    #[serde(default)]
    pub iron_mg: Option<f64>,
    #[serde(default)]
    pub potassium_mg: Option<f64>,
    #[serde(default)]
    pub magnesium_mg: Option<f64>,
    #[serde(default)]
    pub zinc_mg: Option<f64>,
    #[serde(default)]
    pub phosphorus_mg: Option<f64>,
    #[serde(default)]
    pub cost_per_serving: Option<f64>,
    #[serde(default)]
    pub is_glutenfree: Option<u8>,
    #[serde(default)]
    pub is_nutfree: Option<u8>,
    #[serde(default)]
    pub is_vegan: Option<u8>,
    #[serde(default)]
    pub nutrient_density: Option<f64>,
    #[serde(default)]
    pub sugar_to_carb_ratio: Option<f64>,
}

impl FoodItem {
    /// The dietary flag matching a restriction, if the catalog carries it
    pub fn dietary_flag(&self, restriction: Restriction) -> Option<u8> {
        match restriction {
            Restriction::Vegan => self.is_vegan,
            Restriction::GlutenFree => self.is_glutenfree,
            Restriction::NutFree => self.is_nutfree,
        }
    }
}

/// A food item with every scoring feature populated.
///
/// Produced by the feature materializer; the only view the inference,
/// adjustment, and ranking stages ever see.
#[derive(Debug, Clone)]
pub struct MaterializedFood {
    pub name: String,
    pub food_category: String,
    pub calories: f64,
    pub protein_g: f64,
    pub fat_g: f64,
    pub carbs_g: f64,
    pub fiber_g: f64,
    pub sugars_g: f64,
    pub sodium_mg: f64,
    pub vitamin_a_iu: f64,
    pub vitamin_c_mg: f64,
    pub calcium_mg: f64,
    pub iron_mg: f64,
    pub potassium_mg: f64,
    pub magnesium_mg: f64,
    pub zinc_mg: f64,
    pub phosphorus_mg: f64,
    pub cost_per_serving: f64,
    pub nutrient_density: f64,
    pub sugar_to_carb_ratio: f64,
    pub is_glutenfree: u8,
    pub is_nutfree: u8,
    pub is_vegan: u8,
}

impl MaterializedFood {
    /// Numeric feature lookup by transform column name
    pub fn numeric(&self, name: &str) -> Option<f64> {
        let value = match name {
            "calories" => self.calories,
            "protein_g" => self.protein_g,
            "fat_g" => self.fat_g,
            "carbs_g" => self.carbs_g,
            "fiber_g" => self.fiber_g,
            "sugars_g" => self.sugars_g,
            "sodium_mg" => self.sodium_mg,
            "vitamin_a_iu" => self.vitamin_a_iu,
            "vitamin_c_mg" => self.vitamin_c_mg,
            "calcium_mg" => self.calcium_mg,
            "iron_mg" => self.iron_mg,
            "potassium_mg" => self.potassium_mg,
            "magnesium_mg" => self.magnesium_mg,
            "zinc_mg" => self.zinc_mg,
            "phosphorus_mg" => self.phosphorus_mg,
            "cost_per_serving" => self.cost_per_serving,
            "nutrient_density" => self.nutrient_density,
            "sugar_to_carb_ratio" => self.sugar_to_carb_ratio,
            _ => return None,
        };
        Some(value)
    }

    /// Binary feature lookup by transform column name
    pub fn binary(&self, name: &str) -> Option<f64> {
        let value = match name {
            "is_glutenfree" => self.is_glutenfree,
            "is_nutfree" => self.is_nutfree,
            "is_vegan" => self.is_vegan,
            _ => return None,
        };
        Some(f64::from(value))
    }
}

/// Primary goal driving probability adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Goal {
    WeightLoss,
    MuscleGain,
    HeartHealth,
    General,
}

impl Goal {
    /// Parse the onboarding goal label. Anything unrecognized (or absent)
    /// falls back to the no-op General variant.
    pub fn parse(label: Option<&str>) -> Self {
        match label {
            Some("Weight Loss") => Goal::WeightLoss,
            Some("Muscle Gain") => Goal::MuscleGain,
            Some("Heart Health") => Goal::HeartHealth,
            _ => Goal::General,
        }
    }
}

/// Recognized dietary restriction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Restriction {
    Vegan,
    GlutenFree,
    NutFree,
}

impl Restriction {
    /// Accepts both the onboarding label and the slug form, case-insensitively
    /// ("Vegan"/"vegan", "Gluten Free"/"gluten-free", "Nut Allergy"/"nut-free").
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_lowercase().as_str() {
            "vegan" => Some(Restriction::Vegan),
            "gluten free" | "gluten-free" => Some(Restriction::GlutenFree),
            "nut allergy" | "nut-free" => Some(Restriction::NutFree),
            _ => None,
        }
    }
}

/// Confidence tier derived from the fit score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Moderate,
}

impl Confidence {
    pub fn from_score(score: f64) -> Self {
        if score > 0.8 {
            Confidence::High
        } else if score > 0.6 {
            Confidence::Medium
        } else {
            Confidence::Moderate
        }
    }
}

/// Nutrition snapshot attached to a recommendation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Nutrition {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub fiber: f64,
    pub sugars: f64,
}

/// A single ranked recommendation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub name: String,
    pub category: String,
    pub fit_score: f64,
    pub confidence: Confidence,
    pub nutrition: Nutrition,
    pub cost: f64,
    pub reasons: Vec<String>,
    pub dietary_info: Vec<String>,
}
