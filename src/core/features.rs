use crate::models::{FoodItem, MaterializedFood};

/// Numeric feature columns, in the order the offline transform was fitted on
pub const NUMERIC_FEATURES: [&str; 18] = [
    "calories",
    "protein_g",
    "fat_g",
    "carbs_g",
    "fiber_g",
    "sugars_g",
    "sodium_mg",
    "vitamin_a_iu",
    "vitamin_c_mg",
    "calcium_mg",
    "iron_mg",
    "potassium_mg",
    "magnesium_mg",
    "zinc_mg",
    "phosphorus_mg",
    "cost_per_serving",
    "nutrient_density",
    "sugar_to_carb_ratio",
];

/// The single categorical feature, one-hot encoded by the transform
pub const CATEGORICAL_FEATURE: &str = "food_category";

/// Binary dietary flags, passed through the transform unscaled
pub const BINARY_FEATURES: [&str; 3] = ["is_glutenfree", "is_nutfree", "is_vegan"];

/// Materialize a filtered catalog into fully-populated scoring rows.
///
/// Missing numerics are zero-filled, except the two derived features which
/// are computed from their (already defaulted) inputs when the catalog does
/// not carry them. A missing category becomes "unknown" and missing flags
/// become 0. Accepts an empty slice and returns an empty vec.
pub fn materialize(foods: &[&FoodItem]) -> Vec<MaterializedFood> {
    foods.iter().map(|food| materialize_one(food)).collect()
}

/// Materialize a single catalog item
pub fn materialize_one(food: &FoodItem) -> MaterializedFood {
    let calories = food.calories.unwrap_or(0.0);
    let protein_g = food.protein_g.unwrap_or(0.0);
    let fat_g = food.fat_g.unwrap_or(0.0);
    let carbs_g = food.carbs_g.unwrap_or(0.0);
    let fiber_g = food.fiber_g.unwrap_or(0.0);
    let sugars_g = food.sugars_g.unwrap_or(0.0);

    // Derived features are computed rather than zero-filled when absent
    let nutrient_density = food
        .nutrient_density
        .unwrap_or_else(|| (protein_g + fiber_g) / (calories + 1.0));
    let sugar_to_carb_ratio = food
        .sugar_to_carb_ratio
        .unwrap_or_else(|| sugars_g / (carbs_g + 1.0));

    MaterializedFood {
        name: food.description.clone(),
        food_category: food
            .food_category
            .clone()
            .unwrap_or_else(|| "unknown".to_string()),
        calories,
        protein_g,
        fat_g,
        carbs_g,
        fiber_g,
        sugars_g,
        sodium_mg: food.sodium_mg.unwrap_or(0.0),
        vitamin_a_iu: food.vitamin_a_iu.unwrap_or(0.0),
        vitamin_c_mg: food.vitamin_c_mg.unwrap_or(0.0),
        calcium_mg: food.calcium_mg.unwrap_or(0.0),
        iron_mg: food.iron_mg.unwrap_or(0.0),
        potassium_mg: food.potassium_mg.unwrap_or(0.0),
        magnesium_mg: food.magnesium_mg.unwrap_or(0.0),
        zinc_mg: food.zinc_mg.unwrap_or(0.0),
        phosphorus_mg: food.phosphorus_mg.unwrap_or(0.0),
        cost_per_serving: food.cost_per_serving.unwrap_or(0.0),
        nutrient_density,
        sugar_to_carb_ratio,
        is_glutenfree: food.is_glutenfree.unwrap_or(0),
        is_nutfree: food.is_nutfree.unwrap_or(0),
        is_vegan: food.is_vegan.unwrap_or(0),
    }
}
