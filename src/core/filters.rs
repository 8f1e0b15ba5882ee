use crate::models::{FoodItem, Restriction, UserProfile};

/// Narrow the catalog to items compatible with the user's dietary
/// restrictions and budget.
///
/// An item missing a dietary flag or cost is kept: absence of the column
/// means "no information", not a violation. An empty result is a normal
/// outcome that the caller renders as an empty response.
pub fn filter_by_constraints<'a>(
    foods: &'a [FoodItem],
    profile: &UserProfile,
) -> Vec<&'a FoodItem> {
    let restrictions = profile.restrictions();
    let max_cost = profile.max_cost_per_serving();

    foods
        .iter()
        .filter(|food| passes_restrictions(food, &restrictions) && within_budget(food, max_cost))
        .collect()
}

/// Check the item against every recognized restriction
#[inline]
fn passes_restrictions(food: &FoodItem, restrictions: &[Restriction]) -> bool {
    restrictions.iter().all(|&restriction| {
        // A flag the catalog never recorded cannot disqualify the item
        food.dietary_flag(restriction).map_or(true, |flag| flag == 1)
    })
}

/// Check the item against the per-serving budget cap
#[inline]
fn within_budget(food: &FoodItem, max_cost: f64) -> bool {
    food.cost_per_serving.map_or(true, |cost| cost <= max_cost)
}
