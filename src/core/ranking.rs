use crate::models::{Confidence, MaterializedFood, Nutrition, Recommendation};

/// Item indices ordered by adjusted score descending, truncated to `k`.
///
/// The sort is stable, so equal scores keep the filtered catalog's
/// insertion order; no secondary key is applied.
pub fn rank(scores: &[f64], k: usize) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..scores.len()).collect();
    indices.sort_by(|&a, &b| {
        scores[b]
            .partial_cmp(&scores[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    indices.truncate(k);
    indices
}

/// Assemble the annotated recommendation for one selected item
pub fn build_recommendation(food: &MaterializedFood, score: f64) -> Recommendation {
    Recommendation {
        name: food.name.clone(),
        category: food.food_category.clone(),
        fit_score: score,
        confidence: Confidence::from_score(score),
        nutrition: Nutrition {
            calories: food.calories,
            protein: food.protein_g,
            carbs: food.carbs_g,
            fat: food.fat_g,
            fiber: food.fiber_g,
            sugars: food.sugars_g,
        },
        cost: food.cost_per_serving,
        reasons: reasons_for(food),
        dietary_info: dietary_tags(food),
    }
}

/// Human-readable reasons, tested in fixed order; zero, some, or all may hold
pub fn reasons_for(food: &MaterializedFood) -> Vec<String> {
    let mut reasons = Vec::new();
    if food.protein_g > 15.0 {
        reasons.push(format!("High protein ({:.1}g)", food.protein_g));
    }
    if food.fiber_g > 5.0 {
        reasons.push(format!("High fiber ({:.1}g)", food.fiber_g));
    }
    if food.calories < 200.0 {
        reasons.push(format!("Low calorie ({:.0} kcal)", food.calories));
    }
    if food.sugars_g < 5.0 {
        reasons.push(format!("Low sugar ({:.1}g)", food.sugars_g));
    }
    if food.cost_per_serving < 2.0 {
        reasons.push(format!("Budget-friendly (${:.2})", food.cost_per_serving));
    }
    reasons
}

/// Dietary labels for set flags, in fixed order
pub fn dietary_tags(food: &MaterializedFood) -> Vec<String> {
    let mut tags = Vec::new();
    if food.is_vegan == 1 {
        tags.push("Vegan".to_string());
    }
    if food.is_glutenfree == 1 {
        tags.push("Gluten-free".to_string());
    }
    if food.is_nutfree == 1 {
        tags.push("Nut-free".to_string());
    }
    tags
}
