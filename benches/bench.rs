// Criterion benchmarks for the NutriSolve recommendation pipeline

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use nutrisolve_algo::core::{filter_by_constraints, Recommender};
use nutrisolve_algo::models::{FoodItem, RecommendRequest, UserProfile};
use nutrisolve_algo::services::artifacts::{
    ArtifactBundle, CategoryEncoder, DecisionTree, FeatureManifest, FeatureSelector,
    NumericScaler, Preprocessor, RandomForest, TreeNode,
};
use nutrisolve_algo::services::catalog::{Catalog, CatalogSource};

fn leaf(counts: [f64; 2]) -> TreeNode {
    TreeNode {
        feature: None,
        threshold: 0.0,
        left: 0,
        right: 0,
        value: Some(counts.to_vec()),
    }
}

fn split(feature: usize, threshold: f64, left: usize, right: usize) -> TreeNode {
    TreeNode {
        feature: Some(feature),
        threshold,
        left,
        right,
        value: None,
    }
}

fn bench_bundle() -> ArtifactBundle {
    let tree = DecisionTree {
        nodes: vec![
            split(0, 15.0, 1, 2),
            split(1, 0.5, 3, 4),
            leaf([1.0, 3.0]),
            leaf([3.0, 1.0]),
            leaf([2.0, 2.0]),
        ],
    };
    ArtifactBundle {
        model: RandomForest {
            version: "bench".to_string(),
            n_features: 2,
            trees: vec![tree.clone(), tree.clone(), tree],
        },
        preprocessor: Preprocessor {
            numeric: NumericScaler {
                features: vec!["protein_g".to_string(), "calories".to_string()],
                mean: vec![0.0, 0.0],
                scale: vec![1.0, 1.0],
            },
            categorical: CategoryEncoder {
                feature: "food_category".to_string(),
                categories: vec!["unknown".to_string()],
            },
            binary: vec!["is_vegan".to_string()],
        },
        selector: FeatureSelector {
            k: 2,
            support: vec![0, 2],
        },
        manifest: FeatureManifest {
            all_features: vec![
                "protein_g".to_string(),
                "calories".to_string(),
                "is_vegan".to_string(),
            ],
            selected_features: vec!["protein_g".to_string(), "is_vegan".to_string()],
        },
    }
}

fn create_food(id: usize) -> FoodItem {
    FoodItem {
        fdc_id: Some(id as u64),
        description: format!("Food {id}"),
        food_category: Some("proteins".to_string()),
        calories: Some(100.0 + (id % 400) as f64),
        protein_g: Some((id % 35) as f64),
        fiber_g: Some((id % 12) as f64),
        sugars_g: Some((id % 20) as f64),
        cost_per_serving: Some(0.5 + (id % 50) as f64 * 0.1),
        is_vegan: Some((id % 2) as u8),
        is_glutenfree: Some((id % 3 == 0) as u8),
        is_nutfree: Some(1),
        ..FoodItem::default()
    }
}

fn create_catalog(size: usize) -> Catalog {
    Catalog {
        foods: (0..size).map(create_food).collect(),
        source: CatalogSource::Processed,
    }
}

fn create_request() -> RecommendRequest {
    RecommendRequest {
        user_profile: UserProfile {
            age: Some(30),
            gender: None,
            primary_goal: Some("Weight Loss".to_string()),
            dietary_restrictions: vec!["vegan".to_string()],
            weekly_budget: Some(75.0),
        },
        query: "healthy dinner".to_string(),
        top_k: 5,
    }
}

fn bench_constraint_filter(c: &mut Criterion) {
    let catalog = create_catalog(1000);
    let request = create_request();

    c.bench_function("constraint_filter_1000", |b| {
        b.iter(|| {
            filter_by_constraints(
                black_box(&catalog.foods),
                black_box(&request.user_profile),
            )
        });
    });
}

fn bench_recommend(c: &mut Criterion) {
    let bundle = bench_bundle();
    let request = create_request();

    let mut group = c.benchmark_group("recommend");

    for catalog_size in [100, 500, 1000].iter() {
        let catalog = create_catalog(*catalog_size);
        let recommender = Recommender::new(&bundle, &catalog);

        group.bench_with_input(
            BenchmarkId::from_parameter(catalog_size),
            catalog_size,
            |b, _| {
                b.iter(|| recommender.recommend(black_box(&request)).unwrap());
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_constraint_filter, bench_recommend);
criterion_main!(benches);
