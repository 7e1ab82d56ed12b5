//! FILENAME: tests/common/mod.rs
//! Fixtures shared by the aggregation-tree integration tests.

#![allow(dead_code)]

use aggregation_tree::{AggregationTree, LabelOrdering, Row};

/// The reference dataset: 16 people tagged by nation, eye colour, hair
/// colour and gender, each carrying an integer payload.
pub struct PeopleFixture;

impl PeopleFixture {
    pub const TOTAL: i64 = 8516;

    /// (nation, eyes, hair, gender, value)
    pub fn data() -> Vec<(&'static str, &'static str, &'static str, &'static str, i64)> {
        vec![
            ("france", "blue", "black", "female", 455),
            ("france", "blue", "black", "male", 549),
            ("france", "green", "black", "male", 857),
            ("france", "green", "blonde", "female", 288),
            ("germany", "blue", "brown", "male", 389),
            ("germany", "brown", "red", "female", 753),
            ("germany", "dark", "black", "male", 468),
            ("germany", "dark", "brown", "female", 103),
            ("germany", "green", "brown", "male", 168),
            ("germany", "green", "red", "female", 750),
            ("germany", "green", "red", "male", 692),
            ("italy", "dark", "black", "female", 148),
            ("spain", "blue", "black", "male", 852),
            ("spain", "brown", "red", "female", 778),
            ("spain", "dark", "black", "male", 907),
            ("spain", "green", "brown", "female", 359),
        ]
    }

    pub fn rows() -> Vec<Row<i64>> {
        Self::data()
            .into_iter()
            .map(|(nation, eyes, hair, gender, value)| person(nation, eyes, hair, gender, value))
            .collect()
    }
}

pub fn person(nation: &str, eyes: &str, hair: &str, gender: &str, value: i64) -> Row<i64> {
    Row::with_value(value)
        .with_label("nation", nation)
        .with_label("eyes", eyes)
        .with_label("hair", hair)
        .with_label("gender", gender)
}

pub fn sum(values: &[i64]) -> i64 {
    values.iter().sum()
}

pub fn mean(values: &[i64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<i64>() as f64 / values.len() as f64
}

pub fn nation_eyes_hair() -> LabelOrdering {
    LabelOrdering::new(["nation", "eyes", "hair"]).unwrap()
}

/// Sum tree over nation -> eyes -> hair holding the reference dataset.
pub fn sum_tree() -> AggregationTree<i64, i64> {
    AggregationTree::with_rows(PeopleFixture::rows(), sum, nation_eyes_hair()).unwrap()
}

pub fn mean_tree() -> AggregationTree<i64, f64> {
    AggregationTree::with_rows(PeopleFixture::rows(), mean, nation_eyes_hair()).unwrap()
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}
