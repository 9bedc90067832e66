use super::domain::{AssessmentInput, Category, Rating};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Derived scores for a single category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredCategory {
    pub category: Category,
    pub label: &'static str,
    pub satisfaction: u8,
    pub motivation: u8,
    /// `10 - satisfaction`, in 0..=9.
    pub improvement: u8,
    /// `improvement * motivation`, in 0..=90.
    pub priority: u8,
}

impl ScoredCategory {
    fn from_ratings(category: Category, satisfaction: Rating, motivation: Rating) -> Self {
        let satisfaction = satisfaction.value();
        let motivation = motivation.value();
        let improvement = Rating::MAX - satisfaction;

        Self {
            category,
            label: category.label(),
            satisfaction,
            motivation,
            improvement,
            priority: improvement * motivation,
        }
    }
}

/// Immutable output of [`score`], handed to renderers and the mail composer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredResult {
    satisfaction: BTreeMap<Category, u8>,
    motivation: BTreeMap<Category, u8>,
    improvement: BTreeMap<Category, u8>,
    priority: BTreeMap<Category, u8>,
    priority_ranked: Vec<ScoredCategory>,
}

impl ScoredResult {
    /// Every category, highest priority first.
    pub fn ranked(&self) -> &[ScoredCategory] {
        &self.priority_ranked
    }

    /// The first `count` ranked categories (fewer if `count` exceeds eight).
    pub fn top(&self, count: usize) -> &[ScoredCategory] {
        let end = count.min(self.priority_ranked.len());
        &self.priority_ranked[..end]
    }

    pub fn highest_priority(&self) -> Option<&ScoredCategory> {
        self.priority_ranked.first()
    }

    pub fn satisfaction(&self) -> &BTreeMap<Category, u8> {
        &self.satisfaction
    }

    pub fn motivation(&self) -> &BTreeMap<Category, u8> {
        &self.motivation
    }

    pub fn improvement(&self) -> &BTreeMap<Category, u8> {
        &self.improvement
    }

    pub fn priority(&self) -> &BTreeMap<Category, u8> {
        &self.priority
    }

    pub fn get(&self, category: Category) -> Option<&ScoredCategory> {
        self.priority_ranked
            .iter()
            .find(|entry| entry.category == category)
    }
}

/// Score an assessment. Missing ratings count as [`super::DEFAULT_RATING`].
///
/// Ranking is by priority descending; equal priorities keep the order of
/// [`Category::ordered`].
pub fn score(input: &AssessmentInput) -> ScoredResult {
    let mut satisfaction = BTreeMap::new();
    let mut motivation = BTreeMap::new();
    let mut improvement = BTreeMap::new();
    let mut priority = BTreeMap::new();

    let mut priority_ranked: Vec<ScoredCategory> = Category::ordered()
        .into_iter()
        .map(|category| {
            let entry = ScoredCategory::from_ratings(
                category,
                input.satisfaction_for(category),
                input.motivation_for(category),
            );
            satisfaction.insert(category, entry.satisfaction);
            motivation.insert(category, entry.motivation);
            improvement.insert(category, entry.improvement);
            priority.insert(category, entry.priority);
            entry
        })
        .collect();

    priority_ranked.sort_unstable_by(rank_order);

    ScoredResult {
        satisfaction,
        motivation,
        improvement,
        priority,
        priority_ranked,
    }
}

fn rank_order(left: &ScoredCategory, right: &ScoredCategory) -> Ordering {
    right
        .priority
        .cmp(&left.priority)
        .then_with(|| left.category.position().cmp(&right.category.position()))
}
