use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Life areas rated by the assessment, declared in presentation order.
///
/// The derived `Ord` follows declaration order, so maps keyed by category
/// iterate in the same order the questionnaire asks about them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Health,
    Relationships,
    Romance,
    Personal,
    Fun,
    Community,
    Career,
    Finances,
}

impl Category {
    pub const COUNT: usize = 8;

    pub const fn ordered() -> [Self; Self::COUNT] {
        [
            Self::Health,
            Self::Relationships,
            Self::Romance,
            Self::Personal,
            Self::Fun,
            Self::Community,
            Self::Career,
            Self::Finances,
        ]
    }

    /// Zero-based index within [`Category::ordered`].
    pub const fn position(self) -> usize {
        self as usize
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Health => "health",
            Self::Relationships => "relationships",
            Self::Romance => "romance",
            Self::Personal => "personal",
            Self::Fun => "fun",
            Self::Community => "community",
            Self::Career => "career",
            Self::Finances => "finances",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Health => "Health & Fitness",
            Self::Relationships => "Family & Friends",
            Self::Romance => "Romance",
            Self::Personal => "Personal Growth",
            Self::Fun => "Fun & Recreation",
            Self::Community => "Community & Contribution",
            Self::Career => "Career",
            Self::Finances => "Finances",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ordered()
            .into_iter()
            .find(|category| category.key() == normalized)
            .ok_or_else(|| UnknownCategory(value.trim().to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category '{0}'")]
pub struct UnknownCategory(pub String);

/// A self-reported score on the inclusive 1-10 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    pub fn new(value: u8) -> Result<Self, RatingError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(RatingError::OutOfRange {
                value: i64::from(value),
            })
        }
    }

    pub const fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = RatingError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl FromStr for Rating {
    type Err = RatingError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let parsed: i64 = value
            .trim()
            .parse()
            .map_err(|_| RatingError::NotAnInteger(value.trim().to_string()))?;
        let narrowed = u8::try_from(parsed).map_err(|_| RatingError::OutOfRange { value: parsed })?;
        Self::new(narrowed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RatingError {
    #[error("rating {value} is outside the allowed range 1-10")]
    OutOfRange { value: i64 },
    #[error("rating '{0}' is not a whole number")]
    NotAnInteger(String),
}

/// Rating assumed for any category the subject left unanswered: lowest
/// satisfaction, lowest motivation.
pub const DEFAULT_RATING: Rating = Rating(Rating::MIN);

pub type Ratings = BTreeMap<Category, Rating>;

/// Raw questionnaire answers. Either map may omit categories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssessmentInput {
    pub satisfaction: Ratings,
    pub motivation: Ratings,
}

impl AssessmentInput {
    pub fn new(satisfaction: Ratings, motivation: Ratings) -> Self {
        Self {
            satisfaction,
            motivation,
        }
    }

    pub fn with_satisfaction(mut self, category: Category, rating: Rating) -> Self {
        self.satisfaction.insert(category, rating);
        self
    }

    pub fn with_motivation(mut self, category: Category, rating: Rating) -> Self {
        self.motivation.insert(category, rating);
        self
    }

    /// Satisfaction for `category`, falling back to [`DEFAULT_RATING`].
    pub fn satisfaction_for(&self, category: Category) -> Rating {
        self.satisfaction
            .get(&category)
            .copied()
            .unwrap_or(DEFAULT_RATING)
    }

    /// Motivation for `category`, falling back to [`DEFAULT_RATING`].
    pub fn motivation_for(&self, category: Category) -> Rating {
        self.motivation
            .get(&category)
            .copied()
            .unwrap_or(DEFAULT_RATING)
    }
}
