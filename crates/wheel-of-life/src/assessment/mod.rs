//! Questionnaire answers and the priority scoring shared by every front-end.

pub mod domain;
pub mod scorer;

pub use domain::{
    AssessmentInput, Category, Rating, RatingError, Ratings, UnknownCategory, DEFAULT_RATING,
};
pub use scorer::{score, ScoredCategory, ScoredResult};
