use crate::store::{Pattern, ScoreExpr, StoreError};

/// Document field the computed score is written to during aggregation.
pub const SCORE_FIELD: &str = "relevanceScore";

pub const TITLE_WEIGHT: u32 = 10;
pub const CATEGORY_WEIGHT: u32 = 8;
pub const AREA_WEIGHT: u32 = 7;
/// Flat bonus if any tag matches, regardless of how many.
pub const TAG_WEIGHT: u32 = 5;

/// Weighted relevance of a recipe for `term`:
/// title +10, category +8, area +7, any tag +5, +1 per matching ingredient.
///
/// Missing fields simply contribute nothing.
pub fn relevance_expr(term: &str) -> Result<ScoreExpr, StoreError> {
    let pattern = Pattern::contains(term)?;
    Ok(ScoreExpr::new()
        .if_contains("title", &pattern, TITLE_WEIGHT)
        .if_contains("category", &pattern, CATEGORY_WEIGHT)
        .if_contains("area", &pattern, AREA_WEIGHT)
        .if_contains("tags", &pattern, TAG_WEIGHT)
        .count_contains("ingredients.name", &pattern))
}
