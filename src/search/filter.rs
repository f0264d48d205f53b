use crate::store::{Filter, Pattern, StoreError};

/// Fields a free-text term is matched against.
pub const TEXT_FIELDS: &[&str] = &["title", "tags", "category", "area", "ingredients.name"];

/// Optional filter parameters shared by every listing operation.
#[derive(Debug, Clone, Default)]
pub struct RecipeFilter {
    pub term: Option<String>,
    pub category: Option<String>,
    pub area: Option<String>,
}

impl RecipeFilter {
    /// The search term with surrounding whitespace removed, if any remains.
    pub fn term(&self) -> Option<&str> {
        non_blank(self.term.as_deref())
    }

    /// Build the store predicate: category and area substring matches ANDed
    /// with a term match across [`TEXT_FIELDS`].
    pub fn to_filter(&self) -> Result<Filter, StoreError> {
        let mut parts = Vec::new();

        if let Some(category) = non_blank(self.category.as_deref()) {
            parts.push(Filter::contains("category", Pattern::contains(category)?));
        }
        if let Some(area) = non_blank(self.area.as_deref()) {
            parts.push(Filter::contains("area", Pattern::contains(area)?));
        }
        if let Some(term) = self.term() {
            let pattern = Pattern::contains(term)?;
            parts.push(Filter::Or(
                TEXT_FIELDS
                    .iter()
                    .map(|field| Filter::contains(field, pattern.clone()))
                    .collect(),
            ));
        }

        Ok(match parts.len() {
            0 => Filter::All,
            1 => parts.remove(0),
            _ => Filter::And(parts),
        })
    }
}

/// Category-only predicate used by the random sampler.
pub fn category_filter(category: Option<&str>) -> Result<Filter, StoreError> {
    RecipeFilter {
        category: category.map(str::to_string),
        ..Default::default()
    }
    .to_filter()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}
