use regex::{Regex, RegexBuilder};
use serde_json::Value;

use super::StoreError;

/// Case-insensitive substring matcher.
///
/// The needle is escaped before compilation, so user input never acts as a
/// regular expression: `"a.b"` only matches the literal text `a.b`.
#[derive(Debug, Clone)]
pub struct Pattern {
    regex: Regex,
}

impl Pattern {
    pub fn contains(needle: &str) -> Result<Self, StoreError> {
        let regex = RegexBuilder::new(&regex::escape(needle))
            .case_insensitive(true)
            .build()
            .map_err(|e| StoreError::InvalidPattern(e.to_string()))?;
        Ok(Self { regex })
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// True if any string among `values` matches. Non-string values never match.
    fn matches_any(&self, values: &[&Value]) -> bool {
        values
            .iter()
            .any(|v| v.as_str().is_some_and(|s| self.is_match(s)))
    }
}

/// A predicate over stored documents.
#[derive(Debug, Clone)]
pub enum Filter {
    All,
    Contains { path: String, pattern: Pattern },
    Equals { path: String, value: Value },
    And(Vec<Filter>),
    Or(Vec<Filter>),
}

impl Filter {
    pub fn contains(path: &str, pattern: Pattern) -> Self {
        Filter::Contains {
            path: path.to_string(),
            pattern,
        }
    }

    pub fn equals(path: &str, value: Value) -> Self {
        Filter::Equals {
            path: path.to_string(),
            value,
        }
    }

    pub fn matches(&self, doc: &Value) -> bool {
        match self {
            Filter::All => true,
            Filter::Contains { path, pattern } => pattern.matches_any(&resolve_path(doc, path)),
            Filter::Equals { path, value } => resolve_path(doc, path).iter().any(|v| *v == value),
            Filter::And(parts) => parts.iter().all(|f| f.matches(doc)),
            Filter::Or(parts) => parts.iter().any(|f| f.matches(doc)),
        }
    }
}

/// One weighted term of a computed score.
#[derive(Debug, Clone)]
pub enum ScoreTerm {
    /// Adds `weight` once if any value at `path` matches.
    IfContains {
        path: String,
        pattern: Pattern,
        weight: u32,
    },
    /// Adds 1 per value at `path` that matches.
    CountContains { path: String, pattern: Pattern },
}

/// Sum of score terms, evaluated per document inside an aggregation.
#[derive(Debug, Clone, Default)]
pub struct ScoreExpr {
    terms: Vec<ScoreTerm>,
}

impl ScoreExpr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn if_contains(mut self, path: &str, pattern: &Pattern, weight: u32) -> Self {
        self.terms.push(ScoreTerm::IfContains {
            path: path.to_string(),
            pattern: pattern.clone(),
            weight,
        });
        self
    }

    pub fn count_contains(mut self, path: &str, pattern: &Pattern) -> Self {
        self.terms.push(ScoreTerm::CountContains {
            path: path.to_string(),
            pattern: pattern.clone(),
        });
        self
    }

    pub fn evaluate(&self, doc: &Value) -> u32 {
        self.terms
            .iter()
            .map(|term| match term {
                ScoreTerm::IfContains {
                    path,
                    pattern,
                    weight,
                } => {
                    if pattern.matches_any(&resolve_path(doc, path)) {
                        *weight
                    } else {
                        0
                    }
                }
                ScoreTerm::CountContains { path, pattern } => resolve_path(doc, path)
                    .iter()
                    .filter(|v| v.as_str().is_some_and(|s| pattern.is_match(s)))
                    .count() as u32,
            })
            .sum()
    }
}

/// Resolve a dotted path against a document, descending into arrays.
///
/// Arrays are flattened at every level, so `ingredients.name` yields every
/// ingredient name and `tags` yields each tag. Missing fields yield nothing.
pub fn resolve_path<'a>(doc: &'a Value, path: &str) -> Vec<&'a Value> {
    let mut current = vec![doc];
    for segment in path.split('.') {
        let mut next = Vec::new();
        for value in current {
            match value {
                Value::Object(map) => {
                    if let Some(child) = map.get(segment) {
                        next.push(child);
                    }
                }
                Value::Array(items) => {
                    for item in items {
                        if let Some(child) = item.as_object().and_then(|m| m.get(segment)) {
                            next.push(child);
                        }
                    }
                }
                _ => {}
            }
        }
        current = next;
    }

    let mut out = Vec::with_capacity(current.len());
    for value in current {
        match value {
            Value::Array(items) => out.extend(items.iter()),
            Value::Null => {}
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc() -> Value {
        json!({
            "title": "Chicken Curry",
            "tags": ["Spicy", "Dinner"],
            "ingredients": [
                {"name": "Chicken", "measure": "500g"},
                {"name": "chicken stock", "measure": "1 cup"},
                {"name": "Rice", "measure": "200g"}
            ],
            "highlight": true
        })
    }

    #[test]
    fn test_pattern_is_case_insensitive_substring() {
        let p = Pattern::contains("CURRY").unwrap();
        assert!(p.is_match("Chicken Curry"));
        assert!(!p.is_match("Chicken Korma"));
    }

    #[test]
    fn test_pattern_escapes_regex_metacharacters() {
        let p = Pattern::contains("a.c").unwrap();
        assert!(p.is_match("xa.cx"));
        assert!(!p.is_match("abc"));

        let p = Pattern::contains("(").unwrap();
        assert!(p.is_match("salt ("));
    }

    #[test]
    fn test_resolve_nested_array_path() {
        let d = doc();
        let names = resolve_path(&d, "ingredients.name");
        assert_eq!(names.len(), 3);
        assert_eq!(names[2], "Rice");
    }

    #[test]
    fn test_resolve_missing_field_is_empty() {
        let d = doc();
        assert!(resolve_path(&d, "area").is_empty());
        assert!(resolve_path(&d, "ingredients.unit").is_empty());
    }

    #[test]
    fn test_contains_matches_any_array_element() {
        let d = doc();
        let f = Filter::contains("tags", Pattern::contains("spic").unwrap());
        assert!(f.matches(&d));
        let f = Filter::contains("tags", Pattern::contains("lunch").unwrap());
        assert!(!f.matches(&d));
    }

    #[test]
    fn test_equals_and_boolean_combinators() {
        let d = doc();
        let highlighted = Filter::equals("highlight", json!(true));
        let rice = Filter::contains("ingredients.name", Pattern::contains("rice").unwrap());
        let fish = Filter::contains("title", Pattern::contains("fish").unwrap());

        assert!(Filter::And(vec![highlighted.clone(), rice.clone()]).matches(&d));
        assert!(!Filter::And(vec![highlighted.clone(), fish.clone()]).matches(&d));
        assert!(Filter::Or(vec![fish, rice]).matches(&d));
        assert!(Filter::All.matches(&d));
    }

    #[test]
    fn test_score_expr_sums_weights_and_counts() {
        let p = Pattern::contains("chicken").unwrap();
        let expr = ScoreExpr::new()
            .if_contains("title", &p, 10)
            .if_contains("tags", &p, 5)
            .count_contains("ingredients.name", &p);
        assert_eq!(expr.evaluate(&doc()), 12);
    }
}
