use rand::seq::SliceRandom;
use serde_json::Value;
use std::cmp::Ordering;

use super::filter::{resolve_path, Filter, ScoreExpr};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone)]
pub struct SortKey {
    pub path: String,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn asc(path: &str) -> Self {
        Self {
            path: path.to_string(),
            direction: SortDirection::Ascending,
        }
    }

    pub fn desc(path: &str) -> Self {
        Self {
            path: path.to_string(),
            direction: SortDirection::Descending,
        }
    }
}

/// One step of an aggregation pipeline.
#[derive(Debug, Clone)]
pub enum Stage {
    Match(Filter),
    /// Writes the evaluated expression into `field` on every document.
    AddScore { field: String, expr: ScoreExpr },
    Sort(Vec<SortKey>),
    Skip(usize),
    Limit(usize),
    /// Random selection without replacement.
    Sample(usize),
}

pub(crate) fn run(mut docs: Vec<Value>, stages: &[Stage]) -> Vec<Value> {
    for stage in stages {
        docs = match stage {
            Stage::Match(filter) => docs.into_iter().filter(|d| filter.matches(d)).collect(),
            Stage::AddScore { field, expr } => docs
                .into_iter()
                .map(|mut d| {
                    let score = expr.evaluate(&d);
                    if let Value::Object(map) = &mut d {
                        map.insert(field.clone(), Value::from(score));
                    }
                    d
                })
                .collect(),
            Stage::Sort(keys) => {
                sort_documents(&mut docs, keys);
                docs
            }
            Stage::Skip(n) => docs.into_iter().skip(*n).collect(),
            Stage::Limit(n) => {
                docs.truncate(*n);
                docs
            }
            Stage::Sample(n) => {
                let mut rng = rand::thread_rng();
                docs.shuffle(&mut rng);
                docs.truncate(*n);
                docs
            }
        };
    }
    docs
}

pub(crate) fn sort_documents(docs: &mut [Value], keys: &[SortKey]) {
    docs.sort_by(|a, b| {
        for key in keys {
            let ord = compare_values(sort_value(a, &key.path), sort_value(b, &key.path));
            let ord = match key.direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    });
}

fn sort_value<'a>(doc: &'a Value, path: &str) -> Option<&'a Value> {
    resolve_path(doc, path).into_iter().next()
}

/// Cross-type ordering: missing/null < numbers < strings < booleans < everything else.
pub(crate) fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(v: Option<&Value>) -> u8 {
        match v {
            None | Some(Value::Null) => 0,
            Some(Value::Number(_)) => 1,
            Some(Value::String(_)) => 2,
            Some(Value::Bool(_)) => 3,
            Some(Value::Array(_)) => 4,
            Some(Value::Object(_)) => 5,
        }
    }

    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}
