//! Case registry: the read-only catalog of candidate cases.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::case::{Case, CaseCategory};
use crate::error::{WorkflowError, WorkflowResult};

const DEMO_CATALOG: &str = include_str!("../data/demo_cases.json");

/// Read-only source of candidate cases.
pub trait CaseRegistry: Send + Sync {
    /// All cases in catalog order.
    fn list_cases(&self) -> Vec<Arc<Case>>;

    /// Look up one case.
    fn get_case(&self, id: &str) -> WorkflowResult<Arc<Case>>;

    /// Check whether an id resolves.
    fn contains(&self, id: &str) -> bool {
        self.get_case(id).is_ok()
    }

    /// All cases, or only the given category.
    fn filter(&self, category: Option<CaseCategory>) -> Vec<Arc<Case>> {
        self.list_cases()
            .into_iter()
            .filter(|case| category.is_none_or(|c| case.category == c))
            .collect()
    }

    /// Cases offered in the workflow's case-selection step.
    fn actionable(&self) -> Vec<Arc<Case>> {
        self.list_cases()
            .into_iter()
            .filter(|case| case.is_actionable())
            .collect()
    }
}

/// Registry over a fixed, in-memory catalog.
#[derive(Debug, Clone)]
pub struct StaticCaseRegistry {
    cases: Vec<Arc<Case>>,
    index: HashMap<String, usize>,
}

impl StaticCaseRegistry {
    /// Build a registry, rejecting duplicate ids and invalid confidences.
    pub fn new(cases: Vec<Case>) -> WorkflowResult<Self> {
        let mut index = HashMap::with_capacity(cases.len());
        let mut stored = Vec::with_capacity(cases.len());

        for case in cases {
            if case.confidence > 100 {
                return Err(WorkflowError::InvalidCase {
                    id: case.id,
                    message: format!("confidence {} is above 100", case.confidence),
                });
            }
            if case.id.is_empty() {
                return Err(WorkflowError::InvalidCase {
                    id: case.id,
                    message: "id cannot be empty".to_string(),
                });
            }
            if index.insert(case.id.clone(), stored.len()).is_some() {
                return Err(WorkflowError::DuplicateCase(case.id));
            }
            stored.push(Arc::new(case));
        }

        Ok(Self {
            cases: stored,
            index,
        })
    }

    /// Parse a JSON array of cases.
    pub fn from_json(json: &str) -> WorkflowResult<Self> {
        let cases: Vec<Case> = serde_json::from_str(json)?;
        Self::new(cases)
    }

    /// Load a JSON catalog file.
    pub async fn from_file(path: &Path) -> WorkflowResult<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        let registry = Self::from_json(&content)?;
        debug!("Loaded {} cases from {:?}", registry.len(), path);
        Ok(registry)
    }

    /// The built-in demo catalog of seven cases.
    pub fn demo() -> WorkflowResult<Self> {
        Self::from_json(DEMO_CATALOG)
    }

    /// An empty registry.
    pub fn empty() -> Self {
        Self {
            cases: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}

impl CaseRegistry for StaticCaseRegistry {
    fn list_cases(&self) -> Vec<Arc<Case>> {
        self.cases.clone()
    }

    fn get_case(&self, id: &str) -> WorkflowResult<Arc<Case>> {
        self.index
            .get(id)
            .map(|&i| self.cases[i].clone())
            .ok_or_else(|| WorkflowError::CaseNotFound(id.to_string()))
    }

    fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }
}
