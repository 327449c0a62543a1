//! Tree ensemble model
//!
//! Evaluates a multi-class tree ensemble exported as JSON. Each tree is a flat
//! node array rooted at index 0; split nodes send `row[feature] <= threshold`
//! left and everything else right. Leaves carry one score per class. Scores
//! are summed over all trees on top of the base score and the arg-max class
//! label is returned.

use super::Model;
use crate::error::ModelError;
use credit_core::EncodedVector;
use serde::{Deserialize, Serialize};

/// A tree node (split or leaf)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: Vec<f64>,
    },
}

/// A single decision tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

/// Multi-class tree ensemble
///
/// Deserialization runs the same validation as [`TreeEnsembleModel::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawEnsemble")]
pub struct TreeEnsembleModel {
    n_features: usize,
    classes: Vec<i64>,
    base_score: Vec<f64>,
    trees: Vec<Tree>,
}

/// Artifact document as written on disk, before validation
#[derive(Deserialize)]
struct RawEnsemble {
    n_features: usize,
    classes: Vec<i64>,
    #[serde(default)]
    base_score: Vec<f64>,
    trees: Vec<Tree>,
}

impl TryFrom<RawEnsemble> for TreeEnsembleModel {
    type Error = ModelError;

    fn try_from(raw: RawEnsemble) -> Result<Self, Self::Error> {
        Self::new(raw.n_features, raw.classes, raw.base_score, raw.trees)
    }
}

impl TreeEnsembleModel {
    /// Build and validate an ensemble
    pub fn new(
        n_features: usize,
        classes: Vec<i64>,
        base_score: Vec<f64>,
        trees: Vec<Tree>,
    ) -> Result<Self, ModelError> {
        let mut model = Self {
            n_features,
            classes,
            base_score,
            trees,
        };
        model.validate()?;
        Ok(model)
    }

    /// Parse and validate the JSON artifact
    pub fn from_json(content: &str) -> Result<Self, ModelError> {
        let raw: RawEnsemble =
            serde_json::from_str(content).map_err(|source| ModelError::Parse {
                path: "<model>".to_string(),
                source,
            })?;
        Self::try_from(raw)
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn classes(&self) -> &[i64] {
        &self.classes
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    /// Child indices must point strictly forward, so every walk terminates.
    fn validate(&mut self) -> Result<(), ModelError> {
        let n_classes = self.classes.len();
        if n_classes == 0 {
            return Err(ModelError::InvalidModel("no classes declared".to_string()));
        }
        if self.base_score.is_empty() {
            self.base_score = vec![0.0; n_classes];
        } else if self.base_score.len() != n_classes {
            return Err(ModelError::InvalidModel(format!(
                "base_score has {} entries for {} classes",
                self.base_score.len(),
                n_classes
            )));
        }

        for (t, tree) in self.trees.iter().enumerate() {
            if tree.nodes.is_empty() {
                return Err(ModelError::InvalidModel(format!("tree {} is empty", t)));
            }
            for (i, node) in tree.nodes.iter().enumerate() {
                match node {
                    Node::Split {
                        feature,
                        left,
                        right,
                        ..
                    } => {
                        if *feature >= self.n_features {
                            return Err(ModelError::InvalidModel(format!(
                                "tree {} node {} splits on feature {} (n_features = {})",
                                t, i, feature, self.n_features
                            )));
                        }
                        for child in [*left, *right] {
                            if child <= i || child >= tree.nodes.len() {
                                return Err(ModelError::InvalidModel(format!(
                                    "tree {} node {} has invalid child {}",
                                    t, i, child
                                )));
                            }
                        }
                    }
                    Node::Leaf { value } => {
                        if value.len() != n_classes {
                            return Err(ModelError::InvalidModel(format!(
                                "tree {} leaf {} has {} scores for {} classes",
                                t,
                                i,
                                value.len(),
                                n_classes
                            )));
                        }
                    }
                }
            }
        }

        Ok(())
    }

    fn predict_row(&self, row: &[f64]) -> Result<i64, ModelError> {
        if row.len() != self.n_features {
            return Err(ModelError::FeatureCount {
                expected: self.n_features,
                found: row.len(),
            });
        }

        let mut scores = self.base_score.clone();
        for tree in &self.trees {
            let leaf = walk(tree, row);
            for (score, delta) in scores.iter_mut().zip(leaf) {
                *score += delta;
            }
        }

        let mut best = 0;
        for (i, score) in scores.iter().enumerate().skip(1) {
            if *score > scores[best] {
                best = i;
            }
        }
        Ok(self.classes[best])
    }
}

fn walk<'a>(tree: &'a Tree, row: &[f64]) -> &'a [f64] {
    let mut idx = 0;
    loop {
        match &tree.nodes[idx] {
            Node::Leaf { value } => return value,
            Node::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                idx = if row[*feature] <= *threshold {
                    *left
                } else {
                    *right
                };
            }
        }
    }
}

impl Model for TreeEnsembleModel {
    fn predict(&self, rows: &[EncodedVector]) -> Result<Vec<i64>, ModelError> {
        rows.iter()
            .map(|row| self.predict_row(&row.to_f64_row()))
            .collect()
    }
}
