//! Weighted decision matrix: scoring engine, model state, and the shareable model string.

pub mod codec;
pub mod domain;
pub mod engine;
pub mod model;
pub mod router;
pub mod service;
pub mod table;

#[cfg(test)]
mod tests;

pub use codec::{decode, encode, share_link, DATA_PARAM};
pub use domain::{Choice, ChoiceId, Criterion, CriterionId, InvalidScore, Score};
pub use engine::{DecisionEngine, RankedResult};
pub use model::{parse_importance_input, ChoiceAssignment, DecisionModel, Evaluation};
pub use router::decision_router;
pub use service::{DecisionService, EncodedModel, EvaluationView, ModelEdit, ResultView};
pub use table::DataTable;
