use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::codec;
use super::domain::{ChoiceId, CriterionId, InvalidScore};
use super::model::{parse_importance_input, DecisionModel, Evaluation};
use super::table::DataTable;

/// One change a view makes to the model, carrying raw user text where the view would.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ModelEdit {
    AddCriterion {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        importance: Option<String>,
    },
    UpdateCriterion {
        id: CriterionId,
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        importance: Option<String>,
    },
    RemoveCriterion {
        id: CriterionId,
    },
    AddChoice {
        #[serde(default)]
        name: Option<String>,
    },
    RenameChoice {
        id: ChoiceId,
        name: String,
    },
    RemoveChoice {
        id: ChoiceId,
    },
    SetScore {
        choice_id: ChoiceId,
        criterion_id: CriterionId,
        value: String,
    },
}

/// Ranked entry as exposed to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultView {
    pub rank: usize,
    pub choice_id: ChoiceId,
    pub choice: String,
    pub score: f64,
}

/// Full response for an evaluation request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationView {
    pub results: Vec<ResultView>,
    pub table: DataTable,
    pub data: String,
    pub share_link: String,
}

/// Encoded form of a model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncodedModel {
    pub data: String,
    pub share_link: String,
}

/// Stateless facade tying the model, engine, and codec together for the HTTP and CLI surfaces.
#[derive(Debug, Clone)]
pub struct DecisionService {
    public_url: String,
}

impl DecisionService {
    pub fn new(public_url: impl Into<String>) -> Self {
        Self {
            public_url: public_url.into(),
        }
    }

    pub fn public_url(&self) -> &str {
        &self.public_url
    }

    pub fn decode(&self, data: Option<&str>) -> DecisionModel {
        data.map(codec::decode).unwrap_or_default()
    }

    pub fn encode(&self, model: &DecisionModel) -> EncodedModel {
        EncodedModel {
            data: codec::encode(model),
            share_link: codec::share_link(&self.public_url, model),
        }
    }

    pub fn evaluate(&self, model: &DecisionModel) -> EvaluationView {
        let Evaluation { results, table } = model.evaluate();
        let EncodedModel { data, share_link } = self.encode(model);

        info!(
            criteria = model.criteria.len(),
            choices = model.choices.len(),
            "evaluated decision model"
        );

        let results = results
            .into_iter()
            .enumerate()
            .map(|(index, result)| ResultView {
                rank: index + 1,
                choice_id: result.choice.id,
                choice: result.choice.name,
                score: result.score,
            })
            .collect();

        EvaluationView {
            results,
            table,
            data,
            share_link,
        }
    }

    pub fn evaluate_encoded(&self, data: Option<&str>) -> EvaluationView {
        self.evaluate(&self.decode(data))
    }

    /// Apply edits in order. Stops at the first invalid score, leaving earlier edits applied.
    pub fn apply_edits(
        &self,
        model: &mut DecisionModel,
        edits: impl IntoIterator<Item = ModelEdit>,
    ) -> Result<(), InvalidScore> {
        for edit in edits {
            apply_edit(model, edit)?;
        }
        Ok(())
    }
}

fn apply_edit(model: &mut DecisionModel, edit: ModelEdit) -> Result<(), InvalidScore> {
    match edit {
        ModelEdit::AddCriterion { name, importance } => {
            let id = model.add_default_criterion();
            let importance = importance.as_deref().and_then(parse_importance_input);
            model.update_criterion(id, name, importance);
        }
        ModelEdit::UpdateCriterion {
            id,
            name,
            importance,
        } => {
            let importance = importance.as_deref().and_then(parse_importance_input);
            model.update_criterion(id, name, importance);
        }
        ModelEdit::RemoveCriterion { id } => {
            model.remove_criterion(id);
        }
        ModelEdit::AddChoice { name } => {
            let id = model.add_default_choice();
            if let Some(name) = name {
                model.rename_choice(id, name);
            }
        }
        ModelEdit::RenameChoice { id, name } => {
            model.rename_choice(id, name);
        }
        ModelEdit::RemoveChoice { id } => {
            model.remove_choice(id);
        }
        ModelEdit::SetScore {
            choice_id,
            criterion_id,
            value,
        } => {
            if model.choice(choice_id).is_none() || model.criterion(criterion_id).is_none() {
                debug!(%choice_id, %criterion_id, "ignoring score for unknown pair");
                return Ok(());
            }
            model.apply_score_input(choice_id, criterion_id, &value)?;
        }
    }
    Ok(())
}
