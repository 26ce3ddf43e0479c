use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::{Choice, ChoiceId, Criterion, CriterionId, InvalidScore, Score};
use super::engine::{DecisionEngine, RankedResult};
use super::table::DataTable;

pub const DEFAULT_CRITERION_NAME: &str = "New criteria";
pub const DEFAULT_CRITERION_IMPORTANCE: f64 = 5.0;
pub const DEFAULT_CHOICE_NAME: &str = "New choice";

/// Sparse scores recorded for one choice, ordered by criterion id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceAssignment {
    pub choice_id: ChoiceId,
    #[serde(default)]
    pub scores: BTreeMap<CriterionId, Score>,
}

impl ChoiceAssignment {
    pub fn new(choice_id: ChoiceId) -> Self {
        Self {
            choice_id,
            scores: BTreeMap::new(),
        }
    }
}

/// Everything a user has entered: criteria, choices, and the scores linking them.
///
/// All collections keep insertion order. Criteria and choices draw ids from the same generator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DecisionModel {
    #[serde(default)]
    pub criteria: Vec<Criterion>,
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub assignments: Vec<ChoiceAssignment>,
    #[serde(default)]
    next_id: u32,
}

// The generator position is bookkeeping, not content.
impl PartialEq for DecisionModel {
    fn eq(&self, other: &Self) -> bool {
        self.criteria == other.criteria
            && self.choices == other.choices
            && self.assignments == other.assignments
    }
}

/// Ranked results together with their display grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub results: Vec<RankedResult>,
    pub table: DataTable,
}

impl DecisionModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next id the generator will hand out.
    pub fn next_id(&self) -> u32 {
        self.next_id
    }

    fn new_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Resume the generator past every criterion and choice id.
    pub fn resync_ids(&mut self) {
        self.next_id = self
            .criteria
            .iter()
            .map(|criterion| criterion.id.0)
            .chain(self.choices.iter().map(|choice| choice.id.0))
            .max()
            .map_or(0, |max| max.saturating_add(1));
    }

    pub fn criterion(&self, id: CriterionId) -> Option<&Criterion> {
        self.criteria.iter().find(|criterion| criterion.id == id)
    }

    pub fn choice(&self, id: ChoiceId) -> Option<&Choice> {
        self.choices.iter().find(|choice| choice.id == id)
    }

    pub fn assignment(&self, id: ChoiceId) -> Option<&ChoiceAssignment> {
        self.assignments
            .iter()
            .find(|assignment| assignment.choice_id == id)
    }

    fn assignment_mut(&mut self, id: ChoiceId) -> &mut ChoiceAssignment {
        match self
            .assignments
            .iter()
            .position(|assignment| assignment.choice_id == id)
        {
            Some(index) => &mut self.assignments[index],
            None => {
                self.assignments.push(ChoiceAssignment::new(id));
                let last = self.assignments.len() - 1;
                &mut self.assignments[last]
            }
        }
    }

    pub fn add_criterion(&mut self, name: impl Into<String>, importance: f64) -> CriterionId {
        let id = CriterionId(self.new_id());
        self.criteria.push(Criterion::new(id, name, importance));
        id
    }

    pub fn add_default_criterion(&mut self) -> CriterionId {
        self.add_criterion(DEFAULT_CRITERION_NAME, DEFAULT_CRITERION_IMPORTANCE)
    }

    /// Restore a criterion under a known id, replacing any existing entry in place.
    pub fn insert_criterion(&mut self, criterion: Criterion) {
        match self.criteria.iter_mut().find(|known| known.id == criterion.id) {
            Some(known) => *known = criterion,
            None => self.criteria.push(criterion),
        }
    }

    /// Replace the name and/or importance of an existing criterion.
    pub fn update_criterion(
        &mut self,
        id: CriterionId,
        name: Option<String>,
        importance: Option<f64>,
    ) -> bool {
        let Some(criterion) = self.criteria.iter_mut().find(|criterion| criterion.id == id) else {
            return false;
        };
        if let Some(name) = name {
            criterion.name = name;
        }
        if let Some(importance) = importance {
            criterion.importance = importance;
        }
        true
    }

    /// Remove a criterion and its score from every choice.
    pub fn remove_criterion(&mut self, id: CriterionId) -> bool {
        let before = self.criteria.len();
        self.criteria.retain(|criterion| criterion.id != id);
        for assignment in &mut self.assignments {
            assignment.scores.remove(&id);
        }
        before != self.criteria.len()
    }

    /// Add a choice with an empty assignment.
    pub fn add_choice(&mut self, name: impl Into<String>) -> ChoiceId {
        let id = ChoiceId(self.new_id());
        self.choices.push(Choice::new(id, name));
        self.assignments.push(ChoiceAssignment::new(id));
        id
    }

    pub fn add_default_choice(&mut self) -> ChoiceId {
        self.add_choice(DEFAULT_CHOICE_NAME)
    }

    /// Restore a choice under a known id, replacing any existing entry in place.
    pub fn insert_choice(&mut self, choice: Choice) {
        match self.choices.iter_mut().find(|known| known.id == choice.id) {
            Some(known) => *known = choice,
            None => self.choices.push(choice),
        }
    }

    pub fn rename_choice(&mut self, id: ChoiceId, name: impl Into<String>) -> bool {
        match self.choices.iter_mut().find(|choice| choice.id == id) {
            Some(choice) => {
                choice.name = name.into();
                true
            }
            None => false,
        }
    }

    /// Remove a choice together with all of its scores.
    pub fn remove_choice(&mut self, id: ChoiceId) -> bool {
        let before = self.choices.len();
        self.choices.retain(|choice| choice.id != id);
        self.assignments
            .retain(|assignment| assignment.choice_id != id);
        before != self.choices.len()
    }

    /// Set or clear (`None`) the score of one pair.
    pub fn set_score(&mut self, choice: ChoiceId, criterion: CriterionId, score: Option<Score>) {
        let assignment = self.assignment_mut(choice);
        match score {
            Some(score) => {
                assignment.scores.insert(criterion, score);
            }
            None => {
                assignment.scores.remove(&criterion);
            }
        }
    }

    /// Apply raw text typed into a score cell.
    ///
    /// Blank input clears the score and non-numeric input is ignored. Negative numbers are
    /// reported as [`InvalidScore`] and leave the model untouched.
    pub fn apply_score_input(
        &mut self,
        choice: ChoiceId,
        criterion: CriterionId,
        raw: &str,
    ) -> Result<(), InvalidScore> {
        let raw = raw.trim();
        if raw.is_empty() {
            self.set_score(choice, criterion, None);
            return Ok(());
        }
        match raw.parse::<f64>() {
            Ok(value) => {
                let score = Score::new(value)?;
                self.set_score(choice, criterion, Some(score));
            }
            Err(_) => debug!(%choice, %criterion, raw, "ignoring non-numeric score input"),
        }
        Ok(())
    }

    /// Feed every scored assignment to a fresh engine, criteria in id order.
    ///
    /// Scores that reference a criterion or choice no longer in the model are skipped. A choice
    /// left with no scores is not ranked until its first score is set.
    pub fn engine(&self) -> DecisionEngine {
        let mut engine = DecisionEngine::new();
        for assignment in &self.assignments {
            let Some(choice) = self.choice(assignment.choice_id) else {
                debug!(choice = %assignment.choice_id, "skipping assignment for unknown choice");
                continue;
            };
            let values = assignment
                .scores
                .iter()
                .filter_map(|(criterion_id, score)| {
                    self.criterion(*criterion_id)
                        .map(|criterion| (criterion.clone(), *score))
                })
                .collect::<Vec<_>>();
            if values.is_empty() {
                continue;
            }
            engine.set_criteria_values_for_choice(choice, values);
        }
        engine
    }

    pub fn evaluate(&self) -> Evaluation {
        let engine = self.engine();
        let results = engine.compute_results();
        let table = engine.data_table(&results);
        Evaluation { results, table }
    }
}

/// Parse an importance field; non-numeric input yields `None` and is ignored by callers.
pub fn parse_importance_input(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_shared_between_criteria_and_choices() {
        let mut model = DecisionModel::new();
        let price = model.add_default_criterion();
        let a = model.add_default_choice();
        let quality = model.add_criterion("Quality", 1.0);

        assert_eq!(price, CriterionId(0));
        assert_eq!(a, ChoiceId(1));
        assert_eq!(quality, CriterionId(2));
        assert_eq!(model.next_id(), 3);
        assert_eq!(model.criterion(price).map(|c| c.importance), Some(5.0));
    }

    #[test]
    fn score_input_follows_cell_semantics() {
        let mut model = DecisionModel::new();
        let price = model.add_criterion("Price", 1.0);
        let a = model.add_choice("A");

        model.apply_score_input(a, price, " 7.5 ").expect("valid input");
        model.apply_score_input(a, price, "abc").expect("ignored input");
        assert_eq!(
            model.assignment(a).and_then(|s| s.scores.get(&price)).copied(),
            Score::new(7.5).ok()
        );

        assert!(model.apply_score_input(a, price, "-2").is_err());
        model.apply_score_input(a, price, "   ").expect("blank clears");
        assert!(model.assignment(a).expect("assignment").scores.is_empty());
    }

    #[test]
    fn engine_skips_dangling_references() {
        let mut model = DecisionModel::new();
        let price = model.add_criterion("Price", 1.0);
        let a = model.add_choice("A");
        model.set_score(a, price, Score::new(4.0).ok());
        model.set_score(a, CriterionId(40), Score::new(9.0).ok());
        model.set_score(ChoiceId(41), price, Score::new(9.0).ok());

        let evaluation = model.evaluate();
        assert_eq!(evaluation.results.len(), 1);
        assert_eq!(evaluation.results[0].score, 4.0);
    }

    #[test]
    fn unscored_choice_stays_out_of_results() {
        let mut model = DecisionModel::new();
        let price = model.add_criterion("Price", 2.0);
        let a = model.add_choice("A");
        model.set_score(a, price, Score::new(1.0).ok());
        let fresh = model.add_default_choice();

        let evaluation = model.evaluate();
        let ranking: Vec<(&str, f64)> = evaluation
            .results
            .iter()
            .map(|result| (result.choice.name.as_str(), result.score))
            .collect();
        assert_eq!(ranking, [("A", 2.0)]);
        assert_eq!(evaluation.table.rows()[0], ["", "A"]);

        model.set_score(fresh, price, Score::new(3.0).ok());
        assert_eq!(model.evaluate().results[0].choice.name, DEFAULT_CHOICE_NAME);

        model.set_score(fresh, price, None);
        assert_eq!(model.evaluate().results.len(), 1);
    }

    #[test]
    fn importance_input_ignores_garbage() {
        assert_eq!(parse_importance_input("-3"), Some(-3.0));
        assert_eq!(parse_importance_input("lots"), None);
    }
}
