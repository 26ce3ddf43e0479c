use serde::Serialize;

use super::domain::{Choice, ChoiceId, Criterion, CriterionId, Score};
use super::table::DataTable;

/// Computed total for one choice.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedResult {
    pub choice: Choice,
    pub score: f64,
}

#[derive(Debug, Clone)]
struct ChoiceScores {
    choice: Choice,
    values: Vec<(CriterionId, Score)>,
}

impl ChoiceScores {
    fn get(&self, criterion: CriterionId) -> Option<Score> {
        self.values
            .iter()
            .find(|(id, _)| *id == criterion)
            .map(|(_, score)| *score)
    }

    fn upsert(&mut self, criterion: CriterionId, score: Score) {
        match self.values.iter_mut().find(|(id, _)| *id == criterion) {
            Some(entry) => entry.1 = score,
            None => self.values.push((criterion, score)),
        }
    }
}

/// Caller-owned scoring state: the registry of every criterion seen and the sparse per-choice
/// assignments, both kept in order of first appearance.
#[derive(Debug, Clone, Default)]
pub struct DecisionEngine {
    criteria: Vec<Criterion>,
    assignments: Vec<ChoiceScores>,
}

impl DecisionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge `values` into the choice's assignment and register every criterion mentioned.
    ///
    /// Entries already present under the same id are replaced in place, so renaming a criterion
    /// or choice never changes its position. Returns the updated criteria registry.
    pub fn set_criteria_values_for_choice<I>(&mut self, choice: &Choice, values: I) -> &[Criterion]
    where
        I: IntoIterator<Item = (Criterion, Score)>,
    {
        let index = match self
            .assignments
            .iter()
            .position(|entry| entry.choice.id == choice.id)
        {
            Some(index) => {
                self.assignments[index].choice = choice.clone();
                index
            }
            None => {
                self.assignments.push(ChoiceScores {
                    choice: choice.clone(),
                    values: Vec::new(),
                });
                self.assignments.len() - 1
            }
        };

        for (criterion, score) in values {
            self.assignments[index].upsert(criterion.id, score);
            self.register(criterion);
        }

        &self.criteria
    }

    fn register(&mut self, criterion: Criterion) {
        match self.criteria.iter_mut().find(|known| known.id == criterion.id) {
            Some(known) => *known = criterion,
            None => self.criteria.push(criterion),
        }
    }

    /// Drop a criterion from the registry and from every assignment.
    pub fn remove_criterion(&mut self, id: CriterionId) -> bool {
        let before = self.criteria.len();
        self.criteria.retain(|criterion| criterion.id != id);
        for entry in &mut self.assignments {
            entry.values.retain(|(criterion, _)| *criterion != id);
        }
        before != self.criteria.len()
    }

    /// Drop a choice and all of its scores.
    pub fn remove_choice(&mut self, id: ChoiceId) -> bool {
        let before = self.assignments.len();
        self.assignments.retain(|entry| entry.choice.id != id);
        before != self.assignments.len()
    }

    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    /// Explicit score for the pair, if one was assigned.
    pub fn score_for(&self, choice: ChoiceId, criterion: CriterionId) -> Option<Score> {
        self.assignments
            .iter()
            .find(|entry| entry.choice.id == choice)
            .and_then(|entry| entry.get(criterion))
    }

    /// Weighted totals for every choice, best first.
    ///
    /// A missing score counts as [`Score::AVERAGE`], so a criterion added after a choice was
    /// scored neither rewards nor punishes that choice. Ties keep assignment order.
    pub fn compute_results(&self) -> Vec<RankedResult> {
        let mut results: Vec<RankedResult> = self
            .assignments
            .iter()
            .map(|entry| {
                let score: f64 = self
                    .criteria
                    .iter()
                    .map(|criterion| {
                        let score = entry.get(criterion.id).unwrap_or(Score::AVERAGE);
                        score.value() * criterion.importance
                    })
                    .sum();
                RankedResult {
                    choice: entry.choice.clone(),
                    score,
                }
            })
            .collect();

        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        results
    }

    /// Build the display grid for `results`.
    pub fn data_table(&self, results: &[RankedResult]) -> DataTable {
        DataTable::build(self, results)
    }
}
