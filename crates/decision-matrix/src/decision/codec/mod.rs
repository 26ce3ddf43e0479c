//! Compact model string used as the `data` query parameter of shareable links.
//!
//! The string has three segments joined by `__`:
//!
//! ```text
//! criteria    id~name~importance _ id~name~importance ...
//! choices     id~name _ id~name ...
//! assignments choiceId-criterionId~value criterionId~value ... _ ...
//! ```
//!
//! Names are escaped with [`escape_field`] so delimiter characters survive a round trip.
//! Decoding is lenient: malformed entries are skipped and the rest of the model is kept.

mod escape;

pub use escape::{encode_query_value, escape_field, unescape_field};

use std::collections::BTreeMap;
use std::str::FromStr;

use tracing::{debug, warn};

use super::domain::{format_number, Choice, ChoiceId, Criterion, CriterionId, Score};
use super::model::{ChoiceAssignment, DecisionModel};

/// Query parameter carrying the encoded model.
pub const DATA_PARAM: &str = "data";

const SEGMENT_DELIMITER: &str = "__";
const ENTRY_DELIMITER: &str = "_";
const FIELD_DELIMITER: &str = "~";
const CHOICE_DELIMITER: &str = "-";
const PAIR_DELIMITER: &str = " ";

/// Serialize the whole model into one URL-safe-after-escaping string.
pub fn encode(model: &DecisionModel) -> String {
    let criteria = model
        .criteria
        .iter()
        .map(|criterion| {
            format!(
                "{}{FIELD_DELIMITER}{}{FIELD_DELIMITER}{}",
                criterion.id,
                escape_field(&criterion.name),
                format_number(criterion.importance)
            )
        })
        .collect::<Vec<_>>()
        .join(ENTRY_DELIMITER);

    let choices = model
        .choices
        .iter()
        .map(|choice| format!("{}{FIELD_DELIMITER}{}", choice.id, escape_field(&choice.name)))
        .collect::<Vec<_>>()
        .join(ENTRY_DELIMITER);

    let assignments = model
        .assignments
        .iter()
        .map(|assignment| {
            let pairs = assignment
                .scores
                .iter()
                .map(|(criterion, score)| format!("{criterion}{FIELD_DELIMITER}{score}"))
                .collect::<Vec<_>>()
                .join(PAIR_DELIMITER);
            format!("{}{CHOICE_DELIMITER}{pairs}", assignment.choice_id)
        })
        .collect::<Vec<_>>()
        .join(ENTRY_DELIMITER);

    [criteria, choices, assignments].join(SEGMENT_DELIMITER)
}

/// Rebuild a model from [`encode`] output, skipping anything that does not parse.
///
/// The id generator resumes after the highest criterion or choice id.
pub fn decode(encoded: &str) -> DecisionModel {
    let segments: Vec<&str> = encoded.split(SEGMENT_DELIMITER).collect();
    if segments.len() != 3 {
        warn!(
            segments = segments.len(),
            "model string does not have exactly three segments; decoding what is present"
        );
    }
    let segment = |index: usize| segments.get(index).copied().unwrap_or_default();

    let mut model = DecisionModel::new();

    for entry in entries(segment(0)) {
        match parse_criterion(entry) {
            Some(criterion) => model.insert_criterion(criterion),
            None => debug!(entry, "skipping malformed criterion entry"),
        }
    }

    for entry in entries(segment(1)) {
        match parse_choice(entry) {
            Some(choice) => model.insert_choice(choice),
            None => debug!(entry, "skipping malformed choice entry"),
        }
    }

    for entry in entries(segment(2)) {
        match parse_assignment(entry, &model) {
            Some(assignment) => upsert_assignment(&mut model, assignment),
            None => debug!(entry, "skipping malformed assignment entry"),
        }
    }

    model.resync_ids();
    model
}

/// `base_url` without its query string, followed by `?data=<encoded model>`.
pub fn share_link(base_url: &str, model: &DecisionModel) -> String {
    let base = base_url.split('?').next().unwrap_or_default();
    format!(
        "{base}?{DATA_PARAM}={}",
        encode_query_value(&encode(model))
    )
}

fn entries(segment: &str) -> impl Iterator<Item = &str> {
    segment
        .split(ENTRY_DELIMITER)
        .filter(|entry| !entry.trim().is_empty())
}

fn parse_number<T: FromStr>(raw: &str) -> Option<T> {
    raw.trim().parse().ok()
}

fn parse_criterion(entry: &str) -> Option<Criterion> {
    let mut fields = entry.split(FIELD_DELIMITER);
    let (Some(id), Some(name), Some(importance), None) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return None;
    };
    Some(Criterion::new(
        CriterionId(parse_number(id)?),
        unescape_field(name),
        parse_number(importance)?,
    ))
}

fn parse_choice(entry: &str) -> Option<Choice> {
    let mut fields = entry.split(FIELD_DELIMITER);
    let (Some(id), Some(name), None) = (fields.next(), fields.next(), fields.next()) else {
        return None;
    };
    Some(Choice::new(ChoiceId(parse_number(id)?), unescape_field(name)))
}

fn parse_assignment(entry: &str, model: &DecisionModel) -> Option<ChoiceAssignment> {
    let (choice_id, pairs) = entry.split_once(CHOICE_DELIMITER)?;
    let choice_id = ChoiceId(parse_number(choice_id)?);
    if model.choice(choice_id).is_none() {
        debug!(%choice_id, "assignment references an unknown choice");
        return None;
    }

    let mut scores = BTreeMap::new();
    for pair in pairs.split(PAIR_DELIMITER).filter(|pair| !pair.is_empty()) {
        match parse_score_pair(pair) {
            Some((criterion, score)) if model.criterion(criterion).is_some() => {
                scores.insert(criterion, score);
            }
            _ => debug!(%choice_id, pair, "skipping malformed score"),
        }
    }

    Some(ChoiceAssignment { choice_id, scores })
}

fn parse_score_pair(pair: &str) -> Option<(CriterionId, Score)> {
    let (criterion, value) = pair.split_once(FIELD_DELIMITER)?;
    if value.contains(FIELD_DELIMITER) {
        return None;
    }
    let score = Score::new(parse_number(value)?).ok()?;
    Some((CriterionId(parse_number(criterion)?), score))
}

fn upsert_assignment(model: &mut DecisionModel, assignment: ChoiceAssignment) {
    match model
        .assignments
        .iter_mut()
        .find(|known| known.choice_id == assignment.choice_id)
    {
        Some(known) => *known = assignment,
        None => model.assignments.push(assignment),
    }
}
