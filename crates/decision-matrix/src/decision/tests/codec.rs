use super::common::*;
use crate::decision::codec::{decode, encode, share_link};
use crate::decision::domain::{Choice, ChoiceId, Criterion, CriterionId};
use crate::decision::model::DecisionModel;

#[test]
fn single_criterion_model_round_trips() {
    let mut model = DecisionModel::new();
    model.insert_criterion(Criterion::new(CriterionId(0), "Price", 2.0));
    model.insert_choice(Choice::new(ChoiceId(0), "A"));
    model.set_score(ChoiceId(0), CriterionId(0), Some(score(8.0)));

    let encoded = encode(&model);
    assert_eq!(encoded, "0~Price~2.0__0~A__0-0~8.0");

    let decoded = decode(&encoded);
    assert_eq!(decoded, model);
    assert_eq!(decoded.next_id(), 1);
}

#[test]
fn exponent_numbers_survive_the_field_delimiters() {
    let mut model = DecisionModel::new();
    model.insert_criterion(Criterion::new(CriterionId(0), "Tiny", 0.00001));
    model.insert_criterion(Criterion::new(CriterionId(1), "Huge", 2.5e16));
    model.insert_choice(Choice::new(ChoiceId(2), "A"));
    model.set_score(ChoiceId(2), CriterionId(0), Some(score(1e-7)));
    model.set_score(ChoiceId(2), CriterionId(1), Some(score(3e16)));

    let encoded = encode(&model);
    assert_eq!(encoded, "0~Tiny~1e-5_1~Huge~2.5e16__2~A__2-0~1e-7 1~3e16");
    assert_eq!(decode(&encoded), model);
}

#[test]
fn upper_case_exponents_decode() {
    let decoded = decode("0~Tiny~1.0E-5__2~A__2-0~1.0E-7");

    assert_eq!(decoded.criteria[0].importance, 0.00001);
    let scores = &decoded.assignment(ChoiceId(2)).expect("assignment kept").scores;
    assert_eq!(scores.get(&CriterionId(0)).copied(), Some(score(1e-7)));
}

#[test]
fn full_model_round_trips() {
    let fixture = price_quality();

    let decoded = decode(&encode(&fixture.model));

    assert_eq!(decoded, fixture.model);
    assert_eq!(decoded.evaluate(), fixture.model.evaluate());
}

#[test]
fn names_with_delimiters_round_trip() {
    let mut model = DecisionModel::new();
    let resale = model.add_criterion("Re-sale value ~ 5%_ish", -1.25);
    let choice = model.add_choice("Mini - Cooper_S");
    model.set_score(choice, resale, Some(score(0.5)));

    let encoded = encode(&model);
    assert_eq!(encoded.matches("__").count(), 2);

    let decoded = decode(&encoded);
    assert_eq!(decoded, model);
    assert_eq!(
        decoded.criterion(resale).map(|c| c.name.as_str()),
        Some("Re-sale value ~ 5%_ish")
    );
}

#[test]
fn empty_model_round_trips() {
    let model = DecisionModel::new();

    let encoded = encode(&model);

    assert_eq!(encoded, "____");
    let decoded = decode(&encoded);
    assert_eq!(decoded, model);
    assert_eq!(decoded.next_id(), 0);
}

#[test]
fn choice_without_scores_keeps_its_assignment_but_is_not_ranked() {
    let mut model = DecisionModel::new();
    model.add_criterion("Price", 1.0);
    model.add_choice("Idle");

    let encoded = encode(&model);
    assert!(encoded.ends_with("__1-"));

    let decoded = decode(&encoded);
    assert_eq!(decoded, model);
    assert!(decoded.assignment(decoded.choices[0].id).is_some());
    assert!(decoded.evaluate().results.is_empty());
}

#[test]
fn legacy_strings_decode() {
    let decoded = decode("0~Price~2.0_1~Quality~-3.0__2~Cheap~Car_3~Nice__2-0~8.0 1~6.0_3-0~5.0");

    assert_eq!(decoded.criteria.len(), 2);
    assert_eq!(decoded.criteria[1].importance, -3.0);
    // The old format gave `~` no escape, so an entry with an extra field is skipped.
    assert_eq!(decoded.choices.len(), 1);
    assert_eq!(decoded.choices[0].name, "Nice");
    assert_eq!(decoded.assignments.len(), 1);
    assert_eq!(decoded.next_id(), 4);
}

#[test]
fn malformed_entries_are_skipped() {
    let decoded = decode(
        "0~Price~2.0_x~Bad~1.0_1~NoWeight~heavy_2~Quality~3.0__3~A_4_five~B_6~C__3-0~8.0 2~-1.0 9~4.0 junk_6-2~1e-3_7-0~1.0_zz-0~1.0",
    );

    let criteria: Vec<CriterionId> = decoded.criteria.iter().map(|c| c.id).collect();
    assert_eq!(criteria, [CriterionId(0), CriterionId(2)]);
    let choices: Vec<ChoiceId> = decoded.choices.iter().map(|c| c.id).collect();
    assert_eq!(choices, [ChoiceId(3), ChoiceId(6)]);

    let a = decoded.assignment(ChoiceId(3)).expect("A keeps its valid score");
    assert_eq!(a.scores.len(), 1);
    assert_eq!(a.scores.get(&CriterionId(0)).map(|s| s.value()), Some(8.0));

    let c = decoded.assignment(ChoiceId(6)).expect("exponent values parse");
    assert_eq!(c.scores.get(&CriterionId(2)).map(|s| s.value()), Some(0.001));

    assert!(decoded.assignment(ChoiceId(7)).is_none());
    assert_eq!(decoded.next_id(), 7);
}

#[test]
fn truncated_strings_keep_what_is_present() {
    let fixture = price_quality();
    let encoded = encode(&fixture.model);
    let cut = encoded.find("__").expect("segment delimiter");

    let decoded = decode(&encoded[..cut]);

    assert_eq!(decoded.criteria, fixture.model.criteria);
    assert!(decoded.choices.is_empty());
    assert!(decoded.evaluate().results.is_empty());
}

#[test]
fn duplicate_ids_keep_the_last_entry_in_first_position() {
    let decoded = decode("0~Price~1.0_1~Quality~1.0_0~Cost~4.0____");

    let names: Vec<&str> = decoded.criteria.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Cost", "Quality"]);
}

#[test]
fn new_ids_never_collide_with_restored_ones() {
    let mut decoded = decode("5~Price~1.0__9~A__9-5~2.0");

    let id = decoded.add_default_criterion();

    assert_eq!(id, CriterionId(10));
}

#[test]
fn share_link_replaces_existing_query() {
    let fixture = price_quality();

    let link = share_link("https://decide.example.com/?data=stale", &fixture.model);

    assert!(link.starts_with("https://decide.example.com/?data=0~Price~2.0_1~Quality~3.0__"));
    assert!(!link.contains("stale"));
    assert!(!link.contains(' '));
    assert!(link.contains("2-0~8.0%201~6.0"));
}
