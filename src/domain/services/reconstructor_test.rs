use anyhow::Result;
use serde_json::json;
use serde_json::Value;
use test_utils::research_events_fixture;
use test_utils::unfinished_events_fixture;

use super::reconstruct;
use super::Reconstructor;
use super::FILLER_PHRASES;
use crate::domain::models::ResponseEvent;

fn events(value: Value) -> Vec<ResponseEvent> {
    return value
        .as_array()
        .unwrap()
        .iter()
        .map(ResponseEvent::from_value)
        .collect();
}

#[test]
fn it_joins_plain_text_and_planning_steps_in_order() {
    let res = reconstruct(&events(json!([
        {"functionCall": {"name": "google_search"}},
        {"content": "Findings summarized here."}
    ])));

    assert_eq!(
        res,
        Some("Planning step: google_search\nFindings summarized here.".to_string())
    );
}

#[test]
fn it_drops_leaked_json() {
    let res = reconstruct(&events(json!([
        {"content": "{\"report\": \"...\"}"},
        {"content": "   {\"indented\": true}"},
        {"content": "\"report\": {\"sections\": []}"}
    ])));

    assert_eq!(res, None);
}

#[test]
fn it_keeps_text_that_only_contains_json() {
    let res = reconstruct(&events(json!([
        {"content": "The summary is {\"a\": 1}"}
    ])));

    assert_eq!(res, Some("The summary is {\"a\": 1}".to_string()));
}

#[test]
fn it_drops_every_filler_phrase() {
    for phrase in FILLER_PHRASES {
        let content = format!("Useful facts. {phrase} More useful facts.");
        let res = reconstruct(&events(json!([{ "content": content }])));
        assert_eq!(res, None, "{phrase} was not dropped");
    }
}

#[test]
fn it_matches_filler_phrases_case_sensitively() {
    let res = reconstruct(&events(json!([
        {"content": "i understand the data shows growth."}
    ])));

    assert_eq!(res, Some("i understand the data shows growth.".to_string()));
}

#[test]
fn it_truncates_at_the_final_marker() {
    let res = reconstruct(&events(json!([
        {"content": "Report body.\nFinal Evaluation: Approved. Anything after is dropped."}
    ])));

    assert_eq!(res, Some("Report body.\nFinal Evaluation: Approved".to_string()));
}

#[test]
fn it_discards_prior_parts_and_stops_on_the_final_marker() {
    let res = reconstruct(&events(json!([
        {"content": "Okay, I will search."},
        {"content": "Solar panels reduce emissions by 40%."},
        {"content": "Final Recommendation: Adopt solar at scale."},
        {"content": "Another paragraph that arrives too late."}
    ])));

    assert_eq!(res, Some("Final Recommendation:".to_string()));
}

#[test]
fn it_checks_markers_in_their_listed_order() {
    let res = reconstruct(&events(json!([
        {"content": "Final Assessment: solid. Final Recommendation: publish."}
    ])));

    assert_eq!(
        res,
        Some("Final Assessment: solid. Final Recommendation:".to_string())
    );
}

#[test]
fn it_prefers_the_drop_rules_over_the_final_marker() {
    let res = reconstruct(&events(json!([
        {"content": "Understood. Final Evaluation: Approved"},
        {"content": "{\"verdict\": \"Final Assessment: ok\"}"},
        {"content": "Draft."}
    ])));

    assert_eq!(res, Some("Draft.".to_string()));
}

#[test]
fn it_lets_the_final_marker_win_over_function_calls() {
    let res = reconstruct(&events(json!([
        {"content": "Earlier text."},
        {"functionCall": {"name": "fact_check"}, "content": "Final Assessment: verified"}
    ])));

    assert_eq!(res, Some("Final Assessment:".to_string()));
}

#[test]
fn it_drops_function_calls_whose_content_is_chatter() {
    let res = reconstruct(&events(json!([
        {"functionCall": {"name": "fact_check"}, "content": "Okay, great! Checking."},
        {"content": "Checked."}
    ])));

    assert_eq!(res, Some("Checked.".to_string()));
}

#[test]
fn it_names_unnamed_function_calls() {
    let res = reconstruct(&events(json!([{"functionCall": {"args": {}}}])));
    assert_eq!(res, Some("Planning step: Unknown function".to_string()));
}

#[test]
fn it_keeps_text_verbatim() {
    let res = reconstruct(&events(json!([
        {"content": "  indented line  "},
        {"content": {"parts": [{"text": "first"}, {"text": "second\n"}]}}
    ])));

    assert_eq!(res, Some("  indented line  \nsecond\n".to_string()));
}

#[test]
fn it_returns_none_without_displayable_text() {
    let res = reconstruct(&events(json!([
        {"content": "   "},
        {"content": {"parts": []}},
        {},
        "not an event"
    ])));

    assert_eq!(res, None);
}

#[test]
fn it_returns_none_for_no_events() {
    assert_eq!(reconstruct(&[]), None);
}

#[test]
fn it_ignores_input_once_done() {
    let mut reconstructor = Reconstructor::default();
    reconstructor.push(&ResponseEvent::PlainText(
        "Final Evaluation: Approved".to_string(),
    ));
    assert!(reconstructor.is_done());

    reconstructor.push(&ResponseEvent::PlainText("Late addition.".to_string()));
    reconstructor.push(&ResponseEvent::FunctionCall {
        name: Some("generate_citations".to_string()),
        content: None,
    });

    assert_eq!(
        reconstructor.finish(),
        Some("Final Evaluation: Approved".to_string())
    );
}

#[test]
fn it_reconstructs_a_full_research_run() -> Result<()> {
    let events: Vec<ResponseEvent> = serde_json::from_str(research_events_fixture())?;
    let res = reconstruct(&events);

    insta::assert_snapshot!(res.unwrap(), @r###"
    ## Report
    Solar is now the cheapest source of new electricity.

    Final Evaluation: Approved
    "###);

    return Ok(());
}

#[test]
fn it_reconstructs_an_unfinished_run() -> Result<()> {
    let events: Vec<ResponseEvent> = serde_json::from_str(unfinished_events_fixture())?;
    let res = reconstruct(&events);

    insta::assert_snapshot!(res.unwrap(), @r###"
    Planning step: google_search
    Findings summarized here.
    Planning step: Unknown function
    Draft synthesis with two sections.
    "###);

    return Ok(());
}
