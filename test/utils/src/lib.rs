/// A `/run` body as produced by a full research loop: tool calls, agent
/// chatter, leaked JSON, the report itself, and the evaluator's verdict
/// followed by a trailing hand-off that must never reach the user.
pub fn research_events_fixture() -> &'static str {
    return r###"
[
    {"functionCall": {"name": "google_search"}},
    {"content": "Okay, I will search for recent studies on solar adoption."},
    {"content": {"role": "model", "parts": [{"text": "Solar capacity grew 24% year over year."}]}},
    {"content": "{\"report\": \"draft\"}"},
    {"content": {"role": "model", "parts": [{"functionCall": {"name": "fact_check"}}, {"text": "Claims verified against two sources."}]}},
    {"content": "## Report\nSolar is now the cheapest source of new electricity.\n\nFinal Evaluation: Approved. The report is ready."},
    {"content": "I will await further instructions."}
]
"###
    .trim();
}

/// A `/run` body where the pipeline never reached a verdict.
pub fn unfinished_events_fixture() -> &'static str {
    return r###"
[
    {"functionCall": {"name": "google_search"}},
    {"content": "Findings summarized here."},
    {"content": "Understood. Passing to the Synthesis_Agent."},
    {"functionCall": {}},
    {"content": {"parts": [{"text": "Draft synthesis with two sections."}]}}
]
"###
    .trim();
}
