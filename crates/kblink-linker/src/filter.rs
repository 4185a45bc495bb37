//! Plausibility filtering
//!
//! A definitional question ("what is X") about a person is treated as
//! ill-posed: the template expects an abstract answer, not a
//! biographical one, so human-typed candidates are pruned here rather
//! than later in answer generation.

use kblink_core::Fact;

/// Question openers that expect a definitional answer.
const WHAT_IS_TEMPLATES: [&str; 4] = ["what is", "what are", "what was", "what does"];

/// Wikidata "instance of" property.
const PROPERTY_INSTANCE_OF: &str = "P31";

/// Wikidata identifier for the class "human".
const ID_HUMAN: &str = "Q5";

/// Drop fact lists describing humans when the question opens with a
/// definitional template.
///
/// The output may be shorter than the input: a dropped candidate
/// leaves no placeholder behind. Surviving lists keep their relative
/// order. Requires `question_tokens.len() >= 2`; the orchestrator
/// checks this before calling.
pub fn filter_implausible(
    fact_lists: Vec<Vec<Fact>>,
    question_tokens: &[String],
) -> Vec<Vec<Fact>> {
    let question_begin = format!(
        "{} {}",
        question_tokens[0].to_lowercase(),
        question_tokens[1].to_lowercase()
    );
    let is_definitional = WHAT_IS_TEMPLATES.contains(&question_begin.as_str());

    fact_lists
        .into_iter()
        .filter(|facts| {
            let entity_is_human = facts
                .iter()
                .any(|f| f.property() == PROPERTY_INSTANCE_OF && f.value() == ID_HUMAN);
            !(is_definitional && entity_is_human)
        })
        .collect()
}
