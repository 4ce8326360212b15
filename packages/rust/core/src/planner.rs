//! Content planning: keyword + research → structured outline.
//!
//! The AI is asked for a JSON object, but models wrap it in prose or code
//! fences often enough that we only trust the span between the first `{` and
//! the last `}`. Anything unparseable degrades to [`ContentPlan::fallback`].

use tracing::{debug, info, instrument, warn};

use seowriter_provider::AiProvider;
use seowriter_shared::{ContentPlan, Outcome, ResearchResult, Result, SeoWriterError};

use crate::keyword::Keyword;

/// Builds a [`ContentPlan`] with an AI backend.
pub struct ContentPlanner<'a> {
    provider: &'a dyn AiProvider,
}

impl<'a> ContentPlanner<'a> {
    pub fn new(provider: &'a dyn AiProvider) -> Self {
        Self { provider }
    }

    /// Ask the backend for a plan and parse its reply.
    ///
    /// Only backend errors propagate. Every reply, malformed or not, yields a
    /// plan: either [`Outcome::Fresh`] or the fallback plan.
    #[instrument(skip_all, fields(keyword = %keyword, snippets = research.len()))]
    pub async fn create_plan(
        &self,
        keyword: &Keyword,
        research: &ResearchResult,
    ) -> Result<Outcome<ContentPlan>> {
        let prompt = build_plan_prompt(keyword.as_str(), &research.joined_snippets());
        let reply = self.provider.generate_content(&prompt).await?;

        let outcome = parse_plan_reply(&reply, keyword.as_str());
        info!(
            main_topic = %outcome.value().main_topic,
            sections = outcome.value().outline.len(),
            fallback = outcome.is_fallback(),
            "content plan ready"
        );
        Ok(outcome)
    }
}

/// Parse an AI reply into a plan, substituting the fallback on failure.
pub fn parse_plan_reply(reply: &str, keyword: &str) -> Outcome<ContentPlan> {
    match extract_plan(reply) {
        Ok(plan) => Outcome::Fresh(plan),
        Err(e) => {
            warn!(error = %e, "error parsing plan JSON, using fallback plan");
            debug!(raw_response = %reply, "unparseable plan reply");
            Outcome::Fallback {
                value: ContentPlan::fallback(keyword),
                reason: e.to_string(),
            }
        }
    }
}

/// Parse the span from the first `{` to the last `}` as a plan.
fn extract_plan(reply: &str) -> Result<ContentPlan> {
    let span = match (reply.find('{'), reply.rfind('}')) {
        (Some(start), Some(end)) if end > start => &reply[start..=end],
        _ => return Err(SeoWriterError::parse("no JSON block found in AI response")),
    };

    serde_json::from_str(span).map_err(|e| SeoWriterError::parse(format!("invalid plan JSON: {e}")))
}

fn build_plan_prompt(keyword: &str, snippets: &str) -> String {
    format!(
        r#"You are an SEO content strategist.
Target keyword: "{keyword}"

Research context from the top search results:
{snippets}

Task: create a detailed content plan for an article targeting this keyword.
Identify the searcher's intent and structure the article to satisfy it.

Respond with valid JSON only, using exactly this structure:
{{
    "main_topic": "Engaging H1 title",
    "search_intent": "informational|transactional|commercial|navigational",
    "target_audience": "Who the article is for",
    "outline": [
        {{"heading": "Section H2 title", "subheadings": ["H3 point 1", "H3 point 2"], "notes": "What to cover here"}}
    ],
    "secondary_keywords": ["keyword1", "keyword2", "keyword3"]
}}
"#
    )
}
