//! Article writing: plan + research → long-form Markdown.
//!
//! Length, language, tone and formatting are requested through the prompt
//! only; the reply is returned as-is.

use tracing::{info, instrument};

use seowriter_provider::AiProvider;
use seowriter_shared::{Article, ContentPlan, LanguagePolicy, ResearchResult, Result, SeoWriterError};

/// Writes the full article with an AI backend.
pub struct ArticleWriter<'a> {
    provider: &'a dyn AiProvider,
    language: LanguagePolicy,
}

impl<'a> ArticleWriter<'a> {
    pub fn new(provider: &'a dyn AiProvider, language: LanguagePolicy) -> Self {
        Self { provider, language }
    }

    #[instrument(skip_all, fields(main_topic = %plan.main_topic, language = ?self.language))]
    pub async fn write_article(
        &self,
        plan: &ContentPlan,
        research: &ResearchResult,
    ) -> Result<Article> {
        let plan_block = render_plan(plan)?;
        let prompt = build_article_prompt(&plan_block, &research.joined_snippets(), &self.language);

        let article = Article::new(self.provider.generate_content(&prompt).await?);
        info!(words = article.word_count(), "article drafted");
        Ok(article)
    }
}

/// Render a plan as indented JSON for the prompt.
///
/// Keys follow the struct's field order and non-ASCII text is kept verbatim.
pub fn render_plan(plan: &ContentPlan) -> Result<String> {
    serde_json::to_string_pretty(plan)
        .map_err(|e| SeoWriterError::parse(format!("failed to render content plan: {e}")))
}

fn language_rules(policy: &LanguagePolicy) -> (String, String) {
    match policy {
        LanguagePolicy::Fixed(lang) => (
            format!(
                "The article MUST be written in **{lang}**. Do NOT switch to any other \
                 language, even if the keywords or research are in another language."
            ),
            format!("Ensure the output is 100% {lang}."),
        ),
        LanguagePolicy::MatchPlan => (
            "Write the article in the same language as the content plan.".to_string(),
            "Keep the whole article in that one language.".to_string(),
        ),
    }
}

fn build_article_prompt(plan_block: &str, snippets: &str, language: &LanguagePolicy) -> String {
    let (language_rule, closing_rule) = language_rules(language);
    format!(
        r#"You are a professional SEO copywriter.

# Content Plan
{plan_block}

# Research Context
{snippets}

# Assignment
Write a high-quality, comprehensive article based strictly on the plan above.

# Requirements
1. **Format**: Markdown with H1, H2 and H3 headings and bullet points.
2. **Length**: In-depth coverage, 1000+ words.
3. **Tone**: Professional and authoritative, yet accessible.
4. **SEO**: Work the plan's secondary keywords in naturally.
5. **Structure**: Follow the outline in order.
6. **Language**: {language_rule}
7. **Callouts**: Use blockquotes (>) for tips and key takeaways.

Do not add conversational filler before or after the article. Start directly with the H1 title.
{closing_rule}
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedProvider, sample_hits};

    fn arabic_plan() -> ContentPlan {
        let mut plan = ContentPlan::fallback("آلات القهوة");
        plan.main_topic = "دليل شامل لآلات القهوة".into();
        plan.secondary_keywords = vec!["إسبريسو".into(), "مطحنة".into()];
        plan
    }

    #[test]
    fn render_plan_keeps_field_order_and_script() {
        let rendered = render_plan(&arabic_plan()).unwrap();
        assert!(rendered.contains("دليل شامل لآلات القهوة"));
        assert!(!rendered.contains("\\u"));

        let order: Vec<_> = [
            "\"main_topic\"",
            "\"search_intent\"",
            "\"target_audience\"",
            "\"outline\"",
            "\"secondary_keywords\"",
        ]
        .iter()
        .map(|key| rendered.find(key).expect("key present"))
        .collect();
        assert!(order.windows(2).all(|w| w[0] < w[1]), "order: {order:?}");
    }

    #[test]
    fn fixed_language_prompt() {
        let prompt = build_article_prompt("{}", "", &LanguagePolicy::Fixed("Arabic".into()));
        assert!(prompt.contains("MUST be written in **Arabic**"));
        assert!(prompt.contains("Ensure the output is 100% Arabic."));
        assert!(prompt.contains("1000+ words"));
        assert!(prompt.contains("blockquotes (>)"));
    }

    #[test]
    fn match_plan_language_prompt() {
        let prompt = build_article_prompt("{}", "", &LanguagePolicy::MatchPlan);
        assert!(prompt.contains("same language as the content plan"));
        assert!(!prompt.contains("100%"));
    }

    #[tokio::test]
    async fn write_article_returns_reply_verbatim() {
        let reply = "# دليل شامل لآلات القهوة\n\nمقدمة.\n";
        let provider = ScriptedProvider::replying(&[reply]);
        let writer = ArticleWriter::new(&provider, LanguagePolicy::Fixed("Arabic".into()));

        let article = writer
            .write_article(&arabic_plan(), &ResearchResult::new(sample_hits()))
            .await
            .unwrap();
        assert_eq!(article.markdown, reply);

        let prompt = &provider.prompts()[0];
        assert!(prompt.contains("\"إسبريسو\""));
        assert!(prompt.contains("Espresso machines range"));
    }

    #[tokio::test]
    async fn write_article_propagates_backend_errors() {
        let provider = ScriptedProvider::new(vec![Err(SeoWriterError::provider(
            "Gemini",
            "deadline exceeded",
        ))]);
        let writer = ArticleWriter::new(&provider, LanguagePolicy::MatchPlan);

        let err = writer
            .write_article(&arabic_plan(), &ResearchResult::empty())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("deadline exceeded"));
    }
}
