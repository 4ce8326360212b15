//! In-process test doubles for the AI and search backends.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use seowriter_provider::AiProvider;
use seowriter_research::SearchBackend;
use seowriter_shared::{Result, SearchHit, SeoWriterError};

/// Replies with queued responses in order and records every prompt.
pub(crate) struct ScriptedProvider {
    replies: Mutex<VecDeque<Result<String>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub(crate) fn new(replies: Vec<Result<String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn replying(replies: &[&str]) -> Self {
        Self::new(replies.iter().map(|r| Ok((*r).to_string())).collect())
    }

    pub(crate) fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl AiProvider for ScriptedProvider {
    async fn generate_content(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(SeoWriterError::provider("Scripted", "no reply queued")))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Returns a fixed hit list, or fails every call.
pub(crate) struct StubSearch(pub(crate) Option<Vec<SearchHit>>);

#[async_trait]
impl SearchBackend for StubSearch {
    async fn search(&self, _query: &str, max_results: usize) -> Result<Vec<SearchHit>> {
        match &self.0 {
            Some(hits) => Ok(hits.iter().take(max_results).cloned().collect()),
            None => Err(SeoWriterError::Network("search backend unreachable".into())),
        }
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

pub(crate) fn sample_hits() -> Vec<SearchHit> {
    vec![
        SearchHit {
            title: "Coffee buying guide".into(),
            url: "https://coffee.example.com/guide".into(),
            snippet: "Espresso machines range from manual levers to super-automatics.".into(),
        },
        SearchHit {
            title: "آلات القهوة".into(),
            url: "https://ar.example.com/coffee".into(),
            snippet: "أفضل آلات القهوة المنزلية لعام 2026.".into(),
        },
    ]
}
