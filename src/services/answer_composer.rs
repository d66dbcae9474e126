//! Prompt construction and answer delegation

use std::sync::Arc;
use tracing::{debug, instrument};

use super::key_rotating_client::KeyRotatingClient;
use crate::domain::models::QueryKind;

/// Phrases that mark a question as small talk
pub const SMALL_TALK_PHRASES: [&str; 9] = [
    "hi",
    "hello",
    "hey",
    "how are you",
    "good morning",
    "good afternoon",
    "good evening",
    "thanks",
    "thank you",
];

/// Classify `question` as small talk or a content question
///
/// Small talk is any question whose lowercased text contains one of
/// [`SMALL_TALK_PHRASES`] as a substring, so "Which chapter?" counts as
/// small talk through "hi".
pub fn classify(question: &str) -> QueryKind {
    let question = question.to_lowercase();

    if SMALL_TALK_PHRASES
        .iter()
        .any(|phrase| question.contains(phrase))
    {
        QueryKind::SmallTalk
    } else {
        QueryKind::Content
    }
}

/// Build the model prompt for `question`
///
/// Small talk ignores `context`; content questions embed both verbatim.
pub fn build_prompt(kind: QueryKind, question: &str, context: &str) -> String {
    match kind {
        QueryKind::SmallTalk => format!(
            "You are a friendly and helpful AI assistant named PDF Chatbot. \
             Respond to this greeting in a friendly and engaging way: {question} \
             Keep the response concise but warm and welcoming."
        ),
        QueryKind::Content => format!(
            "You are a helpful AI assistant. Answer the question based on the provided context. \
             Be friendly and conversational in your response. \
             If the question isn't related to the context, politely mention that you're here to help with the PDF content.\n\n\
             Context: {context}\n\n\
             Question: {question}\n\
             Answer: "
        ),
    }
}

/// Turns a question plus retrieved context into an answer
pub struct AnswerComposer {
    client: Arc<KeyRotatingClient>,
}

impl AnswerComposer {
    /// Compose answers through `client`
    pub fn new(client: Arc<KeyRotatingClient>) -> Self {
        Self { client }
    }

    /// Answer `question`; failures come back as their user-facing message
    #[instrument(skip_all)]
    pub async fn answer(&self, question: &str, context: &str) -> String {
        let kind = classify(question);
        debug!(?kind, context_len = context.len(), "composing prompt");

        let prompt = build_prompt(kind, question, context);
        self.client.generate(&prompt).await.into_message()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{ApiCredential, NO_CREDENTIALS_MESSAGE, TIMEOUT_MESSAGE};
    use crate::domain::ports::GenerationBackend;
    use crate::infrastructure::credentials::CredentialPool;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[test]
    fn test_greetings_are_small_talk() {
        for question in [
            "hello",
            "Hi!",
            "HEY there",
            "Hello, how are you?",
            "good morning",
            "Thanks a lot",
            "thank you so much",
        ] {
            assert_eq!(classify(question), QueryKind::SmallTalk, "{question}");
        }
    }

    #[test]
    fn test_phrases_match_inside_words() {
        for question in ["Which chapter covers this?", "Is this covered?", "They said so"] {
            assert_eq!(classify(question), QueryKind::SmallTalk, "{question}");
        }
    }

    #[test]
    fn test_content_questions() {
        for question in [
            "What is the refund policy?",
            "When does the warranty end?",
            "Is the morning good?",
            "",
        ] {
            assert_eq!(classify(question), QueryKind::Content, "{question}");
        }
    }

    #[test]
    fn test_content_prompt_embeds_context_and_question() {
        let prompt = build_prompt(QueryKind::Content, "Q?", "some context");
        assert!(prompt.contains("Context: some context\n\n"));
        assert!(prompt.contains("Question: Q?\nAnswer: "));
        assert!(prompt.contains("here to help with the PDF content"));
    }

    #[test]
    fn test_small_talk_prompt_ignores_context() {
        let prompt = build_prompt(QueryKind::SmallTalk, "hello", "secret context");
        assert!(prompt.contains("hello"));
        assert!(!prompt.contains("secret context"));
    }

    struct Recording(Mutex<Vec<String>>);

    #[async_trait]
    impl GenerationBackend for Recording {
        async fn generate(&self, _: &ApiCredential, prompt: &str) -> anyhow::Result<String> {
            self.0.lock().unwrap().push(prompt.to_string());
            Ok("answer".to_string())
        }
    }

    #[tokio::test]
    async fn test_answer_routes_through_client() {
        let backend = Arc::new(Recording(Mutex::new(Vec::new())));
        let client = KeyRotatingClient::new(
            Arc::new(CredentialPool::from_keys(["key-a"])),
            backend.clone(),
        );
        let composer = AnswerComposer::new(Arc::new(client));

        assert_eq!(composer.answer("What is X?", "X is Y.").await, "answer");
        let prompts = backend.0.lock().unwrap();
        assert!(prompts[0].contains("Context: X is Y."));
    }

    #[tokio::test]
    async fn test_answer_returns_failure_message() {
        let client = KeyRotatingClient::new(
            Arc::new(CredentialPool::from_keys(Vec::<String>::new())),
            Arc::new(Recording(Mutex::new(Vec::new()))),
        );
        let composer = AnswerComposer::new(Arc::new(client));

        let answer = composer.answer("hello", "").await;
        assert_eq!(answer, NO_CREDENTIALS_MESSAGE);
        assert_ne!(answer, TIMEOUT_MESSAGE);
    }
}
