//! Prompt builder for podcast script generation.
//!
//! [`PromptBuilder`] constructs two kinds of prompts:
//! * **Flat** (`build`) — single string, for Gemini `generateContent`.
//! * **Chat** (`build_chat`) — `(system_msg, user_msg)` tuple for any
//!   OpenAI-compatible `/v1/chat/completions` endpoint.
//!
//! Both carry the same content: the topic, a word budget taken from
//! [`PodcastLength::word_count`], and the structural requirements every
//! episode must meet.

use crate::podcast::PodcastLength;

// ---------------------------------------------------------------------------
// Instructions
// ---------------------------------------------------------------------------

/// Persona and delivery rules.
const HOST_INSTRUCTION: &str = "\
You are the host of a podcast, writing the words you will read aloud.
Write in a warm, conversational tone, as if talking to a single listener.
Reply with ONLY the script text: no stage directions, no sound cues, no
speaker labels and no markdown.";

/// Required episode structure.
const STRUCTURE_REQUIREMENTS: &str = "\
The script must include:
- An engaging introduction
- A clear structure
- Relevant examples
- A concise conclusion";

// ---------------------------------------------------------------------------
// PromptBuilder
// ---------------------------------------------------------------------------

/// Builds script-generation prompts in either flat or chat-message format.
///
/// # Example
/// ```rust
/// use podcast_studio::llm::PromptBuilder;
/// use podcast_studio::podcast::PodcastLength;
///
/// let prompt = PromptBuilder::new().build("Coral reefs", PodcastLength::TwoMinutes);
/// assert!(prompt.contains("300 words"));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build a **flat** prompt string.
    ///
    /// Structure (in order):
    /// 1. Host instruction
    /// 2. The request (topic + word budget)
    /// 3. Structure requirements
    pub fn build(&self, topic: &str, length: PodcastLength) -> String {
        let mut prompt = String::with_capacity(1024);
        prompt.push_str(HOST_INSTRUCTION);
        prompt.push_str("\n\n");
        prompt.push_str(&self.request(topic, length));
        prompt
    }

    /// Build a **(system_msg, user_msg)** pair.
    ///
    /// * `system_msg` — the host instruction.
    /// * `user_msg` — the request with its word target and structure.
    pub fn build_chat(&self, topic: &str, length: PodcastLength) -> (String, String) {
        (HOST_INSTRUCTION.to_string(), self.request(topic, length))
    }

    fn request(&self, topic: &str, length: PodcastLength) -> String {
        format!(
            "Write a podcast script about: {topic}\n\
             Target length: approximately {words} words ({id} of speech).\n\n\
             {STRUCTURE_REQUIREMENTS}\n\n\
             It should sound natural and engaging, like a real host speaking.",
            topic = topic.trim(),
            words = length.word_count(),
            id = length.id(),
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
