//! Google Cloud Text-to-Speech synthesizer.
//!
//! POSTs the script and the fixed voice configuration to
//! `{base_url}/v1/text:synthesize` and decodes the base64 `audioContent`
//! field into an [`AudioClip`].

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};

use crate::config::{SpeechConfig, SsmlGender, VoiceConfig, TTS_API_KEY_VAR};
use crate::http::{client_with_timeout, ensure_success};
use crate::podcast::{AudioClip, AudioEncoding};
use crate::tts::synthesizer::{SpeechSynthesizer, TtsError};

// ---------------------------------------------------------------------------
// Wire schema
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct SynthesizeRequest<'a> {
    input: SynthesisInput<'a>,
    voice: VoiceSelection<'a>,
    #[serde(rename = "audioConfig")]
    audio_config: AudioConfig,
}

#[derive(Debug, Serialize)]
struct SynthesisInput<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceSelection<'a> {
    language_code: &'a str,
    name: &'a str,
    ssml_gender: SsmlGender,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AudioConfig {
    audio_encoding: AudioEncoding,
    speaking_rate: f32,
    pitch: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeResponse {
    audio_content: Option<String>,
}

impl<'a> SynthesizeRequest<'a> {
    fn new(text: &'a str, voice: &'a VoiceConfig) -> Self {
        Self {
            input: SynthesisInput { text },
            voice: VoiceSelection {
                language_code: &voice.language_code,
                name: &voice.name,
                ssml_gender: voice.ssml_gender,
            },
            audio_config: AudioConfig {
                audio_encoding: voice.audio_encoding,
                speaking_rate: voice.speaking_rate,
                pitch: voice.pitch,
            },
        }
    }
}

/// Decode the `audioContent` of a response body.
fn parse_response(body: &str, encoding: AudioEncoding) -> Result<AudioClip, TtsError> {
    let response: SynthesizeResponse =
        serde_json::from_str(body).map_err(|e| TtsError::Parse(e.to_string()))?;

    let payload = response
        .audio_content
        .ok_or_else(|| TtsError::Parse("response has no audioContent".into()))?;

    let bytes = BASE64.decode(payload.trim())?;
    if bytes.is_empty() {
        return Err(TtsError::EmptyAudio);
    }

    Ok(AudioClip::new(bytes, encoding))
}

// ---------------------------------------------------------------------------
// GoogleTtsSynthesizer
// ---------------------------------------------------------------------------

/// Speech synthesizer backed by Google Cloud Text-to-Speech.
pub struct GoogleTtsSynthesizer {
    client: reqwest::Client,
    config: SpeechConfig,
}

impl GoogleTtsSynthesizer {
    pub fn from_config(config: &SpeechConfig) -> Self {
        Self {
            client: client_with_timeout(config.timeout_secs),
            config: config.clone(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1/text:synthesize",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleTtsSynthesizer {
    async fn synthesize(&self, script: &str) -> Result<AudioClip, TtsError> {
        let key = self.config.credential().ok_or(TtsError::MissingApiKey {
            env_var: TTS_API_KEY_VAR,
        })?;

        if script.trim().is_empty() {
            return Err(TtsError::EmptyScript);
        }

        let voice = &self.config.voice;
        let request = SynthesizeRequest::new(script, voice);

        log::debug!(
            "tts: synthesising {} chars with voice {}",
            script.chars().count(),
            voice.name
        );

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(key)
            .json(&request)
            .send()
            .await?;
        let response = ensure_success(response).await?;
        let text = response.text().await?;

        parse_response(&text, voice.audio_encoding)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
