//! Builders for the job inputs understood by the transcription handler.

use std::fmt::{Debug, Formatter};
use std::path::PathBuf;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;
use strum::{Display, EnumString};

use crate::error::ClientError;
use crate::schemas::{JobInput, RunRequest};

pub const DEFAULT_MODEL: &str = "ivrit-ai/whisper-large-v3-turbo-ct2";

/// Input of the form `{"type": "url", "url": ...}`.
pub fn url_input(url: impl Into<String>) -> JobInput {
    let mut input = JobInput::new();
    input.insert("type".to_string(), Value::String("url".to_string()));
    input.insert("url".to_string(), Value::String(url.into()));
    input
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum Engine {
    #[default]
    FasterWhisper,
    StableWhisper,
}

#[derive(Clone)]
pub enum AudioSource {
    /// Audio fetched by the worker itself.
    Url(String),
    /// Audio bytes embedded in the payload.
    Blob(Vec<u8>),
    /// Local file, embedded the same way as [AudioSource::Blob].
    File(PathBuf),
}

impl Debug for AudioSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            AudioSource::Url(url) => f.debug_tuple("Url").field(url).finish(),
            AudioSource::Blob(bytes) => write!(f, "Blob({} bytes)", bytes.len()),
            AudioSource::File(path) => f.debug_tuple("File").field(path).finish(),
        }
    }
}

/// A transcription job.
///
/// ```
/// use infer_client::payload::{AudioSource, Engine, TranscribeRequest};
///
/// let input = TranscribeRequest::new(AudioSource::Url("https://example.com/a.mp3".into()))
///     .with_engine(Engine::StableWhisper)
///     .into_input()
///     .unwrap();
///
/// assert_eq!(input["engine"], "stable-whisper");
/// assert_eq!(input["transcribe_args"]["url"], "https://example.com/a.mp3");
/// ```
#[derive(Debug, Clone)]
pub struct TranscribeRequest {
    source: AudioSource,
    engine: Engine,
    model: String,
    streaming: bool,
    diarize: bool,
}

impl TranscribeRequest {
    pub fn new(source: AudioSource) -> Self {
        Self {
            source,
            engine: Engine::default(),
            model: DEFAULT_MODEL.to_string(),
            streaming: false,
            diarize: false,
        }
    }

    pub fn with_engine(mut self, engine: Engine) -> Self {
        self.engine = engine;
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Ask the handler to produce its segments incrementally.
    pub fn with_streaming(mut self, streaming: bool) -> Self {
        self.streaming = streaming;
        self
    }

    pub fn with_diarize(mut self, diarize: bool) -> Self {
        self.diarize = diarize;
        self
    }

    pub fn into_input(self) -> Result<JobInput, ClientError> {
        let mut transcribe_args = JobInput::new();
        match self.source {
            AudioSource::Url(url) => {
                transcribe_args.insert("url".to_string(), Value::String(url));
            }
            AudioSource::Blob(bytes) => {
                transcribe_args.insert("blob".to_string(), Value::String(STANDARD.encode(bytes)));
            }
            AudioSource::File(path) => {
                let bytes = std::fs::read(&path).map_err(|e| {
                    ClientError::Configuration(format!(
                        "Failed to read audio file {}: {e}",
                        path.display()
                    ))
                })?;
                transcribe_args.insert("blob".to_string(), Value::String(STANDARD.encode(bytes)));
            }
        }
        if self.diarize {
            transcribe_args.insert("diarize".to_string(), Value::Bool(true));
        }

        let mut input = JobInput::new();
        input.insert("engine".to_string(), Value::String(self.engine.to_string()));
        input.insert("model".to_string(), Value::String(self.model));
        input.insert("streaming".to_string(), Value::Bool(self.streaming));
        input.insert("transcribe_args".to_string(), Value::Object(transcribe_args));

        Ok(input)
    }

    pub fn into_run_request(self) -> Result<RunRequest, ClientError> {
        self.into_input().map(RunRequest::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn url_input_has_the_legacy_shape() {
        assert_eq!(
            Value::Object(url_input("https://example.com/a.mp3")),
            json!({"type": "url", "url": "https://example.com/a.mp3"})
        );
    }

    #[test]
    fn defaults_match_the_handler_defaults() {
        let input = TranscribeRequest::new(AudioSource::Url("https://example.com/a.mp3".into()))
            .into_input()
            .unwrap();

        assert_eq!(
            Value::Object(input),
            json!({
                "engine": "faster-whisper",
                "model": DEFAULT_MODEL,
                "streaming": false,
                "transcribe_args": {"url": "https://example.com/a.mp3"},
            })
        );
    }

    #[test]
    fn blob_is_base64_encoded() {
        let input = TranscribeRequest::new(AudioSource::Blob(b"hello".to_vec()))
            .with_diarize(true)
            .into_input()
            .unwrap();

        assert_eq!(
            input["transcribe_args"],
            json!({"blob": "aGVsbG8=", "diarize": true})
        );
    }

    #[test]
    fn file_source_is_read_into_a_blob() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"hello").unwrap();

        let input = TranscribeRequest::new(AudioSource::File(file.path().to_path_buf()))
            .with_model("custom/model")
            .with_streaming(true)
            .into_input()
            .unwrap();

        assert_eq!(input["transcribe_args"]["blob"], "aGVsbG8=");
        assert_eq!(input["model"], "custom/model");
        assert_eq!(input["streaming"], true);
    }

    #[test]
    fn missing_file_is_a_configuration_error() {
        let err = TranscribeRequest::new(AudioSource::File("/nonexistent/audio.opus".into()))
            .into_input()
            .unwrap_err();

        assert!(matches!(err, ClientError::Configuration(_)));
    }

    #[test]
    fn engine_parses_from_handler_names() {
        assert_eq!("stable-whisper".parse::<Engine>().unwrap(), Engine::StableWhisper);
        assert_eq!(Engine::FasterWhisper.to_string(), "faster-whisper");
        assert!("whisper.cpp".parse::<Engine>().is_err());
    }
}
