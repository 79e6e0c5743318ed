use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{ArgGroup, Args};
use infer_client::cancellable::CancellationToken;
use infer_client::payload::{AudioSource, DEFAULT_MODEL, Engine, TranscribeRequest, url_input};
use infer_client::schemas::RunRequest;
use serde_json::Value;

use crate::context::CliContext;

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("source").required(true).args(["url", "file", "input"])))]
pub struct RunArgs {
    /// URL of the audio to transcribe.
    #[arg(long)]
    pub url: Option<String>,

    /// Local audio file, embedded in the request.
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Raw job input as a JSON object, sent as is.
    #[arg(long)]
    pub input: Option<String>,

    #[arg(long, default_value_t = Engine::default(), conflicts_with_all = ["input", "legacy"])]
    pub engine: Engine,

    #[arg(long, default_value = DEFAULT_MODEL, conflicts_with_all = ["input", "legacy"])]
    pub model: String,

    /// Ask for speaker diarization.
    #[arg(long, conflicts_with_all = ["input", "legacy"])]
    pub diarize: bool,

    /// Send `--url` as a `{"type": "url"}` input instead of a transcription request.
    #[arg(long, requires = "url")]
    pub legacy: bool,
}

pub fn handle_command(args: RunArgs, context: CliContext) -> anyhow::Result<()> {
    let request = build_request(&args)?;
    let endpoint = context
        .endpoint()
        .context("Failed to create the endpoint client")?;

    let cancellation = CancellationToken::new();
    {
        let cancellation = cancellation.clone();
        ctrlc::set_handler(move || {
            eprintln!("Interrupted, abandoning the request.");
            cancellation.cancel();
        })
        .context("Failed to install the Ctrl-C handler")?;
    }

    let result = endpoint
        .run_sync_with_cancel(&request, &cancellation)
        .with_context(|| format!("Job on endpoint {} did not complete", endpoint.id()))?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn build_request(args: &RunArgs) -> anyhow::Result<RunRequest> {
    if let Some(raw) = &args.input {
        let value: Value = serde_json::from_str(raw).context("Failed to parse --input as JSON")?;
        let Value::Object(input) = value else {
            bail!("--input must be a JSON object");
        };
        return Ok(RunRequest::new(input));
    }

    let source = match (&args.url, &args.file) {
        (Some(url), _) if args.legacy => return Ok(RunRequest::new(url_input(url.as_str()))),
        (Some(url), _) => AudioSource::Url(url.clone()),
        (None, Some(path)) => AudioSource::File(path.clone()),
        (None, None) => bail!("One of --url, --file or --input is required"),
    };

    let request = TranscribeRequest::new(source)
        .with_engine(args.engine)
        .with_model(args.model.as_str())
        .with_diarize(args.diarize)
        .into_run_request()?;
    Ok(request)
}
