use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use infer_client::config::DEFAULT_TIMEOUT;
use log::{debug, warn};
use url::Url;

use crate::app_config::AppConfig;
use crate::commands;
use crate::context::CliContext;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct CliArgs {
    #[command(flatten)]
    pub endpoint: EndpointArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone)]
pub struct EndpointArgs {
    /// API key used to authenticate against the endpoint.
    #[arg(long, env = "RUNPOD_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Identifier of the endpoint to submit jobs to.
    #[arg(long, env = "RUNPOD_ENDPOINT_ID", global = true)]
    pub endpoint_id: Option<String>,

    /// Base URL of the inference API.
    #[arg(long, env = "RUNPOD_API_URL", global = true)]
    pub base_url: Option<Url>,

    /// Maximum time to wait for a result, in seconds.
    #[arg(long, default_value_t = DEFAULT_TIMEOUT.as_secs(), global = true)]
    pub timeout: u64,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Submit a job and wait for its result.
    Run(commands::run::RunArgs),
    /// Show worker and job counters of the endpoint.
    Health,
    /// Save an API key for later invocations.
    Login,
}

pub fn cli_main() -> anyhow::Result<()> {
    let time_begin = Instant::now();
    let args = CliArgs::parse();

    let app_config = match AppConfig::new() {
        Ok(app_config) => Some(app_config),
        Err(e) => {
            warn!("Saved credentials are unavailable: {e}");
            None
        }
    };
    let context = CliContext::new(args.endpoint, app_config);

    let cli_res = match args.command {
        Commands::Run(run_args) => commands::run::handle_command(run_args, context),
        Commands::Health => commands::health::handle_command(context),
        Commands::Login => commands::login::handle_command(context),
    };

    debug!("Command finished in {:?}", time_begin.elapsed());
    cli_res
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rstest::rstest;

    #[test]
    fn verify_cli() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn global_flags_are_accepted_before_the_subcommand() {
        let args = CliArgs::try_parse_from([
            "infer",
            "--endpoint-id",
            "ep-1",
            "--timeout",
            "5",
            "run",
            "--url",
            "https://example.com/a.mp3",
        ])
        .unwrap();

        assert_eq!(args.endpoint.endpoint_id.as_deref(), Some("ep-1"));
        assert_eq!(args.endpoint.timeout, 5);
        assert!(matches!(args.command, Commands::Run(_)));
    }

    #[test]
    fn run_requires_an_audio_source_or_raw_input() {
        assert!(CliArgs::try_parse_from(["infer", "run"]).is_err());
    }

    #[test]
    fn base_url_is_read_from_the_environment() {
        // SAFETY: no other test sets this variable or asserts on the base url.
        unsafe { std::env::set_var("RUNPOD_API_URL", "http://localhost:9/v2/") };
        let parsed = CliArgs::try_parse_from(["infer", "health"]);
        unsafe { std::env::remove_var("RUNPOD_API_URL") };

        let args = parsed.unwrap();
        assert_eq!(
            args.endpoint.base_url.map(String::from).as_deref(),
            Some("http://localhost:9/v2/")
        );
    }

    #[rstest]
    #[case::engine_with_raw_input(&["--input", "{}", "--engine", "stable-whisper"])]
    #[case::model_with_raw_input(&["--input", "{}", "--model", "large-v3"])]
    #[case::diarize_with_legacy(&["--url", "https://example.com/a.mp3", "--legacy", "--diarize"])]
    #[case::engine_with_legacy(&["--url", "https://example.com/a.mp3", "--legacy", "--engine", "faster-whisper"])]
    fn transcription_options_conflict_with_verbatim_inputs(#[case] run_flags: &[&str]) {
        let argv = ["infer", "run"].iter().chain(run_flags).copied();

        let err = CliArgs::try_parse_from(argv).unwrap_err();

        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn transcription_options_apply_to_url_sources() {
        let args = CliArgs::try_parse_from([
            "infer",
            "run",
            "--url",
            "https://example.com/a.mp3",
            "--engine",
            "stable-whisper",
            "--diarize",
        ]);

        assert!(args.is_ok());
    }
}
