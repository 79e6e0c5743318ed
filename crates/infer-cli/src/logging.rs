use env_logger::{Builder, Env};

/// Logger for the CLI. Quiet by default, `RUST_LOG` takes precedence.
pub fn init_logger() -> Builder {
    let mut builder = Builder::from_env(Env::default().default_filter_or("warn"));
    builder.format_timestamp(None);
    builder
}
