use srvaddr::cli::Args;
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse_compat(std::env::args_os());
    if args.queries.is_empty() {
        eprint!("{}", Args::usage());
        return ExitCode::from(1);
    }

    #[cfg(feature = "log")]
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("srvaddr=warn")),
        )
        .init();

    match srvaddr::run(&args, std::io::stdout().lock()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            #[cfg(feature = "log")]
            tracing::error!("{err}");
            #[cfg(not(feature = "log"))]
            eprintln!("srvaddr: {err}");
            ExitCode::FAILURE
        }
    }
}
