//! imgrab - download images for a topic from search engines.

use clap::Parser;
use imgrab::{Engine, Error, GrabberBuilder};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "imgrab")]
#[command(about = "Download images for a topic from search engines.")]
#[command(version)]
struct Args {
    /// Search topic text
    #[arg(long, short)]
    query: String,

    /// Number of images to download
    #[arg(long, short = 'n', default_value_t = 50)]
    limit: usize,

    /// Base output directory
    #[arg(long, short, default_value = "downloads")]
    out: PathBuf,

    /// Max concurrent downloads
    #[arg(long, default_value_t = 8)]
    max_concurrent: usize,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 20)]
    timeout: u64,

    /// Minimum image width filter
    #[arg(long, default_value_t = 0)]
    min_width: u32,

    /// Minimum image height filter
    #[arg(long, default_value_t = 0)]
    min_height: u32,

    /// Search engine backend
    #[arg(long, value_enum, default_value_t = Engine::Ddg)]
    engine: Engine,

    /// Google API key for Custom Search
    #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true)]
    google_api_key: Option<String>,

    /// Google Custom Search engine id (CX)
    #[arg(long, env = "GOOGLE_CX")]
    google_cx: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Show the real browser window during crawling
    #[arg(long)]
    show_browser: bool,
}

impl Args {
    fn into_builder(self) -> GrabberBuilder {
        GrabberBuilder::new(self.query)
            .limit(self.limit)
            .out_base(self.out)
            .max_concurrent(self.max_concurrent)
            .timeout(Duration::from_secs(self.timeout))
            .min_size(self.min_width, self.min_height)
            .engine(self.engine)
            .google_credentials(self.google_api_key, self.google_cx)
            .show_browser(self.show_browser)
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "imgrab=debug" } else { "warn" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Exit status for an error escaping the run.
fn exit_status(error: &Error) -> u8 {
    match error {
        Error::Configuration(_) => 2,
        _ => 1,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let grabber = match args.into_builder().build() {
        Ok(grabber) => grabber,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(exit_status(&e));
        }
    };

    match grabber.run().await {
        Ok(report) => {
            println!("{}", report);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::from(exit_status(&e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["imgrab", "-q", "cats"]).unwrap();
        assert_eq!(args.query, "cats");
        assert_eq!(args.limit, 50);
        assert_eq!(args.out, PathBuf::from("downloads"));
        assert_eq!(args.max_concurrent, 8);
        assert_eq!(args.timeout, 20);
        assert_eq!(args.engine, Engine::Ddg);
        assert!(!args.verbose);
        assert!(!args.show_browser);
    }

    #[test]
    fn test_flags() {
        let args = Args::try_parse_from([
            "imgrab",
            "--query",
            "red cats",
            "-n",
            "5",
            "-o",
            "out",
            "--engine",
            "google",
            "--google-api-key",
            "key",
            "--google-cx",
            "cx",
            "--min-width",
            "640",
            "--verbose",
        ])
        .unwrap();
        assert_eq!(args.limit, 5);
        assert_eq!(args.engine, Engine::Google);
        assert_eq!(args.google_api_key.as_deref(), Some("key"));
        assert_eq!(args.min_width, 640);
        assert!(args.verbose);

        let config = args.into_builder().build().unwrap();
        assert_eq!(config.config().out_base, PathBuf::from("out"));
    }

    #[test]
    fn test_query_is_required_and_engine_checked() {
        assert!(Args::try_parse_from(["imgrab"]).is_err());
        assert!(Args::try_parse_from(["imgrab", "-q", "cats", "--engine", "bing"]).is_err());
    }

    #[test]
    fn test_configuration_errors_exit_with_2() {
        assert_eq!(exit_status(&Error::Configuration("missing".into())), 2);
        assert_eq!(exit_status(&Error::Internal("boom".into())), 1);
    }
}
