//! helmpush - Helm plugin to push chart packages to ChartMuseum

use clap::Parser;
use clap::error::ErrorKind;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use helmpush_repo::{InvocationParameters, ProcessEnv};

mod commands;
mod error;
mod exit_codes;

use commands::Mode;

const LONG_ABOUT: &str = "Helm plugin to push chart package to ChartMuseum

Examples:

  $ helm push mychart-0.1.0.tgz chartmuseum       # push .tgz from \"helm package\"
  $ helm push . chartmuseum                       # package and push chart directory
  $ helm push . --version=\"7c4d121\" chartmuseum   # override version in Chart.yaml";

#[derive(Parser)]
#[command(name = "helm push")]
#[command(about = "Helm plugin to push chart package to ChartMuseum")]
#[command(long_about = LONG_ABOUT)]
struct Cli {
    /// Chart path and repository name
    args: Vec<String>,

    /// Override chart version pre-push
    #[arg(short = 'v', long = "version")]
    chart_version: Option<String>,

    /// Override HTTP basic auth username [$HELM_REPO_USERNAME]
    #[arg(short, long)]
    username: Option<String>,

    /// Override HTTP basic auth password [$HELM_REPO_PASSWORD]
    #[arg(short, long)]
    password: Option<String>,

    /// Send token in authorization header [$HELM_REPO_ACCESS_TOKEN]
    #[arg(long)]
    access_token: Option<String>,

    /// ChartMuseum context path [$HELM_REPO_CONTEXT_PATH]
    #[arg(long)]
    context_path: Option<String>,

    /// Use plain HTTP for cm:// downloads [$HELM_REPO_USE_HTTP, takes precedence]
    #[arg(long)]
    use_http: bool,

    /// Enable debug output
    #[arg(long)]
    debug: bool,
}

impl Cli {
    fn parameters(&self) -> InvocationParameters {
        InvocationParameters {
            chart_name: None,
            chart_version: self.chart_version.clone(),
            repo_name: None,
            username: self.username.clone(),
            password: self.password.clone(),
            access_token: self.access_token.clone(),
            context_path: self.context_path.clone(),
            use_http: self.use_http,
        }
    }
}

fn init_tracing(debug: bool) {
    let default = if debug { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> error::Result<()> {
    let mut params = cli.parameters();

    match Mode::select(&cli.args)? {
        Mode::Download { uri } => {
            let mut stdout = std::io::stdout();
            commands::download::run(&uri, &params, &ProcessEnv, &mut stdout).await
        }
        Mode::Push { chart, repo } => {
            params.chart_name = Some(chart);
            params.repo_name = Some(repo);
            commands::push::run(&params, &ProcessEnv, &std::env::temp_dir()).await
        }
    }
}

/// Help output exits cleanly, every other usage error exits like a failed command
fn usage_exit(err: clap::Error) -> ExitCode {
    let _ = err.print();
    match err.kind() {
        ErrorKind::DisplayHelp
        | ErrorKind::DisplayVersion
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
            ExitCode::from(exit_codes::SUCCESS)
        }
        _ => ExitCode::from(exit_codes::ERROR),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Setup miette for nice error display
    miette::set_panic_hook();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => return usage_exit(err),
    };
    init_tracing(cli.debug);

    match run(cli).await {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS),
        Err(err) => {
            let code = err.exit_code();
            eprintln!("{:?}", miette::Report::new(err));
            ExitCode::from(code)
        }
    }
}
