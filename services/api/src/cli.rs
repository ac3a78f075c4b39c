use crate::commands::{run_preview, run_submit, PreviewArgs, SubmitArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use gamedog_consult::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Game Dogs Sports consultation service",
    about = "Serve the consultation email dispatcher or drive the intake form from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP dispatcher (default command)
    Serve(ServeArgs),
    /// Submit a consultation request through the form controller
    Submit(SubmitArgs),
    /// Render a notification email to stdout without sending it
    Preview(PreviewArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Submit(args) => run_submit(args).await,
        Command::Preview(args) => run_preview(args),
    }
}
