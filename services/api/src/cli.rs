use crate::demo::{run_demo, run_link, run_rank, DemoArgs, LinkArgs, RankArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use decision_matrix::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Decision Matrix",
    about = "Rank choices against weighted criteria and share the comparison as a link",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print the ranked result table for an encoded model
    Rank(RankArgs),
    /// Print the shareable link for an encoded model
    Link(LinkArgs),
    /// Build the Price/Quality example and print its table and link
    Demo(DemoArgs),
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
        Command::Rank(args) => run_rank(args),
        Command::Link(args) => run_link(args),
        Command::Demo(args) => run_demo(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["decision-matrix-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn rank_accepts_csv_flag() {
        let cli = Cli::try_parse_from([
            "decision-matrix-api",
            "rank",
            "--data",
            "0~Price~2.0__0~A__0-0~8.0",
            "--csv",
        ])
        .expect("parses");
        match cli.command {
            Some(Command::Rank(args)) => {
                assert!(args.csv);
                assert_eq!(args.data, "0~Price~2.0__0~A__0-0~8.0");
            }
            other => panic!("expected rank command, got {other:?}"),
        }
    }
}
