use super::super::args::*;
use crate::exit_codes::EXIT_SUCCESS;

pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::ResetDb(args) => super::db::cmd_reset(args),
        Command::SeedDemo(args) => super::db::cmd_seed_demo(args),
        Command::SeedWeek(args) => super::db::cmd_seed_week(args),
        Command::Ingest(args) => super::ingest::run(args),
        Command::Summary(args) => super::report::cmd_summary(args),
        Command::Trend(args) => super::report::cmd_trend(args),
        Command::Windows(args) => super::report::cmd_windows(args),
        Command::Serve(args) => super::serve::run(args).await,
        Command::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(EXIT_SUCCESS)
        }
    }
}
