use crate::cli::args::ServeArgs;
use crate::exit_codes::EXIT_SUCCESS;

pub async fn run(args: ServeArgs) -> anyhow::Result<i32> {
    let mut cfg = args.common.config();
    cfg.bind = args.bind;
    regdash_server::serve(cfg).await?;
    Ok(EXIT_SUCCESS)
}
