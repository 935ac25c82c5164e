use anyhow::Result;

use crate::args::Cli;
use crate::{handlers, logging};

pub fn run(cli: Cli) -> Result<()> {
    logging::init(&cli.log_level);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(handlers::query::handle(cli))
}
