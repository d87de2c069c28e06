use std::io;

use anyhow::Result;
use clap::Parser;
use kubectl_auth_vault::cmd::{self, Cli};
use kubectl_auth_vault::config::settings::Environment;
use kubectl_auth_vault::utils::logging;

#[tokio::main]
async fn main() -> Result<()> {
    // -------------------------------
    // 1. Parse arguments, init logging (stderr only)
    // -------------------------------

    let args = Cli::parse();
    logging::run(args.log_level, args.log_format);

    // -------------------------------
    // 2. Snapshot the process environment
    // -------------------------------

    let environment = Environment::from_process();

    // -------------------------------
    // 3. Run the command; any error exits non-zero with nothing on stdout
    // -------------------------------

    let mut stdout = io::stdout().lock();
    let mut stderr = io::stderr().lock();
    cmd::run(args.command, &environment, &mut stdout, &mut stderr).await
}
