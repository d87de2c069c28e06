use std::io::Write;

use anyhow::Result;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const COMMIT: &str = match option_env!("GIT_COMMIT") {
    Some(commit) => commit,
    None => "none",
};
pub const BUILD_DATE: &str = match option_env!("BUILD_DATE") {
    Some(date) => date,
    None => "unknown",
};

pub fn run_version<O: Write>(out: &mut O) -> Result<()> {
    writeln!(out, "kubectl-auth_vault")?;
    writeln!(out, "  Version:    {}", VERSION)?;
    writeln!(out, "  Commit:     {}", COMMIT)?;
    writeln!(out, "  Built:      {}", BUILD_DATE)?;
    writeln!(out, "  OS/Arch:    {}/{}", std::env::consts::OS, std::env::consts::ARCH)?;
    Ok(())
}
