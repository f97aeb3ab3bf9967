use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "regform", version, about = "Fill in and submit the registration form from a terminal")]
pub(crate) struct Args {
    /// Configuration file (TOML, JSON or YAML). `REGFORM__*` variables override it.
    #[arg(short, long, value_name = "PATH")]
    pub(crate) config: Option<PathBuf>,

    /// Keep the form snapshot in memory instead of the data directory.
    #[arg(long)]
    pub(crate) memory: bool,
}
