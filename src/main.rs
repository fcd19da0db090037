//! Headless renderer entrypoint.

use clap::Parser;
use tiledit::render::{render_file, RenderArgs};
use tiledit_core::Config;

fn main() -> anyhow::Result<()> {
    let args = RenderArgs::parse();
    tiledit::init_tracing();

    let mut config = Config::from_env();
    args.apply(&mut config);
    render_file(&args, &config)?;
    Ok(())
}
