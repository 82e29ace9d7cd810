mod configure;
mod login;
mod utils;

use crate::configure::Configure;
use crate::login::Login;
use anyhow::Result;
use clap::Parser;
use log::LevelFilter;
use simple_logger::SimpleLogger;
use time::UtcOffset;

#[derive(Parser)]
#[command(
    version,
    about = "Log into a ForgeRock based IdP and trade the SAML assertion for temporary AWS credentials"
)]
struct Opts {
    /// Log every round trip
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    sub_command: SubCommand,
}

#[derive(Parser)]
enum SubCommand {
    Configure(Configure),
    Login(Login),
}

fn main() -> Result<()> {
    let opt: Opts = Opts::parse();

    let level = if opt.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    SimpleLogger::new()
        .with_level(LevelFilter::Warn)
        .with_module_level("forgerock_sts", level)
        .init()?;

    // the local offset can only be read while the process is single threaded
    let local_offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);

    match opt.sub_command {
        SubCommand::Configure(val) => val.run()?,
        SubCommand::Login(val) => {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?;
            runtime.block_on(val.run(local_offset))?
        }
    }

    Ok(())
}
