//! lbuild CLI - build front end for the browser source tree

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use lbuild::util::{ColorChoice, EnvConfig, Shell, SystemRunner};
use lbuild::HostPlatform;

mod cli;

use cli::Cli;

fn main() {
    if let Err(e) = run() {
        match e.downcast::<lbuild::Error>() {
            Ok(err) => eprintln!("{:?}", miette::Report::new(err)),
            Err(e) => eprintln!("error: {:#}", e),
        }
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("lbuild=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lbuild=info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let color = if cli.no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    };
    if cli.no_color {
        let _ = miette::set_hook(Box::new(|_| {
            Box::new(miette::MietteHandlerOpts::new().color(false).build())
        }));
    }

    let env = EnvConfig::from_env();
    let platform = HostPlatform::current();
    let runner = SystemRunner;
    let request = cli.request();

    if cli.plan {
        let plan = lbuild::preview(&request, &env, platform, &runner)?;
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    let shell = Shell::new(color);
    lbuild::dispatch(&request, &env, platform, &runner, &shell)?;
    Ok(())
}
