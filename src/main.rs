use anyhow::Result;
use clap::{value_parser, Arg, ArgAction, Command};
use clap_complete::Shell;

use vitals::commands;

fn main() -> Result<()> {
    vitals::init_logging();

    let matches = build_cli().get_matches();
    match matches.subcommand() {
        Some(("snapshot", sub_matches)) => commands::snapshot::execute(sub_matches),
        Some(("watch", sub_matches)) => commands::watch::execute(sub_matches),
        Some(("sensors", sub_matches)) => commands::sensors::execute(sub_matches),
        Some(("completions", sub_matches)) => {
            commands::completions::execute(sub_matches, build_cli())
        }
        _ => {
            build_cli().print_help()?;
            println!();
            Ok(())
        }
    }
}

fn build_cli() -> Command {
    Command::new("vitals")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Desktop system health telemetry")
        .subcommand(
            Command::new("snapshot")
                .about("Collect one snapshot and print it")
                .arg(
                    Arg::new("extended")
                        .short('e')
                        .long("extended")
                        .help("Collect the extended probe set (per-core CPU, network, GPU)")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print the snapshot as JSON")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("watch")
                .about("Poll on a fixed interval until interrupted")
                .arg(
                    Arg::new("interval")
                        .short('n')
                        .long("interval")
                        .value_name("SECONDS")
                        .help("Seconds between polls")
                        .value_parser(value_parser!(u64).range(1..))
                        .default_value("2"),
                )
                .arg(
                    Arg::new("extended")
                        .short('e')
                        .long("extended")
                        .help("Collect the extended probe set")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("sensors")
                .about("Show background sensor monitor status and last readings"),
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completions")
                .arg(
                    Arg::new("shell")
                        .help("Target shell")
                        .required(true)
                        .value_parser(value_parser!(Shell)),
                ),
        )
}
