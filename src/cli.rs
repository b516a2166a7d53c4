/// command line interface: argument parsing, logging setup and the subcommands
///
///  # Examples
/// ```
/// use chemverse::cli::cli_main::Cli;
/// use clap::Parser;
/// let cli = Cli::try_parse_from(["chemverse", "element", "Fe"]).unwrap();
/// assert!(cli.command.is_some());
/// ```
pub mod cli_main;
/// prettytable rendering of elements and reactions
pub mod cli_tables;
