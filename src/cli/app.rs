//! Main CLI application

use crate::config::{load_project, parse_define, LoadOptions};
use crate::logging;
use crate::runner::{BuildOptions, Project, TaskRegistry, Verbosity};
use anyhow::Result;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use clap_complete::Shell;
use colored::Colorize;
use std::ffi::OsString;
use std::io;
use std::path::PathBuf;
use std::time::Instant;

/// Build the clap command
pub fn build_command() -> Command {
    Command::new("brisk")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Build targets described in a brisk.yml file")
        .arg(
            Arg::new("targets")
                .value_name("TARGET")
                .help("Targets to build (defaults to the project's default target)")
                .num_args(0..)
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .value_name("FILE")
                .help("Path to the build file (searched for in parent directories by default)")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("define")
                .short('D')
                .value_name("NAME=VALUE")
                .help("Define a read-only property")
                .action(ArgAction::Append)
                .value_parser(parse_define),
        )
        .arg(
            Arg::new("parallel")
                .short('p')
                .long("parallel")
                .help("Run independent targets concurrently")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("jobs")
                .short('j')
                .long("jobs")
                .value_name("N")
                .help("Run at most N targets at once (implies --parallel)")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("list")
                .short('l')
                .long("list")
                .help("List the project's targets and exit")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only print task output and errors")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("silent")
                .short('s')
                .long("silent")
                .help("Print no output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Print verbose output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-global")
                .long("no-global")
                .help("Do not read the per-user properties file")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("completions")
                .long("completions")
                .value_name("SHELL")
                .help("Print a shell completion script and exit")
                .value_parser(value_parser!(Shell)),
        )
}

/// Get verbosity level from matches
fn get_verbosity(matches: &ArgMatches) -> Verbosity {
    if matches.get_flag("silent") {
        Verbosity::Silent
    } else if matches.get_flag("quiet") {
        Verbosity::Quiet
    } else if matches.get_flag("verbose") {
        Verbosity::Verbose
    } else {
        Verbosity::Normal
    }
}

fn build_options(matches: &ArgMatches) -> BuildOptions {
    let mut options = BuildOptions::new()
        .with_parallel(matches.get_flag("parallel"))
        .with_verbosity(get_verbosity(matches));

    if let Some(jobs) = matches.get_one::<usize>("jobs") {
        options = options.with_parallel(true).with_jobs(*jobs);
    }
    options
}

fn load_options(matches: &ArgMatches) -> LoadOptions {
    LoadOptions {
        file: matches.get_one::<PathBuf>("file").cloned(),
        defines: matches
            .get_many::<(String, String)>("define")
            .map(|values| values.cloned().collect())
            .unwrap_or_default(),
        global: !matches.get_flag("no-global"),
    }
}

/// Print the project's targets, marking the default one
pub fn print_targets(project: &Project) {
    println!("{} {}", "Targets in".bold(), project.name().bold());

    let width = project
        .graph()
        .targets()
        .map(|t| t.name.len())
        .max()
        .unwrap_or(0);

    for target in project.graph().targets() {
        let mut line = format!("  {:<width$}", target.name, width = width);
        if let Some(description) = &target.description {
            line.push_str("  ");
            line.push_str(description);
        }
        if project.default_target() == Some(target.name.as_str()) {
            println!("{} {}", line.green(), "(default)".dimmed());
        } else {
            println!("{}", line);
        }
    }
}

/// Run the CLI with the process arguments
pub fn run() -> Result<()> {
    run_from(std::env::args_os())
}

/// Run the CLI with the given arguments
pub fn run_from<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = build_command().get_matches_from(args);

    if let Some(shell) = matches.get_one::<Shell>("completions") {
        clap_complete::generate(*shell, &mut build_command(), "brisk", &mut io::stdout());
        return Ok(());
    }

    let options = build_options(&matches);
    logging::init(options.verbosity);

    let start = Instant::now();
    let registry = TaskRegistry::with_builtins();
    let project = match load_project(&load_options(&matches), &registry) {
        Ok(project) => project,
        Err(e) => {
            options.print_result(false, start.elapsed());
            return Err(e.into());
        }
    };

    if matches.get_flag("list") {
        print_targets(&project);
        return Ok(());
    }

    let targets: Vec<String> = matches
        .get_many::<String>("targets")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();

    let result = project.build(&targets, &options);
    options.print_result(result.is_ok(), start.elapsed());
    result?;

    Ok(())
}
