use std::env;
use std::process;

use clap::{value_t, App, Arg};
use log::debug;

use sokobot::config::{Config, DEFAULT_TIMEOUT_MS};
use sokobot::runner;
use sokobot::solver::Outcome;
use sokobot::LoadLevel;

fn main() {
    env_logger::init();

    let timeout_help = format!(
        "give up after this many milliseconds (default {})",
        DEFAULT_TIMEOUT_MS
    );
    let matches = App::new("sokobot")
        .version("0.1")
        .about("Finds move-optimal solutions to sokoban levels")
        .arg(
            Arg::with_name("timeout")
                .short("t")
                .long("timeout")
                .value_name("MS")
                .takes_value(true)
                .help(&timeout_help),
        )
        .arg(
            Arg::with_name("no-timeout")
                .long("no-timeout")
                .conflicts_with("timeout")
                .help("search until solved or out of states"),
        )
        .arg(
            Arg::with_name("status")
                .short("s")
                .long("status")
                .help("print a summary each time the search reaches a new depth"),
        )
        .arg(
            Arg::with_name("stats")
                .long("stats")
                .help("print detailed stats after the search"),
        )
        .arg(
            Arg::with_name("states")
                .long("states")
                .help("print the level after each push of the solution"),
        )
        .arg(
            Arg::with_name("steps")
                .long("steps")
                .requires("states")
                .help("with --states, print the level after every move, not just pushes"),
        )
        .arg(
            Arg::with_name("lurd")
                .long("lurd")
                .help("print pushes in uppercase"),
        )
        .arg(Arg::with_name("file").required(true))
        .get_matches();

    let mut config = if matches.is_present("timeout") {
        let timeout_ms = value_t!(matches, "timeout", u64).unwrap_or_else(|e| e.exit());
        Config::with_timeout_ms(timeout_ms)
    } else {
        Config::default()
    };
    if matches.is_present("no-timeout") {
        config.timeout = None;
    }
    config.print_status = matches.is_present("status");
    debug!("{:?}", config);

    let path = matches.value_of("file").unwrap();
    let level = path.load_level().unwrap_or_else(|err| {
        let current_dir = env::current_dir().unwrap();
        eprintln!("Can't load level {} in {}: {}", path, current_dir.display(), err);
        process::exit(1);
    });

    println!("Solving {}...", path);
    let solver_ok = runner::solve(level.clone(), &config).unwrap_or_else(|err| {
        eprintln!("Invalid level: {}", err);
        process::exit(1);
    });

    if matches.is_present("stats") {
        println!("{}", solver_ok.stats);
    }

    match solver_ok.outcome {
        Outcome::Solved(ref moves) => {
            if matches.is_present("states") {
                println!("Found solution:");
                print!(
                    "{}",
                    level.format_solution(moves, matches.is_present("steps"))
                );
            }
            if matches.is_present("lurd") {
                println!("{}", moves.lurd());
            } else {
                println!("{}", moves);
            }
            println!("Moves: {}", moves.move_cnt());
            println!("Pushes: {}", moves.push_cnt());
        }
        ref outcome => println!("{}", outcome),
    }
}
