use anyhow::{anyhow, Result};
use clap::{arg, ArgAction, ArgMatches, Command};
use knap_algorithms::{compare, knapsack::decision_tree, solve_dp, solve_greedy};
use knap_challenges::{Challenge, Track};
use knap_runtime::{frame, Playback, Session, Stage};
use knap_structs::{config::RuntimeConfig, trace::Algorithm};
use knap_utils::{calc_seed, dejsonify, jsonify_pretty, load_json_arg};
use serde_json::json;
use std::thread;
use tracing_subscriber::EnvFilter;

const INSTANCE_HELP: &str =
    "Instance json string, path to json file, '-' for stdin, or 'sample'";

fn cli() -> Command {
    Command::new("knap-runtime")
        .about("Solves, compares and replays 0/1 knapsack instances")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("solve")
                .about("Solves an instance with one algorithm")
                .arg(
                    arg!(<ALGORITHM> "Algorithm to run: greedy or dp")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(arg!(<INSTANCE>).help(INSTANCE_HELP).value_parser(clap::value_parser!(String)))
                .arg(
                    arg!(--steps "Include every recorded step in the output")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("compare")
                .about("Runs greedy and DP and reports the optimality gap")
                .arg(arg!(<INSTANCE>).help(INSTANCE_HELP).value_parser(clap::value_parser!(String))),
        )
        .subcommand(
            Command::new("generate")
                .about("Generates a random instance")
                .arg(
                    arg!(<SEED> "A string used in seed generation")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(--nonce [NONCE] "Nonce value")
                        .default_value("0")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    arg!(--track [TRACK] "Generator parameters, e.g. n_items=8,budget=40")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(--config [CONFIG] "Config json string or path to json file")
                        .value_parser(clap::value_parser!(String)),
                ),
        )
        .subcommand(
            Command::new("replay")
                .about("Plays back recorded steps on a timer")
                .arg(arg!(<INSTANCE>).help(INSTANCE_HELP).value_parser(clap::value_parser!(String)))
                .arg(
                    arg!(--algorithm [ALGORITHM] "Replay a single algorithm instead of the full comparison")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(--config [CONFIG] "Config json string or path to json file")
                        .value_parser(clap::value_parser!(String)),
                ),
        )
        .subcommand(
            Command::new("tree")
                .about("Prints the take/skip decision tree of a small instance")
                .arg(arg!(<INSTANCE>).help(INSTANCE_HELP).value_parser(clap::value_parser!(String))),
        )
}

fn enable_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    enable_tracing();
    let matches = cli().get_matches();

    if let Err(e) = match matches.subcommand() {
        Some(("solve", sub_m)) => required(sub_m, "ALGORITHM").and_then(|algorithm| {
            solve(
                &algorithm,
                &required(sub_m, "INSTANCE")?,
                sub_m.get_flag("steps"),
            )
        }),
        Some(("compare", sub_m)) => {
            required(sub_m, "INSTANCE").and_then(|instance| compare_instance(&instance))
        }
        Some(("generate", sub_m)) => required(sub_m, "SEED").and_then(|seed| {
            generate(
                &seed,
                sub_m.get_one::<u64>("nonce").copied().unwrap_or(0),
                sub_m.get_one::<String>("track").cloned(),
                sub_m.get_one::<String>("config").cloned(),
            )
        }),
        Some(("replay", sub_m)) => required(sub_m, "INSTANCE").and_then(|instance| {
            replay(
                &instance,
                sub_m.get_one::<String>("algorithm").cloned(),
                sub_m.get_one::<String>("config").cloned(),
            )
        }),
        Some(("tree", sub_m)) => required(sub_m, "INSTANCE").and_then(|instance| tree(&instance)),
        _ => Err(anyhow!("Invalid subcommand")),
    } {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn required(sub_m: &ArgMatches, name: &str) -> Result<String> {
    sub_m
        .get_one::<String>(name)
        .cloned()
        .ok_or_else(|| anyhow!("Missing argument {}", name))
}

fn load_challenge(instance: &str) -> Result<Challenge> {
    if instance == "sample" {
        return Ok(Challenge::sample());
    }
    let json = load_json_arg(instance)?;
    dejsonify::<Challenge>(&json).map_err(|e| anyhow!("Failed to parse instance: {}", e))
}

fn load_config(config: Option<String>) -> Result<RuntimeConfig> {
    match config {
        Some(config) => RuntimeConfig::load(&config),
        None => Ok(RuntimeConfig::default()),
    }
}

pub fn solve(algorithm: &str, instance: &str, include_steps: bool) -> Result<()> {
    let algorithm: Algorithm = algorithm.parse()?;
    let challenge = load_challenge(instance)?;
    let trace = match algorithm {
        Algorithm::Greedy => solve_greedy(&challenge)?,
        Algorithm::Dynamic => solve_dp(&challenge)?,
    };
    let output = if include_steps {
        json!({
            "algorithm": algorithm,
            "result": trace.result,
            "steps": trace.steps,
        })
    } else {
        json!({
            "algorithm": algorithm,
            "result": trace.result,
            "num_steps": trace.len(),
        })
    };
    println!("{}", jsonify_pretty(&output)?);
    Ok(())
}

pub fn compare_instance(instance: &str) -> Result<()> {
    let challenge = load_challenge(instance)?;
    let comparison = compare(&challenge)?;
    println!(
        "{}",
        jsonify_pretty(&json!({
            "greedy": comparison.greedy.result,
            "dp": comparison.dynamic.result,
            "optimality_gap": comparison.optimality_gap(),
            "greedy_is_optimal": comparison.greedy_is_optimal(),
        }))?
    );
    Ok(())
}

pub fn generate(
    seed: &str,
    nonce: u64,
    track: Option<String>,
    config: Option<String>,
) -> Result<()> {
    let config = load_config(config)?;
    let track = match track {
        Some(track) => track.parse::<Track>()?,
        None => config.generator,
    };
    let challenge = Challenge::generate_instance(&calc_seed(seed, nonce), &track)?;
    println!("{}", jsonify_pretty(&challenge)?);
    Ok(())
}

pub fn replay(instance: &str, algorithm: Option<String>, config: Option<String>) -> Result<()> {
    let config = load_config(config)?;
    let challenge = load_challenge(instance)?;
    let interval = config.playback.tick_interval();

    if let Some(algorithm) = algorithm {
        let trace = match algorithm.parse::<Algorithm>()? {
            Algorithm::Greedy => solve_greedy(&challenge)?,
            Algorithm::Dynamic => solve_dp(&challenge)?,
        };
        let mut playback = Playback::for_trace(&trace);
        loop {
            if let Some(step) = frame(&trace, playback.position()) {
                println!("[{} #{}] {}", trace.algorithm, step.index, step.message);
            }
            if !playback.advance() {
                break;
            }
            thread::sleep(interval);
        }
        return Ok(());
    }

    let mut session = Session::new(challenge, config.playback);
    session.start()?;
    loop {
        let current = session.frame();
        match (current.stage, current.step) {
            (Stage::Transition, _) => println!("[transition] greedy finished, starting dp"),
            (stage, Some(step)) => println!("[{:?} #{}] {}", stage, step.index, step.message),
            (stage, None) => println!("[{:?}]", stage),
        }
        if session.stage() == Stage::Complete {
            break;
        }
        session.tick();
        thread::sleep(interval);
    }
    if let Some(comparison) = session.comparison() {
        println!(
            "greedy value {}, dp value {}, gap {}",
            comparison.greedy.result.total_value,
            comparison.dynamic.result.total_value,
            comparison.optimality_gap()
        );
    }
    Ok(())
}

pub fn tree(instance: &str) -> Result<()> {
    let challenge = load_challenge(instance)?;
    let root = decision_tree::build(&challenge)?;
    println!("{}", jsonify_pretty(&root)?);
    Ok(())
}
