use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

use chic_rules::chess_boards::perft::{divide, perft};
use chic_rules::config::{BenchmarkConfig, Config, PlayoutConfig};
use chic_rules::{Board, ChessBoard, ChessError, GameState, Move};

use clap::arg;
use clap::command;
use clap::Command;

use env_logger::Env;
use log::{debug, info, warn};

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

use tabled::settings::Style;
use tabled::Table;
use tabled::Tabled;

fn main() {
    let matches = command!()
        .version("v0.1.0")
        .propagate_version(true)
        .arg(arg!(
            -d --debug "Turn debugging information on"
        ))
        .arg(
            arg!(
            -c --config <FILE> "YAML configuration file"
                    )
            .value_parser(clap::value_parser!(PathBuf)),
        )
        .subcommand(Command::new("benchmark").about("Times perft from the starting position"))
        .subcommand(Command::new("play").about("Play a game by typing coordinate moves such as e2e4"))
        .subcommand(
            Command::new("playout")
                .about("Plays seeded random games and checks the engine invariants")
                .arg(arg!(-s --seed <seed> "Random seed").value_parser(clap::value_parser!(u64)))
                .arg(arg!(-g --games <games> "Number of games").value_parser(clap::value_parser!(u32))),
        )
        .subcommand(
            Command::new("perft")
                .about("Run Perft test")
                .arg(
                    arg!(
                    -x --depth <d> "depth"
                            )
                    .default_value("3")
                    .value_parser(clap::value_parser!(u8)),
                )
                .arg(
                    arg!(
                    -m --moves <moves> "List of moves"
                            )
                    .num_args(1..)
                    .value_parser(clap::value_parser!(String)),
                ),
        )
        .get_matches();

    let config_path = matches
        .get_one::<PathBuf>("config")
        .cloned()
        .or_else(|| std::env::var_os("CHIC_CONFIG_PATH").map(PathBuf::from));
    let cfg = match Config::load(config_path.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };

    let level = if matches.get_flag("debug") { "debug" } else { cfg.log_level.as_str() };
    env_logger::Builder::from_env(Env::default().filter_or("CHIC_LOG_LEVEL", level)).init();
    debug!("Configuration: {:?}", cfg);

    match matches.subcommand() {
        Some(("benchmark", _)) => {
            benchmark(&cfg.benchmark);
        }
        Some(("playout", arg_matches)) => {
            let mut playout_cfg = cfg.playout.clone();
            if let Some(seed) = arg_matches.get_one::<u64>("seed") {
                playout_cfg.seed = *seed;
            }
            if let Some(games) = arg_matches.get_one::<u32>("games") {
                playout_cfg.games = *games;
            }
            playout(&playout_cfg);
        }
        Some(("perft", arg_matches)) => {
            let depth = arg_matches.get_one::<u8>("depth").copied().unwrap_or(3);
            let moves = arg_matches
                .get_many::<String>("moves")
                .unwrap_or_default()
                .filter(|&v| !v.is_empty())
                .collect::<Vec<_>>();
            run_perft(moves, depth);
        }
        Some(("play", _)) | None => {
            play();
        }
        _ => unreachable!("Exhausted list of subcommands"),
    }
}

fn parse_move(algebraic: &str) -> Result<Move, String> {
    Move::from_algebraic(algebraic).ok_or_else(|| format!("Not a coordinate move: {}", algebraic))
}

fn run_perft(moves: Vec<&String>, depth: u8) {
    println!("Perft test for moves {:?} with depth {}", moves, depth);
    let mut chess_board = ChessBoard::new();
    for m in moves {
        let applied = parse_move(m).and_then(|mv| chess_board.make_move(&mv).map_err(|e| e.to_string()));
        if let Err(e) = applied {
            eprintln!("Invalid move {}: {}", m, e);
            std::process::exit(1);
        }
    }

    let mut num_nodes = 0;
    for (m, c) in divide(&chess_board, depth) {
        println!("{}: {}", m, c);
        num_nodes += c;
    }
    println!("\nNodes searched: {}", num_nodes);
}

#[derive(Tabled)]
struct BenchmarkRow {
    depth: u8,
    node_count: u64,
    elapsed_time: f32,
    kilo_nodes_per_sec: f32,
}

fn benchmark(cfg: &BenchmarkConfig) {
    let chess_board = ChessBoard::new();
    let mut table_rows = Vec::new();
    for depth in 1..=cfg.max_depth {
        let start_time = Instant::now();
        let node_count = perft(&chess_board, depth);
        let elapsed = start_time.elapsed();
        table_rows.push(BenchmarkRow {
            depth,
            node_count,
            elapsed_time: elapsed.as_secs_f32(),
            kilo_nodes_per_sec: node_count as f32 / elapsed.as_secs_f32().max(f32::EPSILON) / 1000f32,
        });
        if elapsed.as_secs() > cfg.time_limit_secs {
            info!("Stopping after depth {}, took {:?}", depth, elapsed);
            break;
        }
    }
    println!("{}", Table::new(table_rows).with(Style::modern()));
}

fn play() {
    let mut chess_board = ChessBoard::new();
    let stdin = io::stdin();
    println!("{}", chess_board.render_to_string());

    loop {
        print!("{} to move> ", chess_board.active_color());
        // A failed flush only delays the prompt
        let _ = io::stdout().flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                warn!("Failed to read input: {}", e);
                break;
            }
        }
        let input = line.trim();
        match input {
            "" => continue,
            "quit" | "exit" => break,
            "moves" => {
                let moves: Vec<_> = chess_board.get_legal_moves().iter().map(|m| m.as_algebraic()).collect();
                println!("{}", moves.join(" "));
                continue;
            }
            _ => {}
        }

        let result = parse_move(input).and_then(|mv| {
            chess_board.make_move(&mv).map_err(|e| match e {
                ChessError::PromotionChoiceRequired(_) => format!("{}, append one of q, r, b, n", e),
                e => e.to_string(),
            })
        });
        match result {
            Ok(state) => {
                println!("{}", chess_board.render_to_string());
                match state {
                    GameState::Normal => {}
                    GameState::InCheck(_) => println!("{}", state),
                    GameState::Checkmate(_) | GameState::Stalemate(_) => {
                        println!("{}, game over", state);
                        break;
                    }
                }
            }
            Err(e) => println!("{}", e),
        }
    }
}

#[derive(Tabled)]
struct PlayoutRow {
    game: u32,
    plies: u32,
    result: String,
}

fn playout(cfg: &PlayoutConfig) {
    let mut rng = Pcg64::seed_from_u64(cfg.seed);
    let mut table_rows = Vec::new();

    for game in 0..cfg.games {
        let mut chess_board = ChessBoard::new();
        let mut plies = 0;
        while plies < cfg.max_plies && !chess_board.game_state().is_terminal() {
            let moves = chess_board.get_legal_moves();
            if moves.is_empty() {
                // Only possible for a position the engine failed to classify
                warn!("Game {}: no moves but state is {}", game, chess_board.game_state());
                break;
            }
            let mv = moves[rng.gen_range(0..moves.len())];
            if let Err(e) = chess_board.make_move(&mv) {
                warn!("Game {}: offered move {} was rejected: {}", game, mv.as_algebraic(), e);
                break;
            }
            plies += 1;

            // Pieces are not pinned outside of check, so a move may uncover the king
            let mover = chess_board.active_color().opposite();
            let mut unpruned = chess_board.clone();
            unpruned.regenerate_all_moves();
            if unpruned.is_in_check(mover) {
                debug!("Game {}: {} uncovered its king with {}", game, mover, mv.as_algebraic());
            }
        }
        debug!("Game {} final position\n{}", game, chess_board.render_to_string());
        table_rows.push(PlayoutRow {
            game,
            plies,
            result: chess_board.game_state().to_string(),
        });
    }
    println!("{}", Table::new(table_rows).with(Style::modern()));
}
