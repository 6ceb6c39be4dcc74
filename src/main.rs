use std::error::Error;
use std::io;
use std::time::{Duration, Instant};

use clap::{arg, command, value_parser, Command};
use log::{info, warn};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use damspel::draughts::notation::{from_notation, INITIAL_POSITION};
use damspel::draughts::perft::perft;
use damspel::draughts::{BoardConfig, BoardSize, Game, GameResult, PieceColor, Side};
use damspel::engines::{Engine, LongestCaptureEngine};
use damspel::ui::{console, render_board};

fn main() -> Result<(), Box<dyn Error>> {
    let size_arg = || {
        arg!(-s --size <SIZE> "Board size: 8x8, 10x10 or 12x12")
            .default_value("8x8")
            .value_parser(value_parser!(BoardSize))
    };
    let seed_arg = || arg!(--seed <SEED> "Seed for the bot's random choices").value_parser(value_parser!(u64));

    let matches = command!()
        .propagate_version(true)
        .arg(arg!(-d --debug "Turn debugging information on"))
        .arg(arg!(--"log-file" <PATH> "Also write debug logs to this file"))
        .subcommand(
            Command::new("play")
                .about("Play a game in the terminal")
                .arg(size_arg())
                .arg(
                    arg!(-c --color <COLOR> "Colour of the bottom side, white moves first")
                        .default_value("white")
                        .value_parser(value_parser!(PieceColor)),
                )
                .arg(
                    arg!(-b --bot <SIDE> "Side played by the computer")
                        .default_value("north")
                        .value_parser(["south", "north", "none"]),
                )
                .arg(
                    arg!(--"delay-ms" <MS> "Pause between the bot's capture steps")
                        .default_value("500")
                        .value_parser(value_parser!(u64)),
                )
                .arg(seed_arg()),
        )
        .subcommand(
            Command::new("selfplay")
                .about("Let the bot play against itself")
                .arg(size_arg())
                .arg(
                    arg!(-g --games <N> "Number of games")
                        .default_value("10")
                        .value_parser(value_parser!(u32)),
                )
                .arg(
                    arg!(--"max-turns" <N> "Stop a game after this many turns")
                        .default_value("400")
                        .value_parser(value_parser!(u32)),
                )
                .arg(seed_arg()),
        )
        .subcommand(
            Command::new("perft")
                .about("Count complete turns to a depth")
                .arg(arg!(-p --position <NOTATION> "Board position").default_value(INITIAL_POSITION))
                .arg(
                    arg!(-x --depth <d> "depth")
                        .default_value("3")
                        .value_parser(value_parser!(u8)),
                ),
        )
        .get_matches();

    setup_logging(matches.get_flag("debug"), matches.get_one::<String>("log-file"))?;

    match matches.subcommand() {
        Some(("play", arg_matches)) => {
            let size = *arg_matches.get_one::<BoardSize>("size").unwrap();
            let color = *arg_matches.get_one::<PieceColor>("color").unwrap();
            let bot_side = match arg_matches.get_one::<String>("bot").unwrap().as_str() {
                "south" => Some(Side::South),
                "north" => Some(Side::North),
                _ => None,
            };
            let delay = Duration::from_millis(*arg_matches.get_one::<u64>("delay-ms").unwrap());
            let seed = seed_or_random(arg_matches.get_one::<u64>("seed"));
            play(BoardConfig::from_size(size).with_south_color(color), bot_side, delay, seed)?;
        }
        Some(("selfplay", arg_matches)) => {
            let size = *arg_matches.get_one::<BoardSize>("size").unwrap();
            let games = *arg_matches.get_one::<u32>("games").unwrap();
            let max_turns = *arg_matches.get_one::<u32>("max-turns").unwrap();
            let seed = seed_or_random(arg_matches.get_one::<u64>("seed"));
            selfplay(BoardConfig::from_size(size), games, max_turns, seed)?;
        }
        Some(("perft", arg_matches)) => {
            let notation = arg_matches.get_one::<String>("position").unwrap();
            let depth = *arg_matches.get_one::<u8>("depth").unwrap();
            run_perft(notation, depth)?;
        }
        None => play(BoardConfig::default(), Some(Side::North), Duration::from_millis(500), seed_or_random(None))?,
        _ => unreachable!("Exhausted list of subcommands"),
    }
    Ok(())
}

fn setup_logging(debug: bool, log_file: Option<&String>) -> Result<(), Box<dyn Error>> {
    let stderr_level = if debug {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    let log_dispatcher = fern::Dispatch::new().format(|out, message, record| {
        out.finish(format_args!(
            "{}[{}][{}] {}",
            chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
            record.target(),
            record.level(),
            message
        ))
    });

    if let Some(log_file) = log_file {
        log_dispatcher
            .chain(
                fern::Dispatch::new()
                    .level(log::LevelFilter::Debug)
                    .chain(fern::log_file(log_file)?),
            )
            .chain(fern::Dispatch::new().level(stderr_level).chain(io::stderr()))
            .apply()?;
    } else {
        log_dispatcher.level(stderr_level).chain(io::stderr()).apply()?;
    }
    Ok(())
}

fn seed_or_random(seed: Option<&u64>) -> u64 {
    match seed {
        Some(seed) => *seed,
        None => rand::thread_rng().gen(),
    }
}

fn play(config: BoardConfig, bot_side: Option<Side>, delay: Duration, seed: u64) -> Result<(), Box<dyn Error>> {
    info!("Starting a {}x{} game, bot {:?}, seed {}", config.rows, config.cols, bot_side, seed);
    let mut game = Game::new(config)?;
    match bot_side {
        Some(side) => {
            let mut bot = LongestCaptureEngine::new(side, Pcg64::seed_from_u64(seed), delay);
            console::run(&mut game, Some(&mut bot))?;
        }
        None => console::run(&mut game, None)?,
    }
    Ok(())
}

#[derive(Tabled)]
struct SelfplayRow {
    game: u32,
    seed: u64,
    result: String,
    turns: u32,
    south_left: u32,
    north_left: u32,
    elapsed_ms: u128,
}

fn selfplay(config: BoardConfig, games: u32, max_turns: u32, seed: u64) -> Result<(), Box<dyn Error>> {
    let mut table_rows = Vec::new();
    for game_index in 0..games {
        let game_seed = seed.wrapping_add(game_index as u64);
        let mut rng = Pcg64::seed_from_u64(game_seed);
        let mut south = LongestCaptureEngine::new(Side::South, Pcg64::seed_from_u64(rng.gen()), Duration::ZERO);
        let mut north = LongestCaptureEngine::new(Side::North, Pcg64::seed_from_u64(rng.gen()), Duration::ZERO);

        let start_time = Instant::now();
        let mut game = Game::new(config)?;
        while game.result() == GameResult::InProgress && game.turn_number() < max_turns {
            let engine: &mut dyn Engine = match game.side_to_move() {
                Side::South => &mut south,
                Side::North => &mut north,
            };
            game.play_engine_turn(engine, &mut |_| {})?;
        }

        let result = match game.result() {
            GameResult::InProgress => {
                warn!("Game {} stopped after {} turns without a winner", game_index, max_turns);
                String::from("unfinished")
            }
            result => result.to_string(),
        };
        table_rows.push(SelfplayRow {
            game: game_index,
            seed: game_seed,
            result,
            turns: game.turn_number(),
            south_left: game.position().remaining(Side::South),
            north_left: game.position().remaining(Side::North),
            elapsed_ms: start_time.elapsed().as_millis(),
        });
    }
    println!("{}", Table::new(table_rows).with(Style::modern()));
    Ok(())
}

#[derive(Tabled)]
struct PerftRow {
    turn: String,
    destination: String,
    nodes: u64,
}

fn run_perft(notation: &str, depth: u8) -> Result<(), Box<dyn Error>> {
    let (position, side) = from_notation(notation, PieceColor::White)?;
    println!("Perft test for {} with depth {}", notation, depth);
    println!("{}", render_board(&position, None));

    let start_time = Instant::now();
    let mut table_rows = Vec::new();
    let mut num_nodes = 0;
    if depth > 0 {
        for turn in position.generate_turns(side)? {
            let mut new_position = position.clone();
            new_position.play_turn(&turn)?;
            let nodes = perft(&new_position, side.opposite(), depth - 1)?;
            num_nodes += nodes;
            table_rows.push(PerftRow {
                turn: turn.to_string(),
                destination: turn.destination().to_string(),
                nodes,
            });
        }
    } else {
        num_nodes = 1;
    }
    println!("{}", Table::new(table_rows).with(Style::modern()));
    println!(
        "\nNodes searched: {} in {:.3}s",
        num_nodes,
        start_time.elapsed().as_secs_f32()
    );
    Ok(())
}
