use std::io::{stdin, stdout, BufRead, Write};

use log::debug;

use crate::draughts::{Game, GameResult, TurnState};
use crate::engines::Engine;
use crate::ui::render_board;

#[derive(Debug, PartialEq, Eq)]
enum ConsoleCommand {
    Click { row: usize, col: usize },
    Board,
    Moves,
    Reset,
    Help,
    Quit,
}

const HELP: &str = "commands: <row> <col> | board | moves | reset | help | quit";

/// Plays `game` on stdin/stdout. When `bot` is given, its side is played
/// automatically.
pub fn run(game: &mut Game, bot: Option<&mut dyn Engine>) -> std::io::Result<()> {
    run_with_io(game, bot, stdin().lock(), stdout())
}

fn run_with_io<R: BufRead, W: Write>(
    game: &mut Game,
    mut bot: Option<&mut dyn Engine>,
    input: R,
    mut output: W,
) -> std::io::Result<()> {
    writeln!(output, "{}", render_board(game.position(), None))?;
    writeln!(output, "{}", HELP)?;

    let mut lines = input.lines();
    loop {
        if let Some(bot) = bot.as_deref_mut() {
            play_bot(game, bot, &mut output)?;
        }
        match game.result() {
            GameResult::InProgress => write!(output, "{} to move> ", game.side_to_move())?,
            result => write!(output, "{}> ", result)?,
        }
        output.flush()?;

        let line = match lines.next() {
            Some(line) => line?,
            None => return Ok(()),
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(e) => {
                writeln!(output, "{}", e)?;
                continue;
            }
        };
        debug!("console command {:?}", command);
        match command {
            ConsoleCommand::Click { row, col } => {
                let field = match game.position().field(row, col) {
                    Ok(field) => field,
                    Err(e) => {
                        writeln!(output, "{}", e)?;
                        continue;
                    }
                };
                if let Err(e) = game.click(field) {
                    writeln!(output, "{}", e)?;
                }
                writeln!(output, "{}", render_board(game.position(), game.candidates()))?;
            }
            ConsoleCommand::Board => writeln!(output, "{}", render_board(game.position(), game.candidates()))?,
            ConsoleCommand::Moves => match game.candidates() {
                Some(candidates) => {
                    for (destination, captured) in candidates {
                        writeln!(output, "{} capturing {}", destination, captured.len())?;
                    }
                }
                None => writeln!(output, "no piece selected")?,
            },
            ConsoleCommand::Reset => {
                let config = *game.position().config();
                if let Err(e) = game.reset(config) {
                    writeln!(output, "{}", e)?;
                }
                writeln!(output, "{}", render_board(game.position(), None))?;
            }
            ConsoleCommand::Help => writeln!(output, "{}", HELP)?,
            ConsoleCommand::Quit => return Ok(()),
        }
    }
}

/// Lets the bot finish every turn that is its own, redrawing after each step.
fn play_bot<W: Write>(game: &mut Game, bot: &mut dyn Engine, output: &mut W) -> std::io::Result<()> {
    while game.result() == GameResult::InProgress
        && game.side_to_move() == bot.side()
        && *game.state() == TurnState::NoSelection
    {
        let mut written = Ok(());
        let turn = game.play_engine_turn(bot, &mut |position| {
            if written.is_ok() {
                written = writeln!(output, "{}", render_board(position, None));
            }
        });
        written?;
        if let Err(e) = turn {
            writeln!(output, "{} failed: {}", bot.name(), e)?;
            break;
        }
    }
    Ok(())
}

fn parse_command(line: &str) -> Result<ConsoleCommand, String> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    match tokens.as_slice() {
        ["board"] | ["b"] => Ok(ConsoleCommand::Board),
        ["moves"] | ["m"] => Ok(ConsoleCommand::Moves),
        ["reset"] => Ok(ConsoleCommand::Reset),
        ["help"] | ["?"] => Ok(ConsoleCommand::Help),
        ["quit"] | ["q"] => Ok(ConsoleCommand::Quit),
        [row, col] => {
            let row = row.parse().map_err(|_| format!("invalid row '{}'", row))?;
            let col = col.parse().map_err(|_| format!("invalid column '{}'", col))?;
            Ok(ConsoleCommand::Click { row, col })
        }
        _ => Err(format!("unknown command '{}', {}", line.trim(), HELP)),
    }
}
