//! Line-oriented front-end for GameOS.
//!
//! Reads stdin one line at a time. Lines starting with `#` are driver
//! commands; everything else goes to the GameOS terminal.

use anyhow::Result;
use gameos_core::headless::{GameResponse, HeadlessGame};
use gameos_core::SessionConfig;
use std::io::{self, BufRead, Write};
use tracing::debug;

/// Run the driver loop until EOF or `#quit`.
pub fn run_headless(config: SessionConfig) -> Result<()> {
    let mut game = HeadlessGame::new(config)?;

    println!("=== GameOS ===");
    println!("[STATUS] {}", game.status_line());
    println!();
    print_driver_help();
    println!();

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    print_prompt(&game, &mut stdout)?;

    for line in stdin.lock().lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            print_prompt(&game, &mut stdout)?;
            continue;
        }

        if let Some(command) = line.strip_prefix('#') {
            let parts: Vec<&str> = command.split_whitespace().collect();
            match parts.as_slice() {
                ["quit"] | ["exit"] => {
                    println!("Goodbye! Final: {}", game.status_line());
                    break;
                }
                ["status"] => println!("[STATUS] {}", game.status_line()),
                ["snapshot"] => match game.snapshot_json() {
                    Ok(json) => println!("[SNAPSHOT]\n{json}"),
                    Err(e) => println!("[ERROR] {e}"),
                },
                ["missions", "new"] => print_response(&game.new_missions()),
                ["play", name] => match game.play(name) {
                    Ok(response) => print_response(&response),
                    Err(e) => println!("[ERROR] {e}"),
                },
                ["play"] => println!("[ERROR] Usage: #play <snake|puzzle|speed|memory>"),
                ["help"] => print_driver_help(),
                _ => println!("[ERROR] Unknown command. Type #help for help."),
            }
        } else {
            debug!(line, "Terminal input");
            let response = game.send(line);
            print_response(&response);
        }

        // Periodic checks ride on each input line.
        let tick = game.tick();
        print_notifications(&tick);

        print_prompt(&game, &mut stdout)?;
    }

    Ok(())
}

fn print_prompt(game: &HeadlessGame, stdout: &mut io::Stdout) -> io::Result<()> {
    print!("{}@gameos:{}$ ", game.player_name(), game.cwd());
    stdout.flush()
}

fn print_response(response: &GameResponse) {
    if !response.output.is_empty() {
        let tag = if response.success { "[OUT]" } else { "[ERR]" };
        println!("{tag}");
        println!("{}", response.output);
    }
    if response.xp_gained > 0 {
        println!(
            "[XP] +{} (Level {}, {} total)",
            response.xp_gained, response.level, response.total_xp
        );
    }
    print_notifications(response);
}

fn print_notifications(response: &GameResponse) {
    for note in &response.notifications {
        println!("[NOTIFY] {note}");
    }
}

fn print_driver_help() {
    println!("Commands:");
    println!("  #quit          - Exit the game");
    println!("  #status        - Show level, XP and progress");
    println!("  #snapshot      - Dump the full session as JSON");
    println!("  #missions new  - Generate new daily missions");
    println!("  #play <game>   - Play a mini-game (snake, puzzle, speed, memory)");
    println!("  #help          - Show this help");
    println!("  (anything else runs in the GameOS terminal; try `help`)");
}

/// Apply command line overrides on top of the environment config.
pub fn parse_config_from_args(args: &[String], mut config: SessionConfig) -> Result<SessionConfig> {
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--name" => {
                if let Some(name) = args.get(i + 1) {
                    config.player_name = name.clone();
                    i += 1;
                }
            }
            "--seed" => {
                if let Some(seed) = args.get(i + 1) {
                    config = config.with_seed(seed.parse()?);
                    i += 1;
                }
            }
            "--streak" => {
                if let Some(days) = args.get(i + 1) {
                    config = config.with_login_streak(days.parse()?);
                    i += 1;
                }
            }
            "--reward-repeat-kills" => {
                config = config.with_repeat_kill_rewards(true);
            }
            _ => {}
        }
        i += 1;
    }
    Ok(config)
}
