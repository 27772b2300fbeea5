//! bz: CLI binary for Botzee, a multi-player Yahtzee game.
//!
//! Subcommands:
//! - score
//! - scores
//! - suggest
//! - sim
//! - play

mod render;
mod session;

use std::env;
use std::io::{self, BufRead, Write};
use std::process;

use bz_core::{
    choose_target, rank_categories, score, scores_for_dice, suggest_holds, Action, Category,
    Config, Hand, HeldMask, PlayerKind, Scorecard,
};
use bz_logging::{GameManifestV1, GameRecordV1, NdjsonWriter, GAME_MANIFEST_VERSION};

use session::{ChanceSpec, Outcome, Session, SessionError};

fn parse_hand(args: &[String]) -> Hand {
    if args.len() != 5 {
        eprintln!("Expected 5 dice, got {}", args.len());
        process::exit(1);
    }
    let mut hand = [0u8; 5];
    for (d, a) in hand.iter_mut().zip(args) {
        *d = match a.parse::<u8>() {
            Ok(v) if (1..=6).contains(&v) => v,
            _ => {
                eprintln!("Invalid die value: {a} (expected 1..=6)");
                process::exit(1);
            }
        };
    }
    hand
}

fn parse_category(s: &str) -> Category {
    s.parse().unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(1);
    })
}

fn cmd_score(args: &[String]) {
    if args.len() != 6 {
        eprintln!("Usage: bz score <category> <d1> <d2> <d3> <d4> <d5>");
        process::exit(1);
    }
    let category = parse_category(&args[0]);
    let hand = parse_hand(&args[1..]);
    println!("{}", score(category, &hand));
}

fn cmd_scores(args: &[String]) {
    let hand = parse_hand(args);
    let table = scores_for_dice(hand);
    for c in Category::ALL {
        println!("{:<16} {:>3}", c.name(), table[c.index()]);
    }
}

fn cmd_suggest(args: &[String]) {
    let hand = parse_hand(args);
    let card = Scorecard::new();
    println!("Dice: {}", render::dice_line(hand, HeldMask::NONE));
    for r in rank_categories(&card, hand) {
        println!(
            "{:<16} {:>3}  ({:>5.1}%)",
            r.category.name(),
            r.score,
            r.efficiency * 100.0
        );
    }
    if let Some(target) = choose_target(&card, hand) {
        let holds = suggest_holds(hand, target);
        println!();
        println!("Target: {}", target.name());
        println!("Hold:   {}", render::dice_line(hand, holds));
    }
}

/// Flags shared by `sim` and `play`.
struct RunOpts {
    config: Config,
    config_bytes: Option<Vec<u8>>,
    seed: Option<u64>,
    deterministic: bool,
    events: Option<String>,
    manifest: Option<String>,
    games: u64,
}

fn parse_run_opts(cmd: &str, usage: &str, args: &[String], allow_sim_flags: bool) -> RunOpts {
    let mut config_path: Option<String> = None;
    let mut seed: Option<u64> = None;
    let mut deterministic = false;
    let mut events: Option<String> = None;
    let mut manifest: Option<String> = None;
    let mut games: u64 = 1;

    let mut i = 0usize;
    while i < args.len() {
        let flag = args[i].as_str();
        let value = || -> String {
            match args.get(i + 1) {
                Some(v) => v.clone(),
                None => {
                    eprintln!("Missing value for {flag}");
                    process::exit(1);
                }
            }
        };
        match flag {
            "--help" | "-h" => {
                println!("{usage}");
                process::exit(0);
            }
            "--config" => {
                config_path = Some(value());
                i += 2;
            }
            "--seed" => {
                let v = value();
                seed = Some(v.parse().unwrap_or_else(|_| {
                    eprintln!("Invalid --seed value: {v}");
                    process::exit(1);
                }));
                i += 2;
            }
            "--deterministic" => {
                deterministic = true;
                i += 1;
            }
            "--events" => {
                events = Some(value());
                i += 2;
            }
            "--manifest" if allow_sim_flags => {
                manifest = Some(value());
                i += 2;
            }
            "--games" if allow_sim_flags => {
                let v = value();
                games = v.parse().unwrap_or_else(|_| {
                    eprintln!("Invalid --games value: {v}");
                    process::exit(1);
                });
                i += 2;
            }
            other => {
                eprintln!("Unknown option for `bz {cmd}`: {other}");
                eprintln!("Run `bz {cmd} --help` for usage.");
                process::exit(1);
            }
        }
    }

    let (config, config_bytes) = match config_path {
        Some(p) => {
            let bytes = std::fs::read(&p).unwrap_or_else(|e| {
                eprintln!("Failed to read config file: {e}");
                process::exit(1);
            });
            let text = String::from_utf8_lossy(&bytes);
            let cfg = Config::from_yaml(&text).unwrap_or_else(|e| {
                eprintln!("Failed to load config: {e}");
                process::exit(1);
            });
            (cfg, Some(bytes))
        }
        None => (Config::default(), None),
    };

    // Flags override the config file.
    RunOpts {
        seed: seed.or(config.chance.seed),
        deterministic: deterministic || config.chance.deterministic,
        events: events.or_else(|| config.logging.events_path.clone()),
        manifest: manifest.or_else(|| config.logging.manifest_path.clone()),
        games,
        config,
        config_bytes,
    }
}

fn open_events(opts: &RunOpts) -> Option<NdjsonWriter> {
    let path = opts.events.as_ref()?;
    let w = NdjsonWriter::open_append_with_flush(path, opts.config.logging.flush_every_lines)
        .unwrap_or_else(|e| {
            eprintln!("Failed to open event log {path}: {e}");
            process::exit(1);
        });
    Some(w)
}

fn fail(e: SessionError) -> ! {
    eprintln!("{e}");
    process::exit(1);
}

fn cmd_sim(args: &[String]) {
    let usage = r#"bz sim

USAGE:
    bz sim [--config PATH] [--seed S] [--games N] [--deterministic] [--events PATH] [--manifest PATH]

OPTIONS:
    --config PATH     Path to YAML config (default: built-in three seats)
    --seed S          Base seed; game i uses S+i (default: config, else clock)
    --games N         Number of games to play (default: 1)
    --deterministic   Use the event-keyed dice stream
    --events PATH     Append NDJSON game events to PATH
    --manifest PATH   Write a JSON manifest of every game to PATH
"#;
    let opts = parse_run_opts("sim", usage, args, true);
    let base_seed = opts.seed.unwrap_or_else(bz_logging::now_ms);
    let mut log = open_events(&opts);
    let base_players = opts.config.build_players();
    let n = base_players.len();

    let mut records: Vec<GameRecordV1> = Vec::new();
    let mut wins = vec![0u64; n];
    let mut sums = vec![0u64; n];
    let mut last_state = None;

    for g in 0..opts.games {
        let chance = ChanceSpec {
            seed: base_seed.wrapping_add(g),
            deterministic: opts.deterministic,
        };
        // Rotate who opens so no seat always moves first.
        let fresh = bz_core::new_game(base_players.clone(), opts.config.rules)
            .rotate_seats(g as usize % n);
        let mut session =
            Session::resume(fresh, chance, g, log.as_mut()).unwrap_or_else(|e| fail(e));
        while !session.is_over() {
            session.play_advised_turn(|_, _| {}).unwrap_or_else(|e| fail(e));
        }
        let state = session.state.clone();
        let record = session.finish().unwrap_or_else(|e| fail(e));

        let line: Vec<String> = record
            .totals
            .iter()
            .map(|t| format!("{}={}", t.name, t.grand_total))
            .collect();
        let winner_names: Vec<&str> = record
            .winners
            .iter()
            .map(|&w| state.players[w].name.as_str())
            .collect();
        println!(
            "Game {} (seed {}): {}  winner: {}",
            g,
            chance.seed,
            line.join(" "),
            winner_names.join(", ")
        );

        for t in &record.totals {
            if let Some(k) = base_players.iter().position(|p| p.name == t.name) {
                sums[k] += t.grand_total as u64;
            }
        }
        for &w in &record.winners {
            if let Some(k) = base_players
                .iter()
                .position(|p| p.name == state.players[w].name)
            {
                wins[k] += 1;
            }
        }
        records.push(record);
        last_state = Some(state);
    }

    if let Some(state) = &last_state {
        println!();
        print!("{}", render::scorecards(state));
    }
    if opts.games > 1 {
        println!();
        println!("Summary over {} games:", opts.games);
        for (k, p) in base_players.iter().enumerate() {
            println!(
                "  - {}: mean={:.2} wins={}",
                p.name,
                sums[k] as f64 / opts.games as f64,
                wins[k]
            );
        }
    }

    if let Some(path) = &opts.manifest {
        let manifest = GameManifestV1 {
            game_manifest_version: GAME_MANIFEST_VERSION,
            created_ts_ms: bz_logging::now_ms(),
            ruleset_id: bz_core::RULESET_ID.to_string(),
            yahtzee_bonus_rule: match opts.config.rules.yahtzee_bonus {
                bz_core::YahtzeeBonusRule::Placeholder => "placeholder".to_string(),
                bz_core::YahtzeeBonusRule::Standard => "standard".to_string(),
            },
            git_hash: bz_logging::try_git_hash(),
            config_hash: opts
                .config_bytes
                .as_deref()
                .map(bz_logging::hash_config_bytes),
            seed: base_seed,
            chance_mode: ChanceSpec {
                seed: base_seed,
                deterministic: opts.deterministic,
            }
            .mode_name()
            .to_string(),
            players: base_players.iter().map(|p| p.name.clone()).collect(),
            games: records,
        };
        bz_logging::write_manifest_atomic(path, &manifest).unwrap_or_else(|e| {
            eprintln!("Failed to write manifest: {e}");
            process::exit(1);
        });
    }
}

const PLAY_HELP: &str = r#"Commands:
    roll              Roll the dice that are not held
    hold <pos...>     Toggle hold on dice positions 1..5
    score <category>  Score the dice in a category (e.g. full_house, 3k, chance)
    options           Show what the dice would score in each open category
    card              Show the scorecards
    help              Show this help
    quit              Leave the game"#;

fn report(out: &mut impl Write, state: &bz_core::GameState, outcome: &Outcome) {
    match outcome {
        Outcome::Rolled {
            dice,
            rolls_remaining,
        } => {
            let _ = writeln!(
                out,
                "Dice: {}  ({} rolls left)",
                render::dice_line(*dice, state.turn.held),
                rolls_remaining
            );
        }
        Outcome::Held { held } => {
            if let Some(dice) = state.turn.dice {
                let _ = writeln!(out, "Dice: {}", render::dice_line(dice, *held));
            }
        }
        Outcome::Committed(c) => {
            let name = &state.players[c.player].name;
            let _ = write!(out, "{} scores {} in {}", name, c.points, c.category.name());
            if c.yahtzee_bonus {
                let _ = write!(out, " (+{} Yahtzee bonus)", bz_core::YAHTZEE_BONUS);
            }
            let _ = writeln!(out);
        }
    }
}

fn cmd_play(args: &[String]) {
    let usage = r#"bz play

USAGE:
    bz play [--config PATH] [--seed S] [--deterministic] [--events PATH]

Reads one command per line from stdin. Bot seats move on their own.
"#;
    let opts = parse_run_opts("play", usage, args, false);
    let seed = opts.seed.unwrap_or_else(bz_logging::now_ms);
    let mut log = open_events(&opts);
    let chance = ChanceSpec {
        seed,
        deterministic: opts.deterministic,
    };
    let mut session = Session::start(
        opts.config.build_players(),
        opts.config.rules,
        chance,
        0,
        log.as_mut(),
    )
    .unwrap_or_else(|e| fail(e));

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    let _ = writeln!(
        out,
        "Botzee: {} seats, seed {}. Type `help` for commands.",
        session.state.players.len(),
        seed
    );

    let mut announced: Option<usize> = None;
    while !session.is_over() {
        let active = session.state.turn.active_player;
        let player = session.state.players[active].clone();

        if player.kind == PlayerKind::Bot {
            let _ = writeln!(out, "{} is thinking...", player.name);
            session
                .play_advised_turn(|s, o| report(&mut out, s, o))
                .unwrap_or_else(|e| fail(e));
            announced = None;
            continue;
        }

        if announced != Some(active) {
            let _ = writeln!(out, "{}'s turn.", player.name);
            announced = Some(active);
        }
        let _ = write!(out, "{}> ", player.name);
        let _ = out.flush();

        let Some(Ok(line)) = lines.next() else {
            break;
        };
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((&cmd, rest)) = words.split_first() else {
            continue;
        };

        let actions: Vec<Action> = match cmd {
            "roll" | "r" => vec![Action::Roll],
            "hold" | "h" => {
                if rest.is_empty() {
                    let _ = writeln!(out, "Usage: hold <pos...> (positions 1..5)");
                    continue;
                }
                let mut acts = Vec::with_capacity(rest.len());
                for w in rest {
                    match w.parse::<u8>() {
                        Ok(p) if p >= 1 => acts.push(Action::ToggleHold { pos: p - 1 }),
                        _ => {
                            let _ = writeln!(out, "Not a die position: {w}");
                        }
                    }
                }
                acts
            }
            "score" | "s" => match rest.join("_").parse::<Category>() {
                Ok(category) => vec![Action::Commit { category }],
                Err(e) => {
                    let _ = writeln!(out, "{e}");
                    continue;
                }
            },
            "options" | "o" => {
                for (c, pts) in bz_core::potential_scores(&session.state) {
                    let _ = writeln!(out, "  {:<16} {:>3}", c.name(), pts);
                }
                continue;
            }
            "card" | "c" => {
                let _ = write!(out, "{}", render::scorecards(&session.state));
                continue;
            }
            "help" | "?" => {
                let _ = writeln!(out, "{PLAY_HELP}");
                continue;
            }
            "quit" | "q" | "exit" => break,
            other => {
                let _ = writeln!(out, "Unknown command: {other} (type `help`)");
                continue;
            }
        };

        for a in actions {
            match session.apply(a) {
                Ok(o) => report(&mut out, &session.state, &o),
                Err(SessionError::Illegal(e)) => {
                    let _ = writeln!(out, "Not allowed: {e}");
                }
                Err(e) => fail(e),
            }
        }
    }

    if session.is_over() {
        let _ = writeln!(out, "Game over.");
        let _ = write!(out, "{}", render::scorecards(&session.state));
        if let Some(w) = bz_core::winners(&session.state) {
            let names: Vec<&str> = w
                .iter()
                .map(|&i| session.state.players[i].name.as_str())
                .collect();
            let _ = writeln!(out, "Winner: {}", names.join(", "));
        }
        session.finish().unwrap_or_else(|e| fail(e));
    } else {
        drop(session);
    }
    if let Some(w) = log.as_mut() {
        let _ = w.flush();
    }
}

fn print_help() {
    eprintln!(
        r#"bz - Botzee, multi-player Yahtzee

USAGE:
    bz <COMMAND> [OPTIONS]

COMMANDS:
    score <cat> <d1..d5>   Score five dice in one category
    scores <d1..d5>        Score five dice in every category
    suggest <d1..d5>       Rank categories and suggest dice to hold
    sim                    Play complete games with advisor-driven seats
    play                   Play a game on stdin/stdout

OPTIONS:
    -h, --help          Print this help message
    -V, --version       Print version

Run `bz <COMMAND> --help` for command options.
"#
    );
}

fn print_version() {
    println!("bz {}", env!("CARGO_PKG_VERSION"));
}

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_help();
        process::exit(0);
    }

    match args[1].as_str() {
        "-h" | "--help" | "help" => {
            print_help();
        }
        "-V" | "--version" => {
            print_version();
        }
        "score" => cmd_score(&args[2..]),
        "scores" => cmd_scores(&args[2..]),
        "suggest" => cmd_suggest(&args[2..]),
        "sim" => cmd_sim(&args[2..]),
        "play" => cmd_play(&args[2..]),
        cmd => {
            eprintln!("Unknown command: {}", cmd);
            eprintln!("Run `bz --help` for usage.");
            process::exit(1);
        }
    }
}
