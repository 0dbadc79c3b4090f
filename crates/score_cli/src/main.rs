//! Score CLI
//!
//! Create matches, replay point sequences and inspect snapshots stored as JSON.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use score_core::{
    apply_point, apply_side_change, flatten_match, get_important_point, match_schema_json,
    new_match, Match, MatchSetup, TeamId,
};

#[derive(Parser)]
#[command(name = "score")]
#[command(about = "Tennis and padel match scoring", long_about = None)]
struct Cli {
    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a match from a setup JSON file
    New {
        /// Match setup JSON (teams, format, settings)
        #[arg(long)]
        setup: PathBuf,

        /// Output match JSON file
        #[arg(long)]
        out: PathBuf,
    },

    /// Apply a sequence of points to a stored match
    Replay {
        /// Match JSON file
        #[arg(long = "match")]
        match_path: PathBuf,

        /// Point winners, e.g. "AABBA ABAA" (whitespace ignored)
        #[arg(long)]
        points: String,

        /// Output match JSON file (defaults to overwriting --match)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Print the score of a stored match
    Status {
        /// Match JSON file
        #[arg(long = "match")]
        match_path: PathBuf,

        /// Print the flat overlay JSON instead
        #[arg(long, default_value = "false")]
        overlay: bool,
    },

    /// Print the JSON Schema of the match document
    Schema {
        /// Write to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if cli.verbose { "debug" } else { "warn" }),
    )
    .init();

    match cli.command {
        Commands::New { setup, out } => {
            let raw = fs::read_to_string(&setup)
                .with_context(|| format!("reading setup {}", setup.display()))?;
            let setup: MatchSetup = serde_json::from_str(&raw).context("parsing match setup")?;
            let state = new_match(setup)?;

            write_match(&out, &state)?;
            println!("🎾 Match {} created", state.id);
            println!("   Output: {}", out.display());
        }

        Commands::Replay { match_path, points, out } => {
            let state = read_match(&match_path)?;
            let sequence = parse_points(&points)?;

            println!("🔁 Replaying {} points...", sequence.len());
            let (state, applied) = replay(state, &sequence);
            if applied < sequence.len() {
                println!("   ⚠️  Match finished after {} points, {} ignored", applied, sequence.len() - applied);
            }

            log::debug!("match {}: replayed {} points, now {}", state.id, applied, state.scoreline());

            let target = out.unwrap_or(match_path);
            write_match(&target, &state)?;
            print_status(&state);
            println!("   Output: {}", target.display());
        }

        Commands::Status { match_path, overlay } => {
            let state = read_match(&match_path)?;
            if overlay {
                println!("{}", serde_json::to_string_pretty(&flatten_match(&state))?);
            } else {
                print_status(&state);
            }
        }

        Commands::Schema { out } => {
            let schema = match_schema_json().map_err(anyhow::Error::msg)?;
            match out {
                Some(path) => {
                    fs::write(&path, schema)?;
                    println!("✅ Schema written to {}", path.display());
                }
                None => println!("{}", schema),
            }
        }
    }

    Ok(())
}

/// `A`/`B` characters (case-insensitive), whitespace ignored.
fn parse_points(points: &str) -> Result<Vec<TeamId>> {
    let mut sequence = Vec::with_capacity(points.len());
    for (i, c) in points.chars().enumerate() {
        match c {
            'A' | 'a' => sequence.push(TeamId::TeamA),
            'B' | 'b' => sequence.push(TeamId::TeamB),
            c if c.is_whitespace() => {}
            other => bail!("invalid point '{}' at position {}: expected A or B", other, i + 1),
        }
    }
    Ok(sequence)
}

/// Apply `sequence`, switching ends whenever a change is due before the point.
/// Returns the final snapshot and how many points were scored.
fn replay(mut state: Match, sequence: &[TeamId]) -> (Match, usize) {
    let mut applied = 0;
    for &team in sequence {
        if state.is_completed {
            break;
        }
        state = apply_point(&apply_side_change(&state), team);
        applied += 1;
    }
    (state, applied)
}

fn read_match(path: &Path) -> Result<Match> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("reading match {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing match {}", path.display()))
}

fn write_match(path: &Path, state: &Match) -> Result<()> {
    let json = serde_json::to_string_pretty(state)?;
    fs::write(path, json).with_context(|| format!("writing match {}", path.display()))
}

fn print_status(state: &Match) {
    println!("📊 Match {}", state.id);
    println!("   Score:  {}", state.scoreline());

    if let Some(winner) = state.winner {
        println!("   🏆 Winner: {}", winner);
        return;
    }

    let server = state.current_server;
    println!("   Server: {} (player {})", server.team, server.player_index + 1);
    println!(
        "   Sides:  teamA {:?}, teamB {:?}",
        state.court_sides.team_a, state.court_sides.team_b
    );
    if state.should_change_sides {
        println!("   ↔️  Change of ends due");
    }

    let point = get_important_point(Some(state));
    if let (Some(kind), Some(team)) = (point.kind, point.team) {
        println!("   ⭐ {:?} for {}", kind, team);
    }
}
