use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser, Debug)]
#[command(author, version, about = "Swiss-system chess tournament manager")]
pub struct Cli {
    /// Directory holding players and tournaments (overrides CHESS_DATA_DIR)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Manage registered players
    #[clap(subcommand)]
    Player(PlayerCommand),
    /// Create, inspect and finish tournaments
    #[clap(subcommand)]
    Tournament(TournamentCommand),
    /// Run rounds and record results
    #[clap(subcommand)]
    Round(RoundCommand),
    /// Show current standings of a tournament
    Standings {
        /// Tournament id
        tournament: String,
    },
    /// Print shell completions to stdout
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum PlayerCommand {
    /// Register a new player
    Add {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        /// DD-MM-YYYY or YYYY-MM-DD
        #[arg(long)]
        birth_date: String,
        /// Two letters followed by five digits, e.g. AB12345
        #[arg(long)]
        national_id: String,
    },
    /// List players alphabetically
    List,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum TournamentCommand {
    /// Create a tournament
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        location: String,
        /// DD-MM-YYYY or YYYY-MM-DD
        #[arg(long)]
        start_date: String,
        #[arg(long)]
        end_date: Option<String>,
        /// Number of rounds (defaults to CHESS_DEFAULT_ROUNDS or 4)
        #[arg(long)]
        rounds: Option<u32>,
        #[arg(long, default_value = "")]
        description: String,
        /// Entrant national ids; every registered player when omitted
        #[arg(long = "player", value_name = "NATIONAL_ID")]
        players: Vec<String>,
    },
    /// List all tournaments
    List,
    /// Show rounds, games and standings
    Show { tournament: String },
    /// List tournaments that are not finished yet
    Unfinished,
    /// Add a registered player before the first round
    Enroll {
        tournament: String,
        national_id: String,
    },
    /// Withdraw a player from future rounds
    Withdraw {
        tournament: String,
        national_id: String,
    },
    /// Finish the tournament and credit lifetime scores
    Finish { tournament: String },
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum RoundCommand {
    /// Pair and start the next round
    Start { tournament: String },
    /// Record a game result
    Result {
        tournament: String,
        /// Game id as ROUND.BOARD, e.g. 2.1
        game: String,
        /// 1-0, 0-1 or 1/2-1/2 (also white, black, draw)
        outcome: String,
    },
    /// List games still waiting for a result
    Pending { tournament: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_result() {
        let cli = Cli::try_parse_from([
            "chess-tournament",
            "--data-dir",
            "/tmp/chess",
            "round",
            "result",
            "club-cup",
            "2.1",
            "1-0",
        ])
        .unwrap();

        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/chess")));
        assert_eq!(
            cli.command,
            Command::Round(RoundCommand::Result {
                tournament: "club-cup".to_string(),
                game: "2.1".to_string(),
                outcome: "1-0".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_create_with_entrants() {
        let cli = Cli::try_parse_from([
            "chess-tournament",
            "tournament",
            "create",
            "--name",
            "Club Cup",
            "--location",
            "Paris",
            "--start-date",
            "06-03-2025",
            "--player",
            "AB12345",
            "--player",
            "CD67890",
        ])
        .unwrap();

        match cli.command {
            Command::Tournament(TournamentCommand::Create { players, rounds, .. }) => {
                assert_eq!(players, vec!["AB12345", "CD67890"]);
                assert_eq!(rounds, None);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
