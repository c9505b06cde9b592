use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "trip-tui")]
#[command(about = "Terminal UI for planning trips")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run against the trip planner backend (default)
    Run,
    /// Run in dev mode with local in-memory data
    Dev,
    /// Log in from the command line and save the session
    Login {
        /// Username; prompted for when omitted
        #[arg(short, long)]
        username: Option<String>,
    },
    /// Remove the saved session
    Logout,
    /// Download a trip as PDF into the export directory
    Export {
        /// Id of the trip to export
        trip_id: i64,
    },
    /// Print config path and create default file if missing
    ConfigPath,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_run() {
        let cli = Cli::try_parse_from(["trip-tui"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn export_takes_trip_id() {
        let cli = Cli::try_parse_from(["trip-tui", "export", "42"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Export { trip_id: 42 })));
        assert!(Cli::try_parse_from(["trip-tui", "export", "rome"]).is_err());
    }

    #[test]
    fn login_accepts_username_flag() {
        let cli = Cli::try_parse_from(["trip-tui", "login", "-u", "ana"]).unwrap();
        match cli.command {
            Some(Commands::Login { username }) => assert_eq!(username.as_deref(), Some("ana")),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
