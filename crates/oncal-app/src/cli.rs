use clap::Parser;

/// Show the normalized form and upcoming elapses of calendar expressions.
#[derive(Debug, Parser)]
#[command(name = "oncal", version, about, long_about = None)]
pub struct Cli {
    /// Calendar expressions. Lines of one argument are merged into one
    /// schedule.
    #[arg(required = true, value_name = "EXPRESSION")]
    pub expressions: Vec<String>,

    /// Number of elapses to show per expression
    #[arg(short = 'n', long, value_parser = clap::value_parser!(u16).range(1..))]
    pub iterations: Option<u16>,

    /// Instant to start after, e.g. `2020-01-01 12:00 Europe/Riga`
    #[arg(long, value_name = "INSTANT")]
    pub start: Option<String>,

    /// Zone elapses are shown in, and zone of `--start` values without one
    #[arg(long, value_name = "ZONE")]
    pub timezone: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_options() {
        let cli = Cli::try_parse_from([
            "oncal",
            "-n",
            "3",
            "--start",
            "2020-01-01Z",
            "--timezone",
            "Europe/Riga",
            "*:*",
            "daily",
        ])
        .expect("valid arguments");

        assert_eq!(cli.expressions, ["*:*", "daily"]);
        assert_eq!(cli.iterations, Some(3));
        assert_eq!(cli.start.as_deref(), Some("2020-01-01Z"));
        assert_eq!(cli.timezone.as_deref(), Some("Europe/Riga"));
    }

    #[test]
    fn test_requires_expression() {
        assert!(Cli::try_parse_from(["oncal"]).is_err());
    }

    #[test]
    fn test_rejects_zero_iterations() {
        assert!(Cli::try_parse_from(["oncal", "-n", "0", "*:*"]).is_err());
    }
}
