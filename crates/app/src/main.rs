mod agent_mode;
mod autoplay;
mod engine;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use simulation::localization::DEFAULT_LOCALE;

use autoplay::AutoplayOptions;

const DEFAULT_SCENARIO: &str = "medium";

#[derive(Parser, Debug)]
#[command(name = "flood_commander")]
#[command(about = "Flood mitigation simulation and advisory engine")]
#[command(version)]
struct Args {
    /// Serve the JSON-lines agent protocol on stdin/stdout
    #[arg(long)]
    agent: bool,

    /// Scenario to autoplay
    #[arg(long, default_value = DEFAULT_SCENARIO)]
    scenario: String,

    /// Fixed seed for the rainfall and rollout sampling
    #[arg(long)]
    seed: Option<u64>,

    /// Locale for the summary
    #[arg(long, default_value = DEFAULT_LOCALE)]
    locale: String,

    /// Write the finished session as a replay archive
    #[arg(long)]
    replay_out: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
enum RunMode {
    Agent,
    Autoplay(AutoplayOptions),
}

impl From<Args> for RunMode {
    fn from(args: Args) -> Self {
        if args.agent {
            return RunMode::Agent;
        }
        RunMode::Autoplay(AutoplayOptions {
            scenario_id: args.scenario,
            seed: args.seed,
            locale: args.locale,
            replay_out: args.replay_out,
        })
    }
}

fn main() -> ExitCode {
    match RunMode::from(Args::parse()) {
        RunMode::Agent => {
            agent_mode::run_agent_mode();
            ExitCode::SUCCESS
        }
        RunMode::Autoplay(options) => match autoplay::run_autoplay(&options) {
            Ok(_) => ExitCode::SUCCESS,
            Err(message) => {
                eprintln!("autoplay failed: {message}");
                ExitCode::FAILURE
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use clap::error::ErrorKind;

    use super::*;

    fn parse(args: &[&str]) -> Result<RunMode, clap::Error> {
        let argv = std::iter::once("flood_commander").chain(args.iter().copied());
        Args::try_parse_from(argv).map(RunMode::from)
    }

    #[test]
    fn test_defaults_to_autoplay() {
        let RunMode::Autoplay(options) = parse(&[]).unwrap() else {
            panic!("expected autoplay");
        };
        assert_eq!(options.scenario_id, "medium");
        assert_eq!(options.seed, None);
        assert_eq!(options.locale, "en");
        assert!(options.replay_out.is_none());
    }

    #[test]
    fn test_autoplay_flags() {
        let mode = parse(&[
            "--scenario",
            "strong",
            "--seed",
            "99",
            "--replay-out",
            "/tmp/strong.fldr",
        ])
        .unwrap();
        assert_eq!(
            mode,
            RunMode::Autoplay(AutoplayOptions {
                scenario_id: "strong".to_string(),
                seed: Some(99),
                locale: "en".to_string(),
                replay_out: Some(PathBuf::from("/tmp/strong.fldr")),
            })
        );
    }

    #[test]
    fn test_agent_flag_wins() {
        assert_eq!(parse(&["--seed", "1", "--agent"]).unwrap(), RunMode::Agent);
    }

    #[test]
    fn test_bad_arguments() {
        let err = parse(&["--seed", "lots"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);

        let err = parse(&["--scenario"]).unwrap_err();
        assert!(err.to_string().contains("--scenario"));

        let err = parse(&["--fast"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }
}
