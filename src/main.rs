//! copt - declarative command-line option parsing.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use copt::{
    generate_help, generate_output_string, parse, render_help, Arity, CallbackError, MatchMode,
    OptionDescriptor, ParseOutcome, Registry, RegistryConfig, Validation,
};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Parse arguments against a declared option list.
#[derive(Parser, Debug)]
#[command(name = "copt", version, about, disable_help_subcommand = true)]
struct Cli {
    /// Log parser decisions to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Where the option declarations come from.
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct ConfigSource {
    /// JSON option declarations
    #[arg(long)]
    config: Option<String>,

    /// File containing JSON option declarations
    #[arg(long, value_name = "PATH")]
    config_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse arguments and print the state of every option as JSON
    Parse {
        #[command(flatten)]
        source: ConfigSource,

        /// Accept unambiguous abbreviations of option names (overrides config)
        #[arg(long)]
        abbreviations: bool,

        /// Arguments to parse
        #[arg(last = true)]
        args: Vec<String>,
    },

    /// Print the option syntax
    Help {
        #[command(flatten)]
        source: ConfigSource,
    },

    /// Run the built-in demo option list
    Demo {
        /// Arguments to parse
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_config(source: &ConfigSource) -> Result<RegistryConfig> {
    let json = match (&source.config, &source.config_file) {
        (Some(json), _) => json.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?,
        (None, None) => bail!("either --config or --config-file is required"),
    };
    let cfg = RegistryConfig::from_json(&json).context("failed to parse config JSON")?;
    cfg.validate().context("invalid config")?;
    Ok(cfg)
}

fn validate_a(_: &OptionDescriptor, _: &mut ()) -> Validation {
    println!("got option a");
    Validation::Continue
}

fn validate_b(option: &OptionDescriptor, _: &mut ()) -> Validation {
    println!(
        "got option b with value {}",
        option.value().unwrap_or_default()
    );
    Validation::Continue
}

fn validate_c(option: &OptionDescriptor, _: &mut ()) -> Validation {
    match option.value() {
        Some(value) => println!("got option c with value {}", value),
        None => println!("got option c with no value"),
    }
    Validation::Continue
}

fn missing_c(_: &OptionDescriptor, _: &mut ()) -> Result<(), CallbackError> {
    Err(CallbackError::MissingOption)
}

/// The demo option list: three single-letter options, a divider and three words.
fn demo_registry() -> Registry {
    Registry::new()
        .with(OptionDescriptor::new("-a", "option a").on_validate(validate_a))
        .with(
            OptionDescriptor::new("-b", "option b")
                .arity(Arity::Required)
                .on_validate(validate_b),
        )
        .with(
            OptionDescriptor::new("-c", "option c")
                .arity(Arity::Optional)
                .on_validate(validate_c)
                .on_missing(missing_c),
        )
        .with(OptionDescriptor::divider("more options:"))
        .with(OptionDescriptor::new("do", "option do"))
        .with(OptionDescriptor::new("re", "option re").arity(Arity::Optional))
        .with(OptionDescriptor::new("me", "option me").arity(Arity::Required))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Parse {
            source,
            abbreviations,
            args,
        } => {
            let mut registry: Registry = load_config(&source)?.into_registry();
            if abbreviations {
                registry.set_match_mode(MatchMode::UniquePrefix);
            }

            let outcome =
                parse(&args, &mut registry, &mut ()).context("failed to parse arguments")?;
            let report = generate_output_string(&registry, &outcome)
                .context("failed to generate output")?;
            println!("{}", report);
        }
        Commands::Help { source } => {
            let registry: Registry = load_config(&source)?.into_registry();
            print!("{}", generate_help(&registry));
        }
        Commands::Demo { args } => {
            let mut registry = demo_registry();
            render_help(&registry);
            match parse(&args, &mut registry, &mut ()) {
                Ok(ParseOutcome::Complete) => {}
                Ok(ParseOutcome::Stopped { option }) => {
                    info!(option = %option, "parsing stopped early");
                }
                Err(err) => {
                    eprintln!("{}", err);
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use copt::ParseError;
    use std::io::Write;

    #[test]
    fn test_parse_subcommand_parses_config() {
        let cli = Cli::try_parse_from(["copt", "parse", "--config", r#"{"options":[]}"#, "--"])
            .unwrap();

        match cli.command {
            Commands::Parse {
                source,
                abbreviations,
                args,
            } => {
                assert_eq!(source.config.as_deref(), Some(r#"{"options":[]}"#));
                assert!(source.config_file.is_none());
                assert!(!abbreviations);
                assert!(args.is_empty());
            }
            _ => panic!("Expected Parse command"),
        }
    }

    #[test]
    fn test_parse_subcommand_parses_args() {
        let cli = Cli::try_parse_from([
            "copt",
            "parse",
            "--config",
            "{}",
            "--abbreviations",
            "--",
            "-a",
            "-b",
            "x",
            "me=1",
        ])
        .unwrap();

        match cli.command {
            Commands::Parse {
                args,
                abbreviations,
                ..
            } => {
                assert!(abbreviations);
                assert_eq!(args, vec!["-a", "-b", "x", "me=1"]);
            }
            _ => panic!("Expected Parse command"),
        }
    }

    #[test]
    fn test_parse_subcommand_requires_config() {
        let result = Cli::try_parse_from(["copt", "parse", "--"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_config_and_config_file_conflict() {
        let result = Cli::try_parse_from([
            "copt",
            "help",
            "--config",
            "{}",
            "--config-file",
            "opts.json",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_verbose_before_subcommand() {
        let cli = Cli::try_parse_from(["copt", "--verbose", "demo", "--", "-a"]).unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Demo { args } => assert_eq!(args, vec!["-a"]),
            _ => panic!("Expected Demo command"),
        }
    }

    #[test]
    fn test_demo_accepts_hyphen_args_without_separator() {
        let cli = Cli::try_parse_from(["copt", "demo", "-a", "-b", "x", "-c=5", "do"]).unwrap();
        match cli.command {
            Commands::Demo { args } => assert_eq!(args, vec!["-a", "-b", "x", "-c=5", "do"]),
            _ => panic!("Expected Demo command"),
        }
    }

    #[test]
    fn test_demo_error_message_names_option() {
        let mut registry = demo_registry();
        let err = parse(&["-z"], &mut registry, &mut ()).unwrap_err();
        assert_eq!(err.to_string(), "unrecognized option -z");
    }

    #[test]
    fn test_cli_requires_subcommand() {
        let result = Cli::try_parse_from(["copt"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_help() {
        // Verify the command can generate help without panicking
        Cli::command().debug_assert();
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"options":[{{"name":"-q","description":"quiet"}}]}}"#
        )
        .unwrap();

        let source = ConfigSource {
            config: None,
            config_file: Some(file.path().to_path_buf()),
        };
        let cfg = load_config(&source).unwrap();
        assert_eq!(cfg.options.len(), 1);
        assert_eq!(cfg.options[0].name.as_deref(), Some("-q"));
    }

    #[test]
    fn test_load_config_rejects_invalid() {
        let source = ConfigSource {
            config: Some(r#"{"options":[{"name":"-a"},{"name":"-a"}]}"#.to_string()),
            config_file: None,
        };
        assert!(load_config(&source).is_err());
    }

    #[test]
    fn test_load_config_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = ConfigSource {
            config: None,
            config_file: Some(dir.path().join("absent.json")),
        };
        assert!(load_config(&source).is_err());
    }

    #[test]
    fn test_demo_requires_option_c() {
        let mut registry = demo_registry();
        let result = parse(&["-a", "-b", "x"], &mut registry, &mut ());
        assert_eq!(result, Err(ParseError::MissingOption("-c".to_string())));
        assert_eq!(registry.value_of("-b"), Some("x"));
    }

    #[test]
    fn test_demo_full_command_line() {
        let mut registry = demo_registry();
        let result = parse(
            &["-a", "-b", "x", "-c=5", "do", "re", "me=y"],
            &mut registry,
            &mut (),
        );
        assert_eq!(result, Ok(ParseOutcome::Complete));
        assert_eq!(registry.value_of("-c"), Some("5"));
        assert!(registry.is_present("re"));
        assert!(registry.value_of("re").is_none());
        assert_eq!(registry.value_of("me"), Some("y"));
    }

    #[test]
    fn test_demo_help() {
        let help = generate_help(&demo_registry());
        assert!(help.starts_with("-a ......... option a\n"));
        assert!(help.contains("\nmore options:\n"));
    }
}
