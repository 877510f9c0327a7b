#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;

use std::io;
use std::path;
use std::process;

use anyhow::bail;
use anyhow::Result;
use clap::builder::PossibleValuesParser;
use clap::value_parser;
use clap::Arg;
use clap::ArgAction;
use clap::ArgGroup;
use clap::ArgMatches;
use clap::Command;
use clap_complete::generate;
use clap_complete::Generator;
use clap_complete::Shell;
use strum::VariantNames;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use yansi::Paint;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Session;
use crate::domain::models::SessionIdStyle;
use crate::domain::models::Transcript;
use crate::domain::services::actions::help_text;
use crate::domain::services::clipboard::format_messages;
use crate::domain::services::open_session;
use crate::domain::services::run_turn;
use crate::domain::services::Transcripts;
use crate::infrastructure::orchestrators::OrchestratorManager;

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
    process::exit(0);
}

fn format_transcript(transcript: &Transcript) -> String {
    let mut res = format!(
        "- (ID: {}) {}, App: {}",
        transcript.id, transcript.timestamp, transcript.app_name,
    );

    if let Some(message) = transcript.messages.first() {
        let mut line = message.text.lines().next().unwrap_or_default().to_string();

        if line.chars().count() >= 70 {
            line = format!("{}...", line.chars().take(67).collect::<String>());
        }
        res = format!("{res}, {line}");
    }

    return res;
}

async fn print_sessions_list() -> Result<()> {
    let mut transcripts = Transcripts::default()
        .list()
        .await?
        .iter()
        .map(|transcript| {
            return format_transcript(transcript);
        })
        .collect::<Vec<String>>();

    transcripts.reverse();

    if transcripts.is_empty() {
        println!("There are no sessions available. You should start your first one!");
    } else {
        println!("{}", transcripts.join("\n"));
    }

    return Ok(());
}

async fn print_session(session_id: &str) -> Result<()> {
    let transcript = Transcripts::default().load(session_id).await?;
    println!("{}", format_messages(&transcript.messages));

    return Ok(());
}

async fn create_config_file() -> Result<()> {
    let config_file_path_str = Config::default(ConfigKey::ConfigFile);
    let config_file_path = path::PathBuf::from(&config_file_path_str);
    if config_file_path.exists() {
        bail!(format!(
            "Config file already exists at {config_file_path_str}"
        ));
    }

    if let Some(parent) = config_file_path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).await?;
        }
    }

    let mut file = fs::File::create(&config_file_path).await?;
    file.write_all(Config::serialize_default(build()).as_bytes())
        .await?;

    println!("Created default config file at {config_file_path_str}");
    return Ok(());
}

/// Runs a single research turn without the terminal UI. The reply goes to
/// stdout, failures to stderr with a non-zero exit code.
async fn ask(question: &str) -> Result<()> {
    let orchestrator = OrchestratorManager::get();
    let style = SessionIdStyle::parse(&Config::get(ConfigKey::SessionIdStyle))
        .unwrap_or(SessionIdStyle::Timestamp);

    let mut session = Session::default();
    let res = match open_session(&orchestrator, &session.user_id, style).await {
        Ok(session_id) => {
            session.activate(&session_id);
            let request = session.begin_turn(question)?;
            let res = run_turn(&orchestrator, &request).await;
            session.complete_turn(&res);

            if let Err(err) = Transcripts::default().save(&session).await {
                tracing::warn!(error = %err, "Failed to save transcript");
            }

            res
        }
        Err(err) => Err(err),
    };

    match res {
        Ok(text) => {
            println!("{text}");
        }
        Err(err) => {
            eprintln!("{}", Paint::red(err.to_string()));
            process::exit(1);
        }
    }

    return Ok(());
}

fn subcommand_ask() -> Command {
    return Command::new("ask")
        .about("Ask a single research question without opening the chat, and print the final report.")
        .arg(
            Arg::new("question")
                .help("The research question.")
                .required(true)
                .num_args(1..)
                .trailing_var_arg(true),
        );
}

fn subcommand_completions() -> Command {
    return Command::new("completions")
        .about("Generates shell completions.")
        .arg(
            clap::Arg::new("shell")
                .short('s')
                .long("shell")
                .help("Which shell to generate completions for.")
                .action(ArgAction::Set)
                .value_parser(value_parser!(Shell))
                .required(true),
        );
}

fn subcommand_config() -> Command {
    return Command::new("config")
        .about("Configuration file options.")
        .subcommand(
            Command::new("create").about("Saves the default config file to the configuration file path. This command will fail if the file exists already.")
        )
        .subcommand(
            Command::new("default").about("Outputs the default configuration file to stdout.")
        )
        .subcommand(
            Command::new("path").about("Returns the default path for the configuration file.")
        );
}

fn subcommand_debug() -> Command {
    let mut cmd = Command::new("debug");
    cmd = cmd.about("Debug helpers for Scribe")
        .hide(true)
        .subcommand(
            Command::new("log-path").about("Output path to debug log file generated when running Scribe with environment variable RUST_LOG=scribe")
        )
        .subcommand(
            Command::new("enum-config").about("List all config keys as strings.")
        );

    return cmd;
}

fn subcommand_sessions_delete() -> Command {
    return Command::new("delete")
        .about("Delete one or all saved sessions.")
        .arg(
            clap::Arg::new("session-id")
                .short('i')
                .long("id")
                .help("Session ID")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("all")
                .long("all")
                .help("Delete all sessions.")
                .action(ArgAction::SetTrue),
        )
        .group(
            ArgGroup::new("delete-args")
                .args(["session-id", "all"])
                .required(true),
        );
}

fn subcommand_sessions() -> Command {
    return Command::new("sessions")
        .about("Manage saved research sessions.")
        .arg_required_else_help(true)
        .subcommand(Command::new("dir").about("Print the sessions cache directory path."))
        .subcommand(Command::new("list").about("List all saved sessions with their ids and first question."))
        .subcommand(
            Command::new("show")
                .about("Print the conversation of a saved session.")
                .arg(
                    clap::Arg::new("session-id")
                        .short('i')
                        .long("id")
                        .help("Session ID")
                        .required(true),
                ),
        )
        .subcommand(subcommand_sessions_delete());
}

fn arg_string(key: ConfigKey, env_name: &str, help: &str) -> Arg {
    let mut help = help.to_string();
    let default = Config::default(key);
    if !default.is_empty() {
        help = format!("{help} [default: {default}]");
    }

    return Arg::new(key.to_string())
        .long(key.to_string())
        .env(env_name.to_string())
        .num_args(1)
        .help(help)
        .global(true);
}

pub fn build() -> Command {
    let commands_text = help_text()
        .split('\n')
        .map(|line| {
            if line.starts_with('-') {
                return format!("  {line}");
            }
            if line.starts_with("COMMANDS:") || line.starts_with("HOTKEYS:") {
                return Paint::new(format!("CHAT {line}"))
                    .underline()
                    .bold()
                    .to_string();
            }
            return line.to_string();
        })
        .collect::<Vec<String>>()
        .join("\n");

    let about = format!(
        "{}\n\nVersion: {}",
        env!("CARGO_PKG_DESCRIPTION"),
        env!("CARGO_PKG_VERSION"),
    );

    return Command::new("scribe")
        .about(about)
        .author(env!("CARGO_PKG_AUTHORS"))
        .version(env!("CARGO_PKG_VERSION"))
        .after_help(commands_text)
        .arg_required_else_help(false)
        .subcommand(Command::new("chat").about("Start a new research chat."))
        .subcommand(subcommand_ask())
        .subcommand(subcommand_completions())
        .subcommand(subcommand_config())
        .subcommand(subcommand_debug())
        .subcommand(Command::new("manpages").about("Generates manpages and outputs to stdout."))
        .subcommand(subcommand_sessions())
        .arg(
            arg_string(
                ConfigKey::ConfigFile,
                "SCRIBE_CONFIG_FILE",
                "Path to configuration file",
            )
            .short('c'),
        )
        .arg(
            arg_string(
                ConfigKey::ServerURL,
                "SCRIBE_SERVER_URL",
                "URL of the agent orchestration server.",
            )
            .short('u'),
        )
        .arg(
            arg_string(
                ConfigKey::AppName,
                "SCRIBE_APP_NAME",
                "Name of the agent app served by the orchestration server.",
            )
            .short('a'),
        )
        .arg(arg_string(
            ConfigKey::RequestTimeout,
            "SCRIBE_REQUEST_TIMEOUT",
            "Time to wait in milliseconds for a research turn to complete. 0 disables the timeout.",
        ))
        .arg(arg_string(
            ConfigKey::HealthCheckTimeout,
            "SCRIBE_HEALTH_CHECK_TIMEOUT",
            "Time to wait in milliseconds before timing out when doing a healthcheck for the orchestration server.",
        ))
        .arg(
            arg_string(
                ConfigKey::SessionIdStyle,
                "SCRIBE_SESSION_ID_STYLE",
                "Format of newly created session ids.",
            )
            .value_parser(PossibleValuesParser::new(SessionIdStyle::VARIANTS)),
        )
        .arg(
            arg_string(
                ConfigKey::AutoSession,
                "SCRIBE_AUTO_SESSION",
                "Start a session as soon as the chat opens.",
            )
            .value_parser(PossibleValuesParser::new(["true", "false"])),
        )
        .arg(arg_string(
            ConfigKey::Username,
            "SCRIBE_USERNAME",
            "Your user name displayed in all chat bubbles.",
        ));
}

/// Runs the selected command. Returns true when the chat UI should start.
async fn dispatch(matches: &ArgMatches) -> Result<bool> {
    match matches.subcommand() {
        Some(("debug", debug_matches)) => {
            match debug_matches.subcommand() {
                Some(("log-path", _)) => {
                    let log_path = crate::log_dir().join("debug.log");
                    println!("{}", log_path.to_string_lossy());
                }
                Some(("enum-config", _)) => {
                    let res = ConfigKey::VARIANTS.join("\n");
                    println!("{}", res);
                }
                _ => {
                    subcommand_debug().print_long_help()?;
                }
            }

            return Ok(false);
        }
        Some(("chat", subcmd_matches)) => {
            Config::load(build(), vec![matches, subcmd_matches]).await?;
        }
        Some(("ask", subcmd_matches)) => {
            Config::load(build(), vec![matches, subcmd_matches]).await?;
            let question = subcmd_matches
                .get_many::<String>("question")
                .map(|words| return words.cloned().collect::<Vec<String>>().join(" "))
                .unwrap_or_default();

            ask(&question).await?;
            return Ok(false);
        }
        Some(("completions", subcmd_matches)) => {
            if let Some(completions) = subcmd_matches.get_one::<Shell>("shell").copied() {
                let mut app = build();
                print_completions(completions, &mut app);
            }
            return Ok(false);
        }
        Some(("config", subcmd_matches)) => match subcmd_matches.subcommand() {
            Some(("create", _)) => {
                create_config_file().await?;
                return Ok(false);
            }
            Some(("default", _)) => {
                println!("{}", Config::serialize_default(build()));
                return Ok(false);
            }
            Some(("path", _)) => {
                println!("{}", Config::default(ConfigKey::ConfigFile));
                return Ok(false);
            }
            _ => {
                subcommand_config().print_long_help()?;
                return Ok(false);
            }
        },
        Some(("manpages", _)) => {
            clap_mangen::Man::new(build()).render(&mut io::stdout())?;
            return Ok(false);
        }
        Some(("sessions", subcmd_matches)) => match subcmd_matches.subcommand() {
            Some(("dir", _)) => {
                let dir = Transcripts::default()
                    .cache_dir
                    .to_string_lossy()
                    .to_string();
                println!("{dir}");
                return Ok(false);
            }
            Some(("list", _)) => {
                print_sessions_list().await?;
                return Ok(false);
            }
            Some(("show", show_matches)) => {
                if let Some(session_id) = show_matches.get_one::<String>("session-id") {
                    print_session(session_id).await?;
                }
                return Ok(false);
            }
            Some(("delete", delete_matches)) => {
                if let Some(session_id) = delete_matches.get_one::<String>("session-id") {
                    Transcripts::default().delete(session_id).await?;
                    println!("Deleted session {session_id}");
                } else if delete_matches.get_flag("all") {
                    Transcripts::default().delete_all().await?;
                    println!("Deleted all sessions");
                } else {
                    subcommand_sessions_delete().print_long_help()?;
                }
                return Ok(false);
            }
            _ => {
                subcommand_sessions().print_long_help()?;
                return Ok(false);
            }
        },
        _ => {
            Config::load(build(), vec![matches]).await?;
        }
    }

    return Ok(true);
}

pub async fn parse() -> Result<bool> {
    return dispatch(&build().get_matches()).await;
}
