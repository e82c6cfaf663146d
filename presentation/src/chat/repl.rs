//! REPL (Read-Eval-Print Loop) for interactive chat

use crate::ConsoleFormatter;
use crate::ProgressReporter;
use crate::config::ReplConfig;
use broker_application::{HandleQueryUseCase, ResolverGateway};
use broker_domain::Query;
use reedline::{DefaultPrompt, DefaultPromptSegment, FileBackedHistory, Reedline, Signal};
use std::io;

const HISTORY_CAPACITY: usize = 1000;

/// A slash command typed at the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Help,
    Context,
    Resolvers,
    Clear,
    Quit,
    Unknown(String),
}

impl ReplCommand {
    /// Parse a line starting with `/`; anything else is not a command
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if !line.starts_with('/') {
            return None;
        }
        Some(match line {
            "/help" | "/h" | "/?" => Self::Help,
            "/context" | "/ctx" => Self::Context,
            "/resolvers" => Self::Resolvers,
            "/clear" => Self::Clear,
            "/quit" | "/exit" | "/q" => Self::Quit,
            other => Self::Unknown(other.to_string()),
        })
    }
}

/// Interactive chat REPL
///
/// Every line is a new query against the same broker, so conversation
/// context and cache carry over between turns.
pub struct ChatRepl<G: ResolverGateway + ?Sized + 'static> {
    use_case: HandleQueryUseCase<G>,
    config: ReplConfig,
}

impl<G: ResolverGateway + ?Sized + 'static> ChatRepl<G> {
    pub fn new(use_case: HandleQueryUseCase<G>) -> Self {
        Self {
            use_case,
            config: ReplConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ReplConfig) -> Self {
        self.config = config;
        self
    }

    /// Run the interactive REPL
    pub async fn run(&self) -> io::Result<()> {
        let mut editor = Reedline::create();

        if let Some(path) = self.config.history_path() {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            match FileBackedHistory::with_file(HISTORY_CAPACITY, path) {
                Ok(history) => editor = editor.with_history(Box::new(history)),
                Err(e) => eprintln!("History disabled: {}", e),
            }
        }

        let prompt = DefaultPrompt::new(
            DefaultPromptSegment::Basic("broker".to_string()),
            DefaultPromptSegment::Empty,
        );

        self.print_welcome();

        loop {
            match editor.read_line(&prompt)? {
                Signal::Success(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }

                    if let Some(command) = ReplCommand::parse(line) {
                        if self.handle_command(command) {
                            break;
                        }
                        continue;
                    }

                    self.process_query(line).await;
                }
                Signal::CtrlC => {
                    println!("^C");
                    continue;
                }
                _ => {
                    println!("Bye!");
                    break;
                }
            }
        }

        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│          Query Broker - Chat Mode           │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        println!(
            "Resolvers: {}",
            self.use_case
                .registry()
                .names()
                .map(|n| n.short_name())
                .collect::<Vec<_>>()
                .join(", ")
        );
        println!();
        Self::print_help();
    }

    fn print_help() {
        println!("Commands:");
        println!("  /help, /h, /?     - Show this help");
        println!("  /context, /ctx    - Show conversation context");
        println!("  /resolvers        - Show resolvers and which have answered");
        println!("  /clear            - Forget conversation context");
        println!("  /quit, /exit, /q  - Exit chat");
        println!();
    }

    /// Handle slash commands. Returns true if should exit.
    fn handle_command(&self, command: ReplCommand) -> bool {
        match command {
            ReplCommand::Quit => {
                println!("Bye!");
                return true;
            }
            ReplCommand::Help => {
                println!();
                Self::print_help();
            }
            ReplCommand::Context => {
                print!(
                    "{}",
                    ConsoleFormatter::format_context(&self.use_case.context().snapshot())
                );
            }
            ReplCommand::Resolvers => {
                print!(
                    "{}",
                    ConsoleFormatter::format_resolvers(
                        self.use_case.registry().names(),
                        &self.use_case.active_resolvers(),
                    )
                );
            }
            ReplCommand::Clear => {
                self.use_case.context().clear();
                println!("Context cleared");
            }
            ReplCommand::Unknown(cmd) => {
                println!("Unknown command: {}", cmd);
                println!("Type /help for available commands");
            }
        }
        false
    }

    async fn process_query(&self, line: &str) {
        let Some(query) = Query::try_new(line) else {
            return;
        };
        println!();

        let answer = if self.config.show_progress {
            let progress = ProgressReporter::new();
            self.use_case.execute_with_progress(&query, &progress).await
        } else {
            self.use_case.execute(&query).await
        };

        println!("{}", ConsoleFormatter::format(&answer));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(ReplCommand::parse("/help"), Some(ReplCommand::Help));
        assert_eq!(ReplCommand::parse("  /ctx "), Some(ReplCommand::Context));
        assert_eq!(ReplCommand::parse("/resolvers"), Some(ReplCommand::Resolvers));
        assert_eq!(ReplCommand::parse("/clear"), Some(ReplCommand::Clear));
        assert_eq!(ReplCommand::parse("/q"), Some(ReplCommand::Quit));
        assert_eq!(
            ReplCommand::parse("/models"),
            Some(ReplCommand::Unknown("/models".to_string()))
        );
    }

    #[test]
    fn test_plain_text_is_not_a_command() {
        assert_eq!(ReplCommand::parse("What is 2 / 3?"), None);
        assert_eq!(ReplCommand::parse("Who is Albert Einstein"), None);
    }
}
