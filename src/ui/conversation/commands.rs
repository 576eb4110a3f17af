use std::str::FromStr;

use strum::{AsRefStr, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// Commands that can be invoked by starting a message with a leading slash.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, EnumIter, AsRefStr, IntoStaticStr,
)]
#[strum(serialize_all = "kebab-case")]
pub enum SlashCommand {
    /// Show help
    Ayuda,
    /// Toggle the resources panel
    Recursos,
    /// Send one of the suggested questions
    Sugerencia,
    /// Exit the application
    Salir,
}

pub fn command_entries() -> Vec<CommandEntry> {
    SlashCommand::iter()
        .map(|command| CommandEntry {
            command,
            keyword: command.command(),
            description: command.description(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub command: SlashCommand,
    pub argument: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandEntry {
    pub command: SlashCommand,
    pub keyword: &'static str,
    pub description: &'static str,
}

impl ParsedCommand {
    pub fn argument(&self) -> Option<&str> {
        self.argument.as_deref()
    }

    /// 1-based suggestion number given to `/sugerencia`
    pub fn suggestion_number(&self) -> Option<usize> {
        if self.command != SlashCommand::Sugerencia {
            return None;
        }
        self.argument()?.trim().parse().ok()
    }
}

impl SlashCommand {
    /// User-visible description shown in help.
    pub fn description(self) -> &'static str {
        match self {
            SlashCommand::Ayuda => "mostrar los comandos y atajos disponibles",
            SlashCommand::Recursos => "mostrar u ocultar los recursos rápidos",
            SlashCommand::Sugerencia => "enviar un tema sugerido (1-4)",
            SlashCommand::Salir => "cerrar el asistente",
        }
    }

    /// Command string without the leading '/'.
    pub fn command(self) -> &'static str {
        self.into()
    }
}

/// Parse a slash command from user input
pub fn parse_slash_command(input: &str) -> Option<ParsedCommand> {
    let rest = input.trim_start().strip_prefix('/')?;

    let mut parts = rest.split_whitespace();
    let head = parts.next()?.to_lowercase();
    let rest: Vec<&str> = parts.collect();

    let command = SlashCommand::from_str(&head).ok().or_else(|| match head.as_str() {
        "help" | "h" | "?" => Some(SlashCommand::Ayuda),
        "resources" | "r" => Some(SlashCommand::Recursos),
        "suggest" | "s" => Some(SlashCommand::Sugerencia),
        "q" | "quit" | "exit" | "bye" => Some(SlashCommand::Salir),
        _ => None,
    })?;

    let argument = if rest.is_empty() {
        None
    } else {
        Some(rest.join(" "))
    };

    Some(ParsedCommand { command, argument })
}

/// Get help text for all available commands
pub fn get_help_text() -> String {
    let mut help = String::from("Comandos disponibles:\n\n");
    for entry in command_entries() {
        help.push_str(&format!("/{} - {}\n", entry.keyword, entry.description));
    }

    help.push_str("\nAtajos:\n");
    help.push_str("F1-F4 - enviar un tema sugerido\n");
    help.push_str("Ctrl+B - mostrar u ocultar recursos\n");
    help.push_str("PgUp/PgDn - desplazar la conversación\n");
    help.push_str("Esc o Ctrl+C - salir");

    help
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_spanish_names() {
        let parsed = parse_slash_command("/recursos").unwrap();
        assert_eq!(parsed.command, SlashCommand::Recursos);
        assert!(parsed.argument.is_none());
    }

    #[test]
    fn parses_aliases_case_insensitively() {
        assert_eq!(parse_slash_command("/Q").unwrap().command, SlashCommand::Salir);
        assert_eq!(parse_slash_command("/help").unwrap().command, SlashCommand::Ayuda);
        assert_eq!(parse_slash_command("/AYUDA").unwrap().command, SlashCommand::Ayuda);
    }

    #[test]
    fn suggestion_argument() {
        let parsed = parse_slash_command("/sugerencia 3").unwrap();
        assert_eq!(parsed.suggestion_number(), Some(3));
        let parsed = parse_slash_command("/suggest dos").unwrap();
        assert_eq!(parsed.suggestion_number(), None);
        let parsed = parse_slash_command("/ayuda 3").unwrap();
        assert_eq!(parsed.suggestion_number(), None);
    }

    #[test]
    fn plain_text_and_unknown_commands() {
        assert!(parse_slash_command("hola").is_none());
        assert!(parse_slash_command("/desconocido").is_none());
        assert!(parse_slash_command("/").is_none());
    }

    #[test]
    fn help_lists_every_command() {
        let help = get_help_text();
        for entry in command_entries() {
            assert!(help.contains(&format!("/{}", entry.keyword)));
        }
    }
}
