//! User-facing command surface.

use teloxide::utils::command::BotCommands;

/// Text commands understood by the relay.
#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase", description = "Доступные команды:")]
pub enum Command {
    #[command(description = "начать работу с ботом")]
    Start,
    #[command(description = "показать список команд")]
    Help,
    #[command(description = "очистить контекст разговора")]
    Reset,
    #[command(description = "задать стиль ответов (без текста — показать текущий)")]
    Style(String),
    #[command(description = "выбрать роль: analyst, translator, coder или none")]
    Role(String),
    #[command(description = "суммировать недавний чат")]
    Summarize,
    #[command(description = "привязать канал: /link @канал")]
    Link(String),
    #[command(description = "отвязать канал: /unlink @канал")]
    Unlink(String),
    #[command(description = "список привязанных каналов")]
    Channels,
    #[command(description = "опубликовать текст в привязанный канал")]
    Publish(String),
    #[command(description = "поставить реакцию на сообщение, на которое вы ответили")]
    React(String),
    #[command(description = "дайджест последних постов канала: /digest [@канал]")]
    Digest(String),
    #[command(description = "поиск в интернете")]
    Search(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_commands() {
        assert_eq!(Command::parse("/reset", "relay_bot").unwrap(), Command::Reset);
        assert_eq!(
            Command::parse("/summarize", "relay_bot").unwrap(),
            Command::Summarize
        );
    }

    #[test]
    fn parses_commands_with_arguments() {
        assert_eq!(
            Command::parse("/style пиши кратко", "relay_bot").unwrap(),
            Command::Style("пиши кратко".to_string())
        );
        assert_eq!(
            Command::parse("/search rust телеграм боты", "relay_bot").unwrap(),
            Command::Search("rust телеграм боты".to_string())
        );
        assert_eq!(
            Command::parse("/link @news", "relay_bot").unwrap(),
            Command::Link("@news".to_string())
        );
        assert_eq!(
            Command::parse("/digest @news", "relay_bot").unwrap(),
            Command::Digest("@news".to_string())
        );
        assert_eq!(
            Command::parse("/digest", "relay_bot").unwrap(),
            Command::Digest(String::new())
        );
    }

    #[test]
    fn parses_command_with_bot_mention() {
        assert_eq!(
            Command::parse("/reset@relay_bot", "relay_bot").unwrap(),
            Command::Reset
        );
    }

    #[test]
    fn rejects_unknown_command() {
        assert!(Command::parse("/frobnicate", "relay_bot").is_err());
    }
}
