use crate::cli::Commands;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum OutputMode {
    Text,
    Json,
}

pub fn mode_for_command(command: &Commands) -> OutputMode {
    if command.wants_json() {
        OutputMode::Json
    } else {
        OutputMode::Text
    }
}

#[cfg(test)]
mod tests {
    use super::{OutputMode, mode_for_command};
    use crate::cli::parse_from;

    #[test]
    fn mode_uses_json_when_flag_is_present() {
        let cases: [&[&str]; 3] = [
            &["ledgerchat", "record", "午餐 120 元", "--json"],
            &["ledgerchat", "intent", "你好", "--json"],
            &["ledgerchat", "keywords", "--json"],
        ];
        for args in cases {
            let parsed = parse_from(args);
            assert!(parsed.is_ok());
            if let Ok(cli) = parsed {
                assert_eq!(mode_for_command(&cli.command), OutputMode::Json);
            }
        }
    }

    #[test]
    fn mode_uses_text_by_default() {
        let parsed = parse_from(["ledgerchat", "chat", "這個月花了多少"]);
        assert!(parsed.is_ok());
        if let Ok(cli) = parsed {
            assert_eq!(mode_for_command(&cli.command), OutputMode::Text);
        }
    }
}
