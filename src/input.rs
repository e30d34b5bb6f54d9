use crossterm::event::KeyCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiCommand {
    Quit,
    DismissAlert,
    Reset,
    ScrollUp,
    ScrollDown,
}

pub fn parse_main_command(key_code: &KeyCode) -> Option<UiCommand> {
    match key_code {
        KeyCode::Enter | KeyCode::Esc => Some(UiCommand::DismissAlert),
        KeyCode::Up => Some(UiCommand::ScrollUp),
        KeyCode::Down => Some(UiCommand::ScrollDown),
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'q' => Some(UiCommand::Quit),
            'c' => Some(UiCommand::DismissAlert),
            'x' => Some(UiCommand::Reset),
            'k' => Some(UiCommand::ScrollUp),
            'j' => Some(UiCommand::ScrollDown),
            _ => None,
        },
        _ => None,
    }
}

/// While the alert popup is open only quitting and confirming are accepted.
pub fn parse_alert_command(key_code: &KeyCode) -> Option<UiCommand> {
    match parse_main_command(key_code)? {
        cmd @ (UiCommand::Quit | UiCommand::DismissAlert) => Some(cmd),
        _ => None,
    }
}
