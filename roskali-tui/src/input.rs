use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, Screen};

#[derive(Debug, Clone, Copy)]
pub(crate) enum Action {
    None,
    Quit,
    /// Run `service.snapshot_for`(...) for the selected source
    LoadSnapshot,
    /// Run `service.classify`(...) on the file at the typed path
    ClassifyImage,
    /// Run `service.route_for`(...) with the current threshold
    ComputeRoute,
}

pub(crate) fn handle_key_event(key: KeyEvent, app: &mut App) -> Action {
    use KeyCode::{Backspace, Char, Down, Enter, Esc, Left, Right, Tab, Up};

    // Global quit shortcuts; Classify owns plain characters for path input.
    if key.code == Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }
    if key.code == Char('q')
        && key.modifiers.is_empty()
        && !matches!(app.screen, Screen::Classify)
    {
        return Action::Quit;
    }

    let mut action = Action::None;

    match app.screen {
        Screen::SourceSelect => match key.code {
            Up | Char('k') => {
                if app.source_list_index > 0 {
                    app.source_list_index -= 1;
                }
            }
            Down | Char('j') => {
                if app.source_list_index + 1 < app.sources.len() {
                    app.source_list_index += 1;
                }
            }
            Enter | Char(' ') => {
                if app.select_current_source().is_some() {
                    action = Action::LoadSnapshot;
                }
            }
            _ => {}
        },

        Screen::BinMonitor => match key.code {
            Char('f') => {
                app.status_filter = app.status_filter.next();
            }
            Char('r') => {
                action = Action::LoadSnapshot;
            }
            Char('c') => {
                app.screen = Screen::Classify;
            }
            Right | Tab | Char('o') => {
                app.screen = Screen::RouteView;
                action = Action::ComputeRoute;
            }
            Left | Esc => {
                app.screen = Screen::SourceSelect;
                app.snapshot = None;
                app.route = None;
            }
            _ => {}
        },

        Screen::Classify => match key.code {
            Char(character) => {
                if !key.modifiers.contains(KeyModifiers::CONTROL)
                    && !key.modifiers.contains(KeyModifiers::ALT)
                {
                    app.image_path_input.push(character);
                }
            }
            Backspace => {
                app.image_path_input.pop();
            }
            Enter => {
                action = Action::ClassifyImage;
            }
            Left | Esc => {
                app.screen = Screen::BinMonitor;
            }
            _ => {}
        },

        Screen::RouteView => match key.code {
            Char('+') => {
                app.adjust_threshold(5.0);
                action = Action::ComputeRoute;
            }
            Char('-') => {
                app.adjust_threshold(-5.0);
                action = Action::ComputeRoute;
            }
            Char('r') => {
                action = Action::ComputeRoute;
            }
            Left | Esc | Char('b') => {
                app.screen = Screen::BinMonitor;
            }
            _ => {}
        },
    }
    action
}
