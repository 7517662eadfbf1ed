use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};

use crate::app::{App, InputMode, Screen};
use crate::tui::AppEvent;

pub fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => app.tick(),
    }
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global quit, any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match app.screen {
        Screen::Chat => match app.input_mode {
            InputMode::Normal => handle_chat_normal(app, key),
            InputMode::Editing => handle_chat_editing(app, key),
        },
        Screen::Settings => handle_settings(app, key),
    }
}

fn handle_chat_normal(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,

        // Focus the draft
        KeyCode::Char('i') | KeyCode::Char('/') | KeyCode::Enter => {
            app.input_mode = InputMode::Editing;
        }

        // Go live (no-op while the conversation is empty or one is running)
        KeyCode::Char('g') => app.go_live(),

        KeyCode::Char('s') => app.open_settings(),

        // Quick-action shortcuts prefill the draft
        KeyCode::Char(c @ '1'..='9') => {
            let index = (c as usize) - ('1' as usize);
            app.apply_quick_action(index);
        }

        // Chat scrolling
        KeyCode::Char('j') | KeyCode::Down => app.scroll_chat_down(),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_chat_up(),
        KeyCode::Home => app.chat_scroll = 0,
        KeyCode::End => app.scroll_chat_to_bottom(),

        _ => {}
    }
}

fn handle_chat_editing(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.input_mode = InputMode::Normal,

        // Shift+Enter inserts a newline; Alt+Enter is the fallback chord for
        // terminals that do not report shift with Enter
        KeyCode::Enter
            if key
                .modifiers
                .intersects(KeyModifiers::SHIFT | KeyModifiers::ALT) =>
        {
            app.insert_newline();
        }
        KeyCode::Enter => app.submit(),

        // Go live stays reachable while composing
        KeyCode::Char('g') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.go_live();
        }

        KeyCode::Backspace => app.backspace(),
        KeyCode::Delete => app.delete(),
        KeyCode::Left => app.cursor_left(),
        KeyCode::Right => app.cursor_right(),
        KeyCode::Up => app.cursor_up(),
        KeyCode::Down => app.cursor_down(),
        KeyCode::Home => app.cursor_home(),
        KeyCode::End => app.cursor_end(),

        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.insert_char(c);
        }

        _ => {}
    }
}

fn handle_settings(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.close_settings(),

        KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.save_settings();
        }

        // The canned response is a multi-line textarea
        KeyCode::Enter => app.insert_newline(),

        KeyCode::Backspace => app.backspace(),
        KeyCode::Delete => app.delete(),
        KeyCode::Left => app.cursor_left(),
        KeyCode::Right => app.cursor_right(),
        KeyCode::Up => app.cursor_up(),
        KeyCode::Down => app.cursor_down(),
        KeyCode::Home => app.cursor_home(),
        KeyCode::End => app.cursor_end(),

        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.insert_char(c);
        }

        _ => {}
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    if app.screen != Screen::Chat {
        return;
    }
    match mouse.kind {
        MouseEventKind::ScrollDown => {
            app.scroll_chat_down();
            app.scroll_chat_down();
            app.scroll_chat_down();
        }
        MouseEventKind::ScrollUp => {
            app.scroll_chat_up();
            app.scroll_chat_up();
            app.scroll_chat_up();
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;

    fn key(code: KeyCode) -> AppEvent {
        AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn key_with(code: KeyCode, modifiers: KeyModifiers) -> AppEvent {
        AppEvent::Key(KeyEvent::new(code, modifiers))
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn enter_submits_and_shift_enter_inserts_a_newline() {
        let (mut app, _events) = App::new(Settings::new(), None);
        app.input_mode = InputMode::Editing;

        handle_event(&mut app, key(KeyCode::Char('h'))).unwrap();
        handle_event(&mut app, key_with(KeyCode::Enter, KeyModifiers::SHIFT)).unwrap();
        handle_event(&mut app, key(KeyCode::Char('i'))).unwrap();
        assert_eq!(app.draft, "h\ni");

        handle_event(&mut app, key(KeyCode::Enter)).unwrap();
        assert!(app.draft.is_empty());
        assert_eq!(app.conversation.len(), 1);
        assert_eq!(app.conversation.messages()[0].text, "h\ni");
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn ctrl_c_quits_from_any_mode() {
        let (mut app, _events) = App::new(Settings::new(), None);
        app.input_mode = InputMode::Editing;
        handle_event(&mut app, key_with(KeyCode::Char('c'), KeyModifiers::CONTROL)).unwrap();
        assert!(app.should_quit);
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn typing_q_in_the_draft_does_not_quit() {
        let (mut app, _events) = App::new(Settings::new(), None);
        app.input_mode = InputMode::Editing;
        handle_event(&mut app, key(KeyCode::Char('q'))).unwrap();
        assert!(!app.should_quit);
        assert_eq!(app.draft, "q");
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn settings_screen_saves_with_ctrl_s() {
        let (mut app, _events) = App::new(Settings::new(), None);
        handle_event(&mut app, key(KeyCode::Char('s'))).unwrap();
        assert_eq!(app.screen, Screen::Settings);

        // Replace the seeded text wholesale
        while !app.settings_input.is_empty() {
            handle_event(&mut app, key(KeyCode::Backspace)).unwrap();
        }
        for c in "New reply".chars() {
            handle_event(&mut app, key(KeyCode::Char(c))).unwrap();
        }
        handle_event(&mut app, key_with(KeyCode::Char('s'), KeyModifiers::CONTROL)).unwrap();
        assert_eq!(app.settings.custom_response(), "New reply");

        handle_event(&mut app, key(KeyCode::Esc)).unwrap();
        assert_eq!(app.screen, Screen::Chat);
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn go_live_key_is_a_no_op_on_an_empty_conversation() {
        let (mut app, _events) = App::new(Settings::new(), None);
        handle_event(&mut app, key(KeyCode::Char('g'))).unwrap();
        assert!(!app.sequencer.is_going_live);
        assert!(app.conversation.is_empty());
    }
}
