use std::time::{Duration, Instant};

use tokio::sync::mpsc::UnboundedReceiver;

use crate::config::{self, QuickAction, UiConfig};
use crate::conversation::{Conversation, Message};
use crate::missile::{self, MissileAnimation};
use crate::sequencer::{Sequencer, SequencerEvent};
use crate::settings::Settings;
use ratatui::style::Color;

/// Scripted go-live messages.
pub const GO_LIVE_INITIATED: &str =
    "🚀 Go-live initiated! Deploying your strategy to the live market...";
pub const GO_LIVE_SUCCESS: &str =
    "✅ Trade executed successfully! Your strategy is now live.";

/// How long the settings screen shows its saved confirmation.
const SAVED_NOTICE_WINDOW: Duration = Duration::from_secs(2);

/// Cap on the auto-growing draft input, in text rows.
pub const INPUT_MAX_ROWS: u16 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Chat,
    Settings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub screen: Screen,
    pub input_mode: InputMode,

    // Draft editor (chat input), cursor is a char index
    pub draft: String,
    pub draft_cursor: usize,

    // Settings editor
    pub settings_input: String,
    pub settings_cursor: usize,
    pub saved_notice: Option<Instant>,

    // Chat viewport (inner dimensions, updated during render)
    pub chat_scroll: u16,
    pub chat_height: u16,
    pub chat_width: u16,

    // Thinking indicator animation, 0-2 for the ellipsis
    pub animation_frame: u8,

    // Theme (config overrides applied once at startup)
    pub primary_color: Color,
    pub secondary_color: Color,

    // Stores and flows
    pub conversation: Conversation,
    pub settings: Settings,
    pub sequencer: Sequencer,
    pub missile: Option<MissileAnimation>,
    pub ui_config: Option<UiConfig>,
}

impl App {
    /// Builds the application state. The returned receiver carries fired
    /// sequencer timers and is polled by the main loop alongside input.
    pub fn new(
        settings: Settings,
        ui_config: Option<UiConfig>,
    ) -> (Self, UnboundedReceiver<SequencerEvent>) {
        let (thinking_delay, go_live_latency) = ui_config
            .as_ref()
            .map(|c| (c.ui.chatbot.thinking_delay, c.ui.chatbot.go_live_latency))
            .unwrap_or((
                config::DEFAULT_THINKING_DELAY_MS,
                config::DEFAULT_GO_LIVE_LATENCY_MS,
            ));
        let (sequencer, events) = Sequencer::new(
            Duration::from_millis(thinking_delay),
            Duration::from_millis(go_live_latency),
        );

        let theme = ui_config.as_ref().map(|c| &c.ui.theme);
        let primary_color = theme
            .and_then(|t| t.primary.as_deref())
            .and_then(config::parse_color)
            .unwrap_or(Color::Cyan);
        let secondary_color = theme
            .and_then(|t| t.secondary.as_deref())
            .and_then(config::parse_color)
            .unwrap_or(Color::Yellow);

        let settings_input = settings.custom_response().to_string();
        let app = Self {
            should_quit: false,
            screen: Screen::Chat,
            input_mode: InputMode::Normal,

            draft: String::new(),
            draft_cursor: 0,

            settings_input,
            settings_cursor: 0,
            saved_notice: None,

            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,

            animation_frame: 0,

            primary_color,
            secondary_color,

            conversation: Conversation::new(),
            settings,
            sequencer,
            missile: None,
            ui_config,
        };
        (app, events)
    }

    // --- Submit flow ---

    /// The send control is unreachable while the draft trims to empty or a
    /// response is already pending.
    pub fn can_submit(&self) -> bool {
        !self.draft.trim().is_empty() && !self.sequencer.is_thinking
    }

    /// Accepts the draft as a user message and starts the thinking delay.
    /// Rejected calls are silent no-ops, mirroring a disabled button.
    pub fn submit(&mut self) {
        if !self.can_submit() {
            return;
        }
        let text = std::mem::take(&mut self.draft);
        self.draft_cursor = 0;
        let message = Message::user(text);
        tracing::debug!(id = %message.id, "user message submitted");
        self.conversation.push(message);
        self.sequencer.start_thinking();
        self.scroll_chat_to_bottom();
    }

    // --- Go-live flow ---

    /// Go-live is unreachable on an empty conversation or while a go-live is
    /// already running. A pending submit does not gate it.
    pub fn can_go_live(&self) -> bool {
        !self.conversation.is_empty() && !self.sequencer.is_going_live
    }

    pub fn go_live(&mut self) {
        if !self.can_go_live() {
            return;
        }
        self.sequencer.start_go_live(missile::DURATION);
        self.missile = Some(MissileAnimation::start());
        self.conversation.push(Message::assistant(GO_LIVE_INITIATED));
        self.scroll_chat_to_bottom();
    }

    /// Applies a fired timer to the stores. Runs on the UI task only.
    pub fn apply(&mut self, event: SequencerEvent) {
        match event {
            SequencerEvent::ResponseReady => {
                // The canned text is read now, not at submit time, so a save
                // during the delay is reflected in the reply.
                let message = Message::assistant(self.settings.custom_response());
                tracing::debug!(id = %message.id, "canned response assembled");
                self.conversation.push(message);
                self.sequencer.is_thinking = false;
                self.scroll_chat_to_bottom();
            }
            SequencerEvent::GoLiveComplete => {
                self.conversation.push(Message::assistant(GO_LIVE_SUCCESS));
                self.sequencer.is_going_live = false;
                self.scroll_chat_to_bottom();
            }
            SequencerEvent::AnimationComplete => {
                if self.sequencer.missile_active {
                    self.sequencer.missile_active = false;
                    self.missile = None;
                }
            }
        }
    }

    pub fn shutdown(&self) {
        self.sequencer.shutdown();
    }

    // --- Quick actions ---

    pub fn quick_actions(&self) -> &[QuickAction] {
        self.ui_config
            .as_ref()
            .map(|c| c.ui.chatbot.quick_actions.as_slice())
            .unwrap_or(&[])
    }

    /// Prefills the draft with a quick-action prompt and focuses the input.
    pub fn apply_quick_action(&mut self, index: usize) {
        let Some(prompt) = self.quick_actions().get(index).map(|a| a.prompt.clone()) else {
            return;
        };
        self.draft = prompt;
        self.draft_cursor = self.draft.chars().count();
        self.input_mode = InputMode::Editing;
    }

    // --- Settings screen ---

    pub fn open_settings(&mut self) {
        self.settings_input = self.settings.custom_response().to_string();
        self.settings_cursor = self.settings_input.chars().count();
        self.saved_notice = None;
        self.screen = Screen::Settings;
        self.input_mode = InputMode::Editing;
    }

    /// Returns to chat. Unsaved edits are discarded, like navigating away
    /// from the original settings page.
    pub fn close_settings(&mut self) {
        self.screen = Screen::Chat;
        self.input_mode = InputMode::Normal;
        self.saved_notice = None;
    }

    /// Persists the settings textarea verbatim.
    pub fn save_settings(&mut self) {
        self.settings.set(self.settings_input.clone());
        self.saved_notice = Some(Instant::now());
    }

    pub fn saved_notice_visible(&self) -> bool {
        self.saved_notice
            .is_some_and(|at| at.elapsed() < SAVED_NOTICE_WINDOW)
    }

    // --- Editing helpers, shared by the draft and the settings textarea ---

    fn active_editor(&mut self) -> (&mut String, &mut usize) {
        match self.screen {
            Screen::Chat => (&mut self.draft, &mut self.draft_cursor),
            Screen::Settings => (&mut self.settings_input, &mut self.settings_cursor),
        }
    }

    pub fn insert_char(&mut self, c: char) {
        let (buf, cursor) = self.active_editor();
        let at = char_to_byte_index(buf, *cursor);
        buf.insert(at, c);
        *cursor += 1;
    }

    pub fn insert_newline(&mut self) {
        self.insert_char('\n');
    }

    pub fn backspace(&mut self) {
        let (buf, cursor) = self.active_editor();
        if *cursor > 0 {
            *cursor -= 1;
            let at = char_to_byte_index(buf, *cursor);
            buf.remove(at);
        }
    }

    pub fn delete(&mut self) {
        let (buf, cursor) = self.active_editor();
        if *cursor < buf.chars().count() {
            let at = char_to_byte_index(buf, *cursor);
            buf.remove(at);
        }
    }

    pub fn cursor_left(&mut self) {
        let (_, cursor) = self.active_editor();
        *cursor = cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        let (buf, cursor) = self.active_editor();
        *cursor = (*cursor + 1).min(buf.chars().count());
    }

    pub fn cursor_home(&mut self) {
        let (buf, cursor) = self.active_editor();
        let (line, _) = cursor_line_col(buf, *cursor);
        *cursor = cursor_for_line_col(buf, line, 0);
    }

    pub fn cursor_end(&mut self) {
        let (buf, cursor) = self.active_editor();
        let (line, _) = cursor_line_col(buf, *cursor);
        *cursor = cursor_for_line_col(buf, line, usize::MAX);
    }

    pub fn cursor_up(&mut self) {
        let (buf, cursor) = self.active_editor();
        let (line, col) = cursor_line_col(buf, *cursor);
        if line > 0 {
            *cursor = cursor_for_line_col(buf, line - 1, col);
        }
    }

    pub fn cursor_down(&mut self) {
        let (buf, cursor) = self.active_editor();
        let (line, col) = cursor_line_col(buf, *cursor);
        *cursor = cursor_for_line_col(buf, line + 1, col);
    }

    /// Line/column of the draft cursor, for rendering.
    pub fn draft_cursor_position(&self) -> (usize, usize) {
        cursor_line_col(&self.draft, self.draft_cursor)
    }

    /// Line/column of the settings cursor, for rendering.
    pub fn settings_cursor_position(&self) -> (usize, usize) {
        cursor_line_col(&self.settings_input, self.settings_cursor)
    }

    /// Rows the draft currently needs, capped for the auto-growing input.
    pub fn input_rows(&self) -> u16 {
        let rows = self.draft.split('\n').count() as u16;
        rows.clamp(1, INPUT_MAX_ROWS)
    }

    // --- Chat viewport ---

    pub fn scroll_chat_up(&mut self) {
        self.chat_scroll = self.chat_scroll.saturating_sub(1);
    }

    pub fn scroll_chat_down(&mut self) {
        self.chat_scroll = self.chat_scroll.saturating_add(1);
    }

    /// Scrolls so the newest message (or the thinking indicator) is visible.
    pub fn scroll_chat_to_bottom(&mut self) {
        let wrap_width = if self.chat_width > 0 {
            self.chat_width as usize
        } else {
            50
        };

        let mut total_lines: u16 = 0;
        for msg in self.conversation.messages() {
            total_lines += 1; // role label line
            for line in msg.text.lines() {
                // Character count, not byte length, for proper UTF-8 handling
                let chars = line.chars().count();
                if chars == 0 {
                    total_lines += 1;
                } else {
                    total_lines += ((chars / wrap_width) + 1) as u16;
                }
            }
            total_lines += 1; // blank line after message
        }

        if self.sequencer.is_thinking {
            total_lines += 2; // label + "Thinking..."
        }

        let visible = if self.chat_height > 0 {
            self.chat_height
        } else {
            20
        };
        self.chat_scroll = total_lines.saturating_sub(visible);
    }

    /// Advances the ellipsis while a response is pending and expires the
    /// settings-saved notice. Called on every Tick.
    pub fn tick(&mut self) {
        if self.sequencer.is_thinking {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
        if self.saved_notice.is_some() && !self.saved_notice_visible() {
            self.saved_notice = None;
        }
    }
}

/// Convert a character index to a byte index for UTF-8 safe string edits
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

fn cursor_line_col(buf: &str, cursor: usize) -> (usize, usize) {
    let mut line = 0;
    let mut col = 0;
    for (i, c) in buf.chars().enumerate() {
        if i == cursor {
            break;
        }
        if c == '\n' {
            line += 1;
            col = 0;
        } else {
            col += 1;
        }
    }
    (line, col)
}

/// Char index of `(target_line, target_col)`, clamped to the line end and
/// then to the end of the buffer.
fn cursor_for_line_col(buf: &str, target_line: usize, target_col: usize) -> usize {
    let mut idx = 0;
    let mut line = 0;
    let mut col = 0;
    for c in buf.chars() {
        if line == target_line {
            if col == target_col || c == '\n' {
                return idx;
            }
            col += 1;
        } else if c == '\n' {
            line += 1;
        }
        idx += 1;
    }
    idx
}
