use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::app::{App, InputMode, Screen};
use crate::config;
use crate::conversation::Role;
use crate::missile::MissileWidget;

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);

    match app.screen {
        Screen::Chat => render_chat_screen(app, frame, body_area),
        Screen::Settings => render_settings_screen(app, frame, body_area),
    }

    render_footer(app, frame, footer_area);

    // Rocket overlay draws on top of the chat without clearing it, like the
    // original full-page animation layer
    if let Some(missile) = &app.missile {
        frame.render_widget(MissileWidget::new(missile), body_area);
    }
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let live_indicator = if app.sequencer.is_going_live {
        Span::styled(
            " GOING LIVE ",
            Style::default()
                .fg(Color::White)
                .bg(Color::Red)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Span::raw("")
    };

    let title = Line::from(vec![
        Span::styled(
            " AI TradeMaestro ",
            Style::default().fg(app.primary_color).bold(),
        ),
        Span::styled(
            "your AI-powered trading assistant ",
            Style::default().fg(Color::Gray),
        ),
        live_indicator,
        Span::raw(" "),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::Gray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_chat_screen(app: &mut App, frame: &mut Frame, area: Rect) {
    let quick_rows = if app.quick_actions().is_empty() { 0 } else { 3 };
    let input_rows = app.input_rows() + 2;

    let [chat_area, quick_area, input_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(quick_rows),
        Constraint::Length(input_rows),
    ])
    .areas(area);

    // Inner chat dimensions drive the scroll-to-bottom wrap math
    app.chat_height = chat_area.height.saturating_sub(2);
    app.chat_width = chat_area.width.saturating_sub(2);

    render_messages(app, frame, chat_area);
    if quick_rows > 0 {
        render_quick_actions(app, frame, quick_area);
    }
    render_input(app, frame, input_area);
}

fn render_messages(app: &App, frame: &mut Frame, area: Rect) {
    let browsing = app.input_mode == InputMode::Normal;
    let border_color = if browsing {
        app.primary_color
    } else {
        Color::DarkGray
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(" Conversation ");

    let chat_text = if app.conversation.is_empty() && !app.sequencer.is_thinking {
        Text::from(vec![
            Line::default(),
            Line::from(Span::styled(
                "  AI response will appear here",
                Style::default().fg(Color::DarkGray),
            )),
            Line::from(Span::styled(
                "  Send a message to get started",
                Style::default().fg(Color::DarkGray),
            )),
        ])
    } else {
        let mut lines: Vec<Line> = Vec::new();

        for msg in app.conversation.messages() {
            let (label, color) = match msg.role {
                Role::User => ("You:", app.primary_color),
                Role::Assistant => ("AI:", app.secondary_color),
            };
            lines.push(Line::from(vec![
                Span::styled(
                    label,
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!(" {}", msg.created_at.format("%H:%M")),
                    Style::default().fg(Color::DarkGray),
                ),
            ]));
            for line in msg.text.lines() {
                lines.push(Line::from(line.to_string()));
            }
            lines.push(Line::default());
        }

        if app.sequencer.is_thinking {
            lines.push(Line::from(Span::styled(
                "AI:",
                Style::default()
                    .fg(app.secondary_color)
                    .add_modifier(Modifier::BOLD),
            )));
            // Animated ellipsis: cycles through ".", "..", "..."
            let dots = ".".repeat((app.animation_frame as usize) + 1);
            lines.push(Line::from(Span::styled(
                format!("Thinking{}", dots),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )));
        }

        Text::from(lines)
    };

    let chat = Paragraph::new(chat_text)
        .block(block)
        .wrap(Wrap { trim: true })
        .scroll((app.chat_scroll, 0));

    frame.render_widget(chat, area);
}

fn render_quick_actions(app: &App, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Quick Actions ");

    let mut spans: Vec<Span> = Vec::new();
    for (i, action) in app.quick_actions().iter().take(9).enumerate() {
        let color = action
            .color
            .as_deref()
            .and_then(config::parse_color)
            .unwrap_or(app.primary_color);
        spans.push(Span::styled(
            format!(" [{}]", i + 1),
            Style::default().fg(Color::DarkGray),
        ));
        if action.icon.is_empty() {
            spans.push(Span::styled(
                format!(" {} ", action.title),
                Style::default().fg(color),
            ));
        } else {
            spans.push(Span::styled(
                format!(" {} {} ", action.icon, action.title),
                Style::default().fg(color),
            ));
        }
    }

    let actions = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(actions, area);
}

fn render_input(app: &App, frame: &mut Frame, area: Rect) {
    let editing = app.input_mode == InputMode::Editing;
    let border_color = if editing { Color::Yellow } else { Color::DarkGray };

    let char_count = app.draft.chars().count();
    let title = if char_count == 0 {
        " Message ".to_string()
    } else {
        format!(" Message ({} chars) ", char_count)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(title);

    let inner_width = area.width.saturating_sub(2) as usize;
    let inner_height = area.height.saturating_sub(2) as usize;

    if app.draft.is_empty() && !editing {
        let placeholder = Paragraph::new(Span::styled(
            "Enter your message...",
            Style::default().fg(Color::DarkGray),
        ))
        .block(block);
        frame.render_widget(placeholder, area);
        return;
    }

    let (cursor_line, cursor_col) = app.draft_cursor_position();

    // Keep the cursor inside the visible window, scrolling vertically past
    // the height cap and horizontally within the cursor's line
    let top = if inner_height > 0 && cursor_line + 1 > inner_height {
        cursor_line + 1 - inner_height
    } else {
        0
    };
    let h_offset = if inner_width > 0 && cursor_col >= inner_width {
        cursor_col - inner_width + 1
    } else {
        0
    };

    let visible: Vec<Line> = app
        .draft
        .split('\n')
        .skip(top)
        .take(inner_height.max(1))
        .map(|line| {
            Line::from(
                line.chars()
                    .skip(h_offset)
                    .take(inner_width)
                    .collect::<String>(),
            )
        })
        .collect();

    let input = Paragraph::new(Text::from(visible))
        .style(Style::default().fg(app.primary_color))
        .block(block);
    frame.render_widget(input, area);

    if editing && inner_width > 0 && inner_height > 0 {
        frame.set_cursor_position((
            area.x + 1 + (cursor_col - h_offset) as u16,
            area.y + 1 + (cursor_line - top) as u16,
        ));
    }
}

fn render_settings_screen(app: &App, frame: &mut Frame, area: Rect) {
    let outer = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.primary_color))
        .title(" Settings ");
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    let [label_area, text_area, notice_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .areas(inner);

    let label = Paragraph::new(Span::styled(
        " Custom Response Text",
        Style::default().add_modifier(Modifier::BOLD),
    ));
    frame.render_widget(label, label_area);

    render_settings_textarea(app, frame, text_area);

    if app.saved_notice_visible() {
        let notice = Paragraph::new(Span::styled(
            " ✓ Settings saved!",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ));
        frame.render_widget(notice, notice_area);
    }
}

fn render_settings_textarea(app: &App, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let inner_width = area.width.saturating_sub(2) as usize;
    let inner_height = area.height.saturating_sub(2) as usize;

    if app.settings_input.is_empty() {
        let placeholder = Paragraph::new(Span::styled(
            "Enter your custom response text...",
            Style::default().fg(Color::DarkGray),
        ))
        .block(block);
        frame.render_widget(placeholder, area);
        if inner_width > 0 && inner_height > 0 {
            frame.set_cursor_position((area.x + 1, area.y + 1));
        }
        return;
    }

    let (cursor_line, cursor_col) = app.settings_cursor_position();
    let top = if inner_height > 0 && cursor_line + 1 > inner_height {
        cursor_line + 1 - inner_height
    } else {
        0
    };
    let h_offset = if inner_width > 0 && cursor_col >= inner_width {
        cursor_col - inner_width + 1
    } else {
        0
    };

    let visible: Vec<Line> = app
        .settings_input
        .split('\n')
        .skip(top)
        .take(inner_height.max(1))
        .map(|line| {
            Line::from(
                line.chars()
                    .skip(h_offset)
                    .take(inner_width)
                    .collect::<String>(),
            )
        })
        .collect();

    let textarea = Paragraph::new(Text::from(visible)).block(block);
    frame.render_widget(textarea, area);

    if inner_width > 0 && inner_height > 0 {
        frame.set_cursor_position((
            area.x + 1 + (cursor_col - h_offset) as u16,
            area.y + 1 + (cursor_line - top) as u16,
        ));
    }
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let mode_style = match app.input_mode {
        InputMode::Normal => Style::default().bg(Color::Blue).fg(Color::White),
        InputMode::Editing => Style::default().bg(Color::Yellow).fg(Color::Black),
    };

    let mode_text = match app.screen {
        Screen::Chat => " CHAT ",
        Screen::Settings => " SETTINGS ",
    };

    // Key style: dark background with bright text for visibility on both
    // light and dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);
    let disabled_style = Style::default().bg(Color::Black).fg(Color::DarkGray);

    let hints = match (app.screen, app.input_mode) {
        (Screen::Chat, InputMode::Normal) => {
            let mut hints = vec![
                Span::styled(" i ", key_style),
                Span::styled(" compose ", label_style),
                Span::styled(" g ", key_style),
                Span::styled(
                    " go live ",
                    if app.can_go_live() {
                        label_style
                    } else {
                        disabled_style
                    },
                ),
            ];
            if !app.quick_actions().is_empty() {
                hints.extend(vec![
                    Span::styled(" 1-9 ", key_style),
                    Span::styled(" prompts ", label_style),
                ]);
            }
            hints.extend(vec![
                Span::styled(" j/k ", key_style),
                Span::styled(" scroll ", label_style),
                Span::styled(" s ", key_style),
                Span::styled(" settings ", label_style),
                Span::styled(" q ", key_style),
                Span::styled(" quit ", label_style),
            ]);
            hints
        }
        (Screen::Chat, InputMode::Editing) => vec![
            Span::styled(" Enter ", key_style),
            Span::styled(
                " send ",
                if app.can_submit() {
                    label_style
                } else {
                    disabled_style
                },
            ),
            Span::styled(" Shift+Enter ", key_style),
            Span::styled(" newline ", label_style),
            Span::styled(" Ctrl+G ", key_style),
            Span::styled(
                " go live ",
                if app.can_go_live() {
                    label_style
                } else {
                    disabled_style
                },
            ),
            Span::styled(" Esc ", key_style),
            Span::styled(" done ", label_style),
        ],
        (Screen::Settings, _) => vec![
            Span::styled(" Ctrl+S ", key_style),
            Span::styled(" save ", label_style),
            Span::styled(" Esc ", key_style),
            Span::styled(" back ", label_style),
        ],
    };

    let footer_content = Line::from(
        vec![
            Span::styled(mode_text, mode_style),
            Span::styled(" ", label_style),
        ]
        .into_iter()
        .chain(hints)
        .collect::<Vec<_>>(),
    );

    let footer = Paragraph::new(footer_content).style(Style::default().bg(Color::Black));
    frame.render_widget(footer, area);
}
