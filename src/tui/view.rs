//! Rendering: pure functions of the app state

use crate::api::{Conversation, Message};
use crate::store::LoadStatus;
use crate::tui::app::{App, Panel};
use chrono::DateTime;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, List, ListItem, Paragraph, Row, Table, Wrap};
use ratatui::Frame;

pub fn draw(frame: &mut Frame, app: &App) {
    match app.panel {
        Panel::Chat => draw_chat(frame, app),
        Panel::Documents => draw_documents(frame, app),
    }
}

fn draw_chat(frame: &mut Frame, app: &App) {
    let columns =
        Layout::horizontal([Constraint::Length(34), Constraint::Min(1)]).split(frame.area());
    draw_sidebar(frame, app, columns[0]);

    let rows = Layout::vertical([
        Constraint::Min(1),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .split(columns[1]);
    draw_messages(frame, app, rows[0]);
    draw_composer(frame, app, rows[1]);
    draw_status(frame, app, rows[2]);
}

fn draw_sidebar(frame: &mut Frame, app: &App, area: Rect) {
    let title = match app.state.list_status {
        LoadStatus::Idle => "Conversations".to_string(),
        LoadStatus::Loading => "Conversations (loading)".to_string(),
        LoadStatus::Error => "Conversations (error)".to_string(),
    };

    let selected = app.state.selection();
    let items: Vec<ListItem> = match app.state.conversations.as_deref() {
        None | Some([]) => vec![ListItem::new(Span::styled(
            "no conversations - ctrl-n starts one",
            Style::default().fg(Color::DarkGray),
        ))],
        Some(conversations) => conversations
            .iter()
            .map(|c| conversation_item(c, selected.as_deref()))
            .collect(),
    };

    frame.render_widget(List::new(items).block(Block::bordered().title(title)), area);
}

fn conversation_item<'a>(conversation: &'a Conversation, selected: Option<&str>) -> ListItem<'a> {
    let is_selected = selected == Some(conversation.conversation_id.as_str());
    let marker = if is_selected { "> " } else { "  " };
    let style = if is_selected {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    ListItem::new(Line::from(vec![
        Span::styled(format!("{marker}{}", short_id(&conversation.conversation_id)), style),
        Span::styled(
            format!("  {}", format_timestamp(&conversation.created_at)),
            Style::default().fg(Color::DarkGray),
        ),
    ]))
}

fn draw_messages(frame: &mut Frame, app: &App, area: Rect) {
    let (title, lines) = match (&app.state.detail, app.state.selection()) {
        (Some(detail), _) => {
            let mut lines: Vec<Line> = detail.messages.iter().map(message_line).collect();
            if app.state.message_status.is_loading() {
                lines.push(Line::from(Span::styled(
                    "assistant is thinking...",
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::ITALIC),
                )));
            }
            (format!("Chat {}", short_id(&detail.conversation_id)), lines)
        }
        (None, Some(selection)) => (
            format!("Chat {}", short_id(&selection)),
            vec![Line::from(Span::styled(
                "loading conversation...",
                Style::default().fg(Color::DarkGray),
            ))],
        ),
        (None, None) => (
            "Chat".to_string(),
            vec![Line::from(Span::styled(
                "select or create a conversation",
                Style::default().fg(Color::DarkGray),
            ))],
        ),
    };

    // Keep the tail of the conversation in view.
    let visible = area.height.saturating_sub(2) as usize;
    let scroll = lines.len().saturating_sub(visible) as u16;

    frame.render_widget(
        Paragraph::new(lines)
            .block(Block::bordered().title(title))
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0)),
        area,
    );
}

fn message_line(message: &Message) -> Line<'_> {
    let (speaker, color) = match message.kind.as_str() {
        // "text" is the locally appended preview of the user's prompt
        "human" | "text" => ("you", Color::Cyan),
        "ai" => ("assistant", Color::Green),
        other => (other, Color::Yellow),
    };

    let mut spans = vec![
        Span::styled(
            format!("{speaker}: "),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::raw(message.content.as_str()),
    ];
    if message.is_example {
        spans.push(Span::styled(
            " (example)",
            Style::default().fg(Color::DarkGray),
        ));
    }
    Line::from(spans)
}

fn draw_composer(frame: &mut Frame, app: &App, area: Rect) {
    let title = if app.state.message_status.is_loading() {
        "Message (sending...)"
    } else {
        "Message (enter to send)"
    };
    frame.render_widget(
        Paragraph::new(app.composer.text()).block(Block::bordered().title(title)),
        area,
    );
}

fn draw_status(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::styled(
        "ctrl-n new chat · tab documents · up/down switch · esc quit",
        Style::default().fg(Color::DarkGray),
    )];

    if app.state.creation_status.is_loading() {
        spans.push(Span::styled(
            "  creating...",
            Style::default().fg(Color::Yellow),
        ));
    }
    if let Some(error) = &app.last_error {
        spans.push(Span::styled(
            format!("  {error}"),
            Style::default().fg(Color::Red),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_documents(frame: &mut Frame, app: &App) {
    let rows_area =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(frame.area());

    let title = match app.state.document_status {
        LoadStatus::Idle => "Documents".to_string(),
        LoadStatus::Loading => "Documents (loading)".to_string(),
        LoadStatus::Error => "Documents (error)".to_string(),
    };

    let rows: Vec<Row> = match app.state.documents.as_deref() {
        None | Some([]) => vec![Row::new(vec![
            "no documents uploaded".to_string(),
            String::new(),
            String::new(),
            String::new(),
        ])],
        Some(documents) => documents
            .iter()
            .enumerate()
            .map(|(i, d)| {
                let row = Row::new(vec![
                    d.filename.clone(),
                    d.page_count.to_string(),
                    format_size(d.size_bytes),
                    format_timestamp(&d.created_at),
                ]);
                if i == app.document_index {
                    row.style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                } else {
                    row
                }
            })
            .collect(),
    };

    let table = Table::new(
        rows,
        [
            Constraint::Min(24),
            Constraint::Length(6),
            Constraint::Length(12),
            Constraint::Length(18),
        ],
    )
    .header(Row::new(vec!["File", "Pages", "Size", "Uploaded"]).style(Style::default().add_modifier(Modifier::UNDERLINED)))
    .block(Block::bordered().title(title));

    frame.render_widget(table, rows_area[0]);
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            "r reload · tab back to chat · esc back",
            Style::default().fg(Color::DarkGray),
        ))),
        rows_area[1],
    );
}

fn short_id(id: &str) -> &str {
    id.get(..10).unwrap_or(id)
}

/// Human-readable byte count for the documents table.
fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

/// Shorten the service's ISO 8601 timestamps for display; unparseable
/// values pass through untouched.
fn format_timestamp(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(parsed) => parsed.format("%Y-%m-%d %H:%M").to_string(),
        Err(_) => raw.to_string(),
    }
}
