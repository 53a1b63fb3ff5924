// src/ui.rs
use crate::app::{App, FocusedField};
use crate::widgets::text_field::TextField;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use std::rc::Rc;

const TITLE: &str = "AI ポッドキャストジェネレーター";
const TOPIC_LABEL: &str = "トピック";
const TOPIC_PLACEHOLDER: &str = "AIに関するトピック";
const ARTICLE_COUNT_LABEL: &str = "記事数";
const LISTENER_MESSAGE_LABEL: &str = "リスナーからのメッセージ";
const LISTENER_MESSAGE_PLACEHOLDER: &str = "リスナーからのメッセージ（任意）";
const GENERATE_LABEL: &str = "ポッドキャスト原稿を生成";
const GENERATING_LABEL: &str = "生成中...";
const SCRIPT_TITLE: &str = "生成された原稿:";
const ALERT_DISMISS_HINT: &str = "[Enter] OK";
const HINT_TEXT: &str =
    "[Tab/Shift+Tab] Move | [Ctrl+G] Generate | [↑/↓] Count / Scroll | [Esc] Quit";

pub struct LayoutChunks {
    pub title_chunk: Rect,
    pub topic_chunk: Rect,
    pub article_count_chunk: Rect,
    pub listener_message_chunk: Rect,
    pub button_chunk: Rect,
    pub script_chunk: Rect,
    pub hint_chunk: Rect,
}

pub fn compute_layout(frame_size: Rect) -> LayoutChunks {
    let chunks: Rc<[Rect]> = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // title
            Constraint::Length(3), // topic
            Constraint::Length(3), // article count
            Constraint::Length(5), // listener message, three rows
            Constraint::Length(3), // button
            Constraint::Min(0),    // script
            Constraint::Length(1), // hints
        ])
        .split(frame_size);

    LayoutChunks {
        title_chunk: chunks[0],
        topic_chunk: chunks[1],
        article_count_chunk: chunks[2],
        listener_message_chunk: chunks[3],
        button_chunk: chunks[4],
        script_chunk: chunks[5],
        hint_chunk: chunks[6],
    }
}

fn bordered(title: &str) -> Block<'_> {
    Block::default().title(title).borders(Borders::ALL)
}

/// Updates state that depends on the frame size, before drawing.
pub fn prepare_ui_layout(app: &mut App, frame_size: Rect) {
    let layout_chunks = compute_layout(frame_size);
    let inner_area = bordered(SCRIPT_TITLE).inner(layout_chunks.script_chunk);
    // Width matters too: the script wraps, so row count depends on it
    app.script_state.set_panel_size(inner_area.width, inner_area.height);
}

pub fn ui(f: &mut Frame, app: &App) {
    let layout_chunks = compute_layout(f.size());

    // === Define Styles ===
    let default_style = Style::default().fg(Color::White);
    let focused_style = Style::default().fg(Color::Cyan);
    let placeholder_style = Style::default().fg(Color::DarkGray);
    let border_for = |field: FocusedField| {
        if app.focused_field == field { focused_style } else { default_style }
    };

    // ======================================= Title ===============================================
    let title_widget = Paragraph::new(format!("🎙 {}", TITLE))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
    f.render_widget(title_widget, layout_chunks.title_chunk);

    // ====================================== Inputs ===============================================
    // (buffer, field, label, placeholder, area). The count field never shows a placeholder
    let inputs: [(&TextField, FocusedField, &str, Option<&str>, Rect); 3] = [
        (
            &app.topic_input,
            FocusedField::Topic,
            TOPIC_LABEL,
            Some(TOPIC_PLACEHOLDER),
            layout_chunks.topic_chunk,
        ),
        (
            &app.article_count_input,
            FocusedField::ArticleCount,
            ARTICLE_COUNT_LABEL,
            None,
            layout_chunks.article_count_chunk,
        ),
        (
            &app.listener_message_input,
            FocusedField::ListenerMessage,
            LISTENER_MESSAGE_LABEL,
            Some(LISTENER_MESSAGE_PLACEHOLDER),
            layout_chunks.listener_message_chunk,
        ),
    ];
    for (input, field, label, placeholder, area) in inputs {
        let block = bordered(label).border_style(border_for(field));
        let inner = block.inner(area);
        let cursor = input.cursor_position();
        // Keep the cursor's row and column inside the box once the text outgrows it
        let (row_offset, col_offset) = input_scroll_offset(cursor, inner);
        let widget = match placeholder {
            // Placeholder only while empty, and never scrolled
            Some(hint) if input.text().is_empty() => {
                Paragraph::new(hint.to_string()).style(placeholder_style)
            }
            _ => Paragraph::new(input.text().to_string())
                .style(default_style)
                .scroll((row_offset, col_offset)),
        };
        f.render_widget(widget.block(block), area);

        if app.focused_field == field && app.alert.is_none() { // Hidden under the alert
            let x = inner.x.saturating_add(cursor.0 - col_offset);
            let y = inner.y.saturating_add(cursor.1 - row_offset);
            f.set_cursor(x, y);
        }
    }

    // ====================================== Button ===============================================
    // Loading wins over focus: the button reads as disabled
    let (button_label, button_style) = if app.form.is_loading() {
        (GENERATING_LABEL, Style::default().fg(Color::DarkGray))
    } else if app.focused_field == FocusedField::GenerateButton {
        let active = Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD);
        (GENERATE_LABEL, active)
    } else {
        (GENERATE_LABEL, Style::default().fg(Color::Cyan))
    };
    let button_widget = Paragraph::new(button_label)
        .style(button_style)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_for(FocusedField::GenerateButton)),
        );
    f.render_widget(button_widget, layout_chunks.button_chunk);

    // ====================================== Script ===============================================
    if app.has_script() { // Panel absent until the first non-empty script
        let script = app.form.script().unwrap_or_default().to_string();
        // No trimming: the script's own line breaks and indentation are part of it.
        let script_widget = Paragraph::new(script)
            .wrap(Wrap { trim: false })
            .style(default_style)
            .block(bordered(SCRIPT_TITLE).border_style(border_for(FocusedField::Script)))
            .scroll((app.script_state.scroll_offset_vertical, 0));
        f.render_widget(script_widget, layout_chunks.script_chunk);
    }

    // ======================================= Hints ===============================================
    let hint_widget = Paragraph::new(HINT_TEXT)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(hint_widget, layout_chunks.hint_chunk);

    // ======================================= Alert ===============================================
    if let Some(message) = app.alert {
        let area = centered_rect(f.size(), 60, 5);
        let alert_widget = Paragraph::new(format!("{}\n\n{}", message, ALERT_DISMISS_HINT))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .style(Style::default().fg(Color::White))
            .block(
                Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Red)),
            );
        f.render_widget(Clear, area); // Blank out the form underneath
        f.render_widget(alert_widget, area);
    }
}

/// (rows, columns) to scroll a text box so that `cursor` lands on its last visible cell or earlier.
pub fn input_scroll_offset(cursor: (u16, u16), inner: Rect) -> (u16, u16) {
    let (col, row) = cursor;
    let row_offset = row.saturating_sub(inner.height.saturating_sub(1));
    let col_offset = col.saturating_sub(inner.width.saturating_sub(1));
    (row_offset, col_offset)
}

/// A `width`×`height` box in the middle of `area`, shrunk to fit.
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::AppEvent;
    use crate::errors::GenerateError;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::{Terminal, backend::TestBackend};

    fn press(app: &mut App, code: KeyCode) {
        app.on_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_keys(app: &mut App, text: &str) {
        for ch in text.chars() {
            let code = if ch == '\n' { KeyCode::Enter } else { KeyCode::Char(ch) };
            press(app, code);
        }
    }

    /// Rows strictly inside the border of `area`.
    fn inner_rows(rows: &[String], area: Rect) -> Vec<String> {
        rows[area.y as usize + 1..(area.y + area.height - 1) as usize].to_vec()
    }

    fn render(app: &mut App) -> Vec<String> {
        let backend = TestBackend::new(60, 40);
        let mut terminal = Terminal::new(backend).unwrap();
        prepare_ui_layout(app, Rect::new(0, 0, 60, 40));
        terminal.draw(|f| ui(f, app)).unwrap();

        let buffer = terminal.backend().buffer();
        (0..buffer.area.height)
            .map(|y| (0..buffer.area.width).map(|x| buffer.get(x, y).symbol()).collect())
            .collect()
    }

    fn app_with_script(script: &str) -> App {
        let mut app = App::new();
        app.submit().unwrap();
        app.handle_event(AppEvent::ScriptGenerated(Ok(script.to_string())));
        app
    }

    #[test]
    fn test_script_lines_and_indentation_are_preserved() {
        let mut app = app_with_script("Opening\n\n  1. Topic intro\n    nested detail");
        let rows = render(&mut app);

        let opening = rows.iter().position(|r| r.contains("│Opening")).unwrap();
        assert!(rows[opening + 1].starts_with("│ "));
        assert!(rows[opening + 1].trim_matches(|c| c == '│' || c == ' ').is_empty());
        assert!(rows[opening + 2].contains("│  1. Topic intro"));
        assert!(rows[opening + 3].contains("│    nested detail"));
    }

    #[test]
    fn test_no_result_panel_before_first_script() {
        let mut app = App::new();
        let rows = render(&mut app);

        let script_top = compute_layout(Rect::new(0, 0, 60, 40)).script_chunk.y as usize;
        assert!(rows[script_top].trim().is_empty());
    }

    #[test]
    fn test_alert_is_drawn_over_the_form() {
        let mut app = app_with_script("kept");
        app.submit().unwrap();
        app.handle_event(AppEvent::ScriptGenerated(Err(GenerateError::HttpStatus(503))));

        let rows = render(&mut app);

        assert!(rows.iter().any(|r| r.contains(ALERT_DISMISS_HINT)));
        assert!(rows.iter().any(|r| r.contains("│kept")));
    }

    #[test]
    fn test_end_of_long_wrapped_script_scrolls_into_view() {
        // One hard line that wraps to 35 rows in a 22-row panel
        let mut app = app_with_script(&format!("{}END", "あ".repeat(1000)));
        app.focused_field = FocusedField::Script;

        let rows = render(&mut app);
        assert!(!rows.iter().any(|r| r.contains("END")));

        for _ in 0..50 {
            press(&mut app, KeyCode::PageDown);
        }
        let rows = render(&mut app);

        assert_eq!(app.script_state.scroll_offset_vertical, 13);
        assert!(rows.iter().any(|r| r.contains("END")));
    }

    #[test]
    fn test_listener_message_follows_the_line_being_typed() {
        let mut app = App::new();
        app.focused_field = FocusedField::ListenerMessage;
        type_keys(&mut app, "L1\nL2\nL3\nL4\nLAST5");

        let rows = render(&mut app);
        let area = compute_layout(Rect::new(0, 0, 60, 40)).listener_message_chunk;
        let inside = inner_rows(&rows, area);

        assert_eq!(app.form.listener_message(), "L1\nL2\nL3\nL4\nLAST5");
        assert!(inside[0].contains("│L3"));
        assert!(inside[1].contains("│L4"));
        assert!(inside[2].contains("│LAST5"));
    }

    #[test]
    fn test_topic_scrolls_horizontally_to_the_cursor() {
        let mut app = App::new();
        type_keys(&mut app, &format!("{}TAIL", "x".repeat(70)));

        let rows = render(&mut app);
        let area = compute_layout(Rect::new(0, 0, 60, 40)).topic_chunk;
        let inside = inner_rows(&rows, area);

        // Text ends one cell before the border, leaving room for the cursor
        assert!(inside[0].ends_with("TAIL │"));
    }

    #[test]
    fn test_input_scroll_offset_only_moves_past_the_edge() {
        let inner = Rect::new(1, 1, 10, 3);
        assert_eq!(input_scroll_offset((4, 2), inner), (0, 0));
        assert_eq!(input_scroll_offset((9, 2), inner), (0, 0));
        assert_eq!(input_scroll_offset((12, 4), inner), (2, 3));
        assert_eq!(input_scroll_offset((5, 0), Rect::new(0, 0, 0, 0)), (0, 5));
    }

    #[test]
    fn test_centered_rect_fits_small_areas() {
        let rect = centered_rect(Rect::new(0, 0, 20, 3), 60, 5);
        assert_eq!(rect, Rect::new(0, 0, 20, 3));

        let rect = centered_rect(Rect::new(0, 0, 100, 41), 60, 5);
        assert_eq!(rect, Rect::new(20, 18, 60, 5));
    }
}
