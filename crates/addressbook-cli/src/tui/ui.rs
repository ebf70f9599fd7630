//! UI rendering

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

use addressbook_core::{ContactFormView, ContactListView, Field, WindowState};

use super::app::App;

/// Main UI rendering function
pub fn draw(frame: &mut Frame, app: &App) {
    // Create vertical layout for status bar at the bottom
    let outer_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(frame.area());

    let list = app.session.list();
    let form = app.session.form();

    match list.window_state() {
        WindowState::Maximized => draw_list_pane(frame, &list, outer_chunks[0]),
        WindowState::Normal => {
            let pane_chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
                .split(outer_chunks[0]);
            draw_list_pane(frame, &list, pane_chunks[0]);
            draw_form_pane(frame, &form, app.active_field, pane_chunks[1]);
        }
    }

    draw_status_bar(frame, app, &list, &form, outer_chunks[1]);

    if let Some(message) = &app.error_message {
        draw_error_modal(frame, message);
    } else if app.show_help {
        draw_help_overlay(frame);
    }
}

/// Draw the contact table
fn draw_list_pane(frame: &mut Frame, list: &ContactListView, area: Rect) {
    let columns = list.columns();

    let header = Row::new(
        columns
            .iter()
            .map(|column| Cell::from(column.header()))
            .collect::<Vec<_>>(),
    )
    .style(Style::default().add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = list
        .rows()
        .iter()
        .map(|contact| {
            Row::new(
                columns
                    .iter()
                    .map(|column| Cell::from(column.value(contact)))
                    .collect::<Vec<_>>(),
            )
        })
        .collect();

    let widths = vec![Constraint::Ratio(1, columns.len() as u32); columns.len()];

    let title = match list.page_size() {
        Some(_) => format!(" Contacts ({}) page {} ", list.rows().len(), list.page() + 1),
        None => format!(" Contacts ({}) ", list.rows().len()),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().add_modifier(Modifier::BOLD));

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .add_modifier(Modifier::REVERSED),
        );

    let mut state = TableState::default();
    state.select(list.selected());

    frame.render_stateful_widget(table, area, &mut state);
}

/// Draw the contact form
fn draw_form_pane(frame: &mut Frame, form: &ContactFormView, active_field: Field, area: Rect) {
    let editing = form.is_editable();

    let title = match (editing, form.contact_id()) {
        (true, Some(id)) => format!(" Editing contact {} ", id),
        (true, None) => " New contact ".to_string(),
        (false, Some(id)) => format!(" Contact {} ", id),
        (false, None) => " Contact ".to_string(),
    };
    let border_style = if editing {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);

    if !editing && form.contact().is_none() {
        let hint = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Select a contact with Enter, or press n to create one",
                Style::default().add_modifier(Modifier::DIM),
            )),
        ];
        frame.render_widget(Paragraph::new(hint).block(block), area);
        return;
    }

    let mut lines = Vec::new();
    for field in Field::ALL {
        let value = form.fields().get(field);
        let is_active = editing && field == active_field;

        let label_style = Style::default().add_modifier(Modifier::BOLD);
        let value_span = if is_active {
            Span::styled(
                format!("{}_", value),
                Style::default().add_modifier(Modifier::REVERSED),
            )
        } else if value.is_empty() {
            Span::styled("-", Style::default().add_modifier(Modifier::DIM))
        } else {
            Span::raw(value.to_string())
        };

        lines.push(Line::from(vec![
            Span::styled(format!("{:<14}", format!("{}:", field.label())), label_style),
            value_span,
        ]));
        lines.push(Line::from(""));
    }

    if let Some(image) = form.image() {
        lines.push(Line::from(vec![
            Span::styled("Image:        ", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(image.to_string(), Style::default().add_modifier(Modifier::DIM)),
        ]));
    }

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

/// Draw the status bar at the bottom
fn draw_status_bar(
    frame: &mut Frame,
    app: &App,
    list: &ContactListView,
    form: &ContactFormView,
    area: Rect,
) {
    let content = if let Some(msg) = &app.status_message {
        msg.clone()
    } else if form.is_editable() {
        format!("Enter:{}  Tab:next field  Esc:cancel", form.action_label())
    } else {
        let mut hints = vec!["j/k:move", "Enter:select"];
        let action = match form.action_label() {
            "Edit" => "e:edit  n:new",
            _ => "n:create new",
        };
        hints.push(action);
        if form.can_remove() {
            hints.push("d:remove");
        }
        if list.page_size().is_some() {
            hints.push("[/]:page");
        }
        let window = match list.window_state() {
            WindowState::Normal => "m:maximize",
            WindowState::Maximized => "m:normalize",
        };
        hints.push(window);
        hints.push("?:help  q:quit");
        hints.join("  ")
    };

    let paragraph = Paragraph::new(content).style(Style::default().add_modifier(Modifier::DIM));

    frame.render_widget(paragraph, area);
}

/// Centered popup area
fn popup_area(frame: &Frame, width: u16, height: u16) -> Rect {
    let area = frame.area();
    let popup_width = width.min(area.width.saturating_sub(4));
    let popup_height = height.min(area.height.saturating_sub(4));
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;
    Rect::new(popup_x, popup_y, popup_width, popup_height)
}

/// Draw an error that must be acknowledged
fn draw_error_modal(frame: &mut Frame, message: &str) {
    let area = popup_area(frame, 60, 7);
    frame.render_widget(Clear, area);

    let text = vec![
        Line::from(Span::styled(message.to_string(), Style::default().fg(Color::Red))),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to continue",
            Style::default().add_modifier(Modifier::DIM),
        )),
    ];

    let block = Block::default()
        .title(" Error ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));

    let paragraph = Paragraph::new(text).block(block).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

/// Draw help overlay
fn draw_help_overlay(frame: &mut Frame) {
    let area = popup_area(frame, 50, 22);

    // Clear the popup area
    frame.render_widget(Clear, area);

    let help_text = vec![
        Line::from(vec![Span::styled(
            "Keyboard Shortcuts",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        Line::from("List:"),
        Line::from("  j/k, ↑/↓    Move up/down"),
        Line::from("  Enter       Show contact in form"),
        Line::from("  ]/[         Next/previous page"),
        Line::from("  m           Maximize/normalize list"),
        Line::from(""),
        Line::from("Form:"),
        Line::from("  e           Edit contact"),
        Line::from("  n           New contact"),
        Line::from("  d           Remove contact"),
        Line::from("  Tab         Next field (editing)"),
        Line::from("  Enter       Save (editing)"),
        Line::from("  Esc         Cancel edit / clear form"),
        Line::from(""),
        Line::from("  q           Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().add_modifier(Modifier::BOLD));

    let paragraph = Paragraph::new(help_text).block(block);
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};
    use tempfile::TempDir;

    use crate::tui::app::tests::app_with_contacts;

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect::<String>()
    }

    #[test]
    fn test_normal_window_shows_three_columns() {
        let temp_dir = TempDir::new().unwrap();
        let app = app_with_contacts(&temp_dir, 2);

        let screen = render(&app);

        assert!(screen.contains("First name"));
        assert!(screen.contains("Phone number"));
        assert!(!screen.contains("Birth date"));
        assert!(screen.contains("m:maximize"));
    }

    #[test]
    fn test_selected_contact_shown_in_form() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = app_with_contacts(&temp_dir, 2);
        app.move_down();
        app.select_current();

        let screen = render(&app);

        assert!(screen.contains("Contact 1"));
        assert!(screen.contains("First1"));
        assert!(screen.contains("e:edit"));
    }

    #[test]
    fn test_maximized_window_adds_columns() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = app_with_contacts(&temp_dir, 2);
        app.toggle_maximized();
        app.status_message = None;

        let screen = render(&app);

        assert!(screen.contains("Birth date"));
        assert!(screen.contains("m:normalize"));
    }
}
