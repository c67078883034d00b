//! Terminal drawing: auth card, library screen and dialogs

use ratatui::{prelude::*, widgets::*};

use crate::app::state::{AuthTab, Dialog, Screen};
use crate::constants::{APP_NAME, CONFIRM_DELETE};
use crate::messages::render::{FieldView, FormView, LibraryView};
use crate::messages::ui_events::InputMode;
use crate::messages::RenderState;
use crate::models::BookRecord;

const MASK: char = '•';

pub fn draw(f: &mut Frame, state: &RenderState) {
    let area = f.area();

    match state.screen {
        Screen::Starting => {
            let loading = Paragraph::new("Loading...").alignment(Alignment::Center);
            f.render_widget(loading, centered_rect(40, 10, area));
        }
        Screen::Auth => draw_auth(f, state, area),
        Screen::Library => {
            draw_library(f, state, area);
            match state.dialog {
                Dialog::Book | Dialog::ChangePassword => {
                    if let Some(form) = &state.dialog_form {
                        draw_form_dialog(f, form, area);
                    }
                }
                Dialog::ConfirmDelete => draw_confirm_popup(f, area),
                Dialog::Help => draw_help_popup(f, area),
                Dialog::None => {}
            }
        }
    }
}

// ============================================================================
// Auth screen
// ============================================================================

fn draw_auth(f: &mut Frame, state: &RenderState, area: Rect) {
    let card = centered_rect(60, 90, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" {} ", APP_NAME))
        .title_style(Style::default().bold());
    let inner = block.inner(card);
    f.render_widget(Clear, card);
    f.render_widget(block, card);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Subtitle
            Constraint::Length(1), // Tabs
            Constraint::Length(1),
            Constraint::Min(0),    // Form
            Constraint::Length(1), // Hints
        ])
        .split(inner);

    let subtitle = Paragraph::new("Sign in to manage your book collection")
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center);
    f.render_widget(subtitle, chunks[0]);

    let selected = match state.auth_tab {
        AuthTab::SignIn => 0,
        AuthTab::SignUp => 1,
    };
    f.render_widget(render_tabs(&["Sign In", "Sign Up"], selected), chunks[1]);

    draw_form(f, &state.auth_form, state.sign_up_success.as_deref(), chunks[3]);

    let hints = Paragraph::new(" Tab:next field | Enter:submit | Ctrl+T:switch tab | Ctrl+C:quit ")
        .style(Style::default().fg(Color::DarkGray));
    f.render_widget(hints, chunks[4]);
}

// ============================================================================
// Forms
// ============================================================================

/// Fields top to bottom, each with its inline error, then the general
/// error, an optional success line and the submit button
fn draw_form(f: &mut Frame, form: &FormView, success: Option<&str>, area: Rect) {
    let mut constraints = Vec::with_capacity(form.fields.len() * 2 + 3);
    for _ in &form.fields {
        constraints.push(Constraint::Length(3));
        constraints.push(Constraint::Length(1));
    }
    constraints.extend([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(0),
    ]);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (i, field) in form.fields.iter().enumerate() {
        let input_area = chunks[i * 2];
        f.render_widget(render_input(field), input_area);

        if field.focused && !field.choice && !form.submitting {
            let column = field
                .value
                .get(..form.cursor)
                .map(|s| s.chars().count())
                .unwrap_or_else(|| field.value.chars().count()) as u16;
            let max_x = input_area.x + input_area.width.saturating_sub(2);
            let cursor_x = (input_area.x + column + 1).min(max_x);
            f.set_cursor_position(Position::new(cursor_x, input_area.y + 1));
        }

        if let Some(error) = &field.error {
            let line = Paragraph::new(error.as_str()).style(Style::default().fg(Color::Red));
            f.render_widget(line, chunks[i * 2 + 1]);
        }
    }

    let base = form.fields.len() * 2;
    if let Some(error) = &form.general_error {
        let line = Paragraph::new(error.as_str()).style(Style::default().fg(Color::Red));
        f.render_widget(line, chunks[base]);
    }
    if let Some(message) = success {
        let line = Paragraph::new(message).style(Style::default().fg(Color::Green));
        f.render_widget(line, chunks[base + 1]);
    }

    let button_style = if form.submitting {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::Black).bg(Color::Cyan).bold()
    };
    let button = Paragraph::new(format!(" {} ", form.submit_label))
        .style(button_style)
        .alignment(Alignment::Center);
    f.render_widget(button, chunks[base + 2]);
}

/// Renders a text input field; secrets are masked, choices show arrows
pub fn render_input(field: &FieldView) -> Paragraph<'static> {
    let style = if field.focused {
        Style::default().fg(Color::Yellow)
    } else if field.error.is_some() {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let content = if field.secret {
        MASK.to_string().repeat(field.value.chars().count())
    } else if field.choice {
        format!("◀ {} ▶", field.value)
    } else {
        field.value.clone()
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(format!(" {} ", field.label));

    Paragraph::new(content)
        .style(Style::default().fg(Color::White))
        .block(block)
}

fn draw_form_dialog(f: &mut Frame, form: &FormView, area: Rect) {
    let popup_area = centered_rect(60, 80, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" {} ", form.title))
        .style(Style::default().bg(Color::Black));
    let inner = block.inner(popup_area);

    f.render_widget(Clear, popup_area);
    f.render_widget(block, popup_area);
    draw_form(f, form, None, inner);
}

// ============================================================================
// Library screen
// ============================================================================

fn draw_library(f: &mut Frame, state: &RenderState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Length(3), // Search, filter, order
            Constraint::Length(1), // Banner
            Constraint::Min(0),    // Books
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    let library = &state.library;

    let mut header = vec![Span::styled("My books...", Style::default().bold())];
    if let Some(email) = &state.user_email {
        header.push(Span::styled(
            format!("  ({})", email),
            Style::default().fg(Color::DarkGray),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(header)), chunks[0]);

    draw_controls(f, state, chunks[1]);

    if let Some(error) = &library.error {
        let banner = Paragraph::new(format!(" Error: {} ", error))
            .style(Style::default().fg(Color::White).bg(Color::Red));
        f.render_widget(banner, chunks[2]);
    } else if let Some(success) = &library.success {
        let banner = Paragraph::new(format!(" {} ", success))
            .style(Style::default().fg(Color::Black).bg(Color::Green));
        f.render_widget(banner, chunks[2]);
    }

    draw_books(f, library, chunks[3]);
    draw_status_bar(f, state, chunks[4]);
}

fn draw_controls(f: &mut Frame, state: &RenderState, area: Rect) {
    let library = &state.library;
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(50),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    let searching = state.input_mode == InputMode::Editing;
    let search_style = if searching {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let (text, text_style) = if library.search.is_empty() && !searching {
        ("Search books...", Style::default().fg(Color::DarkGray))
    } else {
        (library.search.as_str(), Style::default())
    };
    let search = Paragraph::new(text).style(text_style).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(search_style)
            .title(" / Search "),
    );
    f.render_widget(search, columns[0]);

    if searching {
        let column = library
            .search
            .get(..library.search_cursor)
            .map(|s| s.chars().count())
            .unwrap_or(0) as u16;
        let max_x = columns[0].x + columns[0].width.saturating_sub(2);
        let cursor_x = (columns[0].x + column + 1).min(max_x);
        f.set_cursor_position(Position::new(cursor_x, columns[0].y + 1));
    }

    let filter = Paragraph::new(library.filter_label.as_str())
        .block(Block::default().borders(Borders::ALL).title(" f:Category "));
    f.render_widget(filter, columns[1]);

    let order = Paragraph::new(library.sort_label.as_str())
        .block(Block::default().borders(Borders::ALL).title(" o:Order "));
    f.render_widget(order, columns[2]);
}

fn draw_books(f: &mut Frame, library: &LibraryView, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Books ({}/{}) ", library.books.len(), library.total));

    if library.loading && library.total == 0 {
        let loading = Paragraph::new("Loading...")
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(loading, area);
        return;
    }

    if let Some(message) = library.empty_message {
        let empty = Paragraph::new(message)
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = library.books.iter().map(book_item).collect();
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("> ");
    let mut list_state = ListState::default().with_selected(Some(library.selected));
    f.render_stateful_widget(list, area, &mut list_state);
}

fn book_item(book: &BookRecord) -> ListItem<'static> {
    ListItem::new(vec![
        Line::from(vec![
            Span::styled(book.title.clone(), Style::default().bold()),
            Span::styled(format!(" by {}", book.author), Style::default().fg(Color::Gray)),
        ]),
        Line::from(vec![
            Span::styled(
                format!(" {} ", book.category),
                Style::default().fg(Color::Black).bg(Color::Cyan),
            ),
            Span::raw(format!("  Published: {}", book.year)),
        ]),
        Line::from(""),
    ])
}

fn draw_status_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let status = if state.library.loading {
        " Loading... "
    } else if state.input_mode == InputMode::Editing {
        " ESC/Enter:stop searching | arrows:move "
    } else {
        " a:add | e:edit | d:delete | /:search | f:category | o:order | p:password | x:sign out | ?:help | q:quit "
    };

    let bar = Paragraph::new(status).style(Style::default().fg(Color::DarkGray));
    f.render_widget(bar, area);
}

// ============================================================================
// Popups
// ============================================================================

fn draw_confirm_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(50, 25, area);
    let text = vec![
        Line::from(""),
        Line::from(CONFIRM_DELETE),
        Line::from(""),
        Line::from(vec![
            Span::styled(" Enter/y: Accept ", Style::default().fg(Color::Black).bg(Color::Red)),
            Span::raw("   "),
            Span::styled(" Esc/n: Cancel ", Style::default().fg(Color::Gray)),
        ]),
    ];
    let popup = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Alert ")
                .style(Style::default().bg(Color::Black)),
        );

    f.render_widget(Clear, popup_area);
    f.render_widget(popup, popup_area);
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);

    let help_text = r#"
 BOOK MANAGER - Keyboard Shortcuts

 LIBRARY
   ↑ / ↓              Select book
   a                  Add a book
   e / Enter          Edit selected book
   d                  Delete selected book
   r                  Reload the list

 FIND
   /                  Search title or author
   f / F              Next / previous category
   o                  Cycle ordering

 ACCOUNT
   p                  Change password
   x                  Sign out

 FORMS
   Tab / Shift+Tab    Next / previous field
   ← / →              Move cursor, pick category
   Enter              Submit
   Esc                Close dialog

 GENERAL
   ?                  Toggle this help
   q / Ctrl+C         Quit

 Press any key to close...
"#;

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    let help = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(help, popup_area);
}

// ============================================================================
// Helpers
// ============================================================================

/// Renders tabs
pub fn render_tabs<'a>(titles: &[&'a str], selected: usize) -> Tabs<'a> {
    let titles: Vec<Line> = titles.iter().map(|t| Line::from(*t)).collect();

    Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(Style::default().fg(Color::Yellow).bold())
        .divider("|")
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
