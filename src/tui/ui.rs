//! TUI rendering

use super::app::{App, View};
use super::widgets::{ClosureBar, StatusBadge};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

/// Draw the UI
pub fn draw(f: &mut Frame, app: &App) {
    match app.state.view {
        View::Dashboard => draw_dashboard(f, app),
        View::Rcas => draw_rcas(f, app),
        View::RcaDetail => draw_detail(f, app),
        View::Actions => draw_actions(f, app),
        View::Similar => draw_similar(f, app),
        View::Help => draw_help(f, app),
    }

    // Draw status message if present
    if let Some(ref msg) = app.state.status_message {
        draw_status(f, msg);
    }
}

/// Draw the dashboard view
fn draw_dashboard(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(9),
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(3),
        ])
        .split(f.area());

    // Title
    let title = Paragraph::new("rcaloop — RCA Governance")
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    // KPIs
    let stats_text = vec![
        Line::from(vec![
            Span::raw("Workspace: "),
            Span::styled(
                app.workspace.root().display().to_string(),
                Style::default().fg(Color::Yellow),
            ),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::raw("RCA records: "),
            Span::styled(
                app.stats.total_rcas.to_string(),
                Style::default().fg(Color::Green),
            ),
            Span::raw("  open: "),
            Span::styled(
                app.stats.open_rcas.to_string(),
                Style::default().fg(if app.stats.open_rcas > 0 {
                    Color::Yellow
                } else {
                    Color::Green
                }),
            ),
        ]),
        Line::from(vec![
            Span::raw("Actions: "),
            Span::styled(
                app.stats.total_actions.to_string(),
                Style::default().fg(Color::Green),
            ),
            Span::raw("  done: "),
            Span::raw(app.stats.done_actions.to_string()),
            Span::raw("  in progress: "),
            Span::raw(app.stats.in_progress_actions.to_string()),
        ]),
        Line::from(vec![
            Span::raw("Overdue actions: "),
            Span::styled(
                app.stats.overdue_actions.to_string(),
                Style::default().fg(if app.stats.overdue_actions > 0 {
                    Color::Red
                } else {
                    Color::Green
                }),
            ),
        ]),
        Line::from(vec![
            Span::raw("Verified actions: "),
            Span::raw(app.stats.verified_actions.to_string()),
        ]),
    ];

    let stats = Paragraph::new(stats_text)
        .block(Block::default().title("Governance KPIs").borders(Borders::ALL));
    f.render_widget(stats, chunks[1]);

    // Closure rate
    let rate = app.stats.closure_rate();
    let bar = ClosureBar::new(rate).with_label(&format!("closure {:.0}%", rate * 100.0));
    let bar_area = Rect {
        x: chunks[2].x + 1,
        y: chunks[2].y + 1,
        width: chunks[2].width.saturating_sub(2),
        height: 1,
    };
    f.render_widget(
        Block::default().title("Action Closure").borders(Borders::ALL),
        chunks[2],
    );
    f.render_widget(bar, bar_area);

    // Recent records
    let items: Vec<ListItem> = app
        .rcas
        .iter()
        .take(8)
        .map(|rca| {
            ListItem::new(Line::from(vec![
                Span::styled(&rca.rca_id, Style::default().fg(Color::Yellow)),
                Span::raw(" "),
                Span::raw(&rca.title),
            ]))
        })
        .collect();

    let recent = List::new(items).block(
        Block::default()
            .title("Recent RCAs")
            .borders(Borders::ALL),
    );
    f.render_widget(recent, chunks[3]);

    // Help
    let help = Paragraph::new("[r] RCAs  [a] Actions  [s] Similar  [?] Help  [q] Quit")
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[4]);
}

/// Draw the RCA audit list view
fn draw_rcas(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(f.area());

    // Title
    let title = Paragraph::new(format!("RCA Audit ({})", app.rcas.len()))
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    // Records list
    let items: Vec<ListItem> = app
        .rcas
        .iter()
        .enumerate()
        .map(|(i, rca)| {
            let status_color = if rca.status == "Open" {
                Color::Yellow
            } else {
                Color::Green
            };

            let content = Line::from(vec![
                Span::styled(&rca.rca_id, Style::default().fg(Color::Yellow)),
                Span::raw(" "),
                Span::styled(format!("[{}]", rca.status), Style::default().fg(status_color)),
                Span::raw(" "),
                Span::raw(&rca.title),
                Span::styled(
                    format!("  ({} / {})", rca.oem, rca.environment),
                    Style::default().fg(Color::DarkGray),
                ),
            ]);

            let style = if i == app.state.selected_rca {
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            ListItem::new(content).style(style)
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().title("Records").borders(Borders::ALL))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    f.render_widget(list, chunks[1]);

    // Help
    let help = Paragraph::new("[↑/↓] Navigate  [Enter] Details  [c] Close RCA  [Esc] Back")
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);
}

/// Draw the RCA detail view
fn draw_detail(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(3),
        ])
        .split(f.area());

    if let Some(rca) = app.selected_rca() {
        // Title
        let title = Paragraph::new(format!("{}  [{}]", rca.rca_id, rca.status))
            .style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(title, chunks[0]);

        let mut lines = vec![
            Line::from(vec![
                Span::styled("Title: ", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(rca.title.clone()),
            ]),
            Line::from(vec![
                Span::styled("OEM: ", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(rca.oem.clone()),
                Span::raw("  "),
                Span::styled("Environment: ", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(rca.environment.clone()),
            ]),
            Line::from(vec![
                Span::styled("Incident date: ", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(rca.incident_date.clone()),
            ]),
            Line::from(vec![
                Span::styled(
                    "Services affected: ",
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(rca.services_affected.clone()),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                "Root cause:",
                Style::default().add_modifier(Modifier::BOLD),
            )),
        ];

        for line in rca.root_cause.lines() {
            lines.push(Line::from(format!("  {}", line)));
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Workaround:",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for line in rca.workaround.lines() {
            lines.push(Line::from(format!("  {}", line)));
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Actions:",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for action in app.actions.iter().filter(|a| a.rca_id == rca.rca_id) {
            lines.push(Line::from(vec![
                Span::raw("  • "),
                StatusBadge::new(&action.status).to_span(),
                Span::raw(" "),
                Span::raw(action.action_text.clone()),
            ]));
        }

        let visible: Vec<Line> = lines.into_iter().skip(app.state.scroll_offset).collect();

        let details = Paragraph::new(visible)
            .block(Block::default().title("Details").borders(Borders::ALL))
            .wrap(Wrap { trim: false });
        f.render_widget(details, chunks[1]);
    }

    // Help
    let help = Paragraph::new("[↑/↓] Scroll  [Esc] Back")
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);
}

/// Draw the action tracker view
fn draw_actions(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(f.area());

    // Title
    let title = Paragraph::new(format!("Action Tracker ({})", app.actions.len()))
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    // Actions list
    let items: Vec<ListItem> = app
        .actions
        .iter()
        .enumerate()
        .map(|(i, action)| {
            let content = Line::from(vec![
                Span::styled(&action.action_id, Style::default().fg(Color::Yellow)),
                Span::raw(" "),
                StatusBadge::new(&action.status).to_span(),
                Span::raw(" "),
                Span::raw(&action.action_text),
                Span::styled(
                    format!("  due {}", action.due_date),
                    Style::default().fg(Color::DarkGray),
                ),
            ]);

            let style = if i == app.state.selected_action {
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            ListItem::new(content).style(style)
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().title("Actions").borders(Borders::ALL))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    f.render_widget(list, chunks[1]);

    // Help
    let help = Paragraph::new("[↑/↓] Navigate  [s] Cycle status  [Esc] Back")
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);
}

/// Draw the recurrence search view
fn draw_similar(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(f.area());

    // Title
    let title = Paragraph::new("Recurrence Detection")
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    // Query bar
    let query_style = if app.state.input_mode {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let query_text = if app.state.search_query.is_empty() {
        if app.state.input_mode {
            "Describe the new incident...".to_string()
        } else {
            "Press / to enter a description".to_string()
        }
    } else {
        app.state.search_query.clone()
    };
    let query = Paragraph::new(query_text)
        .style(query_style)
        .block(Block::default().title("Query").borders(Borders::ALL));
    f.render_widget(query, chunks[1]);

    // Matches; scores at or above the threshold signal a likely recurrence
    let threshold = app.workspace.config().similarity_threshold as f64;
    let items: Vec<ListItem> = app
        .matches
        .iter()
        .map(|m| {
            let score_color = if m.score >= threshold {
                Color::Red
            } else {
                Color::Green
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:.2}", m.score), Style::default().fg(score_color)),
                Span::raw("  "),
                Span::styled(&m.rca_id, Style::default().fg(Color::Yellow)),
                Span::raw("  "),
                Span::raw(&m.title),
            ]))
        })
        .collect();

    let list = List::new(items).block(Block::default().title("Matches").borders(Borders::ALL));
    f.render_widget(list, chunks[2]);

    // Help
    let help = Paragraph::new("[/] Edit query  [Enter] Search  [Esc] Back")
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[3]);
}

/// Draw the help view
fn draw_help(f: &mut Frame, _app: &App) {
    let area = centered_rect(60, 80, f.area());

    f.render_widget(Clear, area);

    let help_text = vec![
        Line::from(Span::styled(
            "rcaloop Help",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Global",
            Style::default().add_modifier(Modifier::UNDERLINED),
        )),
        Line::from("  Ctrl+C, Ctrl+Q  Quit"),
        Line::from("  ?               Show help"),
        Line::from(""),
        Line::from(Span::styled(
            "Dashboard",
            Style::default().add_modifier(Modifier::UNDERLINED),
        )),
        Line::from("  r, Enter        RCA audit"),
        Line::from("  a               Action tracker"),
        Line::from("  s, /            Recurrence search"),
        Line::from("  q               Quit"),
        Line::from(""),
        Line::from(Span::styled(
            "RCA Audit",
            Style::default().add_modifier(Modifier::UNDERLINED),
        )),
        Line::from("  ↑/k, ↓/j        Navigate"),
        Line::from("  Enter           View details"),
        Line::from("  c               Close record"),
        Line::from("  Esc             Back"),
        Line::from(""),
        Line::from(Span::styled(
            "Action Tracker",
            Style::default().add_modifier(Modifier::UNDERLINED),
        )),
        Line::from("  ↑/k, ↓/j        Navigate"),
        Line::from("  s               Cycle status"),
        Line::from("  Esc             Back"),
        Line::from(""),
        Line::from("Press any key to close"),
    ];

    let help = Paragraph::new(help_text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .wrap(Wrap { trim: false });

    f.render_widget(help, area);
}

/// Draw status message
fn draw_status(f: &mut Frame, message: &str) {
    let area = Rect {
        x: 0,
        y: f.area().height - 1,
        width: f.area().width,
        height: 1,
    };

    let status =
        Paragraph::new(message).style(Style::default().fg(Color::Yellow).bg(Color::DarkGray));

    f.render_widget(status, area);
}

/// Create a centered rect
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
