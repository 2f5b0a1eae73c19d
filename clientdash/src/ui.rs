//! UI rendering for the TUI.

use chrono::Local;
use clientdash_core::analytics::StatusShare;
use clientdash_core::format::{format_currency, format_relative_time, format_thousands};
use clientdash_core::{delivery_progress, ChatMessage, ChatRole, KnownStatus};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{
        Bar, BarChart, BarGroup, Block, BorderType, Borders, Cell, Clear, Paragraph, Row, Table,
        Wrap,
    },
    Frame,
};

use crate::app::App;

// ========== Colors ==========

/// Title and accent color
const BRAND: Color = Color::Rgb(0, 180, 180);
/// Label color for KPI captions
const LABEL_COLOR: Color = Color::Rgb(100, 180, 180);
/// Secondary text
const DIM: Color = Color::Rgb(128, 128, 128);
/// Border color for chart blocks
const BORDER_CHART: Color = Color::Rgb(80, 160, 80);
/// Border color for the chat overlay
const BORDER_CHAT: Color = Color::Rgb(180, 100, 180);
/// Bubble color for the user's own messages
const CHAT_USER: Color = Color::Rgb(0, 200, 255);
/// Bubble color for assistant replies
const CHAT_ASSISTANT: Color = Color::Rgb(250, 250, 250);

/// Status colors
const STATUS_DELIVERED: Color = Color::Rgb(50, 205, 50);
const STATUS_IN_PROGRESS: Color = Color::Rgb(220, 180, 0);
const STATUS_PENDING: Color = Color::Rgb(80, 140, 255);
const STATUS_CANCELLED: Color = Color::Rgb(220, 80, 80);
const STATUS_OTHER: Color = Color::Rgb(150, 150, 150);

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Render the application UI.
pub fn render(frame: &mut Frame, app: &mut App) {
    if app.is_loading() {
        render_loading(frame, app);
    } else {
        render_dashboard(frame, app);
    }

    if app.chat_open {
        render_chat_overlay(frame, app);
    }
}

fn spinner(app: &App) -> &'static str {
    SPINNER[app.tick_count % SPINNER.len()]
}

/// Color for a status label. Unknown labels get the neutral style.
fn status_color(status: &str) -> Color {
    match KnownStatus::classify(status) {
        Some(KnownStatus::Delivered) => STATUS_DELIVERED,
        Some(KnownStatus::InProgress) => STATUS_IN_PROGRESS,
        Some(KnownStatus::Pending) => STATUS_PENDING,
        Some(KnownStatus::Cancelled) => STATUS_CANCELLED,
        None => STATUS_OTHER,
    }
}

/// Text gauge, e.g. "██████░░░".
fn progress_bar(fraction: f64, width: usize) -> String {
    let filled = ((fraction.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Truncate to `max_len` characters, marking the cut with an ellipsis.
fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{}…", kept)
    }
}

// ========== Loading ==========

fn render_loading(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let chunks = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(3),
        Constraint::Fill(1),
    ])
    .split(area);

    let lines = vec![
        Line::from(vec![
            Span::styled(spinner(app), Style::default().fg(BRAND)),
            Span::styled(" Loading dashboard...", Style::default().bold()),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Fetching the latest client sheet",
            Style::default().fg(DIM),
        )),
    ];

    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        chunks[1],
    );
}

// ========== Dashboard ==========

fn render_dashboard(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Layout: header, KPIs, charts, client table, footer
    let chunks = Layout::vertical([
        Constraint::Length(3),  // Header
        Constraint::Length(4),  // KPI row
        Constraint::Length(12), // Charts
        Constraint::Min(5),     // Client table
        Constraint::Length(1),  // Footer
    ])
    .split(area);

    render_header(frame, app, chunks[0]);
    render_kpis(frame, app, chunks[1]);
    render_charts(frame, app, chunks[2]);
    render_client_table(frame, app, chunks[3]);
    render_footer(frame, app, chunks[4]);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::BOTTOM);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::horizontal([Constraint::Fill(1), Constraint::Fill(1)]).split(inner);

    let title = Line::from(vec![
        Span::styled(" clientdash", Style::default().fg(BRAND).bold()),
        Span::styled("  Client Dashboard  ", Style::default().fg(DIM)),
        Span::styled(
            "● Live data",
            Style::default()
                .fg(STATUS_DELIVERED)
                .add_modifier(Modifier::BOLD),
        ),
    ]);
    frame.render_widget(Paragraph::new(title), chunks[0]);

    let synced = app
        .last_synced
        .map(format_relative_time)
        .unwrap_or_else(|| "never".to_string());

    let mut status = vec![
        Span::styled("Revenue ", Style::default().fg(LABEL_COLOR)),
        Span::styled(
            format_currency(&app.currency_symbol, app.metrics.total_revenue),
            Style::default().bold(),
        ),
        Span::raw("  │  "),
        Span::styled("Synced ", Style::default().fg(LABEL_COLOR)),
        Span::raw(synced),
    ];
    if app.is_syncing() {
        status.push(Span::raw("  "));
        status.push(Span::styled(
            format!("{} Syncing", spinner(app)),
            Style::default().fg(Color::Yellow),
        ));
    }
    status.push(Span::raw(" "));

    frame.render_widget(
        Paragraph::new(Line::from(status)).alignment(Alignment::Right),
        chunks[1],
    );
}

fn render_kpis(frame: &mut Frame, app: &App, area: Rect) {
    let metrics = &app.metrics;
    let symbol = &app.currency_symbol;

    let cards = [
        (
            "Total Revenue",
            format_currency(symbol, metrics.total_revenue),
            "all orders".to_string(),
        ),
        (
            "Total Clients",
            metrics.total_clients.to_string(),
            format!("{} in progress", metrics.in_progress_count),
        ),
        (
            "Total Headshots",
            metrics.total_headshots.to_string(),
            "photos ordered".to_string(),
        ),
        (
            "Completion Rate",
            metrics.format_completion_rate(),
            format!("{} delivered", metrics.delivered_count),
        ),
        (
            "Avg Order Value",
            format_currency(symbol, metrics.average_order_value.round()),
            "per client".to_string(),
        ),
    ];

    let chunks = Layout::horizontal([Constraint::Fill(1); 5]).split(area);
    for ((title, value, caption), chunk) in cards.into_iter().zip(chunks.iter()) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(format!(" {} ", title))
            .title_style(Style::default().fg(LABEL_COLOR));

        let lines = vec![
            Line::from(Span::styled(value, Style::default().fg(Color::White).bold())),
            Line::from(Span::styled(caption, Style::default().fg(DIM))),
        ];
        frame.render_widget(
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .block(block),
            *chunk,
        );
    }
}

fn render_charts(frame: &mut Frame, app: &App, area: Rect) {
    let chunks =
        Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)]).split(area);

    render_revenue_chart(frame, app, chunks[0]);
    render_status_breakdown(frame, app, chunks[1]);
}

/// Per-client revenue bars.
fn render_revenue_chart(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_CHART))
        .title(" Revenue Analysis ");

    if app.revenue.is_empty() {
        frame.render_widget(
            Paragraph::new("No revenue data")
                .style(Style::default().fg(DIM))
                .alignment(Alignment::Center)
                .block(block),
            area,
        );
        return;
    }

    const BAR_WIDTH: u16 = 7;
    let bars: Vec<Bar> = app
        .revenue
        .iter()
        .map(|point| {
            Bar::default()
                // Negative prices can't be drawn; they show as empty bars.
                .value(point.revenue.max(0.0).round() as u64)
                .label(Line::from(truncate_string(&point.name, BAR_WIDTH as usize)))
                .text_value(format_thousands(&app.currency_symbol, point.revenue))
                .style(Style::default().fg(status_color(&point.status)))
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(BAR_WIDTH)
        .bar_gap(1)
        .value_style(Style::default().fg(Color::Black).bold())
        .label_style(Style::default().fg(DIM));

    frame.render_widget(chart, area);
}

/// Count and share per status label.
fn render_status_breakdown(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_CHART))
        .title(" Project Status ");

    if app.breakdown.is_empty() {
        frame.render_widget(
            Paragraph::new("No clients yet")
                .style(Style::default().fg(DIM))
                .alignment(Alignment::Center)
                .block(block),
            area,
        );
        return;
    }

    let lines: Vec<Line> = app.breakdown.shares.iter().map(status_line).collect();
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn status_line(share: &StatusShare) -> Line<'static> {
    let color = status_color(&share.status);
    let label = if share.status.is_empty() {
        "(none)".to_string()
    } else {
        truncate_string(&share.status, 12)
    };

    Line::from(vec![
        Span::styled(" ● ", Style::default().fg(color)),
        Span::raw(format!("{:<12}", label)),
        Span::styled(
            format!("{:>4} ", share.count),
            Style::default().fg(Color::White).bold(),
        ),
        Span::styled(
            progress_bar(share.percentage / 100.0, 10),
            Style::default().fg(color),
        ),
        Span::styled(
            format!(" {:>6}", share.format_percentage()),
            Style::default().fg(DIM),
        ),
    ])
}

/// Client portfolio table.
fn render_client_table(frame: &mut Frame, app: &mut App, area: Rect) {
    let header_cells = ["", "Client", "Shots", "Price", "Status", "Progress", "Email"]
        .into_iter()
        .map(|h| Cell::from(h).style(Style::default().fg(Color::Yellow).bold()));
    let header = Row::new(header_cells).height(1);

    let symbol = app.currency_symbol.clone();
    let rows = app.records.iter().map(|record| {
        let color = status_color(&record.status);

        Row::new([
            Cell::from(record.initials()).style(Style::default().fg(BRAND).bold()),
            Cell::from(record.client_name.as_str()),
            Cell::from(record.headshot_count.to_string()),
            Cell::from(format_currency(&symbol, record.price)),
            Cell::from(record.status.as_str()).style(Style::default().fg(color)),
            Cell::from(progress_bar(delivery_progress(&record.status), 9))
                .style(Style::default().fg(color)),
            Cell::from(record.email.as_str()).style(Style::default().fg(DIM)),
        ])
    });

    let widths = [
        Constraint::Length(3),  // Initials
        Constraint::Fill(1),    // Client (flexible)
        Constraint::Length(6),  // Shots
        Constraint::Length(14), // Price
        Constraint::Length(12), // Status
        Constraint::Length(10), // Progress
        Constraint::Fill(1),    // Email (flexible)
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title(format!(" Client Portfolio ({}) ", app.records.len())),
        )
        .row_highlight_style(
            Style::default()
                .add_modifier(Modifier::REVERSED)
                .fg(Color::Cyan),
        )
        .highlight_symbol("▶ ");

    frame.render_stateful_widget(table, area, &mut app.table_state);
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let selected = app.table_state.selected().map(|i| i + 1).unwrap_or(0);

    let mut footer_spans = vec![
        Span::styled(" r", Style::default().fg(Color::Yellow)),
        Span::raw(" sync data  "),
        Span::styled("c", Style::default().fg(Color::Yellow)),
        Span::raw(" chat  "),
        Span::styled("j/k", Style::default().fg(Color::Yellow)),
        Span::raw(" navigate  "),
        Span::styled("q", Style::default().fg(Color::Yellow)),
        Span::raw(" quit  "),
        Span::raw("│ "),
        Span::styled(
            format!("{}/{} clients", selected, app.records.len()),
            Style::default().fg(Color::DarkGray),
        ),
    ];

    if let Some(error) = &app.last_error {
        footer_spans.push(Span::raw(" │ "));
        footer_spans.push(Span::styled(
            format!("⚠ Sync failed: {}", error),
            Style::default().fg(STATUS_CANCELLED),
        ));
    }

    if app.chat.is_awaiting() && !app.chat_open {
        footer_spans.push(Span::raw(" │ "));
        footer_spans.push(Span::styled(
            "Assistant is replying",
            Style::default().fg(BORDER_CHAT),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(footer_spans)), area);
}

// ========== Chat overlay ==========

/// Rectangle of the given percentage size centered in `area`.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .split(area);

    Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(vertical[1])[1]
}

fn render_chat_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect(70, 75, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_CHAT))
        .title(" Assistant ")
        .title_style(Style::default().fg(BORDER_CHAT).bold());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::vertical([
        Constraint::Min(3),    // Messages
        Constraint::Length(3), // Input
        Constraint::Length(1), // Hints
    ])
    .split(inner);

    render_chat_messages(frame, app, chunks[0]);
    render_chat_input(frame, app, chunks[1]);

    let hints = Line::from(vec![
        Span::styled(" Enter", Style::default().fg(Color::Yellow)),
        Span::raw(" send  "),
        Span::styled("Esc", Style::default().fg(Color::Yellow)),
        Span::raw(" close"),
    ]);
    frame.render_widget(Paragraph::new(hints), chunks[2]);
}

fn render_chat_messages(frame: &mut Frame, app: &App, area: Rect) {
    if app.chat.is_empty() {
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Ask about clients, orders or revenue.",
                Style::default().fg(DIM),
            )),
        ];
        frame.render_widget(
            Paragraph::new(lines).alignment(Alignment::Center),
            area,
        );
        return;
    }

    let mut lines: Vec<Line> = Vec::new();
    for message in app.chat.messages() {
        lines.extend(message_lines(message));
        lines.push(Line::from(""));
    }
    if app.chat.is_awaiting() {
        lines.push(Line::from(Span::styled(
            format!("{} Thinking...", spinner(app)),
            Style::default().fg(DIM).add_modifier(Modifier::ITALIC),
        )));
    }

    // Keep the newest message in view.
    let width = area.width.max(1) as usize;
    let total_rows: usize = lines
        .iter()
        .map(|line| line.width().max(1).div_ceil(width))
        .sum();
    let scroll = total_rows.saturating_sub(area.height as usize);

    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((scroll.min(u16::MAX as usize) as u16, 0)),
        area,
    );
}

/// A message as a header line plus its content, aligned by author.
fn message_lines(message: &ChatMessage) -> Vec<Line<'static>> {
    let (alignment, color) = match message.role {
        ChatRole::User => (Alignment::Right, CHAT_USER),
        ChatRole::Assistant => (Alignment::Left, CHAT_ASSISTANT),
    };

    let stamp = message.sent_at.with_timezone(&Local).format("%H:%M");
    let mut lines = vec![Line::from(vec![
        Span::styled(
            message.role.display_name().to_string(),
            Style::default().fg(color).bold(),
        ),
        Span::styled(format!(" · {}", stamp), Style::default().fg(DIM)),
    ])
    .alignment(alignment)];

    lines.extend(message.content.lines().map(|text| {
        Line::from(Span::styled(text.to_string(), Style::default().fg(color))).alignment(alignment)
    }));
    lines
}

fn render_chat_input(frame: &mut Frame, app: &App, area: Rect) {
    let awaiting = app.chat.is_awaiting();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(if awaiting { DIM } else { BORDER_CHAT }))
        .title(" Message ");
    let inner = block.inner(area);

    if awaiting {
        let text = Span::styled("Waiting for reply...", Style::default().fg(DIM));
        frame.render_widget(Paragraph::new(Line::from(text)).block(block), area);
        return;
    }

    // Show the tail of long input, leaving one cell for the cursor.
    let (tail, shown) = input_tail(&app.chat_input, usize::from(inner.width.saturating_sub(1)));
    frame.render_widget(Paragraph::new(Line::from(tail)).block(block), area);

    if inner.width > 0 {
        frame.set_cursor_position((inner.x.saturating_add(shown), inner.y));
    }
}

/// The last `room` characters of `input` and how many that is.
fn input_tail(input: &str, room: usize) -> (String, u16) {
    let typed = input.chars().count();
    let skip = typed.saturating_sub(room);
    let tail: String = input.chars().skip(skip).collect();
    let shown = u16::try_from(typed - skip).unwrap_or(u16::MAX);
    (tail, shown)
}
