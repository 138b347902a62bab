//! Catalog TUI - Actor-based catalog manager
//!
//! Architecture:
//! - UI Layer (Ratatui) - synchronous terminal rendering
//! - App Layer - central state machine processing events
//! - Network Layer (Tokio) - async store requests

use std::io;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::*, widgets::*};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use catalog_tui::app::forms::{FormField, FormKind, ProductForm};
use catalog_tui::constants::{APP_NAME, APP_VERSION};
use catalog_tui::messages::ui_events::{key_to_ui_event, InputMode};
use catalog_tui::query::SortKey;
use catalog_tui::ui::{
    centered_rect, notice_color, pagination_line, price_text, render_input, sanitize, sort_header,
    truncate,
};
use catalog_tui::{
    AppActor, Cli, Config, NetworkActor, NetworkCommand, NetworkResponse, RenderState,
    StoreClient, UiEvent,
};

/// Terminal cleanup guard
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load(&cli)?;

    // Initialize logging to file; stdout belongs to the terminal UI
    let log_dir = config.log_file.parent().unwrap_or(Path::new("."));
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("creating log directory {}", log_dir.display()))?;
    let log_name = config
        .log_file
        .file_name()
        .context("log_file must name a file")?;
    let file_appender = tracing_appender::rolling::never(log_dir, log_name);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();
    tracing::info!(api_base = %config.api_base, page_size = config.page_size, "Starting {}", APP_NAME);

    let client = StoreClient::new(
        config.api_base.clone(),
        Duration::from_secs(config.request_timeout_secs),
    )?;

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let _terminal_guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create channels
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (net_cmd_tx, net_cmd_rx) = mpsc::unbounded_channel::<NetworkCommand>();
    let (net_resp_tx, net_resp_rx) = mpsc::unbounded_channel::<NetworkResponse>();
    let (render_tx, mut render_rx) = mpsc::unbounded_channel::<RenderState>();

    // Spawn network actor
    let network_actor = NetworkActor::new(client, net_resp_tx);
    tokio::spawn(network_actor.run(net_cmd_rx));

    // Spawn app actor
    let app_actor = AppActor::new(&config, net_cmd_tx, render_tx);
    tokio::spawn(app_actor.run(ui_rx, net_resp_rx));

    run_ui_loop(&mut terminal, ui_tx, &mut render_rx).await?;

    tracing::info!("Shutting down");
    Ok(())
}

/// Run the synchronous UI rendering loop
async fn run_ui_loop(
    terminal: &mut Terminal<impl Backend>,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
    render_rx: &mut mpsc::UnboundedReceiver<RenderState>,
) -> anyhow::Result<()> {
    let mut current_state = RenderState::default();

    loop {
        terminal.draw(|f| draw_ui(f, &current_state))?;

        // Poll for events with timeout
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Some(event) = key_to_ui_event(
                    key,
                    current_state.input_mode,
                    current_state.show_help,
                    current_state.notice.is_some(),
                    current_state.category_focused(),
                ) {
                    let quit = matches!(event, UiEvent::Quit);
                    let _ = ui_tx.send(event);
                    if quit {
                        break;
                    }
                }
            }
        }

        // Check for state updates (non-blocking)
        while let Ok(state) = render_rx.try_recv() {
            current_state = state;
        }
    }

    Ok(())
}

// ============================================================================
// UI Drawing Functions
// ============================================================================

fn draw_ui(f: &mut Frame, state: &RenderState) {
    let area = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search + page size
            Constraint::Min(5),    // Table
            Constraint::Length(1), // Pagination
            Constraint::Length(1), // Selected row description
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    draw_toolbar(f, state, chunks[0]);
    draw_table(f, state, chunks[1]);
    f.render_widget(
        Paragraph::new(pagination_line(state.page, state.page_count)).alignment(Alignment::Center),
        chunks[2],
    );
    draw_description_line(f, state, chunks[3]);
    draw_status_bar(f, state, chunks[4]);

    if let Some(form) = &state.form {
        draw_form_popup(f, state, form, area);
    }

    if state.show_help {
        draw_help_popup(f, area);
    }

    if state.notice.is_some() {
        draw_notice_popup(f, state, area);
    }
}

fn draw_toolbar(f: &mut Frame, state: &RenderState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(24)])
        .split(area);

    let searching = state.input_mode == InputMode::Search;
    let title = if searching { " Search (Enter/Esc done) " } else { " Search (/) " };
    f.render_widget(render_input(&state.search_input, title, searching), chunks[0]);

    if searching {
        let max_x = chunks[0].x + chunks[0].width.saturating_sub(2);
        let cursor_x = (chunks[0].x + state.search_input.chars().count() as u16 + 1).min(max_x);
        f.set_cursor_position(Position::new(cursor_x, chunks[0].y + 1));
    }

    let size = Paragraph::new(format!("{} per page", state.page_size)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Page size (z) "),
    );
    f.render_widget(size, chunks[1]);
}

fn draw_table(f: &mut Frame, state: &RenderState, area: Rect) {
    let header = Row::new(vec![
        Cell::from("ID"),
        Cell::from("Image"),
        Cell::from(sort_header("Title (t)", SortKey::Title, state.sort_by, state.sort_dir)),
        Cell::from(sort_header("Price (p)", SortKey::Price, state.sort_by, state.sort_dir)),
        Cell::from("Category"),
    ])
    .style(Style::default().fg(Color::Yellow).bold());

    let rows: Vec<Row> = state
        .rows
        .iter()
        .map(|p| {
            Row::new(vec![
                Cell::from(p.id.to_string()),
                Cell::from(truncate(&sanitize(p.thumbnail()), 28)),
                Cell::from(sanitize(&p.title)),
                Cell::from(price_text(p.price)),
                Cell::from(sanitize(&p.category.name)),
            ])
        })
        .collect();

    let title = if state.is_loading {
        String::from(" Products [loading...] ")
    } else {
        format!(
            " Products - {} of {} match ",
            state.total_matches, state.total_products
        )
    };

    let table = Table::new(
        rows,
        [
            Constraint::Length(6),
            Constraint::Length(30),
            Constraint::Min(20),
            Constraint::Length(12),
            Constraint::Length(16),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(if state.input_mode == InputMode::Table {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default()
            })
            .title(title)
            .title_bottom(Line::from(format!(" {} ", state.api_base)).right_aligned()),
    )
    .row_highlight_style(Style::default().fg(Color::Black).bg(Color::Cyan))
    .highlight_symbol("> ");

    let mut table_state = TableState::default();
    if !state.rows.is_empty() {
        table_state.select(Some(state.selected_row));
    }
    f.render_stateful_widget(table, area, &mut table_state);

    if state.rows.is_empty() && !state.is_loading {
        let inner = area.inner(Margin::new(2, 2));
        let hint = if state.catalog_loaded {
            "No products match the search."
        } else {
            "Catalog not loaded. Press 'r' to retry."
        };
        f.render_widget(
            Paragraph::new(hint).style(Style::default().fg(Color::DarkGray)),
            inner,
        );
    }
}

fn draw_description_line(f: &mut Frame, state: &RenderState, area: Rect) {
    let Some(product) = state.rows.get(state.selected_row) else {
        return;
    };
    if product.description.is_empty() {
        return;
    }
    let width = area.width.saturating_sub(2) as usize;
    let text = truncate(&sanitize(&product.description), width);
    f.render_widget(
        Paragraph::new(format!(" {}", text)).style(Style::default().fg(Color::Gray).italic()),
        area,
    );
}

fn draw_status_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let status = if state.is_loading {
        String::from(" Loading catalog... ")
    } else {
        match state.input_mode {
            InputMode::Search => String::from(" type to filter | Enter/Esc: done "),
            InputMode::Form => String::from(
                " Tab/↑↓:field | ←→:category | Enter/Ctrl+S:save | Esc:close ",
            ),
            InputMode::Table => format!(
                " page {}/{} | ←→:page ↑↓:row Enter:edit n:new x:export ?:help q:quit ",
                state.page, state.page_count
            ),
        }
    };

    let bar = Paragraph::new(status).style(Style::default().fg(Color::DarkGray));
    f.render_widget(bar, area);
}

fn draw_form_popup(f: &mut Frame, state: &RenderState, form: &ProductForm, area: Rect) {
    let popup_area = centered_rect(70, 80, area);

    let heading = match form.kind {
        FormKind::Create => String::from(" New product "),
        FormKind::Edit { product_id } => format!(" Product #{} ", product_id),
    };
    let pending = if form.pending > 0 {
        format!(" [saving x{}] ", form.pending)
    } else {
        String::new()
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(heading)
        .title_bottom(Line::from(pending).right_aligned())
        .style(Style::default().bg(Color::Black));
    let inner = block.inner(popup_area);

    f.render_widget(Clear, popup_area);
    f.render_widget(block, popup_area);

    let constraints: Vec<Constraint> = FormField::ALL
        .iter()
        .map(|_| Constraint::Length(3))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    for (i, field) in FormField::ALL.iter().enumerate() {
        let focused = form.active_field == *field;
        let content = match field {
            FormField::Category => {
                let name = form
                    .category_name(&state.categories)
                    .map(sanitize)
                    .unwrap_or_else(|| String::from("<none>"));
                format!("‹ {} ›", name)
            }
            FormField::Title | FormField::Price | FormField::Description | FormField::Images => {
                sanitize(form.text(*field))
            }
        };
        f.render_widget(
            Paragraph::new(content).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(if focused {
                        Style::default().fg(Color::Yellow)
                    } else {
                        Style::default().fg(Color::DarkGray)
                    })
                    .title(format!(" {} ", field.label())),
            ),
            rows[i],
        );

        if focused && *field != FormField::Category && state.notice.is_none() {
            let text = form.text(*field);
            let before = sanitize(&text[..form.cursor.min(text.len())]);
            let max_x = rows[i].x + rows[i].width.saturating_sub(2);
            let cursor_x = (rows[i].x + before.chars().count() as u16 + 1).min(max_x);
            f.set_cursor_position(Position::new(cursor_x, rows[i].y + 1));
        }
    }
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);

    let help_text = format!(
        r#"
 {} v{} - Keyboard Shortcuts

 BROWSING
   ↑ / ↓  (k / j)     Select row
   ← / →  (h / l)     Previous / next page
   1 - 9              Jump to page
   Enter              Open product details

 VIEW
   /                  Search titles
   t                  Sort by title (again to reverse)
   p                  Sort by price (again to reverse)
   z                  Cycle page size

 WORKFLOWS
   n                  New product
   x                  Export visible page as CSV
   r                  Retry loading the catalog

 FORMS
   Tab / Shift+Tab    Next / previous field
   ← / →              Change category
   Enter / Ctrl+S     Save
   Esc                Close without saving

 GENERAL
   ?                  Toggle this help
   q / Ctrl+C         Quit

 Press any key to close...
"#,
        APP_NAME, APP_VERSION
    );

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

fn draw_notice_popup(f: &mut Frame, state: &RenderState, area: Rect) {
    let Some(notice) = &state.notice else {
        return;
    };
    let popup_area = centered_rect(50, 20, area);
    let color = notice_color(notice.kind);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(format!(" {} ", notice.at.format("%H:%M:%S")))
        .title_bottom(Line::from(" any key to dismiss ").right_aligned())
        .style(Style::default().bg(Color::Black));

    let text = Paragraph::new(sanitize(&notice.message))
        .style(Style::default().fg(color))
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(text, popup_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_tui::models::{Category, CategoryRef, Product};
    use ratatui::backend::TestBackend;

    fn hostile_product() -> Product {
        Product {
            id: 7,
            title: String::from("Bag\u{1b}]0;pwned\u{7}"),
            price: 12.0,
            description: String::from("Nice\u{1b}[2J\u{1b}[31mRED"),
            category: CategoryRef { id: 1, name: String::from("Bags\u{1b}[0m") },
            images: vec![String::from("https://x/a.png\u{7}")],
        }
    }

    fn control_cells(state: &RenderState) -> usize {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| draw_ui(f, state)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .filter(|cell| cell.symbol().chars().any(char::is_control))
            .count()
    }

    fn state_with(product: Product) -> RenderState {
        RenderState {
            rows: vec![product],
            total_matches: 1,
            total_products: 1,
            is_loading: false,
            catalog_loaded: true,
            ..RenderState::default()
        }
    }

    #[test]
    fn test_table_row_draws_no_control_characters() {
        let state = state_with(hostile_product());
        assert_eq!(control_cells(&state), 0);
    }

    #[test]
    fn test_detail_form_draws_no_control_characters() {
        let product = hostile_product();
        let mut state = state_with(product.clone());
        state.categories = vec![Category { id: 1, name: String::from("Bags\u{1b}[0m") }];
        state.form = Some(ProductForm::for_product(&product));
        state.input_mode = InputMode::Form;
        assert_eq!(control_cells(&state), 0);

        let form = state.form.as_mut().unwrap();
        form.next_field();
        form.next_field();
        assert_eq!(form.active_field, FormField::Description);
        assert_eq!(control_cells(&state), 0);
    }

    #[test]
    fn test_selected_description_is_shown() {
        let product = Product {
            description: String::from("Soft leather tote"),
            ..hostile_product()
        };
        let state = state_with(product);
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| draw_ui(f, &state)).unwrap();
        let screen: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(screen.contains("Soft leather tote"));
    }
}
