//! Wizard screen rendering.
//!
//! One frame shows:
//! - header with the bundle name and "Step i of n"
//! - progress gauge (optional)
//! - product list of the current step with selection markers
//! - summary panel with picks and totals (optional)
//! - status line and keybinding footer

use rust_decimal::Decimal;

use crate::pricing::Quote;
use crate::theme::{Colors, Styles};
use crate::ui::{StatusMessage, WizardApp};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

/// Render the full wizard frame
pub fn render_wizard(f: &mut Frame, app: &WizardApp) {
    let display = app.config().display;

    let mut constraints = vec![Constraint::Length(4)];
    if display.show_progress {
        constraints.push(Constraint::Length(3));
    }
    constraints.push(Constraint::Min(8));
    constraints.push(Constraint::Length(1));
    constraints.push(Constraint::Length(3));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(f.area());

    let mut next = 0;
    let mut take = || {
        let area = chunks[next];
        next += 1;
        area
    };

    render_header(f, take(), app);
    if display.show_progress {
        render_progress(f, take(), app.session().progress_percent());
    }

    let body = take();
    if display.show_summary {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(body);
        render_products(f, columns[0], app);
        render_summary(f, columns[1], app);
    } else {
        render_products(f, body, app);
    }

    render_status(f, take(), app.status());
    render_footer(f, take(), app);
}

fn render_header(f: &mut Frame, area: Rect, app: &WizardApp) {
    let session = app.session();
    let bundle = session.bundle();

    let lines = vec![
        Line::from(Span::styled(bundle.name.clone(), Styles::title())),
        Line::from(vec![
            Span::styled(
                format!(
                    "Step {} of {}",
                    session.cursor().index() + 1,
                    bundle.steps.len()
                ),
                Styles::text(),
            ),
            Span::styled(format!("  {}", bundle.discount.describe()), Styles::badge()),
        ]),
    ];
    let header = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(header, area);
}

fn render_progress(f: &mut Frame, area: Rect, percent: u8) {
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(" Progress "))
        .gauge_style(Style::default().fg(Colors::PROGRESS))
        .percent(u16::from(percent));
    f.render_widget(gauge, area);
}

fn render_products(f: &mut Frame, area: Rect, app: &WizardApp) {
    let session = app.session();
    let step = session.current_step();

    let mut title = format!(" {} ", step.title);
    if let Some(badge) = step.kind.badge() {
        title.push_str(&format!("[{}] ", badge));
    }
    if step.max_selections > 1 {
        title.push_str(&format!("(pick up to {}) ", step.max_selections));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Colors::PRIMARY))
        .title(title)
        .title_style(Styles::title());

    if step.products.is_empty() {
        let empty = Paragraph::new("  No products in this step")
            .style(Styles::text_muted())
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = step
        .products
        .iter()
        .map(|product| {
            let picked = session.is_selected(product.id);
            let marker = if picked { "[x] " } else { "[ ] " };
            let style = if picked { Styles::picked() } else { Styles::text() };
            ListItem::new(format!(
                "{}{:<28} {:>10}",
                marker,
                product.name,
                money(product.price)
            ))
            .style(style)
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Styles::highlight());

    let mut list_state = ListState::default();
    list_state.select(Some(app.highlighted()));
    f.render_stateful_widget(list, area, &mut list_state);
}

fn render_summary(f: &mut Frame, area: Rect, app: &WizardApp) {
    let session = app.session();
    let quote = session.quote(&app.config().pricing);

    let mut lines = Vec::new();
    let summary = session.summary();
    if summary.is_empty() {
        lines.push(Line::from(Span::styled(
            "Nothing selected yet",
            Styles::text_muted(),
        )));
    }
    for (step, picks) in summary {
        lines.push(Line::from(Span::styled(step.title.clone(), Styles::key_hint())));
        for product in picks {
            lines.push(Line::from(vec![
                Span::raw(format!("  {}", product.name)),
                Span::styled(format!("  {}", money(product.price)), Styles::text_muted()),
            ]));
        }
    }
    lines.push(Line::from(""));
    lines.extend(total_lines(&quote, app.config().display.show_savings));

    let panel = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Your Bundle ({} items) ", quote.item_count))
                .title_style(Style::default().fg(Colors::SECONDARY)),
        );
    f.render_widget(panel, area);
}

fn total_lines(quote: &Quote, show_savings: bool) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(format!("Subtotal:  {}", money(quote.subtotal))),
        Line::from(Span::styled(
            format!("Discount: -{}", money(quote.discount)),
            Styles::picked(),
        )),
    ];

    let total_style = if quote.is_negative() {
        Styles::error()
    } else {
        Styles::title()
    };
    lines.push(Line::from(Span::styled(
        format!("Total:     {}", money(quote.final_price)),
        total_style,
    )));

    if show_savings && quote.savings() > Decimal::ZERO {
        lines.push(Line::from(Span::styled(
            format!("You save {}", money(quote.savings())),
            Styles::picked(),
        )));
    }
    lines
}

fn render_status(f: &mut Frame, area: Rect, status: Option<&StatusMessage>) {
    let line = match status {
        Some(StatusMessage::Info(msg)) => Line::from(Span::styled(format!(" {}", msg), Styles::text())),
        Some(StatusMessage::Warning(msg)) => {
            Line::from(Span::styled(format!(" {}", msg), Styles::warning()))
        }
        None => Line::from(""),
    };
    f.render_widget(Paragraph::new(line), area);
}

fn render_footer(f: &mut Frame, area: Rect, app: &WizardApp) {
    let session = app.session();
    let mut spans = Vec::new();
    for item in app.keybindings().get_nav_items() {
        let enabled = match item.action_label.as_str() {
            "Next" => session.can_advance(),
            "Previous" => session.can_retreat(),
            "Add to cart" => session.is_ready_for_checkout(),
            _ => true,
        };
        let key_style = if enabled {
            Styles::key_hint()
        } else {
            Styles::text_muted()
        };
        spans.push(Span::styled(format!(" [{}] ", item.key_display), key_style));
        spans.push(Span::styled(
            format!("{}  ", item.action_label),
            Style::default().fg(Colors::NAV_HINT),
        ));
    }

    let footer = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::TOP));
    f.render_widget(footer, area);
}

/// Format a price as dollars with two decimals
pub fn money(value: Decimal) -> String {
    if value < Decimal::ZERO {
        format!("-${:.2}", value.abs())
    } else {
        format!("${:.2}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, CatalogProvider};
    use crate::components::keybindings::KeyAction;
    use crate::config::EngineConfig;
    use crate::types::BundleId;
    use crate::wizard::ShoppingSession;
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;

    fn app(config: EngineConfig) -> WizardApp {
        let bundle = Catalog::demo().bundle(BundleId(1)).expect("demo bundle");
        WizardApp::new(
            ShoppingSession::start(Arc::new(bundle)).expect("session"),
            config,
        )
    }

    fn draw(app: &WizardApp) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).expect("terminal");
        terminal
            .draw(|f| render_wizard(f, app))
            .expect("draw");
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_money_format() {
        assert_eq!(money(Decimal::new(5098, 2)), "$50.98");
        assert_eq!(money(Decimal::from(5)), "$5.00");
        assert_eq!(money(Decimal::new(-499, 2)), "-$4.99");
    }

    #[test]
    fn test_render_first_step() {
        let screen = draw(&app(EngineConfig::default()));
        assert!(screen.contains("Summer Essentials Bundle"));
        assert!(screen.contains("Step 1 of 4"));
        assert!(screen.contains("Classic White Tee"));
        assert!(screen.contains("Nothing selected yet"));
    }

    #[test]
    fn test_render_summary_after_pick() {
        let mut app = app(EngineConfig::default());
        app.handle_action(KeyAction::Toggle);
        let screen = draw(&app);
        assert!(screen.contains("[x]"));
        assert!(screen.contains("$19.99"));
        assert!(screen.contains("Your Bundle (1 items)"));
    }

    #[test]
    fn test_render_without_summary_panel() {
        let mut config = EngineConfig::default();
        config.display.show_summary = false;
        config.display.show_progress = false;
        let screen = draw(&app(config));
        assert!(!screen.contains("Your Bundle"));
        assert!(!screen.contains("Progress"));
        assert!(screen.contains("Step 1 of 4"));
    }

    #[test]
    fn test_render_badge_on_optional_step() {
        let mut app = app(EngineConfig::default());
        app.handle_action(KeyAction::Toggle);
        app.handle_action(KeyAction::NextStep);
        app.handle_action(KeyAction::Toggle);
        app.handle_action(KeyAction::NextStep);
        let screen = draw(&app);
        assert!(screen.contains("Step 3 of 4"));
        assert!(screen.contains("[Optional]"));
        assert!(screen.contains("pick up to 2"));
    }
}
