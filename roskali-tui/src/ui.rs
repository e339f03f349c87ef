use chrono::{DateTime, Utc};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, List, ListItem, ListState, Paragraph, Row, Table, Wrap},
};
use roskali_core::model::{FillStatus, WasteCategory};
use roskali_core::route::{haversine_km, route_distance_km};

use crate::app::{App, Screen};

pub(crate) fn draw(frame: &mut Frame<'_>, app: &App) {
    let area = frame.area();

    // Outer layout: title, main content, status line
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [header_area, content_area, status_area] = chunks else {
        return;
    };

    // Title / header
    let header = Paragraph::new("roskali – smart waste fleet dashboard")
        .block(Block::default().borders(Borders::ALL).title("Roskali"));
    frame.render_widget(header, *header_area);

    // Main screen
    match app.screen {
        Screen::SourceSelect => draw_source_select(frame, app, *content_area),
        Screen::BinMonitor => draw_bin_monitor(frame, app, *content_area),
        Screen::Classify => draw_classify(frame, app, *content_area),
        Screen::RouteView => draw_route_view(frame, app, *content_area),
    }

    // Status bar
    let nav_hint = match app.screen {
        Screen::SourceSelect => "↑/↓ move · Enter/Space select source · q/Ctrl-C quit",
        Screen::BinMonitor => {
            "f filter · r refresh · c classify · Tab/→/o route · Left/Esc back · q/Ctrl-C quit"
        }
        Screen::Classify => "Type a path · Enter classify · Left/Esc back · Ctrl-C quit",
        Screen::RouteView => "+/- threshold · r recompute · Esc/←/b back · q/Ctrl-C quit",
    };

    let status_text = if app.is_loading {
        format!("Loading… · {nav_hint}")
    } else if let Some(msg) = &app.error_message {
        format!("{msg} · {nav_hint}")
    } else {
        nav_hint.to_owned()
    };

    let status_style = if app.error_message.is_some() {
        Style::default().fg(Color::Red)
    } else if app.is_loading {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let status = Paragraph::new(status_text.to_owned())
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(status_style)
        .wrap(Wrap { trim: true });

    frame.render_widget(status, *status_area);
}

fn draw_source_select(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let items = app
        .sources
        .iter()
        .enumerate()
        .map(|(idx, (_id, name))| {
            let prefix = if idx == app.source_list_index {
                "> "
            } else {
                "  "
            };
            ListItem::new(format!("{prefix}{name}"))
        })
        .collect::<Vec<ListItem<'_>>>();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Select bin source (↑/↓, Enter)"),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    let mut state = ListState::default();
    if !app.sources.is_empty() {
        state.select(Some(app.source_list_index));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_bin_monitor(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let age = app
        .snapshot
        .as_ref()
        .map_or_else(|| "no snapshot".to_owned(), |snapshot| {
            relative_age_label(snapshot.taken_at, Utc::now())
        });

    let title = format!(
        "Bins – filter: {} – snapshot {age} (f to cycle, r to refresh)",
        app.status_filter.label()
    );

    if app.is_loading && app.snapshot.is_none() {
        let paragraph = Paragraph::new("Loading snapshot…")
            .block(Block::default().borders(Borders::ALL).title(title))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
        return;
    }

    let bins = app.filtered_bins();

    if bins.is_empty() {
        let paragraph = Paragraph::new("No bins match the current filter.")
            .block(Block::default().borders(Borders::ALL).title(title))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
        return;
    }

    let rows = bins.into_iter().map(|bin| {
        let status = bin.status();
        Row::new(vec![
            Cell::from(bin.id.to_string()),
            Cell::from(format!("{:.4}", bin.latitude)),
            Cell::from(format!("{:.4}", bin.longitude)),
            Cell::from(format!("{:.1}%", bin.fill_level)),
            Cell::from(status.to_string()),
        ])
        .style(Style::default().fg(status_color(status)))
    });

    let column_widths = [
        Constraint::Length(12),
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Length(8),
        Constraint::Min(8),
    ];

    let table = Table::new(rows, column_widths)
        .header(
            Row::new(vec!["Bin", "Lat", "Lon", "Fill", "Status"])
                .style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .block(Block::default().borders(Borders::ALL).title(title))
        .column_spacing(1);

    frame.render_widget(table, area);
}

fn draw_classify(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // input
            Constraint::Min(0),    // result
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [input_area, result_area] = chunks else {
        return;
    };

    let input = Paragraph::new(app.image_path_input.as_str())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Waste image path (Enter to classify)"),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(input, *input_area);

    let result = match &app.classification {
        Some(classification) => Paragraph::new(format!(
            "Prediction: {}\nConfidence: {:.2}%",
            classification.category, classification.confidence
        ))
        .style(Style::default().fg(category_color(&classification.category))),
        None => Paragraph::new("No classification yet. Point at an image file and press Enter."),
    };

    frame.render_widget(
        result
            .block(Block::default().borders(Borders::ALL).title("Result"))
            .wrap(Wrap { trim: true }),
        *result_area,
    );
}

fn draw_route_view(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let title = format!(
        "Pickup route – threshold {:.0}% (+/- to adjust, r to recompute)",
        app.threshold
    );

    if app.is_loading {
        let paragraph = Paragraph::new("Computing route…")
            .block(Block::default().borders(Borders::ALL).title(title))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
        return;
    }

    let Some(route) = &app.route else {
        let paragraph = Paragraph::new("No route computed yet.")
            .block(Block::default().borders(Borders::ALL).title(title))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
        return;
    };

    if route.is_empty() {
        let text = format!(
            "All bins are under control. No bins above {:.0}% detected.",
            app.threshold
        );
        let paragraph = Paragraph::new(text)
            .block(Block::default().borders(Borders::ALL).title(title))
            .style(Style::default().fg(Color::Green))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
        return;
    }

    let bins = app
        .snapshot
        .as_ref()
        .map(|snapshot| snapshot.bins.as_slice())
        .unwrap_or_default();

    let mut items: Vec<ListItem<'_>> = Vec::with_capacity(route.len() + 1);
    let mut previous = None;

    for (position, stop_id) in route.iter().enumerate() {
        let stop = bins.iter().find(|bin| &bin.id == stop_id);

        let line = match stop {
            Some(bin) => {
                let leg = previous
                    .map(|from| haversine_km(from, bin))
                    .map_or_else(String::new, |km: f64| format!(" ({km:.2} km)"));
                previous = Some(bin);
                format!(
                    "{:>2}. {} – {:.1}%{leg}",
                    position + 1,
                    bin.id,
                    bin.fill_level
                )
            }
            None => format!("{:>2}. {stop_id} – not in snapshot", position + 1),
        };

        items.push(ListItem::new(line));
    }

    if let Some(total) = route_distance_km(bins, route) {
        items.push(
            ListItem::new(format!("Total: {total:.2} km over {} stops", route.len()))
                .style(Style::default().add_modifier(Modifier::BOLD)),
        );
    }

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));

    frame.render_widget(list, area);
}

fn status_color(status: FillStatus) -> Color {
    match status {
        FillStatus::Low => Color::Green,
        FillStatus::Medium => Color::Yellow,
        FillStatus::High => Color::Red,
    }
}

fn category_color(category: &WasteCategory) -> Color {
    match category {
        WasteCategory::Residual => Color::Gray,
        WasteCategory::Organic => Color::Green,
        WasteCategory::Paper => Color::Blue,
        WasteCategory::Plastic => Color::Yellow,
        WasteCategory::Glass => Color::Cyan,
        WasteCategory::Metal => Color::LightBlue,
        WasteCategory::Other(_) => Color::Magenta,
    }
}

fn relative_age_label(taken_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - taken_at).num_seconds();
    match seconds {
        sec if sec < 5 => "just now".to_owned(),
        sec if sec < 120 => format!("{sec} s ago"),
        sec => format!("{} min ago", sec / 60),
    }
}
