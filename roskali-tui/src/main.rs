//! Terminal dashboard for roskali: monitor bin fill levels, classify waste
//! images, and compute pickup routes for overfull bins.

mod app;
mod input;
mod ui;

use std::{env, fs, io, sync::Arc, time::Duration as StdDuration};

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event as CEvent},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use reqwest::Client;
use roskali_classifier_naive::NaiveClassifier;
use roskali_core::{plugin::SourceRegistry, route::RouteOptions, service::RoskaliService};
use roskali_source_http::FeedConfig;
use roskali_source_sim::SimConfig;

use crate::app::App;
use crate::input::Action;

/// Optional telemetry feed base URL; when unset only the simulated source is
/// registered.
const FEED_URL_VAR: &str = "ROSKALI_FEED_URL";

#[tokio::main]
async fn main() -> Result<()> {
    // HTTP + service setup
    let client = Client::builder().user_agent("roskali/0.1").build()?;

    let mut plugins = vec![roskali_source_sim::plugin(SimConfig::default())];
    if let Ok(base_url) = env::var(FEED_URL_VAR) {
        plugins.push(roskali_source_http::plugin(
            client.clone(),
            FeedConfig {
                id: String::from("feed"),
                name: String::from("Telemetry feed"),
                base_url,
            },
        ));
    }

    let registry = Arc::new(SourceRegistry::new(plugins));
    let service = Arc::new(RoskaliService::new(
        registry,
        Arc::new(NaiveClassifier::new()),
    ));

    // App state
    let app = App::new(service);

    // Terminal init
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run event loop
    let res = run(&mut terminal, app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}

async fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, mut app: App) -> Result<()> {
    loop {
        // Draw current UI
        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Poll for input (non-blocking, small timeout to keep CPU low)
        if event::poll(StdDuration::from_millis(100))?
            && let CEvent::Key(key) = event::read()?
        {
            let action = input::handle_key_event(key, &mut app);

            match action {
                Action::Quit => break,
                Action::None => {}
                Action::LoadSnapshot => {
                    let Some(source) = app.selected_source.clone() else {
                        app.error_message = Some("Select a source first".into());
                        continue;
                    };

                    app.is_loading = true;
                    app.error_message = None;
                    terminal.draw(|frame| ui::draw(frame, &app))?;

                    let res = app.service.snapshot_for(source).await;

                    app.is_loading = false;
                    match res {
                        Ok(snapshot) => {
                            app.snapshot = Some(snapshot);
                            app.route = None;
                        }
                        Err(err) => {
                            app.error_message = Some(format!("Snapshot failed: {err}"));
                        }
                    }
                }
                Action::ComputeRoute => {
                    let Some(source) = app.selected_source.clone() else {
                        app.error_message = Some("Select a source first".into());
                        continue;
                    };

                    app.is_loading = true;
                    app.error_message = None;
                    terminal.draw(|frame| ui::draw(frame, &app))?;

                    let options = RouteOptions {
                        threshold: app.threshold,
                    };
                    let res = app.service.route_for(source, &options).await;

                    app.is_loading = false;
                    match res {
                        Ok((snapshot, route)) => {
                            app.snapshot = Some(snapshot);
                            app.route = Some(route);
                        }
                        Err(err) => {
                            app.route = None;
                            app.error_message = Some(format!("Routing failed: {err}"));
                        }
                    }
                }
                Action::ClassifyImage => {
                    let path = app.image_path_input.trim().to_owned();
                    if path.is_empty() {
                        app.error_message =
                            Some("Type the path of a waste image, then press Enter".into());
                        continue;
                    }

                    app.is_loading = true;
                    app.error_message = None;
                    terminal.draw(|frame| ui::draw(frame, &app))?;

                    let res = match fs::read(&path) {
                        Ok(image) => app.service.classify(&image).await,
                        Err(err) => {
                            app.is_loading = false;
                            app.error_message = Some(format!("Cannot read {path}: {err}"));
                            continue;
                        }
                    };

                    app.is_loading = false;
                    match res {
                        Ok(classification) => {
                            app.classification = Some(classification);
                        }
                        Err(err) => {
                            app.classification = None;
                            app.error_message = Some(format!("Classification failed: {err}"));
                        }
                    }
                }
            }
        }
    }

    Ok(())
}
