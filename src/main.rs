mod app;
mod catalog;
mod config;
mod display;
mod ingredients;
mod input;
mod locale;
mod logging;
mod messages;
mod migrate;
mod number;
mod persist;
mod pricing;
mod storage;
mod widgets;

use std::{cell::RefCell, io, rc::Rc};

use app::CalculatorApp;
use input::{pixel_to_cell, ClickState, InputEvent};
use ratzilla::event::{KeyCode, MouseButton, MouseEventKind};
use ratzilla::ratatui::Terminal;
use ratzilla::{DomBackend, WebRenderer};
use tracing::{debug, error};

use catalog::CatalogError;
use config::AppConfig;

/// Convert page pixel coordinates to a terminal cell using the grid
/// container's bounding rect.
fn dom_pixel_to_cell(mouse_x: u32, mouse_y: u32, cs: &ClickState) -> Option<(u16, u16)> {
    let window = web_sys::window()?;
    let document = window.document()?;

    // DomBackend creates a <div> as the grid container inside <body>.
    let grid = document.query_selector("body > div").ok()??;
    let rect = grid.get_bounding_client_rect();

    let col = pixel_to_cell(mouse_x as f64 - rect.left(), rect.width(), cs.terminal_cols)?;
    let row = pixel_to_cell(mouse_y as f64 - rect.top(), rect.height(), cs.terminal_rows)?;
    debug!(mouse_x, mouse_y, col, row, targets = cs.targets.len(), "click");
    Some((col, row))
}

fn key_to_input(code: KeyCode) -> Option<InputEvent> {
    match code {
        KeyCode::Char(c) => Some(InputEvent::Key(c)),
        KeyCode::Enter => Some(InputEvent::Enter),
        KeyCode::Backspace => Some(InputEvent::Backspace),
        KeyCode::Esc => Some(InputEvent::Escape),
        KeyCode::Up => Some(InputEvent::Up),
        KeyCode::Down => Some(InputEvent::Down),
        _ => None,
    }
}

#[cfg(target_arch = "wasm32")]
fn page_config() -> AppConfig {
    AppConfig::from_page()
}

#[cfg(not(target_arch = "wasm32"))]
fn page_config() -> AppConfig {
    AppConfig::default()
}

#[cfg(target_arch = "wasm32")]
fn boot(config: AppConfig) -> Result<CalculatorApp, CatalogError> {
    use config::browser_language;
    use storage::{BrowserCookieJar, BrowserStorage, CookieJar, KeyValueStore, MemoryCookieJar, MemoryStore};
    use tracing::warn;

    let store: Box<dyn KeyValueStore> = match BrowserStorage::open() {
        Some(storage) => Box::new(storage),
        None => {
            warn!("localStorage unavailable; changes will not survive a reload");
            Box::new(MemoryStore::new())
        }
    };
    let mut cookies: Box<dyn CookieJar> = match BrowserCookieJar::open() {
        Some(jar) => Box::new(jar),
        None => Box::new(MemoryCookieJar::default()),
    };
    CalculatorApp::new(config, store, cookies.as_mut(), browser_language().as_deref())
}

#[cfg(not(target_arch = "wasm32"))]
fn boot(config: AppConfig) -> Result<CalculatorApp, CatalogError> {
    use storage::{MemoryCookieJar, MemoryStore};

    CalculatorApp::new(
        config,
        Box::new(MemoryStore::new()),
        &mut MemoryCookieJar::default(),
        None,
    )
}

fn main() -> io::Result<()> {
    console_error_panic_hook::set_once();
    let config = page_config();
    logging::init(config.max_log_level());

    let app = match boot(config) {
        Ok(app) => app,
        Err(e) => {
            error!("failed to start: {e}");
            return Err(io::Error::new(io::ErrorKind::InvalidData, e));
        }
    };

    let app = Rc::new(RefCell::new(app));
    let click_state = Rc::new(RefCell::new(ClickState::new()));
    let backend = DomBackend::new()?;
    let terminal = Terminal::new(backend)?;

    // Mouse/touch click handler
    terminal.on_mouse_event({
        let app = app.clone();
        let click_state = click_state.clone();
        move |mouse_event| {
            if mouse_event.event != MouseEventKind::Pressed || mouse_event.button != MouseButton::Left {
                return;
            }

            let action = {
                let cs = click_state.borrow();
                dom_pixel_to_cell(mouse_event.x, mouse_event.y, &cs)
                    .and_then(|(col, row)| cs.hit_test(col, row))
            };
            if let Some(action_id) = action {
                app.borrow_mut().handle_input(&InputEvent::Click(action_id));
            }
        }
    });

    // Keyboard handler
    terminal.on_key_event({
        let app = app.clone();
        move |key_event| {
            if let Some(event) = key_to_input(key_event.code) {
                app.borrow_mut().handle_input(&event);
            }
        }
    });

    terminal.draw_web({
        let click_state = click_state.clone();
        move |f| {
            let app = app.borrow();
            let size = f.area();
            let mut cs = click_state.borrow_mut();
            cs.reset(size.width, size.height);
            app.render(f, size, &mut cs);
        }
    });

    Ok(())
}
