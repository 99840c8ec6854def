//! # Menu Button Example
//!
//! Opens a menu with the keyboard, toggles a checkbox item, and picks an
//! action, printing each effect and emitted message along the way.
//!
//! Run with: `RUST_LOG=taro_widgets=debug cargo run --example menu_button`

use taro::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use taro::widgets::menu::{self, MenuButton, MenuItem};
use taro::{init_logging, Host, LogConfig, UiEvent};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(&LogConfig::default())?;

    let items = vec![
        MenuItem::action("New file"),
        MenuItem::action("Open..."),
        MenuItem::separator(),
        MenuItem::checkbox("Word wrap", false),
        MenuItem::action("Quit").disabled(true),
    ];
    let button = MenuButton::with_id("file", "File", items);

    let (host, mut effects) = Host::new(button, |event| match event {
        UiEvent::Key(key) => Some(menu::Message::KeyPress(key)),
        _ => None,
    });
    let handle = host.handle();
    let task = tokio::spawn(host.run());

    let effect_log = tokio::spawn(async move {
        while let Some(effect) = effects.recv().await {
            println!("effect: {effect:?}");
        }
    });

    for code in [
        KeyCode::Down,
        KeyCode::Char('w'),
        KeyCode::Char(' '),
        KeyCode::Home,
        KeyCode::Enter,
    ] {
        handle.dispatch(UiEvent::Key(KeyEvent::new(code, KeyModifiers::NONE)));
    }

    drop(handle);
    let button = task.await??;
    effect_log.await?;
    println!("menu open: {}", button.is_open());
    Ok(())
}
