//! # Tabs Host Example
//!
//! Drives a tablist through the headless [`Host`]:
//! - Mapping toolkit input (`UiEvent`) to component messages
//! - Reading focus effects off the effect channel
//! - Printing the final accessibility tree
//!
//! Run with: `RUST_LOG=debug cargo run --example tabs_host`

use taro::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use taro::widgets::tabs::{self, Activation, Tabs};
use taro::{init_logging, Effect, Host, LogConfig, UiEvent};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(&LogConfig::default())?;

    let titles = ["General", "Privacy", "Advanced"].map(String::from).to_vec();
    let tabs = Tabs::with_id("settings", titles)
        .with_label("Settings")
        .with_activation(Activation::Manual)
        .with_disabled(1);

    let (host, mut effects) = Host::new(tabs, |event| match event {
        UiEvent::Key(key) => Some(tabs::Message::KeyPress(key)),
        _ => None,
    });
    let handle = host.handle();
    let task = tokio::spawn(host.run());

    let focus_log = tokio::spawn(async move {
        while let Some(effect) = effects.recv().await {
            if let Effect::Focus(id) = effect {
                println!("focus -> {id}");
            }
        }
    });

    // Privacy is disabled, so Right lands on Advanced.
    for code in [KeyCode::Right, KeyCode::Enter, KeyCode::Home] {
        handle.dispatch(UiEvent::Key(KeyEvent::new(code, KeyModifiers::NONE)));
    }

    drop(handle);
    let tabs = task.await??;
    focus_log.await?;
    println!("selected tab: {}", tabs.selected());
    println!("{}", taro::Component::semantics(&tabs));
    Ok(())
}
