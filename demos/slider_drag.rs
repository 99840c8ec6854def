//! # Slider Drag Example
//!
//! Feeds pointer events to a slider the way a toolkit integration would:
//! - Reporting the track rectangle after layout
//! - Press, drag and release on the track
//! - Formatting `aria-valuetext`
//!
//! Run with: `cargo run --example slider_drag`

use taro::ratatui::layout::Rect;
use taro::widgets::slider::{self, Slider};
use taro::{init_logging, Component, Host, LogConfig, PointerEvent, PointerKind, UiEvent};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(&LogConfig::default())?;

    let volume = Slider::try_new(0.0, 10.0, 0.5)?
        .with_id("volume")
        .with_label("Volume")
        .with_value(5.0)
        .with_value_text(|v| format!("{v} of 10"));

    let (host, _effects) = Host::new(volume, |event| match event {
        UiEvent::Key(key) => Some(slider::Message::KeyPress(key)),
        UiEvent::Pointer(pointer) => Some(slider::Message::Pointer(pointer)),
        _ => None,
    });
    let handle = host.handle();
    let task = tokio::spawn(host.run());

    handle.send(slider::Message::SetTrack(Rect::new(4, 2, 21, 1)));
    for (kind, x) in [
        (PointerKind::Down, 6),
        (PointerKind::Drag, 14),
        (PointerKind::Drag, 19),
        (PointerKind::Up, 19),
    ] {
        handle.dispatch(UiEvent::Pointer(PointerEvent::new(kind, x, 2)));
    }

    drop(handle);
    let volume = task.await??;
    println!("volume: {} ({:.0}%)", volume.value(), volume.percent());
    println!("{}", volume.semantics());
    Ok(())
}
