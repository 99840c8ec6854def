//! Slider: pick a number from a range with the keyboard or by dragging.
//!
//! The value math lives in free functions ([`value_to_percent`],
//! [`percent_to_value`], [`snap_to_step`], [`position_to_value`]) so hosts
//! that draw their own track can reuse it. Pointer input is mapped onto the
//! track rectangle the host reports with [`Message::SetTrack`].

use crate::key::{Binding, KeyCombination, KeyMap};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Position, Rect};
use taro_core::{
    AccessNode, Attr, Command, Component, ElementId, Error, Orientation, PointerEvent, PointerKind,
    Role, TabIndex,
};

/// Where `value` sits in `min..=max`, as a percentage clamped to 0..=100.
pub fn value_to_percent(value: f64, min: f64, max: f64) -> f64 {
    if max <= min {
        return 0.0;
    }
    ((value - min) / (max - min) * 100.0).clamp(0.0, 100.0)
}

/// The value at `percent` (clamped to 0..=100) of `min..=max`.
pub fn percent_to_value(percent: f64, min: f64, max: f64) -> f64 {
    min + (max - min) * percent.clamp(0.0, 100.0) / 100.0
}

fn decimal_places(step: f64) -> i32 {
    let text = step.to_string();
    text.split_once('.').map_or(0, |(_, frac)| frac.len() as i32)
}

/// Round `value` to the nearest multiple of `step` counted from `min`,
/// clamp it to the range, and drop floating-point noise beyond the step's
/// own precision (so `0.1 + 0.2` snaps to `0.3`).
///
/// `min` and `max` are always valid values, even when the range is not a
/// whole number of steps: with `0..=10` in steps of 3, `9.8` snaps to `10`.
pub fn snap_to_step(value: f64, min: f64, max: f64, step: f64) -> f64 {
    if value >= max {
        return max;
    }
    if value <= min {
        return min;
    }
    let snapped = if step > 0.0 {
        ((value - min) / step).round() * step + min
    } else {
        value
    };
    let factor = 10f64.powi(decimal_places(step).max(decimal_places(min)));
    let snapped = ((snapped * factor).round() / factor).clamp(min, max);
    if max - value < (value - snapped).abs() {
        max
    } else {
        snapped
    }
}

/// Map a pointer position on `track` to a snapped value. Horizontal tracks
/// run left (min) to right (max); vertical tracks bottom (min) to top (max).
/// Positions outside the track clamp to its ends.
pub fn position_to_value(
    position: Position,
    track: Rect,
    orientation: Orientation,
    min: f64,
    max: f64,
    step: f64,
) -> f64 {
    let (offset, extent) = match orientation {
        Orientation::Horizontal => (
            f64::from(position.x) - f64::from(track.x),
            f64::from(track.width.saturating_sub(1)),
        ),
        Orientation::Vertical => (
            f64::from(track.bottom().saturating_sub(1)) - f64::from(position.y),
            f64::from(track.height.saturating_sub(1)),
        ),
    };
    let percent = if extent > 0.0 {
        offset / extent * 100.0
    } else {
        0.0
    };
    snap_to_step(percent_to_value(percent, min, max), min, max, step)
}

/// The cell on `track` where the thumb for `value` is drawn.
pub fn value_to_position(
    value: f64,
    track: Rect,
    orientation: Orientation,
    min: f64,
    max: f64,
) -> Position {
    let fraction = value_to_percent(value, min, max) / 100.0;
    match orientation {
        Orientation::Horizontal => {
            let dx = (fraction * f64::from(track.width.saturating_sub(1))).round() as u16;
            Position::new(track.x + dx, track.y)
        }
        Orientation::Vertical => {
            let dy = (fraction * f64::from(track.height.saturating_sub(1))).round() as u16;
            Position::new(track.x, track.bottom().saturating_sub(1) - dy)
        }
    }
}

/// Keys that move the slider. Override fields to remap.
pub struct SliderKeyBindings {
    /// One step up. Default: Right, Up
    pub increment: Binding,
    /// One step down. Default: Left, Down
    pub decrement: Binding,
    /// Default: PageUp
    pub page_up: Binding,
    /// Default: PageDown
    pub page_down: Binding,
    /// Jump to the minimum. Default: Home
    pub min: Binding,
    /// Jump to the maximum. Default: End
    pub max: Binding,
}

impl Default for SliderKeyBindings {
    fn default() -> Self {
        Self {
            increment: Binding::with_keys(
                vec![KeyCombination::new(KeyCode::Right), KeyCombination::new(KeyCode::Up)],
                "Increase",
            ),
            decrement: Binding::with_keys(
                vec![KeyCombination::new(KeyCode::Left), KeyCombination::new(KeyCode::Down)],
                "Decrease",
            ),
            page_up: Binding::new(KeyCombination::new(KeyCode::PageUp), "Increase by a page"),
            page_down: Binding::new(KeyCombination::new(KeyCode::PageDown), "Decrease by a page"),
            min: Binding::new(KeyCombination::new(KeyCode::Home), "Minimum"),
            max: Binding::new(KeyCombination::new(KeyCode::End), "Maximum"),
        }
    }
}

impl KeyMap for SliderKeyBindings {
    fn short_help(&self) -> Vec<&Binding> {
        vec![&self.increment, &self.decrement]
    }

    fn full_help(&self) -> Vec<Vec<&Binding>> {
        vec![
            vec![&self.increment, &self.decrement],
            vec![&self.page_up, &self.page_down, &self.min, &self.max],
        ]
    }
}

/// Messages for the slider component.
#[derive(Debug, Clone)]
pub enum Message {
    KeyPress(KeyEvent),
    /// Parent-driven value; out-of-range values are clamped. Does not emit
    /// [`Message::Changed`].
    SetValue(f64),
    SetDisabled(bool),
    /// The track's rectangle in host coordinates, for pointer mapping.
    SetTrack(Rect),
    Pointer(PointerEvent),
    /// Emitted when user input changed the value.
    Changed(f64),
    /// Emitted when a drag ends.
    Committed(f64),
}

type ValueText = Box<dyn Fn(f64) -> String + Send>;

pub struct Slider {
    id: ElementId,
    label: Option<String>,
    min: f64,
    max: f64,
    step: f64,
    page_step: Option<f64>,
    value: f64,
    orientation: Orientation,
    disabled: bool,
    value_text: Option<ValueText>,
    track: Option<Rect>,
    dragging: bool,
    keys: SliderKeyBindings,
}

impl Default for Slider {
    /// 0 to 100 in steps of 1.
    fn default() -> Self {
        Self {
            id: ElementId::unique("slider"),
            label: None,
            min: 0.0,
            max: 100.0,
            step: 1.0,
            page_step: None,
            value: 0.0,
            orientation: Orientation::Horizontal,
            disabled: false,
            value_text: None,
            track: None,
            dragging: false,
            keys: SliderKeyBindings::default(),
        }
    }
}

impl Slider {
    /// A slider over `min..=max` moving by `step`, starting at `min`.
    pub fn try_new(min: f64, max: f64, step: f64) -> Result<Self, Error> {
        if !min.is_finite() || !max.is_finite() || min >= max {
            return Err(Error::InvalidRange { min, max });
        }
        if !step.is_finite() || step <= 0.0 {
            return Err(Error::InvalidStep(step));
        }
        Ok(Self {
            min,
            max,
            step,
            value: min,
            ..Self::default()
        })
    }

    pub fn with_id(mut self, id: impl Into<ElementId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_value(mut self, value: f64) -> Self {
        self.value = self.snap(value);
        self
    }

    /// PageUp/PageDown increment. Defaults to a tenth of the range, but
    /// never less than one step.
    pub fn with_page_step(mut self, page_step: f64) -> Self {
        self.page_step = Some(page_step);
        self
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Human-readable value for `aria-valuetext`, e.g. `"20 °C"`.
    pub fn with_value_text(mut self, format: impl Fn(f64) -> String + Send + 'static) -> Self {
        self.value_text = Some(Box::new(format));
        self
    }

    pub fn with_key_bindings(mut self, keys: SliderKeyBindings) -> Self {
        self.keys = keys;
        self
    }

    pub fn key_bindings(&self) -> &SliderKeyBindings {
        &self.keys
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn percent(&self) -> f64 {
        value_to_percent(self.value, self.min, self.max)
    }

    pub fn page_step(&self) -> f64 {
        self.page_step
            .unwrap_or_else(|| self.step.max((self.max - self.min) / 10.0))
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn thumb_id(&self) -> ElementId {
        self.id.child("thumb")
    }

    /// Where to draw the thumb, once the track is known.
    pub fn thumb_position(&self) -> Option<Position> {
        self.track
            .map(|track| value_to_position(self.value, track, self.orientation, self.min, self.max))
    }

    fn snap(&self, value: f64) -> f64 {
        snap_to_step(value, self.min, self.max, self.step)
    }

    /// How many steps above `min` the value sits, without float noise.
    fn steps_from_min(&self) -> f64 {
        (((self.value - self.min) / self.step) * 1e9).round() / 1e9
    }

    /// The next on-step value above the current one. From an off-step
    /// value (a `max` that is not a whole number of steps) this is the
    /// nearest step above it.
    fn step_above(&self) -> f64 {
        self.min + (self.steps_from_min().floor() + 1.0) * self.step
    }

    /// The next on-step value below the current one.
    fn step_below(&self) -> f64 {
        self.min + (self.steps_from_min().ceil() - 1.0) * self.step
    }

    fn set(&mut self, value: f64) -> Command<Message> {
        let value = self.snap(value);
        if value == self.value {
            return Command::none();
        }
        self.value = value;
        Command::message(Message::Changed(value))
    }

    fn handle_key(&mut self, key: KeyEvent) -> Command<Message> {
        let keys = &self.keys;
        let extra = self.page_step() - self.step;
        let target = if keys.increment.matches(&key) {
            self.step_above()
        } else if keys.decrement.matches(&key) {
            self.step_below()
        } else if keys.page_up.matches(&key) {
            self.step_above() + extra
        } else if keys.page_down.matches(&key) {
            self.step_below() - extra
        } else if keys.min.matches(&key) {
            self.min
        } else if keys.max.matches(&key) {
            self.max
        } else {
            return Command::none();
        };
        self.set(target)
    }

    fn handle_pointer(&mut self, event: PointerEvent) -> Command<Message> {
        let Some(track) = self.track else {
            tracing::warn!(id = %self.id, "pointer input before the track was set");
            return Command::none();
        };
        let at = |s: &Self| {
            position_to_value(event.position, track, s.orientation, s.min, s.max, s.step)
        };
        match event.kind {
            PointerKind::Down if track.contains(event.position) => {
                self.dragging = true;
                let value = at(self);
                Command::batch([Command::focus(self.thumb_id()), self.set(value)])
            }
            PointerKind::Drag | PointerKind::Move if self.dragging => {
                let value = at(self);
                self.set(value)
            }
            PointerKind::Up if self.dragging => {
                self.dragging = false;
                Command::message(Message::Committed(self.value))
            }
            _ => Command::none(),
        }
    }
}

impl Component for Slider {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        match msg {
            Message::KeyPress(_) | Message::Pointer(_) if self.disabled => Command::none(),
            Message::KeyPress(key) => self.handle_key(key),
            Message::Pointer(event) => self.handle_pointer(event),
            Message::SetValue(value) => {
                if !value.is_finite() {
                    tracing::warn!(id = %self.id, value, "ignoring non-finite slider value");
                } else {
                    if value < self.min || value > self.max {
                        tracing::warn!(
                            id = %self.id,
                            value,
                            min = self.min,
                            max = self.max,
                            "clamping slider value"
                        );
                    }
                    self.value = self.snap(value);
                }
                Command::none()
            }
            Message::SetDisabled(disabled) => {
                self.disabled = disabled;
                self.dragging = false;
                Command::none()
            }
            Message::SetTrack(track) => {
                self.track = Some(track);
                Command::none()
            }
            Message::Changed(_) | Message::Committed(_) => Command::none(),
        }
    }

    fn semantics(&self) -> AccessNode {
        let thumb = AccessNode::new(self.thumb_id())
            .role(Role::Slider)
            .tab_index(if self.disabled {
                TabIndex::Programmatic
            } else {
                TabIndex::Tabbable
            })
            .attr(Attr::ValueNow, self.value)
            .attr(Attr::ValueMin, self.min)
            .attr(Attr::ValueMax, self.max)
            .attr_opt(Attr::ValueText, self.value_text.as_ref().map(|f| f(self.value)))
            .attr(Attr::Orientation, self.orientation)
            .attr_opt(Attr::Label, self.label.clone())
            .attr_if(self.disabled, Attr::Disabled, true);
        AccessNode::new(self.id.clone()).child(thumb)
    }

    fn focused(&self) -> bool {
        self.dragging
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taro_core::testing::Harness;

    fn harness(slider: Slider) -> Harness<Slider> {
        Harness::new(slider).with_keys(Message::KeyPress)
    }

    #[test]
    fn percent_math() {
        assert_eq!(value_to_percent(25.0, 0.0, 100.0), 25.0);
        assert_eq!(value_to_percent(-5.0, 0.0, 100.0), 0.0);
        assert_eq!(value_to_percent(15.0, 10.0, 20.0), 50.0);
        assert_eq!(percent_to_value(50.0, 10.0, 20.0), 15.0);
        assert_eq!(percent_to_value(150.0, 0.0, 10.0), 10.0);
    }

    #[test]
    fn snapping() {
        assert_eq!(snap_to_step(7.4, 0.0, 100.0, 5.0), 5.0);
        assert_eq!(snap_to_step(7.5, 0.0, 100.0, 5.0), 10.0);
        assert_eq!(snap_to_step(0.1 + 0.2, 0.0, 1.0, 0.1), 0.3);
        assert_eq!(snap_to_step(4.0, 1.0, 10.0, 2.0), 5.0);
        assert_eq!(snap_to_step(120.0, 0.0, 100.0, 1.0), 100.0);
        assert_eq!(snap_to_step(0.26, 0.0, 1.0, 0.25), 0.25);
        assert_eq!(snap_to_step(9.4, 0.0, 10.0, 3.0), 9.0);
        assert_eq!(snap_to_step(9.8, 0.0, 10.0, 3.0), 10.0);
        assert_eq!(snap_to_step(11.0, 0.0, 10.0, 3.0), 10.0);
    }

    #[test]
    fn horizontal_position_mapping() {
        let track = Rect::new(10, 0, 11, 1);
        let h = Orientation::Horizontal;
        assert_eq!(position_to_value(Position::new(10, 0), track, h, 0.0, 100.0, 1.0), 0.0);
        assert_eq!(position_to_value(Position::new(15, 0), track, h, 0.0, 100.0, 1.0), 50.0);
        assert_eq!(position_to_value(Position::new(20, 0), track, h, 0.0, 100.0, 1.0), 100.0);
        assert_eq!(position_to_value(Position::new(40, 0), track, h, 0.0, 100.0, 1.0), 100.0);
        assert_eq!(position_to_value(Position::new(0, 0), track, h, 0.0, 100.0, 1.0), 0.0);
    }

    #[test]
    fn vertical_position_mapping_is_inverted() {
        let track = Rect::new(0, 0, 1, 5);
        let v = Orientation::Vertical;
        assert_eq!(position_to_value(Position::new(0, 4), track, v, 0.0, 8.0, 1.0), 0.0);
        assert_eq!(position_to_value(Position::new(0, 0), track, v, 0.0, 8.0, 1.0), 8.0);
        assert_eq!(position_to_value(Position::new(0, 2), track, v, 0.0, 8.0, 1.0), 4.0);
        assert_eq!(value_to_position(8.0, track, v, 0.0, 8.0), Position::new(0, 0));
        assert_eq!(value_to_position(0.0, track, v, 0.0, 8.0), Position::new(0, 4));
    }

    #[test]
    fn try_new_validates() {
        assert!(matches!(Slider::try_new(5.0, 5.0, 1.0), Err(Error::InvalidRange { .. })));
        assert!(matches!(Slider::try_new(0.0, f64::NAN, 1.0), Err(Error::InvalidRange { .. })));
        assert!(matches!(Slider::try_new(0.0, 1.0, 0.0), Err(Error::InvalidStep(_))));
        assert!(matches!(Slider::try_new(0.0, 1.0, -1.0), Err(Error::InvalidStep(_))));
        assert_eq!(Slider::try_new(-10.0, 10.0, 0.5).unwrap().value(), -10.0);
    }

    #[test]
    fn default_page_step() {
        assert_eq!(Slider::default().page_step(), 10.0);
        assert_eq!(Slider::try_new(0.0, 1.0, 0.3).unwrap().page_step(), 0.3);
        assert_eq!(Slider::default().with_page_step(25.0).page_step(), 25.0);
    }

    #[test]
    fn keyboard_steps() {
        let mut h = harness(Slider::default().with_value(50.0));
        h.press(KeyCode::Right);
        assert_eq!(h.component().value(), 51.0);
        h.press(KeyCode::Down);
        h.press(KeyCode::Down);
        assert_eq!(h.component().value(), 49.0);
        h.press(KeyCode::PageUp);
        assert_eq!(h.component().value(), 59.0);
        h.press(KeyCode::PageDown);
        assert_eq!(h.component().value(), 49.0);
        h.press(KeyCode::End);
        assert_eq!(h.component().value(), 100.0);
        h.press(KeyCode::Home);
        assert_eq!(h.component().value(), 0.0);
        assert!(h.saw("Changed(0.0)"));
    }

    #[test]
    fn remapped_keys() {
        let mut keys = SliderKeyBindings::default();
        keys.increment = Binding::new(KeyCombination::new(KeyCode::Char('l')), "Increase");
        let mut h = harness(Slider::default().with_key_bindings(keys));
        h.press(KeyCode::Right);
        assert_eq!(h.component().value(), 0.0);
        h.press(KeyCode::Char('l'));
        assert_eq!(h.component().value(), 1.0);
        let help = h.component().key_bindings().short_help();
        assert_eq!(help[1].aria_key_shortcuts(), "ArrowLeft ArrowDown");
    }

    #[test]
    fn range_not_divisible_by_step_reaches_both_ends() {
        let mut h = harness(Slider::try_new(0.0, 10.0, 3.0).unwrap());
        h.press(KeyCode::End);
        assert_eq!(h.component().value(), 10.0);
        h.press(KeyCode::Right);
        assert_eq!(h.component().value(), 10.0);
        h.press(KeyCode::Left);
        assert_eq!(h.component().value(), 9.0);
        h.press(KeyCode::Right);
        assert_eq!(h.component().value(), 10.0);
        h.press(KeyCode::PageDown);
        assert_eq!(h.component().value(), 9.0);
        h.press(KeyCode::Left);
        h.press(KeyCode::Left);
        h.press(KeyCode::Left);
        assert_eq!(h.component().value(), 0.0);
        h.press(KeyCode::Left);
        assert_eq!(h.component().value(), 0.0);

        h.send(Message::SetTrack(Rect::new(0, 0, 11, 1)));
        h.send(Message::Pointer(PointerEvent::new(PointerKind::Down, 10, 0)));
        assert_eq!(h.component().value(), 10.0);
    }

    #[test]
    fn no_change_no_message() {
        let mut h = harness(Slider::default().with_value(100.0));
        h.press(KeyCode::Up);
        assert_eq!(h.component().value(), 100.0);
        assert!(!h.saw("Changed"));
    }

    #[test]
    fn disabled_ignores_input() {
        let mut h = harness(Slider::default().with_disabled(true));
        h.press(KeyCode::Right);
        assert_eq!(h.component().value(), 0.0);
        let tree = h.semantics();
        let thumb = tree.find_role(Role::Slider)[0];
        assert_eq!(thumb.attr_string(Attr::Disabled).as_deref(), Some("true"));
        assert_eq!(thumb.tab_index, TabIndex::Programmatic);
    }

    #[test]
    fn set_value_clamps_and_snaps_silently() {
        let mut h = harness(Slider::try_new(0.0, 10.0, 0.5).unwrap());
        h.send(Message::SetValue(42.0));
        assert_eq!(h.component().value(), 10.0);
        h.send(Message::SetValue(3.3));
        assert_eq!(h.component().value(), 3.5);
        h.send(Message::SetValue(f64::NAN));
        assert_eq!(h.component().value(), 3.5);
        assert!(!h.saw("Changed"));
    }

    #[test]
    fn drag_updates_and_commits() {
        let mut h = harness(Slider::default().with_id("vol"));
        h.send(Message::SetTrack(Rect::new(0, 0, 101, 1)));
        h.send(Message::Pointer(PointerEvent::new(PointerKind::Down, 30, 0)));
        assert!(h.component().is_dragging());
        assert_eq!(h.component().value(), 30.0);
        assert_eq!(h.focused_id().unwrap().as_str(), "vol-thumb");
        h.send(Message::Pointer(PointerEvent::new(PointerKind::Drag, 75, 3)));
        assert_eq!(h.component().value(), 75.0);
        h.send(Message::Pointer(PointerEvent::new(PointerKind::Drag, 200, 0)));
        assert_eq!(h.component().value(), 100.0);
        h.send(Message::Pointer(PointerEvent::new(PointerKind::Up, 200, 0)));
        assert!(!h.component().is_dragging());
        assert!(h.saw("Committed(100.0)"));
        assert_eq!(h.component().thumb_position(), Some(Position::new(100, 0)));
    }

    #[test]
    fn press_outside_track_is_ignored() {
        let mut h = harness(Slider::default());
        h.send(Message::Pointer(PointerEvent::new(PointerKind::Down, 5, 0)));
        assert!(!h.component().is_dragging());
        h.send(Message::SetTrack(Rect::new(10, 10, 20, 1)));
        h.send(Message::Pointer(PointerEvent::new(PointerKind::Down, 5, 0)));
        h.send(Message::Pointer(PointerEvent::new(PointerKind::Drag, 15, 10)));
        assert!(!h.component().is_dragging());
        assert_eq!(h.component().value(), 0.0);
        h.send(Message::Pointer(PointerEvent::new(PointerKind::Up, 15, 10)));
        assert!(!h.saw("Committed"));
    }

    #[test]
    fn semantics() {
        let h = harness(
            Slider::try_new(10.0, 30.0, 1.0)
                .unwrap()
                .with_id("temp")
                .with_label("Temperature")
                .with_value(20.0)
                .with_orientation(Orientation::Vertical)
                .with_value_text(|v| format!("{v} °C")),
        );
        let tree = h.semantics();
        let thumb = tree.find("temp-thumb").unwrap();
        assert_eq!(thumb.role, Some(Role::Slider));
        assert_eq!(thumb.attr_string(Attr::ValueNow).as_deref(), Some("20"));
        assert_eq!(thumb.attr_string(Attr::ValueMin).as_deref(), Some("10"));
        assert_eq!(thumb.attr_string(Attr::ValueMax).as_deref(), Some("30"));
        assert_eq!(thumb.attr_string(Attr::ValueText).as_deref(), Some("20 °C"));
        assert_eq!(thumb.attr_string(Attr::Orientation).as_deref(), Some("vertical"));
        assert_eq!(thumb.attr_string(Attr::Label).as_deref(), Some("Temperature"));
        assert_eq!(thumb.tab_index, TabIndex::Tabbable);
    }
}
