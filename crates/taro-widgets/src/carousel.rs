//! Carousel: a set of slides shown one at a time, with optional automatic
//! rotation.
//!
//! Rotation pauses while the pointer is over the carousel or keyboard focus
//! is inside it, and stops for good once the user navigates manually or
//! presses the rotation button. The slide picker is a tablist with a roving
//! tabindex; moving through it switches slides immediately.

use crate::focus::{Nav, RovingFocus};
use crossterm::event::KeyEvent;
use std::time::Duration;
use taro_core::{
    subscribe, AccessNode, Attr, Command, Component, ElementId, Every, Orientation, Politeness,
    Role, Subscription, TabIndex,
};

/// Messages for the carousel component.
#[derive(Debug, Clone)]
pub enum Message {
    Next,
    Prev,
    GoTo(usize),
    /// Start rotating (the rotation button in its "start" state).
    Play,
    /// Stop rotating.
    Pause,
    /// The rotation button was pressed.
    ToggleRotation,
    /// Rotation timer fired.
    Tick,
    PointerEnter,
    PointerLeave,
    /// Keyboard focus entered the carousel.
    FocusIn,
    /// Keyboard focus left the carousel.
    FocusOut,
    /// A key press on the slide picker.
    KeyPress(KeyEvent),
    /// Emitted whenever the visible slide changes.
    SlideChanged(usize),
}

pub struct Carousel {
    id: ElementId,
    label: String,
    slides: Vec<String>,
    active: usize,
    picker: RovingFocus,
    interval: Option<Duration>,
    rotating: bool,
    hovered: bool,
    focus_within: bool,
}

impl Carousel {
    pub fn new(label: impl Into<String>, slides: Vec<String>) -> Self {
        Self::with_id(ElementId::unique("carousel"), label, slides)
    }

    pub fn with_id(
        id: impl Into<ElementId>,
        label: impl Into<String>,
        slides: Vec<String>,
    ) -> Self {
        let id = id.into();
        let tabs = (0..slides.len()).map(|i| picker_tab_id(&id, i)).collect();
        Self {
            id,
            label: label.into(),
            slides,
            active: 0,
            picker: RovingFocus::new(tabs),
            interval: None,
            rotating: false,
            hovered: false,
            focus_within: false,
        }
    }

    /// Rotate to the next slide every `interval`, starting right away.
    pub fn with_autoplay(mut self, interval: Duration) -> Self {
        self.interval = Some(interval);
        self.rotating = true;
        self
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn slides(&self) -> &[String] {
        &self.slides
    }

    /// Whether rotation is switched on, even if currently paused.
    pub fn is_rotation_enabled(&self) -> bool {
        self.rotating
    }

    /// Whether the timer is running right now.
    pub fn is_rotating(&self) -> bool {
        self.rotating
            && self.interval.is_some()
            && self.slides.len() > 1
            && !self.hovered
            && !self.focus_within
    }

    pub fn slide_id(&self, index: usize) -> ElementId {
        self.id.child(format!("slide-{index}"))
    }

    pub fn picker_tab_id(&self, index: usize) -> ElementId {
        picker_tab_id(&self.id, index)
    }

    pub fn rotation_button_id(&self) -> ElementId {
        self.id.child("rotation")
    }

    fn slides_id(&self) -> ElementId {
        self.id.child("slides")
    }

    fn show(&mut self, index: usize) -> Command<Message> {
        if index >= self.slides.len() {
            tracing::warn!(index, len = self.slides.len(), "slide out of bounds");
            return Command::none();
        }
        if index == self.active {
            return Command::none();
        }
        self.active = index;
        self.picker.focus(index);
        Command::message(Message::SlideChanged(index))
    }

    fn step(&self, forward: bool) -> usize {
        let n = self.slides.len().max(1);
        if forward {
            (self.active + 1) % n
        } else {
            (self.active + n - 1) % n
        }
    }

    /// User navigation stops rotation permanently.
    fn stop_rotation(&mut self) {
        if self.rotating {
            tracing::debug!(id = %self.id, "carousel rotation stopped");
        }
        self.rotating = false;
    }
}

fn picker_tab_id(id: &ElementId, index: usize) -> ElementId {
    id.child(format!("picker-{index}"))
}

impl Component for Carousel {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        match msg {
            Message::Next => {
                self.stop_rotation();
                self.show(self.step(true))
            }
            Message::Prev => {
                self.stop_rotation();
                self.show(self.step(false))
            }
            Message::GoTo(i) => {
                self.stop_rotation();
                self.show(i)
            }
            Message::Tick => {
                if self.is_rotating() {
                    self.show(self.step(true))
                } else {
                    Command::none()
                }
            }
            Message::Play => {
                if self.interval.is_none() {
                    tracing::warn!(id = %self.id, "carousel has no autoplay interval");
                    return Command::none();
                }
                self.rotating = true;
                // An explicit start overrides the pause from focus being on
                // the rotation button itself.
                self.focus_within = false;
                Command::none()
            }
            Message::Pause => {
                self.stop_rotation();
                Command::none()
            }
            Message::ToggleRotation => {
                let next = if self.rotating {
                    Message::Pause
                } else {
                    Message::Play
                };
                self.update(next)
            }
            Message::PointerEnter => {
                self.hovered = true;
                Command::none()
            }
            Message::PointerLeave => {
                self.hovered = false;
                Command::none()
            }
            Message::FocusIn => {
                self.focus_within = true;
                Command::none()
            }
            Message::FocusOut => {
                self.focus_within = false;
                Command::none()
            }
            Message::KeyPress(key) => {
                let Some(nav) = Nav::from_key(&key, Orientation::Horizontal) else {
                    return Command::none();
                };
                let Some(i) = self.picker.navigate(nav) else {
                    return Command::none();
                };
                self.stop_rotation();
                Command::batch([Command::focus(self.picker_tab_id(i)), self.show(i)])
            }
            Message::SlideChanged(_) => Command::none(),
        }
    }

    fn subscriptions(&self) -> Vec<Subscription<Message>> {
        match self.interval {
            Some(interval) if self.is_rotating() => {
                vec![subscribe(Every::new(interval, self.id.as_str())).map(|_| Message::Tick)]
            }
            _ => vec![],
        }
    }

    fn semantics(&self) -> AccessNode {
        let n = self.slides.len();
        let mut root = AccessNode::new(self.id.clone())
            .role(Role::Region)
            .attr(Attr::RoleDescription, "carousel")
            .attr(Attr::Label, self.label.clone());

        if self.interval.is_some() {
            let text = if self.rotating {
                "Stop automatic slide show"
            } else {
                "Start automatic slide show"
            };
            root = root.child(
                AccessNode::new(self.rotation_button_id())
                    .role(Role::Button)
                    .text(text)
                    .tab_index(TabIndex::Tabbable)
                    .attr(Attr::Controls, self.slides_id()),
            );
        }

        for (suffix, text) in [("prev", "Previous slide"), ("next", "Next slide")] {
            root = root.child(
                AccessNode::new(self.id.child(suffix))
                    .role(Role::Button)
                    .text(text)
                    .tab_index(TabIndex::Tabbable)
                    .attr(Attr::Controls, self.slides_id()),
            );
        }

        let live = if self.is_rotating() {
            Politeness::Off
        } else {
            Politeness::Polite
        };
        let slides = self.slides.iter().enumerate().map(|(i, text)| {
            AccessNode::new(self.slide_id(i))
                .role(Role::Group)
                .text(text.clone())
                .attr(Attr::RoleDescription, "slide")
                .attr(Attr::Label, format!("{} of {}", i + 1, n))
                .hidden(i != self.active)
        });
        root = root.child(
            AccessNode::new(self.slides_id())
                .attr(Attr::Live, live)
                .children(slides),
        );

        let tabs = (0..n).map(|i| {
            AccessNode::new(self.picker_tab_id(i))
                .role(Role::Tab)
                .tab_index(self.picker.tab_index(i))
                .attr(Attr::Selected, i == self.active)
                .attr(Attr::Controls, self.slide_id(i))
                .attr(Attr::Label, format!("Slide {}", i + 1))
        });
        root.child(
            AccessNode::new(self.id.child("picker"))
                .role(Role::TabList)
                .attr(Attr::Label, "Slides")
                .children(tabs),
        )
    }

    fn focused(&self) -> bool {
        self.focus_within
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyCode;
    use taro_core::testing::Harness;

    fn slides() -> Vec<String> {
        vec!["Dunes".into(), "Forest".into(), "Glacier".into()]
    }

    fn rotating() -> Harness<Carousel> {
        Harness::new(
            Carousel::with_id("hero", "Featured", slides()).with_autoplay(Duration::from_secs(5)),
        )
        .with_keys(Message::KeyPress)
    }

    #[test]
    fn next_and_prev_wrap() {
        let mut h = Harness::new(Carousel::new("Photos", slides()));
        h.send(Message::Prev);
        assert_eq!(h.component().active(), 2);
        h.send(Message::Next);
        assert_eq!(h.component().active(), 0);
        assert!(h.saw("SlideChanged(2)"));
        assert!(h.saw("SlideChanged(0)"));
    }

    #[test]
    fn tick_advances_while_rotating() {
        let mut h = rotating();
        assert!(h.component().is_rotating());
        assert_eq!(h.component().subscriptions().len(), 1);
        h.send(Message::Tick);
        h.send(Message::Tick);
        assert_eq!(h.component().active(), 2);
        h.send(Message::Tick);
        assert_eq!(h.component().active(), 0);
    }

    #[test]
    fn hover_and_focus_pause() {
        let mut h = rotating();
        h.send(Message::PointerEnter);
        assert!(!h.component().is_rotating());
        assert!(h.component().subscriptions().is_empty());
        h.send(Message::Tick);
        assert_eq!(h.component().active(), 0);
        h.send(Message::PointerLeave);
        assert!(h.component().is_rotating());

        h.send(Message::FocusIn);
        assert!(!h.component().is_rotating());
        h.send(Message::FocusOut);
        assert!(h.component().is_rotating());
    }

    #[test]
    fn manual_navigation_stops_rotation_for_good() {
        let mut h = rotating();
        h.send(Message::Next);
        assert!(!h.component().is_rotation_enabled());
        h.send(Message::PointerEnter);
        h.send(Message::PointerLeave);
        assert!(!h.component().is_rotating());
        h.send(Message::Tick);
        assert_eq!(h.component().active(), 1);
    }

    #[test]
    fn rotation_button_toggles() {
        let mut h = rotating();
        h.send(Message::FocusIn);
        h.send(Message::ToggleRotation);
        assert!(!h.component().is_rotation_enabled());
        h.send(Message::ToggleRotation);
        assert!(h.component().is_rotating());
    }

    #[test]
    fn play_needs_an_interval() {
        let mut h = Harness::new(Carousel::new("Photos", slides()));
        h.send(Message::Play);
        assert!(!h.component().is_rotation_enabled());
    }

    #[test]
    fn picker_keys_switch_slides() {
        let mut h = rotating();
        h.press(KeyCode::Right);
        assert_eq!(h.component().active(), 1);
        assert_eq!(h.focused_id().unwrap().as_str(), "hero-picker-1");
        assert!(!h.component().is_rotation_enabled());
        h.press(KeyCode::End);
        assert_eq!(h.component().active(), 2);
        h.press(KeyCode::Right);
        assert_eq!(h.component().active(), 0);
    }

    #[test]
    fn goto_out_of_range_is_ignored() {
        let mut h = Harness::new(Carousel::new("Photos", slides()));
        h.send(Message::GoTo(9));
        assert_eq!(h.component().active(), 0);
        assert!(!h.saw("SlideChanged"));
    }

    #[test]
    fn semantics() {
        let mut h = rotating();
        let tree = h.semantics();
        assert_eq!(tree.role, Some(Role::Region));
        assert_eq!(tree.attr_string(Attr::RoleDescription).as_deref(), Some("carousel"));
        let rotation = tree.find("hero-rotation").unwrap();
        assert_eq!(rotation.text.as_deref(), Some("Stop automatic slide show"));
        let slides = tree.find("hero-slides").unwrap();
        assert_eq!(slides.attr_string(Attr::Live).as_deref(), Some("off"));
        let slide = tree.find("hero-slide-0").unwrap();
        assert_eq!(slide.attr_string(Attr::Label).as_deref(), Some("1 of 3"));
        assert!(!slide.is_hidden());
        assert!(tree.find("hero-slide-1").unwrap().is_hidden());

        h.send(Message::GoTo(1));
        let tree = h.semantics();
        let slides = tree.find("hero-slides").unwrap();
        assert_eq!(slides.attr_string(Attr::Live).as_deref(), Some("polite"));
        let rotation = tree.find("hero-rotation").unwrap();
        assert_eq!(rotation.text.as_deref(), Some("Start automatic slide show"));
        let tab = tree.find("hero-picker-1").unwrap();
        assert_eq!(tab.attr_string(Attr::Selected).as_deref(), Some("true"));
        assert_eq!(tab.tab_index, TabIndex::Tabbable);
        assert_eq!(tree.find("hero-picker-0").unwrap().tab_index, TabIndex::Programmatic);
    }
}
