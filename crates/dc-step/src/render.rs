//! Debug render surface.
//!
//! Rendering is grouped: a group is opened with `begin`, receives draw
//! commands, and is closed with `end`.  [`RenderScope`] ties the `end` call
//! to `Drop`, so a group is closed even when a step returns early.  The
//! driver opens one scope per tick and hands it to steps through the
//! context; steps may open nested groups with
//! [`StepContext::render_group`][crate::StepContext::render_group].

use dc_core::Vec3;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED:   Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const PINK:  Color = Color::rgb(255, 105, 180);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Line3d { from: Vec3, to: Vec3, color: Color },
    Polyline3d { points: Vec<Vec3>, color: Color },
    Rect3d { at: Vec3, width: u32, height: u32, color: Color },
    Text3d { at: Vec3, text: String, color: Color },
    Text2d { x: i32, y: i32, text: String, color: Color },
}

/// Host-side render surface.
pub trait Renderer {
    fn begin(&mut self, group: &str);
    fn draw(&mut self, command: DrawCommand);
    fn end(&mut self, group: &str);
}

pub struct NoopRenderer;

impl Renderer for NoopRenderer {
    fn begin(&mut self, _group: &str) {}
    fn draw(&mut self, _command: DrawCommand) {}
    fn end(&mut self, _group: &str) {}
}

#[derive(Clone, Debug, PartialEq)]
pub enum RenderEvent {
    Begin(String),
    Draw(DrawCommand),
    End(String),
}

/// Records every call in order.
#[derive(Default)]
pub struct RecordingRenderer {
    pub events: Vec<RenderEvent>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` if every `Begin` has a matching `End`, properly nested.
    pub fn is_balanced(&self) -> bool {
        let mut open: Vec<&str> = Vec::new();
        for event in &self.events {
            match event {
                RenderEvent::Begin(g) => open.push(g),
                RenderEvent::End(g) => {
                    if open.pop() != Some(g.as_str()) {
                        return false;
                    }
                }
                RenderEvent::Draw(_) => {}
            }
        }
        open.is_empty()
    }

    pub fn draws(&self) -> usize {
        self.events.iter().filter(|e| matches!(e, RenderEvent::Draw(_))).count()
    }
}

impl Renderer for RecordingRenderer {
    fn begin(&mut self, group: &str) {
        self.events.push(RenderEvent::Begin(group.to_owned()));
    }

    fn draw(&mut self, command: DrawCommand) {
        self.events.push(RenderEvent::Draw(command));
    }

    fn end(&mut self, group: &str) {
        self.events.push(RenderEvent::End(group.to_owned()));
    }
}

/// An open render group.  Closes the group on drop.
pub struct RenderScope<'a> {
    renderer: &'a mut dyn Renderer,
    group:    String,
}

impl<'a> RenderScope<'a> {
    pub fn begin(renderer: &'a mut dyn Renderer, group: impl Into<String>) -> Self {
        let group = group.into();
        renderer.begin(&group);
        Self { renderer, group }
    }

    pub fn draw(&mut self, command: DrawCommand) {
        self.renderer.draw(command);
    }

    /// Open a nested group on the same surface.
    pub fn nested(&mut self, group: impl Into<String>) -> RenderScope<'_> {
        RenderScope::begin(&mut *self.renderer, group)
    }

    /// The underlying surface, for handing to a [`StepContext`][crate::StepContext].
    pub fn renderer(&mut self) -> &mut dyn Renderer {
        &mut *self.renderer
    }
}

impl Drop for RenderScope<'_> {
    fn drop(&mut self) {
        self.renderer.end(&self.group);
    }
}
