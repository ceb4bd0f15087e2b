//! Drawing regions and the per-context viewport table.

use crate::{
    config::MAX_VIEWPORTS,
    display::{DrawMode, Pattern, Size},
    font::FontId,
};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// Rectangular drawing region with its own text state.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Viewport {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub font: FontId,
    pub drawmode: DrawMode,
    pub fg_pattern: Pattern,
    pub bg_pattern: Pattern,
    pub alignment: Alignment,
}

impl Viewport {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            font: FontId::SYSTEM,
            drawmode: DrawMode::SOLID,
            fg_pattern: Pattern(0),
            bg_pattern: Pattern(0),
            alignment: Alignment::Left,
        }
    }

    /// Viewport covering a whole display.
    pub const fn full(size: Size) -> Self {
        Self::new(0, 0, size.width, size.height)
    }

    pub const fn with_font(mut self, font: FontId) -> Self {
        self.font = font;
        self
    }

    pub const fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub const fn with_drawmode(mut self, drawmode: DrawMode) -> Self {
        self.drawmode = drawmode;
        self
    }

    pub const fn with_patterns(mut self, fg: Pattern, bg: Pattern) -> Self {
        self.fg_pattern = fg;
        self.bg_pattern = bg;
        self
    }

    /// Whether any part of the viewport lies outside `size`.
    pub fn exceeds(&self, size: Size) -> bool {
        self.x < 0
            || self.y < 0
            || self.x > size.width
            || self.y > size.height
            || self.x + self.width > size.width
            || self.y + self.height > size.height
    }
}

/// Handle into a context's viewport table.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct ViewportId(pub(crate) u8);

impl ViewportId {
    /// Full-display viewport present for the lifetime of the context.
    pub const DEFAULT: Self = Self(0);
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ViewportError {
    TableFull,
    /// The default viewport cannot be removed.
    DefaultViewport,
    Unknown,
}

/// Fixed-capacity storage. The default viewport lives outside the slots so
/// lookups of the active viewport always succeed.
#[derive(Clone, Debug)]
pub(crate) struct ViewportTable {
    default: Viewport,
    slots: [Option<Viewport>; MAX_VIEWPORTS - 1],
}

impl ViewportTable {
    pub(crate) fn new(default: Viewport) -> Self {
        Self {
            default,
            slots: [None; MAX_VIEWPORTS - 1],
        }
    }

    pub(crate) fn insert(&mut self, viewport: Viewport) -> Result<ViewportId, ViewportError> {
        let (index, slot) = self
            .slots
            .iter_mut()
            .enumerate()
            .find(|(_, slot)| slot.is_none())
            .ok_or(ViewportError::TableFull)?;

        *slot = Some(viewport);
        Ok(ViewportId(index as u8 + 1))
    }

    pub(crate) fn remove(&mut self, id: ViewportId) -> Result<Viewport, ViewportError> {
        if id == ViewportId::DEFAULT {
            return Err(ViewportError::DefaultViewport);
        }

        self.slots
            .get_mut(id.0 as usize - 1)
            .and_then(Option::take)
            .ok_or(ViewportError::Unknown)
    }

    pub(crate) fn get(&self, id: ViewportId) -> Option<&Viewport> {
        match id.0 {
            0 => Some(&self.default),
            n => self.slots.get(n as usize - 1).and_then(Option::as_ref),
        }
    }

    pub(crate) fn get_mut(&mut self, id: ViewportId) -> Option<&mut Viewport> {
        match id.0 {
            0 => Some(&mut self.default),
            n => self.slots.get_mut(n as usize - 1).and_then(Option::as_mut),
        }
    }

    /// Looks up `id`, falling back to the default viewport.
    pub(crate) fn resolve(&self, id: ViewportId) -> (ViewportId, &Viewport) {
        match self.get(id) {
            Some(vp) => (id, vp),
            None => (ViewportId::DEFAULT, &self.default),
        }
    }
}
