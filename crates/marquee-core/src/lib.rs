#![cfg_attr(not(test), no_std)]

//! Viewport text rendering and marquee scrolling for small pixel displays.
//!
//! One [`Lcd`] context per panel owns the [`Display`] implementation, the
//! fonts, the bidi classifier, the viewport table and the scroll registry.
//! Overflowing lines registered with [`Lcd::put_scrolling`] move each time
//! the caller drives [`Lcd::step`].

pub mod bidi;
pub mod bitmap;
pub mod config;
pub mod display;
pub mod font;
pub mod lcd;
pub mod scroll;
pub mod text;
pub mod viewport;

#[cfg(test)]
mod test_support;

pub use bidi::{CharClass, Classifier, LtrClassifier, VisualBuffer};
#[cfg(feature = "unicode-bidi")]
pub use bidi::UnicodeClassifier;
pub use bitmap::Bitmap;
pub use config::{ConfigError, ScrollConfig};
pub use display::{Display, DrawMode, Pattern, Size};
pub use font::{FontId, FontLock, FontProvider, Glyph, GlyphFormat, PixelFont};
pub use lcd::Lcd;
pub use scroll::{Direction, Redraw, RegistryFull, ScrollFn, ScrollLine, TickSource};
pub use viewport::{Alignment, Viewport, ViewportError, ViewportId};
