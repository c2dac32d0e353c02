// src/lib.rs

//! Sprite and rendering toolkit layered over the SDL2 C API.
//!
//! The crate wraps the raw `sdl2-sys` bindings with owning handle types and
//! builds a small sprite stack on top of them:
//!
//! - [`Window`] and [`Surface`] own the native window and pixel-buffer
//!   handles, released deterministically and exactly once.
//! - [`RenderContext`] owns a hardware or software renderer bound to one
//!   draw target, exposing draw-color/blend-mode state, clear/copy/present,
//!   and single or batched primitive draws.
//! - [`Sprite`] is the capability contract for positioned, depth-ordered
//!   drawables; [`SoftwareSprite`] and [`TextureSprite`] are its two
//!   backends.
//! - [`SpriteFactory`] builds sprites of a chosen backend from image files,
//!   byte streams, solid colors, or blank buffers.
//! - The render systems ([`SoftwareSpriteRenderer`],
//!   [`TextureSpriteRenderer`]) sort each frame's sprite batch by depth and
//!   draw it through the matching backend.
//!
//! Rendering is synchronous and single-threaded; every fallible native call
//! is checked and surfaced as a typed [`Error`].
//!
//! ```no_run
//! use sprite_core::{Color, Sprite, SpriteFactory, Window};
//!
//! # fn main() -> sprite_core::Result<()> {
//! let window = Window::with_title("demo", 640, 480)?;
//! let factory = SpriteFactory::software();
//! let mut sprite = factory.create_software_sprite((32, 32))?;
//! sprite.surface_mut().fill(Color::rgb(200, 60, 60))?;
//! sprite.set_position(10, 10);
//! # let _ = window;
//! # Ok(())
//! # }
//! ```

pub mod color;
pub mod config;
pub mod error;
pub mod geometry;
pub mod render;
pub mod video;

pub use color::Color;
pub use config::{Config, RendererConfig, WindowConfig, WindowPosition};
pub use error::{Error, Result};
pub use geometry::{Point, Rect};
pub use render::{
    AnySprite, BlendMode, FactoryConfig, PixelFormat, RenderContext, RenderTarget, RendererFlags,
    SoftwareSprite, SoftwareSpriteRenderer, Sprite, SpriteBackend, SpriteFactory, SpriteOptions,
    SpriteRenderSystem, SpriteRendererKind, TextureAccess, TextureSource, TextureSprite,
    TextureSpriteRenderer,
};
pub use video::{Surface, VideoSubsystem, Window};
