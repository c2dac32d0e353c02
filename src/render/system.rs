// src/render/system.rs

//! Render systems: per-frame batch consumers that sort a sprite collection
//! by depth and draw it.
//!
//! [`SpriteRenderSystem::process`] is the shared protocol: stable-sort by
//! the active sort key, then hand the ordered batch to `render`, the
//! backend-specific extension point. The systems never own sprites; they
//! draw whatever the caller submits for the frame.

use crate::config::RendererConfig;
use crate::error::{Error, Result};
use crate::geometry::Rect;
use crate::render::context::{RenderContext, TextureSource};
use crate::render::sprite::{SoftwareSprite, Sprite, TextureSprite};
use crate::video::{Surface, Window};

use log::trace;
use sdl2_sys::SDL_Window;
use std::rc::Rc;

/// The sort-then-render protocol shared by all render systems.
pub trait SpriteRenderSystem {
    /// The sprite variant this system accepts.
    type Item: Sprite;

    /// Draws the sprites in the given order. `offset` shifts every sprite's
    /// own position by the same amount.
    ///
    /// Draw order must equal input order: later sprites overpaint earlier
    /// ones where they overlap.
    fn render(&mut self, sprites: &[&Self::Item], offset: Option<(i32, i32)>) -> Result<()>;

    /// The sort key for one sprite. Defaults to its depth, so lower depths
    /// are drawn first and higher depths end up on top.
    fn sort_value(&self, sprite: &Self::Item) -> i64 {
        i64::from(sprite.depth())
    }

    /// Stable-sorts the batch by the active sort key, then draws it.
    fn process(&mut self, sprites: &mut Vec<&Self::Item>) -> Result<()> {
        sprites.sort_by_key(|sprite| self.sort_value(sprite));
        self.render(sprites, None)
    }
}

/// The render system matching a factory's backend.
#[derive(Debug)]
pub enum SpriteRendererKind {
    Software(SoftwareSpriteRenderer),
    Texture(TextureSpriteRenderer),
}

impl SpriteRendererKind {
    /// Unwraps the software variant, handing the system back on mismatch.
    pub fn into_software(self) -> std::result::Result<SoftwareSpriteRenderer, SpriteRendererKind> {
        match self {
            SpriteRendererKind::Software(system) => Ok(system),
            other => Err(other),
        }
    }

    /// Unwraps the texture variant, handing the system back on mismatch.
    pub fn into_texture(self) -> std::result::Result<TextureSpriteRenderer, SpriteRendererKind> {
        match self {
            SpriteRendererKind::Texture(system) => Ok(system),
            other => Err(other),
        }
    }
}

type SortKey<T> = Box<dyn Fn(&T) -> i64>;

/// Blits [`SoftwareSprite`]s onto a window's backing surface, then pushes
/// one surface update per `render` call.
pub struct SoftwareSpriteRenderer {
    window: *mut SDL_Window,
    surface: Surface,
    sort_key: SortKey<SoftwareSprite>,
}

impl SoftwareSpriteRenderer {
    /// Binds the system to a window's backing surface.
    ///
    /// # Returns
    ///
    /// * `Err(Error::Sdl)` if the window has no surface.
    pub fn new(window: &Window) -> Result<Self> {
        let surface = window.surface()?;
        Ok(SoftwareSpriteRenderer {
            window: window.raw(),
            surface,
            sort_key: Box::new(|sprite| i64::from(sprite.depth)),
        })
    }

    /// Replaces the sort key used by `process`.
    pub fn set_sort_key(&mut self, key: impl Fn(&SoftwareSprite) -> i64 + 'static) {
        self.sort_key = Box::new(key);
    }

    /// Draws a single sprite, at `position` if given, at the sprite's own
    /// position otherwise, then pushes the surface update.
    pub fn render_at(
        &mut self,
        sprite: &SoftwareSprite,
        position: Option<(i32, i32)>,
    ) -> Result<()> {
        let (x, y) = position.unwrap_or_else(|| sprite.position());
        sprite.surface().blit_to(&mut self.surface, (x, y))?;
        self.push_update()
    }

    fn push_update(&self) -> Result<()> {
        // SAFETY: the window handle outlives this system per the resource
        // model; the caller keeps the window alive while rendering.
        let status = unsafe { sdl2_sys::SDL_UpdateWindowSurface(self.window) };
        if status < 0 {
            return Err(Error::sdl("SDL_UpdateWindowSurface"));
        }
        Ok(())
    }
}

impl std::fmt::Debug for SoftwareSpriteRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoftwareSpriteRenderer")
            .field("window", &self.window)
            .field("surface", &self.surface)
            .finish()
    }
}

impl SpriteRenderSystem for SoftwareSpriteRenderer {
    type Item = SoftwareSprite;

    fn sort_value(&self, sprite: &SoftwareSprite) -> i64 {
        (self.sort_key)(sprite)
    }

    fn render(&mut self, sprites: &[&SoftwareSprite], offset: Option<(i32, i32)>) -> Result<()> {
        let (ox, oy) = offset.unwrap_or((0, 0));
        trace!("Blitting {} sprites onto window surface.", sprites.len());
        for sprite in sprites {
            sprite
                .surface()
                .blit_to(&mut self.surface, (ox + sprite.x, oy + sprite.y))?;
        }
        // One update per batch, after every sprite has been blitted.
        self.push_update()
    }
}

/// Issues one hardware copy per [`TextureSprite`] and finishes the batch
/// with a single present.
pub struct TextureSpriteRenderer {
    context: Rc<RenderContext>,
    sort_key: SortKey<TextureSprite>,
}

impl TextureSpriteRenderer {
    /// Binds the system to a render context. The context is retained so its
    /// renderer stays alive for this system's whole lifetime.
    pub fn new(context: Rc<RenderContext>) -> Self {
        TextureSpriteRenderer {
            context,
            sort_key: Box::new(|sprite| i64::from(sprite.depth)),
        }
    }

    /// Convenience constructor that creates a render context for the window
    /// first.
    pub fn with_window(window: &Window, config: &RendererConfig) -> Result<Self> {
        let context = Rc::new(RenderContext::with_window(window, config)?);
        Ok(Self::new(context))
    }

    /// The render context this system draws through.
    pub fn context(&self) -> &Rc<RenderContext> {
        &self.context
    }

    /// Replaces the sort key used by `process`.
    pub fn set_sort_key(&mut self, key: impl Fn(&TextureSprite) -> i64 + 'static) {
        self.sort_key = Box::new(key);
    }

    /// Draws a single sprite, at `position` if given, at the sprite's own
    /// position otherwise, then presents.
    pub fn render_at(
        &mut self,
        sprite: &TextureSprite,
        position: Option<(i32, i32)>,
    ) -> Result<()> {
        let (x, y) = position.unwrap_or_else(|| sprite.position());
        self.copy_sprite(sprite, x, y)?;
        self.context.present();
        Ok(())
    }

    fn copy_sprite(&self, sprite: &TextureSprite, x: i32, y: i32) -> Result<()> {
        let (w, h) = sprite.size();
        let dst = Rect::new(x, y, w as i32, h as i32);
        self.context
            .copy(TextureSource::Sprite(sprite), None, Some(dst))
    }
}

impl std::fmt::Debug for TextureSpriteRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextureSpriteRenderer")
            .field("context", &self.context)
            .finish()
    }
}

impl SpriteRenderSystem for TextureSpriteRenderer {
    type Item = TextureSprite;

    fn sort_value(&self, sprite: &TextureSprite) -> i64 {
        (self.sort_key)(sprite)
    }

    fn render(&mut self, sprites: &[&TextureSprite], offset: Option<(i32, i32)>) -> Result<()> {
        let (ox, oy) = offset.unwrap_or((0, 0));
        trace!("Copying {} texture sprites.", sprites.len());
        for sprite in sprites {
            // Each sprite is a distinct texture, so this path is one copy
            // per sprite; batched marshaling does not apply here.
            self.copy_sprite(sprite, ox + sprite.x, oy + sprite.y)?;
        }
        // A single present after the whole batch.
        self.context.present();
        Ok(())
    }
}
