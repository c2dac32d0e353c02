// src/render/factory.rs

//! `SpriteFactory`: constructs sprites of a chosen backend from image files,
//! byte streams, solid colors, or blank buffers, and produces the matching
//! render system.
//!
//! Every native allocation is checked for its failure sentinel and converted
//! into a backend error before anything escapes. A failed multi-step
//! construction never hands the caller a partially built sprite.

use crate::color::Color;
use crate::error::{Error, Result};
use crate::render::context::RenderContext;
use crate::render::sprite::{PixelFormat, SoftwareSprite, Sprite, TextureAccess, TextureSprite};
use crate::render::system::{SoftwareSpriteRenderer, SpriteRendererKind, TextureSpriteRenderer};
use crate::video::{Surface, Window};

use libc::c_int;
use log::debug;
use std::path::Path;
use std::rc::Rc;

/// Which sprite variant a factory produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteBackend {
    /// GPU-resident textures drawn through a [`RenderContext`].
    Texture,
    /// CPU pixel surfaces blitted onto a window surface.
    Software,
}

/// Defaults a [`SpriteFactory`] applies when a creation call does not
/// override them.
///
/// `renderer` is required for the texture backend and validated at factory
/// construction, not at call time.
#[derive(Debug, Clone, Default)]
pub struct FactoryConfig {
    /// Render context texture sprites are created against.
    pub renderer: Option<Rc<RenderContext>>,
    /// Default sprite size for [`SpriteFactory::create_sprite`].
    pub size: Option<(u32, u32)>,
    /// Bits per pixel for blank software surfaces; `None` means 32.
    pub bpp: Option<u32>,
    /// Explicit RGBA channel masks for blank software surfaces; `None` lets
    /// the backend infer a format from the depth.
    pub masks: Option<[u32; 4]>,
}

const DEFAULT_BPP: u32 = 32;

/// Per-call overrides merged over a factory's stored defaults by
/// [`SpriteFactory::create_sprite`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SpriteOptions {
    pub size: Option<(u32, u32)>,
    pub bpp: Option<u32>,
    pub masks: Option<[u32; 4]>,
    pub pixel_format: Option<PixelFormat>,
    pub static_access: Option<bool>,
}

/// A sprite of either backend, as produced by the factory.
#[derive(Debug)]
pub enum AnySprite {
    Software(SoftwareSprite),
    Texture(TextureSprite),
}

impl AnySprite {
    pub fn as_software(&self) -> Option<&SoftwareSprite> {
        match self {
            AnySprite::Software(sprite) => Some(sprite),
            AnySprite::Texture(_) => None,
        }
    }

    pub fn as_texture(&self) -> Option<&TextureSprite> {
        match self {
            AnySprite::Texture(sprite) => Some(sprite),
            AnySprite::Software(_) => None,
        }
    }

    /// Unwraps the software variant, handing the sprite back on mismatch.
    pub fn into_software(self) -> std::result::Result<SoftwareSprite, AnySprite> {
        match self {
            AnySprite::Software(sprite) => Ok(sprite),
            other => Err(other),
        }
    }

    /// Unwraps the texture variant, handing the sprite back on mismatch.
    pub fn into_texture(self) -> std::result::Result<TextureSprite, AnySprite> {
        match self {
            AnySprite::Texture(sprite) => Ok(sprite),
            other => Err(other),
        }
    }
}

impl Sprite for AnySprite {
    fn position(&self) -> (i32, i32) {
        match self {
            AnySprite::Software(s) => s.position(),
            AnySprite::Texture(s) => s.position(),
        }
    }

    fn set_position(&mut self, x: i32, y: i32) {
        match self {
            AnySprite::Software(s) => s.set_position(x, y),
            AnySprite::Texture(s) => s.set_position(x, y),
        }
    }

    fn depth(&self) -> i32 {
        match self {
            AnySprite::Software(s) => s.depth(),
            AnySprite::Texture(s) => s.depth(),
        }
    }

    fn set_depth(&mut self, depth: i32) {
        match self {
            AnySprite::Software(s) => s.set_depth(depth),
            AnySprite::Texture(s) => s.set_depth(depth),
        }
    }

    fn size(&self) -> (u32, u32) {
        match self {
            AnySprite::Software(s) => s.size(),
            AnySprite::Texture(s) => s.size(),
        }
    }
}

/// A factory for sprites of one backend, stateless beyond its backend choice
/// and stored defaults; every call produces an independent sprite.
#[derive(Debug, Clone)]
pub struct SpriteFactory {
    backend: SpriteBackend,
    config: FactoryConfig,
}

impl SpriteFactory {
    /// Creates a factory for the given backend.
    ///
    /// # Returns
    ///
    /// * `Err(Error::MissingArgument)` for a texture-backend factory whose
    ///   configuration carries no render context.
    pub fn new(backend: SpriteBackend, config: FactoryConfig) -> Result<Self> {
        if backend == SpriteBackend::Texture && config.renderer.is_none() {
            return Err(Error::MissingArgument("renderer"));
        }
        Ok(SpriteFactory { backend, config })
    }

    /// A software-backend factory with default configuration.
    pub fn software() -> Self {
        SpriteFactory {
            backend: SpriteBackend::Software,
            config: FactoryConfig::default(),
        }
    }

    /// A texture-backend factory bound to the given render context.
    pub fn texture(context: Rc<RenderContext>) -> Self {
        SpriteFactory {
            backend: SpriteBackend::Texture,
            config: FactoryConfig {
                renderer: Some(context),
                ..FactoryConfig::default()
            },
        }
    }

    pub fn backend(&self) -> SpriteBackend {
        self.backend
    }

    /// The render context texture sprites are created against, if any.
    pub fn context(&self) -> Option<&Rc<RenderContext>> {
        self.config.renderer.as_ref()
    }

    /// Produces the render system matching this factory's backend.
    ///
    /// The texture backend binds the system to the factory's stored render
    /// context and ignores `window`; the software backend requires `window`
    /// as the blit destination.
    pub fn create_sprite_renderer(&self, window: Option<&Window>) -> Result<SpriteRendererKind> {
        match self.backend {
            SpriteBackend::Texture => {
                let context = self.require_context()?;
                Ok(SpriteRendererKind::Texture(TextureSpriteRenderer::new(
                    Rc::clone(context),
                )))
            }
            SpriteBackend::Software => {
                let window = window.ok_or(Error::MissingArgument("window"))?;
                Ok(SpriteRendererKind::Software(SoftwareSpriteRenderer::new(
                    window,
                )?))
            }
        }
    }

    /// Creates a sprite from a bitmap image file. The decoded surface is
    /// owned by the construction and released with it.
    pub fn from_image(&self, path: &Path) -> Result<AnySprite> {
        let surface = Surface::from_bmp_file(path)?;
        self.from_owned_surface(surface)
    }

    /// Creates a sprite from a surface, taking ownership: the texture
    /// backend uploads and then releases the source buffer, the software
    /// backend hands it to the sprite to release.
    pub fn from_owned_surface(&self, surface: Surface) -> Result<AnySprite> {
        if surface.raw().is_null() {
            return Err(Error::InvalidInput("surface has been destroyed"));
        }
        match self.backend {
            SpriteBackend::Texture => {
                let sprite = self.upload_texture(&surface)?;
                // `surface` drops here, releasing the source buffer if owned.
                Ok(AnySprite::Texture(sprite))
            }
            SpriteBackend::Software => Ok(AnySprite::Software(SoftwareSprite::new(surface))),
        }
    }

    /// Creates a sprite from a surface the caller keeps: the texture backend
    /// uploads without touching the source, the software backend wraps the
    /// buffer without taking ownership, so the sprite never releases it.
    pub fn from_surface(&self, surface: &Surface) -> Result<AnySprite> {
        if surface.raw().is_null() {
            return Err(Error::InvalidInput("surface has been destroyed"));
        }
        match self.backend {
            SpriteBackend::Texture => Ok(AnySprite::Texture(self.upload_texture(surface)?)),
            SpriteBackend::Software => Ok(AnySprite::Software(SoftwareSprite::new(
                Surface::borrowed(surface.raw()),
            ))),
        }
    }

    /// Creates a sprite from an in-memory bitmap byte stream. The decoded
    /// surface is always owned by the construction.
    pub fn from_object(&self, data: &[u8]) -> Result<AnySprite> {
        let surface = Surface::from_bmp_bytes(data)?;
        self.from_owned_surface(surface)
    }

    /// Creates a solid-color sprite of the given size.
    ///
    /// Allocates a blank surface with the factory's configured depth and
    /// masks, maps the color into the surface's pixel format (alpha-aware
    /// when the format has an alpha channel), fills the surface, and hands
    /// ownership to [`SpriteFactory::from_owned_surface`].
    pub fn from_color(&self, color: Color, size: (u32, u32)) -> Result<AnySprite> {
        let mut surface = Surface::new(
            size.0,
            size.1,
            self.config.bpp.unwrap_or(DEFAULT_BPP),
            self.config.masks,
        )?;
        surface.fill(color)?;
        self.from_owned_surface(surface)
    }

    /// Creates a blank sprite, merging `options` over the factory defaults
    /// and dispatching to the backend-specific constructor.
    ///
    /// # Returns
    ///
    /// * `Err(Error::MissingArgument)` when neither the options nor the
    ///   factory defaults provide a size.
    pub fn create_sprite(&self, options: SpriteOptions) -> Result<AnySprite> {
        let size = options
            .size
            .or(self.config.size)
            .ok_or(Error::MissingArgument("size"))?;
        match self.backend {
            SpriteBackend::Software => {
                let bpp = options.bpp.or(self.config.bpp).unwrap_or(DEFAULT_BPP);
                let masks = options.masks.or(self.config.masks);
                let surface = Surface::new(size.0, size.1, bpp, masks)?;
                Ok(AnySprite::Software(SoftwareSprite::new(surface)))
            }
            SpriteBackend::Texture => {
                let format = options.pixel_format.unwrap_or(PixelFormat::Rgba8888);
                let static_access = options.static_access.unwrap_or(true);
                Ok(AnySprite::Texture(self.create_texture_sprite(
                    None,
                    size,
                    format,
                    static_access,
                )?))
            }
        }
    }

    /// Creates a blank software sprite of the given size using the factory's
    /// configured depth and masks.
    pub fn create_software_sprite(&self, size: (u32, u32)) -> Result<SoftwareSprite> {
        let surface = Surface::new(
            size.0,
            size.1,
            self.config.bpp.unwrap_or(DEFAULT_BPP),
            self.config.masks,
        )?;
        Ok(SoftwareSprite::new(surface))
    }

    /// Creates a blank texture sprite.
    ///
    /// `context` overrides the factory's stored render context for this
    /// call. Static sprites trade pixel access for faster copies; pass
    /// `static_access = false` for a streaming texture whose pixels can be
    /// updated frequently.
    pub fn create_texture_sprite(
        &self,
        context: Option<&RenderContext>,
        size: (u32, u32),
        pixel_format: PixelFormat,
        static_access: bool,
    ) -> Result<TextureSprite> {
        let renderer = match context {
            Some(ctx) => ctx.raw(),
            None => self.require_context()?.raw(),
        };
        let access = if static_access {
            TextureAccess::Static
        } else {
            TextureAccess::Streaming
        };
        debug!(
            "Creating {}x{} blank texture ({:?}, {:?}).",
            size.0, size.1, pixel_format, access
        );
        // SAFETY: live renderer handle; failures are reported as null.
        let texture = unsafe {
            sdl2_sys::SDL_CreateTexture(
                renderer,
                pixel_format as u32,
                access.to_native(),
                size.0 as c_int,
                size.1 as c_int,
            )
        };
        if texture.is_null() {
            return Err(Error::sdl("SDL_CreateTexture"));
        }
        TextureSprite::from_raw(texture)
    }

    fn upload_texture(&self, surface: &Surface) -> Result<TextureSprite> {
        let context = self.require_context()?;
        // SAFETY: live renderer and surface handles; failures are reported
        // as null.
        let texture =
            unsafe { sdl2_sys::SDL_CreateTextureFromSurface(context.raw(), surface.raw()) };
        if texture.is_null() {
            return Err(Error::sdl("SDL_CreateTextureFromSurface"));
        }
        TextureSprite::from_raw(texture)
    }

    fn require_context(&self) -> Result<&Rc<RenderContext>> {
        self.config.renderer.as_ref().ok_or(Error::MissingArgument("renderer"))
    }
}
