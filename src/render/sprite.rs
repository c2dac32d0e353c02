// src/render/sprite.rs

//! The sprite object model: the `Sprite` capability trait and its two
//! concrete variants, `SoftwareSprite` (a CPU pixel buffer) and
//! `TextureSprite` (a GPU-resident texture).

use crate::error::{Error, Result};
use crate::video::Surface;

use libc::c_int;
use log::trace;
use sdl2_sys::{SDL_Texture, SDL_TextureAccess};
use std::fmt;
use std::ptr;

/// A positioned, depth-ordered 2D drawable with a backend-defined size.
///
/// `size` is fixed at construction by the backend; `area` derives from the
/// current position and that size.
pub trait Sprite {
    /// Top-left position in target coordinates.
    fn position(&self) -> (i32, i32);
    fn set_position(&mut self, x: i32, y: i32);

    /// Draw-order key: lower depths are drawn first, so sprites with higher
    /// depths occlude them.
    fn depth(&self) -> i32;
    fn set_depth(&mut self, depth: i32);

    /// Pixel size `(w, h)`, fixed at construction.
    fn size(&self) -> (u32, u32);

    /// The rectangular area occupied by the sprite, as
    /// `(x0, y0, x1, y1) = (x, y, x + w, y + h)`.
    fn area(&self) -> (i32, i32, i32, i32) {
        let (x, y) = self.position();
        let (w, h) = self.size();
        (x, y, x + w as i32, y + h as i32)
    }
}

/// Texture pixel formats supported for blank texture sprites.
///
/// Discriminants are the native `SDL_PIXELFORMAT_*` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum PixelFormat {
    Rgba8888 = 0x1646_2004,
    Argb8888 = 0x1636_2004,
    Rgb888 = 0x1616_1804,
}

/// Static textures trade pixel access for faster copies; streaming textures
/// keep their pixel buffer reachable for frequent updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureAccess {
    Static,
    Streaming,
}

impl TextureAccess {
    pub(crate) fn to_native(self) -> c_int {
        match self {
            TextureAccess::Static => SDL_TextureAccess::SDL_TEXTUREACCESS_STATIC as c_int,
            TextureAccess::Streaming => SDL_TextureAccess::SDL_TEXTUREACCESS_STREAMING as c_int,
        }
    }
}

/// A sprite backed by a CPU pixel surface.
///
/// The sprite holds a [`Surface`] wrapper; whether the native buffer is
/// released with the sprite follows the wrapper's ownership flag, so a
/// surface wrapped without ownership transfer survives the sprite.
pub struct SoftwareSprite {
    pub x: i32,
    pub y: i32,
    pub depth: i32,
    surface: Surface,
}

impl SoftwareSprite {
    /// Wraps a decoded pixel surface. Ownership of the native buffer follows
    /// `surface`: pass an owned surface to have the sprite release it, a
    /// borrowed one to leave the buffer with its current owner.
    pub fn new(surface: Surface) -> Self {
        SoftwareSprite {
            x: 0,
            y: 0,
            depth: 0,
            surface,
        }
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut Surface {
        &mut self.surface
    }

    /// Whether destroying the sprite releases the native pixel buffer.
    pub fn owns_surface(&self) -> bool {
        self.surface.is_owned()
    }

    /// Releases the pixel buffer if owned. Idempotent; the eventual drop is
    /// then a no-op.
    pub fn destroy(&mut self) {
        self.surface.destroy();
    }
}

impl Sprite for SoftwareSprite {
    fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    fn set_position(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
    }

    fn depth(&self) -> i32 {
        self.depth
    }

    fn set_depth(&mut self, depth: i32) {
        self.depth = depth;
    }

    fn size(&self) -> (u32, u32) {
        self.surface.size()
    }
}

impl fmt::Debug for SoftwareSprite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SoftwareSprite")
            .field("position", &(self.x, self.y))
            .field("depth", &self.depth)
            .field("size", &self.size())
            .field("bpp", &self.surface.bits_per_pixel())
            .finish()
    }
}

/// A sprite backed by a GPU-resident texture.
///
/// The constructor queries the texture's format, access mode, and size once;
/// the cached size is authoritative for the sprite's lifetime. The texture
/// is exclusively owned and destroyed exactly once.
pub struct TextureSprite {
    pub x: i32,
    pub y: i32,
    pub depth: i32,
    texture: *mut SDL_Texture,
    size: (u32, u32),
    format: u32,
    access: TextureAccess,
}

impl TextureSprite {
    /// Takes ownership of a native texture handle.
    ///
    /// # Returns
    ///
    /// * `Err(Error::InvalidInput)` for a null handle.
    /// * `Err(Error::Sdl)` if the size query fails; the handle is released
    ///   before returning, so no resource leaks from the failed
    ///   construction.
    pub fn from_raw(texture: *mut SDL_Texture) -> Result<Self> {
        if texture.is_null() {
            return Err(Error::InvalidInput("texture handle is null"));
        }
        let mut format: u32 = 0;
        let mut access: c_int = 0;
        let (mut w, mut h): (c_int, c_int) = (0, 0);
        // SAFETY: non-null texture handle and valid out-pointers.
        let status = unsafe {
            sdl2_sys::SDL_QueryTexture(texture, &mut format, &mut access, &mut w, &mut h)
        };
        if status < 0 {
            let err = Error::sdl("SDL_QueryTexture");
            // SAFETY: ownership was transferred to us; release the handle so
            // the failed construction leaks nothing.
            unsafe { sdl2_sys::SDL_DestroyTexture(texture) };
            return Err(err);
        }
        let access = if access == SDL_TextureAccess::SDL_TEXTUREACCESS_STREAMING as c_int {
            TextureAccess::Streaming
        } else {
            TextureAccess::Static
        };
        Ok(TextureSprite {
            x: 0,
            y: 0,
            depth: 0,
            texture,
            size: (w as u32, h as u32),
            format,
            access,
        })
    }

    /// The raw texture handle. The handle stays owned by this sprite and is
    /// never shared between sprites.
    #[inline]
    pub fn texture(&self) -> *mut SDL_Texture {
        self.texture
    }

    /// The native pixel format value reported at construction.
    pub fn format(&self) -> u32 {
        self.format
    }

    pub fn access(&self) -> TextureAccess {
        self.access
    }

    /// Destroys the texture. Idempotent; the eventual drop is then a no-op.
    pub fn destroy(&mut self) {
        if !self.texture.is_null() {
            trace!("Destroying texture {:p}.", self.texture);
            // SAFETY: non-null handle owned by self, released exactly once.
            unsafe { sdl2_sys::SDL_DestroyTexture(self.texture) };
            self.texture = ptr::null_mut();
        }
    }
}

impl Sprite for TextureSprite {
    fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    fn set_position(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
    }

    fn depth(&self) -> i32 {
        self.depth
    }

    fn set_depth(&mut self, depth: i32) {
        self.depth = depth;
    }

    /// The size cached at construction; never re-queried.
    fn size(&self) -> (u32, u32) {
        self.size
    }
}

impl fmt::Debug for TextureSprite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextureSprite")
            .field("position", &(self.x, self.y))
            .field("depth", &self.depth)
            .field("size", &self.size)
            .field("format", &self.format)
            .field("access", &self.access)
            .finish()
    }
}

impl Drop for TextureSprite {
    fn drop(&mut self) {
        self.destroy();
    }
}
