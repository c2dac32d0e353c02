// src/render/context.rs

//! `RenderContext`: an owning wrapper around a native renderer bound to one
//! draw target for its whole lifetime.
//!
//! Window targets get a hardware-accelerated renderer; surface targets get a
//! software renderer drawing straight into the surface's pixels. The context
//! owns only the renderer, so destroying the context destroys the renderer
//! and never the target.

use crate::color::Color;
use crate::config::RendererConfig;
use crate::error::{Error, Result};
use crate::geometry::{self, Rect};
use crate::render::sprite::TextureSprite;
use crate::video::{Surface, Window};

use bitflags::bitflags;
use libc::c_int;
use log::{debug, info, trace, warn};
use sdl2_sys::{SDL_BlendMode, SDL_Rect, SDL_Renderer, SDL_Texture};
use std::ptr;

bitflags! {
    /// Renderer-creation flags, mirroring the native `SDL_RENDERER_*` bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RendererFlags: u32 {
        const SOFTWARE = 0x0000_0001;
        const ACCELERATED = 0x0000_0002;
        const PRESENT_VSYNC = 0x0000_0004;
        const TARGET_TEXTURE = 0x0000_0008;
    }
}

/// Blend mode used for drawing operations (fill and line).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    None,
    Blend,
    Add,
    Mod,
    Mul,
}

impl BlendMode {
    fn to_native(self) -> SDL_BlendMode {
        match self {
            BlendMode::None => SDL_BlendMode::SDL_BLENDMODE_NONE,
            BlendMode::Blend => SDL_BlendMode::SDL_BLENDMODE_BLEND,
            BlendMode::Add => SDL_BlendMode::SDL_BLENDMODE_ADD,
            BlendMode::Mod => SDL_BlendMode::SDL_BLENDMODE_MOD,
            BlendMode::Mul => SDL_BlendMode::SDL_BLENDMODE_MUL,
        }
    }

    fn from_native(mode: SDL_BlendMode) -> Result<Self> {
        match mode {
            SDL_BlendMode::SDL_BLENDMODE_NONE => Ok(BlendMode::None),
            SDL_BlendMode::SDL_BLENDMODE_BLEND => Ok(BlendMode::Blend),
            SDL_BlendMode::SDL_BLENDMODE_ADD => Ok(BlendMode::Add),
            SDL_BlendMode::SDL_BLENDMODE_MOD => Ok(BlendMode::Mod),
            SDL_BlendMode::SDL_BLENDMODE_MUL => Ok(BlendMode::Mul),
            _ => Err(Error::InvalidInput("unrecognized blend mode")),
        }
    }
}

/// The draw target a [`RenderContext`] binds to at construction.
///
/// The caller picks the variant explicitly; there is no runtime sniffing of
/// handle types.
pub enum RenderTarget<'a> {
    /// A window; rendering goes through the hardware path.
    Window(&'a Window),
    /// An offscreen surface; rendering uses the software path and writes
    /// directly into the surface's pixels.
    Surface(&'a mut Surface),
}

/// The source of a texture copy operation.
pub enum TextureSource<'a> {
    Sprite(&'a TextureSprite),
    Raw(*mut SDL_Texture),
}

/// Owning wrapper around a native renderer bound to one draw target.
#[derive(Debug)]
pub struct RenderContext {
    ptr: *mut SDL_Renderer,
}

/// Restores the previous draw color when dropped, so a temporary color swap
/// survives every exit path of the draw call it wraps.
struct DrawColorGuard<'a> {
    context: &'a RenderContext,
    previous: Color,
}

impl<'a> DrawColorGuard<'a> {
    fn swap(context: &'a RenderContext, color: Color) -> Result<Self> {
        let previous = context.color()?;
        context.set_color(color)?;
        Ok(DrawColorGuard { context, previous })
    }
}

impl Drop for DrawColorGuard<'_> {
    fn drop(&mut self) {
        if let Err(err) = self.context.set_color(self.previous) {
            warn!("Failed to restore draw color: {}", err);
        }
    }
}

impl RenderContext {
    /// Creates a renderer bound to the given target.
    ///
    /// Window targets honor the [`RendererConfig`]'s driver index and flags;
    /// surface targets always use the software renderer and ignore both.
    ///
    /// # Returns
    ///
    /// * `Err(Error::Sdl)` if the native renderer cannot be created.
    pub fn new(target: RenderTarget<'_>, config: &RendererConfig) -> Result<Self> {
        crate::video::init()?;
        let (ptr, call) = match target {
            RenderTarget::Window(window) => {
                let index = config.index.map_or(-1, |i| i as c_int);
                info!(
                    "Creating renderer for window {:p} (index {}, flags {:?}).",
                    window.raw(),
                    index,
                    config.flags()
                );
                // SAFETY: the window handle is valid for the duration of the
                // borrow.
                let ptr = unsafe {
                    sdl2_sys::SDL_CreateRenderer(window.raw(), index, config.flags().bits())
                };
                (ptr, "SDL_CreateRenderer")
            }
            RenderTarget::Surface(surface) => {
                info!("Creating software renderer for surface {:p}.", surface.raw());
                // SAFETY: the surface handle is valid for the duration of the
                // borrow.
                let ptr = unsafe { sdl2_sys::SDL_CreateSoftwareRenderer(surface.raw()) };
                (ptr, "SDL_CreateSoftwareRenderer")
            }
        };
        if ptr.is_null() {
            return Err(Error::sdl(call));
        }
        debug!("Renderer created: {:p}", ptr);
        Ok(RenderContext { ptr })
    }

    /// Hardware renderer for a window.
    pub fn with_window(window: &Window, config: &RendererConfig) -> Result<Self> {
        Self::new(RenderTarget::Window(window), config)
    }

    /// Software renderer for an offscreen surface.
    pub fn with_surface(surface: &mut Surface) -> Result<Self> {
        Self::new(RenderTarget::Surface(surface), &RendererConfig::default())
    }

    /// The current draw color.
    pub fn color(&self) -> Result<Color> {
        let (mut r, mut g, mut b, mut a) = (0u8, 0u8, 0u8, 0u8);
        // SAFETY: live renderer and valid out-pointers.
        let status = unsafe {
            sdl2_sys::SDL_GetRenderDrawColor(self.ptr, &mut r, &mut g, &mut b, &mut a)
        };
        if status < 0 {
            return Err(Error::sdl("SDL_GetRenderDrawColor"));
        }
        Ok(Color::rgba(r, g, b, a))
    }

    /// Sets the draw color used by `clear` and the primitive draws.
    pub fn set_color(&self, color: Color) -> Result<()> {
        // SAFETY: live renderer.
        let status = unsafe {
            sdl2_sys::SDL_SetRenderDrawColor(self.ptr, color.r, color.g, color.b, color.a)
        };
        if status < 0 {
            return Err(Error::sdl("SDL_SetRenderDrawColor"));
        }
        Ok(())
    }

    /// The blend mode applied to drawing operations.
    pub fn blend_mode(&self) -> Result<BlendMode> {
        let mut mode = SDL_BlendMode::SDL_BLENDMODE_NONE;
        // SAFETY: live renderer and a valid out-pointer.
        let status = unsafe { sdl2_sys::SDL_GetRenderDrawBlendMode(self.ptr, &mut mode) };
        if status < 0 {
            return Err(Error::sdl("SDL_GetRenderDrawBlendMode"));
        }
        BlendMode::from_native(mode)
    }

    pub fn set_blend_mode(&self, mode: BlendMode) -> Result<()> {
        // SAFETY: live renderer.
        let status =
            unsafe { sdl2_sys::SDL_SetRenderDrawBlendMode(self.ptr, mode.to_native()) };
        if status < 0 {
            return Err(Error::sdl("SDL_SetRenderDrawBlendMode"));
        }
        Ok(())
    }

    /// Clears the whole target with the current draw color, or with `color`
    /// for just this call. A temporary color is restored on every exit path,
    /// including a failing native clear.
    pub fn clear(&self, color: Option<Color>) -> Result<()> {
        let _restore = match color {
            Some(c) => Some(DrawColorGuard::swap(self, c)?),
            None => None,
        };
        // SAFETY: live renderer.
        let status = unsafe { sdl2_sys::SDL_RenderClear(self.ptr) };
        if status < 0 {
            return Err(Error::sdl("SDL_RenderClear"));
        }
        Ok(())
    }

    /// Copies a texture into the target.
    ///
    /// `srcrect` selects a portion of the texture (`None` for all of it);
    /// `dstrect` positions and scales it on the target (`None` stretches
    /// over the whole target).
    pub fn copy(
        &self,
        src: TextureSource<'_>,
        srcrect: Option<Rect>,
        dstrect: Option<Rect>,
    ) -> Result<()> {
        let texture = match src {
            TextureSource::Sprite(sprite) => sprite.texture(),
            TextureSource::Raw(raw) => raw,
        };
        if texture.is_null() {
            return Err(Error::InvalidInput("source texture handle is null"));
        }
        let src_native = srcrect.map(SDL_Rect::from);
        let dst_native = dstrect.map(SDL_Rect::from);
        let src_ptr = src_native
            .as_ref()
            .map_or(ptr::null(), |r| r as *const SDL_Rect);
        let dst_ptr = dst_native
            .as_ref()
            .map_or(ptr::null(), |r| r as *const SDL_Rect);
        // SAFETY: live renderer and texture; rect pointers are valid for the
        // duration of the call.
        let status = unsafe { sdl2_sys::SDL_RenderCopy(self.ptr, texture, src_ptr, dst_ptr) };
        if status < 0 {
            return Err(Error::sdl("SDL_RenderCopy"));
        }
        Ok(())
    }

    /// Presents the backbuffer. On a software renderer this is a no-op; the
    /// target surface already holds the drawn pixels.
    pub fn present(&self) {
        trace!("Presenting frame on renderer {:p}.", self.ptr);
        // SAFETY: live renderer.
        unsafe { sdl2_sys::SDL_RenderPresent(self.ptr) };
    }

    /// Draws one line (4 values: `x1, y1, x2, y2`) or a connected batch
    /// (any multiple of 4 values). The batch path marshals all points into
    /// one contiguous native array and issues a single batched call.
    ///
    /// An optional color applies only to this call; the previous draw color
    /// is restored on every exit path.
    pub fn draw_line(&self, points: &[i32], color: Option<Color>) -> Result<()> {
        let batch = geometry::line_points_from_flat(points)?;
        let _restore = match color {
            Some(c) => Some(DrawColorGuard::swap(self, c)?),
            None => None,
        };
        if points.len() == 4 {
            // SAFETY: live renderer.
            let status = unsafe {
                sdl2_sys::SDL_RenderDrawLine(self.ptr, points[0], points[1], points[2], points[3])
            };
            if status < 0 {
                return Err(Error::sdl("SDL_RenderDrawLine"));
            }
        } else {
            // SAFETY: live renderer; `batch` is a contiguous native array.
            let status = unsafe {
                sdl2_sys::SDL_RenderDrawLines(self.ptr, batch.as_ptr(), batch.len() as c_int)
            };
            if status < 0 {
                return Err(Error::sdl("SDL_RenderDrawLines"));
            }
        }
        Ok(())
    }

    /// Draws one point (2 values: `x, y`) or a batch (any multiple of 2
    /// values), with the same marshaling and color-restore discipline as
    /// [`RenderContext::draw_line`].
    pub fn draw_point(&self, points: &[i32], color: Option<Color>) -> Result<()> {
        let batch = geometry::points_from_flat(points)?;
        let _restore = match color {
            Some(c) => Some(DrawColorGuard::swap(self, c)?),
            None => None,
        };
        if points.len() == 2 {
            // SAFETY: live renderer.
            let status =
                unsafe { sdl2_sys::SDL_RenderDrawPoint(self.ptr, points[0], points[1]) };
            if status < 0 {
                return Err(Error::sdl("SDL_RenderDrawPoint"));
            }
        } else {
            // SAFETY: live renderer; `batch` is a contiguous native array.
            let status = unsafe {
                sdl2_sys::SDL_RenderDrawPoints(self.ptr, batch.as_ptr(), batch.len() as c_int)
            };
            if status < 0 {
                return Err(Error::sdl("SDL_RenderDrawPoints"));
            }
        }
        Ok(())
    }

    /// Draws rectangle outlines: the single-element slice uses the direct
    /// native call, larger batches are marshaled into one contiguous native
    /// array for a single batched call.
    pub fn draw_rect(&self, rects: &[Rect], color: Option<Color>) -> Result<()> {
        if rects.is_empty() {
            return Err(Error::InvalidInput("rectangle batch is empty"));
        }
        let _restore = match color {
            Some(c) => Some(DrawColorGuard::swap(self, c)?),
            None => None,
        };
        if rects.len() == 1 {
            let rect = SDL_Rect::from(rects[0]);
            // SAFETY: live renderer; rect pointer valid for the call.
            let status = unsafe { sdl2_sys::SDL_RenderDrawRect(self.ptr, &rect) };
            if status < 0 {
                return Err(Error::sdl("SDL_RenderDrawRect"));
            }
        } else {
            let batch = geometry::rects_to_native(rects);
            // SAFETY: live renderer; `batch` is a contiguous native array.
            let status = unsafe {
                sdl2_sys::SDL_RenderDrawRects(self.ptr, batch.as_ptr(), batch.len() as c_int)
            };
            if status < 0 {
                return Err(Error::sdl("SDL_RenderDrawRects"));
            }
        }
        Ok(())
    }

    /// Fills rectangular areas, with the same single/batch split as
    /// [`RenderContext::draw_rect`].
    pub fn fill(&self, rects: &[Rect], color: Option<Color>) -> Result<()> {
        if rects.is_empty() {
            return Err(Error::InvalidInput("rectangle batch is empty"));
        }
        let _restore = match color {
            Some(c) => Some(DrawColorGuard::swap(self, c)?),
            None => None,
        };
        if rects.len() == 1 {
            let rect = SDL_Rect::from(rects[0]);
            // SAFETY: live renderer; rect pointer valid for the call.
            let status = unsafe { sdl2_sys::SDL_RenderFillRect(self.ptr, &rect) };
            if status < 0 {
                return Err(Error::sdl("SDL_RenderFillRect"));
            }
        } else {
            let batch = geometry::rects_to_native(rects);
            // SAFETY: live renderer; `batch` is a contiguous native array.
            let status = unsafe {
                sdl2_sys::SDL_RenderFillRects(self.ptr, batch.as_ptr(), batch.len() as c_int)
            };
            if status < 0 {
                return Err(Error::sdl("SDL_RenderFillRects"));
            }
        }
        Ok(())
    }

    /// The raw native handle. The handle stays owned by this wrapper.
    #[inline]
    pub fn raw(&self) -> *mut SDL_Renderer {
        self.ptr
    }

    /// Destroys the native renderer. Idempotent; the bound target is never
    /// touched.
    pub fn destroy(&mut self) {
        if !self.ptr.is_null() {
            info!("Destroying renderer {:p}.", self.ptr);
            // SAFETY: non-null handle owned by self, released exactly once.
            unsafe { sdl2_sys::SDL_DestroyRenderer(self.ptr) };
            self.ptr = ptr::null_mut();
        }
    }
}

impl Drop for RenderContext {
    fn drop(&mut self) {
        self.destroy();
    }
}
