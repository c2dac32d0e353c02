// src/video/surface.rs

//! Owning and borrowed wrappers around native `SDL_Surface` pixel buffers.
//!
//! A `Surface` either owns its native buffer (blank allocations, decoded
//! bitmaps) or borrows one owned elsewhere (a window's backing surface, or a
//! caller-owned buffer wrapped without ownership transfer). Owned buffers
//! are freed exactly once (on explicit [`Surface::destroy`] or on drop) and
//! borrowed ones are never freed here.

use crate::color::Color;
use crate::error::{Error, Result};
use crate::geometry::{Point, Rect};

use libc::{c_char, c_int, c_void};
use log::{debug, info, trace, warn};
use sdl2_sys::{SDL_Rect, SDL_Surface};
use std::ffi::CString;
use std::path::Path;
use std::ptr;

#[derive(Debug)]
pub struct Surface {
    ptr: *mut SDL_Surface,
    owned: bool,
}

impl Surface {
    /// Allocates a blank surface of the given size and bit depth.
    ///
    /// `masks` are explicit RGBA channel bit masks; `None` passes all-zero
    /// masks and lets the native library infer a format for the depth (at
    /// 32 bpp that inferred format has no alpha channel).
    ///
    /// # Returns
    ///
    /// * `Err(Error::Sdl)` if the native allocation returns null.
    pub fn new(width: u32, height: u32, bpp: u32, masks: Option<[u32; 4]>) -> Result<Self> {
        super::init()?;
        let [rmask, gmask, bmask, amask] = masks.unwrap_or([0; 4]);
        // SAFETY: plain allocation call; every parameter combination is safe
        // to pass and failures are reported as a null return.
        let ptr = unsafe {
            sdl2_sys::SDL_CreateRGBSurface(
                0,
                width as c_int,
                height as c_int,
                bpp as c_int,
                rmask,
                gmask,
                bmask,
                amask,
            )
        };
        if ptr.is_null() {
            return Err(Error::sdl("SDL_CreateRGBSurface"));
        }
        debug!("Allocated {}x{} surface ({} bpp) at {:p}.", width, height, bpp, ptr);
        Ok(Surface { ptr, owned: true })
    }

    /// Decodes a bitmap file into a new owned surface.
    pub fn from_bmp_file(path: &Path) -> Result<Self> {
        let path_str = path
            .to_str()
            .ok_or(Error::InvalidInput("bitmap path is not valid UTF-8"))?;
        let cpath = CString::new(path_str)
            .map_err(|_| Error::InvalidInput("bitmap path contains an interior NUL byte"))?;
        super::init()?;
        // SAFETY: both strings are valid and NUL-terminated.
        let rw = unsafe {
            sdl2_sys::SDL_RWFromFile(cpath.as_ptr(), b"rb\0".as_ptr() as *const c_char)
        };
        if rw.is_null() {
            return Err(Error::sdl("SDL_RWFromFile"));
        }
        // SAFETY: rw is a valid stream; freesrc=1 releases it even when the
        // decode fails.
        let ptr = unsafe { sdl2_sys::SDL_LoadBMP_RW(rw, 1) };
        if ptr.is_null() {
            return Err(Error::sdl("SDL_LoadBMP_RW"));
        }
        info!("Decoded bitmap {} at {:p}.", path.display(), ptr);
        Ok(Surface { ptr, owned: true })
    }

    /// Decodes an in-memory bitmap byte stream into a new owned surface.
    pub fn from_bmp_bytes(data: &[u8]) -> Result<Self> {
        if data.is_empty() {
            return Err(Error::InvalidInput("bitmap byte stream is empty"));
        }
        super::init()?;
        // SAFETY: the stream only lives for this call and `data` outlives it.
        let rw = unsafe {
            sdl2_sys::SDL_RWFromConstMem(data.as_ptr() as *const c_void, data.len() as c_int)
        };
        if rw.is_null() {
            return Err(Error::sdl("SDL_RWFromConstMem"));
        }
        // SAFETY: rw is a valid stream; freesrc=1 releases it on all paths.
        let ptr = unsafe { sdl2_sys::SDL_LoadBMP_RW(rw, 1) };
        if ptr.is_null() {
            return Err(Error::sdl("SDL_LoadBMP_RW"));
        }
        debug!("Decoded {}-byte bitmap stream at {:p}.", data.len(), ptr);
        Ok(Surface { ptr, owned: true })
    }

    /// Wraps a native surface owned elsewhere; the wrapper never frees it.
    pub(crate) fn borrowed(ptr: *mut SDL_Surface) -> Self {
        Surface { ptr, owned: false }
    }

    /// The surface size in pixels, or `(0, 0)` after destruction.
    pub fn size(&self) -> (u32, u32) {
        if self.ptr.is_null() {
            return (0, 0);
        }
        // SAFETY: non-null surface pointers reference a live SDL_Surface.
        unsafe { ((*self.ptr).w as u32, (*self.ptr).h as u32) }
    }

    /// Bits per pixel of the surface's format.
    pub fn bits_per_pixel(&self) -> u32 {
        if self.ptr.is_null() {
            return 0;
        }
        // SAFETY: live surface; `format` is always a valid pointer.
        unsafe { (*(*self.ptr).format).BitsPerPixel as u32 }
    }

    /// Whether the surface's pixel format carries an alpha channel.
    pub fn has_alpha(&self) -> bool {
        if self.ptr.is_null() {
            return false;
        }
        // SAFETY: live surface; `format` is always a valid pointer.
        unsafe { (*(*self.ptr).format).Amask != 0 }
    }

    /// Maps a color into the surface's pixel format: the RGBA mapping when
    /// the format has an alpha channel, the RGB-only mapping otherwise.
    pub fn map_color(&self, color: Color) -> u32 {
        if self.ptr.is_null() {
            warn!("map_color called on a destroyed surface.");
            return 0;
        }
        // SAFETY: live surface and format pointer.
        unsafe {
            let format = (*self.ptr).format;
            if (*format).Amask != 0 {
                sdl2_sys::SDL_MapRGBA(format, color.r, color.g, color.b, color.a)
            } else {
                sdl2_sys::SDL_MapRGB(format, color.r, color.g, color.b)
            }
        }
    }

    /// Fills the entire surface with a color.
    pub fn fill(&mut self, color: Color) -> Result<()> {
        self.fill_rect(None, color)
    }

    /// Fills a rectangular area (or the whole surface) with a color, mapped
    /// through the surface's pixel format.
    pub fn fill_rect(&mut self, rect: Option<Rect>, color: Color) -> Result<()> {
        if self.ptr.is_null() {
            return Err(Error::InvalidInput("surface has been destroyed"));
        }
        let pixel = self.map_color(color);
        let native = rect.map(SDL_Rect::from);
        let rect_ptr = native
            .as_ref()
            .map_or(ptr::null(), |r| r as *const SDL_Rect);
        // SAFETY: live surface; the optional rect pointer is valid for the
        // duration of the call.
        let status = unsafe { sdl2_sys::SDL_FillRect(self.ptr, rect_ptr, pixel) };
        if status < 0 {
            return Err(Error::sdl("SDL_FillRect"));
        }
        Ok(())
    }

    /// Blits this surface onto `dst` with its top-left corner at `position`
    /// (anything convertible to a [`Point`]). The native library clips
    /// against the destination bounds and converts between pixel formats as
    /// needed.
    pub fn blit_to(&self, dst: &mut Surface, position: impl Into<Point>) -> Result<()> {
        if self.ptr.is_null() || dst.ptr.is_null() {
            return Err(Error::InvalidInput("surface has been destroyed"));
        }
        let position = position.into();
        let mut dstrect = SDL_Rect {
            x: position.x,
            y: position.y,
            w: 0,
            h: 0,
        };
        trace!("Blitting {:p} -> {:p} at {:?}.", self.ptr, dst.ptr, position);
        // SAFETY: both surfaces are live; the rect is a valid out-parameter.
        let status =
            unsafe { sdl2_sys::SDL_UpperBlit(self.ptr, ptr::null(), dst.ptr, &mut dstrect) };
        if status < 0 {
            return Err(Error::sdl("SDL_UpperBlit"));
        }
        Ok(())
    }

    /// Reads one pixel back as a color. Mainly useful for verification; this
    /// is not a fast path.
    pub fn read_pixel(&self, x: u32, y: u32) -> Result<Color> {
        if self.ptr.is_null() {
            return Err(Error::InvalidInput("surface has been destroyed"));
        }
        let (w, h) = self.size();
        if x >= w || y >= h {
            return Err(Error::InvalidInput("pixel coordinates out of bounds"));
        }
        // SAFETY: bounds checked above; pitch and BytesPerPixel describe the
        // pixel buffer layout, and reads are unaligned-safe.
        unsafe {
            let format = (*self.ptr).format;
            let bytes = (*format).BytesPerPixel as usize;
            let pitch = (*self.ptr).pitch as usize;
            let base = (*self.ptr).pixels as *const u8;
            let p = base.add(y as usize * pitch + x as usize * bytes);
            let raw = match bytes {
                1 => u32::from(*p),
                2 => u32::from((p as *const u16).read_unaligned()),
                3 => {
                    u32::from(*p) | (u32::from(*p.add(1)) << 8) | (u32::from(*p.add(2)) << 16)
                }
                _ => (p as *const u32).read_unaligned(),
            };
            let (mut r, mut g, mut b, mut a) = (0u8, 0u8, 0u8, 0u8);
            sdl2_sys::SDL_GetRGBA(raw, format, &mut r, &mut g, &mut b, &mut a);
            Ok(Color::rgba(r, g, b, a))
        }
    }

    /// Whether this wrapper owns (and will eventually free) the native
    /// buffer.
    #[inline]
    pub fn is_owned(&self) -> bool {
        self.owned
    }

    /// The raw native handle. The handle stays owned by this wrapper.
    #[inline]
    pub fn raw(&self) -> *mut SDL_Surface {
        self.ptr
    }

    /// Transfers ownership of the native handle to the caller, who becomes
    /// responsible for freeing it.
    pub fn into_raw(mut self) -> *mut SDL_Surface {
        let ptr = self.ptr;
        self.ptr = ptr::null_mut();
        ptr
    }

    /// Releases the native buffer if owned. Idempotent: later calls (and the
    /// eventual drop) are no-ops.
    pub fn destroy(&mut self) {
        if !self.ptr.is_null() {
            if self.owned {
                trace!("Freeing surface {:p}.", self.ptr);
                // SAFETY: owned non-null surface, freed exactly once.
                unsafe { sdl2_sys::SDL_FreeSurface(self.ptr) };
            }
            self.ptr = ptr::null_mut();
        }
    }
}

impl Drop for Surface {
    fn drop(&mut self) {
        self.destroy();
    }
}
