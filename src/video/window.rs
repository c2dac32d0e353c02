// src/video/window.rs

//! Owning wrapper around a native `SDL_Window` handle.

use super::surface::Surface;
use crate::config::{WindowConfig, WindowPosition};
use crate::error::{Error, Result};

use libc::{c_char, c_int};
use log::{debug, info, warn};
use sdl2_sys::{SDL_Window, SDL_WindowFlags};
use std::ffi::CString;
use std::ptr;

/// A top-level window, created from a [`WindowConfig`].
///
/// The window exclusively owns its native handle: destruction happens
/// exactly once, either through an explicit [`Window::destroy`] or on drop,
/// whichever comes first. The window's backing surface belongs to the
/// window; [`Window::surface`] hands out a borrowed view that is never
/// freed by the caller.
#[derive(Debug)]
pub struct Window {
    ptr: *mut SDL_Window,
}

fn position_to_native(position: WindowPosition) -> (c_int, c_int) {
    match position {
        WindowPosition::Centered => (
            sdl2_sys::SDL_WINDOWPOS_CENTERED_MASK as c_int,
            sdl2_sys::SDL_WINDOWPOS_CENTERED_MASK as c_int,
        ),
        WindowPosition::Undefined => (
            sdl2_sys::SDL_WINDOWPOS_UNDEFINED_MASK as c_int,
            sdl2_sys::SDL_WINDOWPOS_UNDEFINED_MASK as c_int,
        ),
        WindowPosition::At(x, y) => (x, y),
    }
}

impl Window {
    /// Creates a new window from the given configuration.
    ///
    /// Initializes the video subsystem if this is the first video call in
    /// the process.
    ///
    /// # Returns
    ///
    /// * `Ok(Window)` on success.
    /// * `Err(Error::InvalidInput)` if the title contains a NUL byte.
    /// * `Err(Error::Sdl)` if window creation fails natively.
    pub fn new(config: &WindowConfig) -> Result<Self> {
        let title = CString::new(config.title.as_str())
            .map_err(|_| Error::InvalidInput("window title contains an interior NUL byte"))?;
        super::init()?;
        let (x, y) = position_to_native(config.position);
        let mut flags = if config.hidden {
            SDL_WindowFlags::SDL_WINDOW_HIDDEN as u32
        } else {
            SDL_WindowFlags::SDL_WINDOW_SHOWN as u32
        };
        if config.resizable {
            flags |= SDL_WindowFlags::SDL_WINDOW_RESIZABLE as u32;
        }

        info!(
            "Creating window '{}' ({}x{}px).",
            config.title, config.width, config.height
        );
        // SAFETY: title is a valid NUL-terminated string and the video
        // subsystem is initialized.
        let ptr = unsafe {
            sdl2_sys::SDL_CreateWindow(
                title.as_ptr(),
                x,
                y,
                config.width as c_int,
                config.height as c_int,
                flags,
            )
        };
        if ptr.is_null() {
            return Err(Error::sdl("SDL_CreateWindow"));
        }
        debug!("Window created: {:p}", ptr);
        Ok(Window { ptr })
    }

    /// Convenience constructor for a default window with the given title and
    /// client-area size.
    pub fn with_title(title: &str, width: u32, height: u32) -> Result<Self> {
        let config = WindowConfig {
            title: title.to_string(),
            width,
            height,
            ..WindowConfig::default()
        };
        Self::new(&config)
    }

    /// Makes the window visible.
    pub fn show(&self) {
        if self.ptr.is_null() {
            warn!("show called on a destroyed window.");
            return;
        }
        // SAFETY: non-null window handle owned by self.
        unsafe { sdl2_sys::SDL_ShowWindow(self.ptr) };
    }

    /// Hides the window.
    pub fn hide(&self) {
        if self.ptr.is_null() {
            warn!("hide called on a destroyed window.");
            return;
        }
        // SAFETY: non-null window handle owned by self.
        unsafe { sdl2_sys::SDL_HideWindow(self.ptr) };
    }

    /// Sets the window title.
    pub fn set_title(&self, title: &str) -> Result<()> {
        if self.ptr.is_null() {
            return Err(Error::InvalidInput("window has been destroyed"));
        }
        let title = CString::new(title)
            .map_err(|_| Error::InvalidInput("window title contains an interior NUL byte"))?;
        // SAFETY: non-null window handle and a valid NUL-terminated string.
        unsafe { sdl2_sys::SDL_SetWindowTitle(self.ptr, title.as_ptr() as *const c_char) };
        Ok(())
    }

    /// The current client-area size in pixels.
    pub fn size(&self) -> (u32, u32) {
        if self.ptr.is_null() {
            return (0, 0);
        }
        let (mut w, mut h): (c_int, c_int) = (0, 0);
        // SAFETY: non-null window handle and valid out-pointers.
        unsafe { sdl2_sys::SDL_GetWindowSize(self.ptr, &mut w, &mut h) };
        (w as u32, h as u32)
    }

    /// A borrowed view of the window's backing surface.
    ///
    /// The surface is owned by the window and remains valid until the window
    /// is resized or destroyed; the returned wrapper never frees it.
    ///
    /// # Returns
    ///
    /// * `Err(Error::Sdl)` if the window has no surface (for example on a
    ///   purely hardware-accelerated video driver).
    pub fn surface(&self) -> Result<Surface> {
        if self.ptr.is_null() {
            return Err(Error::InvalidInput("window has been destroyed"));
        }
        // SAFETY: non-null window handle owned by self.
        let ptr = unsafe { sdl2_sys::SDL_GetWindowSurface(self.ptr) };
        if ptr.is_null() {
            return Err(Error::sdl("SDL_GetWindowSurface"));
        }
        Ok(Surface::borrowed(ptr))
    }

    /// Copies the window surface to the screen.
    pub fn update_surface(&self) -> Result<()> {
        if self.ptr.is_null() {
            return Err(Error::InvalidInput("window has been destroyed"));
        }
        // SAFETY: non-null window handle owned by self.
        let status = unsafe { sdl2_sys::SDL_UpdateWindowSurface(self.ptr) };
        if status < 0 {
            return Err(Error::sdl("SDL_UpdateWindowSurface"));
        }
        Ok(())
    }

    /// The raw native handle, for interop with lower-level calls. The handle
    /// stays owned by this wrapper.
    #[inline]
    pub fn raw(&self) -> *mut SDL_Window {
        self.ptr
    }

    /// Destroys the native window. Idempotent: later calls (and the eventual
    /// drop) are no-ops.
    pub fn destroy(&mut self) {
        if !self.ptr.is_null() {
            info!("Destroying window {:p}.", self.ptr);
            // SAFETY: non-null handle owned by self, released exactly once.
            unsafe { sdl2_sys::SDL_DestroyWindow(self.ptr) };
            self.ptr = ptr::null_mut();
        }
    }
}

impl Drop for Window {
    fn drop(&mut self) {
        self.destroy();
    }
}
