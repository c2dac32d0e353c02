// src/video/mod.rs

//! One-time initialization of the native video subsystem and the owning
//! wrappers around its window and surface handles.
//!
//! SDL requires `SDL_Init` before any video call and tolerates it exactly
//! once per process; the guard here makes initialization idempotent and
//! thread-safe. The subsystem is never shut down. It lives for the process,
//! like any other process-wide native connection.

pub mod surface;
pub mod window;

pub use surface::Surface;
pub use window::Window;

use crate::error::{Error, Result};
use log::{debug, info};
use once_cell::sync::OnceCell;
use std::ffi::CStr;

static VIDEO: OnceCell<VideoSubsystem> = OnceCell::new();

/// Token proving the native video subsystem has been initialized.
///
/// Handed out by [`init`]; holding a reference is the precondition for every
/// window, surface, and renderer constructor (they call [`init`] themselves,
/// so applications rarely need to).
#[derive(Debug)]
pub struct VideoSubsystem {
    _private: (),
}

impl VideoSubsystem {
    /// Whether the native video subsystem reports itself as initialized.
    pub fn is_active(&self) -> bool {
        // SAFETY: plain query call, valid at any time.
        unsafe { sdl2_sys::SDL_WasInit(sdl2_sys::SDL_INIT_VIDEO) & sdl2_sys::SDL_INIT_VIDEO != 0 }
    }
}

/// Initializes the SDL video subsystem exactly once per process.
///
/// Subsequent calls return the same token without touching the native
/// library. The driver is chosen by SDL (the `SDL_VIDEODRIVER` environment
/// variable is honored, which is how the test suite runs headless).
///
/// # Returns
///
/// * `Ok(&VideoSubsystem)` once the subsystem is up.
/// * `Err(Error::Sdl)` if `SDL_Init` fails.
pub fn init() -> Result<&'static VideoSubsystem> {
    VIDEO.get_or_try_init(|| {
        info!("Initializing SDL video subsystem.");
        // SAFETY: first SDL call in the process; SDL_Init is safe to call
        // from any thread before other SDL use.
        let status = unsafe { sdl2_sys::SDL_Init(sdl2_sys::SDL_INIT_VIDEO) };
        if status < 0 {
            return Err(Error::sdl("SDL_Init"));
        }
        debug!("SDL video subsystem ready.");
        Ok(VideoSubsystem { _private: () })
    })
}

/// Snapshot of the native library's last-error text.
///
/// The buffer is overwritten by later native calls, so backend errors
/// capture it immediately at the failure site (see [`Error::sdl`]).
pub fn last_error() -> String {
    // SAFETY: SDL_GetError always returns a valid, possibly empty, C string.
    unsafe {
        let ptr = sdl2_sys::SDL_GetError();
        if ptr.is_null() {
            String::new()
        } else {
            CStr::from_ptr(ptr).to_string_lossy().into_owned()
        }
    }
}
