// src/config.rs

//! Configuration structures for window and renderer creation.
//!
//! These structs deserialize from JSON so applications can keep their video
//! setup in a config file. Every field has a sensible default; a partial
//! document only overrides what it names.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::render::context::RendererFlags;

/// Top-level configuration, grouping window and renderer settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub renderer: RendererConfig,
}

impl Config {
    /// Parses a configuration from a JSON document.
    pub fn from_json_str(document: &str) -> Result<Self> {
        Ok(serde_json::from_str(document)?)
    }

    /// Loads a configuration from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let document = fs::read_to_string(path)?;
        Self::from_json_str(&document)
    }
}

/// Initial placement of a window on the desktop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum WindowPosition {
    /// Centered on the primary display.
    #[default]
    Centered,
    /// Let the window manager decide.
    Undefined,
    /// An explicit top-left position in desktop coordinates.
    At(i32, i32),
}

/// Settings for window creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    /// Width of the client area in pixels.
    pub width: u32,
    /// Height of the client area in pixels.
    pub height: u32,
    pub position: WindowPosition,
    pub resizable: bool,
    /// Create the window hidden; call `Window::show` to reveal it.
    pub hidden: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        WindowConfig {
            title: "sprite-core".to_string(),
            width: 800,
            height: 600,
            position: WindowPosition::Centered,
            resizable: false,
            hidden: false,
        }
    }
}

/// Settings for hardware renderer creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Index of the rendering driver to use, or `None` for the first one
    /// that supports the requested flags.
    pub index: Option<u32>,
    pub accelerated: bool,
    pub vsync: bool,
    /// Request support for rendering into textures.
    pub target_texture: bool,
}

impl Default for RendererConfig {
    fn default() -> Self {
        RendererConfig {
            index: None,
            accelerated: true,
            vsync: false,
            target_texture: false,
        }
    }
}

impl RendererConfig {
    /// The renderer-creation flag set this configuration asks for.
    pub fn flags(&self) -> RendererFlags {
        let mut flags = RendererFlags::empty();
        if self.accelerated {
            flags |= RendererFlags::ACCELERATED;
        }
        if self.vsync {
            flags |= RendererFlags::PRESENT_VSYNC;
        }
        if self.target_texture {
            flags |= RendererFlags::TARGET_TEXTURE;
        }
        flags
    }
}
