// src/render/mod.rs

//! The sprite/rendering core: render contexts, the sprite object model, the
//! sprite factory, and the render systems that draw sorted sprite batches.

pub mod context;
pub mod factory;
pub mod sprite;
pub mod system;

#[cfg(test)]
mod tests;

pub use context::{BlendMode, RenderContext, RenderTarget, RendererFlags, TextureSource};
pub use factory::{AnySprite, FactoryConfig, SpriteBackend, SpriteFactory, SpriteOptions};
pub use sprite::{PixelFormat, SoftwareSprite, Sprite, TextureAccess, TextureSprite};
pub use system::{
    SoftwareSpriteRenderer, SpriteRenderSystem, SpriteRendererKind, TextureSpriteRenderer,
};
