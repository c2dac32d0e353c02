// src/render/tests.rs

//! Integration tests for the rendering core, run headless on SDL's dummy
//! video driver.

use crate::color::Color;
use crate::error::{Error, Result};
use crate::geometry::Rect;
use crate::render::context::{BlendMode, RenderContext};
use crate::render::factory::{FactoryConfig, SpriteBackend, SpriteFactory, SpriteOptions};
use crate::render::sprite::{Sprite, SoftwareSprite, TextureAccess};
use crate::render::system::{
    SoftwareSpriteRenderer, SpriteRenderSystem, SpriteRendererKind, TextureSpriteRenderer,
};
use crate::video::{testutil, Surface, Window};
use std::rc::Rc;
use test_log::test;

/// RGBA8888 channel masks for an alpha-capable 32 bpp surface.
const RGBA_MASKS: [u32; 4] = [0xFF00_0000, 0x00FF_0000, 0x0000_FF00, 0x0000_00FF];

/// A 2x2 all-red 24-bit bitmap, byte for byte.
fn tiny_bmp() -> Vec<u8> {
    let mut bmp = Vec::new();
    bmp.extend_from_slice(b"BM");
    bmp.extend_from_slice(&70u32.to_le_bytes()); // file size: 14 + 40 + 16
    bmp.extend_from_slice(&0u32.to_le_bytes()); // reserved
    bmp.extend_from_slice(&54u32.to_le_bytes()); // pixel data offset
    bmp.extend_from_slice(&40u32.to_le_bytes()); // info header size
    bmp.extend_from_slice(&2i32.to_le_bytes()); // width
    bmp.extend_from_slice(&2i32.to_le_bytes()); // height
    bmp.extend_from_slice(&1u16.to_le_bytes()); // planes
    bmp.extend_from_slice(&24u16.to_le_bytes()); // bits per pixel
    bmp.extend_from_slice(&0u32.to_le_bytes()); // compression: none
    bmp.extend_from_slice(&16u32.to_le_bytes()); // image data size
    bmp.extend_from_slice(&0u32.to_le_bytes()); // x pixels per meter
    bmp.extend_from_slice(&0u32.to_le_bytes()); // y pixels per meter
    bmp.extend_from_slice(&0u32.to_le_bytes()); // colors used
    bmp.extend_from_slice(&0u32.to_le_bytes()); // important colors
    for _ in 0..2 {
        // One bottom-up row: two BGR pixels plus padding to 4 bytes.
        bmp.extend_from_slice(&[0, 0, 255, 0, 0, 255, 0, 0]);
    }
    bmp
}

fn alpha_software_factory() -> SpriteFactory {
    SpriteFactory::new(
        SpriteBackend::Software,
        FactoryConfig {
            masks: Some(RGBA_MASKS),
            ..FactoryConfig::default()
        },
    )
    .unwrap()
}

fn colored_sprite(
    factory: &SpriteFactory,
    color: Color,
    size: (u32, u32),
    depth: i32,
) -> SoftwareSprite {
    let mut sprite = factory
        .from_color(color, size)
        .unwrap()
        .into_software()
        .unwrap();
    sprite.depth = depth;
    sprite
}

// --- Sprite model ---

#[test]
fn software_sprite_size_round_trips() {
    let _video = testutil::lock_dummy_video();
    let factory = SpriteFactory::software();
    let sprite = factory.create_software_sprite((23, 17)).unwrap();
    assert_eq!(sprite.size(), (23, 17));
    assert!(sprite.owns_surface());
}

#[test]
fn area_is_position_plus_size_for_both_backends() {
    let _video = testutil::lock_dummy_video();

    let factory = SpriteFactory::software();
    let mut soft = factory.create_software_sprite((16, 8)).unwrap();
    soft.set_position(5, 7);
    assert_eq!(soft.area(), (5, 7, 21, 15));

    let mut target = Surface::new(32, 32, 32, None).unwrap();
    let context = Rc::new(RenderContext::with_surface(&mut target).unwrap());
    let factory = SpriteFactory::texture(Rc::clone(&context));
    let mut tex = factory
        .from_color(Color::WHITE, (16, 8))
        .unwrap()
        .into_texture()
        .unwrap();
    tex.set_position(-3, 4);
    assert_eq!(tex.area(), (-3, 4, 13, 12));
}

#[test]
fn from_color_uses_rgba_mapping_on_alpha_formats() {
    let _video = testutil::lock_dummy_video();
    let factory = alpha_software_factory();
    let sprite = factory
        .from_color(Color::rgba(255, 0, 0, 255), (10, 10))
        .unwrap()
        .into_software()
        .unwrap();
    assert!(sprite.surface().has_alpha());
    for (x, y) in [(0, 0), (9, 9), (4, 6)] {
        assert_eq!(
            sprite.surface().read_pixel(x, y).unwrap(),
            Color::rgba(255, 0, 0, 255)
        );
    }
}

#[test]
fn from_color_uses_rgb_mapping_without_alpha() {
    let _video = testutil::lock_dummy_video();
    // Default masks at 32 bpp resolve to a format with no alpha channel.
    let factory = SpriteFactory::software();
    let sprite = factory
        .from_color(Color::rgba(255, 0, 0, 7), (4, 4))
        .unwrap()
        .into_software()
        .unwrap();
    assert!(!sprite.surface().has_alpha());
    let pixel = sprite.surface().read_pixel(2, 2).unwrap();
    assert_eq!((pixel.r, pixel.g, pixel.b), (255, 0, 0));
}

#[test]
fn software_sprite_double_destroy_is_safe() {
    let _video = testutil::lock_dummy_video();
    let factory = SpriteFactory::software();
    let mut sprite = factory.create_software_sprite((8, 8)).unwrap();
    sprite.destroy();
    sprite.destroy();
    assert_eq!(sprite.size(), (0, 0));
}

#[test]
fn unowned_surface_survives_its_sprite() {
    let _video = testutil::lock_dummy_video();
    let factory = SpriteFactory::software();
    let mut surface = Surface::new(16, 16, 32, Some(RGBA_MASKS)).unwrap();
    surface.fill(Color::RED).unwrap();

    let sprite = factory.from_surface(&surface).unwrap();
    assert!(!sprite.as_software().unwrap().owns_surface());
    drop(sprite);

    // The buffer is still ours to use.
    surface.fill(Color::BLUE).unwrap();
    assert_eq!(surface.read_pixel(0, 0).unwrap(), Color::BLUE);
}

// --- Factory validation and defaults ---

#[test]
fn texture_factory_requires_a_renderer() {
    let err = SpriteFactory::new(SpriteBackend::Texture, FactoryConfig::default()).unwrap_err();
    assert!(matches!(err, Error::MissingArgument("renderer")));
    assert!(err.is_validation());
}

#[test]
fn create_sprite_merges_overrides_over_defaults() {
    let _video = testutil::lock_dummy_video();
    let factory = SpriteFactory::new(
        SpriteBackend::Software,
        FactoryConfig {
            size: Some((8, 8)),
            ..FactoryConfig::default()
        },
    )
    .unwrap();

    let defaulted = factory.create_sprite(SpriteOptions::default()).unwrap();
    assert_eq!(defaulted.size(), (8, 8));

    let overridden = factory
        .create_sprite(SpriteOptions {
            size: Some((4, 4)),
            ..SpriteOptions::default()
        })
        .unwrap();
    assert_eq!(overridden.size(), (4, 4));

    let bare = SpriteFactory::software();
    let err = bare.create_sprite(SpriteOptions::default()).unwrap_err();
    assert!(matches!(err, Error::MissingArgument("size")));
}

#[test]
fn factory_produces_the_matching_render_system() {
    let _video = testutil::lock_dummy_video();

    let window = Window::with_title("renderer-factory", 32, 32).unwrap();
    let software = SpriteFactory::software();
    assert!(matches!(
        software.create_sprite_renderer(Some(&window)).unwrap(),
        SpriteRendererKind::Software(_)
    ));
    assert!(matches!(
        software.create_sprite_renderer(None).unwrap_err(),
        Error::MissingArgument("window")
    ));

    let mut target = Surface::new(32, 32, 32, None).unwrap();
    let context = Rc::new(RenderContext::with_surface(&mut target).unwrap());
    let texture = SpriteFactory::texture(Rc::clone(&context));
    // The texture backend ignores the window argument entirely.
    assert!(matches!(
        texture.create_sprite_renderer(None).unwrap(),
        SpriteRendererKind::Texture(_)
    ));
}

#[test]
fn from_object_decodes_a_bitmap_stream() {
    let _video = testutil::lock_dummy_video();
    let factory = SpriteFactory::software();
    let sprite = factory.from_object(&tiny_bmp()).unwrap();
    assert_eq!(sprite.size(), (2, 2));
    let soft = sprite.as_software().unwrap();
    assert!(soft.owns_surface());
    let pixel = soft.surface().read_pixel(0, 0).unwrap();
    assert_eq!((pixel.r, pixel.g, pixel.b), (255, 0, 0));
}

#[test]
fn from_image_decodes_a_bitmap_file() {
    let _video = testutil::lock_dummy_video();
    let path = std::env::temp_dir().join("sprite_core_from_image.bmp");
    std::fs::write(&path, tiny_bmp()).unwrap();
    let factory = SpriteFactory::software();
    let sprite = factory.from_image(&path).unwrap();
    assert_eq!(sprite.size(), (2, 2));
    let _ = std::fs::remove_file(&path);
}

// --- Texture sprites over a software-target context ---

#[test]
fn texture_sprite_caches_size_and_destroys_once() {
    let _video = testutil::lock_dummy_video();
    let mut target = Surface::new(64, 64, 32, None).unwrap();
    let context = Rc::new(RenderContext::with_surface(&mut target).unwrap());
    let factory = SpriteFactory::texture(Rc::clone(&context));

    let mut sprite = factory
        .from_color(Color::GREEN, (8, 8))
        .unwrap()
        .into_texture()
        .unwrap();
    assert_eq!(sprite.size(), (8, 8));
    assert!(!sprite.texture().is_null());

    sprite.destroy();
    sprite.destroy();
    assert!(sprite.texture().is_null());
    // The cached size stays authoritative even after release.
    assert_eq!(sprite.size(), (8, 8));
}

#[test]
fn blank_texture_sprite_honors_access_mode() {
    let _video = testutil::lock_dummy_video();
    let mut target = Surface::new(64, 64, 32, None).unwrap();
    let context = Rc::new(RenderContext::with_surface(&mut target).unwrap());
    let factory = SpriteFactory::texture(Rc::clone(&context));

    let stream = factory
        .create_sprite(SpriteOptions {
            size: Some((16, 16)),
            static_access: Some(false),
            ..SpriteOptions::default()
        })
        .unwrap()
        .into_texture()
        .unwrap();
    assert_eq!(stream.access(), TextureAccess::Streaming);
    assert_eq!(stream.size(), (16, 16));
}

// --- Render context state and draws ---

#[test]
fn draw_color_round_trips() {
    let _video = testutil::lock_dummy_video();
    let mut target = Surface::new(16, 16, 32, None).unwrap();
    let context = RenderContext::with_surface(&mut target).unwrap();
    context.set_color(Color::rgba(1, 2, 3, 4)).unwrap();
    assert_eq!(context.color().unwrap(), Color::rgba(1, 2, 3, 4));
}

#[test]
fn blend_mode_round_trips() {
    let _video = testutil::lock_dummy_video();
    let mut target = Surface::new(16, 16, 32, None).unwrap();
    let context = RenderContext::with_surface(&mut target).unwrap();
    assert_eq!(context.blend_mode().unwrap(), BlendMode::None);
    context.set_blend_mode(BlendMode::Blend).unwrap();
    assert_eq!(context.blend_mode().unwrap(), BlendMode::Blend);
}

#[test]
fn clear_with_temporary_color_restores_the_previous_one() {
    let _video = testutil::lock_dummy_video();
    let mut target = Surface::new(16, 16, 32, Some(RGBA_MASKS)).unwrap();
    let context = RenderContext::with_surface(&mut target).unwrap();
    context.set_color(Color::RED).unwrap();
    context.clear(Some(Color::BLUE)).unwrap();
    assert_eq!(context.color().unwrap(), Color::RED);
    assert_eq!(target.read_pixel(8, 8).unwrap(), Color::BLUE);
}

#[test]
fn malformed_batches_fail_before_any_native_call() {
    let _video = testutil::lock_dummy_video();
    let mut target = Surface::new(16, 16, 32, None).unwrap();
    let context = RenderContext::with_surface(&mut target).unwrap();
    context.set_color(Color::RED).unwrap();

    let err = context.draw_line(&[0, 0, 10], Some(Color::BLUE)).unwrap_err();
    assert!(matches!(err, Error::InvalidBatch { len: 3, arity: 4 }));
    let err = context.draw_point(&[1, 2, 3], Some(Color::BLUE)).unwrap_err();
    assert!(matches!(err, Error::InvalidBatch { len: 3, arity: 2 }));
    assert!(context.draw_rect(&[], None).unwrap_err().is_validation());
    assert!(context.fill(&[], None).unwrap_err().is_validation());

    // Validation happened before the temporary color swap.
    assert_eq!(context.color().unwrap(), Color::RED);
}

#[test]
fn batched_draws_land_on_the_target() {
    let _video = testutil::lock_dummy_video();
    let mut target = Surface::new(16, 16, 32, Some(RGBA_MASKS)).unwrap();
    let context = RenderContext::with_surface(&mut target).unwrap();
    context.clear(Some(Color::BLACK)).unwrap();

    context
        .draw_point(&[1, 1, 2, 2, 3, 3], Some(Color::WHITE))
        .unwrap();
    context
        .fill(&[Rect::new(8, 8, 4, 4)], Some(Color::GREEN))
        .unwrap();

    assert_eq!(target.read_pixel(2, 2).unwrap(), Color::WHITE);
    assert_eq!(target.read_pixel(9, 9).unwrap(), Color::GREEN);
    assert_eq!(target.read_pixel(14, 14).unwrap(), Color::BLACK);
}

#[test]
fn batched_line_and_rect_draws_land_on_the_target() {
    let _video = testutil::lock_dummy_video();
    let mut target = Surface::new(16, 16, 32, Some(RGBA_MASKS)).unwrap();
    let context = RenderContext::with_surface(&mut target).unwrap();
    context.clear(Some(Color::BLACK)).unwrap();

    // Two horizontal segments through the single batched native call; the
    // batch draws connected, so only the segment rows are asserted.
    context
        .draw_line(&[0, 1, 7, 1, 0, 3, 7, 3], Some(Color::WHITE))
        .unwrap();
    // Two filled rectangles, batched.
    context
        .fill(
            &[Rect::new(0, 8, 3, 3), Rect::new(8, 8, 3, 3)],
            Some(Color::GREEN),
        )
        .unwrap();
    // Two rectangle outlines, batched.
    context
        .draw_rect(
            &[Rect::new(0, 12, 4, 4), Rect::new(8, 12, 4, 4)],
            Some(Color::BLUE),
        )
        .unwrap();

    assert_eq!(target.read_pixel(5, 1).unwrap(), Color::WHITE);
    assert_eq!(target.read_pixel(5, 3).unwrap(), Color::WHITE);
    assert_eq!(target.read_pixel(1, 9).unwrap(), Color::GREEN);
    assert_eq!(target.read_pixel(9, 9).unwrap(), Color::GREEN);
    assert_eq!(target.read_pixel(5, 9).unwrap(), Color::BLACK);
    assert_eq!(target.read_pixel(0, 12).unwrap(), Color::BLUE);
    assert_eq!(target.read_pixel(8, 12).unwrap(), Color::BLUE);
    // Outlines leave the rectangle interior untouched.
    assert_eq!(target.read_pixel(9, 13).unwrap(), Color::BLACK);
}

// --- Render systems ---

/// Records the order sprites arrive at the extension point.
#[derive(Default)]
struct RecordingSystem {
    rendered_depths: Vec<i32>,
}

impl SpriteRenderSystem for RecordingSystem {
    type Item = SoftwareSprite;

    fn render(&mut self, sprites: &[&SoftwareSprite], _offset: Option<(i32, i32)>) -> Result<()> {
        self.rendered_depths.extend(sprites.iter().map(|s| s.depth));
        Ok(())
    }
}

#[test]
fn process_sorts_ascending_by_depth() {
    let _video = testutil::lock_dummy_video();
    let factory = SpriteFactory::software();
    let a = colored_sprite(&factory, Color::WHITE, (2, 2), 5);
    let b = colored_sprite(&factory, Color::WHITE, (2, 2), 1);
    let c = colored_sprite(&factory, Color::WHITE, (2, 2), 3);

    let mut system = RecordingSystem::default();
    let mut batch = vec![&a, &b, &c];
    system.process(&mut batch).unwrap();
    assert_eq!(system.rendered_depths, vec![1, 3, 5]);
}

#[test]
fn software_renderer_overpaints_by_depth() {
    let _video = testutil::lock_dummy_video();
    let window = Window::with_title("overpaint", 32, 32).unwrap();
    let factory = alpha_software_factory();

    let red = colored_sprite(&factory, Color::RED, (8, 8), 1);
    let blue = colored_sprite(&factory, Color::BLUE, (8, 8), 5);

    let mut renderer = SoftwareSpriteRenderer::new(&window).unwrap();
    // Submit in the wrong order; the system must sort before drawing.
    let mut batch = vec![&blue, &red];
    renderer.process(&mut batch).unwrap();

    let pixel = window.surface().unwrap().read_pixel(2, 2).unwrap();
    assert_eq!((pixel.r, pixel.g, pixel.b), (0, 0, 255));
}

#[test]
fn custom_sort_key_reverses_the_order() {
    let _video = testutil::lock_dummy_video();
    let window = Window::with_title("reverse-sort", 32, 32).unwrap();
    let factory = alpha_software_factory();

    let red = colored_sprite(&factory, Color::RED, (8, 8), 1);
    let blue = colored_sprite(&factory, Color::BLUE, (8, 8), 5);

    let mut renderer = SoftwareSpriteRenderer::new(&window).unwrap();
    renderer.set_sort_key(|sprite| -i64::from(sprite.depth));
    let mut batch = vec![&blue, &red];
    renderer.process(&mut batch).unwrap();

    // Reversed key draws the deep sprite first, so red ends up on top.
    let pixel = window.surface().unwrap().read_pixel(2, 2).unwrap();
    assert_eq!((pixel.r, pixel.g, pixel.b), (255, 0, 0));
}

#[test]
fn batch_offset_shifts_every_sprite() {
    let _video = testutil::lock_dummy_video();
    let window = Window::with_title("offset", 32, 32).unwrap();
    let factory = alpha_software_factory();
    let sprite = colored_sprite(&factory, Color::GREEN, (4, 4), 0);

    let mut renderer = SoftwareSpriteRenderer::new(&window).unwrap();
    renderer.render(&[&sprite], Some((5, 5))).unwrap();

    let surface = window.surface().unwrap();
    let moved = surface.read_pixel(6, 6).unwrap();
    assert_eq!((moved.r, moved.g, moved.b), (0, 255, 0));
}

#[test]
fn render_at_overrides_the_sprite_position() {
    let _video = testutil::lock_dummy_video();
    let window = Window::with_title("render-at", 32, 32).unwrap();
    let factory = alpha_software_factory();
    let sprite = colored_sprite(&factory, Color::GREEN, (4, 4), 0);

    let mut renderer = SoftwareSpriteRenderer::new(&window).unwrap();
    renderer.render_at(&sprite, Some((10, 10))).unwrap();

    let surface = window.surface().unwrap();
    let pixel = surface.read_pixel(11, 11).unwrap();
    assert_eq!((pixel.r, pixel.g, pixel.b), (0, 255, 0));
}

#[test]
fn texture_renderer_draws_the_batch_in_depth_order() {
    let _video = testutil::lock_dummy_video();
    let mut target = Surface::new(32, 32, 32, Some(RGBA_MASKS)).unwrap();
    let context = Rc::new(RenderContext::with_surface(&mut target).unwrap());
    context.clear(Some(Color::BLACK)).unwrap();

    let factory = SpriteFactory::texture(Rc::clone(&context));
    let mut green = factory
        .from_color(Color::GREEN, (8, 8))
        .unwrap()
        .into_texture()
        .unwrap();
    green.depth = 2;
    let mut red = factory
        .from_color(Color::RED, (8, 8))
        .unwrap()
        .into_texture()
        .unwrap();
    red.depth = 7;
    red.set_position(4, 4);

    let mut renderer = TextureSpriteRenderer::new(Rc::clone(&context));
    let mut batch = vec![&red, &green];
    renderer.process(&mut batch).unwrap();

    // Red (depth 7) was copied after green and overpaints the overlap.
    assert_eq!(target.read_pixel(6, 6).unwrap(), Color::RED);
    assert_eq!(target.read_pixel(1, 1).unwrap(), Color::GREEN);
    assert_eq!(target.read_pixel(20, 20).unwrap(), Color::BLACK);
}
