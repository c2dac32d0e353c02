// src/bin/sprite_demo.rs

//! Small demo: bouncing solid-color sprites drawn through the texture
//! pipeline. Pass a JSON config path to override the default window and
//! renderer settings.

use anyhow::{anyhow, Context};
use log::info;
use sprite_core::{
    Color, Config, RenderContext, Sprite, SpriteFactory, SpriteRenderSystem,
    TextureSpriteRenderer, Window,
};
use std::path::Path;
use std::rc::Rc;
use std::time::Duration;

const FRAME_COUNT: u32 = 300;
const FRAME_TIME: Duration = Duration::from_millis(16);

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => Config::from_json_file(Path::new(&path))
            .with_context(|| format!("failed to load configuration from {path}"))?,
        None => Config::default(),
    };
    info!(
        "Starting sprite-demo ({}x{}).",
        config.window.width, config.window.height
    );

    let window = Window::new(&config.window).context("failed to create window")?;
    let context = Rc::new(
        RenderContext::with_window(&window, &config.renderer)
            .context("failed to create renderer")?,
    );
    let factory = SpriteFactory::texture(Rc::clone(&context));
    let mut renderer = TextureSpriteRenderer::new(Rc::clone(&context));

    let palette = [
        Color::rgb(200, 60, 60),
        Color::rgb(60, 200, 60),
        Color::rgb(60, 60, 200),
    ];
    let mut sprites = Vec::new();
    let mut velocities = Vec::new();
    for (i, color) in palette.iter().enumerate() {
        let mut sprite = factory
            .from_color(*color, (96, 96))
            .context("failed to create sprite")?
            .into_texture()
            .map_err(|_| anyhow!("texture factory produced a non-texture sprite"))?;
        sprite.set_position(40 * i as i32, 60 * i as i32);
        sprite.set_depth(i as i32);
        sprites.push(sprite);
        velocities.push((2 + i as i32, 3 - i as i32));
    }

    let (width, height) = window.size();
    for _frame in 0..FRAME_COUNT {
        for (sprite, velocity) in sprites.iter_mut().zip(&mut velocities) {
            let (x, y) = sprite.position();
            let (w, h) = sprite.size();
            let (mut dx, mut dy) = *velocity;
            if x + dx < 0 || x + dx + w as i32 > width as i32 {
                dx = -dx;
            }
            if y + dy < 0 || y + dy + h as i32 > height as i32 {
                dy = -dy;
            }
            sprite.set_position(x + dx, y + dy);
            *velocity = (dx, dy);
        }

        context.clear(Some(Color::BLACK))?;
        let mut batch: Vec<&_> = sprites.iter().collect();
        renderer.process(&mut batch)?;
        std::thread::sleep(FRAME_TIME);
    }

    info!("Demo finished after {} frames.", FRAME_COUNT);
    Ok(())
}
