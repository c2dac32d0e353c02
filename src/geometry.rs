// src/geometry.rs

//! Plain geometry records (`Point`, `Rect`) plus the marshaling helpers that
//! turn flat coordinate lists into the contiguous native arrays the batched
//! draw calls consume.
//!
//! The marshaling helpers validate arity before building anything: a flat
//! list whose length is not a multiple of the per-primitive arity is a
//! caller error and must never reach the native library.

use crate::error::{Error, Result};
use sdl2_sys::{SDL_Point, SDL_Rect};
use serde::{Deserialize, Serialize};

/// A point in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Point { x, y }
    }
}

impl From<Point> for SDL_Point {
    fn from(p: Point) -> Self {
        SDL_Point { x: p.x, y: p.y }
    }
}

/// An axis-aligned rectangle in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Rect { x, y, w, h }
    }

    pub fn size(&self) -> (i32, i32) {
        (self.w, self.h)
    }

    /// True if the point lies inside the rectangle (edges inclusive on the
    /// top-left, exclusive on the bottom-right).
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && y >= self.y && x < self.x + self.w && y < self.y + self.h
    }
}

impl From<(i32, i32, i32, i32)> for Rect {
    fn from((x, y, w, h): (i32, i32, i32, i32)) -> Self {
        Rect { x, y, w, h }
    }
}

impl From<[i32; 4]> for Rect {
    fn from([x, y, w, h]: [i32; 4]) -> Self {
        Rect { x, y, w, h }
    }
}

impl From<Rect> for SDL_Rect {
    fn from(r: Rect) -> Self {
        SDL_Rect {
            x: r.x,
            y: r.y,
            w: r.w,
            h: r.h,
        }
    }
}

impl From<SDL_Rect> for Rect {
    fn from(r: SDL_Rect) -> Self {
        Rect {
            x: r.x,
            y: r.y,
            w: r.w,
            h: r.h,
        }
    }
}

/// Marshals a flat `(x1, y1, x2, y2, ...)` list into a contiguous native
/// point array. Arity is 2; empty and misaligned lists are rejected before
/// any allocation.
pub(crate) fn points_from_flat(values: &[i32]) -> Result<Vec<SDL_Point>> {
    flat_to_points(values, 2)
}

/// Marshals a flat `(x1, y1, x2, y2, ...)` list of line endpoints into a
/// contiguous native point array. Arity is 4 (two endpoints per segment);
/// the batched native call then draws through the points in order.
pub(crate) fn line_points_from_flat(values: &[i32]) -> Result<Vec<SDL_Point>> {
    flat_to_points(values, 4)
}

fn flat_to_points(values: &[i32], arity: usize) -> Result<Vec<SDL_Point>> {
    if values.is_empty() {
        return Err(Error::InvalidInput("primitive batch is empty"));
    }
    if values.len() % arity != 0 {
        return Err(Error::InvalidBatch {
            len: values.len(),
            arity,
        });
    }
    Ok(values
        .chunks_exact(2)
        .map(|pair| SDL_Point {
            x: pair[0],
            y: pair[1],
        })
        .collect())
}

/// Marshals a rectangle batch into a contiguous native rect array.
pub(crate) fn rects_to_native(rects: &[Rect]) -> Vec<SDL_Rect> {
    rects.iter().copied().map(SDL_Rect::from).collect()
}
