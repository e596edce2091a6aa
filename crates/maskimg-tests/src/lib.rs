//! Integration tests for the maskimg crates.
//!
//! End-to-end scenarios crossing crate boundaries: construction, mode
//! conversion, enhancement, compositing and the codec hand-off.

use maskimg_core::{Channel, Image, Mode};

#[cfg(test)]
mod convert;
#[cfg(test)]
mod enhance;
#[cfg(test)]
mod composite;
#[cfg(test)]
mod save;

/// Installs a test subscriber honoring `RUST_LOG`. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Fully valid `height x width` image of `mode` with every channel at `value`.
pub fn flat(mode: Mode, height: usize, width: usize, value: f32) -> Image {
    let channels = (0..mode.channel_count())
        .map(|_| Channel::filled(height, width, value))
        .collect();
    Image::new(channels, mode).unwrap_or_else(|e| panic!("flat {mode} image: {e}"))
}

/// RGB gradient: red grows along columns, green along rows, blue constant.
pub fn gradient(height: usize, width: usize) -> Image {
    let r = (0..height)
        .map(|_| (0..width).map(|c| c as f32 / width as f32).collect())
        .collect::<Vec<Vec<f32>>>();
    let g = (0..height)
        .map(|row| vec![row as f32 / height as f32; width])
        .collect::<Vec<Vec<f32>>>();
    Image::builder(Mode::Rgb)
        .rows(r)
        .rows(g)
        .channel(Channel::filled(height, width, 0.25))
        .build()
        .unwrap_or_else(|e| panic!("gradient image: {e}"))
}
