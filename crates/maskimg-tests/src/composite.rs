//! Compositing and geometry scenarios.

use crate::{flat, gradient};
use approx::assert_abs_diff_eq;
use maskimg_core::{Channel, Image, Mode};
use maskimg_ops::{ImageOps, OpsError};

#[test]
fn merge_mask_conjunction() {
    let mut img = Image::builder(Mode::L)
        .masked_rows(vec![vec![None, None, Some(0.2)]])
        .build()
        .unwrap();
    let bg = Image::builder(Mode::L)
        .masked_rows(vec![vec![Some(0.7), None, Some(0.9)]])
        .build()
        .unwrap();
    img.merge(&bg).unwrap();

    let chn = img.channel(0).unwrap();
    assert_eq!(chn.mask(), &[false, true, false]);
    assert_eq!(chn.values()[0], 0.7);
    assert_eq!(chn.values()[2], 0.2);
}

#[test]
fn blend_with_opaque_top() {
    let mut dst = gradient(2, 2).converted_rgba(0.3);
    let src = flat(Mode::Rgba, 2, 2, 1.0);
    dst.blend(&src).unwrap();
    assert_eq!(dst, src);
}

#[test]
fn putalpha_then_blend() {
    let mut dst = flat(Mode::Rgb, 2, 2, 0.0);
    dst.putalpha(Channel::filled(2, 2, 1.0)).unwrap();
    let mut src = flat(Mode::Rgb, 2, 2, 1.0);
    src.putalpha(Channel::filled(2, 2, 0.25)).unwrap();

    dst.blend(&src).unwrap();
    assert_abs_diff_eq!(dst.channel(0).unwrap().values()[0], 0.25, epsilon = 1e-6);
    assert_eq!(dst.channel(3).unwrap().values(), &[1.0; 4]);
}

#[test]
fn resize_factors() {
    let mut img = gradient(2, 4);
    img.resize(4, 8).unwrap();
    assert_eq!(img.shape(), (4, 8));
    img.resize(2, 2).unwrap();
    assert_eq!(img.shape(), (2, 2));
    assert!(matches!(img.resize(3, 2), Err(OpsError::InvalidParameter(_))));
}

#[test]
fn replace_luminance_keeps_chroma() {
    let mut img = gradient(2, 2);
    let luma = Channel::filled(4, 4, 0.5);
    img.replace_luminance(luma).unwrap();
    assert_eq!(img.shape(), (4, 4));
    assert_eq!(img.mode(), Mode::Rgb);

    use maskimg_color::Convert;
    let ycc = img.converted(Mode::YCbCr).unwrap();
    for v in ycc.channel(0).unwrap().values() {
        assert_abs_diff_eq!(*v, 0.5, epsilon = 1e-5);
    }
}

trait WithAlpha {
    fn converted_rgba(self, alpha: f32) -> Image;
}

impl WithAlpha for Image {
    fn converted_rgba(mut self, alpha: f32) -> Image {
        let (h, w) = self.shape();
        self.putalpha(Channel::filled(h, w, alpha)).unwrap();
        self
    }
}
