//! Mode conversion scenarios.

use crate::{gradient, init_tracing};
use approx::assert_abs_diff_eq;
use maskimg_color::Convert;
use maskimg_core::{Channel, Error, Image, Mode};

fn assert_channels_close(a: &Image, b: &Image, eps: f32) {
    assert_eq!(a.channels().len(), b.channels().len());
    for (x, y) in a.channels().iter().zip(b.channels()) {
        assert_eq!(x.mask(), y.mask());
        for (u, v) in x.values().iter().zip(y.values()) {
            assert_abs_diff_eq!(u, v, epsilon = eps);
        }
    }
}

#[test]
fn red_to_ycbcr_and_back() {
    init_tracing();
    let mut img = Image::builder(Mode::Rgb)
        .rows(vec![vec![1.0]])
        .rows(vec![vec![0.0]])
        .rows(vec![vec![0.0]])
        .build()
        .unwrap();
    img.convert(Mode::YCbCr).unwrap();
    assert_abs_diff_eq!(img.channel(0).unwrap().value(0, 0), 0.299, epsilon = 1e-6);
    assert_abs_diff_eq!(img.channel(1).unwrap().value(0, 0), -0.1687, epsilon = 1e-4);
    assert_abs_diff_eq!(img.channel(2).unwrap().value(0, 0), 0.5, epsilon = 1e-6);

    img.convert(Mode::Rgb).unwrap();
    assert_abs_diff_eq!(img.channel(0).unwrap().value(0, 0), 1.0, epsilon = 1e-5);
    assert_abs_diff_eq!(img.channel(1).unwrap().value(0, 0), 0.0, epsilon = 1e-5);
    assert_abs_diff_eq!(img.channel(2).unwrap().value(0, 0), 0.0, epsilon = 1e-5);
}

#[test]
fn ycbcr_round_trips() {
    let rgb = gradient(4, 6);
    let back = rgb.converted(Mode::YCbCr).unwrap().converted(Mode::Rgb).unwrap();
    assert_channels_close(&rgb, &back, 1e-5);

    let l = rgb.converted(Mode::L).unwrap();
    let back = l.converted(Mode::YCbCr).unwrap().converted(Mode::L).unwrap();
    assert_channels_close(&l, &back, 1e-6);

    let rgba = rgb.converted(Mode::Rgba).unwrap();
    let back = rgba.converted(Mode::YCbCrA).unwrap().converted(Mode::Rgba).unwrap();
    assert_channels_close(&rgba, &back, 1e-5);
}

#[test]
fn alpha_symmetry() {
    for mode in [Mode::L, Mode::Rgb, Mode::YCbCr] {
        let base = gradient(3, 3).converted(mode).unwrap();
        let with = base.converted(mode.with_alpha()).unwrap();
        assert_eq!(with.channels().len(), base.channels().len() + 1);
        assert_eq!(with.channels().last().unwrap().values(), &[1.0; 9]);

        let without = with.converted(mode).unwrap();
        assert_eq!(without, base);
    }
}

#[test]
fn palette_round_trip_is_exact() {
    let chn = |rows: Vec<Vec<Option<f32>>>| Channel::from_masked_rows(&rows).unwrap();
    let img = Image::builder(Mode::Rgb)
        .channel(chn(vec![vec![Some(0.1), Some(0.9), None], vec![Some(0.1), Some(0.3), Some(0.3)]]))
        .channel(chn(vec![vec![Some(0.2), Some(0.8), None], vec![Some(0.2), Some(0.3), Some(0.3)]]))
        .channel(chn(vec![vec![Some(0.3), Some(0.7), None], vec![Some(0.3), Some(0.3), Some(0.3)]]))
        .build()
        .unwrap();

    let indexed = img.converted(Mode::P).unwrap();
    assert!(indexed.palette().unwrap().len() <= 4);
    let back = indexed.converted(Mode::Rgb).unwrap();

    for (orig, got) in img.channels().iter().zip(back.channels()) {
        for i in 0..orig.len() {
            if !orig.mask()[i] {
                assert_eq!(orig.values()[i], got.values()[i]);
            }
        }
    }
}

#[test]
fn palette_errors_surface_before_mutation() {
    let mut img = Image::builder(Mode::P).rows(vec![vec![0.0, 1.0]]).build().unwrap();
    let before = img.clone();
    assert_eq!(img.convert(Mode::L).unwrap_err(), Error::MissingPalette(Mode::P));
    assert_eq!(img, before);
}

#[test]
fn empty_image_only_changes_mode() {
    let mut img = Image::empty(Mode::L);
    img.convert(Mode::Rgba).unwrap();
    assert_eq!(img.mode(), Mode::Rgba);
    assert!(img.is_empty());
}
