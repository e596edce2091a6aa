//! Enhancement scenarios.

use crate::{flat, init_tracing};
use approx::assert_abs_diff_eq;
use maskimg_core::{Image, Mode};
use maskimg_ops::{EnhanceOptions, GammaSpec, ImageOps, Stretch};

fn masked_grid() -> Image {
    Image::builder(Mode::L)
        .masked_rows(vec![vec![Some(0.0), Some(0.5)], vec![Some(1.0), None]])
        .build()
        .unwrap()
}

#[test]
fn crude_stretch_of_unit_range_is_identity() {
    init_tracing();
    let mut img = masked_grid();
    let before = img.clone();
    img.stretch(&"crude".parse().unwrap()).unwrap();
    assert_eq!(img, before);
    assert!(img.channel(0).unwrap().is_masked(1, 1));
}

#[test]
fn no_ops_are_bit_identical() {
    let mut img = masked_grid();
    let before = img.clone();
    img.gamma(&GammaSpec::Uniform(1.0)).unwrap();
    img.stretch(&Stretch::No).unwrap();
    assert_eq!(img, before);
}

#[test]
fn histogram_equalization_is_monotonic() {
    let values: Vec<f32> = (0..64).map(|i| ((i * 37) % 64) as f32 / 63.0).collect();
    let rows: Vec<Vec<f32>> = values.chunks(8).map(<[f32]>::to_vec).collect();
    let mut img = Image::builder(Mode::L).rows(rows).build().unwrap();
    img.stretch(&Stretch::Histogram).unwrap();

    let out = img.channel(0).unwrap().values();
    let mut pairs: Vec<(f32, f32)> = values.iter().copied().zip(out.iter().copied()).collect();
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
    for w in pairs.windows(2) {
        assert!(w[1].1 >= w[0].1, "{:?} then {:?}", w[0], w[1]);
    }
    assert!(out.iter().all(|v| (0.0..=1.0).contains(v)));
}

#[test]
fn constant_channel_is_left_alone() {
    let mut img = flat(Mode::Rgb, 2, 2, 0.4);
    let before = img.clone();
    for method in [Stretch::linear(), Stretch::Histogram, Stretch::logarithmic()] {
        img.stretch(&method).unwrap();
    }
    assert_eq!(img, before);
}

#[test]
fn options_load_from_json() {
    let opts: EnhanceOptions = serde_json::from_str(
        r#"{ "invert": true, "stretch": { "kind": "crude", "min": 0.0, "max": 2.0 }, "gamma": 0.5 }"#,
    )
    .unwrap();
    assert_eq!(opts.gamma, GammaSpec::Uniform(0.5));

    let mut img = Image::builder(Mode::L).rows(vec![vec![0.0, 0.5, 1.0]]).build().unwrap();
    img.enhance(&opts).unwrap();
    let out = img.channel(0).unwrap().values();
    assert_abs_diff_eq!(out[0], 0.25, epsilon = 1e-6);
    assert_abs_diff_eq!(out[1], 0.0625, epsilon = 1e-6);
    assert_abs_diff_eq!(out[2], 0.0, epsilon = 1e-6);

    let defaults: EnhanceOptions = serde_json::from_str("{}").unwrap();
    assert_eq!(defaults, EnhanceOptions::default());
}
