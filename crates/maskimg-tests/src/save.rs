//! Codec hand-off scenarios writing real files.

use crate::{gradient, init_tracing};
use maskimg_core::{Image, Mode, Palette};
use maskimg_io::{save, Format, IoError, PngCodec};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tempfile::tempdir;

fn read_png(path: &Path) -> (png::ColorType, u32, u32, Vec<u8>) {
    let decoder = png::Decoder::new(BufReader::new(File::open(path).unwrap()));
    let mut reader = decoder.read_info().unwrap();
    let mut buf = vec![0u8; reader.output_buffer_size().unwrap()];
    let info = reader.next_frame(&mut buf).unwrap();
    buf.truncate(info.buffer_size());
    (info.color_type, info.width, info.height, buf)
}

#[test]
fn save_rgb_gradient() {
    init_tracing();
    let dir = tempdir().unwrap();
    let path = dir.path().join("out/gradient.png");
    save(&gradient(4, 4), &path, None, &PngCodec::default()).unwrap();

    let (color, w, h, data) = read_png(&path);
    assert_eq!(color, png::ColorType::Rgba);
    assert_eq!((w, h), (4, 4));
    // First pixel: r=0, g=0, b=0.25 -> 64, fully valid
    assert_eq!(&data[..4], &[0, 0, 64, 255]);
}

#[test]
fn save_palette_image_expands_colors() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("indexed.png");
    let img = Image::builder(Mode::P)
        .masked_rows(vec![vec![Some(0.0), Some(1.0), None]])
        .palette(Palette::from_entries(vec![vec![1.0, 0.0, 0.0], vec![0.0, 1.0, 0.0]]).unwrap())
        .build()
        .unwrap();
    save(&img, &path, Some("PNG"), &PngCodec::default()).unwrap();

    let (color, _, _, data) = read_png(&path);
    assert_eq!(color, png::ColorType::Rgba);
    assert_eq!(data, vec![255, 0, 0, 255, 0, 255, 0, 255, 0, 0, 0, 0]);
    assert_eq!(img.mode(), Mode::P);
}

#[test]
fn save_failures_leave_no_file() {
    let dir = tempdir().unwrap();
    let empty = dir.path().join("empty.png");
    assert!(matches!(
        save(&Image::empty(Mode::L), &empty, None, &PngCodec::default()),
        Err(IoError::EmptyImage)
    ));
    assert!(!empty.exists());

    let jpeg = dir.path().join("photo.jpg");
    assert!(matches!(
        save(&gradient(2, 2), &jpeg, None, &PngCodec::default()),
        Err(IoError::UnsupportedFormat(_))
    ));
    assert!(!jpeg.exists());
    assert_eq!(Format::from_path(&jpeg).unwrap(), Format::Jpeg);
}
