//! Mode conversion state machine.
//!
//! A conversion is planned as a sequence of primitive [`Step`]s before any
//! channel is touched, so an impossible request (unsupported pair, indexed
//! image without a palette) fails with the image unchanged. Steps follow a
//! fixed precedence:
//!
//! 1. add alpha when the target is the source's alpha variant;
//! 2. drop alpha when the source is the target's alpha variant;
//! 3. otherwise move through the alpha variant first (add or drop), then
//!    continue from there;
//! 4. otherwise take one direct [`Transition`] and continue from the mode
//!    it reaches (palette expansion may land on a mode other than the
//!    target).
//!
//! # Example
//!
//! ```rust
//! use maskimg_color::Convert;
//! use maskimg_core::{Channel, Image, Mode};
//!
//! let luma = Channel::from_rows(&[vec![0.25, 0.75]]).unwrap();
//! let mut img = Image::new(vec![luma], Mode::L).unwrap();
//!
//! img.convert(Mode::Rgba).unwrap();
//! assert_eq!(img.mode(), Mode::Rgba);
//! assert_eq!(img.channels().len(), 4);
//! assert_eq!(img.channel(3).unwrap().values(), &[1.0, 1.0]);
//! ```

use crate::transition::Transition;
use maskimg_core::{Channel, Error, Image, Layout, Mode, Result};
use tracing::{debug, trace};

/// One primitive move of a planned conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Append a fully opaque, fully valid alpha channel.
    AddAlpha,
    /// Remove the trailing alpha channel.
    DropAlpha,
    /// Apply a table transition, reaching the given mode.
    Direct(Transition, Mode),
}

#[derive(Debug, Clone, Copy)]
struct State {
    mode: Mode,
    secondary: Mode,
    has_palette: bool,
}

/// Plans the steps turning `image` into `target`.
///
/// Returns an empty plan when the modes are equal.
///
/// # Errors
///
/// [`Error::UnsupportedConversion`] for pairs missing from the transition
/// table and [`Error::MissingPalette`] when an indexed image without a usable
/// palette would have to be expanded.
pub fn plan(image: &Image, target: Mode) -> Result<Vec<Step>> {
    let source = image.mode();
    let mut state = State {
        mode: source,
        secondary: image.secondary_mode(),
        has_palette: image.palette().is_some_and(|p| !p.is_empty()),
    };
    let mut steps = Vec::new();

    while state.mode != target {
        // Every move either settles alpha or leaves the indexed modes, so the
        // walk is at most four steps long.
        if steps.len() > 4 {
            return Err(Error::unsupported_conversion(source, target));
        }
        let mode = state.mode;
        let step = if !mode.has_alpha() && target.has_alpha() {
            Step::AddAlpha
        } else if mode.has_alpha() && !target.has_alpha() {
            Step::DropAlpha
        } else {
            let transition = Transition::lookup(mode, target)
                .ok_or_else(|| Error::unsupported_conversion(source, target))?;
            let reached = match transition {
                Transition::FromPalette => {
                    if !state.has_palette {
                        return Err(Error::MissingPalette(source));
                    }
                    if mode.has_alpha() {
                        state.secondary.with_alpha()
                    } else {
                        state.secondary
                    }
                }
                _ => target,
            };
            Step::Direct(transition, reached)
        };

        match step {
            Step::AddAlpha => state.mode = mode.with_alpha(),
            Step::DropAlpha => state.mode = mode.without_alpha(),
            Step::Direct(Transition::ToPalette, reached) => {
                state.secondary = mode.without_alpha();
                state.has_palette = true;
                state.mode = reached;
            }
            Step::Direct(Transition::FromPalette, reached) => {
                state.has_palette = false;
                state.mode = reached;
            }
            Step::Direct(_, reached) => state.mode = reached,
        }
        steps.push(step);
    }
    Ok(steps)
}

impl Step {
    /// Layout produced by this step from `image`.
    pub fn apply(self, image: &Image) -> Result<Layout> {
        match self {
            Step::AddAlpha => add_alpha(image),
            Step::DropAlpha => drop_alpha(image),
            Step::Direct(transition, reached) => transition.apply(image, reached),
        }
    }
}

fn add_alpha(image: &Image) -> Result<Layout> {
    let mode = image.mode();
    if mode.has_alpha() {
        return Err(Error::wrong_mode("a mode without alpha", mode));
    }
    let mut layout = image.layout();
    layout.mode = mode.with_alpha();
    layout.channels.push(Channel::ones(image.height(), image.width()));
    if let Some(fill) = layout.fill_value.as_mut() {
        fill.push(1.0);
    }
    Ok(layout)
}

fn drop_alpha(image: &Image) -> Result<Layout> {
    let mode = image.mode();
    if !mode.has_alpha() {
        return Err(Error::wrong_mode("a mode with alpha", mode));
    }
    let mut layout = image.layout();
    layout.mode = mode.without_alpha();
    layout.channels.pop();
    if let Some(fill) = layout.fill_value.as_mut() {
        fill.pop();
    }
    Ok(layout)
}

/// Converts `image` to `target` in place.
///
/// Equal modes are a no-op. An empty image only has its mode tag updated.
/// On error the image is left exactly as it was.
pub fn convert(image: &mut Image, target: Mode) -> Result<()> {
    let source = image.mode();
    if source == target {
        return Ok(());
    }
    if image.is_empty() {
        debug!(from = %source, to = %target, "Retagging empty image");
        return image.set_empty_mode(target);
    }

    let steps = plan(image, target)?;
    debug!(from = %source, to = %target, steps = steps.len(), "Converting image mode");

    if let [step] = steps.as_slice() {
        let layout = step.apply(image)?;
        return image.apply_layout(layout);
    }

    // Multi-step plans run on a working copy so a late failure cannot leave
    // an intermediate mode behind.
    let mut work = image.clone();
    for step in steps {
        trace!(?step, mode = %work.mode(), "Applying conversion step");
        let layout = step.apply(&work)?;
        work.apply_layout(layout)?;
    }
    *image = work;
    Ok(())
}

/// Method-style mode conversion for [`Image`].
pub trait Convert {
    /// Converts in place. See [`convert`].
    fn convert(&mut self, target: Mode) -> Result<()>;

    /// Returns a converted copy, leaving `self` untouched.
    fn converted(&self, target: Mode) -> Result<Image>;
}

impl Convert for Image {
    fn convert(&mut self, target: Mode) -> Result<()> {
        convert(self, target)
    }

    fn converted(&self, target: Mode) -> Result<Image> {
        let mut copy = self.clone();
        convert(&mut copy, target)?;
        Ok(copy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use maskimg_core::Palette;

    fn rgb_image() -> Image {
        Image::builder(Mode::Rgb)
            .rows(vec![vec![1.0, 0.2], vec![0.0, 0.9]])
            .rows(vec![vec![0.0, 0.4], vec![1.0, 0.1]])
            .rows(vec![vec![0.0, 0.6], vec![0.5, 0.3]])
            .build()
            .unwrap()
    }

    #[test]
    fn test_plan_precedence() {
        let img = rgb_image();
        assert_eq!(plan(&img, Mode::Rgb).unwrap(), vec![]);
        assert_eq!(plan(&img, Mode::Rgba).unwrap(), vec![Step::AddAlpha]);
        assert_eq!(
            plan(&img, Mode::YCbCrA).unwrap(),
            vec![Step::AddAlpha, Step::Direct(Transition::RgbToYCbCr, Mode::YCbCrA)]
        );
        assert_eq!(
            plan(&img, Mode::P).unwrap(),
            vec![Step::Direct(Transition::ToPalette, Mode::P)]
        );
    }

    #[test]
    fn test_plan_through_palette() {
        let img = Image::builder(Mode::PA)
            .rows(vec![vec![0.0]])
            .rows(vec![vec![1.0]])
            .palette(Palette::from_entries(vec![vec![0.5]]).unwrap())
            .secondary_mode(Mode::L)
            .build()
            .unwrap();
        assert_eq!(
            plan(&img, Mode::Rgb).unwrap(),
            vec![
                Step::DropAlpha,
                Step::Direct(Transition::FromPalette, Mode::L),
                Step::Direct(Transition::LToRgb, Mode::Rgb),
            ]
        );
    }

    #[test]
    fn test_missing_palette_fails_before_mutation() {
        let mut img = Image::new(vec![Channel::zeros(2, 2)], Mode::P).unwrap();
        let before = img.clone();
        let err = img.convert(Mode::Rgba).unwrap_err();
        assert_eq!(err, Error::MissingPalette(Mode::P));
        assert!(err.is_mode_error());
        assert_eq!(img, before);
    }

    #[test]
    fn test_empty_image_retag() {
        let mut img = Image::empty(Mode::L);
        img.convert(Mode::Rgba).unwrap();
        assert_eq!(img.mode(), Mode::Rgba);
        assert!(img.is_empty());
        // Empty indexed images have no channels to expand
        img.convert(Mode::P).unwrap();
        img.convert(Mode::YCbCr).unwrap();
        assert_eq!(img.mode(), Mode::YCbCr);
    }

    #[test]
    fn test_rgb_ycbcr_roundtrip_with_alpha() {
        let mut img = rgb_image();
        img.convert(Mode::Rgba).unwrap();
        let original = img.clone();
        img.convert(Mode::YCbCrA).unwrap();
        assert_eq!(img.channels().len(), 4);
        img.convert(Mode::Rgba).unwrap();
        for (a, b) in img.channels().iter().zip(original.channels()) {
            for (x, y) in a.values().iter().zip(b.values()) {
                assert_abs_diff_eq!(*x, *y, epsilon = 1e-5);
            }
            assert_eq!(a.mask(), b.mask());
        }
    }

    #[test]
    fn test_l_ycbcr_l_roundtrip() {
        let luma = Channel::from_masked_rows(&[vec![Some(0.1), None], vec![Some(0.7), Some(1.0)]]).unwrap();
        let mut img = Image::new(vec![luma.clone()], Mode::L).unwrap();
        img.convert(Mode::YCbCr).unwrap();
        img.convert(Mode::L).unwrap();
        assert_eq!(img.channel(0).unwrap(), &luma);
    }

    #[test]
    fn test_alpha_symmetry() {
        let mut img = rgb_image();
        let original = img.channels().to_vec();
        img.convert(Mode::Rgba).unwrap();
        img.channel_mut(3).unwrap().values_mut()[0] = 0.25;
        img.convert(Mode::Rgb).unwrap();
        assert_eq!(img.channels(), original.as_slice());
    }

    #[test]
    fn test_fill_value_lockstep() {
        let mut img = Image::builder(Mode::Rgb)
            .channels(rgb_image().channels().to_vec())
            .fill_value([1.0, 0.0, 0.0])
            .build()
            .unwrap();
        img.convert(Mode::YCbCrA).unwrap();
        let fill = img.fill_value().unwrap();
        assert_eq!(fill.len(), 4);
        assert_abs_diff_eq!(fill[0], 0.299, epsilon = 1e-6);
        assert_abs_diff_eq!(fill[2], 0.5, epsilon = 1e-6);
        assert_eq!(fill[3], 1.0);

        img.convert(Mode::L).unwrap();
        assert_eq!(img.fill_value().map(<[f32]>::len), Some(1));
    }

    #[test]
    fn test_palette_roundtrip() {
        let mut img = rgb_image();
        let original = img.clone();
        img.convert(Mode::P).unwrap();
        assert_eq!(img.channels().len(), 1);
        assert_eq!(img.secondary_mode(), Mode::Rgb);
        assert_eq!(img.palette().map(Palette::len), Some(4));

        img.convert(Mode::Rgb).unwrap();
        assert!(img.palette().is_none());
        assert_eq!(img.channels(), original.channels());
    }

    #[test]
    fn test_palette_registers_fill() {
        let mut img = Image::builder(Mode::LA)
            .rows(vec![vec![0.2, 0.2, 0.4]])
            .rows(vec![vec![1.0, 0.5, 1.0]])
            .fill_value([0.9, 0.0])
            .build()
            .unwrap();
        img.convert(Mode::PA).unwrap();
        let palette = img.palette().unwrap();
        assert_eq!(palette.len(), 3);
        assert_eq!(palette.get(2), Some(&[0.9][..]));
        assert_eq!(img.fill_value(), Some(&[2.0, 0.0][..]));
        assert_eq!(img.channel(1).unwrap().values(), &[1.0, 0.5, 1.0]);

        img.convert(Mode::LA).unwrap();
        assert_eq!(img.fill_value(), Some(&[0.9, 0.0][..]));
        assert_eq!(img.channel(0).unwrap().values(), &[0.2, 0.2, 0.4]);
    }

    #[test]
    fn test_converted_leaves_source() {
        let img = rgb_image();
        let grey = img.converted(Mode::L).unwrap();
        assert_eq!(img.mode(), Mode::Rgb);
        assert_eq!(grey.mode(), Mode::L);
        assert_abs_diff_eq!(grey.channel(0).unwrap().value(0, 0), 0.299, epsilon = 1e-6);
    }
}
