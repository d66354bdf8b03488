#![forbid(unsafe_code)]

//! Font-size and zoom-scale conversion.
//!
//! The theme stores a font-size percentage. A percentage converts to a pixel
//! size against a 16px base, and a pixel size converts to a zoom-slider
//! position by linearly mapping the percentage range `[62, 200]` onto the
//! slider range `[1, 100]` and flooring.
//!
//! ```
//! use formbind_extras::theme::{font_size, zoom_scale};
//!
//! assert_eq!(font_size(100.0), 16.0);
//! assert_eq!(zoom_scale(32.0), 100);
//! assert_eq!(zoom_scale(9.92), 1);
//! ```

/// Pixel size of a 100% font.
pub const BASE_FONT_SIZE: f64 = 16.0;

/// Pixel font size for a percentage of [`BASE_FONT_SIZE`].
#[must_use]
pub fn font_size(percentage: f64) -> f64 {
    percentage * BASE_FONT_SIZE / 100.0
}

/// Linearly map `value` from `[old_min, old_max]` onto `[new_min, new_max]`.
///
/// Values outside the old range extrapolate.
#[must_use]
pub fn calculated_zoom_scale(value: f64, old_min: f64, old_max: f64, new_min: f64, new_max: f64) -> f64 {
    let percent = (value - old_min) / (old_max - old_min);
    percent * (new_max - new_min) + new_min
}

/// Slider position for a pixel font size, using [`ZoomScale::default`].
#[must_use]
pub fn zoom_scale(font_size: f64) -> u32 {
    ZoomScale::default().zoom_scale(font_size)
}

/// Percentage-to-slider mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomScale {
    /// Smallest font percentage.
    pub min_percentage: f64,
    /// Largest font percentage.
    pub max_percentage: f64,
    pub min_scale: u32,
    pub max_scale: u32,
}

impl Default for ZoomScale {
    fn default() -> Self {
        Self {
            min_percentage: 62.0,
            max_percentage: 200.0,
            min_scale: 1,
            max_scale: 100,
        }
    }
}

impl ZoomScale {
    /// Slider position for `font_size` pixels, floored and clamped into
    /// `[min_scale, max_scale]`. NaN maps to `min_scale`.
    #[must_use]
    pub fn zoom_scale(&self, font_size: f64) -> u32 {
        let percentage = 100.0 * (font_size / BASE_FONT_SIZE);
        let scaled = calculated_zoom_scale(
            percentage,
            self.min_percentage,
            self.max_percentage,
            f64::from(self.min_scale),
            f64::from(self.max_scale),
        )
        .floor();
        if scaled.is_nan() {
            return self.min_scale;
        }
        scaled.clamp(f64::from(self.min_scale), f64::from(self.max_scale)) as u32
    }

    /// Pixel font size at a slider position; the inverse of
    /// [`Self::zoom_scale`] up to flooring.
    #[must_use]
    pub fn font_size_for(&self, scale: u32) -> f64 {
        let percentage = calculated_zoom_scale(
            f64::from(scale),
            f64::from(self.min_scale),
            f64::from(self.max_scale),
            self.min_percentage,
            self.max_percentage,
        );
        font_size(percentage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_to_pixels() {
        assert_eq!(font_size(100.0), 16.0);
        assert_eq!(font_size(62.0), 9.92);
        assert_eq!(font_size(200.0), 32.0);
    }

    #[test]
    fn range_endpoints() {
        assert_eq!(zoom_scale(font_size(62.0)), 1);
        assert_eq!(zoom_scale(font_size(200.0)), 100);
    }

    #[test]
    fn base_size_sits_inside_the_range() {
        // 100% is (100 - 62) / 138 of the way along the slider.
        assert_eq!(zoom_scale(16.0), 28);
    }

    #[test]
    fn out_of_range_is_clamped() {
        assert_eq!(zoom_scale(1.0), 1);
        assert_eq!(zoom_scale(64.0), 100);
        assert_eq!(zoom_scale(f64::NAN), 1);
        assert_eq!(zoom_scale(f64::INFINITY), 100);
        assert_eq!(zoom_scale(f64::NEG_INFINITY), 1);
    }

    #[test]
    fn custom_mapping() {
        let scale = ZoomScale {
            min_percentage: 50.0,
            max_percentage: 150.0,
            min_scale: 0,
            max_scale: 10,
        };
        assert_eq!(scale.zoom_scale(16.0), 5);
        assert_eq!(scale.font_size_for(5), 16.0);
    }

    #[test]
    fn interpolation_extrapolates() {
        assert_eq!(calculated_zoom_scale(0.0, 0.0, 10.0, 0.0, 100.0), 0.0);
        assert_eq!(calculated_zoom_scale(20.0, 0.0, 10.0, 0.0, 100.0), 200.0);
    }
}
