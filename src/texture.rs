//! Decoded RGB texture with wrap/filter modes (§4.D).

use crate::error::TextureError;
use std::path::Path;

/// Per-axis wrap mode (§3, §4.D).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WrapMode {
    Repeat,
    ClampToEdge,
}

impl WrapMode {
    #[inline]
    fn apply(self, t: f64) -> f64 {
        if (0.0..=1.0).contains(&t) {
            return t;
        }
        match self {
            WrapMode::Repeat => t - t.floor(),
            WrapMode::ClampToEdge => t.clamp(0.0, 1.0),
        }
    }
}

/// Texture filter mode. Only `Nearest` is specified (§1 non-goals exclude
/// bi/trilinear filtering).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FilterMode {
    Nearest,
}

/// A decoded RGB image with row-major, top-to-bottom byte layout (§3, §6).
pub struct Texture {
    width: usize,
    height: usize,
    /// 3 bytes (R,G,B) per texel, row-major, top-to-bottom.
    rgb: Vec<u8>,
    wrap_x: WrapMode,
    wrap_y: WrapMode,
    filter_mag: FilterMode,
    filter_min: FilterMode,
}

impl Texture {
    /// Decodes the image at `image_path` via the `image` crate (the
    /// external image-decoding collaborator fixed by §1/§6) into 3-channel
    /// RGB, top-down row-major.
    ///
    /// Per §7 ("Resource failure"), a caller-visible construction-time
    /// failure is returned as `Err`; callers that also watch a
    /// [`crate::error::MessageCallback`] should additionally surface a
    /// `Severity::High` message (the context does this automatically when
    /// textures are loaded through [`crate::Context::load_texture`]).
    pub fn load(
        image_path: impl AsRef<Path>,
        wrap_x: WrapMode,
        wrap_y: WrapMode,
        filter_mag: FilterMode,
        filter_min: FilterMode,
    ) -> Result<Self, TextureError> {
        let path = image_path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| TextureError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let img = image::load_from_memory(&bytes)?.into_rgb8();
        let (width, height) = (img.width() as usize, img.height() as usize);
        Ok(Self {
            width,
            height,
            rgb: img.into_raw(),
            wrap_x,
            wrap_y,
            filter_mag,
            filter_min,
        })
    }

    /// Builds a texture directly from decoded RGB bytes, bypassing the
    /// image loader. Used by tests and by callers who decode images
    /// themselves.
    pub fn from_rgb(
        width: usize,
        height: usize,
        rgb: Vec<u8>,
        wrap_x: WrapMode,
        wrap_y: WrapMode,
        filter_mag: FilterMode,
        filter_min: FilterMode,
    ) -> Self {
        assert_eq!(rgb.len(), width * height * 3);
        Self {
            width,
            height,
            rgb,
            wrap_x,
            wrap_y,
            filter_mag,
            filter_min,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Nearest-filtered sample at normalized `(u, v)`, applying wrap modes
    /// then writing `[r,g,b,1.0]` in `[0,1]` to `out` (§4.D).
    ///
    /// `filter_mag`/`filter_min` are accepted by construction for
    /// API-completeness with the spec's fixed-function contract, but the
    /// only supported mode is `Nearest` (§1 non-goal), so sampling always
    /// takes the nearest-neighbour path regardless of magnify/minify.
    pub fn sample(&self, u: f64, v: f64, out: &mut [f64; 4]) {
        let _ = (self.filter_mag, self.filter_min);
        let u = self.wrap_x.apply(u);
        let v = self.wrap_y.apply(v);

        let xi = ((self.width as f64 - 1.0) * u).round() as usize;
        let yi = ((self.height as f64 - 1.0) * (1.0 - v)).round() as usize;
        let xi = xi.min(self.width.saturating_sub(1));
        let yi = yi.min(self.height.saturating_sub(1));

        let idx = (yi * self.width + xi) * 3;
        out[0] = self.rgb[idx] as f64 / 255.0;
        out[1] = self.rgb[idx + 1] as f64 / 255.0;
        out[2] = self.rgb[idx + 2] as f64 / 255.0;
        out[3] = 1.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker(w: usize, h: usize) -> Texture {
        let mut rgb = vec![0u8; w * h * 3];
        for y in 0..h {
            for x in 0..w {
                let idx = (y * w + x) * 3;
                let v = if (x + y) % 2 == 0 { 255 } else { 0 };
                rgb[idx] = v;
                rgb[idx + 1] = v;
                rgb[idx + 2] = v;
            }
        }
        Texture::from_rgb(
            w,
            h,
            rgb,
            WrapMode::Repeat,
            WrapMode::Repeat,
            FilterMode::Nearest,
            FilterMode::Nearest,
        )
    }

    #[test]
    fn sample_top_left_is_v_flipped() {
        let mut rgb = vec![0u8; 2 * 2 * 3];
        // top-left texel (0,0) = red, bottom-left (0,1) = green.
        rgb[0] = 255;
        rgb[3 + 1] = 255;
        let tex = Texture::from_rgb(
            2,
            2,
            rgb,
            WrapMode::ClampToEdge,
            WrapMode::ClampToEdge,
            FilterMode::Nearest,
            FilterMode::Nearest,
        );
        let mut out = [0.0; 4];
        // v=1 should sample the top row (since v is flipped: yi = (1-v)*..).
        tex.sample(0.0, 1.0, &mut out);
        assert_eq!(out, [1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn wrap_repeat_folds_outside_range() {
        let tex = checker(4, 4);
        let mut a = [0.0; 4];
        let mut b = [0.0; 4];
        tex.sample(0.1, 0.1, &mut a);
        tex.sample(1.1, 1.1, &mut b);
        assert_eq!(a, b);
    }

    #[test]
    fn wrap_clamp_saturates() {
        let mut rgb = vec![0u8; 2 * 3];
        rgb[4] = 255; // texel (1,0) green
        let tex = Texture::from_rgb(
            2,
            1,
            rgb,
            WrapMode::ClampToEdge,
            WrapMode::ClampToEdge,
            FilterMode::Nearest,
            FilterMode::Nearest,
        );
        let mut out = [0.0; 4];
        tex.sample(5.0, 0.0, &mut out);
        assert_eq!(out, [0.0, 1.0, 0.0, 1.0]);
    }
}
