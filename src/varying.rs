//! Runtime-declared varying layout (§3, §9).
//!
//! A vertex shader declares its output layout as an array of
//! [`VaryingInfo`]; the pipeline never hard-codes a vertex format. Only
//! `ElemType::F64` is supported today, but the tag is kept open per §9's
//! design note so a future element type can be added without breaking the
//! wire shape.

/// The element type of one varying slot. Only `F64` is implemented; other
/// variants are reserved for future extension (§9).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ElemType {
    F64,
}

/// One varying slot: `count` contiguous elements of `elem_type`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct VaryingInfo {
    pub count: usize,
    pub elem_type: ElemType,
}

impl VaryingInfo {
    pub const fn f64(count: usize) -> Self {
        Self {
            count,
            elem_type: ElemType::F64,
        }
    }

    #[inline]
    fn byte_size(self) -> usize {
        match self.elem_type {
            ElemType::F64 => self.count * std::mem::size_of::<f64>(),
        }
    }
}

/// Computes the total byte size of a varying layout (`bytesPerVarying`,
/// §3), asserting every slot uses the only supported element type.
pub fn layout_byte_size(layout: &[VaryingInfo]) -> usize {
    layout
        .iter()
        .map(|info| {
            assert_eq!(
                info.elem_type,
                ElemType::F64,
                "unsupported varying element type; only ElemType::F64 is implemented"
            );
            info.byte_size()
        })
        .sum()
}

/// A single varying slab viewed as `f64`s: the pipeline's only supported
/// varying type (§3, §9).
///
/// `VsOut::p_output_variables` (§6) is this, in practice: a slice view of
/// `bytes_per_varying / 8` `f64`s allocated out of the arena.
pub type VaryingSlot<'a> = &'a mut [f64];

/// Affine combination of two varying slots: `out = a*wa + b*wb`.
#[inline]
pub fn lerp2(a: &[f64], b: &[f64], wa: f64, wb: f64, out: &mut [f64]) {
    debug_assert_eq!(a.len(), b.len());
    debug_assert_eq!(a.len(), out.len());
    for i in 0..out.len() {
        out[i] = a[i] * wa + b[i] * wb;
    }
}

/// Affine combination of three varying slots (barycentric weights).
#[inline]
pub fn lerp3(a: &[f64], b: &[f64], c: &[f64], wa: f64, wb: f64, wc: f64, out: &mut [f64]) {
    debug_assert_eq!(a.len(), b.len());
    debug_assert_eq!(a.len(), c.len());
    debug_assert_eq!(a.len(), out.len());
    for i in 0..out.len() {
        out[i] = a[i] * wa + b[i] * wb + c[i] * wc;
    }
}
