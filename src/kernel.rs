//! Shared element kernels for the dense containers.
//!
//! `Vector` and `Matrix` both reduce to flat `f32` slices, so the element-wise
//! arithmetic, scalar broadcasts, dot-product reduction, and all-lanes
//! comparison logic live here once. Each routine runs a 4-lane SSE group loop
//! behind the `simd` feature on x86_64, followed by a scalar tail; the scalar
//! path is the reference semantics and both paths produce identical results
//! for every input, NaN included.

/// Lane width of the vectorized group loops (f32x4).
#[cfg(all(feature = "simd", target_arch = "x86_64"))]
pub(crate) const LANES: usize = 4;

/// Comparison relation applied element-wise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Cmp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl Cmp {
    /// The IEEE comparison whose success falsifies an all-lanes reduction of
    /// `self`.
    ///
    /// This is a comparison, not a logical negation: with a NaN operand both
    /// a relation and its complement evaluate false, so a NaN pair fails `eq`
    /// (some lane satisfies `ne`) yet passes `gt` (no lane satisfies `le`).
    fn complement(self) -> Cmp {
        match self {
            Cmp::Eq => Cmp::Ne,
            Cmp::Ne => Cmp::Eq,
            Cmp::Gt => Cmp::Le,
            Cmp::Ge => Cmp::Lt,
            Cmp::Lt => Cmp::Ge,
            Cmp::Le => Cmp::Gt,
        }
    }

    fn holds(self, a: f32, b: f32) -> bool {
        match self {
            Cmp::Eq => a == b,
            Cmp::Ne => a != b,
            Cmp::Gt => a > b,
            Cmp::Ge => a >= b,
            Cmp::Lt => a < b,
            Cmp::Le => a <= b,
        }
    }
}

/// True when `lhs[i] cmp rhs[i]` holds at every index.
///
/// The group loop early-exits as soon as any lane in a group satisfies the
/// complement relation; the scalar tail applies the same test.
pub(crate) fn all_hold(lhs: &[f32], rhs: &[f32], cmp: Cmp) -> bool {
    debug_assert_eq!(lhs.len(), rhs.len());
    let fail = cmp.complement();
    let mut i = 0;
    #[cfg(all(feature = "simd", target_arch = "x86_64"))]
    {
        use std::arch::x86_64::*;
        while i + LANES <= lhs.len() {
            let hit = unsafe {
                let a = _mm_loadu_ps(lhs.as_ptr().add(i));
                let b = _mm_loadu_ps(rhs.as_ptr().add(i));
                any_lane(a, b, fail)
            };
            if hit {
                return false;
            }
            i += LANES;
        }
    }
    while i < lhs.len() {
        if fail.holds(lhs[i], rhs[i]) {
            return false;
        }
        i += 1;
    }
    true
}

/// True when `lhs[i] cmp scalar` holds at every index.
pub(crate) fn all_hold_splat(lhs: &[f32], scalar: f32, cmp: Cmp) -> bool {
    let fail = cmp.complement();
    let mut i = 0;
    #[cfg(all(feature = "simd", target_arch = "x86_64"))]
    {
        use std::arch::x86_64::*;
        let vscalar = unsafe { _mm_set1_ps(scalar) };
        while i + LANES <= lhs.len() {
            let hit = unsafe {
                let a = _mm_loadu_ps(lhs.as_ptr().add(i));
                any_lane(a, vscalar, fail)
            };
            if hit {
                return false;
            }
            i += LANES;
        }
    }
    while i < lhs.len() {
        if fail.holds(lhs[i], scalar) {
            return false;
        }
        i += 1;
    }
    true
}

/// True when any lane of the group satisfies `cmp`.
#[cfg(all(feature = "simd", target_arch = "x86_64"))]
unsafe fn any_lane(
    a: std::arch::x86_64::__m128,
    b: std::arch::x86_64::__m128,
    cmp: Cmp,
) -> bool {
    use std::arch::x86_64::*;
    let mask = match cmp {
        Cmp::Eq => _mm_cmpeq_ps(a, b),
        Cmp::Ne => _mm_cmpneq_ps(a, b),
        Cmp::Gt => _mm_cmpgt_ps(a, b),
        Cmp::Ge => _mm_cmpge_ps(a, b),
        Cmp::Lt => _mm_cmplt_ps(a, b),
        Cmp::Le => _mm_cmple_ps(a, b),
    };
    _mm_movemask_ps(mask) != 0
}

pub(crate) fn add(lhs: &[f32], rhs: &[f32], out: &mut [f32]) {
    let mut i = 0;
    #[cfg(all(feature = "simd", target_arch = "x86_64"))]
    {
        use std::arch::x86_64::*;
        while i + LANES <= out.len() {
            unsafe {
                let a = _mm_loadu_ps(lhs.as_ptr().add(i));
                let b = _mm_loadu_ps(rhs.as_ptr().add(i));
                _mm_storeu_ps(out.as_mut_ptr().add(i), _mm_add_ps(a, b));
            }
            i += LANES;
        }
    }
    while i < out.len() {
        out[i] = lhs[i] + rhs[i];
        i += 1;
    }
}

pub(crate) fn sub(lhs: &[f32], rhs: &[f32], out: &mut [f32]) {
    let mut i = 0;
    #[cfg(all(feature = "simd", target_arch = "x86_64"))]
    {
        use std::arch::x86_64::*;
        while i + LANES <= out.len() {
            unsafe {
                let a = _mm_loadu_ps(lhs.as_ptr().add(i));
                let b = _mm_loadu_ps(rhs.as_ptr().add(i));
                _mm_storeu_ps(out.as_mut_ptr().add(i), _mm_sub_ps(a, b));
            }
            i += LANES;
        }
    }
    while i < out.len() {
        out[i] = lhs[i] - rhs[i];
        i += 1;
    }
}

pub(crate) fn mul(lhs: &[f32], rhs: &[f32], out: &mut [f32]) {
    let mut i = 0;
    #[cfg(all(feature = "simd", target_arch = "x86_64"))]
    {
        use std::arch::x86_64::*;
        while i + LANES <= out.len() {
            unsafe {
                let a = _mm_loadu_ps(lhs.as_ptr().add(i));
                let b = _mm_loadu_ps(rhs.as_ptr().add(i));
                _mm_storeu_ps(out.as_mut_ptr().add(i), _mm_mul_ps(a, b));
            }
            i += LANES;
        }
    }
    while i < out.len() {
        out[i] = lhs[i] * rhs[i];
        i += 1;
    }
}

/// Element-wise quotient. Zero divisors follow IEEE semantics (inf/NaN).
pub(crate) fn div(lhs: &[f32], rhs: &[f32], out: &mut [f32]) {
    let mut i = 0;
    #[cfg(all(feature = "simd", target_arch = "x86_64"))]
    {
        use std::arch::x86_64::*;
        while i + LANES <= out.len() {
            unsafe {
                let a = _mm_loadu_ps(lhs.as_ptr().add(i));
                let b = _mm_loadu_ps(rhs.as_ptr().add(i));
                _mm_storeu_ps(out.as_mut_ptr().add(i), _mm_div_ps(a, b));
            }
            i += LANES;
        }
    }
    while i < out.len() {
        out[i] = lhs[i] / rhs[i];
        i += 1;
    }
}

pub(crate) fn add_splat(src: &[f32], scalar: f32, out: &mut [f32]) {
    let mut i = 0;
    #[cfg(all(feature = "simd", target_arch = "x86_64"))]
    {
        use std::arch::x86_64::*;
        let vscalar = unsafe { _mm_set1_ps(scalar) };
        while i + LANES <= out.len() {
            unsafe {
                let a = _mm_loadu_ps(src.as_ptr().add(i));
                _mm_storeu_ps(out.as_mut_ptr().add(i), _mm_add_ps(a, vscalar));
            }
            i += LANES;
        }
    }
    while i < out.len() {
        out[i] = src[i] + scalar;
        i += 1;
    }
}

pub(crate) fn sub_splat(src: &[f32], scalar: f32, out: &mut [f32]) {
    let mut i = 0;
    #[cfg(all(feature = "simd", target_arch = "x86_64"))]
    {
        use std::arch::x86_64::*;
        let vscalar = unsafe { _mm_set1_ps(scalar) };
        while i + LANES <= out.len() {
            unsafe {
                let a = _mm_loadu_ps(src.as_ptr().add(i));
                _mm_storeu_ps(out.as_mut_ptr().add(i), _mm_sub_ps(a, vscalar));
            }
            i += LANES;
        }
    }
    while i < out.len() {
        out[i] = src[i] - scalar;
        i += 1;
    }
}

/// `scalar - src[i]`; subtraction is not commutative so this exists apart
/// from [`sub_splat`].
pub(crate) fn splat_sub(scalar: f32, src: &[f32], out: &mut [f32]) {
    let mut i = 0;
    #[cfg(all(feature = "simd", target_arch = "x86_64"))]
    {
        use std::arch::x86_64::*;
        let vscalar = unsafe { _mm_set1_ps(scalar) };
        while i + LANES <= out.len() {
            unsafe {
                let a = _mm_loadu_ps(src.as_ptr().add(i));
                _mm_storeu_ps(out.as_mut_ptr().add(i), _mm_sub_ps(vscalar, a));
            }
            i += LANES;
        }
    }
    while i < out.len() {
        out[i] = scalar - src[i];
        i += 1;
    }
}

pub(crate) fn mul_splat(src: &[f32], scalar: f32, out: &mut [f32]) {
    let mut i = 0;
    #[cfg(all(feature = "simd", target_arch = "x86_64"))]
    {
        use std::arch::x86_64::*;
        let vscalar = unsafe { _mm_set1_ps(scalar) };
        while i + LANES <= out.len() {
            unsafe {
                let a = _mm_loadu_ps(src.as_ptr().add(i));
                _mm_storeu_ps(out.as_mut_ptr().add(i), _mm_mul_ps(a, vscalar));
            }
            i += LANES;
        }
    }
    while i < out.len() {
        out[i] = src[i] * scalar;
        i += 1;
    }
}

pub(crate) fn div_splat(src: &[f32], scalar: f32, out: &mut [f32]) {
    let mut i = 0;
    #[cfg(all(feature = "simd", target_arch = "x86_64"))]
    {
        use std::arch::x86_64::*;
        let vscalar = unsafe { _mm_set1_ps(scalar) };
        while i + LANES <= out.len() {
            unsafe {
                let a = _mm_loadu_ps(src.as_ptr().add(i));
                _mm_storeu_ps(out.as_mut_ptr().add(i), _mm_div_ps(a, vscalar));
            }
            i += LANES;
        }
    }
    while i < out.len() {
        out[i] = src[i] / scalar;
        i += 1;
    }
}

/// `scalar / src[i]`; division is not commutative so this exists apart from
/// [`div_splat`].
pub(crate) fn splat_div(scalar: f32, src: &[f32], out: &mut [f32]) {
    let mut i = 0;
    #[cfg(all(feature = "simd", target_arch = "x86_64"))]
    {
        use std::arch::x86_64::*;
        let vscalar = unsafe { _mm_set1_ps(scalar) };
        while i + LANES <= out.len() {
            unsafe {
                let a = _mm_loadu_ps(src.as_ptr().add(i));
                _mm_storeu_ps(out.as_mut_ptr().add(i), _mm_div_ps(vscalar, a));
            }
            i += LANES;
        }
    }
    while i < out.len() {
        out[i] = scalar / src[i];
        i += 1;
    }
}

/// `dst[i] += factor * src[i]`, the accumulation step of the vector-matrix
/// product.
pub(crate) fn add_scaled(dst: &mut [f32], src: &[f32], factor: f32) {
    let mut i = 0;
    #[cfg(all(feature = "simd", target_arch = "x86_64"))]
    {
        use std::arch::x86_64::*;
        let vfactor = unsafe { _mm_set1_ps(factor) };
        while i + LANES <= dst.len() {
            unsafe {
                let d = _mm_loadu_ps(dst.as_ptr().add(i));
                let s = _mm_loadu_ps(src.as_ptr().add(i));
                _mm_storeu_ps(
                    dst.as_mut_ptr().add(i),
                    _mm_add_ps(d, _mm_mul_ps(vfactor, s)),
                );
            }
            i += LANES;
        }
    }
    while i < dst.len() {
        dst[i] += factor * src[i];
        i += 1;
    }
}

/// `dst[i] -= factor * src[i]`, the row-elimination step of Gauss-Jordan.
pub(crate) fn sub_scaled(dst: &mut [f32], src: &[f32], factor: f32) {
    let mut i = 0;
    #[cfg(all(feature = "simd", target_arch = "x86_64"))]
    {
        use std::arch::x86_64::*;
        let vfactor = unsafe { _mm_set1_ps(factor) };
        while i + LANES <= dst.len() {
            unsafe {
                let d = _mm_loadu_ps(dst.as_ptr().add(i));
                let s = _mm_loadu_ps(src.as_ptr().add(i));
                _mm_storeu_ps(
                    dst.as_mut_ptr().add(i),
                    _mm_sub_ps(d, _mm_mul_ps(vfactor, s)),
                );
            }
            i += LANES;
        }
    }
    while i < dst.len() {
        dst[i] -= factor * src[i];
        i += 1;
    }
}

/// `dst[i] /= divisor`, the pivot-normalization step of Gauss-Jordan.
pub(crate) fn div_assign_splat(dst: &mut [f32], divisor: f32) {
    let mut i = 0;
    #[cfg(all(feature = "simd", target_arch = "x86_64"))]
    {
        use std::arch::x86_64::*;
        let vdivisor = unsafe { _mm_set1_ps(divisor) };
        while i + LANES <= dst.len() {
            unsafe {
                let d = _mm_loadu_ps(dst.as_ptr().add(i));
                _mm_storeu_ps(dst.as_mut_ptr().add(i), _mm_div_ps(d, vdivisor));
            }
            i += LANES;
        }
    }
    while i < dst.len() {
        dst[i] /= divisor;
        i += 1;
    }
}

/// Inner-product reduction: lane-wise multiply, horizontal sum, scalar tail.
pub(crate) fn dot(lhs: &[f32], rhs: &[f32]) -> f32 {
    debug_assert_eq!(lhs.len(), rhs.len());
    #[cfg(all(feature = "simd", target_arch = "x86_64"))]
    {
        unsafe { dot_simd(lhs, rhs) }
    }
    #[cfg(not(all(feature = "simd", target_arch = "x86_64")))]
    {
        dot_scalar(lhs, rhs)
    }
}

fn dot_scalar(lhs: &[f32], rhs: &[f32]) -> f32 {
    lhs.iter().zip(rhs.iter()).map(|(a, b)| a * b).sum()
}

#[cfg(all(feature = "simd", target_arch = "x86_64"))]
unsafe fn dot_simd(lhs: &[f32], rhs: &[f32]) -> f32 {
    use std::arch::x86_64::*;

    let mut i = 0usize;
    let mut acc = _mm_setzero_ps();

    while i + LANES <= lhs.len() {
        let a = _mm_loadu_ps(lhs.as_ptr().add(i));
        let b = _mm_loadu_ps(rhs.as_ptr().add(i));
        acc = _mm_add_ps(acc, _mm_mul_ps(a, b));
        i += LANES;
    }

    let mut buffer = [0f32; LANES];
    _mm_storeu_ps(buffer.as_mut_ptr(), acc);
    let mut sum = buffer.iter().sum::<f32>();

    while i < lhs.len() {
        sum += lhs[i] * rhs[i];
        i += 1;
    }

    sum
}
