// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use crate::percent::Percent;
use num_traits::{
    CheckedAdd, CheckedSub, NumCast, SaturatingAdd, SaturatingSub, Signed, ToPrimitive, Zero,
};
use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, AddAssign, Sub, SubAssign},
};

/// Snapping tolerance for percent to weight conversions. A product like
/// `1500 * 70 / 100` must become `1050`, not `1051` after `ceil`.
const CEIL_SNAP_EPSILON: f64 = 1e-9;

#[repr(transparent)]
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct Weight<T>(T);

impl<T: Copy> Weight<T> {
    #[inline]
    pub const fn new(value: T) -> Self {
        Weight(value)
    }

    #[inline]
    pub const fn value(self) -> T {
        self.0
    }

    #[inline]
    pub fn checked_add(self, other: Weight<T>) -> Option<Self>
    where
        T: CheckedAdd<Output = T>,
    {
        self.0.checked_add(&other.0).map(Weight)
    }

    #[inline]
    pub fn checked_sub(self, other: Weight<T>) -> Option<Self>
    where
        T: CheckedSub<Output = T>,
    {
        self.0.checked_sub(&other.0).map(Weight)
    }

    #[inline]
    pub fn saturating_add(self, other: Weight<T>) -> Self
    where
        T: SaturatingAdd<Output = T>,
    {
        Weight(self.0.saturating_add(&other.0))
    }

    #[inline]
    pub fn saturating_sub(self, other: Weight<T>) -> Self
    where
        T: SaturatingSub<Output = T>,
    {
        Weight(self.0.saturating_sub(&other.0))
    }

    #[inline]
    pub fn is_negative(self) -> bool
    where
        T: Signed,
    {
        self.0.is_negative()
    }

    /// Widened copy used for exact density comparisons.
    #[inline]
    pub fn to_i128(self) -> Option<i128>
    where
        T: ToPrimitive,
    {
        self.0.to_i128()
    }

    #[inline]
    pub fn to_f64(self) -> Option<f64>
    where
        T: ToPrimitive,
    {
        self.0.to_f64()
    }

    /// `self / total`, or `None` when `total` is zero.
    pub fn fraction_of(self, total: Weight<T>) -> Option<f64>
    where
        T: ToPrimitive + Zero,
    {
        if total.0.is_zero() {
            return None;
        }
        Some(self.0.to_f64()? / total.0.to_f64()?)
    }

    /// `ceil(total * percent / 100)`, the absolute weight a percent target
    /// stands for. Returns `None` if the result does not fit into `T`.
    pub fn percent_of(total: Weight<T>, percent: Percent) -> Option<Self>
    where
        T: ToPrimitive + NumCast,
    {
        let raw = total.0.to_f64()? * percent.value() / 100.0;
        let snapped = ceil_snapped(raw);
        <T as NumCast>::from(snapped).map(Weight)
    }
}

/// `ceil` that treats values within [`CEIL_SNAP_EPSILON`] of an integer as
/// that integer.
#[inline]
pub fn ceil_snapped(raw: f64) -> f64 {
    let nearest = raw.round();
    if (raw - nearest).abs() < CEIL_SNAP_EPSILON {
        nearest
    } else {
        raw.ceil()
    }
}

impl<T: Copy + Display> Display for Weight<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Weight({})", self.0)
    }
}

impl<T> Add for Weight<T>
where
    T: Copy + CheckedAdd<Output = T>,
{
    type Output = Weight<T>;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Weight(
            self.0
                .checked_add(&rhs.0)
                .expect("overflow in Weight + Weight"),
        )
    }
}

impl<T> AddAssign for Weight<T>
where
    T: Copy + CheckedAdd<Output = T>,
{
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.0 = self
            .0
            .checked_add(&rhs.0)
            .expect("overflow in Weight += Weight");
    }
}

impl<T: Copy + CheckedAdd<Output = T>> CheckedAdd for Weight<T> {
    #[inline]
    fn checked_add(&self, rhs: &Self) -> Option<Self> {
        self.0.checked_add(&rhs.0).map(Weight)
    }
}

impl<T> Sub for Weight<T>
where
    T: Copy + CheckedSub<Output = T>,
{
    type Output = Weight<T>;

    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        Weight(
            self.0
                .checked_sub(&rhs.0)
                .expect("underflow in Weight - Weight"),
        )
    }
}

impl<T> SubAssign for Weight<T>
where
    T: Copy + CheckedSub<Output = T>,
{
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        self.0 = self
            .0
            .checked_sub(&rhs.0)
            .expect("underflow in Weight -= Weight");
    }
}

impl<T: Copy + CheckedSub<Output = T>> CheckedSub for Weight<T> {
    #[inline]
    fn checked_sub(&self, rhs: &Self) -> Option<Self> {
        self.0.checked_sub(&rhs.0).map(Weight)
    }
}

impl<T> Sum for Weight<T>
where
    T: Copy + CheckedAdd<Output = T> + Zero,
{
    #[inline]
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Weight::new(T::zero()), |a, b| a + b)
    }
}

impl<'a, T> Sum<&'a Weight<T>> for Weight<T>
where
    T: Copy + CheckedAdd<Output = T> + Zero,
{
    #[inline]
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.fold(Weight::new(T::zero()), |a, b| a + *b)
    }
}

impl<T: Copy + Zero + CheckedAdd> Zero for Weight<T> {
    fn zero() -> Self {
        Weight(T::zero())
    }

    fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl<T> From<T> for Weight<T> {
    #[inline]
    fn from(value: T) -> Self {
        Weight(value)
    }
}
