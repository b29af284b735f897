use std::fmt::Debug;

use num_traits::Num;

/// A numeric type that can be used for positions and sizes in the packer.
///
/// Implemented for the primitive integer and floating point types. Integral
/// types grow to the next power of two by doubling, floating point types by
/// rounding their base-2 logarithm up.
pub trait Coordinate: Num + Copy + PartialOrd + Default + Debug {
    /// A type wide enough to hold the product of any two coordinates, used
    /// for areas.
    type Area: Num + Copy + PartialOrd + Debug;

    /// Converts into the area type without losing precision.
    fn widen(self) -> Self::Area;

    /// The area of a `width` by `height` rectangle, computed in the wider
    /// area type so it can't overflow.
    fn area(width: Self, height: Self) -> Self::Area {
        width.widen() * height.widen()
    }

    /// Rounds up to the nearest power of two. Values at or below zero round
    /// up to one.
    fn next_power_of_two(self) -> Self;

    /// Subtracts `other`, saturating at zero instead of going negative or
    /// wrapping around.
    fn clamped_sub(self, other: Self) -> Self {
        if self > other {
            self - other
        } else {
            Self::zero()
        }
    }

    /// The larger of the two values. `self` wins ties.
    fn max_of(self, other: Self) -> Self {
        if other > self {
            other
        } else {
            self
        }
    }

    /// The smaller of the two values. `self` wins ties.
    fn min_of(self, other: Self) -> Self {
        if other < self {
            other
        } else {
            self
        }
    }

    /// Two, for doubling borders.
    fn two() -> Self {
        Self::one() + Self::one()
    }
}

macro_rules! impl_integral {
    ($($ty:ty => $area:ty),*) => {
        $(
            impl Coordinate for $ty {
                type Area = $area;

                #[inline]
                fn widen(self) -> $area {
                    self as $area
                }

                fn next_power_of_two(self) -> Self {
                    if self <= 0 {
                        return 1;
                    }

                    let mut power: $ty = 1;
                    while power < self {
                        match power.checked_shl(1) {
                            Some(next) if next > power => power = next,
                            // Doubling would overflow, so this is as close as
                            // the type can get.
                            _ => return self,
                        }
                    }

                    power
                }
            }
        )*
    };
}

macro_rules! impl_floating {
    ($($ty:ty),*) => {
        $(
            impl Coordinate for $ty {
                type Area = f64;

                #[inline]
                fn widen(self) -> f64 {
                    self.into()
                }

                fn next_power_of_two(self) -> Self {
                    if self <= 0.0 {
                        return 1.0;
                    }

                    (2.0 as $ty).powf(self.log2().ceil())
                }
            }
        )*
    };
}

impl_integral!(
    u16 => u32,
    u32 => u64,
    u64 => u128,
    usize => u128,
    i16 => i32,
    i32 => i64,
    i64 => i128,
    isize => i128
);
impl_floating!(f32, f64);

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn integral_power_of_two() {
        assert_eq!(Coordinate::next_power_of_two(0u32), 1);
        assert_eq!(Coordinate::next_power_of_two(1u32), 1);
        assert_eq!(Coordinate::next_power_of_two(3u32), 4);
        assert_eq!(Coordinate::next_power_of_two(300u32), 512);
        assert_eq!(Coordinate::next_power_of_two(512u32), 512);
        assert_eq!(Coordinate::next_power_of_two(-20i32), 1);
        assert_eq!(Coordinate::next_power_of_two(1000i64), 1024);
        assert_eq!(Coordinate::next_power_of_two(u32::MAX), u32::MAX);
    }

    #[test]
    fn floating_power_of_two() {
        assert_eq!(0.0f32.next_power_of_two(), 1.0);
        assert_eq!(400.0f32.next_power_of_two(), 512.0);
        assert_eq!(256.0f64.next_power_of_two(), 256.0);
        assert_eq!(0.3f64.next_power_of_two(), 0.5);
    }

    #[test]
    fn clamped_sub_never_goes_negative() {
        assert_eq!(3u32.clamped_sub(5), 0);
        assert_eq!(5u32.clamped_sub(3), 2);
        assert_eq!(1.5f32.clamped_sub(2.0), 0.0);
    }

    #[test]
    fn area_does_not_overflow() {
        assert_eq!(Coordinate::area(1024u16, 1024u16), 1_048_576u32);
        assert_eq!(Coordinate::area(u32::MAX, 2u32), u64::from(u32::MAX) * 2);
        assert_eq!(Coordinate::area(-300i16, 300i16), -90_000i32);
        assert_eq!(Coordinate::area(1.5f32, 2.0f32), 3.0f64);
    }
}
