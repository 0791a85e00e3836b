//! RGBA colours, channel rescaling and Porter-Duff "over" compositing.

use std::{fmt, ops::AddAssign};

use serde::{Deserialize, Serialize};

use crate::grid::{points, GridError, GridView, GridViewMut};

/// Numeric representation of a single colour channel.
///
/// Integral channels span `0..=MAX`; floating channels span `0.0..=1.0`.
pub trait Channel: Copy + Default + PartialEq + fmt::Debug {
    /// Largest value the representation stores for a fully saturated channel.
    const MAX: f64;
    /// Whether the representation is fixed-point.
    const INTEGRAL: bool;

    /// Widens the stored value without rescaling it.
    fn to_f64(self) -> f64;

    /// Narrows a value that is already in this representation's range.
    fn from_f64(value: f64) -> Self;
}

macro_rules! integral_channel {
    ($($ty:ty),*) => {
        $(
            impl Channel for $ty {
                const MAX: f64 = <$ty>::MAX as f64;
                const INTEGRAL: bool = true;

                fn to_f64(self) -> f64 {
                    f64::from(self)
                }

                fn from_f64(value: f64) -> Self {
                    value as $ty
                }
            }
        )*
    };
}

integral_channel!(u8, u16, u32);

impl Channel for f32 {
    const MAX: f64 = 1.0;
    const INTEGRAL: bool = false;

    fn to_f64(self) -> f64 {
        f64::from(self)
    }

    fn from_f64(value: f64) -> Self {
        value as f32
    }
}

impl Channel for f64 {
    const MAX: f64 = 1.0;
    const INTEGRAL: bool = false;

    fn to_f64(self) -> f64 {
        self
    }

    fn from_f64(value: f64) -> Self {
        value
    }
}

/// Four-channel colour parameterised over its channel representation.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Color<N> {
    /// Red intensity.
    pub red: N,
    /// Green intensity.
    pub green: N,
    /// Blue intensity.
    pub blue: N,
    /// Opacity, where the channel maximum is fully opaque.
    pub alpha: N,
}

/// Eight-bit colour used by frame buffers and tile sprites.
pub type Pixel = Color<u8>;

impl<N> Color<N> {
    /// Creates a colour from explicit channel values.
    #[must_use]
    pub const fn new(red: N, green: N, blue: N, alpha: N) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }
}

impl Color<u8> {
    /// Fully transparent black, the cleared state of a frame buffer.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    /// Creates a fully opaque colour.
    #[must_use]
    pub const fn opaque(red: u8, green: u8, blue: u8) -> Self {
        Self::new(red, green, blue, u8::MAX)
    }
}

impl<N: Channel> Color<N> {
    /// Reports whether the colour contributes nothing when composited.
    #[must_use]
    pub fn is_transparent(&self) -> bool {
        self.alpha.to_f64() <= 0.0
    }
}

/// Rescales every channel of `color` into another representation.
///
/// Floating channels are interpreted on `[0, 1]`; integral channels on
/// `[0, MAX]`. Conversions that land on an integral representation round half
/// away from zero.
#[must_use]
pub fn color_cast<Out: Channel, In: Channel>(color: Color<In>) -> Color<Out> {
    let channel = |value: In| {
        let raw = value.to_f64();
        let scaled = match (In::INTEGRAL, Out::INTEGRAL) {
            (false, false) => raw,
            (false, true) => (raw * Out::MAX).round(),
            (true, true) => (raw / In::MAX * Out::MAX).round(),
            (true, false) => raw / In::MAX,
        };
        Out::from_f64(scaled)
    };

    Color::new(
        channel(color.red),
        channel(color.green),
        channel(color.blue),
        channel(color.alpha),
    )
}

/// Draws `top` over the receiver, replacing it with the composite.
///
/// Blending happens in double precision before casting back. When both
/// colours are fully transparent the receiver is left unchanged.
impl<N: Channel, M: Channel> AddAssign<Color<M>> for Color<N> {
    fn add_assign(&mut self, top: Color<M>) {
        let top: Color<f64> = color_cast(top);
        let bottom: Color<f64> = color_cast(*self);

        let below = (1.0 - top.alpha) * bottom.alpha;
        let alpha = below + top.alpha;
        if alpha <= 0.0 {
            return;
        }

        let blend = |upper: f64, lower: f64| (below * lower + top.alpha * upper) / alpha;
        *self = color_cast(Color::new(
            blend(top.red, bottom.red),
            blend(top.green, bottom.green),
            blend(top.blue, bottom.blue),
            alpha,
        ));
    }
}

/// Replaces every destination cell with the source cell at the same local point.
pub fn copy<N, D, S>(dest: &mut D, source: &S) -> Result<(), GridError>
where
    N: Channel,
    D: GridViewMut<Color<N>> + ?Sized,
    S: GridView<Color<N>> + ?Sized,
{
    for point in points(source.size()) {
        dest.set(point, *source.at(point)?)?;
    }
    Ok(())
}

/// Composites every source cell over the destination cell at the same local point.
pub fn overlay<N, M, D, S>(dest: &mut D, source: &S) -> Result<(), GridError>
where
    N: Channel,
    M: Channel,
    D: GridViewMut<Color<N>> + ?Sized,
    S: GridView<Color<M>> + ?Sized,
{
    for point in points(source.size()) {
        let top = *source.at(point)?;
        *dest.at_mut(point)? += top;
    }
    Ok(())
}
