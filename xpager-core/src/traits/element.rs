//! Matrix element type constraints
//!
//! This module defines the trait that constrains what types can be
//! stored as cell values in a page.

use core::ops::Add;

/// Trait for types that can be stored as matrix elements
///
/// Values cross thread boundaries between pipeline stages, and duplicate
/// coordinates are summed during assembly, so elements must be
/// `Send + Sync` and support addition.
pub trait MatrixElement:
    Copy + PartialEq + Add<Output = Self> + Send + Sync + core::fmt::Debug + 'static
{
    /// Additive identity
    fn zero() -> Self;
}

macro_rules! impl_matrix_element {
    ($($ty:ty => $zero:expr),* $(,)?) => {
        $(
            impl MatrixElement for $ty {
                fn zero() -> Self {
                    $zero
                }
            }
        )*
    };
}

impl_matrix_element! {
    f32 => 0.0,
    f64 => 0.0,
    i32 => 0,
    i64 => 0,
    u32 => 0,
    u64 => 0,
}
