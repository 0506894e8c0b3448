#![allow(missing_docs)]

//! Typed physical quantities, so that the energy formula can only combine compatible values.
//!
//! Each quantity wraps an `f64`. Multiplying two quantities is only allowed where the product has
//! a meaning (area by irradiance gives power, power by time gives energy). Any quantity can be
//! scaled by a [`Dimensionless`] factor.
use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Div, Mul};

/// A plain number: a fraction, a factor or a percentage.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    PartialOrd,
    Serialize,
    Deserialize,
    derive_more::Add,
    derive_more::Sub,
    derive_more::From,
    derive_more::Into,
)]
pub struct Dimensionless(pub f64);

impl Dimensionless {
    /// The raw number
    pub fn value(self) -> f64 {
        self.0
    }

    /// False for NaN and the infinities
    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }
}

impl Mul for Dimensionless {
    type Output = Self;

    fn mul(self, factor: Self) -> Self {
        Self(self.0 * factor.0)
    }
}

impl Div for Dimensionless {
    type Output = Self;

    fn div(self, divisor: Self) -> Self {
        Self(self.0 / divisor.0)
    }
}

/// Declare a quantity which can be added to itself and scaled by [`Dimensionless`] factors
macro_rules! quantity {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            PartialOrd,
            Serialize,
            Deserialize,
            derive_more::Add,
            derive_more::Sub,
            derive_more::From,
        )]
        pub struct $name(pub f64);

        impl $name {
            /// The raw number, in this quantity's base unit
            pub fn value(self) -> f64 {
                self.0
            }

            /// False for NaN and the infinities
            pub fn is_finite(self) -> bool {
                self.0.is_finite()
            }
        }

        impl Mul<Dimensionless> for $name {
            type Output = Self;

            fn mul(self, factor: Dimensionless) -> Self {
                Self(self.0 * factor.0)
            }
        }

        impl Mul<$name> for Dimensionless {
            type Output = $name;

            fn mul(self, quantity: $name) -> $name {
                quantity * self
            }
        }

        impl Div<Dimensionless> for $name {
            type Output = Self;

            fn div(self, divisor: Dimensionless) -> Self {
                Self(self.0 / divisor.0)
            }
        }

        /// Dividing like by like gives a ratio
        impl Div for $name {
            type Output = Dimensionless;

            fn div(self, divisor: Self) -> Dimensionless {
                Dimensionless(self.0 / divisor.0)
            }
        }

        impl Sum for $name {
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                iter.fold(Self(0.0), |total, x| total + x)
            }
        }
    };
}

/// Allow `$a * $b` (in either order), giving `$product`
macro_rules! product {
    ($a:ty, $b:ty => $product:ty) => {
        impl Mul<$b> for $a {
            type Output = $product;

            fn mul(self, other: $b) -> $product {
                <$product>::from(self.0 * other.0)
            }
        }

        impl Mul<$a> for $b {
            type Output = $product;

            fn mul(self, other: $a) -> $product {
                other * self
            }
        }
    };
}

quantity!(Area); // m²
quantity!(Hours); // h
quantity!(Energy); // Wh
quantity!(Power); // W
quantity!(Irradiance); // W/m²

product!(Area, Irradiance => Power);
product!(Power, Hours => Energy);
