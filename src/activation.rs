//! Activation functions.
//!
//! A unit computes a weighted sum `z = w · x + b` and then applies its activation:
//! `a = activation(z)`.
//!
//! Backpropagation only ever needs the derivative in terms of the cached
//! post-activation output `a`, so no pre-activation value is kept around.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Scalar activation of a unit.
pub enum Activation {
    /// Logistic sigmoid, used by every trainable unit.
    Sigmoid,
    /// Pass-through, used by input units.
    Identity,
}

impl Activation {
    #[inline]
    pub fn forward(self, x: f64) -> f64 {
        match self {
            Activation::Sigmoid => sigmoid(x),
            Activation::Identity => x,
        }
    }

    /// Derivative of the activation with respect to its input, expressed in terms
    /// of the cached post-activation output `a`.
    #[inline]
    pub fn grad_from_output(self, a: f64) -> f64 {
        match self {
            Activation::Sigmoid => a * (1.0 - a),
            Activation::Identity => 1.0,
        }
    }
}

/// The logistic function `1 / (1 + e^-x)`.
///
/// Total over the extended reals: `sigmoid(-inf) == 0.0` and `sigmoid(inf) == 1.0`.
#[inline]
pub fn sigmoid(x: f64) -> f64 {
    // Split on the sign so `exp` never overflows.
    if x >= 0.0 {
        let z = (-x).exp();
        1.0 / (1.0 + z)
    } else {
        let z = x.exp();
        z / (1.0 + z)
    }
}
