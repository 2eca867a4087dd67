/// Partial derivatives of the error for one upstream connection of a unit.
///
/// During a backpropagation pass a unit records one `Gradient` per incoming
/// connection, in connection order, so `gradients[i]` belongs to `weights[i]`.
/// Either field may be unset while the record is being filled in.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Gradient {
    /// ∂E/∂a: how much the unit's activation affects the error.
    pub d_activation: Option<f64>,
    /// ∂E/∂w: how much the connection's weight affects the error.
    pub d_weight: Option<f64>,
}

impl Gradient {
    #[inline]
    pub fn new(d_activation: f64, d_weight: f64) -> Self {
        Self {
            d_activation: Some(d_activation),
            d_weight: Some(d_weight),
        }
    }

    #[inline]
    pub fn with_activation(d_activation: f64) -> Self {
        Self {
            d_activation: Some(d_activation),
            d_weight: None,
        }
    }

    #[inline]
    pub fn with_weight(d_weight: f64) -> Self {
        Self {
            d_activation: None,
            d_weight: Some(d_weight),
        }
    }

    /// The weight change `-learning_rate * ∂E/∂w`, or zero if `d_weight` is unset.
    #[inline]
    pub fn delta(&self, learning_rate: f64) -> f64 {
        self.d_weight.map_or(0.0, |dw| -learning_rate * dw)
    }
}
