// src/models/model.rs
/// Scalar SDE `dX_t = a(X_t, t) dt + b(X_t, t) dW_t`.
pub trait SDEModel {
    fn drift(&self, x: f64, t: f64) -> f64;
    fn diffusion(&self, x: f64, t: f64) -> f64;
}
