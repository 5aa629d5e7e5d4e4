//! operators — linear maps shared by the TV objective and the solvers.
//!
//! Purpose
//! -------
//! Collect the linear building blocks of TV reconstruction in one place: the
//! discrete gradient `L` with its adjoint, the forward models `A` used by the
//! data-fidelity term, and the small tensor reductions and inner solvers they
//! rely on.
//!
//! Key behaviors
//! -------------
//! - [`gradient`]: forward-difference gradient `L` / negative divergence `L*`
//!   with zero padding and the constant bound `LNORM2 = 8`.
//! - [`forward`]: the [`ForwardOperator`](forward::ForwardOperator) trait plus
//!   the identity (denoising) and convolution (deblurring) models.
//! - [`cg`]: conjugate gradients for the data prox when no closed form exists.
//! - [`linalg`]: inner products and norms over arbitrary-dimensional arrays.
//!
//! Invariants & assumptions
//! ------------------------
//! - Images are `(channel, height, width)` and gradient fields
//!   `(channel, 2, height, width)`; see [`types`].
//! - Every operator is linear and has an exact adjoint under the
//!   zero-boundary convention.
//!
//! Conventions
//! -----------
//! - Operators never log and never mutate their inputs.
//! - Validation failures surface as [`errors::OperatorError`].

pub mod cg;
pub mod errors;
pub mod forward;
pub mod gradient;
pub mod linalg;
pub mod types;

pub mod prelude {
    pub use super::cg::CgOptions;
    pub use super::errors::{OperatorError, OperatorResult};
    pub use super::forward::{Convolution, ForwardOperator, Identity, gaussian_kernel};
    pub use super::gradient::GradientOperator;
    pub use super::types::{GradField, Image, LNORM2};
}
