#[cfg(feature = "python-bindings")]
use std::sync::Arc;

#[cfg(feature = "python-bindings")]
use ndarray::{Array2, Axis, Ix2, Ix3};

#[cfg(feature = "python-bindings")]
use numpy::{PyReadonlyArray2, PyReadonlyArrayDyn};

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    objective::{isotropy::Isotropy, problem::TVProblem},
    operators::{
        forward::{Convolution, ForwardOperator, Identity},
        types::Image,
    },
};

/// Convert a 2-D `(H, W)` or 3-D `(C, H, W)` float64 array into an [`Image`].
#[cfg(feature = "python-bindings")]
pub fn extract_image<'py>(raw: &Bound<'py, PyAny>) -> PyResult<Image> {
    let arr: PyReadonlyArrayDyn<f64> = raw.extract().map_err(|_| {
        pyo3::exceptions::PyTypeError::new_err("expected a 2-D or 3-D numpy.ndarray of float64")
    })?;
    let view = arr.as_array();
    match view.ndim() {
        2 => {
            let plane = view
                .into_dimensionality::<Ix2>()
                .map_err(|e| PyValueError::new_err(e.to_string()))?;
            Ok(plane.insert_axis(Axis(0)).to_owned())
        }
        3 => Ok(view
            .into_dimensionality::<Ix3>()
            .map_err(|e| PyValueError::new_err(e.to_string()))?
            .to_owned()),
        n => Err(PyValueError::new_err(format!("image must be 2-D or 3-D; got {n} dimensions"))),
    }
}

#[cfg(feature = "python-bindings")]
pub fn extract_kernel<'py>(raw: &Bound<'py, PyAny>) -> PyResult<Array2<f64>> {
    let arr: PyReadonlyArray2<f64> = raw.extract().map_err(|_| {
        pyo3::exceptions::PyTypeError::new_err("kernel must be a 2-D numpy.ndarray of float64")
    })?;
    Ok(arr.as_array().to_owned())
}

/// Build a validated problem: identity when `kernel` is `None`, otherwise a
/// per-channel convolution.
#[cfg(feature = "python-bindings")]
pub fn build_problem<'py>(
    y: &Bound<'py, PyAny>, reg: f64, isotropy: &str, kernel: Option<&Bound<'py, PyAny>>,
) -> PyResult<TVProblem> {
    let y = extract_image(y)?;
    let isotropy: Isotropy = isotropy.parse()?;
    let op: Arc<dyn ForwardOperator> = match kernel {
        Some(raw) => Arc::new(Convolution::new(extract_kernel(raw)?)?),
        None => Arc::new(Identity),
    };
    Ok(TVProblem::from_operator(op, y, reg, isotropy)?)
}
