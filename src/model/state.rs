//! Named parameter state for checkpoint serialization.
//!
//! Parameters are stored as a flat `f32` buffer plus per-parameter name and
//! shape records, in declaration order. This is the layout the training
//! pipeline writes under the checkpoint's `model` key.

use crate::error::{Error, Result};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Name and shape of one serialized parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamInfo {
    pub name: String,
    pub shape: Vec<usize>,
}

/// Ordered collection of named parameters with a shared flat data buffer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateDict {
    pub parameters: Vec<ParamInfo>,
    pub data: Vec<f32>,
}

impl StateDict {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter. The value length must match the shape product.
    pub fn push(&mut self, name: impl Into<String>, shape: Vec<usize>, values: &[f32]) {
        debug_assert_eq!(shape.iter().product::<usize>(), values.len());
        self.parameters.push(ParamInfo {
            name: name.into(),
            shape,
        });
        self.data.extend_from_slice(values);
    }

    /// Look up a parameter by name, returning its shape and value slice.
    pub fn get(&self, name: &str) -> Option<(&[usize], &[f32])> {
        let mut offset = 0;
        for info in &self.parameters {
            let size: usize = info.shape.iter().product();
            if info.name == name {
                return Some((&info.shape, &self.data[offset..offset + size]));
            }
            offset += size;
        }
        None
    }

    /// Like [`StateDict::get`], but the parameter must exist with exactly
    /// the expected shape.
    pub fn expect(&self, name: &str, expected: &[usize]) -> Result<&[f32]> {
        let (shape, values) = self
            .get(name)
            .ok_or_else(|| Error::MissingParameter(name.to_string()))?;
        if shape != expected {
            return Err(Error::ShapeMismatch {
                name: name.to_string(),
                expected: expected.to_vec(),
                actual: shape.to_vec(),
            });
        }
        Ok(values)
    }

    /// Materialize a matrix parameter with the expected dimensions.
    pub fn array2(&self, name: &str, rows: usize, cols: usize) -> Result<Array2<f32>> {
        let values = self.expect(name, &[rows, cols])?;
        Ok(Array2::from_shape_vec((rows, cols), values.to_vec())
            .expect("shape product checked against value length"))
    }

    /// Materialize a vector parameter with the expected length.
    pub fn array1(&self, name: &str, len: usize) -> Result<Array1<f32>> {
        let values = self.expect(name, &[len])?;
        Ok(Array1::from_vec(values.to_vec()))
    }

    /// Parameter names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.parameters.iter().map(|p| p.name.as_str())
    }

    /// Number of parameters (not scalar count).
    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }
}
