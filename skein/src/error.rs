use thiserror::Error;

use crate::gpu;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("viewport must not be empty (got {width}x{height})")]
    EmptyViewport { width: u32, height: u32 },

    #[error("unknown material: {0:?}")]
    UnknownMaterial(gpu::MaterialId),

    #[error("triangle has no area")]
    DegenerateTriangle,

    #[error(
        "pass `{pass}` got a buffer of {actual} items, but its viewport needs \
         {expected}"
    )]
    BufferSizeMismatch {
        pass: String,
        expected: usize,
        actual: usize,
    },
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("`{field}` must be within {range} (got {value})")]
    OutOfRange {
        field: &'static str,
        range: &'static str,
        value: String,
    },
}

impl ConfigError {
    pub(crate) fn out_of_range(
        field: &'static str,
        range: &'static str,
        value: impl ToString,
    ) -> Self {
        Self::OutOfRange {
            field,
            range,
            value: value.to_string(),
        }
    }

    pub fn field(&self) -> &'static str {
        match self {
            Self::OutOfRange { field, .. } => field,
        }
    }
}
