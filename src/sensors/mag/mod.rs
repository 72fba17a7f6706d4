pub(crate) mod calibration;
pub(crate) mod error;
pub(crate) mod hmc5883l;
pub(crate) mod reader;
pub(crate) mod registry;

pub(crate) use error::{MagError, MagResult};
