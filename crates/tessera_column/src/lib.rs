pub mod datatype;
pub mod encoding;
pub mod field;
pub mod scalar;
