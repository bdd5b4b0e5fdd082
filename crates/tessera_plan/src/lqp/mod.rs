pub mod aggregate;
pub mod constraints;
pub mod join;
pub mod limit;
pub mod node;
pub mod predicate;
pub mod projection;
pub mod sort;
pub mod stored_table;
pub mod union;
pub mod validate;
