//! Rule dispatch and object-graph traversal

pub(crate) mod dispatch;
pub(crate) mod traverse;

pub(crate) use dispatch::apply_declaration;
pub(crate) use traverse::Walker;
