mod node;
mod validate;

pub(crate) use node::{Insertion, Node, OnDuplicate, Pair};
pub(crate) use validate::Validator;
