use super::*;

mod offline;
mod sync;
