// src/config/mod.rs

pub mod catalog;
pub mod consts;
pub mod options;
