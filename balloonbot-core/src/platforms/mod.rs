// File: src/platforms/mod.rs

pub mod afreeca;
