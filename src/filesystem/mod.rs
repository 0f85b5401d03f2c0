// src/filesystem/mod.rs

//! Filesystem helpers for run roots

pub mod path;
