// src/commands/classify.rs

//! Classify command

use anyhow::Result;
use envtree::{PathClassifier, SectionKey};

/// Print the relative folder for a key and optional object name
pub fn cmd_classify(key: &str, object: Option<&str>) -> Result<()> {
    let key = SectionKey::new(key);
    let path = PathClassifier::classify(&key, object);
    if path.is_empty() {
        println!("(root)");
    } else {
        println!("{}", path);
    }
    Ok(())
}
