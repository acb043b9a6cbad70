use serde::Serialize;
use seutu_core::error::SeutuError;
use std::path::Path;

pub fn print<T: Serialize>(value: &T) -> Result<(), SeutuError> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}

pub fn write<T: Serialize>(value: &T, path: &Path) -> Result<(), SeutuError> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json)?;
    Ok(())
}
