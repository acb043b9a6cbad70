use seutu_core::catalog::builtin;
use seutu_core::catalog::load_catalog;
use seutu_core::catalog::schema::{Catalog, DatasetDef};
use seutu_core::error::SeutuError;
use seutu_core::jsonstat::IndicatorMode;
use std::path::Path;

pub fn list() -> Result<(), SeutuError> {
    println!("Available catalogs:\n");
    for name in builtin::PRESETS {
        let catalog = builtin::load_preset(name)?;
        println!(
            "  {:<8} {} dataset(s), {} series (v{})",
            name,
            catalog.datasets.len(),
            catalog.published_names().len(),
            catalog.version
        );
        if let Some(ref desc) = catalog.description {
            println!("           {}", desc);
        }
        println!();
    }
    Ok(())
}

pub fn show(preset: &str) -> Result<(), SeutuError> {
    let catalog = builtin::load_preset(preset)?;
    print_catalog(&catalog);
    Ok(())
}

pub fn validate(file: &Path) -> Result<(), SeutuError> {
    let catalog = load_catalog(file)?;
    println!(
        "Valid catalog: {} (v{}), {} dataset(s), {} series",
        catalog.name,
        catalog.version,
        catalog.datasets.len(),
        catalog.published_names().len()
    );
    Ok(())
}

fn mode_name(def: &DatasetDef) -> String {
    match &def.decode.mode {
        IndicatorMode::Select { keywords } if keywords.is_empty() => "single".to_string(),
        IndicatorMode::Select { keywords } => format!("select [{}]", keywords.join(", ")),
        IndicatorMode::Split => "split".to_string(),
        IndicatorMode::Sum => "sum".to_string(),
    }
}

fn print_catalog(catalog: &Catalog) {
    println!("{} (version {})\n", catalog.name, catalog.version);
    if let Some(ref desc) = catalog.description {
        println!("{}\n", desc);
    }

    for def in &catalog.datasets {
        println!("  {} -- {}", def.name, mode_name(def));
        if let Some(ref desc) = def.description {
            println!("    {}", desc);
        }
        println!("    {}", def.url);
        let years: Vec<String> = def.years.iter().map(|y| y.to_string()).collect();
        println!("    years: {}", years.join(", "));

        for pick in &def.series {
            match &pick.code {
                Some(code) => println!("    -> {:<28} code {}", pick.name, code),
                None => println!("    -> {:<28} {} label rule(s)", pick.name, pick.rules.len()),
            }
        }
        println!();
    }
}
