use std::fs::{create_dir_all, File};
use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::*;

pub fn ensure_dir(path: &Path) -> Result<()> {
    create_dir_all(path).with_context(|| format!("creating {}", path.display()))
}

pub fn dataframe_to_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    let mut file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b',')
        .finish(df)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
