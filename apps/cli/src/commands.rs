use crate::args::ManifestArg;
use anyhow::Result;
use hdac::domain::config::ProbeConfig;
use hdac::manifest::Manifest;
use hdac::{Pipeline, fs_environment, load_manifest};
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;

/// One line of the resolution table.
#[derive(Debug, Serialize)]
struct Row<'a> {
    dependency: &'a str,
    mandatory: bool,
    chosen: Option<String>,
    path: Option<&'a Path>,
}

fn load(arg: &ManifestArg) -> Result<Manifest> {
    Ok(load_manifest(arg.path.as_deref())?)
}

pub(crate) fn check(arg: &ManifestArg) -> Result<()> {
    let manifest = load(arg)?;
    let mandatory = manifest.dependencies().iter().filter(|d| d.mandatory).count();

    let mut out = io::stdout().lock();
    writeln!(
        out,
        "ok: {} base sources, {} dependencies ({mandatory} mandatory), {} fallbacks",
        manifest.base().len(),
        manifest.dependencies().len(),
        manifest.fallbacks().len(),
    )?;
    Ok(())
}

pub(crate) fn resolve(arg: &ManifestArg, probe: &ProbeConfig, json: bool) -> Result<()> {
    let manifest = load(arg)?;
    let env = fs_environment(probe)?;
    let results = Pipeline::new(&manifest).environment(env).resolve()?;

    let rows: Vec<Row<'_>> = results
        .iter()
        .map(|r| Row {
            dependency: &r.dependency().name,
            mandatory: r.dependency().mandatory,
            chosen: r.chosen().map(ToString::to_string),
            path: r.location(),
        })
        .collect();

    let mut out = io::stdout().lock();
    if json {
        serde_json::to_writer_pretty(&mut out, &rows)?;
        writeln!(out)?;
        return Ok(());
    }

    let width = rows.iter().map(|r| r.dependency.len()).max().unwrap_or(0);
    for row in &rows {
        let flag = if row.mandatory { "mandatory" } else { "optional " };
        let chosen = row.chosen.as_deref().unwrap_or("-");
        write!(out, "{:width$}  {flag}  {chosen}", row.dependency)?;
        if let Some(path) = row.path {
            write!(out, "  {}", path.display())?;
        }
        writeln!(out)?;
    }
    Ok(())
}

pub(crate) fn compose(arg: &ManifestArg, probe: &ProbeConfig, output: Option<&Path>) -> Result<()> {
    let manifest = load(arg)?;
    let env = fs_environment(probe)?;
    let composition = Pipeline::new(&manifest).environment(env).run()?;

    match output {
        Some(path) => composition.write_to(path)?,
        None => {
            let mut out = io::stdout().lock();
            out.write_all(composition.header.as_bytes())?;
            out.flush()?;
        },
    }
    Ok(())
}
