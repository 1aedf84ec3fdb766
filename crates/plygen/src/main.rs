//! Generate a plywood frame on the cuboid kernel and print its model report.
//!
//! Usage: `plygen [PRESET] [--at X,Y,Z] [--save PATH] [--json]`
//!
//! Without a preset the dialog defaults are used. `--save` writes the
//! parameters back out as a current-version preset.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use frame_config::{load_preset_file, save_preset_file, PresetMetadata};
use frame_engine::generate;
use frame_kernel::BoxKernel;
use frame_types::ParameterSet;
use nalgebra::Vector3;
use test_harness::ModelReport;
use tracing::info;

#[derive(Debug, Default)]
struct Args {
    preset: Option<PathBuf>,
    placement: Vector3<f64>,
    save: Option<PathBuf>,
    json: bool,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args> {
    let mut parsed = Args::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--at" => {
                let value = args.next().context("--at needs X,Y,Z")?;
                parsed.placement = parse_point(&value)?;
            }
            "--save" => {
                let path = args.next().context("--save needs a path")?;
                parsed.save = Some(PathBuf::from(path));
            }
            "--json" => parsed.json = true,
            flag if flag.starts_with("--") => bail!("unknown option {flag}"),
            path => {
                if parsed.preset.is_some() {
                    bail!("only one preset may be given");
                }
                parsed.preset = Some(PathBuf::from(path));
            }
        }
    }
    Ok(parsed)
}

fn parse_point(value: &str) -> Result<Vector3<f64>> {
    let coords = value
        .split(',')
        .map(|c| c.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("bad coordinate in {value:?}"))?;
    match coords.as_slice() {
        [x, y, z] => Ok(Vector3::new(*x, *y, *z)),
        _ => bail!("expected three coordinates, got {value:?}"),
    }
}

fn main() -> Result<()> {
    // Default: WARN for everything, INFO for the frame crates.
    // Override with RUST_LOG (e.g. RUST_LOG=joinery_ops=debug).
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("frame_engine=info".parse().unwrap_or_default())
        .add_directive("plygen=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let args = parse_args(std::env::args().skip(1))?;

    let (params, metadata) = match &args.preset {
        Some(path) => load_preset_file(path)
            .with_context(|| format!("loading preset {}", path.display()))?,
        None => (ParameterSet::default(), PresetMetadata::new("Default frame")),
    };
    info!(preset = %metadata.name, "parameters ready");

    if let Some(path) = &args.save {
        let mut metadata = metadata.clone();
        metadata.touch();
        save_preset_file(path, &params, &metadata)
            .with_context(|| format!("saving preset {}", path.display()))?;
        info!(path = %path.display(), "preset saved");
    }

    let mut kernel = BoxKernel::new();
    let assembly = generate(&params, args.placement, &mut kernel)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&assembly)?);
        return Ok(());
    }

    let report = ModelReport::build(&kernel, &assembly)?;
    print!("{report}");
    if !report.all_passed() {
        bail!("generated frame failed verification");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args> {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn no_arguments_means_defaults() {
        let parsed = args(&[]).unwrap();
        assert!(parsed.preset.is_none());
        assert_eq!(parsed.placement, Vector3::zeros());
        assert!(!parsed.json);
    }

    #[test]
    fn preset_and_flags() {
        let parsed = args(&["frame.json", "--at", "1, 2,3", "--json"]).unwrap();
        assert_eq!(parsed.preset, Some(PathBuf::from("frame.json")));
        assert_eq!(parsed.placement, Vector3::new(1.0, 2.0, 3.0));
        assert!(parsed.json);
    }

    #[test]
    fn bad_arguments_are_rejected() {
        assert!(args(&["--at", "1,2"]).is_err());
        assert!(args(&["--wat"]).is_err());
        assert!(args(&["a.json", "b.json"]).is_err());
        assert!(args(&["--save"]).is_err());
    }
}
