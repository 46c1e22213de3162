mod report;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use polynet::format::{read_polyhedron, write_net, write_polyhedron, Format, WriteMode};
use polynet::geom2::BBox2;
use polynet::unwrap::{unwrap_with_stats, UnwrapCfg};
use serde_json::json;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Off,
    Obj,
    Idat,
}

impl From<FormatArg> for Format {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Off => Format::Off,
            FormatArg::Obj => Format::Obj,
            FormatArg::Idat => Format::Idat,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "convertahedron", version)]
#[command(about = "Convert polyhedra between OFF, OBJ, and the native format, or unwrap them into nets")]
struct Cmd {
    /// Input format (default: sniffed from contents, then extension)
    #[arg(short = 'i', value_enum)]
    input_format: Option<FormatArg>,

    /// Output format (default: extension, then idat)
    #[arg(short = 'o', value_enum)]
    output_format: Option<FormatArg>,

    /// Overwrite an existing output file
    #[arg(short = 'c', long = "clobber")]
    clobber: bool,

    input: PathBuf,
    output: PathBuf,

    /// Write the unwrapped net (native #Polynet) instead of the polyhedron
    #[arg(long)]
    net: bool,

    /// Anchor face for --net
    #[arg(long, default_value_t = 0, requires = "net")]
    anchor: usize,

    /// Unwrap every connected component for --net
    #[arg(long, requires = "net")]
    all_components: bool,

    /// Fit the net into a W x H rectangle at the origin
    #[arg(long, num_args = 2, value_names = ["W", "H"], requires = "net")]
    fit: Option<Vec<f64>>,

    /// Margin inside the --fit rectangle
    #[arg(long, default_value_t = 0.0, requires = "fit")]
    margin: f64,

    /// Also write <output stem>.report.json
    #[arg(long)]
    report: bool,

    /// More log output (-v info, -vv debug)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cmd = match Cmd::try_parse() {
        Ok(cmd) => cmd,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                    ExitCode::SUCCESS
                }
                _ => ExitCode::from(1),
            };
        }
    };
    let level = match cmd.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
    match run(&cmd) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}

fn run(cmd: &Cmd) -> Result<()> {
    let mode = if cmd.clobber {
        WriteMode::Overwrite
    } else {
        WriteMode::Create
    };
    let imported = read_polyhedron(&cmd.input, cmd.input_format.map(Format::from))
        .with_context(|| format!("reading {}", cmd.input.display()))?;
    let poly = imported.value;
    let mut anomalies = imported.log;

    let mut payload = report::Payload::new(
        &cmd.input,
        json!({
            "input_format": cmd.input_format.map(|f| Format::from(f).name()),
            "output_format": cmd.output_format.map(|f| Format::from(f).name()),
            "net": cmd.net,
            "anchor": cmd.anchor,
            "all_components": cmd.all_components,
            "fit": cmd.fit,
            "margin": cmd.margin,
        }),
    );

    if cmd.net {
        if let Some(f) = cmd.output_format.map(Format::from).filter(|f| *f != Format::Idat) {
            bail!("nets are written in the native format only, not {f}");
        }
        let cfg = UnwrapCfg {
            anchor: cmd.anchor,
            all_components: cmd.all_components,
            ..UnwrapCfg::default()
        };
        let (mut net, log, stats) = unwrap_with_stats(&poly, &cfg)
            .with_context(|| format!("unwrapping {}", cmd.input.display()))?;
        anomalies.append(log);
        if let Some(&[w, h]) = cmd.fit.as_deref() {
            if net.fit_to_rect(&BBox2::from_size(w, h), cmd.margin).is_none() {
                tracing::warn!(w, h, "fit rectangle is degenerate; net left unscaled");
            }
        }
        net.apply_transform(None);
        write_net(&net, &cmd.output, mode)
            .with_context(|| format!("writing {}", cmd.output.display()))?;
        tracing::info!(
            faces = stats.faces_placed,
            folds = stats.folds,
            cuts = stats.cuts,
            components = stats.components,
            "unwrapped"
        );
        payload.counts = json!({
            "points": poly.point_count(),
            "faces": poly.face_count(),
            "unwrap": stats,
        });
    } else {
        let fmt = write_polyhedron(
            &poly,
            &cmd.output,
            cmd.output_format.map(Format::from),
            mode,
        )
        .with_context(|| format!("writing {}", cmd.output.display()))?;
        tracing::info!(format = %fmt, "converted");
        payload.counts = json!({
            "points": poly.point_count(),
            "faces": poly.face_count(),
        });
    }

    if !anomalies.is_empty() {
        tracing::warn!(count = anomalies.len(), "input had anomalies");
    }
    if cmd.report {
        payload.anomalies = anomalies;
        let path = report::write_report(&cmd.output, payload)?;
        tracing::info!(path = %path.display(), "wrote report");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use polynet::format::read_net;
    use polynet::shapes;
    use tempfile::tempdir;

    fn parse(args: &[&str]) -> Result<Cmd, clap::Error> {
        Cmd::try_parse_from(std::iter::once("convertahedron").chain(args.iter().copied()))
    }

    #[test]
    fn parses_converter_flags() {
        let cmd = parse(&["-i", "off", "in.txt", "-o", "obj", "-c", "out.txt"]).unwrap();
        assert_eq!(cmd.input_format, Some(FormatArg::Off));
        assert_eq!(cmd.output_format, Some(FormatArg::Obj));
        assert!(cmd.clobber);
        assert_eq!(cmd.output, PathBuf::from("out.txt"));
        assert!(!cmd.net);
    }

    #[test]
    fn usage_errors_are_reported() {
        assert!(parse(&["only-input"]).is_err());
        assert!(parse(&["-i", "stl", "a", "b"]).is_err());
        // --anchor needs --net
        assert!(parse(&["--anchor", "2", "a", "b"]).is_err());
        let help = parse(&["--help"]).unwrap_err();
        assert_eq!(help.kind(), ErrorKind::DisplayHelp);
    }

    #[test]
    fn converts_and_refuses_to_clobber() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("cube.off");
        write_polyhedron(&shapes::cube(1.0), &input, None, WriteMode::Create).unwrap();
        let output = dir.path().join("cube.obj");
        let args = [input.to_str().unwrap(), output.to_str().unwrap()];

        run(&parse(&args).unwrap()).unwrap();
        let back = read_polyhedron(&output, None).unwrap();
        assert_eq!(back.value.face_count(), 6);
        assert!(run(&parse(&args).unwrap()).is_err());

        let clobber = [input.to_str().unwrap(), "-c", output.to_str().unwrap()];
        run(&parse(&clobber).unwrap()).unwrap();
    }

    #[test]
    fn writes_fitted_net_and_report() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("dodeca.idat");
        write_polyhedron(&shapes::dodecahedron(), &input, None, WriteMode::Create).unwrap();
        let output = dir.path().join("dodeca_net.idat");
        let cmd = parse(&[
            "--net",
            "--fit",
            "210",
            "297",
            "--margin",
            "10",
            "--report",
            input.to_str().unwrap(),
            output.to_str().unwrap(),
        ])
        .unwrap();
        run(&cmd).unwrap();

        let net = read_net(&output).unwrap().value;
        assert_eq!(net.counts().folds, 11);
        let bb = net.find_bbox().unwrap();
        assert!(bb.within(&BBox2::from_size(210.0, 297.0), 1e-9));

        let report: serde_json::Value = serde_json::from_slice(
            &std::fs::read(dir.path().join("dodeca_net.report.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(report["counts"]["unwrap"]["cuts"], 19);
        assert_eq!(report["anomaly_count"], 0);
    }

    #[test]
    fn net_output_must_be_native() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("t.off");
        write_polyhedron(&shapes::tetrahedron(), &input, None, WriteMode::Create).unwrap();
        let output = dir.path().join("t.obj");
        let cmd = parse(&["--net", "-o", "obj", input.to_str().unwrap(), output.to_str().unwrap()])
            .unwrap();
        assert!(run(&cmd).is_err());
        assert!(!output.exists());
    }
}
