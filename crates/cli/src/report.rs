use anyhow::{Context, Result};
use polynet::format::{write_atomic, WriteMode};
use polynet::AnomalyLog;
use serde::Serialize;
use serde_json::Value;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Contents of a conversion report sidecar.
pub struct Payload {
    pub input: PathBuf,
    pub params: Value,
    pub counts: Value,
    pub anomalies: AnomalyLog,
}

impl Payload {
    pub fn new(input: &Path, params: Value) -> Self {
        Self {
            input: input.to_path_buf(),
            params,
            counts: Value::Null,
            anomalies: AnomalyLog::new(),
        }
    }
}

#[derive(Serialize)]
struct ReportDoc<'a> {
    code_rev: String,
    version: &'static str,
    input: String,
    outputs: Vec<String>,
    params: &'a Value,
    counts: &'a Value,
    anomaly_count: usize,
    anomalies: &'a AnomalyLog,
}

/// Write `<output stem>.report.json` with the code revision, params, counts, and anomalies.
pub fn write_report<P: AsRef<Path>>(output: P, payload: Payload) -> Result<PathBuf> {
    let output = output.as_ref();
    let report_path = report_path(output);
    let doc = ReportDoc {
        code_rev: code_rev(),
        version: polynet::VERSION,
        input: payload.input.to_string_lossy().into_owned(),
        outputs: vec![output.to_string_lossy().into_owned()],
        params: &payload.params,
        counts: &payload.counts,
        anomaly_count: payload.anomalies.len(),
        anomalies: &payload.anomalies,
    };
    let text = serde_json::to_string_pretty(&doc)?;
    // Replaces any earlier report for this output.
    write_atomic(&report_path, &text, WriteMode::Overwrite)
        .with_context(|| format!("writing {}", report_path.display()))?;
    Ok(report_path)
}

fn report_path(output: &Path) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| OsString::from("output"));
    let mut name = stem;
    name.push(".report.json");
    output.with_file_name(name)
}

/// Revision of the running code: `GIT_COMMIT` at run time, then at build time,
/// then the checkout this crate was built from.
pub fn code_rev() -> String {
    let nonempty = |r: &String| !r.trim().is_empty();
    std::env::var("GIT_COMMIT")
        .ok()
        .filter(nonempty)
        .or_else(|| option_env!("GIT_COMMIT").map(str::to_owned).filter(nonempty))
        .or_else(checkout_head)
        .unwrap_or_else(|| "unknown".to_owned())
}

fn checkout_head() -> Option<String> {
    let out = Command::new("git")
        .args(["rev-parse", "--short=12", "HEAD"])
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .output()
        .ok()?;
    let rev = String::from_utf8_lossy(&out.stdout).trim().to_owned();
    (out.status.success() && !rev.is_empty()).then_some(rev)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polynet::Anomaly;
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn report_path_rewrites_extension() {
        let base = Path::new("/tmp/output/cube.off");
        assert_eq!(report_path(base), Path::new("/tmp/output/cube.report.json"));
    }

    #[test]
    fn write_report_lists_anomalies() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("net.idat");
        let mut payload = Payload::new(Path::new("in.off"), json!({"anchor": 0}));
        payload.anomalies.push(Anomaly::UnreachableFace { face: 3 });
        payload.counts = json!({"faces": 6});
        let path = write_report(&output, payload).unwrap();
        let parsed: Value = serde_json::from_slice(&fs::read(path).unwrap()).unwrap();
        assert_eq!(parsed["outputs"][0], output.to_string_lossy().as_ref());
        assert_eq!(parsed["anomaly_count"], 1);
        assert_eq!(parsed["anomalies"][0]["kind"], "unreachable_face");
        assert_eq!(parsed["anomalies"][0]["face"], 3);
        assert_eq!(parsed["counts"]["faces"], 6);
    }

    #[test]
    fn rewriting_a_report_replaces_it_in_place() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("cube.obj");
        let first = Payload::new(Path::new("a.off"), json!({}));
        write_report(&output, first).unwrap();
        let mut second = Payload::new(Path::new("b.off"), json!({}));
        second.anomalies.push(Anomaly::UnreachableFace { face: 1 });
        let path = write_report(&output, second).unwrap();

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![OsString::from("cube.report.json")]);
        let parsed: Value = serde_json::from_slice(&fs::read(path).unwrap()).unwrap();
        assert_eq!(parsed["input"], "b.off");
        assert_eq!(parsed["anomaly_count"], 1);
        assert!(!parsed["code_rev"].as_str().unwrap().is_empty());
    }
}
