use std::{fs, io::Write};

use camino::{Utf8Path, Utf8PathBuf};

pub const SAMPLE: &str = "tests/data/Ofuscado_20160314.csv";

/// One raw record in the default `;` layout; `vehicle` `None` drops the last column.
pub fn record(sensor: &str, time: &str, speed: &str, vehicle: Option<&str>) -> String {
    let mut line = format!("{sensor};2016-03-14;{time};L1;A;{speed};x;x");
    if let Some(v) = vehicle {
        line.push(';');
        line.push_str(v);
    }
    line
}

pub fn write_log(dir: &Utf8Path, name: &str, lines: &[String]) -> Utf8PathBuf {
    let path = dir.join(name);
    let mut file = fs::File::create(&path).unwrap();
    for line in lines {
        writeln!(file, "{line}").unwrap();
    }
    path
}

pub fn utf8_tempdir() -> (tempfile::TempDir, Utf8PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
    (dir, path)
}

pub fn read_lines(path: &Utf8Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}
