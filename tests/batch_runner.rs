mod common;

use odflow::batch::{list_input_files, run_batch};
use odflow::{BatchParams, OdFlowError, ReaderParams};

use common::{read_lines, record, utf8_tempdir, write_log};

#[test]
fn test_batch_over_directory() {
    let (_guard, dir) = utf8_tempdir();
    write_log(
        &dir,
        "Ofuscado_b.csv",
        &[
            record("S5", "08:00:00", "50", Some("V1")),
            record("S6", "08:01:00", "50", Some("V1")),
        ],
    );
    write_log(
        &dir,
        "Ofuscado_a.csv",
        &[record("S1", "08:00:00", "50", Some("V1"))],
    );
    write_log(
        &dir,
        "Ofuscado_c.csv",
        &[record("S1", "not-a-time", "50", Some("V1"))],
    );
    write_log(
        &dir,
        "notes.csv",
        &[record("S1", "08:00:00", "50", Some("V1"))],
    );

    let params = BatchParams::builder(&dir).build().unwrap();
    let report = run_batch(&params).unwrap();

    let processed: Vec<_> = report
        .processed
        .iter()
        .map(|p| p.file_name().unwrap())
        .collect();
    assert_eq!(processed, vec!["Ofuscado_a.csv", "Ofuscado_b.csv"]);
    assert_eq!(report.failed.len(), 1);
    assert!(report.failed[0].0.ends_with("Ofuscado_c.csv"));
    assert!(matches!(report.failed[0].1, OdFlowError::Parse { line: 1, .. }));
    assert!(!report.is_success());

    let out = dir.join("output");
    // each file starts from a fresh session
    assert_eq!(read_lines(&out.join("Ofuscado_b_IDS")), vec!["S5 , 0", "S6 , 1"]);
    assert_eq!(read_lines(&out.join("Ofuscado_a_IDS")), vec!["S1 , 0"]);
    assert_eq!(read_lines(&out.join("Ofuscado_b_MAXTIME"))[1], "0, 1 , 60000");
    assert!(out.join("Ofuscado_a_TRAJ").exists());

    assert!(!out.join("Ofuscado_c_IDS").exists());
    assert!(!out.join("Ofuscado_c_TRAJ").exists());
    assert!(!out.join("notes_IDS").exists());
}

#[test]
fn test_custom_pattern_and_layout() {
    let (_guard, dir) = utf8_tempdir();
    write_log(
        &dir,
        "day1.txt",
        &[
            "V1,S1,2016/03/14,08:00:00,42".to_string(),
            "V1,S2,2016/03/14,08:00:30,42".to_string(),
        ],
    );
    let (_out_guard, out) = utf8_tempdir();

    let reader = ReaderParams::builder()
        .separator(b',')
        .vehicle_id_index(0)
        .sensor_code_index(1)
        .date_index(2)
        .time_index(3)
        .speed_index(4)
        .date_separator('/')
        .build()
        .unwrap();
    let params = BatchParams::builder(&dir)
        .output_dir(&out)
        .file_pattern(r"\.txt$")
        .write_max_time(false)
        .reader(reader)
        .build()
        .unwrap();

    assert_eq!(list_input_files(&params).unwrap().len(), 1);

    let report = run_batch(&params).unwrap();
    assert!(report.is_success(), "{:?}", report.failed);
    assert_eq!(read_lines(&out.join("day1_MATRIX"))[1], "0, 1 , 1");
    assert!(!out.join("day1_MAXTIME").exists());
}

#[test]
fn test_missing_input_dir() {
    let (_guard, dir) = utf8_tempdir();
    let params = BatchParams::builder(dir.join("nope")).build().unwrap();
    assert!(matches!(
        run_batch(&params),
        Err(OdFlowError::WalkDirError(_))
    ));
}
