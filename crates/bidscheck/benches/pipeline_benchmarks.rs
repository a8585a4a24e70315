//! Validation pipeline benchmarks.
//!
//! Runs whole-dataset validation over in-memory file lists.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use bidscheck::{BidsCheck, BidsCheckConfig, FileRef, ValidatorOptions};

const SIDECAR: &str = r#"{"RepetitionTime": 2.0, "SliceTiming": [0.0, 0.5, 1.0, 1.5], "EchoTime": 0.03}"#;
const EVENTS: &str = "onset\tduration\ttrial_type\n0\t10\trest\n10\t10\ttask\n20\t10\trest\n";

/// Build a NIfTI-1 header (little-endian, seconds/mm units).
fn nifti_header(volumes: i16) -> Vec<u8> {
    let mut bytes = vec![0u8; 348];
    bytes[0..4].copy_from_slice(&348i32.to_le_bytes());
    let dim: [i16; 8] = [4, 64, 64, 32, volumes, 1, 1, 1];
    for (i, d) in dim.iter().enumerate() {
        bytes[40 + i * 2..42 + i * 2].copy_from_slice(&d.to_le_bytes());
    }
    let pixdim: [f32; 8] = [1.0, 3.0, 3.0, 3.0, 2.0, 0.0, 0.0, 0.0];
    for (i, p) in pixdim.iter().enumerate() {
        bytes[76 + i * 4..80 + i * 4].copy_from_slice(&p.to_le_bytes());
    }
    bytes[123] = 10;
    bytes[344..348].copy_from_slice(b"n+1\0");
    bytes
}

/// Generate an in-memory dataset with the given number of subjects.
fn generate_dataset(subjects: usize) -> Vec<FileRef> {
    let mut files = vec![
        FileRef::in_memory("/dataset_description.json", r#"{"Name": "bench"}"#),
        FileRef::in_memory("/task-rest_bold.json", SIDECAR),
    ];
    let mut participants = String::from("participant_id\tage\n");
    for s in 0..subjects {
        let sub = format!("sub-{:03}", s);
        participants.push_str(&format!("{}\t{}\n", sub, 20 + s % 50));
        files.push(FileRef::in_memory(
            format!("/{0}/anat/{0}_T1w.nii", sub),
            nifti_header(1),
        ));
        files.push(FileRef::in_memory(
            format!("/{0}/func/{0}_task-rest_bold.nii", sub),
            nifti_header(120),
        ));
        files.push(FileRef::in_memory(
            format!("/{0}/func/{0}_task-rest_events.tsv", sub),
            EVENTS,
        ));
    }
    files.push(FileRef::in_memory("/participants.tsv", participants));
    files
}

fn bench_validate(c: &mut Criterion) {
    let mut group = c.benchmark_group("validate_files");

    for subjects in [10, 100, 500].iter() {
        let files = generate_dataset(*subjects);

        group.throughput(Throughput::Elements(files.len() as u64));
        group.bench_with_input(BenchmarkId::new("subjects", subjects), &files, |b, files| {
            let check = BidsCheck::new();
            b.iter(|| black_box(check.validate_files(files.clone()).unwrap()))
        });
    }

    group.finish();
}

fn bench_thread_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("thread_scaling");
    let files = generate_dataset(200);

    for threads in [1, 2, 4, 8].iter() {
        group.bench_with_input(BenchmarkId::new("threads", threads), &files, |b, files| {
            let config = BidsCheckConfig::default().with_threads(*threads);
            let check = BidsCheck::with_config(config);
            b.iter(|| black_box(check.validate_files(files.clone()).unwrap()))
        });
    }

    group.finish();
}

fn bench_without_headers(c: &mut Criterion) {
    let files = generate_dataset(200);
    let options = ValidatorOptions::default().with_ignore_nifti_headers(true);
    let check = BidsCheck::with_config(BidsCheckConfig::default().with_options(options));

    c.bench_function("validate_files_without_headers", |b| {
        b.iter(|| black_box(check.validate_files(files.clone()).unwrap()))
    });
}

criterion_group!(benches, bench_validate, bench_thread_scaling, bench_without_headers);
criterion_main!(benches);
