//! Benchmarks for probe output parsing
//!
//! Measures the line grammar over realistic ffmpeg diagnostic captures and
//! the output sizing that follows a probe.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ffwrap::{MediaDescriptor, ProbeTextScanner};

/// Header of a single-stream AVI as printed by a classic ffmpeg build.
const HEADER_SIMPLE: &str = "FFmpeg version SVN-r6338, Copyright (c) 2000-2006 Fabrice Bellard, et al.\n\
Input #0, avi, from 'clip.avi':\n\
  Duration: 00:01:05.3, start: 0.000000, bitrate: 1250 kb/s\n\
  Stream #0.0: Video: mpeg4, yuv420p, 641x481, 25.00 fps(r)\n\
  Stream #0.1: Audio: mp3, 44100 Hz, stereo, 128 kb/s\n\
Press [q] to stop encoding\n";

/// The simple header followed by a long run of progress rewrites.
fn header_with_progress(frames: usize) -> String {
    let mut text = String::from(HEADER_SIMPLE);
    for i in 0..frames {
        let secs = i as f64 * 0.04;
        text.push_str(&format!(
            "\rframe={i:5} fps= 50 q=2.0 size={:8}kB time={secs:.2} bitrate= 491.5kbits/s    ",
            i * 2
        ));
    }
    text
}

fn bench_scan_text(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan_text");

    group.throughput(Throughput::Bytes(HEADER_SIMPLE.len() as u64));
    group.bench_with_input(
        BenchmarkId::new("header", "simple"),
        &HEADER_SIMPLE,
        |b, text| {
            b.iter(|| ProbeTextScanner::scan_text(black_box(text)));
        },
    );

    for frames in [100usize, 1000] {
        let text = header_with_progress(frames);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("header_with_progress", frames),
            &text,
            |b, text| {
                b.iter(|| ProbeTextScanner::scan_text(black_box(text)));
            },
        );
    }

    group.finish();
}

fn bench_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("fit");

    let descriptor: MediaDescriptor = ProbeTextScanner::scan_text(HEADER_SIMPLE);

    group.bench_function("fit_video/640x480", |b| {
        b.iter(|| black_box(&descriptor).fit_video(640, 480));
    });

    group.bench_function("fit_audio/3_rates", |b| {
        b.iter(|| black_box(&descriptor).fit_audio(&[44100, 22050, 11025]));
    });

    group.finish();
}

criterion_group!(benches, bench_scan_text, bench_fit);
criterion_main!(benches);
