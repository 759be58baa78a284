use std::{
    hint::black_box,
    io::Cursor,
    path::Path,
};

use criterion::{
    Criterion,
    criterion_group,
    criterion_main,
};
use video_to_cvid::{
    Encoding,
    MAX_FRAME_SIZE,
    MonoFrame,
    MonoVideo,
    RunState,
    output::encode_stream,
    packed::pack_frame,
};

/// Diagonal bands, so both encoders see plenty of polarity changes.
fn banded_frame(seed: u16) -> MonoFrame
{
    let (width, height) = (MAX_FRAME_SIZE.width, MAX_FRAME_SIZE.height);
    let data = (0..height)
        .flat_map(|y| (0..width).map(move |x| if (x + y + seed) % 24 < 12 { 30 } else { 220 }))
        .collect();
    MonoFrame::new(data, width, height)
}

fn bench_packers(c: &mut Criterion)
{
    let frame = banded_frame(0);

    c.bench_function("pack_frame 240x126", |b| {
        let mut out = Vec::with_capacity(4096);
        b.iter(|| {
            out.clear();
            pack_frame(black_box(&frame), 128, &mut out);
        })
    });

    c.bench_function("run_length frame 240x126", |b| {
        let mut out = Vec::with_capacity(4096);
        b.iter(|| {
            out.clear();
            let mut state = RunState::new();
            state.encode_frame(black_box(&frame), 128, &mut out);
            state.finish(&mut out);
        })
    });
}

fn bench_stream(c: &mut Criterion)
{
    let frames: Vec<_> = (0..30).map(banded_frame).collect();

    for encoding in [Encoding::Packed, Encoding::RunLength]
    {
        c.bench_function(&format!("encode_stream 30 frames {}", encoding), |b| {
            b.iter(|| {
                let mut video = MonoVideo::from_frames(&frames, 30.0);
                let output = Cursor::new(Vec::with_capacity(64 * 1024));
                encode_stream(&mut video, encoding, 128, output, Path::new("memory")).unwrap()
            })
        });
    }
}

criterion_group!(benches, bench_packers, bench_stream);
criterion_main!(benches);
