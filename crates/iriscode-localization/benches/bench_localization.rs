use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

use iriscode_image::{Image, ImageSize};
use iriscode_localization::IrisLocalizer;

fn synthetic_eye(width: usize, height: usize) -> Image<u8, 1> {
    let (cx, cy) = (width as f32 / 2.0, height as f32 / 2.0);
    let pupil = height as f32 / 7.0;
    let iris = pupil * 2.5;
    Image::from_fn(ImageSize { width, height }, |x, y| {
        let d = ((x as f32 - cx).powi(2) + (y as f32 - cy).powi(2)).sqrt();
        if d <= pupil {
            20
        } else if d <= iris {
            120
        } else {
            200
        }
    })
    .unwrap()
}

fn bench_localization(c: &mut Criterion) {
    let mut group = c.benchmark_group("Localization");
    let localizer = IrisLocalizer::default();

    for (width, height) in [(320, 280), (640, 480)].iter() {
        let image = synthetic_eye(*width, *height);

        group.bench_with_input(
            BenchmarkId::new("localize", format!("{}x{}", width, height)),
            &image,
            |b, image| b.iter(|| black_box(localizer.localize(image))),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_localization);
criterion_main!(benches);
