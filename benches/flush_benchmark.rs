//! Flush benchmark: Measure dirty-run rendering and full flushes.
//!
//! Target: < 500µs for a fully dirty 200×50 surface

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use std::io;
use ttysurface::input::Event;
use ttysurface::surface::flush::render_dirty;
use ttysurface::terminal::OutputBuffer;
use ttysurface::{Surface, Terminal};

const FORMATS: [&str; 4] = ["0", "1", "1;31", "7"];

/// Create a surface with varied content and formats, fully dirty.
fn create_test_surface(width: u16, height: u16, seed: u16) -> Surface {
    let mut surface = Surface::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let c = char::from(b'A' + ((x + y + seed) % 26) as u8);
            let format = FORMATS[usize::from((x / 8 + y + seed) % 4)];
            surface.write_cell(x, y, Some(c), format).unwrap();
        }
    }
    surface
}

/// Same surface after a flush, so nothing is dirty.
fn clean_surface(width: u16, height: u16) -> Surface {
    let mut surface = create_test_surface(width, height, 0);
    surface.flush(&mut io::sink()).unwrap();
    surface
}

fn render_clean(c: &mut Criterion) {
    let surface = clean_surface(200, 50);

    c.bench_function("render_200x50_clean", |b| {
        b.iter(|| {
            let mut output = OutputBuffer::with_capacity(4096);
            render_dirty(black_box(&surface), &mut output)
        })
    });
}

fn render_single_cell(c: &mut Criterion) {
    let mut surface = clean_surface(200, 50);
    surface.set_char(100, 25, Some('X')).unwrap();

    c.bench_function("render_200x50_single_change", |b| {
        b.iter(|| {
            let mut output = OutputBuffer::with_capacity(4096);
            render_dirty(black_box(&surface), &mut output)
        })
    });
}

fn render_line(c: &mut Criterion) {
    let mut surface = clean_surface(200, 50);
    surface.fill_rect(0, 25, 200, 26, '*').unwrap();

    c.bench_function("render_200x50_line_change", |b| {
        b.iter(|| {
            let mut output = OutputBuffer::with_capacity(4096);
            render_dirty(black_box(&surface), &mut output)
        })
    });
}

fn render_full(c: &mut Criterion) {
    let surface = create_test_surface(200, 50, 0);

    c.bench_function("render_200x50_full", |b| {
        b.iter(|| {
            let mut output = OutputBuffer::with_capacity(65536);
            render_dirty(black_box(&surface), &mut output)
        })
    });
}

fn flush_by_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("flush_by_size");

    for (width, height) in [(80, 24), (120, 40), (200, 50), (300, 80)] {
        let surface = create_test_surface(width, height, 1);

        group.bench_with_input(
            BenchmarkId::new("full_dirty", format!("{width}x{height}")),
            &surface,
            |b, surface| {
                b.iter_batched(
                    || surface.clone(),
                    |mut s| s.flush(&mut io::sink()),
                    BatchSize::SmallInput,
                );
            },
        );
    }

    group.finish();
}

fn print_and_flush(c: &mut Criterion) {
    let mut surface = Surface::new(80, 25);
    let mut sink = io::sink();

    c.bench_function("print_scroll_flush_80x25", |b| {
        b.iter(|| {
            let mut tty = Terminal::new(&mut surface);
            tty.print(black_box("Hello world! Hello world! Hello world!\n"))
                .unwrap();
            surface.flush(&mut sink).unwrap()
        })
    });
}

fn classify_events(c: &mut Criterion) {
    let chunks = ["q", "\x1b[<0;5;10M", "\x1b[<35;120;40M", "\x1b[A", "\x1b[<64;1;1m"];

    c.bench_function("classify_mixed_chunks", |b| {
        b.iter(|| {
            for chunk in chunks {
                black_box(Event::classify(black_box(chunk)));
            }
        })
    });
}

criterion_group!(
    benches,
    render_clean,
    render_single_cell,
    render_line,
    render_full,
    flush_by_size,
    print_and_flush,
    classify_events,
);
criterion_main!(benches);
