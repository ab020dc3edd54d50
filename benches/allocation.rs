use carnival_booking::allocation::{label, Allocation, Seat};
use carnival_booking::clock::FixedClock;
use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn clock() -> FixedClock {
    FixedClock::new(
        NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap(),
    )
}

/// Fill a 100x26 hall seat by seat, then empty it again
fn bench_book_cancel(c: &mut Criterion) {
    let clock = clock();
    let mut group = c.benchmark_group("hall_100x26");

    group.bench_function("book_all", |b| {
        b.iter(|| {
            let mut seats = Allocation::<Seat>::new(100, 26).unwrap();
            for row in 0..100 {
                for column in 0..26 {
                    seats.book_at(row, column, "bench", &clock).unwrap();
                }
            }
            black_box(seats.statistics())
        });
    });

    group.bench_function("book_then_cancel", |b| {
        b.iter(|| {
            let mut seats = Allocation::<Seat>::new(100, 26).unwrap();
            for row in 0..100 {
                for column in 0..26 {
                    seats.book_at(row, column, "bench", &clock).unwrap();
                    seats.cancel_at(row, column).unwrap();
                }
            }
            black_box(seats.grid().available_count())
        });
    });

    group.finish();
}

fn bench_parse(c: &mut Criterion) {
    let inputs = ["5B", " b5 ", "100Z", "12 c", "BB", "0A"];
    c.bench_function("parse_labels", |b| {
        b.iter(|| {
            for input in inputs {
                let _ = black_box(label::parse(black_box(input)));
            }
        });
    });
}

criterion_group!(benches, bench_book_cancel, bench_parse);
criterion_main!(benches);
