use bazi_calendar::{CalendarOracle, Sex, SolarTermCalendar, apparent_solar_longitude_deg, next_jie};
use chrono::NaiveDate;
use criterion::{Criterion, black_box, criterion_group, criterion_main};

fn solar_bench(c: &mut Criterion) {
    let jd = 2_460_000.5;

    let mut group = c.benchmark_group("solar");
    group.bench_function("apparent_longitude", |b| {
        b.iter(|| apparent_solar_longitude_deg(black_box(jd)))
    });
    group.bench_function("next_jie", |b| b.iter(|| next_jie(black_box(jd))));
    group.finish();
}

fn oracle_bench(c: &mut Criterion) {
    let cal = SolarTermCalendar::default();
    let birth = NaiveDate::from_ymd_opt(2007, 1, 28)
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .unwrap();

    let mut group = c.benchmark_group("oracle");
    group.bench_function("natal_pillars", |b| {
        b.iter(|| cal.natal_pillars(black_box(birth)))
    });
    group.bench_function("luck_cycles", |b| {
        b.iter(|| cal.luck_cycles(black_box(birth), Sex::Male))
    });
    group.finish();
}

criterion_group!(benches, solar_bench, oracle_bench);
criterion_main!(benches);
