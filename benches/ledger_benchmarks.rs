use chrono::{Duration as DayOffset, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fleetbook_api::ledger::{
    accounts::AccountLine, build_monthly_report, charges::ChargeLine, trip_balance, ExpenseTotals,
    MonthPeriod, OwnershipClass, ReportTrip,
};
use rust_decimal::Decimal;
use std::time::Duration;
use uuid::Uuid;

fn charges(count: usize) -> Vec<ChargeLine> {
    (0..count)
        .map(|i| ChargeLine::new(Decimal::new(250 + i as i64, 0), i % 3 != 0))
        .collect()
}

fn accounts(count: usize) -> Vec<AccountLine> {
    (0..count)
        .map(|i| {
            if i % 2 == 0 {
                AccountLine::advance(Decimal::new(1000, 0))
            } else {
                AccountLine::payment(Decimal::new(2500, 0))
            }
        })
        .collect()
}

// Balance of a single trip as its charge and account rows grow
fn trip_balance_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("trip_balance");

    for size in [1usize, 10, 50, 200].iter() {
        let charge_rows = charges(*size);
        let account_rows = accounts(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                trip_balance(
                    black_box(Some(Decimal::new(45_000, 0))),
                    black_box(charge_rows.as_slice()),
                    black_box(account_rows.as_slice()),
                )
            });
        });
    }

    group.finish();
}

// Monthly report over a month's worth of trips
fn monthly_report_benchmark(c: &mut Criterion) {
    let period = MonthPeriod::from_name("January", 2024).expect("valid period");
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 6, 0, 0).unwrap();

    let mut group = c.benchmark_group("monthly_report");
    for size in [10usize, 100, 1000].iter() {
        let trips: Vec<ReportTrip> = (0..*size)
            .map(|i| ReportTrip {
                id: Uuid::new_v4(),
                trip_id: format!("T-{}", i),
                truck_no: Some(format!("TN0{}AB{:04}", i % 9, i)),
                party_name: Some("Acme Cements".into()),
                route: "Chennai - Salem".into(),
                ownership: if i % 4 == 0 { OwnershipClass::Market } else { OwnershipClass::Owned },
                start_date: start + DayOffset::hours(i as i64 % 700),
                amount: Decimal::new(20_000 + i as i64, 0),
                charge_to_bill: Decimal::new(500, 0),
                charge_not_to_bill: Decimal::new(125, 0),
            })
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                build_monthly_report(
                    black_box(&period),
                    trips.iter().cloned(),
                    ExpenseTotals {
                        total_expense: Decimal::new(40_000, 0),
                        total_office_expense: Decimal::new(12_500, 0),
                    },
                )
            });
        });
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .measurement_time(Duration::from_secs(10))
        .sample_size(100);
    targets =
        trip_balance_benchmark,
        monthly_report_benchmark
}

criterion_main!(benches);
