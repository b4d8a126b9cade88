//! Writes a deterministic synthetic two-year daily-rental CSV in the source
//! schema, for demos and manual testing of the engine binary.

use std::env;
use std::f64::consts::PI;

use anyhow::{Context, Result};
use chrono::{Datelike, Days, NaiveDate, Weekday};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos();
        mean + std_dev * z
    }
}

fn season_of(date: NaiveDate) -> &'static str {
    match date.month() {
        3..=5 => "spring",
        6..=8 => "summer",
        9..=11 => "fall",
        _ => "winter",
    }
}

fn is_holiday(date: NaiveDate) -> bool {
    const HOLIDAYS: [(u32, u32); 5] = [(1, 1), (5, 1), (7, 4), (12, 25), (12, 26)];
    HOLIDAYS.contains(&(date.month(), date.day()))
}

/// Seasonal temperature curve, normalized to roughly [0, 1], coldest in
/// late January.
fn base_temp(date: NaiveDate) -> f64 {
    let day = date.ordinal() as f64;
    0.5 - 0.35 * ((day - 28.0) / 365.0 * 2.0 * PI).cos()
}

fn main() -> Result<()> {
    let output = env::args()
        .nth(1)
        .unwrap_or_else(|| "all_data.csv".to_string());

    let mut rng = SimpleRng::new(42);
    let mut writer = csv::Writer::from_path(&output)
        .with_context(|| format!("creating output file {output}"))?;
    writer.write_record([
        "record_date",
        "season",
        "weather_status",
        "temp",
        "workingday",
        "holiday",
        "total_rentals",
    ])?;

    let start = NaiveDate::from_ymd_opt(2023, 1, 1).context("start date")?;
    let mut rows = 0u32;

    for offset in 0..730u64 {
        let date = start
            .checked_add_days(Days::new(offset))
            .context("date range overflow")?;

        let holiday = is_holiday(date);
        let weekend = matches!(date.weekday(), Weekday::Sat | Weekday::Sun);
        let working_day = !weekend && !holiday;

        let roll = rng.next_f64();
        let weather_code = if roll < 0.55 {
            1
        } else if roll < 0.85 {
            2
        } else if roll < 0.97 {
            3
        } else {
            4
        };

        let temp = (base_temp(date) + rng.gauss(0.0, 0.05)).clamp(0.02, 0.98);

        let weather_factor = [1.0, 0.85, 0.55, 0.25][weather_code - 1];
        let day_factor = if working_day { 1.0 } else { 0.88 };
        let expected = 4500.0 * (0.35 + 0.9 * temp) * weather_factor * day_factor;
        let total_rentals = (expected + rng.gauss(0.0, 250.0)).max(0.0) as u64;

        writer.write_record([
            date.format("%Y-%m-%d").to_string(),
            season_of(date).to_string(),
            weather_code.to_string(),
            format!("{temp:.4}"),
            u8::from(working_day).to_string(),
            u8::from(holiday).to_string(),
            total_rentals.to_string(),
        ])?;
        rows += 1;
    }

    writer.flush()?;
    println!("Wrote {rows} daily records to {output}");
    Ok(())
}
