//! Writes a synthetic, semicolon-separated bank marketing dataset for
//! trying out the dashboard.
//!
//! Usage: `generate_sample [OUTPUT]` (defaults to `sample_bank.csv`).

use anyhow::{Context, Result};

const ROWS: usize = 1_000;

const JOBS: [&str; 12] = [
    "admin.",
    "blue-collar",
    "entrepreneur",
    "housemaid",
    "management",
    "retired",
    "self-employed",
    "services",
    "student",
    "technician",
    "unemployed",
    "unknown",
];
const MARITAL: [&str; 3] = ["married", "single", "divorced"];
const EDUCATION: [&str; 4] = ["primary", "secondary", "tertiary", "unknown"];
const CONTACT: [&str; 3] = ["cellular", "telephone", "unknown"];
const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];
// more categories than the bar chart will draw
const BRANCHES: [&str; 15] = [
    "Lisbon", "Porto", "Braga", "Coimbra", "Faro", "Aveiro", "Evora", "Leiria", "Viseu",
    "Setubal", "Guarda", "Beja", "Funchal", "Viana", "Sintra",
];

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
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    fn pick<'a>(&mut self, options: &[&'a str]) -> &'a str {
        options[(self.next_u64() % options.len() as u64) as usize]
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

fn main() -> Result<()> {
    let output = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "sample_bank.csv".to_string());
    let mut rng = SimpleRng::new(42);

    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_path(&output)
        .with_context(|| format!("Failed to create {output}"))?;

    writer.write_record([
        "age", "job", "marital", "education", "default", "balance", "housing", "loan",
        "contact", "day", "month", "duration", "campaign", "branch", "y",
    ])?;

    for _ in 0..ROWS {
        let age = rng.gauss(41.0, 10.5).clamp(18.0, 95.0).round() as i64;

        // heavy right tail plus a few extreme accounts
        let mut balance = rng.gauss(1_200.0, 900.0).round();
        if rng.chance(0.03) {
            balance *= 25.0;
        }
        let balance = if rng.chance(0.02) {
            String::new()
        } else {
            format!("{balance}")
        };

        let duration = (rng.gauss(5.5, 0.8).exp()).round() as i64;
        let campaign = 1 + (rng.next_f64().powi(4) * 30.0) as i64;
        let day = 1 + (rng.next_u64() % 31) as i64;
        let subscribed = rng.chance(0.12 + (duration as f64 / 5_000.0).min(0.3));

        writer.write_record([
            age.to_string(),
            rng.pick(&JOBS).to_string(),
            rng.pick(&MARITAL).to_string(),
            rng.pick(&EDUCATION).to_string(),
            yes_no(rng.chance(0.02)).to_string(),
            balance,
            yes_no(rng.chance(0.55)).to_string(),
            yes_no(rng.chance(0.16)).to_string(),
            rng.pick(&CONTACT).to_string(),
            day.to_string(),
            rng.pick(&MONTHS).to_string(),
            duration.to_string(),
            campaign.to_string(),
            rng.pick(&BRANCHES).to_string(),
            yes_no(subscribed).to_string(),
        ])?;
    }
    writer.flush()?;

    println!("Wrote {ROWS} rows to {output} (separator ';')");
    Ok(())
}
