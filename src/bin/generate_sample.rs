use chrono::{Duration, NaiveDate};

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

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }
}

fn main() -> anyhow::Result<()> {
    let mut rng = SimpleRng::new(42);

    let regions = ["East", "West", "North", "South"];
    let products = [
        "Widget", "Gadget", "Gizmo", "Doohickey", "Sprocket", "Flange",
        "Grommet", "Bracket", "Fitting", "Coupler", "Spindle", "Bushing",
    ];

    let start = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date");

    let mut writer = csv::Writer::from_path("sample_sales.csv")?;
    writer.write_record(["date", "region", "product", "sales", "quantity"])?;

    for _ in 0..500 {
        let date = start + Duration::days((rng.next_f64() * 365.0) as i64);
        let region = rng.pick(&regions);
        let product = rng.pick(&products);
        let quantity = 1 + (rng.next_f64() * 9.0) as u32;
        // Sales loosely track quantity so the correlation grid has signal.
        let sales = quantity as f64 * (20.0 + rng.next_f64() * 15.0);

        writer.write_record([
            date.format("%Y-%m-%d").to_string(),
            region.to_string(),
            product.to_string(),
            format!("{sales:.2}"),
            quantity.to_string(),
        ])?;
    }

    writer.flush()?;
    println!("Wrote sample_sales.csv (500 rows)");
    Ok(())
}
