use stress_scope::data::columns;

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

    fn pick<'a>(&mut self, options: &'a [&'a str]) -> &'a str {
        options[(self.next_u64() % options.len() as u64) as usize]
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

const DEPARTMENTS: [(&str, f64, &[&str]); 6] = [
    ("Engineering", 75_000.0, &["Engineer", "Senior Engineer", "Tech Lead"]),
    ("Sales", 55_000.0, &["Account Executive", "Sales Manager"]),
    ("Marketing", 52_000.0, &["Content Strategist", "Brand Manager"]),
    ("HR", 48_000.0, &["Recruiter", "HR Partner"]),
    ("Finance", 65_000.0, &["Analyst", "Controller"]),
    ("Operations", 50_000.0, &["Coordinator", "Operations Manager"]),
];

const GENDERS: [&str; 3] = ["Female", "Male", "Other"];

fn main() {
    let mut rng = SimpleRng::new(42);
    let n_employees = 5000;

    let output_path = "data/corporate_stress_dataset.csv";
    std::fs::create_dir_all("data").expect("Failed to create data directory");
    let mut writer = csv::Writer::from_path(output_path).expect("Failed to create output file");

    writer
        .write_record(columns::REQUIRED)
        .expect("Failed to write header");

    for i in 0..n_employees {
        let (department, base_salary, roles) =
            DEPARTMENTS[(rng.next_u64() % DEPARTMENTS.len() as u64) as usize];
        let gender = rng.pick(&GENDERS);
        let job_role = rng.pick(roles);

        let age = (22.0 + rng.next_f64() * 38.0).floor();
        let experience = (age - 22.0 - rng.next_f64() * 6.0).max(0.0).floor();
        let hours = rng.gauss(45.0, 8.0).clamp(30.0, 80.0);
        let sleep = rng.gauss(6.8, 1.2).clamp(3.0, 11.0);
        let balance = (6.0 - (hours - 40.0) / 10.0 + rng.gauss(0.0, 0.8))
            .round()
            .clamp(1.0, 5.0);
        let remote = if rng.next_f64() < 0.4 { "Yes" } else { "No" };
        let salary = (base_salary + experience * 2_500.0 + rng.gauss(0.0, 5_000.0)).max(25_000.0);

        // Stress rises with hours and falls with sleep and balance.
        let stress = (5.0 + (hours - 45.0) * 0.12 - (sleep - 6.8) * 0.9 - (balance - 3.0) * 0.6
            + rng.gauss(0.0, 1.2))
        .round()
        .clamp(0.0, 10.0);

        // Sprinkle missing sleep readings so coercion paths stay exercised.
        let sleep_field = if i % 97 == 0 {
            String::new()
        } else {
            format!("{sleep:.1}")
        };

        writer
            .write_record(&[
                format!("{stress:.0}"),
                department.to_string(),
                gender.to_string(),
                format!("{age:.0}"),
                format!("{experience:.0}"),
                format!("{hours:.1}"),
                format!("{salary:.0}"),
                sleep_field,
                format!("{balance:.0}"),
                remote.to_string(),
                job_role.to_string(),
            ])
            .expect("Failed to write record");
    }

    writer.flush().expect("Failed to flush output");
    println!("Wrote {n_employees} employee records to {output_path}");
}
