use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use pdh_reader::config::{DEFAULT_FOOTER_LINES, DEFAULT_HEADER_LINES};

/// Write synthetic SAXS .pdh files for trying the viewer and the splitter.
#[derive(Parser)]
struct Args {
    /// Output directory.
    #[arg(long, default_value = "notebooks/datasets/raw")]
    out: PathBuf,

    /// Number of q points per file.
    #[arg(long, default_value_t = 600)]
    points: usize,
}

/// Scattering of a homogeneous sphere of radius `radius` (nm) at `q` (1/nm).
fn sphere_intensity(q: f64, radius: f64, i0: f64) -> f64 {
    let qr = q * radius;
    if qr.abs() < 1e-6 {
        return i0;
    }
    let amplitude = 3.0 * (qr.sin() - qr * qr.cos()) / qr.powi(3);
    i0 * amplitude * amplitude
}

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
}

struct Sample<'a> {
    name: &'a str,
    radius_nm: f64,
    i0: f64,
    background: f64,
}

fn render_pdh(sample: &Sample<'_>, points: usize, rng: &mut SimpleRng) -> String {
    let mut out = String::new();

    // Header block
    let header = [
        sample.name.to_string(),
        "SAXS".to_string(),
        format!("{points:>9} {:>9} {:>9}", 0, 0),
        format!("{:>15.6e} {:>15.6e} {:>15.6e}", 0.0, 0.0, 0.0),
        format!("{:>15.6e} {:>15.6e} {:>15.6e}", 264.5, 0.1542, 1.0),
    ];
    debug_assert_eq!(header.len(), DEFAULT_HEADER_LINES);
    for line in &header {
        out.push_str(line);
        out.push('\n');
    }

    // Data block: q from 0.05 to 5 1/nm
    for k in 0..points {
        let q = 0.05 + k as f64 * (5.0 - 0.05) / points.max(2).saturating_sub(1) as f64;
        let ideal = sphere_intensity(q, sample.radius_nm, sample.i0) + sample.background;
        let sigma = 0.02 * ideal + 1e-3;
        let counts = (ideal + rng.gauss(0.0, sigma)).max(1e-6);
        let _ = writeln!(out, "   {q:.6e}   {counts:.6e}   {sigma:.6e}");
    }

    for line in render_footer(sample) {
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// The XML footer, padded to exactly the footer line count.
fn render_footer(sample: &Sample<'_>) -> Vec<String> {
    let mut lines = vec![
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>".to_string(),
        "<fileinfo>".to_string(),
        format!("  <parameter id=\"Sample\">{}</parameter>", sample.name),
        "  <parameter id=\"Instrument\">SAXSess</parameter>".to_string(),
        "  <group id=\"Geometry\">".to_string(),
        "    <parameter id=\"Distance\" unit=\"mm\">264.5</parameter>".to_string(),
        "    <parameter id=\"Wavelength\" unit=\"nm\">0.1542</parameter>".to_string(),
        "  </group>".to_string(),
        "  <group id=\"Model\">".to_string(),
        format!("    <parameter id=\"Radius\" unit=\"nm\">{}</parameter>", sample.radius_nm),
        format!("    <parameter id=\"Background\">{}</parameter>", sample.background),
        "  </group>".to_string(),
        "  <group id=\"Channels\">".to_string(),
    ];
    let closing = ["  </group>", "</fileinfo>"];

    let mut channel = 0;
    while lines.len() + closing.len() < DEFAULT_FOOTER_LINES {
        lines.push(format!("    <channel index=\"{channel}\" gain=\"1.0\"/>"));
        channel += 1;
    }
    lines.extend(closing.iter().map(|s| s.to_string()));
    lines
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let mut rng = SimpleRng::new(42);

    let samples = [
        Sample { name: "silica_10nm", radius_nm: 10.0, i0: 5.0e3, background: 0.5 },
        Sample { name: "silica_15nm", radius_nm: 15.0, i0: 2.0e4, background: 0.5 },
        Sample { name: "micelle_4nm", radius_nm: 4.0, i0: 8.0e2, background: 1.2 },
        Sample { name: "buffer", radius_nm: 0.5, i0: 1.0, background: 1.0 },
    ];

    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("creating {}", args.out.display()))?;

    for sample in &samples {
        let path = args.out.join(format!("{}.pdh", sample.name));
        let content = render_pdh(sample, args.points, &mut rng);
        std::fs::write(&path, content).with_context(|| format!("writing {}", path.display()))?;
        log::info!("Wrote {}", path.display());
    }

    println!(
        "Wrote {} files ({} q points each) to {}",
        samples.len(),
        args.points,
        args.out.display()
    );
    Ok(())
}
