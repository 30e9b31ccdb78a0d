//! Walks through the main container operations: construction, arithmetic,
//! products, inversion, and integer powers.
//!
//! Run with `cargo run --example showcase`.

use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;

use lamina::{Matrix, Vector};

fn main() -> Result<()> {
    env_logger::init();

    // Vectors grow by amortized doubling, starting at capacity 2.
    let mut v = Vector::new();
    for x in [1.0, 2.0, 3.0] {
        v.push(x);
    }
    println!("v          = {}", v);
    println!("v + v      = {}", v.add(&v)?);
    println!("v * 2.5    = {}", v.mul_scalar(2.5));
    println!("6 / v      = {}", v.scalar_div(6.0));

    let m = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]])?;
    println!("m          = {}", m);
    println!("m^T        = {}", m.transpose());
    println!("m * m      = {}", m.mul(&m)?);

    let inv = m.inverse()?;
    println!("m^-1       = {}", inv);
    println!("m * m^-1   = {}", m.mul(&inv)?);

    // Fibonacci numbers via matrix powers.
    let fibo = Matrix::from_rows(&[vec![1.0, 1.0], vec![1.0, 0.0]])?;
    println!("fibo^10    = {}", fibo.pow(10)?);

    let column = Vector::filled(2, 1.0);
    println!("m * [1, 1] = {}", m.mul_vector(&column)?);

    let mut rng = StdRng::seed_from_u64(42);
    let random = Matrix::randinit(3, 3, &mut rng);
    println!("random     = {}", random);

    Ok(())
}
