//! Load a random routing table and measure how many longest-prefix-match lookups per second the
//! tree answers for a set of (source, destination) address pairs.
//!
//! Logging is printed to stderr; set `RUST_LOG=debug` for tree construction messages.

use std::{net::Ipv4Addr, time::Instant};

use patricia_lpm::*;

use ipnet::Ipv4Net;
use rand::prelude::*;

const NUM_ROUTES: usize = 100_000;
const NUM_PAIRS: usize = 1_000_000;
const NUMBER_OF_RERUNS: usize = 10;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut rng = thread_rng();
    let mut tree = PatriciaTree::<Ipv4Net, u32>::with_width(32)?;

    log::info!("Start subnet load");
    for id in 0..NUM_ROUTES {
        let len = rng.gen_range(8..=32);
        let prefix = Ipv4Net::new(Ipv4Addr::from(rng.gen::<u32>()), len)?.trunc();
        tree.insert(prefix, id as u32)?;
    }
    log::info!("Finished subnet load: {} prefixes", tree.len());

    let pairs: Vec<(u32, u32)> = (0..NUM_PAIRS).map(|_| (rng.gen(), rng.gen())).collect();
    log::info!("Generated {} address pairs", pairs.len());

    let mut match_source = 0usize;
    let mut match_destination = 0usize;
    let start = Instant::now();
    for _ in 0..NUMBER_OF_RERUNS {
        for (src, dst) in pairs.iter() {
            if tree.lookup(*src).is_some() {
                match_source += 1;
            }
            if tree.lookup(*dst).is_some() {
                match_destination += 1;
            }
        }
    }
    let elapsed = start.elapsed();

    // every pair involves two lookups
    let total_ops = (NUMBER_OF_RERUNS * pairs.len()) as f64;
    println!("match_source: {match_source} match_destination: {match_destination}");
    println!(
        "Total time is {:.3} seconds, total ops: {}\nMillion of ops per second: {:.2}",
        elapsed.as_secs_f64(),
        total_ops,
        total_ops / elapsed.as_secs_f64() / 1_000_000.0
    );

    let mut released = 0usize;
    tree.destroy(|_| released += 1);
    log::info!("Released {released} values");

    Ok(())
}
