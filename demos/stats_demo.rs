use std::collections::hash_map::DefaultHasher;
use std::hash::Hash;
use std::hash::Hasher;

use clap::Parser;
use robin_hash::HashTable;
use robin_hash::hash_table::Entry;

/// Fill a table with integers and report its probe-distance statistics.
#[derive(Parser, Debug)]
struct Args {
    /// Number of values to insert
    #[arg(short = 'c', long = "count", default_value_t = 1000)]
    count: u64,

    /// Remove every n-th value after filling (0 keeps everything)
    #[arg(short = 'r', long = "remove_every", default_value_t = 0)]
    remove_every: u64,
}

fn hash_u64(value: u64) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

fn main() {
    let args = Args::parse();

    let mut table: HashTable<u64> = HashTable::new();
    println!("Filling table with {} u64 values...", args.count);

    for value in 0..args.count {
        match table.entry(hash_u64(value), |&v| v == value) {
            Entry::Vacant(entry) => {
                entry.insert(value);
            }
            Entry::Occupied(_) => {
                panic!("Value already exists in table: {}", value);
            }
        }
    }

    if args.remove_every > 0 {
        let removed = (0..args.count)
            .step_by(args.remove_every as usize)
            .filter(|&value| table.remove(hash_u64(value), |&v| v == value).is_some())
            .count();
        println!("Removed {} values", removed);
    }

    println!("Table holds {} values in {} slots", table.len(), table.capacity());
    println!(
        "Final load factor: {:.2}%",
        (table.len() as f64 / table.capacity() as f64) * 100.0
    );

    if let Err(violation) = table.validate(|&v| hash_u64(v), |a, b| a == b) {
        eprintln!("table invariant broken: {violation}");
    }

    table.print_probe_histogram();
    table.debug_stats().print();
}
