use rand::{prelude::random, rngs::SmallRng, Rng, SeedableRng};
use structopt::StructOpt;

use std::time;

use rbmap::RbMap;

/// Command line options.
#[derive(Clone, StructOpt)]
pub struct Opt {
    #[structopt(long = "seed")]
    seed: Option<u64>,

    #[structopt(long = "loads", default_value = "1000000")] // default 1M
    loads: usize,

    #[structopt(long = "sets", default_value = "0")]
    sets: usize,

    #[structopt(long = "dels", default_value = "0")]
    dels: usize,

    #[structopt(long = "gets", default_value = "0")]
    gets: usize,

    #[structopt(long = "validate")]
    validate: bool,
}

fn main() {
    let opts = Opt::from_args();
    let seed = opts.seed.unwrap_or_else(random);
    println!("seed {}", seed);
    let mut rng = SmallRng::seed_from_u64(seed);

    let mut index: RbMap<u64, u64> = RbMap::new();

    // initial load
    let start = time::Instant::now();
    for _i in 0..opts.loads {
        let (key, val): (u64, u64) = (rng.gen(), rng.gen());
        index.insert(key, val);
    }
    println!("loaded {} items in {:?}", opts.loads, start.elapsed());

    do_incremental(&mut rng, &opts, &mut index);

    let start = time::Instant::now();
    let mut n = 0;
    for _e in index.iter() {
        n += 1;
    }
    println!("iter for iterating {}, took {:?}", n, start.elapsed());

    let start = time::Instant::now();
    let mut n = 0;
    let mut node = index.last();
    while let Some(nd) = node {
        n += 1;
        node = index.prev(nd);
    }
    println!("prev for walking {}, took {:?}", n, start.elapsed());

    if opts.validate {
        let start = time::Instant::now();
        match index.validate() {
            Ok(()) => println!("validated {} entries in {:?}", index.len(), start.elapsed()),
            Err(err) => {
                println!("validate failed: {}", err);
                std::process::exit(1)
            }
        }
    }
}

fn do_incremental(rng: &mut SmallRng, opts: &Opt, index: &mut RbMap<u64, u64>) {
    let start = time::Instant::now();
    let total = opts.sets + opts.dels + opts.gets;
    let (mut n_sets, mut n_dels, mut n_gets) = (0, 0, 0);

    let mut n = total;
    while n > 0 {
        let op = rng.gen::<usize>() % total;

        let key = rng.gen::<u64>();
        if op < opts.sets {
            let val = rng.gen::<u64>();
            index.insert(key, val);
            n_sets += 1;
        } else if op < (opts.sets + opts.dels) {
            index.delete(&key);
            n_dels += 1;
        } else {
            index.find(&key);
            n_gets += 1;
        }
        n -= 1;
    }
    println!(
        "incremental sets:{} dels:{} gets:{} for operations {}, took {:?}",
        n_sets,
        n_dels,
        n_gets,
        total,
        start.elapsed()
    );
}
