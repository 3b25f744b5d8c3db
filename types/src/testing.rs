//! A seedable RNG for tests which reports its seed when a test fails.

use std::{
    env,
    fmt::{self, Debug, Formatter},
    iter, thread,
};

use rand::{
    distributions::{uniform::SampleRange, Alphanumeric, Distribution, Standard},
    CryptoRng, Error, Rng, RngCore, SeedableRng,
};
use rand_pcg::Pcg64Mcg;

/// Names the env var holding a hex seed to replay.
const SEED_ENV_VAR: &str = "CL_TEST_SEED";

type Seed = <Pcg64Mcg as SeedableRng>::Seed;

fn seed_from_env() -> Option<Seed> {
    let hex = env::var(SEED_ENV_VAR).ok()?;
    let mut seed = Seed::default();
    match base16::decode_slice(&hex, &mut seed) {
        Ok(_) => Some(seed),
        Err(error) => panic!("{}='{}' is not a 16-byte hex seed: {}", SEED_ENV_VAR, hex, error),
    }
}

/// A Pcg64Mcg-backed RNG whose seed is printed if its thread panics.
///
/// Export the printed `CL_TEST_SEED=<hex>` to replay a failing test.
pub struct TestRng {
    seed: Seed,
    rng: Pcg64Mcg,
}

impl TestRng {
    /// Seeds from `CL_TEST_SEED` when set, otherwise from the thread RNG.
    ///
    /// # Panics
    ///
    /// Panics if `CL_TEST_SEED` holds anything but 32 hex characters.
    pub fn new() -> Self {
        let seed = seed_from_env().unwrap_or_else(|| rand::thread_rng().gen());
        TestRng::from_seed(seed)
    }

    /// A `TestRng` replaying `seed`.
    pub fn from_seed(seed: Seed) -> Self {
        TestRng {
            seed,
            rng: Pcg64Mcg::from_seed(seed),
        }
    }

    /// The seed this RNG started from.
    pub fn seed(&self) -> Seed {
        self.seed
    }

    /// An alphanumeric string whose length is drawn from `length`.
    pub fn random_string<R: SampleRange<usize>>(&mut self, length: R) -> String {
        let count = self.gen_range(length);
        iter::repeat_with(|| char::from(self.sample(Alphanumeric)))
            .take(count)
            .collect()
    }

    /// A vector of random elements whose length is drawn from `length`.
    pub fn random_vec<R: SampleRange<usize>, T>(&mut self, length: R) -> Vec<T>
    where
        Standard: Distribution<T>,
    {
        let count = self.gen_range(length);
        iter::repeat_with(|| self.gen()).take(count).collect()
    }
}

impl Default for TestRng {
    fn default() -> Self {
        TestRng::new()
    }
}

impl Debug for TestRng {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        write!(formatter, "TestRng({})", base16::encode_lower(&self.seed))
    }
}

impl Drop for TestRng {
    fn drop(&mut self) {
        if thread::panicking() {
            eprintln!(
                "\n{} failed; replay with {}={}\n",
                thread::current().name().unwrap_or("test"),
                SEED_ENV_VAR,
                base16::encode_lower(&self.seed)
            );
        }
    }
}

impl SeedableRng for TestRng {
    type Seed = Seed;

    fn from_seed(seed: Seed) -> Self {
        TestRng::from_seed(seed)
    }
}

impl RngCore for TestRng {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.rng.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.rng.try_fill_bytes(dest)
    }
}

impl CryptoRng for TestRng {}
