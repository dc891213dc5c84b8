//! Random wallet address pool
//!
//! A sweep varies the `eth_call` payload on every tick so upstream caches
//! never see the same request twice. The pool is generated once at startup
//! and shared read-only with the driver; addresses only have to look real,
//! there is no dedup guarantee and no cryptographic requirement.

use rand::Rng;

/// Fixed pool of pseudo-random 20-byte addresses, stored as 40 lowercase
/// hex characters without a `0x` prefix.
#[derive(Debug, Clone)]
pub struct AddressPool {
    addresses: Vec<String>,
}

impl AddressPool {
    /// Generate a pool of `size` random addresses. Logs progress every
    /// 10,000 entries since the default pool takes a moment to fill.
    pub fn generate(size: usize) -> Self {
        let mut rng = rand::thread_rng();
        let mut addresses = Vec::with_capacity(size);

        for i in 0..size {
            let bytes: [u8; 20] = rng.gen();
            addresses.push(hex::encode(bytes));
            if (i + 1) % 10_000 == 0 {
                println!("  {}% done.", (i + 1) * 100 / size);
            }
        }

        Self { addresses }
    }

    /// Build a pool from pre-existing addresses, used by tests.
    pub fn from_addresses(addresses: Vec<String>) -> Self {
        Self { addresses }
    }

    /// Pick a uniformly random address from the pool.
    pub fn random(&self) -> &str {
        let index = rand::thread_rng().gen_range(0..self.addresses.len());
        &self.addresses[index]
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }
}
