//! Deterministic random streams for the scheduler rules.
use hmac::{Hmac, Mac};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use sha2::Sha256;

/// Independent RNG streams segregated by scheduler rule.
///
/// Spawn placement and decay selection each draw from their own stream, so
/// changing one interval never reshuffles the other rule's choices.
#[derive(Debug, Clone)]
pub struct RngBundle {
    seed: u64,
    spawn: CountingRng<SmallRng>,
    decay: CountingRng<SmallRng>,
}

impl RngBundle {
    /// Construct the bundle from a user-visible seed.
    #[must_use]
    pub fn from_user_seed(seed: u64) -> Self {
        Self {
            seed,
            spawn: CountingRng::new(derive_stream_seed(seed, b"spawn")),
            decay: CountingRng::new(derive_stream_seed(seed, b"decay")),
        }
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Stream used for spawn placement.
    pub const fn spawn(&mut self) -> &mut CountingRng<SmallRng> {
        &mut self.spawn
    }

    /// Stream used for decay selection.
    pub const fn decay(&mut self) -> &mut CountingRng<SmallRng> {
        &mut self.decay
    }

    /// Both streams at once, for a tick that fires both rules.
    pub const fn split(&mut self) -> (&mut CountingRng<SmallRng>, &mut CountingRng<SmallRng>) {
        (&mut self.spawn, &mut self.decay)
    }
}

/// Counting wrapper for RNG streams providing instrumentation.
#[derive(Debug, Clone)]
pub struct CountingRng<R> {
    rng: R,
    draws: u64,
}

impl CountingRng<SmallRng> {
    fn new(seed: u64) -> Self {
        Self::wrap(SmallRng::seed_from_u64(seed))
    }
}

impl<R: rand::RngCore> CountingRng<R> {
    /// Wrap an arbitrary generator, e.g. a fixed test RNG.
    pub const fn wrap(rng: R) -> Self {
        Self { rng, draws: 0 }
    }

    /// Number of draw calls performed against this stream.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }
}

impl<R: rand::RngCore> rand::RngCore for CountingRng<R> {
    fn next_u32(&mut self) -> u32 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.draws = self.draws.saturating_add(1);
        self.rng.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.draws = self.draws.saturating_add(1);
        self.rng.try_fill_bytes(dest)
    }
}

fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    // HMAC accepts keys of any length, so this never falls back in practice.
    let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes()) else {
        return user_seed ^ u64::from_le_bytes(pad_tag(domain_tag));
    };
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let mut seed_bytes = [0u8; 8];
    seed_bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(seed_bytes)
}

fn pad_tag(tag: &[u8]) -> [u8; 8] {
    let mut out = [0u8; 8];
    for (slot, byte) in out.iter_mut().zip(tag) {
        *slot = *byte;
    }
    out
}
