use rand::distr::{Alphanumeric, SampleString};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Random alphanumeric string from the OS entropy source. Used for token ids,
/// which must be unique because we never check for collisions.
pub fn random_token_string(len: usize) -> String {
    let mut rng = StdRng::from_os_rng();
    Alphanumeric.sample_string(&mut rng, len)
}
