//! Random Codes

use rand::Rng;
use rand::rngs::OsRng;

/// Four-digit activation code, `1000..=9999`
pub fn activation_code() -> String {
    OsRng.gen_range(1000..=9999u16).to_string()
}
