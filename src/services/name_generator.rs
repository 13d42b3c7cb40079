use rand::{seq::IndexedRandom, Rng};

use crate::constants::{NAME_ADJECTIVES, NAME_NOUNS, NAME_SUFFIX_MAX, NAME_SUFFIX_MIN};

/// Random player name such as `Moon_Shiba417`.
pub fn generate_name() -> String {
    generate_name_with(&mut rand::rng())
}

pub fn generate_name_with<R: Rng>(rng: &mut R) -> String {
    let adjective = NAME_ADJECTIVES.choose(rng).copied().unwrap_or("Based");
    let noun = NAME_NOUNS.choose(rng).copied().unwrap_or("Shiba");
    let suffix = rng.random_range(NAME_SUFFIX_MIN..=NAME_SUFFIX_MAX);
    format!("{}_{}{}", adjective, noun, suffix)
}
