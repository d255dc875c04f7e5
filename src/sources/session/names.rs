//! Built-in random name source.

use crate::core::traits::NameSource;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

const FIRST_NAMES: &[&str] = &[
    "Aaliyah", "Ada", "Alan", "Amara", "Andre", "Beatriz", "Bianca", "Caleb", "Carmen", "Chloe",
    "Daniel", "Diego", "Elena", "Elijah", "Emeka", "Farah", "Felix", "Grace", "Hana", "Hugo",
    "Imani", "Isaac", "Jasmine", "Jonas", "Kai", "Keiko", "Leila", "Liam", "Lucia", "Marcus",
    "Maya", "Mateo", "Nadia", "Noah", "Olivia", "Omar", "Priya", "Quinn", "Rafael", "Rosa",
    "Samir", "Sofia", "Tariq", "Tessa", "Uma", "Victor", "Wei", "Ximena", "Yusuf", "Zoe",
];

const LAST_NAMES: &[&str] = &[
    "Abbott", "Adeyemi", "Alvarez", "Andersen", "Bauer", "Bennett", "Brooks", "Castillo", "Chen",
    "Costa", "Dubois", "Edwards", "Fischer", "Fitzgerald", "Garcia", "Gupta", "Hansen", "Hughes",
    "Ibrahim", "Ivanova", "Jensen", "Kim", "Kowalski", "Larsen", "Lopez", "Mahmoud", "Martin",
    "Moreau", "Nakamura", "Nguyen", "Novak", "Okafor", "Olsen", "Patel", "Petrov", "Quinlan",
    "Ramirez", "Rossi", "Santos", "Schmidt", "Silva", "Tanaka", "Thompson", "Usman", "Varga",
    "Walsh", "Weber", "Xu", "Yamamoto", "Zimmerman",
];

/// Draws "First Last" from embedded name lists.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedNames;

impl NameSource for EmbeddedNames {
    fn random_name(&mut self, rng: &mut StdRng) -> String {
        let first = FIRST_NAMES.choose(rng).copied().unwrap_or("Alex");
        let last = LAST_NAMES.choose(rng).copied().unwrap_or("Smith");
        format!("{first} {last}")
    }
}
