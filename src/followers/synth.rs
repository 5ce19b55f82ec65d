use chrono::Utc;
use rand::{seq::SliceRandom, Rng};

use super::{placeholder_avatar, Profile};

const FIRST_NAMES: &[&str] = &[
    "Ahmet", "Zeynep", "Can", "Elif", "Murat", "Ayşe", "Ali", "Seda", "Emre", "Gül", "Ferhat",
    "Dilara", "Kerem", "Melek", "Levent",
];

const LAST_NAMES: &[&str] = &[
    "Kaya",
    "Yıldız",
    "Demir",
    "Şahin",
    "Özbek",
    "Çelik",
    "Yalçın",
    "Aksoy",
    "Çan",
    "Demirkaya",
    "Turhan",
    "Esen",
    "Aydın",
    "Polat",
    "Korkmaz",
];

const BIOS: &[&str] = &[
    "Mühendis • İstanbul",
    "Fotoğrafçı • Doğa",
    "Yazılımcı • Startup",
    "Moda blogger",
    "Spor tutkunu",
    "Şef • Yemek",
    "Seyahat blogu",
    "Yoga öğretmeni",
    "Müzisyen",
    "İç mimar",
    "Grafik Tasarımcı",
    "Danışman",
    "Pazarlama Uzmanı",
    "Blogger",
    "Influencer",
];

const VERIFIED_PROBABILITY: f64 = 0.08;

/// Generate `count` independent profiles using the thread-local RNG.
pub fn generate_profiles(count: usize) -> Vec<Profile> {
    let mut rng = rand::thread_rng();
    (0..count).map(|_| synthesize_profile(&mut rng)).collect()
}

pub fn synthesize_profile<R: Rng + ?Sized>(rng: &mut R) -> Profile {
    // Pools are non-empty constants.
    let first = FIRST_NAMES.choose(rng).copied().unwrap_or("Ali");
    let last = LAST_NAMES.choose(rng).copied().unwrap_or("Kaya");
    let bio = BIOS.choose(rng).copied().unwrap_or("Blogger");

    let username = format!(
        "{}_{}_{}",
        first.to_lowercase(),
        last.to_lowercase(),
        rng.gen_range(100..=9999)
    );

    let now = Utc::now();
    let id = format!(
        "uid_{}.{:06}_{}",
        now.timestamp(),
        now.timestamp_subsec_micros(),
        rng.gen_range(100_000..=999_999)
    );

    Profile {
        id,
        name: format!("{} {}", first, last),
        username,
        bio: bio.to_string(),
        avatar_url: placeholder_avatar(&format!("{}+{}", first, last)),
        verified: rng.gen_bool(VERIFIED_PROBABILITY),
        follower_count: rng.gen_range(100..=50_000),
        post_count: rng.gen_range(10..=1000),
    }
}
