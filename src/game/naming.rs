use crate::game::random::SeededRandom;

const MYTHIC_NAMES: &[&str] = &[
    "Ares", "Athena", "Apollo", "Artemis", "Hermes", "Hera", "Zeus", "Poseidon", "Hades",
    "Demeter", "Persephone", "Hestia", "Dionysus", "Hephaestus", "Aphrodite", "Kronos", "Rhea",
    "Hyperion", "Theia", "Helios", "Selene", "Eos", "Nyx", "Erebus", "Gaia", "Uranus", "Oceanus",
    "Tethys", "Odin", "Freya", "Thor", "Loki", "Baldur", "Tyr", "Osiris", "Isis", "Anubis", "Ra",
    "Horus", "Set",
];
const PLANET_PREFIXES: &[&str] = &[
    "New", "Nova", "Terra", "Neo", "Outer", "Far", "High", "Deep", "Old", "Lost", "Bright", "Dark",
];
const PLANET_MIDDLES: &[&str] = &[
    "Haven", "Eden", "Vesta", "Kepler", "Horizon", "Frontier", "Landing", "Hope", "Refuge",
    "Meridian", "Zenith", "Harbor", "Solace", "Reach",
];
const ORBIT_SUFFIXES: &[&str] = &["I", "II", "III", "IV", "V", "VI", "VII", "VIII", "IX", "X"];

const SYSTEM_PREFIXES: &[&str] = &[
    "Alpha", "Beta", "Gamma", "Delta", "Epsilon", "Zeta", "Eta", "Theta", "Iota", "Kappa",
    "Lambda", "Sigma", "Tau", "Upsilon", "Omega",
];
const SYSTEM_MIDDLES: &[&str] = &[
    "Centauri", "Draconis", "Cygni", "Eridani", "Lyrae", "Orionis", "Pegasi", "Aquilae", "Ceti",
    "Hydrae", "Tauri", "Leonis", "Scorpii", "Carinae",
];
const SYSTEM_SUFFIXES: &[&str] = &["Prime", "Major", "Minor", "Nova", "Secundus", "Ultima"];

const GALAXY_FIRSTS: &[&str] = &[
    "Andromeda", "Triangulum", "Magellan", "Sombrero", "Whirlpool", "Pinwheel", "Cartwheel",
    "Sculptor", "Phoenix", "Cygnus", "Perseus", "Centaurus", "Hoag", "Tadpole",
];
const GALAXY_SECONDS: &[&str] = &[
    "Nebula", "Cluster", "Expanse", "Reach", "Cloud", "Spiral", "Drift", "Veil", "Deep", "Crown",
];

const LANDMARK_ADJECTIVES: &[&str] = &[
    "Silent", "Crimson", "Shattered", "Hollow", "Twin", "Sunken", "Frozen", "Ashen", "Glass",
    "Whispering",
];
const LANDMARK_NOUNS: &[&str] = &[
    "Crater", "Ridge", "Canyon", "Spire", "Basin", "Mesa", "Geyser", "Arch", "Dunes", "Caverns",
];

fn pick(rng: &mut SeededRandom, options: &'static [&'static str]) -> &'static str {
    rng.pick(options).copied().unwrap_or("Unnamed")
}

/// 40% a mythic name, otherwise `prefix middle`; then the orbit numeral when one exists.
pub fn planet_name(rng: &mut SeededRandom, orbit_index: u32) -> String {
    let base = if rng.next_bool(0.4) {
        pick(rng, MYTHIC_NAMES).to_string()
    } else {
        format!("{} {}", pick(rng, PLANET_PREFIXES), pick(rng, PLANET_MIDDLES))
    };

    match ORBIT_SUFFIXES.get(orbit_index as usize) {
        Some(suffix) => format!("{} {}", base, suffix),
        None => base,
    }
}

pub fn system_name(rng: &mut SeededRandom) -> String {
    let prefix = pick(rng, SYSTEM_PREFIXES);
    let middle = pick(rng, SYSTEM_MIDDLES);
    let suffix = rng.next_bool(0.3).then(|| pick(rng, SYSTEM_SUFFIXES));
    let number = rng.next_int_inclusive(1, 999);

    match suffix {
        Some(suffix) => format!("{} {} {} {}", prefix, middle, suffix, number),
        None => format!("{} {} {}", prefix, middle, number),
    }
}

pub fn galaxy_name(rng: &mut SeededRandom) -> String {
    let first = pick(rng, GALAXY_FIRSTS);
    let second = pick(rng, GALAXY_SECONDS);
    if rng.next_bool(0.25) {
        format!("{} {} {}", first, second, pick(rng, SYSTEM_SUFFIXES))
    } else {
        format!("{} {}", first, second)
    }
}

/// Returns `(name, kind)`; the kind is the bare landform noun.
pub fn landmark_name(rng: &mut SeededRandom) -> (String, &'static str) {
    let adjective = pick(rng, LANDMARK_ADJECTIVES);
    let noun = pick(rng, LANDMARK_NOUNS);
    (format!("{} {}", adjective, noun), noun)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn planet_names_carry_orbit_numeral() {
        let mut rng = SeededRandom::new(12);
        for idx in 0..ORBIT_SUFFIXES.len() as u32 {
            let name = planet_name(&mut rng, idx);
            assert!(
                name.ends_with(&format!(" {}", ORBIT_SUFFIXES[idx as usize])),
                "{name} missing numeral"
            );
        }
    }

    #[test]
    fn planet_names_past_the_table_have_no_numeral() {
        let mut rng = SeededRandom::new(3);
        for _ in 0..50 {
            let name = planet_name(&mut rng, 25);
            let last = name.rsplit(' ').next().unwrap();
            assert!(!ORBIT_SUFFIXES.contains(&last), "{name}");
        }
    }

    #[test]
    fn system_names_end_with_a_number() {
        let mut rng = SeededRandom::new(77);
        for _ in 0..100 {
            let name = system_name(&mut rng);
            let number: u32 = name.rsplit(' ').next().unwrap().parse().unwrap();
            assert!((1..=999).contains(&number));
            let words = name.split(' ').count();
            assert!(words == 3 || words == 4, "{name}");
        }
    }

    #[test]
    fn names_are_deterministic() {
        let mut a = SeededRandom::new(2024);
        let mut b = SeededRandom::new(2024);
        assert_eq!(galaxy_name(&mut a), galaxy_name(&mut b));
        assert_eq!(system_name(&mut a), system_name(&mut b));
        assert_eq!(planet_name(&mut a, 1), planet_name(&mut b, 1));
        assert_eq!(landmark_name(&mut a), landmark_name(&mut b));
    }
}
