use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

pub fn format_amount(amount: f64) -> String {
    const UNITS: [(f64, &str); 3] = [(1e9, "B"), (1e6, "M"), (1e3, "K")];

    let sign = if amount < 0.0 { "-" } else { "" };
    let magnitude = amount.abs();
    for (scale, suffix) in UNITS {
        if magnitude >= scale {
            return format!("{sign}${:.1}{suffix}", magnitude / scale);
        }
    }
    format!("{sign}${magnitude:.0}")
}

pub fn truncate_label(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => &text[..cut],
        None => text,
    }
}

pub fn stable_pair(id: &str, salt: u64) -> (f32, f32) {
    let mut hasher = DefaultHasher::new();
    id.hash(&mut hasher);
    salt.hash(&mut hasher);
    let hash = hasher.finish();

    let x = ((hash & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    let y = (((hash >> 32) & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    ((x * 2.0) - 1.0, (y * 2.0) - 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_are_compact() {
        assert_eq!(format_amount(1_260_000_000.0), "$1.3B");
        assert_eq!(format_amount(340_500_000.0), "$340.5M");
        assert_eq!(format_amount(12_000.0), "$12.0K");
        assert_eq!(format_amount(950.0), "$950");
    }

    #[test]
    fn labels_cut_on_char_boundaries() {
        assert_eq!(truncate_label("Société de santé régionale du Nord", 10), "Société de");
        assert_eq!(truncate_label("short", 25), "short");
    }

    #[test]
    fn stable_pair_is_bounded_and_repeatable() {
        let first = stable_pair("vendor-17", 2019);
        assert_eq!(first, stable_pair("vendor-17", 2019));
        assert_ne!(first, stable_pair("vendor-17", 2020));
        assert!((-1.0..=1.0).contains(&first.0));
        assert!((-1.0..=1.0).contains(&first.1));
    }
}
