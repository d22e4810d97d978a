//! Object keys for uploaded photos.
//!
//! Keys take the form `<unix-millis>_<suffix>.jpg` where the suffix is a
//! short random base-36 string. The extension is fixed whatever the bytes
//! actually contain.

use chrono::{DateTime, Utc};
use rand::Rng;

/// Extension appended to every generated key.
pub const IMAGE_EXTENSION: &str = "jpg";

/// Length of the random base-36 suffix.
const SUFFIX_LEN: usize = 6;

const RADIX: u32 = 36;

/// Build an object key from a timestamp and a random source.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use recetario_core::object_key::object_key;
///
/// let now = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
/// let key = object_key(now, &mut StdRng::seed_from_u64(7));
/// assert!(key.starts_with("1700000000000_"));
/// assert!(key.ends_with(".jpg"));
/// ```
pub fn object_key<R: Rng + ?Sized>(now: DateTime<Utc>, rng: &mut R) -> String {
    let suffix: String = (0..SUFFIX_LEN)
        .filter_map(|_| char::from_digit(rng.gen_range(0..RADIX), RADIX))
        .collect();
    format!("{}_{suffix}.{IMAGE_EXTENSION}", now.timestamp_millis())
}

/// Build a key for the current instant using the thread-local generator.
#[must_use]
pub fn fresh_object_key() -> String {
    object_key(Utc::now(), &mut rand::thread_rng())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rstest::rstest;

    #[rstest]
    fn key_has_timestamp_suffix_and_extension() {
        let now = Utc
            .timestamp_millis_opt(1_234)
            .single()
            .expect("valid timestamp");
        let key = object_key(now, &mut ChaCha8Rng::seed_from_u64(1));
        let (stem, extension) = key.rsplit_once('.').expect("key has an extension");
        assert_eq!(extension, "jpg");
        let (millis, suffix) = stem.split_once('_').expect("key has a suffix");
        assert_eq!(millis, "1234");
        assert_eq!(suffix.len(), SUFFIX_LEN);
        assert!(suffix.chars().all(|ch| ch.is_ascii_digit() || ch.is_ascii_lowercase()));
    }

    #[rstest]
    fn keys_differ_for_the_same_instant() {
        let now = Utc.timestamp_millis_opt(0).single().expect("valid timestamp");
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let first = object_key(now, &mut rng);
        let second = object_key(now, &mut rng);
        assert_ne!(first, second);
    }
}
