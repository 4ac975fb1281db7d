//! Room code generation.

use imposter_protocol::RoomCode;
use rand::Rng;

/// Draws a fresh room code.
///
/// Each character is an independent uniform draw from
/// [`RoomCode::ALPHABET`]. Existing rooms are not consulted, so a
/// collision overwrites the other lobby when the code is used.
pub fn generate_room_code() -> RoomCode {
    let mut rng = rand::rng();
    let n = RoomCode::ALPHABET.len();
    RoomCode::from_indices(std::array::from_fn(|_| rng.random_range(0..n)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generates_four_character_code() {
        assert_eq!(generate_room_code().as_str().len(), RoomCode::LENGTH);
    }

    #[test]
    fn test_contains_only_alphabet_characters() {
        for _ in 0..500 {
            let code = generate_room_code();
            assert!(
                code.as_str().chars().all(|c| RoomCode::ALPHABET.contains(c)),
                "{code} has a character outside the alphabet"
            );
        }
    }

    #[test]
    fn test_generated_codes_parse_back() {
        for _ in 0..100 {
            let code = generate_room_code();
            assert_eq!(RoomCode::parse(code.as_str()).unwrap(), code);
        }
    }

    #[test]
    fn test_codes_vary() {
        let codes: std::collections::HashSet<_> = (0..200).map(|_| generate_room_code()).collect();
        assert!(codes.len() > 150);
    }
}
