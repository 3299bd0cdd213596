use rand::{thread_rng, Rng};

const ROOM_CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Generates a shareable room code: uppercase letters and digits
pub fn random_room_code(length: usize) -> String {
    let mut rng = thread_rng();

    std::iter::repeat(())
        .map(|_| {
            let index = rng.gen_range(0..ROOM_CODE_CHARSET.len());
            ROOM_CODE_CHARSET[index] as char
        })
        .take(length)
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_room_codes_use_the_shareable_charset() {
        let code = random_room_code(6);

        assert_eq!(code.len(), 6);
        assert!(
            code.chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()),
            "codes are uppercase alphanumeric, got {}",
            code
        );
    }
}
