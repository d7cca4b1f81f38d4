use sha2::Digest;
use sha2::Sha256;

pub fn bytes_sha256(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(&hasher.finalize()[..])
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::bytes_sha256;

    #[test]
    fn empty_input() {
        let expected = hex!("e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855");
        assert_eq!(bytes_sha256(b""), hex::encode(expected));
    }

    #[test]
    fn known_input() {
        assert_eq!(
            bytes_sha256(b"layer"),
            "dac1d7cfa95021764849fd102524e141488c5e3a90f861dbb5a12d9ac8584f85"
        );
    }
}
